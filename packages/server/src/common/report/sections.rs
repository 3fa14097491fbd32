//! Sections generated by the LLM.
//!
//! Every field is optional and every struct keeps the keys it does not model
//! in `extra`, so a section survives a serialize/deserialize round trip intact.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use crate::common::text::Text;

/// Keys the LLM returned that have no dedicated field.
pub type Extra = IndexMap<String, Value>;

// =============================================================================
// Web research
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebResearch {
    #[serde(deserialize_with = "lenient::count")]
    pub total_queries: usize,
    #[serde(rename = "total_resultados", deserialize_with = "lenient::count")]
    pub total_results: usize,
    #[serde(rename = "conteudo_extraido_chars", deserialize_with = "lenient::count")]
    pub extracted_chars: usize,
    #[serde(rename = "resultados_detalhados", deserialize_with = "lenient::list")]
    pub detailed_results: Vec<QueryResearch>,
    #[serde(rename = "queries_executadas", deserialize_with = "lenient::strings")]
    pub executed_queries: Vec<String>,
    #[serde(rename = "fontes_unicas", deserialize_with = "lenient::strings")]
    pub unique_sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryResearch {
    #[serde(deserialize_with = "lenient::string")]
    pub query: String,
    #[serde(rename = "resultados", deserialize_with = "lenient::list")]
    pub results: Vec<ResearchHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchHit {
    #[serde(rename = "titulo", deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(rename = "resumo", deserialize_with = "lenient::string")]
    pub snippet: String,
    #[serde(rename = "fonte", deserialize_with = "lenient::string")]
    pub provider: String,
    #[serde(
        rename = "conteudo_extraido",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub extracted_content: Option<String>,
}

// =============================================================================
// Avatar
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(
        rename = "nome_ficticio",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub persona_name: Option<Text>,

    #[serde(rename = "visao_geral", default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Value>,

    #[serde(
        rename = "analise_dores",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub pains: Option<PainAnalysis>,

    #[serde(
        rename = "desejos_motivacoes",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub desires: Option<Desires>,

    #[serde(
        rename = "comportamento",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub behavior: Option<Behavior>,

    #[serde(rename = "insights_ocultos", default, skip_serializing_if = "Option::is_none")]
    pub hidden_insights: Option<Value>,

    #[serde(
        rename = "perfil_demografico_detalhado",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub demographics: Option<Demographics>,

    #[serde(
        rename = "perfil_psicografico_detalhado",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub psychographics: Option<IndexMap<String, Value>>,

    #[serde(rename = "linguagem_comunicacao", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Value>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PainAnalysis {
    #[serde(
        rename = "top_10_dores_estruturadas",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub top_pains: Vec<Pain>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pain {
    #[serde(
        rename = "dor",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub pain: Option<Text>,
    #[serde(
        rename = "frequencia",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub frequency: Option<Text>,
    #[serde(
        rename = "contexto",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub context: Option<Text>,
    #[serde(
        rename = "impacto",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub impact: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Desires {
    #[serde(
        rename = "sonhos_profundos",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub deep_dreams: Vec<Text>,
    #[serde(
        rename = "desejos_expressos",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub expressed: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    #[serde(
        rename = "arquetipos_dominantes",
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "lenient::map"
    )]
    pub archetypes: IndexMap<String, Archetype>,
    #[serde(
        rename = "medos_paralisantes",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub fears: Vec<Text>,
    #[serde(
        rename = "objecoes_reais",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub objections: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    #[serde(
        rename = "percentual",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub share: Option<Text>,
    #[serde(
        rename = "descricao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub description: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(
        rename = "idade",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub age: Option<Text>,
    #[serde(
        rename = "genero",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub gender: Option<Text>,
    #[serde(
        rename = "renda",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub income: Option<Text>,
    #[serde(
        rename = "escolaridade",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub education: Option<Text>,
    #[serde(
        rename = "localizacao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub location: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// Mental drivers
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentalDriver {
    #[serde(
        rename = "nome",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub name: Option<Text>,
    #[serde(
        rename = "gatilho_central",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub trigger: Option<Text>,
    #[serde(
        rename = "definicao_visceral",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub definition: Option<Text>,
    #[serde(
        rename = "mecanica_psicologica",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub mechanics: Option<Text>,
    #[serde(
        rename = "momento_instalacao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub installation_moment: Option<Text>,
    #[serde(
        rename = "roteiro_ativacao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub activation: Option<ActivationScript>,
    #[serde(
        rename = "frases_ancoragem",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub anchor_phrases: Vec<Text>,
    #[serde(rename = "prova_logica", default, skip_serializing_if = "Option::is_none")]
    pub logical_proof: Option<Value>,
    #[serde(
        rename = "loop_reforco",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub reinforcement_loop: Option<Text>,
    #[serde(
        rename = "categoria",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub category: Option<Text>,
    #[serde(
        rename = "poder_impacto",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub impact: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivationScript {
    #[serde(
        rename = "pergunta_abertura",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub opening_question: Option<Text>,
    #[serde(
        rename = "historia_analogia",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub story: Option<Text>,
    #[serde(
        rename = "metafora_visual",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub metaphor: Option<Text>,
    #[serde(
        rename = "comando_acao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub call_to_action: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// Anti-objection system
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntiObjection {
    #[serde(
        rename = "objecoes_universais",
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "lenient::map"
    )]
    pub universal: IndexMap<String, Objection>,
    #[serde(
        rename = "objecoes_ocultas",
        default,
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "lenient::map"
    )]
    pub hidden: IndexMap<String, Objection>,
    #[serde(
        rename = "arsenal_emergencia",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub emergency_arsenal: Vec<Text>,
    #[serde(
        rename = "implementacao_estrategica",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rollout: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objection {
    #[serde(
        rename = "objecao",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub objection: Option<Text>,
    #[serde(
        rename = "raiz_emocional",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub emotional_root: Option<Text>,
    #[serde(
        rename = "contra_ataque",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub counter: Option<Text>,
    #[serde(
        rename = "perfil_tipico",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub typical_profile: Option<Text>,
    #[serde(
        rename = "sinais",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub signals: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// Visual proofs
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualProof {
    #[serde(
        rename = "nome",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub name: Option<Text>,
    #[serde(
        rename = "conceito_alvo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub target_concept: Option<Text>,
    #[serde(
        rename = "categoria",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub category: Option<Text>,
    #[serde(
        rename = "prioridade",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub priority: Option<Text>,
    #[serde(
        rename = "objetivo_psicologico",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub goal: Option<Text>,
    #[serde(
        rename = "experimento",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub experiment: Option<Text>,
    #[serde(
        rename = "analogia",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub analogy: Option<Text>,
    #[serde(rename = "roteiro_completo", default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Value>,
    #[serde(
        rename = "materiais",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub materials: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// Pre-pitch
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrePitch {
    #[serde(
        rename = "orquestracao_emocional",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub orchestration: Option<EmotionalOrchestration>,
    #[serde(rename = "justificacao_logica", default, skip_serializing_if = "Option::is_none")]
    pub logical_justification: Option<Value>,
    #[serde(
        rename = "roteiro_completo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub script: Option<PitchScript>,
    #[serde(rename = "templates_prontos", default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Value>,
    #[serde(rename = "sinais_sucesso", default, skip_serializing_if = "Option::is_none")]
    pub success_signals: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalOrchestration {
    #[serde(
        rename = "objetivo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub goal: Option<Text>,
    #[serde(
        rename = "sequencia_psicologica",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub sequence: Vec<PitchPhase>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchPhase {
    #[serde(
        rename = "fase",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub phase: Option<Text>,
    #[serde(
        rename = "objetivo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub goal: Option<Text>,
    #[serde(
        rename = "tempo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub duration: Option<Text>,
    #[serde(
        rename = "driver_usado",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub driver: Option<Text>,
    #[serde(
        rename = "tecnicas",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub techniques: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchScript {
    #[serde(
        rename = "abertura",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub opening: Option<ScriptBlock>,
    #[serde(rename = "desenvolvimento", default, skip_serializing_if = "Option::is_none")]
    pub development: Option<Value>,
    #[serde(
        rename = "fechamento",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub closing: Option<ScriptBlock>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptBlock {
    #[serde(
        rename = "tempo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub duration: Option<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt")]
    pub script: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// Competition
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    #[serde(
        rename = "concorrentes_diretos",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub direct_competitors: Vec<Competitor>,
    #[serde(
        rename = "gaps_oportunidade",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub opportunity_gaps: Vec<Text>,
    #[serde(rename = "benchmarks_setor", default, skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<Value>,
    #[serde(
        rename = "estrategias_diferenciacao",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub differentiation: Vec<Text>,
    #[serde(rename = "analise_precos", default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Value>,
    #[serde(rename = "tendencias_competitivas", default, skip_serializing_if = "Option::is_none")]
    pub trends: Option<Value>,
    #[serde(
        rename = "ameacas_futuras",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub future_threats: Vec<Text>,
    #[serde(
        rename = "vantagens_competitivas",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub advantages: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(
        rename = "nome",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub name: Option<Text>,
    #[serde(
        rename = "analise_swot",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub swot: Option<Swot>,
    #[serde(
        rename = "estrategia_marketing",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub marketing_strategy: Option<Text>,
    #[serde(
        rename = "posicionamento",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt"
    )]
    pub positioning: Option<Text>,
    #[serde(
        rename = "vulnerabilidades",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub vulnerabilities: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Swot {
    #[serde(
        rename = "forcas",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub strengths: Vec<Text>,
    #[serde(
        rename = "fraquezas",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub weaknesses: Vec<Text>,
    #[serde(
        rename = "oportunidades",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub opportunities: Vec<Text>,
    #[serde(
        rename = "ameacas",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub threats: Vec<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_keys_survive_round_trip() {
        let raw = json!({
            "nome_ficticio": "Carla Empreendedora",
            "perfil_demografico_detalhado": {
                "idade": "35-44",
                "filhos": "2"
            },
            "campo_novo": {"qualquer": [1, 2, 3]}
        });

        let avatar: Avatar = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(avatar.persona_name, Some(Text::from("Carla Empreendedora")));
        assert_eq!(
            avatar.demographics.as_ref().unwrap().extra.get("filhos"),
            Some(&json!("2"))
        );

        assert_eq!(serde_json::to_value(&avatar).unwrap(), raw);
    }

    #[test]
    fn objection_maps_keep_llm_order() {
        let raw = json!({
            "objecoes_universais": {
                "tempo": {"objecao": "Sem tempo"},
                "dinheiro": {"objecao": "Caro"},
                "confianca": {"objecao": "Não confio"}
            }
        });
        let system: AntiObjection = serde_json::from_value(raw).unwrap();
        let keys: Vec<&str> = system.universal.keys().map(String::as_str).collect();
        assert_eq!(keys, ["tempo", "dinheiro", "confianca"]);
    }

    #[test]
    fn off_type_fields_keep_their_siblings() {
        let raw = json!({
            "nome_ficticio": "Ana Maratonista",
            "desejos_motivacoes": {
                "sonhos_profundos": null,
                "desejos_expressos": [{"desejo": "Completar 42 km"}, "Dormir melhor"]
            },
            "comportamento": {
                "medos_paralisantes": "Lesão no joelho",
                "arquetipos_dominantes": {"atleta": {"percentual": 40}, "quebrado": 3}
            },
            "analise_dores": ["não", "é", "objeto"]
        });

        let avatar: Avatar = serde_json::from_value(raw).unwrap();
        assert_eq!(avatar.persona_name, Some(Text::from("Ana Maratonista")));
        assert!(avatar.pains.is_none());

        let desires = avatar.desires.unwrap();
        assert!(desires.deep_dreams.is_empty());
        assert_eq!(desires.expressed.len(), 2);
        assert_eq!(desires.expressed[0].to_string(), "Desejo: Completar 42 km");

        let behavior = avatar.behavior.unwrap();
        assert_eq!(behavior.fears, vec![Text::from("Lesão no joelho")]);
        assert_eq!(behavior.archetypes.len(), 1);
    }

    #[test]
    fn object_where_text_expected_is_kept_verbatim() {
        let raw = json!({"nome": {"primeiro": "Relógio"}, "gatilho_central": "Urgência"});
        let driver: MentalDriver = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(driver.trigger, Some(Text::from("Urgência")));
        assert_eq!(serde_json::to_value(&driver).unwrap(), raw);
    }
}
