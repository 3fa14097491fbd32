//! Sections computed from the request without calling the LLM.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Positioning {
    #[serde(rename = "posicionamento_mercado", deserialize_with = "lenient::string")]
    pub market_positioning: String,
    #[serde(rename = "proposta_valor", deserialize_with = "lenient::string")]
    pub value_proposition: String,
    #[serde(rename = "diferenciais_competitivos", deserialize_with = "lenient::strings")]
    pub differentiators: Vec<String>,
    #[serde(rename = "mensagem_central", deserialize_with = "lenient::string")]
    pub core_message: String,
    #[serde(rename = "tom_comunicacao", deserialize_with = "lenient::string")]
    pub tone: String,
    #[serde(rename = "nicho_especifico", deserialize_with = "lenient::string")]
    pub niche: String,
    #[serde(rename = "estrategia_oceano_azul", deserialize_with = "lenient::string")]
    pub blue_ocean: String,
    #[serde(rename = "ancoragem_preco", deserialize_with = "lenient::string")]
    pub price_anchor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordStrategy {
    #[serde(rename = "palavras_primarias", deserialize_with = "lenient::strings")]
    pub primary: Vec<String>,
    #[serde(rename = "palavras_secundarias", deserialize_with = "lenient::strings")]
    pub secondary: Vec<String>,
    #[serde(rename = "palavras_cauda_longa", deserialize_with = "lenient::strings")]
    pub long_tail: Vec<String>,
    #[serde(rename = "intencao_busca", deserialize_with = "lenient::or_default")]
    pub search_intent: SearchIntent,
    #[serde(rename = "estrategia_conteudo", deserialize_with = "lenient::string")]
    pub content_strategy: String,
    #[serde(rename = "sazonalidade", deserialize_with = "lenient::string")]
    pub seasonality: String,
    #[serde(rename = "oportunidades_seo", deserialize_with = "lenient::string")]
    pub seo_opportunities: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIntent {
    #[serde(rename = "informacional", deserialize_with = "lenient::strings")]
    pub informational: Vec<String>,
    #[serde(rename = "navegacional", deserialize_with = "lenient::strings")]
    pub navigational: Vec<String>,
    #[serde(rename = "transacional", deserialize_with = "lenient::strings")]
    pub transactional: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceMetrics {
    #[serde(rename = "kpis_principais", deserialize_with = "lenient::list")]
    pub kpis: Vec<Kpi>,
    #[serde(rename = "projecoes_financeiras", deserialize_with = "lenient::or_default")]
    pub financial_scenarios: FinancialScenarios,
    #[serde(rename = "roi_esperado", deserialize_with = "lenient::string")]
    pub expected_roi: String,
    #[serde(rename = "payback_investimento", deserialize_with = "lenient::string")]
    pub payback: String,
    #[serde(deserialize_with = "lenient::string")]
    pub lifetime_value: String,
    #[serde(rename = "churn_rate_esperado", deserialize_with = "lenient::string")]
    pub expected_churn: String,
    #[serde(rename = "crescimento_mensal", deserialize_with = "lenient::string")]
    pub monthly_growth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpi {
    #[serde(rename = "metrica", deserialize_with = "lenient::string")]
    pub metric: String,
    #[serde(rename = "objetivo", deserialize_with = "lenient::string")]
    pub target: String,
    #[serde(rename = "frequencia", deserialize_with = "lenient::string")]
    pub frequency: String,
    #[serde(rename = "responsavel", deserialize_with = "lenient::string")]
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialScenarios {
    #[serde(rename = "cenario_conservador", deserialize_with = "lenient::or_default")]
    pub conservative: FinancialScenario,
    #[serde(rename = "cenario_realista", deserialize_with = "lenient::or_default")]
    pub realistic: FinancialScenario,
    #[serde(rename = "cenario_otimista", deserialize_with = "lenient::or_default")]
    pub optimistic: FinancialScenario,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialScenario {
    #[serde(rename = "receita_mensal", deserialize_with = "lenient::string")]
    pub monthly_revenue: String,
    #[serde(rename = "clientes_mes", deserialize_with = "lenient::string")]
    pub customers_per_month: String,
    #[serde(rename = "ticket_medio", deserialize_with = "lenient::string")]
    pub average_ticket: String,
    #[serde(rename = "margem_lucro", deserialize_with = "lenient::string")]
    pub profit_margin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projections {
    #[serde(rename = "horizonte_temporal", deserialize_with = "lenient::string")]
    pub horizon: String,
    #[serde(rename = "cenarios", deserialize_with = "lenient::or_default")]
    pub scenarios: ProjectionScenarios,
    #[serde(rename = "fatores_criticos", deserialize_with = "lenient::strings")]
    pub critical_factors: Vec<String>,
    #[serde(rename = "marcos_importantes", deserialize_with = "lenient::string_map")]
    pub milestones: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionScenarios {
    #[serde(rename = "conservador", deserialize_with = "lenient::or_default")]
    pub conservative: ProjectionScenario,
    #[serde(rename = "realista", deserialize_with = "lenient::or_default")]
    pub realistic: ProjectionScenario,
    #[serde(rename = "otimista", deserialize_with = "lenient::or_default")]
    pub optimistic: ProjectionScenario,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionScenario {
    #[serde(rename = "probabilidade", deserialize_with = "lenient::string")]
    pub probability: String,
    #[serde(rename = "crescimento_anual", deserialize_with = "lenient::string")]
    pub annual_growth: String,
    #[serde(rename = "receita_ano_1", deserialize_with = "lenient::string")]
    pub revenue_year_1: String,
    #[serde(rename = "receita_ano_2", deserialize_with = "lenient::string")]
    pub revenue_year_2: String,
    #[serde(rename = "receita_ano_3", deserialize_with = "lenient::string")]
    pub revenue_year_3: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPlan {
    #[serde(rename = "fase_1_preparacao", deserialize_with = "lenient::or_default")]
    pub preparation: ActionPhase,
    #[serde(rename = "fase_2_lancamento", deserialize_with = "lenient::or_default")]
    pub launch: ActionPhase,
    #[serde(rename = "fase_3_crescimento", deserialize_with = "lenient::or_default")]
    pub growth: ActionPhase,
}

impl ActionPlan {
    /// Phases in execution order with their display titles.
    pub fn phases(&self) -> [(&'static str, &ActionPhase); 3] {
        [
            ("Fase 1: Preparação", &self.preparation),
            ("Fase 2: Lançamento", &self.launch),
            ("Fase 3: Crescimento", &self.growth),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPhase {
    #[serde(rename = "duracao", deserialize_with = "lenient::string")]
    pub duration: String,
    #[serde(rename = "foco", deserialize_with = "lenient::string")]
    pub focus: String,
    #[serde(rename = "investimento", deserialize_with = "lenient::string")]
    pub investment: String,
    #[serde(rename = "atividades", deserialize_with = "lenient::strings")]
    pub activities: Vec<String>,
    #[serde(rename = "entregas", deserialize_with = "lenient::strings")]
    pub deliverables: Vec<String>,
    #[serde(rename = "responsaveis", deserialize_with = "lenient::strings")]
    pub owners: Vec<String>,
}
