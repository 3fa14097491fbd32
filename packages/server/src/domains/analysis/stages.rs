//! The fixed stage table of the report pipeline.

/// How a stage produces its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Search and page extraction, no LLM call.
    Research,
    /// LLM call whose answer must be a JSON object.
    LlmObject,
    /// LLM call whose answer must be a non-empty JSON array.
    LlmList,
    /// Deterministic function of the request and earlier sections.
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKey {
    WebResearch,
    Avatar,
    MentalDrivers,
    AntiObjection,
    VisualProofs,
    PrePitch,
    Competition,
    Positioning,
    Keywords,
    Metrics,
    Projections,
    ActionPlan,
    Insights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub key: StageKey,
    /// Report key the stage fills.
    pub section: &'static str,
    /// 1-based position reported to progress sinks.
    pub step: usize,
    pub message: &'static str,
    pub kind: StageKind,
    /// Token ceiling for LLM stages.
    pub max_tokens: u32,
}

pub const TOTAL_STAGES: usize = 13;

/// Token ceiling for every LLM stage except competition.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const COMPETITION_MAX_TOKENS: u32 = 6144;

pub const STAGES: [StageSpec; TOTAL_STAGES] = [
    StageSpec {
        key: StageKey::WebResearch,
        section: "pesquisa_web_massiva",
        step: 1,
        message: "Realizando pesquisa profunda massiva",
        kind: StageKind::Research,
        max_tokens: 0,
    },
    StageSpec {
        key: StageKey::Avatar,
        section: "avatar_ultra_detalhado",
        step: 2,
        message: "Criando avatar arqueológico ultra-detalhado",
        kind: StageKind::LlmObject,
        max_tokens: DEFAULT_MAX_TOKENS,
    },
    StageSpec {
        key: StageKey::MentalDrivers,
        section: "drivers_mentais_customizados",
        step: 3,
        message: "Gerando drivers mentais customizados",
        kind: StageKind::LlmList,
        max_tokens: DEFAULT_MAX_TOKENS,
    },
    StageSpec {
        key: StageKey::AntiObjection,
        section: "sistema_anti_objecao",
        step: 4,
        message: "Construindo sistema anti-objeção",
        kind: StageKind::LlmObject,
        max_tokens: DEFAULT_MAX_TOKENS,
    },
    StageSpec {
        key: StageKey::VisualProofs,
        section: "provas_visuais_sugeridas",
        step: 5,
        message: "Desenvolvendo provas visuais instantâneas",
        kind: StageKind::LlmList,
        max_tokens: DEFAULT_MAX_TOKENS,
    },
    StageSpec {
        key: StageKey::PrePitch,
        section: "pre_pitch_invisivel",
        step: 6,
        message: "Arquitetando pré-pitch invisível",
        kind: StageKind::LlmObject,
        max_tokens: DEFAULT_MAX_TOKENS,
    },
    StageSpec {
        key: StageKey::Competition,
        section: "analise_concorrencia_detalhada",
        step: 7,
        message: "Mapeando concorrência profunda",
        kind: StageKind::LlmObject,
        max_tokens: COMPETITION_MAX_TOKENS,
    },
    StageSpec {
        key: StageKey::Positioning,
        section: "escopo",
        step: 8,
        message: "Definindo escopo e posicionamento",
        kind: StageKind::Computed,
        max_tokens: 0,
    },
    StageSpec {
        key: StageKey::Keywords,
        section: "estrategia_palavras_chave",
        step: 9,
        message: "Criando estratégia de palavras-chave",
        kind: StageKind::Computed,
        max_tokens: 0,
    },
    StageSpec {
        key: StageKey::Metrics,
        section: "metricas_performance_detalhadas",
        step: 10,
        message: "Calculando métricas de performance",
        kind: StageKind::Computed,
        max_tokens: 0,
    },
    StageSpec {
        key: StageKey::Projections,
        section: "projecoes_cenarios",
        step: 11,
        message: "Gerando projeções e cenários",
        kind: StageKind::Computed,
        max_tokens: 0,
    },
    StageSpec {
        key: StageKey::ActionPlan,
        section: "plano_acao_detalhado",
        step: 12,
        message: "Criando plano de ação detalhado",
        kind: StageKind::Computed,
        max_tokens: 0,
    },
    StageSpec {
        key: StageKey::Insights,
        section: "insights_exclusivos",
        step: 13,
        message: "Consolidando insights exclusivos",
        kind: StageKind::Computed,
        max_tokens: 0,
    },
];

impl StageKey {
    pub fn spec(self) -> &'static StageSpec {
        // STAGES is declared in StageKey order
        &STAGES[self as usize]
    }
}

/// Report keys of every section, in pipeline order.
pub fn section_keys() -> impl Iterator<Item = &'static str> {
    STAGES.iter().map(|s| s.section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_by_step_and_key() {
        for (index, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.step, index + 1);
            assert_eq!(stage.key.spec(), stage);
        }
    }

    #[test]
    fn only_competition_uses_the_smaller_ceiling() {
        let llm: Vec<_> = STAGES
            .iter()
            .filter(|s| matches!(s.kind, StageKind::LlmObject | StageKind::LlmList))
            .collect();
        assert_eq!(llm.len(), 6);
        for stage in llm {
            let expected = if stage.key == StageKey::Competition {
                COMPETITION_MAX_TOKENS
            } else {
                DEFAULT_MAX_TOKENS
            };
            assert_eq!(stage.max_tokens, expected, "{}", stage.section);
        }
    }
}
