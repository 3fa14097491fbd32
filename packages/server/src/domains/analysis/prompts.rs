//! Prompt builders for the LLM stages.
//!
//! Each prompt is a fixed instruction header, the request fields and prior
//! sections the stage depends on (truncated to a per-stage budget), and a
//! JSON skeleton the answer must follow.

use serde::Serialize;

use crate::common::{
    truncate_chars, AnalysisRequest, Avatar, MentalDriver, OrNa, WebResearch, NA,
};

pub const AVATAR_RESEARCH_CHARS: usize = 5000;
pub const DRIVERS_AVATAR_CHARS: usize = 3000;
pub const ANTI_OBJECTION_AVATAR_CHARS: usize = 3000;
pub const PROOFS_DRIVERS_CHARS: usize = 2000;
pub const PRE_PITCH_DRIVERS_CHARS: usize = 3000;
pub const PRE_PITCH_AVATAR_CHARS: usize = 2000;
pub const COMPETITION_RESEARCH_CHARS: usize = 4000;

/// One entry of the universal driver catalog the drivers stage customizes.
#[derive(Debug, Clone, Copy)]
pub struct UniversalDriver {
    pub name: &'static str,
    pub trigger: &'static str,
    pub mechanic: &'static str,
    pub activation: &'static str,
    pub emotional: bool,
}

const fn driver(
    name: &'static str,
    trigger: &'static str,
    mechanic: &'static str,
    activation: &'static str,
    emotional: bool,
) -> UniversalDriver {
    UniversalDriver {
        name,
        trigger,
        mechanic,
        activation,
        emotional,
    }
}

pub const UNIVERSAL_DRIVERS: [UniversalDriver; 19] = [
    driver("FERIDA EXPOSTA", "Dor não resolvida", "Trazer à consciência o que foi reprimido",
        "Você ainda [comportamento doloroso] mesmo sabendo que [consequência]?", true),
    driver("TROFÉU SECRETO", "Desejo inconfessável", "Validar ambições proibidas",
        "Não é sobre dinheiro, é sobre [desejo real oculto]", true),
    driver("INVEJA PRODUTIVA", "Comparação com pares", "Transformar inveja em combustível",
        "Enquanto você [situação atual], outros como você [resultado desejado]", true),
    driver("RELÓGIO PSICOLÓGICO", "Urgência existencial", "Tempo como recurso finito",
        "Quantos [período] você ainda vai [desperdício]?", true),
    driver("IDENTIDADE APRISIONADA", "Conflito entre quem é e quem poderia ser",
        "Expor a máscara social", "Você não é [rótulo limitante], você é [potencial real]", true),
    driver("CUSTO INVISÍVEL", "Perda não percebida", "Quantificar o preço da inação",
        "Cada dia sem [solução] custa [perda específica]", true),
    driver("AMBIÇÃO EXPANDIDA", "Sonhos pequenos demais", "Elevar o teto mental de possibilidades",
        "Se o esforço é o mesmo, por que você está pedindo tão pouco?", true),
    driver("DIAGNÓSTICO BRUTAL", "Confronto com a realidade atual",
        "Criar indignação produtiva com status quo",
        "Olhe seus números/situação. Até quando você vai aceitar isso?", true),
    driver("AMBIENTE VAMPIRO", "Consciência do entorno tóxico",
        "Revelar como ambiente atual suga energia/potencial",
        "Seu ambiente te impulsiona ou te mantém pequeno?", true),
    driver("MENTOR SALVADOR", "Necessidade de orientação externa",
        "Ativar desejo por figura de autoridade que acredita neles",
        "Você precisa de alguém que veja seu potencial quando você não consegue", true),
    driver("CORAGEM NECESSÁRIA", "Medo paralisante disfarçado",
        "Transformar desculpas em decisões corajosas",
        "Não é sobre condições perfeitas, é sobre decidir apesar do medo", true),
    driver("MECANISMO REVELADO", "Compreensão do como", "Desmistificar o complexo",
        "É simplesmente [analogia simples], não [complicação percebida]", false),
    driver("PROVA MATEMÁTICA", "Certeza numérica", "Equação irrefutável",
        "Se você fizer X por Y dias = Resultado Z garantido", false),
    driver("PADRÃO OCULTO", "Insight revelador", "Mostrar o que sempre esteve lá",
        "Todos que conseguiram [resultado] fizeram [padrão específico]", false),
    driver("EXCEÇÃO POSSÍVEL", "Quebra de limitação", "Provar que regras podem ser quebradas",
        "Diziam que [limitação], mas [prova contrária]", false),
    driver("ATALHO ÉTICO", "Eficiência sem culpa", "Validar o caminho mais rápido",
        "Por que sofrer [tempo longo] se existe [atalho comprovado]?", false),
    driver("DECISÃO BINÁRIA", "Simplificação radical", "Eliminar zona cinzenta",
        "Ou você [ação desejada] ou aceita [consequência dolorosa]", false),
    driver("OPORTUNIDADE OCULTA", "Vantagem não percebida",
        "Revelar demanda/chance óbvia mas ignorada",
        "O mercado está gritando por [solução] e ninguém está ouvindo", false),
    driver("MÉTODO VS SORTE", "Caos vs sistema",
        "Contrastar tentativa aleatória com caminho estruturado",
        "Sem método você está cortando mata com foice. Com método, está na autoestrada", false),
];

fn driver_catalog() -> String {
    let section = |emotional: bool| {
        UNIVERSAL_DRIVERS
            .iter()
            .filter(|d| d.emotional == emotional)
            .map(|d| {
                format!(
                    "- {}: gatilho \"{}\"; mecânica \"{}\"; ativação \"{}\"",
                    d.name, d.trigger, d.mechanic, d.activation
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "### Emocionais primários\n{}\n\n### Racionais complementares\n{}",
        section(true),
        section(false)
    )
}

const AVATAR_SKELETON: &str = r#"```json
{
  "nome_ficticio": "Nome representativo baseado em dados reais",
  "visao_geral": {
    "publico_analisado": "Descrição detalhada do público",
    "principais_desafios": ["Principais desafios identificados com percentuais"]
  },
  "analise_dores": {
    "top_10_dores_estruturadas": [
      {
        "dor": "Nome da dor",
        "frequencia": "Percentual de menções",
        "contexto": "Contexto detalhado da dor",
        "impacto": "Como impacta o negócio"
      }
    ],
    "convergencia_principal": "Principal convergência identificada",
    "gap_identificado": "Principal gap identificado"
  },
  "desejos_motivacoes": {
    "sonhos_profundos": ["Sonho: descrição detalhada"],
    "desejos_expressos": ["Desejos expressos diretamente"]
  },
  "comportamento": {
    "arquetipos_dominantes": {
      "tecnico_aprisionado": {"percentual": "30%", "descricao": "Descrição do arquétipo"},
      "escalador_frustrado": {"percentual": "40%", "descricao": "Descrição do arquétipo"},
      "visionario_sufocado": {"percentual": "30%", "descricao": "Descrição do arquétipo"}
    },
    "medos_paralisantes": ["Medo: descrição detalhada"],
    "objecoes_reais": ["Objeção: análise detalhada"]
  },
  "insights_ocultos": {
    "gatilhos_emocionais": ["Gatilho: como ativar"],
    "abordagens_impacto": ["Abordagem: como aplicar"]
  },
  "perfil_demografico_detalhado": {
    "idade": "Faixa etária com justificativa",
    "genero": "Distribuição por gênero",
    "renda": "Faixa de renda",
    "escolaridade": "Nível educacional predominante",
    "localizacao": "Regiões geográficas principais"
  },
  "perfil_psicografico_detalhado": {
    "personalidade": "Traços dominantes",
    "valores": "Valores principais",
    "estilo_vida": "Como vive o dia a dia",
    "comportamento_compra": "Processo de decisão"
  },
  "linguagem_comunicacao": {
    "frases_dor": ["Frases que usam para expressar dor"],
    "frases_desejo": ["Frases que usam para expressar desejos"],
    "vocabulario_especifico": ["Palavras e gírias do nicho"]
  }
}
```"#;

const DRIVERS_SKELETON: &str = r#"```json
[
  {
    "nome": "Nome impactante do driver (máximo 3 palavras)",
    "gatilho_central": "A emoção ou lógica core",
    "definicao_visceral": "1-2 frases que capturam a essência",
    "mecanica_psicologica": "Como funciona no cérebro",
    "momento_instalacao": "Quando plantar durante a jornada",
    "roteiro_ativacao": {
      "pergunta_abertura": "Pergunta que expõe a ferida",
      "historia_analogia": "História que ilustra o conceito",
      "metafora_visual": "Metáfora que ancora na memória",
      "comando_acao": "Comando que direciona o comportamento"
    },
    "frases_ancoragem": ["3-5 frases prontas para usar"],
    "prova_logica": {
      "estatistica": "Dado que sustenta",
      "caso_exemplo": "Exemplo real",
      "demonstracao": "Como provar na prática"
    },
    "loop_reforco": "Como reativar em momentos posteriores",
    "categoria": "Emocional Primário/Racional Complementar",
    "poder_impacto": "Alto/Médio/Baixo"
  }
]
```

FOQUE nos drivers mais poderosos para este avatar:
1. Diagnóstico Brutal
2. Ambição Expandida
3. Relógio Psicológico
4. Método vs Sorte
5. Decisão Binária
6. Ambiente Vampiro
7. Coragem Necessária"#;

const ANTI_OBJECTION_SKELETON: &str = r#"```json
{
  "objecoes_universais": {
    "tempo": {
      "objecao": "Frase típica usada",
      "raiz_emocional": "Verdadeira causa emocional",
      "contra_ataque": "Como neutralizar especificamente"
    },
    "dinheiro": {
      "objecao": "Frase típica usada",
      "raiz_emocional": "Verdadeira causa emocional",
      "contra_ataque": "Como neutralizar especificamente"
    },
    "confianca": {
      "objecao": "Frase típica usada",
      "raiz_emocional": "Verdadeira causa emocional",
      "contra_ataque": "Como neutralizar especificamente"
    }
  },
  "objecoes_ocultas": {
    "autossuficiencia": {
      "sinais": ["Como identificar esta objeção"],
      "perfil_tipico": "Quem tem esta objeção",
      "raiz_emocional": "Medo de parecer incompetente",
      "contra_ataque": "História de expert que precisou de expert"
    },
    "ajuda_como_fraqueza": {"sinais": [], "perfil_tipico": "", "raiz_emocional": "", "contra_ataque": ""},
    "medo_mudanca": {"sinais": [], "perfil_tipico": "", "raiz_emocional": "", "contra_ataque": ""},
    "prioridades_desequilibradas": {"sinais": [], "perfil_tipico": "", "raiz_emocional": "", "contra_ataque": ""},
    "autoestima_destruida": {"sinais": [], "perfil_tipico": "", "raiz_emocional": "", "contra_ataque": ""}
  },
  "arsenal_emergencia": ["Scripts para objeções de última hora"],
  "implementacao_estrategica": {
    "pre_lancamento": "Drivers para cada semana",
    "durante_evento": "Momentos específicos para cada objeção",
    "momento_oferta": "Sequência de destruição",
    "pos_oferta": "Objeções de última hora"
  }
}
```"#;

const PROOFS_SKELETON: &str = r#"```json
[
  {
    "nome": "Nome impactante da demonstração",
    "conceito_alvo": "O que precisa ser instalado ou destruído",
    "categoria": "Urgência/Crença/Objeção/Transformação/Método",
    "prioridade": "Crítica/Alta/Média",
    "objetivo_psicologico": "Que mudança mental queremos",
    "experimento": "Descrição clara da demonstração física",
    "analogia": "Assim como [experimento] → Você [aplicação na vida]",
    "roteiro_completo": {
      "setup": "Introdução e preparação (30s)",
      "execucao": "Passos da demonstração (30-90s)",
      "climax": "Momento exato do AHA! (15s)",
      "bridge": "Conexão com a vida deles (30s)"
    },
    "materiais": ["Materiais necessários"]
  }
]
```

FOQUE em PROVIs que demonstrem:
1. Custo da inação
2. Poder da transformação
3. Simplicidade do método
4. Urgência temporal
5. Diferença entre tentativa e sistema"#;

const PRE_PITCH_SKELETON: &str = r#"```json
{
  "orquestracao_emocional": {
    "objetivo": "Criar montanha-russa emocional",
    "sequencia_psicologica": [
      {"fase": "QUEBRA", "objetivo": "Destruir ilusão confortável", "tempo": "3-5 minutos", "driver_usado": "Nome do driver", "tecnicas": ["Técnicas específicas"]},
      {"fase": "EXPOSIÇÃO", "objetivo": "Revelar ferida real", "tempo": "3-5 minutos", "driver_usado": "Nome do driver", "tecnicas": []},
      {"fase": "INDIGNAÇÃO", "objetivo": "Criar revolta produtiva", "tempo": "2-3 minutos", "driver_usado": "Nome do driver", "tecnicas": []},
      {"fase": "VISLUMBRE", "objetivo": "Mostrar o possível", "tempo": "3-4 minutos", "driver_usado": "Nome do driver", "tecnicas": []},
      {"fase": "TENSÃO", "objetivo": "Amplificar o gap", "tempo": "2-3 minutos", "driver_usado": "Nome do driver", "tecnicas": []},
      {"fase": "NECESSIDADE", "objetivo": "Tornar mudança inevitável", "tempo": "3-5 minutos", "driver_usado": "Nome do driver", "tecnicas": []}
    ]
  },
  "justificacao_logica": {
    "numeros_irrefutaveis": "Estatísticas específicas",
    "calculos_roi": "ROI conservador demonstrado",
    "garantias": "Garantias que eliminam risco"
  },
  "roteiro_completo": {
    "abertura": {"tempo": "2 minutos", "script": "Script de abertura"},
    "desenvolvimento": {"tempo": "15 minutos", "fases": [{"nome": "Nome da fase", "tempo": "X minutos", "script": "Script"}]},
    "fechamento": {"tempo": "3 minutos", "script": "Script de fechamento"}
  },
  "templates_prontos": {
    "abertura_padrao": "Template de abertura",
    "transicao_emocao_logica": "Template de transição",
    "fechamento_pre_pitch": "Template de fechamento"
  },
  "sinais_sucesso": {
    "durante": ["Sinais durante o pré-pitch"],
    "apos": ["Sinais após o pré-pitch"]
  }
}
```"#;

const COMPETITION_SKELETON: &str = r#"```json
{
  "concorrentes_diretos": [
    {
      "nome": "Nome real do concorrente",
      "analise_swot": {
        "forcas": ["Principais forças"],
        "fraquezas": ["Fraquezas exploráveis"],
        "oportunidades": ["Oportunidades que eles não veem"],
        "ameacas": ["Ameaças que representam"]
      },
      "estrategia_marketing": "Estratégia principal",
      "posicionamento": "Como se posicionam no mercado",
      "vulnerabilidades": ["Pontos fracos exploráveis"]
    }
  ],
  "gaps_oportunidade": ["Oportunidades não exploradas por ninguém"],
  "benchmarks_setor": {
    "ticket_medio": "Ticket médio do setor",
    "margem_lucro": "Margem típica",
    "tempo_vendas": "Ciclo de vendas médio"
  },
  "estrategias_diferenciacao": ["Como se diferenciar de forma defensável"],
  "analise_precos": {
    "faixa_precos": "Faixa de preços do mercado",
    "posicionamento_preco": "Onde se posicionar",
    "justificativa_premium": "Como justificar preço premium"
  },
  "tendencias_competitivas": "Para onde a concorrência está indo",
  "ameacas_futuras": ["Ameaças competitivas futuras"],
  "vantagens_competitivas": ["Vantagens que podemos explorar"]
}
```"#;

/// Pretty JSON cut to `max_chars`.
fn excerpt<T: Serialize + ?Sized>(value: &T, max_chars: usize) -> String {
    let json = serde_json::to_string_pretty(value).unwrap_or_default();
    truncate_chars(&json, max_chars).to_string()
}

fn price_line(request: &AnalysisRequest) -> String {
    match &request.price {
        Some(price) if !price.is_blank() => format!("R$ {}", price),
        _ => NA.to_string(),
    }
}

fn product_context(request: &AnalysisRequest) -> String {
    format!(
        "- Segmento: {}\n- Produto: {}\n- Preço: {}",
        request.segment(),
        request.product().or_na(),
        price_line(request)
    )
}

pub fn avatar(request: &AnalysisRequest, research: &WebResearch) -> String {
    format!(
        "# DASHBOARD ARQUEOLÓGICO DO AVATAR - ANÁLISE ULTRA-PROFUNDA\n\n\
         Baseado nos dados coletados, crie um avatar arqueológico COMPLETO.\n\n\
         ## DADOS DO PROJETO:\n{}\n- Público: {}\n- Dados Adicionais: {}\n\n\
         ## PESQUISA REALIZADA:\n{}\n\n\
         CRIE UM AVATAR SEGUINDO EXATAMENTE ESTA ESTRUTURA:\n\n{}\n\n\
         IMPORTANTE: Use APENAS dados REAIS baseados na pesquisa. NUNCA invente informações.\n",
        product_context(request),
        request.audience().or_na(),
        request.notes_text().or_na(),
        excerpt(&research.detailed_results, AVATAR_RESEARCH_CHARS),
        AVATAR_SKELETON,
    )
}

pub fn mental_drivers(request: &AnalysisRequest, avatar: &Avatar) -> String {
    format!(
        "# ARQUITETO DE DRIVERS MENTAIS - SISTEMA COMPLETO\n\n\
         Baseado no avatar arqueológico criado, desenvolva um sistema COMPLETO de drivers mentais customizados.\n\n\
         ## AVATAR ANALISADO:\n{}\n\n\
         ## CONTEXTO DO PRODUTO:\n{}\n\n\
         ## 19 DRIVERS MENTAIS UNIVERSAIS (BASE):\n{}\n\n\
         CRIE 7-10 DRIVERS MENTAIS CUSTOMIZADOS seguindo esta estrutura:\n\n{}\n\n\
         Parta dos drivers universais acima e customize CADA um para as dores e desejos \
         específicos identificados no avatar.\n",
        excerpt(avatar, DRIVERS_AVATAR_CHARS),
        product_context(request),
        driver_catalog(),
        DRIVERS_SKELETON,
    )
}

pub fn anti_objection(avatar: &Avatar) -> String {
    format!(
        "# ENGENHARIA PSICOLÓGICA ANTI-OBJEÇÃO\n\n\
         Baseado no avatar arqueológico, crie um SISTEMA COMPLETO de antecipação e destruição de objeções.\n\n\
         ## AVATAR ANALISADO:\n{}\n\n\
         CRIE o sistema seguindo esta estrutura:\n\n{}\n\n\
         Base-se nas objeções reais identificadas no avatar para criar contra-ataques específicos e eficazes.\n",
        excerpt(avatar, ANTI_OBJECTION_AVATAR_CHARS),
        ANTI_OBJECTION_SKELETON,
    )
}

pub fn visual_proofs(request: &AnalysisRequest, drivers: &[MentalDriver]) -> String {
    format!(
        "# SISTEMA COMPLETO DE PROVAS VISUAIS INSTANTÂNEAS (PROVIs)\n\n\
         Baseado no contexto e drivers mentais, crie um arsenal completo de demonstrações físicas.\n\n\
         ## CONTEXTO:\n{}\n\n\
         ## DRIVERS MENTAIS CRIADOS:\n{}\n\n\
         CRIE 8-12 PROVIs seguindo esta estrutura:\n\n{}\n\n\
         Seja CRIATIVO e MEMORÁVEL.\n",
        product_context(request),
        excerpt(drivers, PROOFS_DRIVERS_CHARS),
        PROOFS_SKELETON,
    )
}

pub fn pre_pitch(drivers: &[MentalDriver], avatar: &Avatar) -> String {
    format!(
        "# ARQUITETO DO PRÉ-PITCH INVISÍVEL\n\n\
         Crie uma SINFONIA DE TENSÃO PSICOLÓGICA usando os drivers mentais criados.\n\n\
         ## DRIVERS DISPONÍVEIS:\n{}\n\n\
         ## AVATAR:\n{}\n\n\
         CRIE o pré-pitch seguindo esta estrutura:\n\n{}\n\n\
         O pré-pitch deve ser tão poderoso que o prospect chegue na oferta já convencido.\n",
        excerpt(drivers, PRE_PITCH_DRIVERS_CHARS),
        excerpt(avatar, PRE_PITCH_AVATAR_CHARS),
        PRE_PITCH_SKELETON,
    )
}

pub fn competition(request: &AnalysisRequest, research: &WebResearch) -> String {
    format!(
        "# ANÁLISE PROFUNDA DE CONCORRÊNCIA\n\n\
         Baseado na pesquisa realizada, faça uma análise competitiva ultra-detalhada.\n\n\
         ## DADOS DO PROJETO:\n- Segmento: {}\n- Concorrentes Mencionados: {}\n\n\
         ## PESQUISA REALIZADA:\n{}\n\n\
         CRIE análise seguindo esta estrutura:\n\n{}\n\n\
         Use APENAS dados REAIS encontrados na pesquisa.\n",
        request.segment(),
        request.competitors_text().or_na(),
        excerpt(&research.detailed_results, COMPETITION_RESEARCH_CHARS),
        COMPETITION_SKELETON,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{QueryResearch, ResearchHit, Text};

    fn research_with_content(chars: usize) -> WebResearch {
        WebResearch {
            detailed_results: vec![QueryResearch {
                query: "q".into(),
                results: vec![ResearchHit {
                    title: "t".into(),
                    url: "https://exemplo.com.br".into(),
                    snippet: "s".into(),
                    provider: "tavily".into(),
                    extracted_content: Some("~".repeat(chars)),
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn avatar_prompt_embeds_request_fields() {
        let mut request = AnalysisRequest::new("Fitness");
        request.product = Some("App de treino".into());
        request.price = Some(Text::from("197"));

        let prompt = avatar(&request, &WebResearch::default());

        assert!(prompt.contains("- Segmento: Fitness"));
        assert!(prompt.contains("- Produto: App de treino"));
        assert!(prompt.contains("- Preço: R$ 197"));
        assert!(prompt.contains("- Público: N/A"));
        assert!(prompt.contains("\"nome_ficticio\""));
    }

    #[test]
    fn drivers_prompt_lists_the_universal_catalog() {
        let prompt = mental_drivers(&AnalysisRequest::new("Fitness"), &Avatar::default());

        for d in &UNIVERSAL_DRIVERS {
            assert!(prompt.contains(d.name), "missing {}", d.name);
        }
        assert_eq!(UNIVERSAL_DRIVERS.iter().filter(|d| d.emotional).count(), 11);

        let emotional = prompt.find("### Emocionais primários").unwrap();
        let rational = prompt.find("### Racionais complementares").unwrap();
        let wound = prompt.find("FERIDA EXPOSTA").unwrap();
        let method = prompt.find("MÉTODO VS SORTE").unwrap();
        assert!(emotional < wound && wound < rational && rational < method);
    }

    #[test]
    fn research_excerpt_respects_budget() {
        let request = AnalysisRequest::new("Fitness");
        let research = research_with_content(50_000);

        let avatar_prompt = avatar(&request, &research);
        let competition_prompt = competition(&request, &research);

        let run = |p: &str| p.matches('~').count();
        assert!(run(&avatar_prompt) <= AVATAR_RESEARCH_CHARS);
        assert!(run(&competition_prompt) <= COMPETITION_RESEARCH_CHARS);
        assert!(run(&avatar_prompt) > run(&competition_prompt));
    }

    #[test]
    fn competitors_list_is_flattened() {
        let mut request = AnalysisRequest::new("Academias");
        request.competitors = Some(serde_json::json!(["Smart Fit", "Bluefit"]));

        let prompt = competition(&request, &WebResearch::default());
        assert!(prompt.contains("- Concorrentes Mencionados: Smart Fit, Bluefit"));
    }

    #[test]
    fn pre_pitch_names_all_six_phases() {
        let prompt = pre_pitch(&[], &Avatar::default());
        for phase in ["QUEBRA", "EXPOSIÇÃO", "INDIGNAÇÃO", "VISLUMBRE", "TENSÃO", "NECESSIDADE"] {
            assert!(prompt.contains(phase), "missing {}", phase);
        }
    }
}
