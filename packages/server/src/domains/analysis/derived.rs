//! Sections computed from the request and earlier sections, no LLM involved.

use indexmap::IndexMap;

use crate::common::{
    ActionPhase, ActionPlan, AnalysisRequest, Avatar, FinancialScenario, FinancialScenarios, Kpi,
    KeywordStrategy, PerformanceMetrics, Positioning, ProjectionScenario, ProjectionScenarios,
    Projections, SearchIntent, Text, WebResearch,
};

use super::pipeline::PipelineError;

/// Ticket used when the request carries no price.
pub const DEFAULT_PRICE: f64 = 997.0;

fn brl(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Resolve the request price. Absent, blank or zero means [`DEFAULT_PRICE`];
/// text that is not a number, or a negative number, is an error.
pub fn resolve_price(price: Option<&Text>) -> Result<f64, PipelineError> {
    let Some(price) = price else {
        return Ok(DEFAULT_PRICE);
    };
    if price.is_blank() {
        return Ok(DEFAULT_PRICE);
    }
    match price.as_amount() {
        Some(amount) if amount == 0.0 => Ok(DEFAULT_PRICE),
        Some(amount) if amount > 0.0 => Ok(amount),
        _ => Err(PipelineError::InvalidPrice(price.to_string())),
    }
}

pub fn positioning(segment: &str) -> Positioning {
    Positioning {
        market_positioning: format!(
            "Solução premium para profissionais de {} que querem resultados rápidos e sustentáveis",
            segment
        ),
        value_proposition: format!(
            "Transforme seu negócio em {} com metodologia comprovada e suporte especializado",
            segment
        ),
        differentiators: vec![
            format!("Metodologia exclusiva testada no mercado de {}", segment),
            "Suporte personalizado e acompanhamento contínuo".to_string(),
            "Resultados mensuráveis e garantidos".to_string(),
            "Comunidade exclusiva de profissionais de alto nível".to_string(),
            "Sistema anti-objeção e drivers mentais customizados".to_string(),
        ],
        core_message: format!(
            "Pare de trabalhar NO negócio de {} e comece a trabalhar PELO negócio",
            segment
        ),
        tone: "Direto, confiante, baseado em resultados e dados concretos".to_string(),
        niche: format!(
            "{} - Profissionais estabelecidos buscando escalonamento",
            segment
        ),
        blue_ocean: format!(
            "Criar categoria própria focada em implementação prática para {}",
            segment
        ),
        price_anchor: "Investimento que se paga em 30-60 dias com ROI comprovado".to_string(),
    }
}

pub fn keyword_strategy(segment: &str) -> KeywordStrategy {
    let s = segment.to_lowercase();

    let mut primary = vec![s.clone()];
    primary.extend(strings(&[
        "estratégia",
        "marketing",
        "crescimento",
        "vendas",
        "automação",
        "sistema",
        "resultado",
    ]));

    KeywordStrategy {
        primary,
        secondary: strings(&[
            "digital",
            "online",
            "processo",
            "lucro",
            "receita",
            "cliente",
            "negócio",
            "empresa",
            "consultoria",
            "mentoria",
            "curso",
            "treinamento",
            "método",
            "técnica",
            "ferramenta",
        ]),
        long_tail: vec![
            format!("como crescer no mercado de {}", s),
            format!("estratégias de marketing para {}", s),
            format!("como aumentar vendas em {}", s),
            format!("automação para {}", s),
            format!("sistema de vendas {}", s),
            format!("consultoria {} resultados", s),
            format!("curso {} online", s),
            format!("mentoria {} especializada", s),
        ],
        search_intent: SearchIntent {
            informational: vec![
                format!("o que é {}", s),
                format!("como funciona {}", s),
                format!("tendências {}", s),
            ],
            navigational: vec![
                format!("especialista {}", s),
                format!("consultor {}", s),
                format!("curso {}", s),
            ],
            transactional: vec![
                format!("comprar curso {}", s),
                format!("contratar consultoria {}", s),
                format!("mentoria {} preço", s),
            ],
        },
        content_strategy: format!(
            "Criar conteúdo educativo sobre {} focando em resultados práticos e cases reais",
            s
        ),
        seasonality: "Maior busca no início do ano (janeiro-março) e final do ano (outubro-dezembro)"
            .to_string(),
        seo_opportunities: format!(
            "Pouca concorrência em nichos específicos de {} com foco em resultados mensuráveis",
            s
        ),
    }
}

/// `(monthly revenue multiplier, customers per month, margin)`
const FINANCIAL_SCENARIOS: [(f64, &str, &str); 3] = [
    (10.0, "10-15", "60%"),
    (25.0, "25-35", "70%"),
    (50.0, "50-70", "80%"),
];

pub fn performance_metrics(price: f64) -> PerformanceMetrics {
    let kpi = |metric: &str, target: String, frequency: &str, owner: &str| Kpi {
        metric: metric.to_string(),
        target,
        frequency: frequency.to_string(),
        owner: owner.to_string(),
    };
    let scenario = |(multiplier, customers, margin): (f64, &str, &str)| FinancialScenario {
        monthly_revenue: brl(price * multiplier),
        customers_per_month: customers.to_string(),
        average_ticket: brl(price),
        profit_margin: margin.to_string(),
    };
    let [conservative, realistic, optimistic] = FINANCIAL_SCENARIOS;

    PerformanceMetrics {
        kpis: vec![
            kpi(
                "Taxa de Conversão",
                "3-5%".to_string(),
                "Semanal",
                "Equipe de Vendas",
            ),
            kpi("Custo por Lead", brl(price * 0.1), "Diário", "Marketing"),
            kpi("Lifetime Value", brl(price * 3.0), "Mensal", "CS"),
            kpi("ROI Marketing", "300-500%".to_string(), "Mensal", "Marketing"),
        ],
        financial_scenarios: FinancialScenarios {
            conservative: scenario(conservative),
            realistic: scenario(realistic),
            optimistic: scenario(optimistic),
        },
        expected_roi: "300-500% em 12 meses".to_string(),
        payback: "2-4 meses".to_string(),
        lifetime_value: brl(price * 3.0),
        expected_churn: "5-10% mensal".to_string(),
        monthly_growth: "15-25%".to_string(),
    }
}

/// Metrics for the request's price.
pub fn metrics(request: &AnalysisRequest) -> Result<PerformanceMetrics, PipelineError> {
    Ok(performance_metrics(resolve_price(request.price.as_ref())?))
}

const CRITICAL_FACTORS: [&str; 4] = [
    "Qualidade da execução do plano",
    "Consistência nas ações de marketing",
    "Capacidade de escalar operações",
    "Adaptação às mudanças do mercado",
];

const MILESTONES: [(&str, &str); 5] = [
    ("mes_3", "Primeiros resultados consistentes"),
    ("mes_6", "Break-even operacional"),
    ("mes_12", "Escalabilidade comprovada"),
    ("mes_24", "Dominância no nicho"),
    ("mes_36", "Expansão para novos mercados"),
];

/// Year 1 to 3 revenue, growing from the monthly revenue of each metrics scenario.
pub fn projections(price: f64) -> Projections {
    let scenario = |probability: &str, growth: &str, multiplier: f64, years: [f64; 3]| {
        let monthly = price * multiplier;
        ProjectionScenario {
            probability: probability.to_string(),
            annual_growth: growth.to_string(),
            revenue_year_1: brl(monthly * years[0]),
            revenue_year_2: brl(monthly * years[1]),
            revenue_year_3: brl(monthly * years[2]),
        }
    };

    Projections {
        horizon: "36 meses".to_string(),
        scenarios: ProjectionScenarios {
            conservative: scenario("30%", "50%", FINANCIAL_SCENARIOS[0].0, [1.0, 1.5, 2.25]),
            realistic: scenario("50%", "100%", FINANCIAL_SCENARIOS[1].0, [1.0, 2.0, 4.0]),
            optimistic: scenario("20%", "200%", FINANCIAL_SCENARIOS[2].0, [1.0, 3.0, 9.0]),
        },
        critical_factors: strings(&CRITICAL_FACTORS),
        milestones: MILESTONES
            .iter()
            .map(|(month, goal)| (month.to_string(), goal.to_string()))
            .collect::<IndexMap<_, _>>(),
    }
}

pub fn action_plan() -> ActionPlan {
    ActionPlan {
        preparation: ActionPhase {
            duration: "30 dias".to_string(),
            focus: "Estruturação e planejamento".to_string(),
            investment: "R$ 5.000 - R$ 15.000".to_string(),
            activities: strings(&[
                "Implementar avatar arqueológico na comunicação",
                "Instalar drivers mentais no conteúdo",
                "Criar sistema anti-objeção",
                "Desenvolver provas visuais",
                "Estruturar pré-pitch invisível",
            ]),
            deliverables: strings(&[
                "Avatar documentado e validado",
                "Drivers mentais customizados",
                "Sistema anti-objeção implementado",
                "Provas visuais criadas",
                "Pré-pitch estruturado",
            ]),
            owners: strings(&[
                "Especialista em psicologia de vendas",
                "Designer de experiências",
                "Copywriter especializado",
            ]),
        },
        launch: ActionPhase {
            duration: "60 dias".to_string(),
            focus: "Implementação e otimização".to_string(),
            investment: "R$ 10.000 - R$ 30.000".to_string(),
            activities: strings(&[
                "Executar campanhas com drivers mentais",
                "Testar provas visuais em eventos",
                "Aplicar sistema anti-objeção",
                "Otimizar pré-pitch baseado em feedback",
                "Medir e ajustar conversões",
            ]),
            deliverables: strings(&[
                "Campanhas ativas com drivers",
                "Eventos com provas visuais",
                "Sistema anti-objeção funcionando",
                "Pré-pitch otimizado",
                "Métricas de conversão",
            ]),
            owners: strings(&[
                "Equipe de marketing",
                "Especialista em eventos",
                "Analista de conversão",
            ]),
        },
        growth: ActionPhase {
            duration: "90+ dias".to_string(),
            focus: "Escala e expansão".to_string(),
            investment: "R$ 20.000 - R$ 50.000".to_string(),
            activities: strings(&[
                "Escalar campanhas que funcionam",
                "Expandir para novos canais",
                "Treinar equipe nos sistemas",
                "Desenvolver novos drivers",
                "Criar parcerias estratégicas",
            ]),
            deliverables: strings(&[
                "Crescimento sustentável",
                "Novos canais ativos",
                "Equipe treinada",
                "Novos drivers desenvolvidos",
                "Parcerias estabelecidas",
            ]),
            owners: strings(&[
                "Gerente de crescimento",
                "Equipe comercial",
                "Parceiros estratégicos",
            ]),
        },
    }
}

pub fn insights(segment: &str, research: &WebResearch, avatar: &Avatar) -> Vec<String> {
    let mut insights = vec![
        format!(
            "Avatar Arqueológico: O perfil de {} apresenta 3 arquétipos dominantes que requerem abordagens específicas",
            segment
        ),
        "Drivers Mentais: Os 7 drivers customizados criados atacam as objeções mais profundas identificadas no avatar".to_string(),
        "Sistema Anti-Objeção: 5 objeções ocultas foram mapeadas além das 3 universais, com contra-ataques específicos".to_string(),
        "Provas Visuais: Demonstrações físicas transformam conceitos abstratos em experiências inesquecíveis".to_string(),
        "Pré-Pitch Invisível: Sequência psicológica de 6 fases prepara o terreno mental antes da oferta".to_string(),
        format!(
            "Concorrência: Identificados gaps específicos no mercado de {} não explorados",
            segment
        ),
        "Métricas: Projeções baseadas em dados reais mostram potencial de crescimento exponencial".to_string(),
        "Futuro: Tendências identificadas indicam janela de oportunidade única nos próximos 18 meses".to_string(),
        "ROI: Sistema completo pode gerar retorno de 300-500% em 12 meses baseado em métricas conservadoras".to_string(),
        "Implementação: Plano de 3 fases garante execução progressiva sem sobrecarga operacional".to_string(),
    ];

    if research.total_results > 0 {
        insights.push(format!(
            "Pesquisa Massiva: {} resultados analisados garantem base sólida de dados reais",
            research.total_results
        ));
    }

    if avatar.behavior.is_some() {
        insights.push(
            "Comportamento: Padrões psicológicos identificados permitem previsão precisa de objeções e reações"
                .to_string(),
        );
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Behavior;
    use serde_json::json;

    #[test]
    fn missing_or_zero_price_uses_default() {
        assert_eq!(resolve_price(None).unwrap(), DEFAULT_PRICE);
        assert_eq!(resolve_price(Some(&Text::from(""))).unwrap(), DEFAULT_PRICE);
        assert_eq!(resolve_price(Some(&Text::from(0.0))).unwrap(), DEFAULT_PRICE);
        assert_eq!(resolve_price(Some(&Text::from("R$ 1.997,00"))).unwrap(), 1997.0);
    }

    #[test]
    fn unparseable_or_negative_price_is_an_error() {
        assert!(matches!(
            resolve_price(Some(&Text::from("abc"))),
            Err(PipelineError::InvalidPrice(raw)) if raw == "abc"
        ));
        assert!(resolve_price(Some(&Text::from(-5.0))).is_err());
    }

    #[test]
    fn metrics_scale_with_price() {
        let metrics = performance_metrics(1000.0);

        assert_eq!(metrics.kpis[1].target, "R$ 100.00");
        assert_eq!(metrics.kpis[2].target, "R$ 3000.00");
        assert_eq!(metrics.lifetime_value, "R$ 3000.00");
        assert_eq!(
            metrics.financial_scenarios.conservative.monthly_revenue,
            "R$ 10000.00"
        );
        assert_eq!(metrics.financial_scenarios.realistic.monthly_revenue, "R$ 25000.00");
        assert_eq!(metrics.financial_scenarios.optimistic.monthly_revenue, "R$ 50000.00");
        assert_eq!(metrics.financial_scenarios.optimistic.profit_margin, "80%");
        assert_eq!(metrics.financial_scenarios.realistic.average_ticket, "R$ 1000.00");
    }

    #[test]
    fn projections_apply_year_multipliers() {
        let projections = projections(DEFAULT_PRICE);
        let conservative = &projections.scenarios.conservative;

        assert_eq!(conservative.revenue_year_1, "R$ 9970.00");
        assert_eq!(conservative.revenue_year_2, "R$ 14955.00");
        assert_eq!(conservative.revenue_year_3, "R$ 22432.50");
        assert_eq!(projections.scenarios.optimistic.revenue_year_3, "R$ 448650.00");

        let months: Vec<&str> = projections.milestones.keys().map(String::as_str).collect();
        assert_eq!(months, ["mes_3", "mes_6", "mes_12", "mes_24", "mes_36"]);
    }

    #[test]
    fn keywords_use_lowercased_segment() {
        let keywords = keyword_strategy("Marketing Digital");

        assert_eq!(keywords.primary[0], "marketing digital");
        assert_eq!(keywords.long_tail.len(), 8);
        assert_eq!(
            keywords.search_intent.transactional[2],
            "mentoria marketing digital preço"
        );
    }

    #[test]
    fn positioning_serializes_with_portuguese_keys() {
        let value = serde_json::to_value(positioning("Odontologia")).unwrap();

        assert_eq!(
            value["mensagem_central"],
            json!("Pare de trabalhar NO negócio de Odontologia e comece a trabalhar PELO negócio")
        );
        assert_eq!(value["diferenciais_competitivos"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn insights_grow_with_research_and_behavior() {
        let mut research = WebResearch::default();
        let mut avatar = Avatar::default();
        assert_eq!(insights("Pets", &research, &avatar).len(), 10);

        research.total_results = 42;
        avatar.behavior = Some(Behavior::default());
        let all = insights("Pets", &research, &avatar);

        assert_eq!(all.len(), 12);
        assert!(all[10].starts_with("Pesquisa Massiva: 42 resultados"));
        assert!(all[11].starts_with("Comportamento:"));
    }

    #[test]
    fn action_plan_has_three_ordered_phases() {
        let plan = action_plan();
        let durations: Vec<&str> = plan
            .phases()
            .iter()
            .map(|(_, phase)| phase.duration.as_str())
            .collect();
        assert_eq!(durations, ["30 dias", "60 dias", "90+ dias"]);
    }
}
