//! Canned requests, LLM answers and reports.

use analyzer_core::common::{AnalysisReport, AnalysisRequest, Text};
use analyzer_core::domains::analysis::AnalysisEngine;
use analyzer_core::kernel::test_dependencies::{search_result, MockAI, MockSearchService, MockWebScraper};
use analyzer_core::kernel::TestDependencies;
use serde_json::{json, Value};

pub fn fitness_request() -> AnalysisRequest {
    let mut request = AnalysisRequest::new("Fitness");
    request.product = Some(Text::from("Consultoria online"));
    request.price = Some(Text::from("497"));
    request.audience = Some(Text::from("Mulheres 30+"));
    request.revenue_goal = Some(Text::from(50_000.0));
    request
}

pub fn avatar_answer() -> Value {
    json!({
        "nome_ficticio": "Carla Ativa",
        "perfil_demografico_detalhado": {
            "idade": "32-45 anos",
            "genero": "Feminino",
            "renda": "R$ 6.000 - R$ 12.000",
            "escolaridade": "Superior completo",
            "localizacao": "Capitais do Sudeste"
        },
        "analise_dores": {
            "top_10_dores_estruturadas": [
                {"dor": "Falta de tempo para treinar", "frequencia": "diária", "contexto": "rotina de trabalho"}
            ]
        },
        "desejos_motivacoes": {"sonhos_profundos": ["Sentir-se confiante no próprio corpo"]}
    })
}

pub fn drivers_answer() -> Value {
    json!([
        {
            "nome": "Relógio Biológico",
            "gatilho_central": "Urgência",
            "definicao_visceral": "Cada mês parado custa mais para recuperar",
            "roteiro_ativacao": {
                "pergunta_abertura": "Quanto tempo você ainda vai adiar?",
                "historia_analogia": "A Carla esperou o momento perfeito por três anos",
                "comando_acao": "Comece hoje"
            },
            "frases_ancoragem": ["O corpo não espera"]
        }
    ])
}

/// Mocks for a run where every LLM stage answers with usable JSON.
pub fn scripted_deps() -> TestDependencies {
    let ai = MockAI::new()
        .with_json_response(&avatar_answer())
        .with_json_response(&drivers_answer())
        .with_json_response(&json!({"objecoes_universais": {"tempo": {"objecao": "Não tenho tempo", "contra_ataque": "20 minutos por dia"}}}))
        .with_json_response(&json!([{"nome": "Balança de Energia", "conceito_alvo": "Constância", "experimento": "Dois copos de água"}]))
        .with_json_response(&json!({"orquestracao_emocional": {"sequencia_psicologica": [{"fase": "Quebra", "objetivo": "Despertar", "tempo": "3 min"}]}}))
        .with_json_response(&json!({"concorrentes_diretos": [{"nome": "Academia Tradicional", "analise_swot": {"forcas": ["Estrutura"], "fraquezas": ["Horários rígidos"]}}]}));

    let search = MockSearchService::new().with_default_results(vec![
        search_result("https://exemplo.com.br/fitness-mercado"),
        search_result("https://exemplo.com.br/tendencias"),
    ]);
    let scraper = MockWebScraper::new()
        .with_default_content("O mercado fitness brasileiro cresce 12% ao ano com foco em treinos online.");

    TestDependencies::new()
        .mock_ai(ai)
        .mock_search(search)
        .mock_scraper(scraper)
}

/// A complete report produced by the pipeline over mocks.
pub async fn generated_report(request: &AnalysisRequest) -> AnalysisReport {
    let deps = scripted_deps().into_deps();
    AnalysisEngine::new(&deps).generate(request, None).await
}
