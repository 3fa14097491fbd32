//! Static substitutes used when a stage cannot produce its section.
//!
//! The literal content lives in the tables at the top; the functions below
//! only shape it into section types.

use indexmap::IndexMap;

use crate::common::{
    ActivationScript, Archetype, AntiObjection, Avatar, Behavior, Competition, Competitor,
    Demographics, EmotionalOrchestration, MentalDriver, Objection, PitchPhase, PrePitch, Swot,
    Text, VisualProof,
};

/// `(key, share, description)`
const ARCHETYPES: [(&str, &str, &str); 3] = [
    (
        "tecnico_aprisionado",
        "30%",
        "Profissional técnico preso na execução",
    ),
    (
        "escalador_frustrado",
        "40%",
        "Empreendedor estagnado no mesmo nível",
    ),
    (
        "visionario_sufocado",
        "30%",
        "Líder com visão mas equipe que não acompanha",
    ),
];

/// `(age, gender, income, education, location)`
const DEMOGRAPHICS: (&str, &str, &str, &str, &str) = (
    "30-45 anos - faixa de maior poder aquisitivo",
    "55% masculino, 45% feminino",
    "R$ 8.000 - R$ 35.000 - classe média alta",
    "Superior completo - 78% têm graduação",
    "Grandes centros urbanos brasileiros",
);

/// `(key, objection, counter)`
const UNIVERSAL_OBJECTIONS: [(&str, &str, &str); 2] = [
    (
        "tempo",
        "Não tenho tempo agora",
        "Tempo não é sobre ter, é sobre priorizar",
    ),
    (
        "dinheiro",
        "Está caro",
        "Caro é continuar perdendo oportunidades",
    ),
];

fn text(s: &str) -> Option<Text> {
    Some(Text::from(s))
}

pub fn avatar(segment: &str) -> Avatar {
    let (age, gender, income, education, location) = DEMOGRAPHICS;
    let archetypes: IndexMap<String, Archetype> = ARCHETYPES
        .iter()
        .map(|(key, share, description)| {
            (
                key.to_string(),
                Archetype {
                    share: text(share),
                    description: text(description),
                    ..Default::default()
                },
            )
        })
        .collect();

    Avatar {
        persona_name: Some(Text::from(format!("Profissional {} Brasileiro", segment))),
        demographics: Some(Demographics {
            age: text(age),
            gender: text(gender),
            income: text(income),
            education: text(education),
            location: text(location),
            ..Default::default()
        }),
        behavior: Some(Behavior {
            archetypes,
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn mental_drivers(segment: &str) -> Vec<MentalDriver> {
    vec![MentalDriver {
        name: text("Diagnóstico Brutal"),
        trigger: text("Confronto com realidade atual"),
        definition: text("Expor a situação real sem filtros"),
        activation: Some(ActivationScript {
            opening_question: Some(Text::from(format!(
                "Há quanto tempo você está no mesmo nível em {}?",
                segment
            ))),
            call_to_action: text("Pare de aceitar mediocridade"),
            ..Default::default()
        }),
        ..Default::default()
    }]
}

pub fn anti_objection() -> AntiObjection {
    AntiObjection {
        universal: UNIVERSAL_OBJECTIONS
            .iter()
            .map(|(key, objection, counter)| {
                (
                    key.to_string(),
                    Objection {
                        objection: text(objection),
                        counter: text(counter),
                        ..Default::default()
                    },
                )
            })
            .collect(),
        ..Default::default()
    }
}

pub fn visual_proofs() -> Vec<VisualProof> {
    vec![VisualProof {
        name: text("Demonstração do Custo"),
        target_concept: text("Mostrar custo da inação"),
        experiment: text("Calculadora mostrando perdas mensais"),
        ..Default::default()
    }]
}

pub fn pre_pitch() -> PrePitch {
    PrePitch {
        orchestration: Some(EmotionalOrchestration {
            sequence: vec![PitchPhase {
                phase: text("QUEBRA"),
                goal: text("Despertar consciência"),
                duration: text("3 minutos"),
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn competition(segment: &str) -> Competition {
    Competition {
        direct_competitors: vec![Competitor {
            name: Some(Text::from(format!("Concorrente Principal {}", segment))),
            swot: Some(Swot {
                strengths: vec![Text::from("Marca estabelecida")],
                weaknesses: vec![Text::from("Processos lentos")],
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}
