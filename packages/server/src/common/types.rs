use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::text::{display_value, Text};

/// Inputs for one analysis run, as posted to `/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "segmento", default)]
    pub segment: String,

    #[serde(rename = "produto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Text>,

    #[serde(rename = "preco", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Text>,

    #[serde(rename = "publico", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Text>,

    #[serde(rename = "objetivo_receita", default, skip_serializing_if = "Option::is_none")]
    pub revenue_goal: Option<Text>,

    #[serde(rename = "orcamento_marketing", default, skip_serializing_if = "Option::is_none")]
    pub marketing_budget: Option<Text>,

    #[serde(rename = "prazo_lancamento", default, skip_serializing_if = "Option::is_none")]
    pub launch_timeline: Option<String>,

    /// Free text or a list of names.
    #[serde(rename = "concorrentes", default, skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Value>,

    #[serde(rename = "dados_adicionais", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Text extracted from files uploaded to the same session.
    #[serde(skip)]
    pub attachments_context: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Segmento é obrigatório")]
    MissingSegment,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank_text(value: &Option<Text>) -> Option<String> {
    value
        .as_ref()
        .filter(|text| !text.is_blank())
        .map(|text| text.to_string().trim().to_string())
}

impl AnalysisRequest {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.segment.trim().is_empty() {
            return Err(ValidationError::MissingSegment);
        }
        Ok(())
    }

    pub fn segment(&self) -> &str {
        self.segment.trim()
    }

    pub fn product(&self) -> Option<String> {
        non_blank_text(&self.product)
    }

    pub fn audience(&self) -> Option<String> {
        non_blank_text(&self.audience)
    }

    pub fn session_id(&self) -> Option<&str> {
        non_blank(&self.session_id)
    }

    /// The caller's query, or a default built from segment and product.
    pub fn effective_query(&self) -> String {
        if let Some(query) = non_blank(&self.query) {
            return query.to_string();
        }
        match self.product() {
            Some(product) => format!(
                "mercado {} {} Brasil tendências oportunidades",
                self.segment(),
                product
            ),
            None => format!(
                "análise mercado {} Brasil dados estatísticas crescimento",
                self.segment()
            ),
        }
    }

    pub fn competitors_text(&self) -> Option<String> {
        self.competitors
            .as_ref()
            .filter(|v| !v.is_null())
            .map(display_value)
    }

    /// Caller notes followed by any attachment text.
    pub fn notes_text(&self) -> Option<String> {
        let notes = self.notes.as_ref().filter(|v| !v.is_null()).map(display_value);
        match (notes, self.attachments_context.as_deref()) {
            (Some(notes), Some(extra)) => Some(format!("{}\n\n{}", notes, extra)),
            (Some(notes), None) => Some(notes),
            (None, Some(extra)) => Some(extra.to_string()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_portuguese_field_names() {
        let request: AnalysisRequest = serde_json::from_value(json!({
            "segmento": "Fitness",
            "produto": "Consultoria online",
            "preco": "497",
            "publico": "Mulheres 30+",
            "concorrentes": ["Smart Fit", "Bodytech"]
        }))
        .unwrap();

        assert_eq!(request.segment(), "Fitness");
        assert_eq!(request.product().as_deref(), Some("Consultoria online"));
        assert_eq!(request.price.as_ref().and_then(Text::as_amount), Some(497.0));
        assert_eq!(request.competitors_text().as_deref(), Some("Smart Fit, Bodytech"));
    }

    #[test]
    fn product_and_audience_accept_numbers() {
        let request: AnalysisRequest = serde_json::from_value(json!({
            "segmento": "Varejo",
            "produto": 123,
            "publico": "  "
        }))
        .unwrap();

        assert_eq!(request.product().as_deref(), Some("123"));
        assert_eq!(request.audience(), None);
        assert_eq!(
            request.effective_query(),
            "mercado Varejo 123 Brasil tendências oportunidades"
        );
    }

    #[test]
    fn missing_segment_fails_validation() {
        let request: AnalysisRequest = serde_json::from_value(json!({"produto": "x"})).unwrap();
        assert_eq!(request.validate(), Err(ValidationError::MissingSegment));

        let blank = AnalysisRequest::new("   ");
        assert_eq!(blank.validate(), Err(ValidationError::MissingSegment));
    }

    #[test]
    fn effective_query_prefers_caller_query() {
        let mut request = AnalysisRequest::new("Educação");
        assert_eq!(
            request.effective_query(),
            "análise mercado Educação Brasil dados estatísticas crescimento"
        );

        request.product = Some("Curso de inglês".into());
        assert_eq!(
            request.effective_query(),
            "mercado Educação Curso de inglês Brasil tendências oportunidades"
        );

        request.query = Some("escolas de idiomas".into());
        assert_eq!(request.effective_query(), "escolas de idiomas");
    }

    #[test]
    fn attachment_text_is_appended_to_notes() {
        let mut request = AnalysisRequest::new("Varejo");
        assert_eq!(request.notes_text(), None);

        request.attachments_context = Some("planilha de vendas".into());
        assert_eq!(request.notes_text().as_deref(), Some("planilha de vendas"));

        request.notes = Some(json!("foco no Nordeste"));
        assert_eq!(
            request.notes_text().as_deref(),
            Some("foco no Nordeste\n\nplanilha de vendas")
        );
    }
}
