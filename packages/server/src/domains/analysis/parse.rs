//! Turning raw LLM answers into section values.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::stages::StageKind;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("resposta vazia")]
    Empty,
    #[error("JSON inválido: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("esperado {expected}, recebido {found}")]
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },
}

/// Strip a surrounding ```` ```json ```` or bare ```` ``` ```` fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();

    let (start, marker_len) = match text.find("```json") {
        Some(idx) => (idx, "```json".len()),
        None => match text.find("```") {
            Some(idx) => (idx, "```".len()),
            None => return text,
        },
    };

    let body = &text[start + marker_len..];
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// The outermost `{...}` or `[...]` span, for answers with prose around the JSON.
fn outer_json_span(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c == '{' || c == '[')?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "booleano",
        Value::Number(_) => "número",
        Value::String(_) => "texto",
        Value::Array(_) => "lista",
        Value::Object(_) => "objeto",
    }
}

/// Parse an answer into JSON of the shape the stage expects. Empty objects and
/// empty lists count as no answer.
pub fn parse_json(raw: &str, kind: StageKind) -> Result<Value, ParseError> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => match outer_json_span(text) {
            Some(span) => serde_json::from_str(span)?,
            None => return Err(e.into()),
        },
    };

    let expected = match kind {
        StageKind::LlmList => "lista",
        _ => "objeto",
    };
    // List entries that are not objects carry nothing a section can use.
    if let (Value::Array(items), StageKind::LlmList) = (&mut value, kind) {
        items.retain(Value::is_object);
    }

    match (&value, kind) {
        (Value::Array(items), StageKind::LlmList) if items.is_empty() => Err(ParseError::Empty),
        (Value::Array(_), StageKind::LlmList) => Ok(value),
        (Value::Object(map), k) if k != StageKind::LlmList && map.is_empty() => {
            Err(ParseError::Empty)
        }
        (Value::Object(_), k) if k != StageKind::LlmList => Ok(value),
        (other, _) => Err(ParseError::WrongShape {
            expected,
            found: shape_name(other),
        }),
    }
}

/// Parse and deserialize into the section type.
pub fn parse_section<T: DeserializeOwned>(raw: &str, kind: StageKind) -> Result<T, ParseError> {
    let value = parse_json(raw, kind)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Avatar, MentalDriver};

    #[test]
    fn strips_json_and_bare_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("Segue:\n```\n[1]\n```\nFim"), "[1]");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn finds_json_inside_prose() {
        let value = parse_json("Aqui está: {\"nome_ficticio\": \"Ana\"} espero que ajude", StageKind::LlmObject)
            .unwrap();
        assert_eq!(value["nome_ficticio"], "Ana");
    }

    #[test]
    fn list_stages_require_a_non_empty_array() {
        assert!(matches!(
            parse_json("{\"nome\": \"x\"}", StageKind::LlmList),
            Err(ParseError::WrongShape { expected: "lista", found: "objeto" })
        ));
        assert!(matches!(parse_json("[]", StageKind::LlmList), Err(ParseError::Empty)));

        let drivers: Vec<MentalDriver> = parse_section(
            "```json\n[{\"nome\": \"Relógio Psicológico\"}, \"solto\", null]\n```",
            StageKind::LlmList,
        )
        .unwrap();
        assert_eq!(drivers.len(), 1);
        assert!(matches!(parse_json("[\"a\", 1]", StageKind::LlmList), Err(ParseError::Empty)));
    }

    #[test]
    fn rejects_prose_and_empty_objects() {
        assert!(matches!(
            parse_json("Desculpe, não posso ajudar.", StageKind::LlmObject),
            Err(ParseError::InvalidJson(_))
        ));
        assert!(matches!(parse_json("{}", StageKind::LlmObject), Err(ParseError::Empty)));
        assert!(matches!(parse_json("   ", StageKind::LlmObject), Err(ParseError::Empty)));
    }

    #[test]
    fn type_mismatch_inside_section_keeps_the_rest() {
        let avatar: Avatar = parse_section(
            "{\"nome_ficticio\": \"Ana Maratonista\", \"desejos_motivacoes\": {\"sonhos_profundos\": null}}",
            StageKind::LlmObject,
        )
        .unwrap();

        assert_eq!(avatar.persona_name.map(|t| t.to_string()).as_deref(), Some("Ana Maratonista"));
        assert!(avatar.desires.unwrap().deep_dreams.is_empty());
    }

    #[test]
    fn wrong_top_level_shape_is_still_an_error() {
        let result: Result<Vec<MentalDriver>, _> =
            parse_section("{\"nome\": \"Relógio\"}", StageKind::LlmList);
        assert!(matches!(result, Err(ParseError::WrongShape { .. })));

        let result: Result<Avatar, _> = parse_section("[1, 2]", StageKind::LlmObject);
        assert!(result.is_err());
    }
}
