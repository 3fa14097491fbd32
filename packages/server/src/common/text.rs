//! Loosely typed scalars and the `N/A` defaulting used wherever report data is
//! displayed.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder rendered for missing or malformed values.
pub const NA: &str = "N/A";

/// A scalar sent as a JSON string, number or boolean.
///
/// LLM answers and API callers are inconsistent about quoting numbers
/// (`"preco": 997` vs `"preco": "R$ 997,00"`); this keeps whichever form arrived.
/// Lists and objects where a scalar was expected are kept verbatim in `Other`
/// and displayed flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Str(String),
    Number(serde_json::Number),
    Bool(bool),
    Other(Value),
}

impl Text {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Text::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Text::Str(s) => s.trim().is_empty(),
            Text::Other(value) => display_value(value) == NA,
            _ => false,
        }
    }

    /// Numeric value, parsing Brazilian currency formats when stored as text.
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            Text::Number(n) => n.as_f64(),
            Text::Str(s) => parse_amount(s),
            Text::Bool(_) | Text::Other(_) => None,
        }
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::Str(s) => f.write_str(s),
            Text::Number(n) => Display::fmt(n, f),
            Text::Bool(true) => f.write_str("sim"),
            Text::Bool(false) => f.write_str("não"),
            Text::Other(value) => f.write_str(&display_value(value)),
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Str(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Str(s)
    }
}

impl From<f64> for Text {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Text::Number)
            .unwrap_or_else(|| Text::Str(n.to_string()))
    }
}

/// Display helpers that collapse absent or blank values to [`NA`].
pub trait OrNa {
    fn or_na(&self) -> String;
}

impl OrNa for Option<Text> {
    fn or_na(&self) -> String {
        match self {
            Some(text) if !text.is_blank() => text.to_string(),
            _ => NA.to_string(),
        }
    }
}

impl OrNa for Option<String> {
    fn or_na(&self) -> String {
        self.as_deref().or_na()
    }
}

impl OrNa for Option<&str> {
    fn or_na(&self) -> String {
        match self {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => NA.to_string(),
        }
    }
}

impl OrNa for String {
    fn or_na(&self) -> String {
        Some(self.as_str()).or_na()
    }
}

impl OrNa for Option<Value> {
    fn or_na(&self) -> String {
        match self {
            Some(value) => display_value(value),
            None => NA.to_string(),
        }
    }
}

/// Flatten an arbitrary JSON value into one display line.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NA.to_string(),
        Value::String(s) if s.trim().is_empty() => NA.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => Text::Bool(*b).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => NA.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(map) if map.is_empty() => NA.to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", humanize_key(k), display_value(v)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// `"estilo_vida"` → `"Estilo Vida"`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `"997"`, `"997.50"`, `"1.997,00"` or `"R$ 2.500"` into a number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.contains('.'), cleaned.contains(',')) {
        (true, true) => cleaned.replace('.', "").replace(',', "."),
        (false, true) => cleaned.replace(',', "."),
        (true, false) => {
            let groups: Vec<&str> = cleaned.split('.').collect();
            let thousands = groups.len() > 1 && groups[1..].iter().all(|g| g.len() == 3);
            if thousands {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (false, false) => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_brazilian_amounts() {
        assert_eq!(parse_amount("997"), Some(997.0));
        assert_eq!(parse_amount("997.50"), Some(997.5));
        assert_eq!(parse_amount("1.997,00"), Some(1997.0));
        assert_eq!(parse_amount("R$ 2.500"), Some(2500.0));
        assert_eq!(parse_amount("1.000.000"), Some(1_000_000.0));
        assert_eq!(parse_amount("49,90"), Some(49.9));
        assert_eq!(parse_amount("grátis"), None);
        assert_eq!(parse_amount("  "), None);
    }

    #[test]
    fn text_accepts_strings_numbers_and_bools() {
        let price: Text = serde_json::from_value(json!(997)).unwrap();
        assert_eq!(price.as_amount(), Some(997.0));

        let price: Text = serde_json::from_value(json!("R$ 1.497,00")).unwrap();
        assert_eq!(price.as_amount(), Some(1497.0));

        let flag: Text = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(flag.to_string(), "sim");
    }

    #[test]
    fn structured_values_are_kept_and_flattened_for_display() {
        let raw = json!({"sonho": "Correr uma maratona", "prazo": 2});
        let text: Text = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(text.to_string(), "Sonho: Correr uma maratona; Prazo: 2");
        assert_eq!(text.as_amount(), None);
        assert_eq!(serde_json::to_value(&text).unwrap(), raw);
        assert!(Text::Other(json!([])).is_blank());
    }

    #[test]
    fn missing_and_blank_values_render_as_na() {
        assert_eq!(None::<Text>.or_na(), NA);
        assert_eq!(Some(Text::from("  ")).or_na(), NA);
        assert_eq!(Some(Text::from("35 anos")).or_na(), "35 anos");
        assert_eq!(String::new().or_na(), NA);
    }

    #[test]
    fn display_value_flattens_nested_json() {
        assert_eq!(display_value(&json!(null)), NA);
        assert_eq!(display_value(&json!(["a", "b"])), "a, b");
        assert_eq!(
            display_value(&json!({"faixa_precos": "R$ 500", "posicao": 2})),
            "Faixa Precos: R$ 500; Posicao: 2"
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("ação", 2), "aç");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn humanize_key_title_cases_words() {
        assert_eq!(humanize_key("comportamento_compra"), "Comportamento Compra");
        assert_eq!(humanize_key("tempo"), "Tempo");
    }
}
