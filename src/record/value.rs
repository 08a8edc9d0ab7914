// Defensive accessors over untyped JSON

use serde_json::Value;

/// Whether a value carries anything worth rendering.
///
/// Null, `false`, zero, empty strings and empty collections count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Fetch `key` from an object, skipping empty values
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_truthy(v))
}

/// Fetch the first truthy key among `keys`
pub fn first_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| field(value, key))
}

/// Fetch `key` and stringify it
pub fn text_field(value: &Value, key: &str) -> Option<String> {
    field(value, key).map(text)
}

/// Non-empty elements of an array field; anything else yields nothing
pub fn list_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    match field(value, key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Stringify a value for verbatim insertion into markdown.
///
/// Strings are inserted as-is; no markdown escaping is performed.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => {
            items.iter().map(text).collect::<Vec<_>>().join(", ")
        }
        _ => value.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Turn an identifier like `billing_architecture_orb` into `Billing Architecture Orb`
pub fn display_name(ident: &str) -> String {
    title_case(&ident.replace(['_', '-'], " "))
}

/// Title-case words: a letter is uppercased when it follows a non-letter,
/// lowercased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([0])));
        assert!(is_truthy(&json!(12)));
    }

    #[test]
    fn test_field_skips_empty() {
        let v = json!({"a": "", "b": "text", "c": null});
        assert!(field(&v, "a").is_none());
        assert!(field(&v, "c").is_none());
        assert!(field(&v, "missing").is_none());
        assert_eq!(text_field(&v, "b").as_deref(), Some("text"));
    }

    #[test]
    fn test_field_on_non_object() {
        assert!(field(&json!("scalar"), "a").is_none());
        assert!(list_field(&json!([1, 2]), "a").is_empty());
    }

    #[test]
    fn test_list_field_wrong_shape() {
        let v = json!({"items": "not a list"});
        assert!(list_field(&v, "items").is_empty());
    }

    #[test]
    fn test_text_stringification() {
        assert_eq!(text(&json!("a *b*")), "a *b*");
        assert_eq!(text(&json!(13)), "13");
        assert_eq!(text(&json!(true)), "true");
        assert_eq!(text(&json!(["id", "name", 3])), "id, name, 3");
        assert_eq!(text(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("billing_architecture_orb"), "Billing Architecture Orb");
        assert_eq!(display_name("pci_dss_12_requirements"), "Pci Dss 12 Requirements");
        assert_eq!(display_name("ui-ux_trends"), "Ui Ux Trends");
    }

    #[test]
    fn test_title_case_lowercases_inner_letters() {
        assert_eq!(title_case("HST remittance"), "Hst Remittance");
        assert_eq!(title_case("btcpay"), "Btcpay");
    }
}
