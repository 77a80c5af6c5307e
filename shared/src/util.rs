use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Alphabet for receipt codes: uppercase letters and digits without the
/// look-alikes `I`, `O`, `0` and `1`.
pub const RECEIPT_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a client-generated receipt code.
pub const RECEIPT_CODE_LEN: usize = 6;

/// Currency prefix used on every displayed amount.
pub const CURRENCY_PREFIX: &str = "Nle";

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generate a 6-character receipt code.
///
/// The code space is 32^6 (~1.07e9), so collisions are possible at scale.
/// The backend is the authority on uniqueness; this value is advisory.
pub fn generate_receipt_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..RECEIPT_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..RECEIPT_CODE_ALPHABET.len());
            char::from(RECEIPT_CODE_ALPHABET[idx])
        })
        .collect()
}

/// Check that a string is a well-formed receipt code.
pub fn is_receipt_code(code: &str) -> bool {
    code.len() == RECEIPT_CODE_LEN && code.bytes().all(|b| RECEIPT_CODE_ALPHABET.contains(&b))
}

/// Replace NaN and infinities with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Render an amount for display, e.g. `Nle12.50`.
pub fn format_currency(value: f64) -> String {
    format!("{}{:.2}", CURRENCY_PREFIX, finite_or_zero(value))
}

/// Parse a loosely-typed JSON value into a number.
///
/// Accepts numbers and numeric strings (surrounding whitespace ignored).
/// Anything else, including an empty string, yields `None`.
pub fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Serde helper for backend fields that may arrive as a number, a numeric
/// string, `null` or garbage. Never fails; unparseable input becomes `None`.
pub fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Serde helper for quantities sent by the backend as numbers or strings.
pub fn deserialize_lenient_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32))
}

/// Serde helper for optional text fields. A value of any other type becomes
/// `None` instead of failing the surrounding record.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Serde helper for identifiers sent as strings or numbers (`"a1"`, `17`).
pub fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Serde helper for nested records: anything that does not deserialize as
/// `T` becomes `None`.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Serde helper for lists whose entries may be malformed. A non-array value
/// becomes `None`; entries that do not deserialize as `T` are skipped.
pub fn deserialize_lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(entries)) => Some(
            entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_code_shape() {
        for _ in 0..500 {
            let code = generate_receipt_code();
            assert_eq!(code.len(), RECEIPT_CODE_LEN);
            assert!(is_receipt_code(&code), "bad code {code}");
            assert!(!code.contains(['I', 'O', '0', '1']));
        }
    }

    #[test]
    fn test_is_receipt_code_rejects_ambiguous() {
        assert!(is_receipt_code("ABC234"));
        assert!(!is_receipt_code("ABC23"));
        assert!(!is_receipt_code("ABC2O4"));
        assert!(!is_receipt_code("abc234"));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(200.0), "Nle200.00");
        assert_eq!(format_currency(12.5), "Nle12.50");
        assert_eq!(format_currency(f64::NAN), "Nle0.00");
        assert_eq!(format_currency(f64::INFINITY), "Nle0.00");
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(12)), Some(12.0));
        assert_eq!(number_from_value(&json!("12.5")), Some(12.5));
        assert_eq!(number_from_value(&json!(" 7 ")), Some(7.0));
        assert_eq!(number_from_value(&json!("")), None);
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!({"amount": 1})), None);
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Loose {
        #[serde(deserialize_with = "deserialize_lenient_id")]
        id: Option<String>,
        #[serde(deserialize_with = "deserialize_lenient_string")]
        label: Option<String>,
        #[serde(deserialize_with = "deserialize_lenient_list")]
        counts: Option<Vec<u32>>,
    }

    #[test]
    fn test_lenient_fields_degrade_individually() {
        let loose: Loose =
            serde_json::from_value(json!({"id": 17, "label": {"text": "x"}, "counts": [1, "two", 3]}))
                .unwrap();
        assert_eq!(loose.id.as_deref(), Some("17"));
        assert!(loose.label.is_none());
        assert_eq!(loose.counts, Some(vec![1, 3]));

        let loose: Loose =
            serde_json::from_value(json!({"id": true, "label": "ok", "counts": "none"})).unwrap();
        assert!(loose.id.is_none());
        assert_eq!(loose.label.as_deref(), Some("ok"));
        assert!(loose.counts.is_none());
    }
}
