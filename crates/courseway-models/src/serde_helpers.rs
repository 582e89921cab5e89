//! Deserializers for values that arrive as JSON numbers or as strings.
//!
//! Path and query parameters are always strings; the constraint layer accepts any
//! numeric string, so the typed layer has to as well.

use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

fn integral<E: Error>(value: Numeric) -> Result<Option<i64>, E> {
    let as_integer = |f: f64| (f.is_finite() && f.fract() == 0.0).then_some(f as i64);

    match value {
        Numeric::Int(n) => Ok(Some(n)),
        Numeric::Float(f) => as_integer(f)
            .map(Some)
            .ok_or_else(|| E::custom(format!("expected an integer, found `{}`", f))),
        Numeric::Text(s) if s.trim().is_empty() => Ok(None),
        Numeric::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(as_integer)
            .map(Some)
            .ok_or_else(|| E::custom(format!("expected an integer, found `{}`", s))),
    }
}

pub fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    integral(Numeric::deserialize(deserializer)?)?
        .ok_or_else(|| D::Error::custom("expected an integer, found an empty value"))
}

pub fn deserialize_optional_numeric<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        Some(value) => integral(value),
        None => Ok(None),
    }
}

/// Reads the `"true"` / `"false"` strings used by query flags.
pub fn deserialize_optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(D::Error::custom(format!(
            "expected `true` or `false`, found `{}`",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Params {
        #[serde(deserialize_with = "deserialize_numeric_id")]
        id: i64,
        #[serde(default, deserialize_with = "deserialize_optional_numeric")]
        page: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_flag")]
        flag: Option<bool>,
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        let params: Params = serde_json::from_value(json!({"id": "12", "page": 3.0})).unwrap();
        assert_eq!(params.id, 12);
        assert_eq!(params.page, Some(3));
        assert_eq!(params.flag, None);

        let params: Params =
            serde_json::from_value(json!({"id": 7, "page": "", "flag": "true"})).unwrap();
        assert_eq!(params.id, 7);
        assert_eq!(params.page, None);
        assert_eq!(params.flag, Some(true));
    }

    #[test]
    fn test_fractional_values_are_rejected() {
        assert!(serde_json::from_value::<Params>(json!({"id": "1.5"})).is_err());
        assert!(serde_json::from_value::<Params>(json!({"id": 1, "page": 2.5})).is_err());
        assert!(serde_json::from_value::<Params>(json!({"id": 1, "flag": "yes"})).is_err());
    }
}
