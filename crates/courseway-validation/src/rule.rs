//! Declarative field rules.

use serde_json::Value;

/// Expected JSON shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    /// A JSON integer. Floats and numeric strings do not qualify.
    Integer,
    /// A JSON number or a string holding a finite number.
    Numeric,
    /// A JSON array or object.
    Array,
    Boolean,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Numeric => "numeric",
            ValueType::Array => "array",
            ValueType::Boolean => "boolean",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Integer => value.is_i64() || value.is_u64(),
            ValueType::Numeric => match value {
                Value::Number(_) => true,
                Value::String(s) => parse_numeric(s).is_some(),
                _ => false,
            },
            ValueType::Array => value.is_array() || value.is_object(),
            ValueType::Boolean => value.is_boolean(),
        }
    }
}

/// Parses a numeric string, accepting surrounding whitespace and rejecting non-finite values.
pub(crate) fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// One check applied to a present field.
///
/// Only [`Check::NotBlank`] looks at `null`; every other check skips it.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Type(ValueType),
    NotBlank,
    PositiveOrZero,
    Choice(Vec<Value>),
    Range { min: Option<f64>, max: Option<f64> },
    IdenticalTo { value: Value, message: Option<String> },
    /// Applies the inner checks to every element of an array (or every value of an object).
    All(Vec<Check>),
}

impl Check {
    pub fn choice<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Check::Choice(allowed.into_iter().map(Into::into).collect())
    }

    pub fn range(min: impl Into<f64>, max: impl Into<f64>) -> Self {
        Check::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    pub fn identical_to(value: impl Into<Value>, message: Option<&str>) -> Self {
        Check::IdenticalTo {
            value: value.into(),
            message: message.map(str::to_string),
        }
    }

    pub fn all<I>(checks: I) -> Self
    where
        I: IntoIterator<Item = Check>,
    {
        Check::All(checks.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required(Vec<Check>),
    Optional(Vec<Check>),
}

impl Rule {
    pub fn checks(&self) -> &[Check] {
        match self {
            Rule::Required(checks) | Rule::Optional(checks) => checks,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Rule::Required(_))
    }
}

/// Per-request constraint specification. Field order is evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    fields: Vec<(String, Rule)>,
    allow_missing_fields: bool,
    reject_extra_fields: bool,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `name`, keeping its original position.
    pub fn field(mut self, name: &str, rule: Rule) -> Self {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, existing)) => *existing = rule,
            None => self.fields.push((name.to_string(), rule)),
        }
        self
    }

    pub fn required<I>(self, name: &str, checks: I) -> Self
    where
        I: IntoIterator<Item = Check>,
    {
        self.field(name, Rule::Required(checks.into_iter().collect()))
    }

    pub fn optional<I>(self, name: &str, checks: I) -> Self
    where
        I: IntoIterator<Item = Check>,
    {
        self.field(name, Rule::Optional(checks.into_iter().collect()))
    }

    /// Treats every `Required` field as optional when absent. Used for filter-style inputs.
    pub fn allow_missing_fields(mut self) -> Self {
        self.allow_missing_fields = true;
        self
    }

    /// Reports fields that have no rule. Extra fields are ignored otherwise.
    pub fn reject_extra_fields(mut self) -> Self {
        self.reject_extra_fields = true;
        self
    }

    pub fn allows_missing_fields(&self) -> bool {
        self.allow_missing_fields
    }

    pub fn rejects_extra_fields(&self) -> bool {
        self.reject_extra_fields
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rule)| rule)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_matching() {
        assert!(ValueType::Integer.matches(&json!(5)));
        assert!(ValueType::Integer.matches(&json!(-5)));
        assert!(!ValueType::Integer.matches(&json!(5.5)));
        assert!(!ValueType::Integer.matches(&json!("5")));

        assert!(ValueType::Numeric.matches(&json!(5.5)));
        assert!(ValueType::Numeric.matches(&json!("12")));
        assert!(ValueType::Numeric.matches(&json!(" 1e3")));
        assert!(!ValueType::Numeric.matches(&json!("12abc")));
        assert!(!ValueType::Numeric.matches(&json!("NaN")));
        assert!(!ValueType::Numeric.matches(&json!(true)));

        assert!(ValueType::Array.matches(&json!([1, 2])));
        assert!(ValueType::Array.matches(&json!({"a": 1})));
        assert!(!ValueType::Array.matches(&json!("a")));

        assert!(ValueType::String.matches(&json!("")));
        assert!(ValueType::Boolean.matches(&json!(false)));
    }

    #[test]
    fn test_field_replaces_in_place() {
        let constraints = Constraints::new()
            .required("title", [Check::NotBlank])
            .optional("type", [Check::Type(ValueType::Integer)])
            .optional("type", [Check::identical_to(2, None)]);

        let names: Vec<&str> = constraints.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["title", "type"]);
        assert_eq!(
            constraints.get("type"),
            Some(&Rule::Optional(vec![Check::identical_to(2, None)]))
        );
    }
}
