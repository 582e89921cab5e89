//! Constraint evaluation.
//!
//! [`validate`] is a pure function of its two inputs. Violations come out in rule
//! order, one per missing `Required` field and one per failing check on a present
//! field. Nothing short-circuits and nothing is deduplicated.

use serde_json::{Map, Value};

use crate::rule::{Check, Constraints, parse_numeric};
use crate::violation::Violation;

pub const MISSING_MESSAGE: &str = "This field is missing.";
pub const EXTRA_MESSAGE: &str = "This field was not expected.";
pub const NOT_BLANK_MESSAGE: &str = "This value should not be blank.";
pub const POSITIVE_OR_ZERO_MESSAGE: &str = "This value should be either positive or zero.";
pub const CHOICE_MESSAGE: &str = "The value you selected is not a valid choice.";
pub const INVALID_NUMBER_MESSAGE: &str = "This value should be a valid number.";

pub fn validate(input: &Map<String, Value>, constraints: &Constraints) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (field, rule) in constraints.fields() {
        let path = format!("[{}]", field);

        match input.get(field) {
            None => {
                if rule.is_required() && !constraints.allows_missing_fields() {
                    violations.push(Violation::new(path, MISSING_MESSAGE));
                }
            }
            Some(value) => {
                for check in rule.checks() {
                    evaluate(check, value, &path, &mut violations);
                }
            }
        }
    }

    if constraints.rejects_extra_fields() {
        for key in input.keys() {
            if constraints.get(key).is_none() {
                violations.push(Violation::new(format!("[{}]", key), EXTRA_MESSAGE));
            }
        }
    }

    violations
}

fn evaluate(check: &Check, value: &Value, path: &str, out: &mut Vec<Violation>) {
    if let Check::NotBlank = check {
        if is_blank(value) {
            out.push(Violation::new(path, NOT_BLANK_MESSAGE));
        }
        return;
    }

    if value.is_null() {
        return;
    }

    match check {
        Check::Type(expected) => {
            if !expected.matches(value) {
                out.push(Violation::new(
                    path,
                    format!("This value should be of type {}.", expected.name()),
                ));
            }
        }
        Check::PositiveOrZero => {
            if as_number(value).is_some_and(|n| n < 0.0) {
                out.push(Violation::new(path, POSITIVE_OR_ZERO_MESSAGE));
            }
        }
        Check::Choice(allowed) => {
            if !allowed.iter().any(|candidate| loosely_equal(candidate, value)) {
                out.push(Violation::new(path, CHOICE_MESSAGE));
            }
        }
        Check::Range { min, max } => match as_number(value) {
            None => out.push(Violation::new(path, INVALID_NUMBER_MESSAGE)),
            Some(n) => {
                let below = min.is_some_and(|min| n < min);
                let above = max.is_some_and(|max| n > max);
                if below || above {
                    out.push(Violation::new(path, range_message(*min, *max)));
                }
            }
        },
        Check::IdenticalTo {
            value: expected,
            message,
        } => {
            if expected != value {
                let message = message.clone().unwrap_or_else(|| {
                    format!(
                        "This value should be identical to {} {}.",
                        type_label(expected),
                        display_value(expected)
                    )
                });
                out.push(Violation::new(path, message));
            }
        }
        Check::All(checks) => match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    for inner in checks {
                        evaluate(inner, item, &item_path, out);
                    }
                }
            }
            Value::Object(entries) => {
                for (key, item) in entries {
                    let item_path = format!("{}[{}]", path, key);
                    for inner in checks {
                        evaluate(inner, item, &item_path, out);
                    }
                }
            }
            _ => {}
        },
        Check::NotBlank => {}
    }
}

/// `null`, `false`, `""`, `[]` and `{}` are blank.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Number(_) => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// Numbers compare by value so `4` and `4.0` match; everything else compares exactly.
fn loosely_equal(candidate: &Value, value: &Value) -> bool {
    match (candidate, value) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => candidate == value,
    }
}

fn format_limit(limit: f64) -> String {
    if limit.fract() == 0.0 {
        format!("{}", limit as i64)
    } else {
        format!("{}", limit)
    }
}

fn range_message(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(
            "This value should be between {} and {}.",
            format_limit(min),
            format_limit(max)
        ),
        (Some(min), None) => format!("This value should be {} or more.", format_limit(min)),
        (None, Some(max)) => format!("This value should be {} or less.", format_limit(max)),
        (None, None) => INVALID_NUMBER_MESSAGE.to_string(),
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "array",
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ValueType;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn rendered(violations: &[Violation]) -> Vec<String> {
        violations.iter().map(ToString::to_string).collect()
    }

    fn course_constraints() -> Constraints {
        Constraints::new()
            .required("title", [Check::NotBlank, Check::Type(ValueType::String)])
            .optional(
                "user_id",
                [Check::Type(ValueType::Integer), Check::PositiveOrZero],
            )
            .optional(
                "teachers",
                [
                    Check::Type(ValueType::Array),
                    Check::all([Check::Type(ValueType::Integer), Check::PositiveOrZero]),
                ],
            )
    }

    #[test]
    fn test_missing_required_yields_exactly_one_violation() {
        let constraints = course_constraints();

        for input in [
            json!({}),
            json!({"user_id": -1}),
            json!({"user_id": "x", "teachers": "y"}),
            json!({"unrelated": true}),
        ] {
            let violations = validate(&map(input), &constraints);
            let missing: Vec<&Violation> =
                violations.iter().filter(|v| v.path == "[title]").collect();
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].message, MISSING_MESSAGE);
        }
    }

    #[test]
    fn test_absent_optional_never_violates() {
        let violations = validate(&map(json!({"title": "Maths"})), &course_constraints());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_one_violation_per_failing_check() {
        let violations = validate(&map(json!({"title": 42, "user_id": "-3"})), &course_constraints());

        assert_eq!(
            rendered(&violations),
            vec![
                "[title]: This value should be of type string.",
                "[user_id]: This value should be of type integer.",
                "[user_id]: This value should be either positive or zero.",
            ]
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let input = map(json!({"title": "", "teachers": [1, -2, "x"]}));
        let constraints = course_constraints();

        assert_eq!(validate(&input, &constraints), validate(&input, &constraints));
    }

    #[test]
    fn test_all_reports_element_paths() {
        let violations = validate(
            &map(json!({"title": "Maths", "teachers": [1, -2, "x"]})),
            &course_constraints(),
        );

        assert_eq!(
            rendered(&violations),
            vec![
                "[teachers][1]: This value should be either positive or zero.",
                "[teachers][2]: This value should be of type integer.",
            ]
        );
    }

    #[test]
    fn test_not_blank_and_null_handling() {
        let constraints = Constraints::new()
            .required("name", [Check::NotBlank, Check::Type(ValueType::String)])
            .optional("level", [Check::Type(ValueType::Integer)]);

        for blank in [json!(null), json!(""), json!(false), json!([]), json!({})] {
            let violations = validate(&map(json!({"name": blank})), &constraints);
            assert_eq!(violations[0].message, NOT_BLANK_MESSAGE);
        }

        let violations = validate(&map(json!({"name": null, "level": null})), &constraints);
        assert_eq!(rendered(&violations), vec!["[name]: This value should not be blank."]);

        let violations = validate(&map(json!({"name": 0})), &constraints);
        assert_eq!(
            rendered(&violations),
            vec!["[name]: This value should be of type string."]
        );
    }

    #[test]
    fn test_choice_and_range() {
        let constraints = Constraints::new()
            .optional("results_disabled", [Check::choice([0, 4, 6, 7, 8, 9, 10])])
            .optional("hotspot_type", [Check::choice(["square", "circle", "poly"])])
            .optional("type", [Check::range(1, 22)]);

        let ok = validate(
            &map(json!({"results_disabled": 4.0, "hotspot_type": "poly", "type": "22"})),
            &constraints,
        );
        assert!(ok.is_empty());

        let violations = validate(
            &map(json!({"results_disabled": 5, "hotspot_type": "star", "type": 23})),
            &constraints,
        );
        assert_eq!(
            rendered(&violations),
            vec![
                "[results_disabled]: The value you selected is not a valid choice.",
                "[hotspot_type]: The value you selected is not a valid choice.",
                "[type]: This value should be between 1 and 22.",
            ]
        );

        let violations = validate(&map(json!({"type": "abc"})), &constraints);
        assert_eq!(rendered(&violations), vec!["[type]: This value should be a valid number."]);
    }

    #[test]
    fn test_identical_to_messages() {
        let custom = Constraints::new().optional(
            "type",
            [Check::identical_to(2, Some("`type` must be 2."))],
        );
        let violations = validate(&map(json!({"type": 1})), &custom);
        assert_eq!(rendered(&violations), vec!["[type]: `type` must be 2."]);

        let default = Constraints::new().optional("type", [Check::identical_to(2, None)]);
        let violations = validate(&map(json!({"type": "2"})), &default);
        assert_eq!(
            rendered(&violations),
            vec!["[type]: This value should be identical to int 2."]
        );
        assert!(validate(&map(json!({"type": 2})), &default).is_empty());
    }

    #[test]
    fn test_extra_fields_ignored_by_default() {
        let input = map(json!({"title": "Maths", "colour": "red"}));

        assert!(validate(&input, &course_constraints()).is_empty());

        let strict = course_constraints().reject_extra_fields();
        assert_eq!(
            rendered(&validate(&input, &strict)),
            vec!["[colour]: This field was not expected."]
        );
    }

    #[test]
    fn test_allow_missing_fields() {
        let constraints = Constraints::new()
            .required("username", [Check::Type(ValueType::String)])
            .allow_missing_fields();

        assert!(validate(&Map::new(), &constraints).is_empty());
        assert_eq!(validate(&map(json!({"username": 3})), &constraints).len(), 1);
    }
}
