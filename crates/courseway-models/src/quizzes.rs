//! Tests (exercises), questions and answers.
//!
//! Test creation has two rules that depend on `feedback_type`, so
//! [`CreateTestDto`] overrides [`Constrained::constraints_for`]:
//!
//! - `feedback_type` of 0, 1 or 3 restricts `results_disabled` to the values the host
//!   supports for those modes.
//! - `feedback_type` of 1 (adaptive) requires `type` to be 2 (one question per page).
//!
//! A missing or `null` `feedback_type` counts as 0.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use courseway_validation::{Check, Constrained, Constraints, ValueType};

use crate::serde_helpers::deserialize_numeric_id;
use crate::{numeric_id, required_text, text, unsigned};

/// `results_disabled` values accepted when `feedback_type` is 0, 1 or 3.
pub const DIRECT_FEEDBACK_RESULTS: [i64; 7] = [0, 4, 6, 7, 8, 9, 10];
pub const ADAPTIVE_TYPE_MESSAGE: &str = "If `feedback_type` is set to 1, `type` should be set to 2.";

/// All questions on one page.
pub const SINGLE_PAGE_TYPE: i64 = 1;
/// One question per page.
pub const ONE_PER_PAGE_TYPE: i64 = 2;

const QUESTION_TYPE_MIN: i64 = 1;
const QUESTION_TYPE_MAX: i64 = 22;
pub const HOTSPOT_TYPES: [&str; 3] = ["square", "circle", "poly"];

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct TestPath {
    pub course_code: String,
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub test_id: i64,
}

impl Constrained for TestPath {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("course_code", required_text())
            .required("test_id", numeric_id())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct QuestionPath {
    pub course_code: String,
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub test_id: i64,
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub question_id: i64,
}

impl Constrained for QuestionPath {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("course_code", required_text())
            .required("test_id", numeric_id())
            .required("question_id", numeric_id())
    }
}

/// A question addressed through its course only.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CourseQuestionPath {
    pub course_code: String,
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub question_id: i64,
}

impl Constrained for CourseQuestionPath {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("course_code", required_text())
            .required("question_id", numeric_id())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateTestDto {
    #[validate(length(max = 255, message = "value is too long."))]
    pub title: String,
    pub description: Option<String>,
    /// 1: all questions on one page, 2: one question per page
    #[serde(rename = "type")]
    pub quiz_type: Option<i64>,
    /// 0: at end of test, 1: adaptive, 2: exam (no feedback), 3: direct pop-up
    pub feedback_type: Option<i64>,
    pub attempts: Option<i64>,
    pub random: Option<i64>,
    pub random_answers: Option<i64>,
    pub results_disabled: Option<i64>,
    pub expired_time: Option<i64>,
    pub propagate_neg: Option<i64>,
    #[serde(rename = "saveCorrectAnswers")]
    pub save_correct_answers: Option<i64>,
    #[serde(rename = "randomByCat")]
    pub random_by_cat: Option<i64>,
    pub text_when_finished: Option<String>,
    pub display_category_name: Option<i64>,
    pub review_answers: Option<i64>,
    pub pass_percentage: Option<i64>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(rename = "onSuccessMessage")]
    pub on_success_message: Option<String>,
    #[serde(rename = "onFailedMessage")]
    pub on_failed_message: Option<String>,
    #[serde(rename = "notifyUserByEmail")]
    pub notify_user_by_email: Option<i64>,
    #[serde(rename = "questionSelectionType")]
    pub question_selection_type: Option<i64>,
    #[serde(rename = "hideQuestionTitle")]
    pub hide_question_title: Option<i64>,
    #[serde(rename = "showPreviousButton")]
    pub show_previous_button: Option<i64>,
    #[serde(rename = "preventBackwards")]
    pub prevent_backwards: Option<i64>,
    pub activate_start_date_check: Option<i64>,
    pub start_time: Option<String>,
    pub activate_end_date_check: Option<i64>,
    pub end_time: Option<String>,
    pub enabletimercontrol: Option<i64>,
}

const TEST_INTEGER_FIELDS: &[&str] = &[
    "type",
    "feedback_type",
    "attempts",
    "random",
    "random_answers",
    "results_disabled",
    "expired_time",
    "propagate_neg",
    "saveCorrectAnswers",
    "randomByCat",
    "display_category_name",
    "review_answers",
    "pass_percentage",
    "notifyUserByEmail",
    "questionSelectionType",
    "hideQuestionTitle",
    "showPreviousButton",
    "preventBackwards",
    "activate_start_date_check",
    "activate_end_date_check",
    "enabletimercontrol",
];

const TEST_TEXT_FIELDS: &[&str] = &[
    "description",
    "text_when_finished",
    "onSuccessMessage",
    "onFailedMessage",
    "start_time",
    "end_time",
];

fn feedback_type_of(input: &Map<String, Value>) -> Option<i64> {
    match input.get("feedback_type") {
        None | Some(Value::Null) => Some(0),
        Some(value) => value.as_i64(),
    }
}

impl CreateTestDto {
    /// Fills the settings the host derives from `feedback_type`.
    pub fn with_defaults(mut self) -> Self {
        let feedback_type = self.feedback_type.unwrap_or(0);

        if matches!(feedback_type, 0 | 1 | 3) {
            self.results_disabled = Some(self.results_disabled.unwrap_or(0));
        }

        let default_type = if feedback_type == 1 {
            ONE_PER_PAGE_TYPE
        } else {
            SINGLE_PAGE_TYPE
        };
        self.quiz_type = Some(self.quiz_type.filter(|t| *t != 0).unwrap_or(default_type));
        self
    }
}

impl Constrained for CreateTestDto {
    fn constraints() -> Constraints {
        let mut constraints = Constraints::new().required("title", required_text());
        for field in TEST_INTEGER_FIELDS {
            constraints = constraints.optional(field, unsigned());
        }
        for field in TEST_TEXT_FIELDS {
            constraints = constraints.optional(field, text());
        }
        constraints.optional(
            "categories",
            [Check::Type(ValueType::Array), Check::all(unsigned())],
        )
    }

    fn constraints_for(input: &Map<String, Value>) -> Constraints {
        let mut constraints = Self::constraints();
        let feedback_type = feedback_type_of(input);

        if matches!(feedback_type, Some(0 | 1 | 3)) {
            let mut checks = unsigned().to_vec();
            checks.push(Check::choice(DIRECT_FEEDBACK_RESULTS));
            constraints = constraints.optional("results_disabled", checks);
        }

        if feedback_type == Some(1) {
            let mut checks = unsigned().to_vec();
            checks.push(Check::identical_to(
                ONE_PER_PAGE_TYPE,
                Some(ADAPTIVE_TYPE_MESSAGE),
            ));
            constraints = constraints.optional("type", checks);
        }

        constraints
    }
}

/// Test creation inside a learning path. The test is also appended to the path as a `quiz` item.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLearningPathTestDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub test: CreateTestDto,
    pub parent_id: Option<i64>,
    pub previous_id: Option<i64>,
    /// Author of the path item; defaults to the authenticated account
    pub user_id: Option<i64>,
}

impl Constrained for CreateLearningPathTestDto {
    fn constraints() -> Constraints {
        CreateTestDto::constraints()
            .optional("parent_id", unsigned())
            .optional("previous_id", unsigned())
            .optional("user_id", unsigned())
    }

    fn constraints_for(input: &Map<String, Value>) -> Constraints {
        CreateTestDto::constraints_for(input)
            .optional("parent_id", unsigned())
            .optional("previous_id", unsigned())
            .optional("user_id", unsigned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Test {
    pub id: i64,
    pub course_code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub quiz_type: i64,
    pub feedback_type: i64,
    pub results_disabled: i64,
    pub attempts: i64,
    pub random: i64,
    pub random_answers: i64,
    pub expired_time: i64,
    pub pass_percentage: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_when_finished: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub question_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionDto {
    pub title: String,
    /// Question type, 1 (unique answer) to 22
    #[serde(rename = "type")]
    pub question_type: i64,
    pub description: Option<String>,
    pub ponderation: Option<i64>,
    pub picture: Option<String>,
    pub level: Option<i64>,
    pub extra: Option<String>,
    pub category: Option<i64>,
    pub feedback: Option<String>,
}

impl Constrained for CreateQuestionDto {
    fn constraints() -> Constraints {
        let mut question_type = vec![Check::NotBlank];
        question_type.extend(unsigned());
        question_type.push(Check::range(QUESTION_TYPE_MIN as f64, QUESTION_TYPE_MAX as f64));

        Constraints::new()
            .required("title", required_text())
            .required("type", question_type)
            .optional("description", text())
            .optional("ponderation", unsigned())
            .optional("picture", text())
            .optional("level", unsigned())
            .optional("extra", text())
            .optional("category", unsigned())
            .optional("feedback", text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: i64,
    pub course_code: String,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: i64,
    pub description: String,
    pub ponderation: i64,
    pub picture: String,
    pub level: i64,
    pub extra: String,
    pub category: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAnswerDto {
    pub title: String,
    /// 1 or 0; for matching questions, the id of the matching answer
    pub correct: Option<i64>,
    pub ponderation: Option<i64>,
    pub comment: Option<String>,
    pub position: Option<i64>,
    pub hotspot_coordinates: Option<String>,
    #[schema(example = "square")]
    pub hotspot_type: Option<String>,
    pub destination: Option<String>,
}

impl Constrained for CreateAnswerDto {
    fn constraints() -> Constraints {
        let integer = || [Check::Type(ValueType::Integer)];

        Constraints::new()
            .required("title", required_text())
            .optional("correct", integer())
            .optional("ponderation", integer())
            .optional("comment", text())
            .optional("position", integer())
            .optional("hotspot_coordinates", text())
            .optional(
                "hotspot_type",
                [Check::Type(ValueType::String), Check::choice(HOTSPOT_TYPES)],
            )
            .optional("destination", text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub title: String,
    pub correct: i64,
    pub ponderation: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub position: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot_coordinates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot_type: Option<String>,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseway_validation::validate;
    use serde_json::json;

    fn violations(input: Value) -> Vec<String> {
        let map = input.as_object().cloned().unwrap();
        validate(&map, &CreateTestDto::constraints_for(&map))
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_adaptive_feedback_requires_type_two() {
        assert_eq!(
            violations(json!({"title": "Quiz", "feedback_type": 1, "type": 1})),
            vec!["[type]: If `feedback_type` is set to 1, `type` should be set to 2."]
        );
        assert!(violations(json!({"title": "Quiz", "feedback_type": 1, "type": 2})).is_empty());
        assert!(violations(json!({"title": "Quiz", "feedback_type": 2, "type": 1})).is_empty());
    }

    #[test]
    fn test_results_disabled_restricted_for_direct_feedback() {
        assert_eq!(
            violations(json!({"title": "Quiz", "results_disabled": 5})),
            vec!["[results_disabled]: The value you selected is not a valid choice."]
        );
        assert!(violations(json!({"title": "Quiz", "feedback_type": 3, "results_disabled": 4})).is_empty());
        assert!(violations(json!({"title": "Quiz", "feedback_type": 2, "results_disabled": 5})).is_empty());
    }

    #[test]
    fn test_defaults_follow_feedback_type() {
        let adaptive = CreateTestDto {
            title: "Quiz".to_string(),
            feedback_type: Some(1),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(adaptive.quiz_type, Some(ONE_PER_PAGE_TYPE));
        assert_eq!(adaptive.results_disabled, Some(0));

        let exam = CreateTestDto {
            title: "Exam".to_string(),
            feedback_type: Some(2),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(exam.quiz_type, Some(SINGLE_PAGE_TYPE));
        assert_eq!(exam.results_disabled, None);
    }

    #[test]
    fn test_learning_path_test_reads_flattened_fields() {
        let dto: CreateLearningPathTestDto = serde_json::from_value(json!({
            "title": "Quiz",
            "feedback_type": 1,
            "saveCorrectAnswers": 1,
            "parent_id": 3
        }))
        .unwrap();

        assert_eq!(dto.test.title, "Quiz");
        assert_eq!(dto.test.save_correct_answers, Some(1));
        assert_eq!(dto.parent_id, Some(3));
    }

    #[test]
    fn test_question_type_range() {
        let map = json!({"title": "Q", "type": 23}).as_object().cloned().unwrap();
        let rendered: Vec<String> = validate(&map, &CreateQuestionDto::constraints())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["[type]: This value should be between 1 and 22."]);
    }

    #[test]
    fn test_hotspot_type_choice() {
        let map = json!({"title": "A", "hotspot_type": "star"})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(validate(&map, &CreateAnswerDto::constraints()).len(), 1);
    }
}
