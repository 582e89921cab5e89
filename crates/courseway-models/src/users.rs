use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use courseway_validation::{Check, Constrained, Constraints, ValueType};

use crate::serde_helpers::deserialize_optional_numeric;
use crate::text;

/// Query filters for the user listing. Every filter is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub id: Option<i64>,
    pub username: Option<String>,
    #[validate(length(max = 100, message = "value is too long."))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub status: Option<i64>,
}

impl Constrained for UserFilter {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("id", [Check::Type(ValueType::Numeric)])
            .required("username", text())
            .required("email", text())
            .required("status", [Check::Type(ValueType::Numeric)])
            .allow_missing_fields()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub user_id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
