use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use courseway_validation::{Constrained, Constraints};

use crate::{required_text, text, unsigned};

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentListQuery {
    /// Folder to list, e.g. `/images`; absent lists the root
    pub path: Option<String>,
}

impl Constrained for DocumentListQuery {
    fn constraints() -> Constraints {
        Constraints::new().optional("path", text())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLearningPathDocumentDto {
    #[validate(length(max = 255, message = "value is too long."))]
    pub title: String,
    /// HTML content of the document
    pub content: Option<String>,
    pub comment: Option<String>,
    pub parent_id: Option<i64>,
    pub previous_id: Option<i64>,
    pub prerequisite: Option<i64>,
    pub creator_id: Option<i64>,
}

impl Constrained for CreateLearningPathDocumentDto {
    fn constraints() -> Constraints {
        Constraints::new()
            .required("title", required_text())
            .optional("content", text())
            .optional("comment", text())
            .optional("parent_id", unsigned())
            .optional("previous_id", unsigned())
            .optional("prerequisite", unsigned())
            .optional("creator_id", unsigned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: i64,
    pub course_code: String,
    /// Absolute path inside the course, e.g. `/learning_path/intro.html`
    pub path: String,
    pub title: String,
    #[schema(example = "file")]
    pub filetype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub size: i64,
}

impl Document {
    /// Folder containing this document.
    pub fn folder(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) | None => "/",
            Some(index) => &self.path[..index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(path: &str) -> Document {
        Document {
            id: 1,
            course_code: "MATH".to_string(),
            path: path.to_string(),
            title: "t".to_string(),
            filetype: "file".to_string(),
            comment: None,
            size: 0,
        }
    }

    #[test]
    fn test_folder() {
        assert_eq!(document("/intro.html").folder(), "/");
        assert_eq!(document("/learning_path/intro.html").folder(), "/learning_path");
        assert_eq!(document("/a/b/c.html").folder(), "/a/b");
    }
}
