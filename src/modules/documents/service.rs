use tracing::{info, instrument};

use courseway_core::AppError;
use courseway_lms::Lms;
use courseway_models::{CreateLearningPathDocumentDto, Document, DocumentListQuery};

use crate::utils::host_helpers::{
    COURSE_NOT_FOUND_MESSAGE, host_failure, host_unavailable, require_course,
    require_learning_path,
};

const ROOT_FOLDER: &str = "/";

fn course_not_found() -> String {
    COURSE_NOT_FOUND_MESSAGE.to_string()
}

/// Normalizes a folder given by the caller: `images/` and `/images` both name `/images`.
fn folder_of(query: &DocumentListQuery) -> String {
    match query.path.as_deref().map(|p| p.trim_matches('/')) {
        None | Some("") => ROOT_FOLDER.to_string(),
        Some(folder) => format!("/{}", folder),
    }
}

pub struct DocumentService;

impl DocumentService {
    #[instrument(skip(lms))]
    pub async fn list_documents(
        lms: &dyn Lms,
        course_code: &str,
        query: DocumentListQuery,
    ) -> Result<Vec<Document>, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        lms.list_documents(course_code, &folder_of(&query))
            .await
            .map_err(host_unavailable)
    }

    #[instrument(skip(lms))]
    pub async fn list_learning_path_documents(
        lms: &dyn Lms,
        course_code: &str,
        learning_path_id: i64,
    ) -> Result<Vec<Document>, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        require_learning_path(lms, course_code, learning_path_id).await?;

        lms.list_learning_path_documents(learning_path_id)
            .await
            .map_err(host_unavailable)
    }

    /// Writes an HTML document and appends it to the learning path.
    #[instrument(skip(lms, dto), fields(document.title = %dto.title))]
    pub async fn create_learning_path_document(
        lms: &dyn Lms,
        course_code: &str,
        learning_path_id: i64,
        dto: CreateLearningPathDocumentDto,
        creator_id: i64,
    ) -> Result<Document, AppError> {
        require_course(lms, course_code, course_not_found).await?;
        require_learning_path(lms, course_code, learning_path_id).await?;

        let author_id = dto.creator_id.unwrap_or(creator_id);
        let document = lms
            .create_learning_path_document(course_code, learning_path_id, &dto, author_id)
            .await
            .map_err(host_failure("Document could not be created."))?;

        info!(document.id = document.id, document.path = %document.path, "Document created");
        Ok(document)
    }
}
