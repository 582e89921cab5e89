use anyhow::anyhow;
use tracing::{error, info, instrument, warn};

use courseway_core::AppError;
use courseway_lms::Lms;
use courseway_models::quizzes::SINGLE_PAGE_TYPE;
use courseway_models::{
    Answer, CreateAnswerDto, CreateLearningPathTestDto, CreateQuestionDto, CreateTestDto,
    Question, Test,
};

use crate::utils::host_helpers::{
    host_failure, host_unavailable, require_course, require_learning_path, require_question,
    require_test,
};

/// Destination of an answer in a single page test: no jump on success or failure.
const SINGLE_PAGE_DESTINATION: &str = "0@@0@@0@@0";

pub const TEST_CREATION_FAILED_MESSAGE: &str = "Test could not be created.";

async fn require_quiz_course(lms: &dyn Lms, course_code: &str) -> Result<(), AppError> {
    require_course(lms, course_code, || {
        format!("Course with code `{}` not found.", course_code)
    })
    .await
    .map(|_| ())
}

async fn require_question_course(lms: &dyn Lms, course_code: &str) -> Result<(), AppError> {
    require_course(lms, course_code, || {
        format!("Could not find course with course code: {}", course_code)
    })
    .await
    .map(|_| ())
}

fn default_destination(test: &Test) -> &'static str {
    if test.quiz_type == SINGLE_PAGE_TYPE {
        SINGLE_PAGE_DESTINATION
    } else {
        ""
    }
}

pub struct QuizService;

impl QuizService {
    #[instrument(skip(lms))]
    pub async fn list_tests(lms: &dyn Lms, course_code: &str) -> Result<Vec<Test>, AppError> {
        require_quiz_course(lms, course_code).await?;
        lms.list_tests(course_code).await.map_err(host_unavailable)
    }

    #[instrument(skip(lms, dto), fields(test.title = %dto.title))]
    pub async fn create_test(
        lms: &dyn Lms,
        course_code: &str,
        dto: CreateTestDto,
    ) -> Result<Test, AppError> {
        require_quiz_course(lms, course_code).await?;

        let test = lms
            .create_test(course_code, &dto.with_defaults())
            .await
            .map_err(host_failure(TEST_CREATION_FAILED_MESSAGE))?;

        info!(test.id = test.id, "Test created");
        Ok(test)
    }

    #[instrument(skip(lms))]
    pub async fn get_test(lms: &dyn Lms, course_code: &str, test_id: i64) -> Result<Test, AppError> {
        require_quiz_course(lms, course_code).await?;
        require_test(lms, course_code, test_id).await
    }

    #[instrument(skip(lms))]
    pub async fn delete_test(lms: &dyn Lms, course_code: &str, test_id: i64) -> Result<(), AppError> {
        require_quiz_course(lms, course_code).await?;
        require_test(lms, course_code, test_id).await?;

        let deleted = lms
            .delete_test(course_code, test_id)
            .await
            .map_err(host_failure("Test could not be deleted."))?;
        if !deleted {
            return Err(AppError::unprocessable(anyhow!("Test could not be deleted.")));
        }

        info!(test.id = test_id, "Test deleted");
        Ok(())
    }

    /// Creates a test and appends it to a learning path as a `quiz` item.
    ///
    /// The item is authored by `user_id` when given, else by `creator_id`. When the path
    /// refuses the item, the new test is deleted again so no orphan is left.
    #[instrument(skip(lms, dto), fields(test.title = %dto.test.title))]
    pub async fn create_learning_path_test(
        lms: &dyn Lms,
        course_code: &str,
        learning_path_id: i64,
        dto: CreateLearningPathTestDto,
        creator_id: i64,
    ) -> Result<Test, AppError> {
        require_quiz_course(lms, course_code).await?;
        require_learning_path(lms, course_code, learning_path_id).await?;

        let CreateLearningPathTestDto {
            test: input,
            parent_id,
            previous_id,
            user_id,
        } = dto;
        let author_id = user_id.unwrap_or(creator_id);
        let test = lms
            .create_test(course_code, &input.with_defaults())
            .await
            .map_err(host_failure(TEST_CREATION_FAILED_MESSAGE))?;

        if let Err(err) = lms
            .add_test_to_learning_path(
                learning_path_id,
                &test,
                parent_id.unwrap_or(0),
                previous_id,
                author_id,
            )
            .await
        {
            warn!(test.id = test.id, error = %err, "Learning path refused the test, rolling back");
            if let Err(cleanup) = lms.delete_test(course_code, test.id).await {
                error!(test.id = test.id, error = %cleanup, "Failed to delete orphaned test");
            }
            return Err(host_failure(TEST_CREATION_FAILED_MESSAGE)(err));
        }

        info!(test.id = test.id, learning_path.id = learning_path_id, "Test added to learning path");
        Ok(test)
    }

    #[instrument(skip(lms))]
    pub async fn list_questions(
        lms: &dyn Lms,
        course_code: &str,
        test_id: i64,
    ) -> Result<Vec<Question>, AppError> {
        require_quiz_course(lms, course_code).await?;
        require_test(lms, course_code, test_id).await?;

        lms.list_questions(course_code, test_id)
            .await
            .map_err(host_unavailable)
    }

    /// Creates a question, attached to `test_id` when given.
    #[instrument(skip(lms, dto), fields(question.title = %dto.title))]
    pub async fn create_question(
        lms: &dyn Lms,
        course_code: &str,
        test_id: Option<i64>,
        dto: CreateQuestionDto,
    ) -> Result<Question, AppError> {
        require_question_course(lms, course_code).await?;
        if let Some(test_id) = test_id {
            require_test(lms, course_code, test_id).await?;
        }

        let question = lms
            .create_question(course_code, test_id, &dto)
            .await
            .map_err(host_failure("Question could not be created."))?;

        info!(question.id = question.id, "Question created");
        Ok(question)
    }

    #[instrument(skip(lms))]
    pub async fn get_question(
        lms: &dyn Lms,
        course_code: &str,
        question_id: i64,
    ) -> Result<Question, AppError> {
        require_question_course(lms, course_code).await?;
        require_question(lms, course_code, question_id).await
    }

    #[instrument(skip(lms))]
    pub async fn delete_question(
        lms: &dyn Lms,
        course_code: &str,
        question_id: i64,
    ) -> Result<(), AppError> {
        require_question_course(lms, course_code).await?;
        require_question(lms, course_code, question_id).await?;

        let deleted = lms
            .delete_question(course_code, question_id)
            .await
            .map_err(host_failure("Question could not be deleted."))?;
        if !deleted {
            return Err(AppError::unprocessable(anyhow!("Question could not be deleted.")));
        }

        info!(question.id = question_id, "Question deleted");
        Ok(())
    }

    /// Detaches a question from a test. The question itself is kept.
    #[instrument(skip(lms))]
    pub async fn remove_question_from_test(
        lms: &dyn Lms,
        course_code: &str,
        test_id: i64,
        question_id: i64,
    ) -> Result<(), AppError> {
        require_question_course(lms, course_code).await?;
        require_test(lms, course_code, test_id).await?;
        require_question(lms, course_code, question_id).await?;

        let removed = lms
            .remove_question_from_test(course_code, test_id, question_id)
            .await
            .map_err(host_failure("Question could not be removed from test."))?;
        if !removed {
            return Err(AppError::unprocessable(anyhow!(
                "Question could not be removed from test."
            )));
        }
        Ok(())
    }

    #[instrument(skip(lms))]
    pub async fn list_answers(
        lms: &dyn Lms,
        course_code: &str,
        test_id: i64,
        question_id: i64,
    ) -> Result<Vec<Answer>, AppError> {
        require_quiz_course(lms, course_code).await?;
        require_test(lms, course_code, test_id).await?;
        require_question(lms, course_code, question_id).await?;

        lms.list_answers(question_id).await.map_err(host_unavailable)
    }

    #[instrument(skip(lms, dto), fields(answer.title = %dto.title))]
    pub async fn create_answer(
        lms: &dyn Lms,
        course_code: &str,
        test_id: i64,
        question_id: i64,
        dto: CreateAnswerDto,
    ) -> Result<Answer, AppError> {
        require_quiz_course(lms, course_code).await?;
        let test = require_test(lms, course_code, test_id).await?;
        require_question(lms, course_code, question_id).await?;

        let answer = lms
            .create_answer(question_id, &dto, default_destination(&test))
            .await
            .map_err(host_failure("Answer could not be created."))?;

        info!(answer.id = answer.id, question.id = question_id, "Answer created");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courseway_core::ErrorKind;
    use courseway_lms::{Fixture, FixtureCourse, InMemoryLms};
    use courseway_models::CreateLearningPathDto;

    fn lms() -> InMemoryLms {
        InMemoryLms::from_fixture(Fixture {
            users: vec![],
            categories: vec![],
            courses: vec![FixtureCourse {
                code: "CHEM".to_string(),
                title: "Chemistry".to_string(),
                category_code: None,
                visibility: 2,
                course_language: "english".to_string(),
                teachers: vec![],
            }],
        })
    }

    fn test_dto(title: &str) -> CreateTestDto {
        CreateTestDto {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn question_dto(title: &str) -> CreateQuestionDto {
        CreateQuestionDto {
            title: title.to_string(),
            question_type: 1,
            description: None,
            ponderation: Some(10),
            picture: None,
            level: None,
            extra: None,
            category: None,
            feedback: None,
        }
    }

    fn answer_dto(title: &str) -> CreateAnswerDto {
        CreateAnswerDto {
            title: title.to_string(),
            correct: Some(1),
            ponderation: Some(10),
            comment: None,
            position: Some(1),
            hotspot_coordinates: None,
            hotspot_type: None,
            destination: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_course_messages() {
        let lms = lms();

        let err = QuizService::list_tests(&lms, "NOPE").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Course with code `NOPE` not found.");

        let err = QuizService::create_question(&lms, "NOPE", None, question_dto("Q"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Could not find course with course code: NOPE");
    }

    #[tokio::test]
    async fn test_create_and_delete_test() {
        let lms = lms();
        let test = QuizService::create_test(&lms, "CHEM", test_dto("Atoms"))
            .await
            .unwrap();
        assert_eq!(test.quiz_type, SINGLE_PAGE_TYPE);

        QuizService::delete_test(&lms, "CHEM", test.id).await.unwrap();
        let err = QuizService::get_test(&lms, "CHEM", test.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Test not found.");
    }

    #[tokio::test]
    async fn test_question_lifecycle() {
        let lms = lms();
        let test = QuizService::create_test(&lms, "CHEM", test_dto("Bonds"))
            .await
            .unwrap();
        let question = QuizService::create_question(&lms, "CHEM", Some(test.id), question_dto("Ionic?"))
            .await
            .unwrap();

        let questions = QuizService::list_questions(&lms, "CHEM", test.id).await.unwrap();
        assert_eq!(questions, vec![question.clone()]);

        QuizService::remove_question_from_test(&lms, "CHEM", test.id, question.id)
            .await
            .unwrap();
        assert!(QuizService::list_questions(&lms, "CHEM", test.id).await.unwrap().is_empty());

        // still exists on its own
        QuizService::get_question(&lms, "CHEM", question.id).await.unwrap();

        let err = QuizService::remove_question_from_test(&lms, "CHEM", test.id, question.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unprocessable);
        assert_eq!(err.message, "Question could not be removed from test.");

        QuizService::delete_question(&lms, "CHEM", question.id).await.unwrap();
        let err = QuizService::get_question(&lms, "CHEM", question.id).await.unwrap_err();
        assert_eq!(err.message, format!("Could not find question with id = {}", question.id));
    }

    #[tokio::test]
    async fn test_answers_use_single_page_destination() {
        let lms = lms();
        let test = QuizService::create_test(&lms, "CHEM", test_dto("Acids"))
            .await
            .unwrap();
        let question = QuizService::create_question(&lms, "CHEM", Some(test.id), question_dto("pH?"))
            .await
            .unwrap();

        let answer = QuizService::create_answer(&lms, "CHEM", test.id, question.id, answer_dto("7"))
            .await
            .unwrap();
        assert_eq!(answer.destination, SINGLE_PAGE_DESTINATION);

        let answers = QuizService::list_answers(&lms, "CHEM", test.id, question.id)
            .await
            .unwrap();
        assert_eq!(answers, vec![answer]);
    }

    #[tokio::test]
    async fn test_learning_path_test_rolls_back_on_refusal() {
        let lms = lms();
        let learning_path = lms
            .create_learning_path(
                "CHEM",
                &CreateLearningPathDto {
                    name: "Lab".to_string(),
                    user_id: None,
                    category_id: None,
                },
                1,
            )
            .await
            .unwrap();

        let dto = |previous_id: Option<i64>| CreateLearningPathTestDto {
            test: test_dto("Safety"),
            parent_id: None,
            previous_id,
            user_id: None,
        };

        let test =
            QuizService::create_learning_path_test(&lms, "CHEM", learning_path.id, dto(None), 1)
                .await
                .unwrap();
        assert_eq!(lms.list_tests("CHEM").await.unwrap(), vec![test]);

        let err = QuizService::create_learning_path_test(
            &lms,
            "CHEM",
            learning_path.id,
            dto(Some(9999)),
            1,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unprocessable);
        assert_eq!(err.message, "Test could not be created.");
        assert_eq!(lms.list_tests("CHEM").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_learning_path_test_author() {
        let lms = lms();
        let learning_path = lms
            .create_learning_path(
                "CHEM",
                &CreateLearningPathDto {
                    name: "Lab".to_string(),
                    user_id: None,
                    category_id: None,
                },
                1,
            )
            .await
            .unwrap();

        let dto = |title: &str, user_id: Option<i64>| CreateLearningPathTestDto {
            test: test_dto(title),
            parent_id: None,
            previous_id: None,
            user_id,
        };

        let defaulted = QuizService::create_learning_path_test(
            &lms,
            "CHEM",
            learning_path.id,
            dto("Safety", None),
            1,
        )
        .await
        .unwrap();
        let explicit = QuizService::create_learning_path_test(
            &lms,
            "CHEM",
            learning_path.id,
            dto("Acids", Some(5)),
            1,
        )
        .await
        .unwrap();

        let items = lms.list_learning_path_items(learning_path.id).await.unwrap();
        let author_of = |test_id: i64| {
            items
                .iter()
                .find(|item| item.resource_id == Some(test_id))
                .and_then(|item| item.author_id)
        };
        assert_eq!(author_of(defaulted.id), Some(1));
        assert_eq!(author_of(explicit.id), Some(5));
    }
}
