//! In-memory reference host.

use std::path::Path;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use courseway_models::{
    Answer, Course, CourseCategory, CourseDescription, CourseListQuery, CourseResources,
    CreateAnswerDto, CreateCourseCategoryDto, CreateCourseDescriptionDto, CreateCourseDto,
    CreateLearningPathDocumentDto, CreateLearningPathDto, CreateQuestionDto, CreateSectionDto,
    CreateTestDto, Document, LearningPath, LearningPathCategory, LearningPathItem, Question, Test,
    ToolIntro, UserFilter,
};

use crate::error::{FixtureError, LmsError, LmsResult};
use crate::fixture::{Fixture, default_language};
use crate::host::{Lms, UserAccount};

/// Longest course code the host accepts.
pub const MAX_COURSE_CODE_LEN: usize = 40;
/// Default course quota: 100 MiB.
pub const DEFAULT_DISK_QUOTA: i64 = 100 * 1024 * 1024;
const DEFAULT_VISIBILITY: i64 = 2;

const SECTION_ITEM: &str = "dir";
const DOCUMENT_ITEM: &str = "document";
const QUIZ_ITEM: &str = "quiz";

/// Uppercase alphanumerics (and underscores) of `source`, at most [`MAX_COURSE_CODE_LEN`] long.
pub fn course_code_from(source: &str) -> String {
    source
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_uppercase())
        .take(MAX_COURSE_CODE_LEN)
        .collect()
}

fn file_slug(title: &str) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    }
}

struct NewItem<'a> {
    item_type: &'static str,
    title: &'a str,
    parent_id: i64,
    previous_id: Option<i64>,
    resource_id: Option<i64>,
    prerequisite: Option<i64>,
    author_id: Option<i64>,
}

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    users: Vec<UserAccount>,
    courses: Vec<Course>,
    descriptions: Vec<CourseDescription>,
    tool_intros: Vec<ToolIntro>,
    categories: Vec<CourseCategory>,
    learning_paths: Vec<LearningPath>,
    learning_path_categories: Vec<LearningPathCategory>,
    items: Vec<LearningPathItem>,
    documents: Vec<Document>,
    tests: Vec<Test>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn category_view(&self, category: &CourseCategory) -> CourseCategory {
        CourseCategory {
            children_count: self
                .categories
                .iter()
                .filter(|c| c.parent_code.as_deref() == Some(category.code.as_str()))
                .count() as i64,
            courses_count: self
                .courses
                .iter()
                .filter(|c| c.category_code.as_deref() == Some(category.code.as_str()))
                .count() as i64,
            ..category.clone()
        }
    }

    fn course_exists(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c.code == code)
    }

    fn learning_path(&self, learning_path_id: i64) -> LmsResult<&LearningPath> {
        self.learning_paths
            .iter()
            .find(|lp| lp.id == learning_path_id)
            .ok_or_else(|| {
                LmsError::Rejected(format!("learning path {} does not exist", learning_path_id))
            })
    }

    fn ordered_items(&self, learning_path_id: i64, item_type: &str) -> Vec<LearningPathItem> {
        let mut items: Vec<LearningPathItem> = self
            .items
            .iter()
            .filter(|item| item.learning_path_id == learning_path_id && item.item_type == item_type)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.parent_id, item.display_order));
        items
    }

    /// Places a new item among its siblings, after `previous_id` when given.
    fn insert_item(
        &mut self,
        learning_path_id: i64,
        new: NewItem<'_>,
    ) -> LmsResult<LearningPathItem> {
        self.learning_path(learning_path_id)?;
        let NewItem {
            item_type,
            title,
            parent_id,
            previous_id,
            resource_id,
            prerequisite,
            author_id,
        } = new;

        if parent_id != 0
            && !self.items.iter().any(|item| {
                item.id == parent_id
                    && item.learning_path_id == learning_path_id
                    && item.item_type == SECTION_ITEM
            })
        {
            return Err(LmsError::Rejected(format!(
                "item {} is not a section of this learning path",
                parent_id
            )));
        }

        let mut siblings: Vec<(i64, i64)> = self
            .items
            .iter()
            .filter(|item| item.learning_path_id == learning_path_id && item.parent_id == parent_id)
            .map(|item| (item.id, item.display_order))
            .collect();
        siblings.sort_by_key(|(_, order)| *order);

        let after = match previous_id {
            Some(0) => None,
            Some(id) => Some(
                siblings
                    .iter()
                    .copied()
                    .find(|(sibling, _)| *sibling == id)
                    .ok_or_else(|| {
                        LmsError::Rejected(format!("item {} is not a sibling of the new item", id))
                    })?,
            ),
            None => siblings.last().copied(),
        };

        let display_order = match (previous_id, after) {
            (Some(0), _) => 1,
            (_, Some((_, order))) => order + 1,
            (_, None) => 1,
        };

        for item in self.items.iter_mut().filter(|item| {
            item.learning_path_id == learning_path_id
                && item.parent_id == parent_id
                && item.display_order >= display_order
        }) {
            item.display_order += 1;
        }

        let item = LearningPathItem {
            id: self.next_id(),
            learning_path_id,
            item_type: item_type.to_string(),
            title: title.to_string(),
            parent_id,
            previous_id: after.map(|(id, _)| id).unwrap_or(0),
            display_order,
            resource_id,
            prerequisite,
            author_id,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    fn unique_document_path(&self, course_code: &str, title: &str) -> String {
        let slug = file_slug(title);
        let taken = |path: &str| {
            self.documents
                .iter()
                .any(|d| d.course_code == course_code && d.path == path)
        };

        let mut path = format!("/learning_path/{}.html", slug);
        let mut suffix = 1;
        while taken(&path) {
            path = format!("/learning_path/{}_{}.html", slug, suffix);
            suffix += 1;
        }
        path
    }

    fn remove_course(&mut self, code: &str) {
        let lp_ids: Vec<i64> = self
            .learning_paths
            .iter()
            .filter(|lp| lp.course_code == code)
            .map(|lp| lp.id)
            .collect();
        let question_ids: Vec<i64> = self
            .questions
            .iter()
            .filter(|q| q.course_code == code)
            .map(|q| q.id)
            .collect();

        self.courses.retain(|c| c.code != code);
        self.descriptions.retain(|d| d.course_code != code);
        self.tool_intros.retain(|t| t.course_code != code);
        self.learning_paths.retain(|lp| lp.course_code != code);
        self.learning_path_categories.retain(|c| c.course_code != code);
        self.items.retain(|item| !lp_ids.contains(&item.learning_path_id));
        self.documents.retain(|d| d.course_code != code);
        self.tests.retain(|t| t.course_code != code);
        self.questions.retain(|q| q.course_code != code);
        self.answers.retain(|a| !question_ids.contains(&a.question_id));
    }
}

/// Host kept entirely in memory.
///
/// Ids are sequential across every entity type.
#[derive(Debug, Default)]
pub struct InMemoryLms {
    store: RwLock<Store>,
}

impl InMemoryLms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let mut store = Store::default();

        store.last_id = fixture.users.iter().map(|u| u.id).max().unwrap_or(0);
        store.users = fixture.users;

        for category in fixture.categories {
            let id = store.next_id();
            store.categories.push(CourseCategory {
                id,
                code: category.code,
                name: category.name,
                parent_code: category.parent_code,
                children_count: 0,
                courses_count: 0,
            });
        }

        for course in fixture.courses {
            let id = store.next_id();
            store.courses.push(Course {
                id,
                directory: course.code.clone(),
                code: course.code,
                title: course.title,
                course_language: course.course_language,
                category_code: course.category_code,
                visibility: course.visibility,
                disk_quota: DEFAULT_DISK_QUOTA,
                subscribe: 1,
                unsubscribe: 0,
                department_name: None,
                department_url: None,
                intro_text: None,
                teachers: course.teachers,
                creator_id: None,
            });
        }

        debug!(
            users = store.users.len(),
            categories = store.categories.len(),
            courses = store.courses.len(),
            "In-memory host seeded"
        );

        Self {
            store: RwLock::new(store),
        }
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        Ok(Self::from_fixture(Fixture::load(path)?))
    }
}

#[async_trait]
impl Lms for InMemoryLms {
    async fn find_user(&self, username: &str) -> LmsResult<Option<UserAccount>> {
        let store = self.store.read().await;
        Ok(store.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, user_id: i64) -> LmsResult<Option<UserAccount>> {
        let store = self.store.read().await;
        Ok(store.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn check_password(&self, user: &UserAccount, password: &str) -> LmsResult<bool> {
        bcrypt::verify(password, &user.password_hash).map_err(|e| {
            LmsError::Unavailable(anyhow!(
                "Stored credential for `{}` is unreadable: {}",
                user.username,
                e
            ))
        })
    }

    async fn list_users(&self, filter: &UserFilter) -> LmsResult<Vec<UserAccount>> {
        let store = self.store.read().await;
        Ok(store
            .users
            .iter()
            .filter(|u| filter.id.is_none_or(|id| u.id == id))
            .filter(|u| filter.username.as_deref().is_none_or(|name| u.username == name))
            .filter(|u| {
                filter
                    .email
                    .as_deref()
                    .is_none_or(|email| u.email.as_deref() == Some(email))
            })
            .filter(|u| filter.status.is_none_or(|status| u.status == status))
            .cloned()
            .collect())
    }

    async fn list_courses(&self, query: &CourseListQuery) -> LmsResult<Vec<Course>> {
        let store = self.store.read().await;
        let also_search_code = query.also_search_code.unwrap_or(false);

        let mut courses: Vec<Course> = store
            .courses
            .iter()
            .filter(|c| query.visibility.is_none_or(|v| c.visibility == v))
            .filter(|c| match query.startwith.as_deref() {
                None | Some("") => true,
                Some(prefix) => {
                    c.title.starts_with(prefix) || (also_search_code && c.code.starts_with(prefix))
                }
            })
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.title.cmp(&b.title));

        let from = query.from.unwrap_or(0).max(0) as usize;
        let courses = courses.into_iter().skip(from);
        Ok(match query.howmany {
            Some(howmany) if howmany > 0 => courses.take(howmany as usize).collect(),
            _ => courses.collect(),
        })
    }

    async fn find_course(&self, code: &str) -> LmsResult<Option<Course>> {
        let store = self.store.read().await;
        Ok(store.courses.iter().find(|c| c.code == code).cloned())
    }

    async fn create_course(&self, input: &CreateCourseDto, creator_id: i64) -> LmsResult<Course> {
        let mut store = self.store.write().await;

        let source = input
            .wanted_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .unwrap_or(input.title.as_str());
        let code = course_code_from(source);
        if code.is_empty() {
            return Err(LmsError::Rejected(format!(
                "no course code can be derived from `{}`",
                source
            )));
        }
        if store.course_exists(&code) {
            return Err(LmsError::Conflict(format!("course code `{}` is taken", code)));
        }

        let teachers = if input.teachers.is_empty() {
            vec![creator_id]
        } else {
            input.teachers.clone()
        };

        let course = Course {
            id: store.next_id(),
            directory: code.clone(),
            code,
            title: input.title.clone(),
            course_language: input.course_language.clone().unwrap_or_else(default_language),
            category_code: input.course_category.clone(),
            visibility: input.visibility.unwrap_or(DEFAULT_VISIBILITY),
            disk_quota: input.disk_quota.unwrap_or(DEFAULT_DISK_QUOTA),
            subscribe: input.subscribe.unwrap_or(1),
            unsubscribe: input.unsubscribe.unwrap_or(0),
            department_name: input.department_name.clone(),
            department_url: input.department_url.clone(),
            intro_text: input.intro_text.clone(),
            teachers,
            creator_id: Some(creator_id),
        };
        store.courses.push(course.clone());

        debug!(course.code = %course.code, "Course stored");
        Ok(course)
    }

    async fn delete_course(&self, code: &str) -> LmsResult<bool> {
        let mut store = self.store.write().await;
        if !store.course_exists(code) {
            return Ok(false);
        }
        store.remove_course(code);
        Ok(true)
    }

    async fn add_course_description(
        &self,
        course_code: &str,
        input: &CreateCourseDescriptionDto,
    ) -> LmsResult<CourseDescription> {
        let mut store = self.store.write().await;

        if store
            .descriptions
            .iter()
            .any(|d| d.course_code == course_code && d.description_type == input.description_type)
        {
            return Err(LmsError::Conflict(format!(
                "description type {} already exists",
                input.description_type
            )));
        }

        let description = CourseDescription {
            id: store.next_id(),
            course_code: course_code.to_string(),
            description_type: input.description_type,
            title: input.title.clone(),
            content: input.content.clone(),
        };
        store.descriptions.push(description.clone());
        Ok(description)
    }

    async fn set_tool_intro(
        &self,
        course_code: &str,
        tool_id: &str,
        session_id: i64,
        intro_text: &str,
    ) -> LmsResult<ToolIntro> {
        let mut store = self.store.write().await;
        let intro = ToolIntro {
            course_code: course_code.to_string(),
            tool_id: tool_id.to_string(),
            session_id,
            intro_text: intro_text.to_string(),
        };

        match store.tool_intros.iter_mut().find(|t| {
            t.course_code == course_code && t.tool_id == tool_id && t.session_id == session_id
        }) {
            Some(existing) => *existing = intro.clone(),
            None => store.tool_intros.push(intro.clone()),
        }
        Ok(intro)
    }

    async fn course_resources(&self, course_code: &str) -> LmsResult<CourseResources> {
        let store = self.store.read().await;
        Ok(CourseResources {
            documents: store
                .documents
                .iter()
                .filter(|d| d.course_code == course_code)
                .cloned()
                .collect(),
            learning_paths: store
                .learning_paths
                .iter()
                .filter(|lp| lp.course_code == course_code)
                .cloned()
                .collect(),
            tests: store
                .tests
                .iter()
                .filter(|t| t.course_code == course_code)
                .cloned()
                .collect(),
            questions: store
                .questions
                .iter()
                .filter(|q| q.course_code == course_code)
                .cloned()
                .collect(),
        })
    }

    async fn list_categories(&self) -> LmsResult<Vec<CourseCategory>> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .iter()
            .map(|c| store.category_view(c))
            .collect())
    }

    async fn find_category(&self, code: &str) -> LmsResult<Option<CourseCategory>> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .iter()
            .find(|c| c.code == code)
            .map(|c| store.category_view(c)))
    }

    async fn create_category(&self, input: &CreateCourseCategoryDto) -> LmsResult<CourseCategory> {
        let mut store = self.store.write().await;

        if store.categories.iter().any(|c| c.code == input.category_code) {
            return Err(LmsError::Conflict(format!(
                "category code `{}` is taken",
                input.category_code
            )));
        }
        if let Some(parent) = &input.parent_code
            && !store.categories.iter().any(|c| &c.code == parent)
        {
            return Err(LmsError::Rejected(format!("unknown parent `{}`", parent)));
        }

        let category = CourseCategory {
            id: store.next_id(),
            code: input.category_code.clone(),
            name: input.name.clone(),
            parent_code: input.parent_code.clone(),
            children_count: 0,
            courses_count: 0,
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, code: &str) -> LmsResult<bool> {
        let mut store = self.store.write().await;
        let Some(category) = store.categories.iter().find(|c| c.code == code) else {
            return Ok(false);
        };

        if store.category_view(category).children_count > 0 {
            return Err(LmsError::Rejected(format!(
                "category `{}` still has subcategories",
                code
            )));
        }

        store.categories.retain(|c| c.code != code);
        for course in store
            .courses
            .iter_mut()
            .filter(|c| c.category_code.as_deref() == Some(code))
        {
            course.category_code = None;
        }
        Ok(true)
    }

    async fn list_learning_paths(&self, course_code: &str) -> LmsResult<Vec<LearningPath>> {
        let store = self.store.read().await;
        let mut paths: Vec<LearningPath> = store
            .learning_paths
            .iter()
            .filter(|lp| lp.course_code == course_code)
            .cloned()
            .collect();
        paths.sort_by_key(|lp| lp.display_order);
        Ok(paths)
    }

    async fn find_learning_path(
        &self,
        course_code: &str,
        learning_path_id: i64,
    ) -> LmsResult<Option<LearningPath>> {
        let store = self.store.read().await;
        Ok(store
            .learning_paths
            .iter()
            .find(|lp| lp.course_code == course_code && lp.id == learning_path_id)
            .cloned())
    }

    async fn create_learning_path(
        &self,
        course_code: &str,
        input: &CreateLearningPathDto,
        creator_id: i64,
    ) -> LmsResult<LearningPath> {
        let mut store = self.store.write().await;

        let category_id = input.category_id.unwrap_or(0);
        if category_id != 0
            && !store
                .learning_path_categories
                .iter()
                .any(|c| c.id == category_id && c.course_code == course_code)
        {
            return Err(LmsError::Rejected(format!(
                "learning path category {} does not exist",
                category_id
            )));
        }

        let display_order = store
            .learning_paths
            .iter()
            .filter(|lp| lp.course_code == course_code)
            .count() as i64
            + 1;
        let path = LearningPath {
            id: store.next_id(),
            course_code: course_code.to_string(),
            name: input.name.clone(),
            category_id,
            creator_id,
            display_order,
        };
        store.learning_paths.push(path.clone());
        Ok(path)
    }

    async fn list_learning_path_categories(
        &self,
        course_code: &str,
    ) -> LmsResult<Vec<LearningPathCategory>> {
        let store = self.store.read().await;
        Ok(store
            .learning_path_categories
            .iter()
            .filter(|c| c.course_code == course_code)
            .cloned()
            .collect())
    }

    async fn create_learning_path_category(
        &self,
        course_code: &str,
        name: &str,
    ) -> LmsResult<LearningPathCategory> {
        let mut store = self.store.write().await;
        let position = store
            .learning_path_categories
            .iter()
            .filter(|c| c.course_code == course_code)
            .count() as i64
            + 1;
        let category = LearningPathCategory {
            id: store.next_id(),
            course_code: course_code.to_string(),
            name: name.to_string(),
            position,
        };
        store.learning_path_categories.push(category.clone());
        Ok(category)
    }

    async fn list_sections(&self, learning_path_id: i64) -> LmsResult<Vec<LearningPathItem>> {
        let store = self.store.read().await;
        Ok(store.ordered_items(learning_path_id, SECTION_ITEM))
    }

    async fn list_learning_path_items(
        &self,
        learning_path_id: i64,
    ) -> LmsResult<Vec<LearningPathItem>> {
        let store = self.store.read().await;
        let mut items: Vec<LearningPathItem> = store
            .items
            .iter()
            .filter(|item| item.learning_path_id == learning_path_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.parent_id, item.display_order));
        Ok(items)
    }

    async fn create_section(
        &self,
        learning_path_id: i64,
        input: &CreateSectionDto,
    ) -> LmsResult<LearningPathItem> {
        let mut store = self.store.write().await;
        store.insert_item(
            learning_path_id,
            NewItem {
                item_type: SECTION_ITEM,
                title: &input.title,
                parent_id: input.parent_id.unwrap_or(0),
                previous_id: input.previous_id,
                resource_id: None,
                prerequisite: None,
                author_id: None,
            },
        )
    }

    async fn list_documents(&self, course_code: &str, folder: &str) -> LmsResult<Vec<Document>> {
        let store = self.store.read().await;
        Ok(store
            .documents
            .iter()
            .filter(|d| d.course_code == course_code && d.folder() == folder)
            .cloned()
            .collect())
    }

    async fn list_learning_path_documents(
        &self,
        learning_path_id: i64,
    ) -> LmsResult<Vec<Document>> {
        let store = self.store.read().await;
        Ok(store
            .ordered_items(learning_path_id, DOCUMENT_ITEM)
            .iter()
            .filter_map(|item| item.resource_id)
            .filter_map(|id| store.documents.iter().find(|d| d.id == id).cloned())
            .collect())
    }

    async fn create_learning_path_document(
        &self,
        course_code: &str,
        learning_path_id: i64,
        input: &CreateLearningPathDocumentDto,
        creator_id: i64,
    ) -> LmsResult<Document> {
        let mut store = self.store.write().await;
        store.learning_path(learning_path_id)?;

        let content = input.content.clone().unwrap_or_default();
        let document = Document {
            id: store.next_id(),
            course_code: course_code.to_string(),
            path: store.unique_document_path(course_code, &input.title),
            title: input.title.clone(),
            filetype: "file".to_string(),
            comment: input.comment.clone(),
            size: content.len() as i64,
        };

        store.insert_item(
            learning_path_id,
            NewItem {
                item_type: DOCUMENT_ITEM,
                title: &input.title,
                parent_id: input.parent_id.unwrap_or(0),
                previous_id: input.previous_id,
                resource_id: Some(document.id),
                prerequisite: input.prerequisite,
                author_id: Some(creator_id),
            },
        )?;
        store.documents.push(document.clone());

        debug!(
            document.id = document.id,
            creator.id = creator_id,
            "Learning path document stored"
        );
        Ok(document)
    }

    async fn list_tests(&self, course_code: &str) -> LmsResult<Vec<Test>> {
        let store = self.store.read().await;
        Ok(store
            .tests
            .iter()
            .filter(|t| t.course_code == course_code)
            .cloned()
            .collect())
    }

    async fn find_test(&self, course_code: &str, test_id: i64) -> LmsResult<Option<Test>> {
        let store = self.store.read().await;
        Ok(store
            .tests
            .iter()
            .find(|t| t.course_code == course_code && t.id == test_id)
            .cloned())
    }

    async fn create_test(&self, course_code: &str, input: &CreateTestDto) -> LmsResult<Test> {
        let mut store = self.store.write().await;
        let test = Test {
            id: store.next_id(),
            course_code: course_code.to_string(),
            title: input.title.clone(),
            description: input.description.clone(),
            quiz_type: input.quiz_type.unwrap_or(1),
            feedback_type: input.feedback_type.unwrap_or(0),
            results_disabled: input.results_disabled.unwrap_or(0),
            attempts: input.attempts.unwrap_or(0),
            random: input.random.unwrap_or(0),
            random_answers: input.random_answers.unwrap_or(0),
            expired_time: input.expired_time.unwrap_or(0),
            pass_percentage: input.pass_percentage.unwrap_or(0),
            text_when_finished: input.text_when_finished.clone(),
            start_time: input.start_time.clone(),
            end_time: input.end_time.clone(),
            categories: input.categories.clone(),
            question_ids: Vec::new(),
        };
        store.tests.push(test.clone());
        Ok(test)
    }

    async fn delete_test(&self, course_code: &str, test_id: i64) -> LmsResult<bool> {
        let mut store = self.store.write().await;
        let before = store.tests.len();
        store
            .tests
            .retain(|t| !(t.course_code == course_code && t.id == test_id));
        Ok(store.tests.len() < before)
    }

    async fn add_test_to_learning_path(
        &self,
        learning_path_id: i64,
        test: &Test,
        parent_id: i64,
        previous_id: Option<i64>,
        author_id: i64,
    ) -> LmsResult<LearningPathItem> {
        let mut store = self.store.write().await;
        store.insert_item(
            learning_path_id,
            NewItem {
                item_type: QUIZ_ITEM,
                title: &test.title,
                parent_id,
                previous_id,
                resource_id: Some(test.id),
                prerequisite: None,
                author_id: Some(author_id),
            },
        )
    }

    async fn list_questions(&self, course_code: &str, test_id: i64) -> LmsResult<Vec<Question>> {
        let store = self.store.read().await;
        let Some(test) = store
            .tests
            .iter()
            .find(|t| t.course_code == course_code && t.id == test_id)
        else {
            return Ok(Vec::new());
        };

        Ok(test
            .question_ids
            .iter()
            .filter_map(|id| store.questions.iter().find(|q| q.id == *id).cloned())
            .collect())
    }

    async fn find_question(
        &self,
        course_code: &str,
        question_id: i64,
    ) -> LmsResult<Option<Question>> {
        let store = self.store.read().await;
        Ok(store
            .questions
            .iter()
            .find(|q| q.course_code == course_code && q.id == question_id)
            .cloned())
    }

    async fn create_question(
        &self,
        course_code: &str,
        test_id: Option<i64>,
        input: &CreateQuestionDto,
    ) -> LmsResult<Question> {
        let mut store = self.store.write().await;

        if let Some(test_id) = test_id
            && !store
                .tests
                .iter()
                .any(|t| t.course_code == course_code && t.id == test_id)
        {
            return Err(LmsError::Rejected(format!("test {} does not exist", test_id)));
        }

        let question = Question {
            id: store.next_id(),
            course_code: course_code.to_string(),
            title: input.title.clone(),
            question_type: input.question_type,
            description: input.description.clone().unwrap_or_default(),
            ponderation: input.ponderation.unwrap_or(0),
            picture: input.picture.clone().unwrap_or_default(),
            level: input.level.unwrap_or(1),
            extra: input.extra.clone().unwrap_or_default(),
            category: input.category.unwrap_or(0),
            feedback: input.feedback.clone(),
        };

        if let Some(test_id) = test_id
            && let Some(test) = store.tests.iter_mut().find(|t| t.id == test_id)
        {
            test.question_ids.push(question.id);
        }
        store.questions.push(question.clone());
        Ok(question)
    }

    async fn delete_question(&self, course_code: &str, question_id: i64) -> LmsResult<bool> {
        let mut store = self.store.write().await;
        let before = store.questions.len();
        store
            .questions
            .retain(|q| !(q.course_code == course_code && q.id == question_id));
        if store.questions.len() == before {
            return Ok(false);
        }

        for test in store.tests.iter_mut() {
            test.question_ids.retain(|id| *id != question_id);
        }
        store.answers.retain(|a| a.question_id != question_id);
        Ok(true)
    }

    async fn remove_question_from_test(
        &self,
        course_code: &str,
        test_id: i64,
        question_id: i64,
    ) -> LmsResult<bool> {
        let mut store = self.store.write().await;
        let Some(test) = store
            .tests
            .iter_mut()
            .find(|t| t.course_code == course_code && t.id == test_id)
        else {
            return Ok(false);
        };

        let before = test.question_ids.len();
        test.question_ids.retain(|id| *id != question_id);
        Ok(test.question_ids.len() < before)
    }

    async fn list_answers(&self, question_id: i64) -> LmsResult<Vec<Answer>> {
        let store = self.store.read().await;
        let mut answers: Vec<Answer> = store
            .answers
            .iter()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.position);
        Ok(answers)
    }

    async fn create_answer(
        &self,
        question_id: i64,
        input: &CreateAnswerDto,
        default_destination: &str,
    ) -> LmsResult<Answer> {
        let mut store = self.store.write().await;

        if !store.questions.iter().any(|q| q.id == question_id) {
            return Err(LmsError::Rejected(format!(
                "question {} does not exist",
                question_id
            )));
        }

        let position = input.position.filter(|p| *p != 0).unwrap_or_else(|| {
            store
                .answers
                .iter()
                .filter(|a| a.question_id == question_id)
                .map(|a| a.position)
                .max()
                .unwrap_or(0)
                + 1
        });

        let answer = Answer {
            id: store.next_id(),
            question_id,
            title: input.title.clone(),
            correct: input.correct.unwrap_or(0),
            ponderation: input.ponderation.unwrap_or(0),
            comment: input.comment.clone(),
            position,
            hotspot_coordinates: input.hotspot_coordinates.clone().filter(|s| !s.is_empty()),
            hotspot_type: input.hotspot_type.clone().filter(|s| !s.is_empty()),
            destination: input
                .destination
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default_destination.to_string()),
        };
        store.answers.push(answer.clone());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course_dto(title: &str) -> CreateCourseDto {
        serde_json::from_value(json!({"title": title})).unwrap()
    }

    fn seeded() -> InMemoryLms {
        let fixture: Fixture = serde_json::from_value(json!({
            "users": [
                {"id": 1, "username": "admin", "is_admin": true, "status": 1,
                 "password_hash": bcrypt::hash("secret", 4).unwrap()},
                {"id": 2, "username": "student", "email": "s@example.com",
                 "password_hash": bcrypt::hash("secret", 4).unwrap()}
            ],
            "categories": [{"code": "MATH", "name": "Mathematics"}],
            "courses": [
                {"code": "ALGEBRA", "title": "Algebra", "category_code": "MATH"},
                {"code": "BIO", "title": "Biology", "visibility": 1}
            ]
        }))
        .unwrap();
        InMemoryLms::from_fixture(fixture)
    }

    #[test]
    fn test_course_code_generation() {
        assert_eq!(course_code_from("Intro to Algebra!"), "INTROTOALGEBRA");
        assert_eq!(course_code_from("a_b-c"), "A_BC");
        assert_eq!(course_code_from(&"x".repeat(60)).len(), MAX_COURSE_CODE_LEN);
        assert_eq!(course_code_from("¿?"), "");
    }

    #[tokio::test]
    async fn test_users_and_passwords() {
        let lms = seeded();
        let admin = lms.find_user("admin").await.unwrap().unwrap();

        assert!(lms.check_password(&admin, "secret").await.unwrap());
        assert!(!lms.check_password(&admin, "wrong").await.unwrap());
        assert!(lms.find_user("nobody").await.unwrap().is_none());

        let filter = UserFilter {
            status: Some(5),
            ..Default::default()
        };
        let students = lms.list_users(&filter).await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].username, "student");
    }

    #[tokio::test]
    async fn test_course_listing_filters_and_pages() {
        let lms = seeded();

        let all = lms.list_courses(&CourseListQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let query = CourseListQuery {
            startwith: Some("BI".to_string()),
            ..Default::default()
        };
        assert!(lms.list_courses(&query).await.unwrap().is_empty());

        let query = CourseListQuery {
            startwith: Some("BI".to_string()),
            also_search_code: Some(true),
            ..Default::default()
        };
        assert_eq!(lms.list_courses(&query).await.unwrap()[0].code, "BIO");

        let query = CourseListQuery {
            from: Some(1),
            howmany: Some(1),
            ..Default::default()
        };
        assert_eq!(lms.list_courses(&query).await.unwrap()[0].code, "BIO");
    }

    #[tokio::test]
    async fn test_create_course_conflicts_on_code() {
        let lms = seeded();

        let course = lms.create_course(&course_dto("Geometry 101"), 1).await.unwrap();
        assert_eq!(course.code, "GEOMETRY101");
        assert_eq!(course.teachers, vec![1]);
        assert_eq!(course.visibility, 2);

        let err = lms.create_course(&course_dto("Algebra"), 1).await.unwrap_err();
        assert!(matches!(err, LmsError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_category_counts_and_delete() {
        let lms = seeded();
        let math = lms.find_category("MATH").await.unwrap().unwrap();
        assert_eq!(math.courses_count, 1);

        let child: CreateCourseCategoryDto = serde_json::from_value(json!({
            "name": "Geometry", "category_code": "GEO", "parent_code": "MATH"
        }))
        .unwrap();
        lms.create_category(&child).await.unwrap();

        assert!(matches!(
            lms.delete_category("MATH").await,
            Err(LmsError::Rejected(_))
        ));
        assert!(lms.delete_category("GEO").await.unwrap());
        assert!(lms.delete_category("MATH").await.unwrap());
        assert!(!lms.delete_category("MATH").await.unwrap());

        let algebra = lms.find_course("ALGEBRA").await.unwrap().unwrap();
        assert_eq!(algebra.category_code, None);
    }

    #[tokio::test]
    async fn test_sections_respect_previous_item() {
        let lms = seeded();
        let lp = lms
            .create_learning_path(
                "ALGEBRA",
                &serde_json::from_value(json!({"name": "Path"})).unwrap(),
                1,
            )
            .await
            .unwrap();

        let section = |title: &str, previous: Option<i64>| CreateSectionDto {
            title: title.to_string(),
            parent_id: None,
            previous_id: previous,
        };

        let first = lms.create_section(lp.id, &section("One", None)).await.unwrap();
        let third = lms.create_section(lp.id, &section("Three", None)).await.unwrap();
        let second = lms
            .create_section(lp.id, &section("Two", Some(first.id)))
            .await
            .unwrap();
        assert_eq!(second.previous_id, first.id);
        assert_eq!(third.previous_id, first.id);

        let titles: Vec<String> = lms
            .list_sections(lp.id)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);

        let err = lms
            .create_section(lp.id, &section("Orphan", Some(9999)))
            .await
            .unwrap_err();
        assert!(matches!(err, LmsError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_learning_path_documents() {
        let lms = seeded();
        let lp = lms
            .create_learning_path(
                "ALGEBRA",
                &serde_json::from_value(json!({"name": "Path"})).unwrap(),
                1,
            )
            .await
            .unwrap();
        let input: CreateLearningPathDocumentDto =
            serde_json::from_value(json!({"title": "Intro page", "content": "<p>Hi</p>"})).unwrap();

        let first = lms
            .create_learning_path_document("ALGEBRA", lp.id, &input, 1)
            .await
            .unwrap();
        let second = lms
            .create_learning_path_document("ALGEBRA", lp.id, &input, 1)
            .await
            .unwrap();

        assert_eq!(first.path, "/learning_path/intro_page.html");
        assert_eq!(second.path, "/learning_path/intro_page_1.html");
        assert_eq!(first.size, 9);
        assert_eq!(lms.list_learning_path_documents(lp.id).await.unwrap().len(), 2);
        assert_eq!(
            lms.list_documents("ALGEBRA", "/learning_path")
                .await
                .unwrap()
                .len(),
            2
        );
        assert!(lms.list_documents("ALGEBRA", "/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_questions_and_answers() {
        let lms = seeded();
        let test = lms
            .create_test(
                "ALGEBRA",
                &serde_json::from_value(json!({"title": "Quiz"})).unwrap(),
            )
            .await
            .unwrap();
        let question_input: CreateQuestionDto =
            serde_json::from_value(json!({"title": "2 + 2?", "type": 1})).unwrap();

        let question = lms
            .create_question("ALGEBRA", Some(test.id), &question_input)
            .await
            .unwrap();
        assert_eq!(question.level, 1);
        assert_eq!(lms.list_questions("ALGEBRA", test.id).await.unwrap().len(), 1);

        let answer_input: CreateAnswerDto =
            serde_json::from_value(json!({"title": "4", "correct": 1})).unwrap();
        let first = lms.create_answer(question.id, &answer_input, "").await.unwrap();
        let second = lms
            .create_answer(question.id, &answer_input, "0@@0@@0@@0")
            .await
            .unwrap();
        assert_eq!((first.position, second.position), (1, 2));
        assert_eq!(second.destination, "0@@0@@0@@0");

        assert!(lms
            .remove_question_from_test("ALGEBRA", test.id, question.id)
            .await
            .unwrap());
        assert!(lms.list_questions("ALGEBRA", test.id).await.unwrap().is_empty());
        assert!(lms.find_question("ALGEBRA", question.id).await.unwrap().is_some());

        assert!(lms.delete_question("ALGEBRA", question.id).await.unwrap());
        assert!(lms.list_answers(question.id).await.unwrap().is_empty());
        assert!(!lms.delete_question("ALGEBRA", question.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let lms = seeded();
        lms.create_test(
            "ALGEBRA",
            &serde_json::from_value(json!({"title": "Quiz"})).unwrap(),
        )
        .await
        .unwrap();
        assert!(!lms.course_resources("ALGEBRA").await.unwrap().is_empty());

        assert!(lms.delete_course("ALGEBRA").await.unwrap());
        assert!(lms.course_resources("ALGEBRA").await.unwrap().is_empty());
        assert!(!lms.delete_course("ALGEBRA").await.unwrap());
    }
}
