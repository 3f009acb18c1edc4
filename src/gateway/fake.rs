//! In-memory gateway for tests and demos.
//!
//! Holds each collection behind a mutex and implements the same contract as
//! the HTTP gateway, so the coordinator runs the identical code path in both
//! environments. Tests can seed collections, script per-call failures and
//! latencies, and read call counters to assert that a call was (or was not)
//! issued.

use super::{EntityGateway, GatewayError, GatewayResult};
use crate::models::{
    AuthResponse, Category, CreateCategoryRequest, CreateExerciseRequest, CreateSetRequest,
    CreateTemplateExerciseRequest, CreateTemplateRequest, Exercise, ExerciseListQuery, Page,
    PageQuery, SetItem, SetListQuery, Template, TemplateExercise, UpdateCategoryRequest,
    UpdateExerciseRequest, UpdateSetRequest, UpdateTemplateExerciseRequest, UpdateTemplateRequest,
};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::time::Duration;
use uuid::Uuid;

#[derive(Default)]
struct Scripting {
    failures: HashMap<&'static str, VecDeque<u16>>,
    delays: HashMap<&'static str, VecDeque<Duration>>,
    calls: HashMap<&'static str, u64>,
}

#[derive(Default)]
pub struct FakeGateway {
    categories: Mutex<Vec<Category>>,
    exercises: Mutex<Vec<Exercise>>,
    sets: Mutex<Vec<SetItem>>,
    templates: Mutex<Vec<Template>>,
    scripting: Mutex<Scripting>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn seed_categories(&self, items: Vec<Category>) {
        *self.categories.lock().expect("fake categories lock") = items;
    }

    pub fn seed_exercises(&self, items: Vec<Exercise>) {
        *self.exercises.lock().expect("fake exercises lock") = items;
    }

    pub fn seed_sets(&self, items: Vec<SetItem>) {
        *self.sets.lock().expect("fake sets lock") = items;
    }

    pub fn seed_templates(&self, items: Vec<Template>) {
        *self.templates.lock().expect("fake templates lock") = items;
    }

    /// Scripts the next call to `operation` to fail with the given status.
    /// Multiple scripted failures for one operation apply in FIFO order.
    pub fn fail_next(&self, operation: &'static str, status: u16) {
        let mut scripting = self.scripting.lock().expect("fake scripting lock");
        scripting.failures.entry(operation).or_default().push_back(status);
    }

    /// Scripts a latency for the next call to `operation`; the response
    /// content is captured at call time and delivered after the delay.
    pub fn delay_next(&self, operation: &'static str, delay: Duration) {
        let mut scripting = self.scripting.lock().expect("fake scripting lock");
        scripting.delays.entry(operation).or_default().push_back(delay);
    }

    pub fn call_count(&self, operation: &'static str) -> u64 {
        let scripting = self.scripting.lock().expect("fake scripting lock");
        scripting.calls.get(operation).copied().unwrap_or(0)
    }

    fn begin(&self, operation: &'static str) -> GatewayResult<Option<Duration>> {
        let mut scripting = self.scripting.lock().expect("fake scripting lock");
        *scripting.calls.entry(operation).or_insert(0) += 1;
        if let Some(status) = scripting
            .failures
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
        {
            return Err(GatewayError::Status {
                status,
                message: format!("scripted {operation} failure"),
            });
        }
        Ok(scripting
            .delays
            .get_mut(operation)
            .and_then(VecDeque::pop_front))
    }

    async fn deliver<T>(delay: Option<Duration>, value: T) -> GatewayResult<T> {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(value)
    }

    fn find_category(&self, id: &str) -> GatewayResult<Category> {
        self.categories
            .lock()
            .expect("fake categories lock")
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or_else(|| not_found("category", id))
    }

    fn find_exercise(&self, id: &str) -> GatewayResult<Exercise> {
        self.exercises
            .lock()
            .expect("fake exercises lock")
            .iter()
            .find(|exercise| exercise.id == id)
            .cloned()
            .ok_or_else(|| not_found("exercise", id))
    }
}

fn not_found(kind: &str, id: &str) -> GatewayError {
    GatewayError::Status {
        status: 404,
        message: format!("{kind} {id} not found"),
    }
}

fn set_matches(set: &SetItem, query: &SetListQuery) -> bool {
    if let Some(wanted) = &query.exercise_id {
        let actual = set
            .exercise_id
            .as_deref()
            .or(set.exercise.as_ref().map(|exercise| exercise.id.as_str()));
        if actual != Some(wanted.as_str()) {
            return false;
        }
    }
    if query.created_from.is_some() || query.created_to.is_some() {
        let Some(created) = set.created_at else {
            return false;
        };
        let date = created.date();
        if query.created_from.is_some_and(|from| date < from) {
            return false;
        }
        if query.created_to.is_some_and(|to| date > to) {
            return false;
        }
    }
    true
}

#[async_trait]
impl EntityGateway for FakeGateway {
    async fn exchange_init_data(&self, init_data: &str) -> GatewayResult<AuthResponse> {
        let delay = self.begin("exchange_init_data")?;
        let response = AuthResponse {
            access_token: format!("fake-bearer-{:x}", init_data.len()),
            token_type: "bearer".to_string(),
        };
        Self::deliver(delay, response).await
    }

    async fn list_categories(&self, _page: &PageQuery) -> GatewayResult<Page<Category>> {
        let delay = self.begin("list_categories")?;
        let items = self.categories.lock().expect("fake categories lock").clone();
        Self::deliver(delay, Page::single(items)).await
    }

    async fn create_category(&self, request: &CreateCategoryRequest) -> GatewayResult<Category> {
        let delay = self.begin("create_category")?;
        let category = Category {
            id: Self::generate_id(),
            title: request.title.clone(),
        };
        self.categories
            .lock()
            .expect("fake categories lock")
            .push(category.clone());
        Self::deliver(delay, category).await
    }

    async fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> GatewayResult<Category> {
        let delay = self.begin("update_category")?;
        let updated = {
            let mut categories = self.categories.lock().expect("fake categories lock");
            let category = categories
                .iter_mut()
                .find(|category| category.id == id)
                .ok_or_else(|| not_found("category", id))?;
            category.title = request.title.clone();
            category.clone()
        };
        Self::deliver(delay, updated).await
    }

    async fn delete_category(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("delete_category")?;
        self.categories
            .lock()
            .expect("fake categories lock")
            .retain(|category| category.id != id);
        Self::deliver(delay, ()).await
    }

    async fn list_exercises(&self, query: &ExerciseListQuery) -> GatewayResult<Page<Exercise>> {
        let delay = self.begin("list_exercises")?;
        let items: Vec<Exercise> = self
            .exercises
            .lock()
            .expect("fake exercises lock")
            .iter()
            .filter(|exercise| {
                query
                    .category_id
                    .as_deref()
                    .map_or(true, |category_id| exercise.category.id == category_id)
            })
            .filter(|exercise| {
                query
                    .is_archived
                    .map_or(true, |archived| exercise.is_archived == archived)
            })
            .cloned()
            .collect();
        Self::deliver(delay, Page::single(items)).await
    }

    async fn create_exercise(&self, request: &CreateExerciseRequest) -> GatewayResult<Exercise> {
        let delay = self.begin("create_exercise")?;
        let category = self.find_category(&request.category_id)?;
        let now = Utc::now().naive_utc();
        let exercise = Exercise {
            id: Self::generate_id(),
            title: request.title.clone(),
            short: request.short.clone(),
            category,
            is_archived: false,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.exercises
            .lock()
            .expect("fake exercises lock")
            .push(exercise.clone());
        Self::deliver(delay, exercise).await
    }

    async fn update_exercise(
        &self,
        id: &str,
        request: &UpdateExerciseRequest,
    ) -> GatewayResult<Exercise> {
        let delay = self.begin("update_exercise")?;
        let updated = {
            let mut exercises = self.exercises.lock().expect("fake exercises lock");
            let exercise = exercises
                .iter_mut()
                .find(|exercise| exercise.id == id)
                .ok_or_else(|| not_found("exercise", id))?;
            if let Some(title) = &request.title {
                exercise.title = title.clone();
            }
            if let Some(short) = &request.short {
                exercise.short = short.clone();
            }
            exercise.updated_at = Some(Utc::now().naive_utc());
            exercise.clone()
        };
        Self::deliver(delay, updated).await
    }

    async fn delete_exercise(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("delete_exercise")?;
        self.exercises
            .lock()
            .expect("fake exercises lock")
            .retain(|exercise| exercise.id != id);
        Self::deliver(delay, ()).await
    }

    async fn archive_exercise(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("archive_exercise")?;
        {
            let mut exercises = self.exercises.lock().expect("fake exercises lock");
            let exercise = exercises
                .iter_mut()
                .find(|exercise| exercise.id == id)
                .ok_or_else(|| not_found("exercise", id))?;
            exercise.is_archived = true;
        }
        Self::deliver(delay, ()).await
    }

    async fn restore_exercise(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("restore_exercise")?;
        {
            let mut exercises = self.exercises.lock().expect("fake exercises lock");
            let exercise = exercises
                .iter_mut()
                .find(|exercise| exercise.id == id)
                .ok_or_else(|| not_found("exercise", id))?;
            exercise.is_archived = false;
        }
        Self::deliver(delay, ()).await
    }

    async fn list_sets(&self, query: &SetListQuery) -> GatewayResult<Page<SetItem>> {
        let delay = self.begin("list_sets")?;
        let items: Vec<SetItem> = self
            .sets
            .lock()
            .expect("fake sets lock")
            .iter()
            .filter(|set| set_matches(set, query))
            .cloned()
            .collect();
        Self::deliver(delay, Page::single(items)).await
    }

    async fn create_set(&self, request: &CreateSetRequest) -> GatewayResult<SetItem> {
        let delay = self.begin("create_set")?;
        let exercise = self.find_exercise(&request.exercise_id)?;
        let set = SetItem {
            id: Self::generate_id(),
            exercise_id: Some(exercise.id.clone()),
            exercise: Some(exercise),
            reps: request.reps,
            weight: request.weight,
            created_at: Some(request.created_at.unwrap_or_else(|| Utc::now().naive_utc())),
        };
        self.sets.lock().expect("fake sets lock").push(set.clone());
        Self::deliver(delay, set).await
    }

    async fn update_set(&self, id: &str, request: &UpdateSetRequest) -> GatewayResult<SetItem> {
        let delay = self.begin("update_set")?;
        let updated = {
            let mut sets = self.sets.lock().expect("fake sets lock");
            let set = sets
                .iter_mut()
                .find(|set| set.id == id)
                .ok_or_else(|| not_found("set", id))?;
            if let Some(reps) = request.reps {
                set.reps = reps;
            }
            if let Some(weight) = request.weight {
                set.weight = weight;
            }
            set.clone()
        };
        Self::deliver(delay, updated).await
    }

    async fn delete_set(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("delete_set")?;
        self.sets
            .lock()
            .expect("fake sets lock")
            .retain(|set| set.id != id);
        Self::deliver(delay, ()).await
    }

    async fn list_templates(&self, _page: &PageQuery) -> GatewayResult<Page<Template>> {
        let delay = self.begin("list_templates")?;
        let items = self.templates.lock().expect("fake templates lock").clone();
        Self::deliver(delay, Page::single(items)).await
    }

    async fn list_templates_today(&self, _page: &PageQuery) -> GatewayResult<Page<Template>> {
        let delay = self.begin("list_templates_today")?;
        let today = Utc::now().weekday().num_days_from_monday() as u8;
        let items: Vec<Template> = self
            .templates
            .lock()
            .expect("fake templates lock")
            .iter()
            .filter(|template| template.day_of_week == Some(today))
            .cloned()
            .collect();
        Self::deliver(delay, Page::single(items)).await
    }

    async fn create_template(&self, request: &CreateTemplateRequest) -> GatewayResult<Template> {
        let delay = self.begin("create_template")?;
        let mut exercises = Vec::with_capacity(request.exercises.len());
        for input in &request.exercises {
            exercises.push(TemplateExercise {
                id: Self::generate_id(),
                default_weight: input.default_weight,
                default_reps: input.default_reps,
                order: input.order,
                exercise: self.find_exercise(&input.exercise_id)?,
            });
        }
        let now = Utc::now().naive_utc();
        let mut template = Template {
            id: Self::generate_id(),
            title: request.title.clone(),
            day_of_week: request.day_of_week,
            created_at: Some(now),
            updated_at: Some(now),
            exercises,
        };
        template.resequence_exercises();
        self.templates
            .lock()
            .expect("fake templates lock")
            .push(template.clone());
        Self::deliver(delay, template).await
    }

    async fn update_template(
        &self,
        id: &str,
        request: &UpdateTemplateRequest,
    ) -> GatewayResult<Template> {
        let delay = self.begin("update_template")?;
        let updated = {
            let mut templates = self.templates.lock().expect("fake templates lock");
            let template = templates
                .iter_mut()
                .find(|template| template.id == id)
                .ok_or_else(|| not_found("template", id))?;
            if let Some(title) = &request.title {
                template.title = title.clone();
            }
            if let Some(day_of_week) = request.day_of_week {
                template.day_of_week = Some(day_of_week);
            }
            template.updated_at = Some(Utc::now().naive_utc());
            template.clone()
        };
        Self::deliver(delay, updated).await
    }

    async fn delete_template(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("delete_template")?;
        self.templates
            .lock()
            .expect("fake templates lock")
            .retain(|template| template.id != id);
        Self::deliver(delay, ()).await
    }

    async fn create_template_exercise(
        &self,
        request: &CreateTemplateExerciseRequest,
    ) -> GatewayResult<TemplateExercise> {
        let delay = self.begin("create_template_exercise")?;
        let entry = TemplateExercise {
            id: Self::generate_id(),
            default_weight: request.default_weight,
            default_reps: request.default_reps,
            order: request.order,
            exercise: self.find_exercise(&request.exercise_id)?,
        };
        {
            let mut templates = self.templates.lock().expect("fake templates lock");
            let template = templates
                .iter_mut()
                .find(|template| template.id == request.template_id)
                .ok_or_else(|| not_found("template", &request.template_id))?;
            template.exercises.push(entry.clone());
            template.resequence_exercises();
        }
        Self::deliver(delay, entry).await
    }

    async fn update_template_exercise(
        &self,
        id: &str,
        request: &UpdateTemplateExerciseRequest,
    ) -> GatewayResult<TemplateExercise> {
        let delay = self.begin("update_template_exercise")?;
        let updated = {
            let mut templates = self.templates.lock().expect("fake templates lock");
            let template = templates
                .iter_mut()
                .find(|template| template.exercises.iter().any(|entry| entry.id == id))
                .ok_or_else(|| not_found("template exercise", id))?;
            let entry = template
                .exercises
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or_else(|| not_found("template exercise", id))?;
            if let Some(weight) = request.default_weight {
                entry.default_weight = Some(weight);
            }
            if let Some(reps) = request.default_reps {
                entry.default_reps = Some(reps);
            }
            if let Some(order) = request.order {
                entry.order = Some(order);
            }
            let updated = entry.clone();
            template.resequence_exercises();
            updated
        };
        Self::deliver(delay, updated).await
    }

    async fn delete_template_exercise(&self, id: &str) -> GatewayResult<()> {
        let delay = self.begin("delete_template_exercise")?;
        {
            let mut templates = self.templates.lock().expect("fake templates lock");
            for template in templates.iter_mut() {
                template.exercises.retain(|entry| entry.id != id);
            }
        }
        Self::deliver(delay, ()).await
    }
}
