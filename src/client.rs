//! View-facing client core.
//!
//! `ClientCore` owns every entity collection plus the scope and filter
//! state; nothing else mutates them. All mutations are confirm-then-apply:
//! the gateway call settles first, and only a success touches the local
//! store, so a failure never needs rollback and the view keeps the
//! last-known-good state plus an error notice.

use crate::auth::CredentialStore;
use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::filters::{FilterComposer, SetFilter};
use crate::gateway::http::HttpGateway;
use crate::gateway::{EntityGateway, GatewayResult};
use crate::grouping::{group_by_day, DayGroup};
use crate::models::{
    Category, CreateCategoryRequest, CreateExerciseRequest, CreateSetRequest,
    CreateTemplateExerciseRequest, CreateTemplateRequest, EntityKind, ErrorNotice, Exercise,
    ExerciseListQuery, PageQuery, SetItem, Template, TemplateExercise, UpdateCategoryRequest,
    UpdateExerciseRequest, UpdateSetRequest, UpdateTemplateExerciseRequest, UpdateTemplateRequest,
};
use crate::scope::{ScopeController, ScopeSnapshot};
use crate::store::EntityStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub const MAX_EXERCISE_SHORT_CHARS: usize = 10;

/// Blocking yes/no interaction invoked before every delete. A "no" aborts
/// the mutation with no gateway call and no state change.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Approves every request. Suits hosts whose view layer runs its own
/// confirmation dialog before calling in.
pub struct AutoConfirm;

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

#[derive(Debug, Default)]
struct SetListState {
    store: EntityStore<SetItem>,
    loading: bool,
}

#[derive(Debug, Default)]
struct TemplateListState {
    store: EntityStore<Template>,
    loading: bool,
}

type MutationKey = (EntityKind, String);

/// Releases the per-id mutation slot when the mutation settles, on both the
/// success and the failure path.
struct MutationSlot<'a> {
    slots: &'a Mutex<HashSet<MutationKey>>,
    key: MutationKey,
}

impl Drop for MutationSlot<'_> {
    fn drop(&mut self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(&self.key);
        }
    }
}

pub struct ClientCore {
    gateway: Arc<dyn EntityGateway>,
    prompt: Arc<dyn ConfirmPrompt>,
    credentials: Arc<CredentialStore>,
    config: ClientConfig,
    categories: Mutex<EntityStore<Category>>,
    scope: Mutex<ScopeController>,
    filters: Mutex<FilterComposer>,
    sets: Mutex<SetListState>,
    templates: Mutex<TemplateListState>,
    in_flight: Mutex<HashSet<MutationKey>>,
    set_load_seq: AtomicU64,
    template_load_seq: AtomicU64,
    last_error: Mutex<Option<ErrorNotice>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &'static str) -> ClientResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| ClientError::Internal(format!("{what} lock poisoned")))
}

impl ClientCore {
    pub fn new(
        config: ClientConfig,
        gateway: Arc<dyn EntityGateway>,
        prompt: Arc<dyn ConfirmPrompt>,
        credentials: Arc<CredentialStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            prompt,
            credentials,
            config,
            categories: Mutex::new(EntityStore::new()),
            scope: Mutex::new(ScopeController::new()),
            filters: Mutex::new(FilterComposer::new()),
            sets: Mutex::new(SetListState::default()),
            templates: Mutex::new(TemplateListState::default()),
            in_flight: Mutex::new(HashSet::new()),
            set_load_seq: AtomicU64::new(0),
            template_load_seq: AtomicU64::new(0),
            last_error: Mutex::new(None),
        })
    }

    /// Production wiring: HTTP gateway sharing one credential store.
    pub fn with_http(config: ClientConfig) -> ClientResult<Arc<Self>> {
        config.validate()?;
        let credentials = Arc::new(CredentialStore::new());
        let gateway = Arc::new(HttpGateway::new(&config, credentials.clone()));
        Ok(Self::new(config, gateway, Arc::new(AutoConfirm), credentials))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ─── auth ───────────────────────────────────────────────────────────

    pub async fn authenticate(&self, init_data: &str) -> ClientResult<()> {
        if init_data.trim().is_empty() {
            return Err(ClientError::Validation("init data must not be empty".to_string()));
        }
        let response = self.settle(
            "exchange_init_data",
            self.gateway.exchange_init_data(init_data).await,
        )?;
        self.credentials.set(response.access_token);
        tracing::debug!("bearer credential established");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    // ─── categories ─────────────────────────────────────────────────────

    pub async fn reload_categories(&self) -> ClientResult<usize> {
        let page_query = PageQuery::sized(self.config.page_size);
        let page = self.settle(
            "list_categories",
            self.gateway.list_categories(&page_query).await,
        )?;
        let count = page.items.len();
        lock(&self.categories, "categories")?.replace_all(page.items);
        tracing::debug!(count, "categories reloaded");
        Ok(count)
    }

    pub fn categories(&self) -> ClientResult<Vec<Category>> {
        Ok(lock(&self.categories, "categories")?.to_vec())
    }

    pub async fn create_category(&self, title: &str) -> ClientResult<Category> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::Validation("category title must not be empty".to_string()));
        }
        let request = CreateCategoryRequest {
            title: title.to_string(),
        };
        let created = self.settle(
            "create_category",
            self.gateway.create_category(&request).await,
        )?;
        lock(&self.categories, "categories")?.insert(created.clone());
        Ok(created)
    }

    pub async fn rename_category(&self, id: &str, title: &str) -> ClientResult<Category> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::Validation("category title must not be empty".to_string()));
        }
        let _slot = self.claim_slot(EntityKind::Category, id)?;
        let request = UpdateCategoryRequest {
            title: title.to_string(),
        };
        let updated = self.settle(
            "update_category",
            self.gateway.update_category(id, &request).await,
        )?;
        lock(&self.categories, "categories")?.replace(id, updated.clone());
        lock(&self.scope, "scope")?.rename_open(id, &updated.title);
        Ok(updated)
    }

    /// Returns `Ok(false)` when the user declined the confirmation prompt.
    pub async fn delete_category(&self, id: &str) -> ClientResult<bool> {
        let _slot = self.claim_slot(EntityKind::Category, id)?;
        let title = lock(&self.categories, "categories")?
            .get(id)
            .map(|category| category.title.clone())
            .unwrap_or_else(|| id.to_string());
        if !self.prompt.confirm(&format!("Delete category \"{title}\"?")).await {
            return Ok(false);
        }
        self.settle("delete_category", self.gateway.delete_category(id).await)?;
        lock(&self.categories, "categories")?.remove(id);
        if lock(&self.scope, "scope")?.category_deleted(id) {
            tracing::debug!(category_id = id, "open scope closed by category delete");
        }
        Ok(true)
    }

    // ─── category scope ─────────────────────────────────────────────────

    pub async fn open_category(&self, id: &str) -> ClientResult<()> {
        let category = lock(&self.categories, "categories")?
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::Validation(format!("unknown category {id}")))?;
        let epoch = lock(&self.scope, "scope")?.open(category);
        let query = ExerciseListQuery {
            category_id: Some(id.to_string()),
            is_archived: None,
            page: PageQuery::sized(self.config.page_size),
        };
        match self.gateway.list_exercises(&query).await {
            Ok(page) => {
                let applied = lock(&self.scope, "scope")?.apply_loaded(epoch, page.items);
                if applied {
                    self.clear_error();
                } else {
                    tracing::debug!(category_id = id, "stale scoped exercise load discarded");
                }
                Ok(())
            }
            Err(error) => {
                if lock(&self.scope, "scope")?.note_load_failed(epoch) {
                    Err(self.fail("list_exercises", error))
                } else {
                    tracing::debug!(category_id = id, "stale scoped exercise load failure discarded");
                    Ok(())
                }
            }
        }
    }

    pub fn close_category(&self) -> ClientResult<()> {
        lock(&self.scope, "scope")?.close();
        Ok(())
    }

    pub fn scope(&self) -> ClientResult<Option<ScopeSnapshot>> {
        Ok(lock(&self.scope, "scope")?.snapshot())
    }

    /// Exercises offered for new-set creation: the open scope's collection
    /// with archived entries excluded.
    pub fn pickable_exercises(&self) -> ClientResult<Vec<Exercise>> {
        Ok(lock(&self.scope, "scope")?
            .snapshot()
            .map(|snapshot| {
                snapshot
                    .exercises
                    .into_iter()
                    .filter(|exercise| !exercise.is_archived)
                    .collect()
            })
            .unwrap_or_default())
    }

    // ─── exercises ──────────────────────────────────────────────────────

    pub async fn create_exercise(&self, title: &str, short: &str) -> ClientResult<Exercise> {
        let title = title.trim();
        let short = short.trim();
        if title.is_empty() {
            return Err(ClientError::Validation("exercise title must not be empty".to_string()));
        }
        if short.is_empty() || short.chars().count() > MAX_EXERCISE_SHORT_CHARS {
            return Err(ClientError::Validation(format!(
                "exercise short label must be 1-{MAX_EXERCISE_SHORT_CHARS} characters"
            )));
        }
        let category_id = lock(&self.scope, "scope")?
            .open_category()
            .map(|category| category.id.clone())
            .ok_or_else(|| ClientError::Validation("no category open".to_string()))?;
        let request = CreateExerciseRequest {
            category_id: category_id.clone(),
            title: title.to_string(),
            short: short.to_string(),
        };
        let created = self.settle(
            "create_exercise",
            self.gateway.create_exercise(&request).await,
        )?;
        let mut scope = lock(&self.scope, "scope")?;
        if scope.open_category().map(|category| category.id.as_str()) == Some(category_id.as_str()) {
            if let Some(store) = scope.exercises_mut() {
                store.insert(created.clone());
            }
        }
        Ok(created)
    }

    pub async fn update_exercise(
        &self,
        id: &str,
        request: UpdateExerciseRequest,
    ) -> ClientResult<Exercise> {
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(ClientError::Validation("exercise title must not be empty".to_string()));
            }
        }
        if let Some(short) = &request.short {
            if short.trim().is_empty() || short.trim().chars().count() > MAX_EXERCISE_SHORT_CHARS {
                return Err(ClientError::Validation(format!(
                    "exercise short label must be 1-{MAX_EXERCISE_SHORT_CHARS} characters"
                )));
            }
        }
        let _slot = self.claim_slot(EntityKind::Exercise, id)?;
        let updated = self.settle(
            "update_exercise",
            self.gateway.update_exercise(id, &request).await,
        )?;
        if let Some(store) = lock(&self.scope, "scope")?.exercises_mut() {
            store.replace(id, updated.clone());
        }
        Ok(updated)
    }

    /// Returns `Ok(false)` when the user declined the confirmation prompt.
    pub async fn delete_exercise(&self, id: &str) -> ClientResult<bool> {
        let _slot = self.claim_slot(EntityKind::Exercise, id)?;
        if !self.prompt.confirm(&format!("Delete exercise {id}?")).await {
            return Ok(false);
        }
        self.settle("delete_exercise", self.gateway.delete_exercise(id).await)?;
        if let Some(store) = lock(&self.scope, "scope")?.exercises_mut() {
            store.remove(id);
        }
        Ok(true)
    }

    pub async fn archive_exercise(&self, id: &str) -> ClientResult<()> {
        let _slot = self.claim_slot(EntityKind::Exercise, id)?;
        self.settle("archive_exercise", self.gateway.archive_exercise(id).await)?;
        if let Some(store) = lock(&self.scope, "scope")?.exercises_mut() {
            store.patch(id, |exercise| exercise.is_archived = true);
        }
        Ok(())
    }

    pub async fn restore_exercise(&self, id: &str) -> ClientResult<()> {
        let _slot = self.claim_slot(EntityKind::Exercise, id)?;
        self.settle("restore_exercise", self.gateway.restore_exercise(id).await)?;
        if let Some(store) = lock(&self.scope, "scope")?.exercises_mut() {
            store.patch(id, |exercise| exercise.is_archived = false);
        }
        Ok(())
    }

    // ─── sets ───────────────────────────────────────────────────────────

    pub async fn reload_sets(&self) -> ClientResult<()> {
        let query = lock(&self.filters, "filters")?
            .current()
            .to_query(self.config.page_size);
        let seq = self.set_load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.sets, "sets")?.loading = true;
        match self.gateway.list_sets(&query).await {
            Ok(page) => {
                let mut sets = lock(&self.sets, "sets")?;
                let newest = self.set_load_seq.load(Ordering::SeqCst);
                if seq != newest {
                    tracing::debug!(seq, newest, "stale set reload discarded");
                    return Ok(());
                }
                sets.store.replace_all(page.items);
                sets.loading = false;
                drop(sets);
                self.clear_error();
                Ok(())
            }
            Err(error) => {
                if seq != self.set_load_seq.load(Ordering::SeqCst) {
                    tracing::debug!(seq, "stale set reload failure discarded");
                    return Ok(());
                }
                lock(&self.sets, "sets")?.loading = false;
                Err(self.fail("list_sets", error))
            }
        }
    }

    pub async fn set_exercise_filter(&self, exercise_id: Option<String>) -> ClientResult<()> {
        let changed = lock(&self.filters, "filters")?.set_exercise(exercise_id);
        if changed {
            self.reload_sets().await?;
        }
        Ok(())
    }

    pub async fn set_created_from_filter(&self, date: Option<NaiveDate>) -> ClientResult<()> {
        let changed = lock(&self.filters, "filters")?.set_created_from(date);
        if changed {
            self.reload_sets().await?;
        }
        Ok(())
    }

    pub async fn set_created_to_filter(&self, date: Option<NaiveDate>) -> ClientResult<()> {
        let changed = lock(&self.filters, "filters")?.set_created_to(date);
        if changed {
            self.reload_sets().await?;
        }
        Ok(())
    }

    /// Clears all filter fields atomically; one reload, not three.
    pub async fn reset_filters(&self) -> ClientResult<()> {
        let changed = lock(&self.filters, "filters")?.reset();
        if changed {
            self.reload_sets().await?;
        }
        Ok(())
    }

    pub fn filter(&self) -> ClientResult<SetFilter> {
        Ok(lock(&self.filters, "filters")?.current().clone())
    }

    pub async fn create_set(&self, request: CreateSetRequest) -> ClientResult<SetItem> {
        validate_set_numbers(Some(request.reps), Some(request.weight))?;
        let created = self.settle("create_set", self.gateway.create_set(&request).await)?;
        lock(&self.sets, "sets")?.store.insert(created.clone());
        Ok(created)
    }

    pub async fn update_set(&self, id: &str, request: UpdateSetRequest) -> ClientResult<SetItem> {
        validate_set_numbers(request.reps, request.weight)?;
        let _slot = self.claim_slot(EntityKind::Set, id)?;
        let updated = self.settle("update_set", self.gateway.update_set(id, &request).await)?;
        lock(&self.sets, "sets")?.store.replace(id, updated.clone());
        Ok(updated)
    }

    /// Returns `Ok(false)` when the user declined the confirmation prompt.
    pub async fn delete_set(&self, id: &str) -> ClientResult<bool> {
        let _slot = self.claim_slot(EntityKind::Set, id)?;
        if !self.prompt.confirm(&format!("Delete set {id}?")).await {
            return Ok(false);
        }
        self.settle("delete_set", self.gateway.delete_set(id).await)?;
        lock(&self.sets, "sets")?.store.remove(id);
        Ok(true)
    }

    pub fn sets(&self) -> ClientResult<Vec<SetItem>> {
        Ok(lock(&self.sets, "sets")?.store.to_vec())
    }

    pub fn sets_loading(&self) -> ClientResult<bool> {
        Ok(lock(&self.sets, "sets")?.loading)
    }

    pub fn grouped_sets(&self) -> ClientResult<Vec<DayGroup>> {
        let sets = lock(&self.sets, "sets")?;
        Ok(group_by_day(sets.store.items()))
    }

    // ─── templates ──────────────────────────────────────────────────────

    pub async fn reload_templates(&self) -> ClientResult<usize> {
        self.load_templates(false).await
    }

    pub async fn reload_templates_today(&self) -> ClientResult<usize> {
        self.load_templates(true).await
    }

    async fn load_templates(&self, today_only: bool) -> ClientResult<usize> {
        let operation = if today_only {
            "list_templates_today"
        } else {
            "list_templates"
        };
        let page_query = PageQuery::sized(self.config.page_size);
        let seq = self.template_load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.templates, "templates")?.loading = true;
        let result = if today_only {
            self.gateway.list_templates_today(&page_query).await
        } else {
            self.gateway.list_templates(&page_query).await
        };
        match result {
            Ok(page) => {
                let mut templates = lock(&self.templates, "templates")?;
                let newest = self.template_load_seq.load(Ordering::SeqCst);
                if seq != newest {
                    tracing::debug!(seq, newest, "stale template reload discarded");
                    return Ok(templates.store.len());
                }
                let count = page.items.len();
                templates.store.replace_all(page.items);
                templates.loading = false;
                drop(templates);
                self.clear_error();
                Ok(count)
            }
            Err(error) => {
                if seq != self.template_load_seq.load(Ordering::SeqCst) {
                    tracing::debug!(seq, "stale template reload failure discarded");
                    return Ok(lock(&self.templates, "templates")?.store.len());
                }
                lock(&self.templates, "templates")?.loading = false;
                Err(self.fail(operation, error))
            }
        }
    }

    pub async fn create_template(&self, request: CreateTemplateRequest) -> ClientResult<Template> {
        if request.title.trim().is_empty() {
            return Err(ClientError::Validation("template title must not be empty".to_string()));
        }
        validate_day_of_week(request.day_of_week)?;
        let mut created = self.settle(
            "create_template",
            self.gateway.create_template(&request).await,
        )?;
        created.resequence_exercises();
        lock(&self.templates, "templates")?.store.insert(created.clone());
        Ok(created)
    }

    pub async fn update_template(
        &self,
        id: &str,
        request: UpdateTemplateRequest,
    ) -> ClientResult<Template> {
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(ClientError::Validation("template title must not be empty".to_string()));
            }
        }
        validate_day_of_week(request.day_of_week)?;
        let _slot = self.claim_slot(EntityKind::Template, id)?;
        let mut updated = self.settle(
            "update_template",
            self.gateway.update_template(id, &request).await,
        )?;
        updated.resequence_exercises();
        lock(&self.templates, "templates")?.store.replace(id, updated.clone());
        Ok(updated)
    }

    /// Returns `Ok(false)` when the user declined the confirmation prompt.
    pub async fn delete_template(&self, id: &str) -> ClientResult<bool> {
        let _slot = self.claim_slot(EntityKind::Template, id)?;
        let title = lock(&self.templates, "templates")?
            .store
            .get(id)
            .map(|template| template.title.clone())
            .unwrap_or_else(|| id.to_string());
        if !self.prompt.confirm(&format!("Delete template \"{title}\"?")).await {
            return Ok(false);
        }
        self.settle("delete_template", self.gateway.delete_template(id).await)?;
        lock(&self.templates, "templates")?.store.remove(id);
        Ok(true)
    }

    pub async fn add_template_exercise(
        &self,
        request: CreateTemplateExerciseRequest,
    ) -> ClientResult<TemplateExercise> {
        let created = self.settle(
            "create_template_exercise",
            self.gateway.create_template_exercise(&request).await,
        )?;
        lock(&self.templates, "templates")?
            .store
            .patch(&request.template_id, |template| {
                template.exercises.push(created.clone());
                template.resequence_exercises();
            });
        Ok(created)
    }

    pub async fn update_template_exercise(
        &self,
        id: &str,
        request: UpdateTemplateExerciseRequest,
    ) -> ClientResult<TemplateExercise> {
        let _slot = self.claim_slot(EntityKind::TemplateExercise, id)?;
        let updated = self.settle(
            "update_template_exercise",
            self.gateway.update_template_exercise(id, &request).await,
        )?;
        let mut templates = lock(&self.templates, "templates")?;
        let owner = templates
            .store
            .items()
            .iter()
            .find(|template| template.exercises.iter().any(|entry| entry.id == id))
            .map(|template| template.id.clone());
        if let Some(owner_id) = owner {
            templates.store.patch(&owner_id, |template| {
                if let Some(entry) = template
                    .exercises
                    .iter_mut()
                    .find(|entry| entry.id == id)
                {
                    *entry = updated.clone();
                }
                template.resequence_exercises();
            });
        }
        drop(templates);
        Ok(updated)
    }

    /// Returns `Ok(false)` when the user declined the confirmation prompt.
    pub async fn remove_template_exercise(&self, id: &str) -> ClientResult<bool> {
        let _slot = self.claim_slot(EntityKind::TemplateExercise, id)?;
        if !self.prompt.confirm(&format!("Remove exercise {id} from template?")).await {
            return Ok(false);
        }
        self.settle(
            "delete_template_exercise",
            self.gateway.delete_template_exercise(id).await,
        )?;
        let mut templates = lock(&self.templates, "templates")?;
        let owner = templates
            .store
            .items()
            .iter()
            .find(|template| template.exercises.iter().any(|entry| entry.id == id))
            .map(|template| template.id.clone());
        if let Some(owner_id) = owner {
            templates.store.patch(&owner_id, |template| {
                template.exercises.retain(|entry| entry.id != id);
            });
        }
        drop(templates);
        Ok(true)
    }

    pub fn templates(&self) -> ClientResult<Vec<Template>> {
        Ok(lock(&self.templates, "templates")?.store.to_vec())
    }

    pub fn templates_loading(&self) -> ClientResult<bool> {
        Ok(lock(&self.templates, "templates")?.loading)
    }

    // ─── shared plumbing ────────────────────────────────────────────────

    pub fn last_error(&self) -> Option<ErrorNotice> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    fn claim_slot(&self, kind: EntityKind, id: &str) -> ClientResult<MutationSlot<'_>> {
        let mut slots = lock(&self.in_flight, "mutation slots")?;
        let key = (kind, id.to_string());
        if !slots.insert(key.clone()) {
            return Err(ClientError::MutationPending(format!(
                "{} {id} already has a mutation in flight",
                kind.as_str()
            )));
        }
        Ok(MutationSlot {
            slots: &self.in_flight,
            key,
        })
    }

    fn settle<T>(&self, operation: &'static str, result: GatewayResult<T>) -> ClientResult<T> {
        match result {
            Ok(value) => {
                self.clear_error();
                Ok(value)
            }
            Err(error) => Err(self.fail(operation, error)),
        }
    }

    fn fail(&self, operation: &'static str, error: crate::gateway::GatewayError) -> ClientError {
        let error = ClientError::from(error);
        if matches!(error, ClientError::Auth(_)) {
            self.credentials.clear();
        }
        tracing::warn!(operation, error = %error, "gateway call failed; state kept at pre-call value");
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(ErrorNotice {
                operation: operation.to_string(),
                message: error.to_string(),
            });
        }
        error
    }

    fn clear_error(&self) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = None;
        }
    }
}

fn validate_set_numbers(reps: Option<u32>, weight: Option<f64>) -> ClientResult<()> {
    if reps == Some(0) {
        return Err(ClientError::Validation("reps must be a positive integer".to_string()));
    }
    if let Some(weight) = weight {
        if !(weight > 0.0) {
            return Err(ClientError::Validation("weight must be positive".to_string()));
        }
    }
    Ok(())
}

fn validate_day_of_week(day_of_week: Option<u8>) -> ClientResult<()> {
    if let Some(day) = day_of_week {
        if day > 6 {
            return Err(ClientError::Validation(format!("day_of_week must be 0-6, got {day}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_day_of_week, validate_set_numbers, AutoConfirm, ClientCore};
    use crate::auth::CredentialStore;
    use crate::config::ClientConfig;
    use crate::errors::ClientError;
    use crate::gateway::fake::FakeGateway;
    use crate::models::EntityKind;
    use std::sync::Arc;

    fn core_with_fake() -> (Arc<ClientCore>, Arc<FakeGateway>) {
        let fake = Arc::new(FakeGateway::new());
        let core = ClientCore::new(
            ClientConfig::default(),
            fake.clone(),
            Arc::new(AutoConfirm),
            Arc::new(CredentialStore::new()),
        );
        (core, fake)
    }

    #[test]
    fn set_number_validation() {
        assert!(validate_set_numbers(Some(10), Some(40.0)).is_ok());
        assert!(validate_set_numbers(None, None).is_ok());
        assert!(matches!(
            validate_set_numbers(Some(0), Some(40.0)),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            validate_set_numbers(Some(10), Some(-5.0)),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            validate_set_numbers(Some(10), Some(0.0)),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn day_of_week_validation() {
        assert!(validate_day_of_week(None).is_ok());
        assert!(validate_day_of_week(Some(6)).is_ok());
        assert!(validate_day_of_week(Some(7)).is_err());
    }

    #[test]
    fn second_claim_on_same_id_is_rejected() {
        let (core, _fake) = core_with_fake();
        let first = core.claim_slot(EntityKind::Set, "s1").expect("first claim");
        let second = core.claim_slot(EntityKind::Set, "s1");
        assert!(matches!(second, Err(ClientError::MutationPending(_))));
        // distinct ids and kinds are free to proceed
        core.claim_slot(EntityKind::Set, "s2").expect("other id");
        core.claim_slot(EntityKind::Exercise, "s1").expect("other kind");
        drop(first);
        core.claim_slot(EntityKind::Set, "s1").expect("slot released");
    }

    #[tokio::test]
    async fn create_set_validation_precedes_gateway_call() {
        let (core, fake) = core_with_fake();
        let request = crate::models::CreateSetRequest {
            exercise_id: "e1".to_string(),
            reps: 0,
            weight: 40.0,
            created_at: None,
        };
        let result = core.create_set(request).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(fake.call_count("create_set"), 0);
    }
}
