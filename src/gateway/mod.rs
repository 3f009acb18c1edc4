//! Remote entity gateway contract.
//!
//! The trait mirrors the REST surface per entity kind and is implemented by
//! `HttpGateway` (production) and `FakeGateway` (in-memory, tests and
//! demos), so both run through the same coordinator code path.

pub mod fake;
pub mod http;

use crate::models::{
    AuthResponse, Category, CreateCategoryRequest, CreateExerciseRequest, CreateSetRequest,
    CreateTemplateExerciseRequest, CreateTemplateRequest, Exercise, ExerciseListQuery, Page,
    PageQuery, SetItem, SetListQuery, Template, TemplateExercise, UpdateCategoryRequest,
    UpdateExerciseRequest, UpdateSetRequest, UpdateTemplateExerciseRequest, UpdateTemplateRequest,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn exchange_init_data(&self, init_data: &str) -> GatewayResult<AuthResponse>;

    async fn list_categories(&self, page: &PageQuery) -> GatewayResult<Page<Category>>;
    async fn create_category(&self, request: &CreateCategoryRequest) -> GatewayResult<Category>;
    async fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> GatewayResult<Category>;
    async fn delete_category(&self, id: &str) -> GatewayResult<()>;

    async fn list_exercises(&self, query: &ExerciseListQuery) -> GatewayResult<Page<Exercise>>;
    async fn create_exercise(&self, request: &CreateExerciseRequest) -> GatewayResult<Exercise>;
    async fn update_exercise(
        &self,
        id: &str,
        request: &UpdateExerciseRequest,
    ) -> GatewayResult<Exercise>;
    async fn delete_exercise(&self, id: &str) -> GatewayResult<()>;
    async fn archive_exercise(&self, id: &str) -> GatewayResult<()>;
    async fn restore_exercise(&self, id: &str) -> GatewayResult<()>;

    async fn list_sets(&self, query: &SetListQuery) -> GatewayResult<Page<SetItem>>;
    async fn create_set(&self, request: &CreateSetRequest) -> GatewayResult<SetItem>;
    async fn update_set(&self, id: &str, request: &UpdateSetRequest) -> GatewayResult<SetItem>;
    async fn delete_set(&self, id: &str) -> GatewayResult<()>;

    async fn list_templates(&self, page: &PageQuery) -> GatewayResult<Page<Template>>;
    async fn list_templates_today(&self, page: &PageQuery) -> GatewayResult<Page<Template>>;
    async fn create_template(&self, request: &CreateTemplateRequest) -> GatewayResult<Template>;
    async fn update_template(
        &self,
        id: &str,
        request: &UpdateTemplateRequest,
    ) -> GatewayResult<Template>;
    async fn delete_template(&self, id: &str) -> GatewayResult<()>;

    async fn create_template_exercise(
        &self,
        request: &CreateTemplateExerciseRequest,
    ) -> GatewayResult<TemplateExercise>;
    async fn update_template_exercise(
        &self,
        id: &str,
        request: &UpdateTemplateExerciseRequest,
    ) -> GatewayResult<TemplateExercise>;
    async fn delete_template_exercise(&self, id: &str) -> GatewayResult<()>;
}
