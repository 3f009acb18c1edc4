use super::{EntityGateway, GatewayError, GatewayResult};
use crate::auth::CredentialStore;
use crate::config::ClientConfig;
use crate::models::{
    AuthResponse, Category, CreateCategoryRequest, CreateExerciseRequest, CreateSetRequest,
    CreateTemplateExerciseRequest, CreateTemplateRequest, Exercise, ExerciseListQuery,
    InitDataExchangeRequest, Page, PageQuery, SetItem, SetListQuery, Template, TemplateExercise,
    UpdateCategoryRequest, UpdateExerciseRequest, UpdateSetRequest, UpdateTemplateExerciseRequest,
    UpdateTemplateRequest,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig, credentials: Arc<CredentialStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.credentials.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|error| GatewayError::Transport(error.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> GatewayResult<()> {
        self.send(builder).await.map(|_| ())
    }

    async fn send(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|error| GatewayError::Transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> GatewayResult<T> {
        self.send_json(self.request(Method::GET, path).query(params)).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        self.send_json(self.request(Method::PATCH, path).json(body)).await
    }
}

fn page_params(page: &PageQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(number) = page.page {
        params.push(("page", number.to_string()));
    }
    if let Some(size) = page.size {
        params.push(("size", size.to_string()));
    }
    params
}

fn exercise_params(query: &ExerciseListQuery) -> Vec<(&'static str, String)> {
    let mut params = page_params(&query.page);
    if let Some(category_id) = &query.category_id {
        params.push(("category_id", category_id.clone()));
    }
    if let Some(is_archived) = query.is_archived {
        params.push(("is_archived", is_archived.to_string()));
    }
    params
}

fn set_params(query: &SetListQuery) -> Vec<(&'static str, String)> {
    let mut params = page_params(&query.page);
    if let Some(exercise_id) = &query.exercise_id {
        params.push(("exercise_id", exercise_id.clone()));
    }
    if let Some(from) = query.created_from {
        params.push(("created_from", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = query.created_to {
        params.push(("created_to", to.format("%Y-%m-%d").to_string()));
    }
    params
}

#[async_trait]
impl EntityGateway for HttpGateway {
    async fn exchange_init_data(&self, init_data: &str) -> GatewayResult<AuthResponse> {
        let body = InitDataExchangeRequest {
            init_data: init_data.to_string(),
        };
        self.post_json("/auth/telegram/", &body).await
    }

    async fn list_categories(&self, page: &PageQuery) -> GatewayResult<Page<Category>> {
        self.get_json("/categories/", &page_params(page)).await
    }

    async fn create_category(&self, request: &CreateCategoryRequest) -> GatewayResult<Category> {
        self.post_json("/categories/", request).await
    }

    async fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> GatewayResult<Category> {
        self.patch_json(&format!("/categories/{id}/"), request).await
    }

    async fn delete_category(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/categories/{id}/"))).await
    }

    async fn list_exercises(&self, query: &ExerciseListQuery) -> GatewayResult<Page<Exercise>> {
        self.get_json("/exercises/", &exercise_params(query)).await
    }

    async fn create_exercise(&self, request: &CreateExerciseRequest) -> GatewayResult<Exercise> {
        self.post_json("/exercises/", request).await
    }

    async fn update_exercise(
        &self,
        id: &str,
        request: &UpdateExerciseRequest,
    ) -> GatewayResult<Exercise> {
        self.patch_json(&format!("/exercises/{id}/"), request).await
    }

    async fn delete_exercise(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/exercises/{id}/"))).await
    }

    async fn archive_exercise(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::POST, &format!("/exercises/{id}/archive/"))).await
    }

    async fn restore_exercise(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::POST, &format!("/exercises/{id}/restore/"))).await
    }

    async fn list_sets(&self, query: &SetListQuery) -> GatewayResult<Page<SetItem>> {
        self.get_json("/sets/", &set_params(query)).await
    }

    async fn create_set(&self, request: &CreateSetRequest) -> GatewayResult<SetItem> {
        self.post_json("/sets/", request).await
    }

    async fn update_set(&self, id: &str, request: &UpdateSetRequest) -> GatewayResult<SetItem> {
        self.patch_json(&format!("/sets/{id}/"), request).await
    }

    async fn delete_set(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/sets/{id}/"))).await
    }

    async fn list_templates(&self, page: &PageQuery) -> GatewayResult<Page<Template>> {
        self.get_json("/templates/", &page_params(page)).await
    }

    async fn list_templates_today(&self, page: &PageQuery) -> GatewayResult<Page<Template>> {
        self.get_json("/templates/today/", &page_params(page)).await
    }

    async fn create_template(&self, request: &CreateTemplateRequest) -> GatewayResult<Template> {
        self.post_json("/templates/", request).await
    }

    async fn update_template(
        &self,
        id: &str,
        request: &UpdateTemplateRequest,
    ) -> GatewayResult<Template> {
        self.patch_json(&format!("/templates/{id}/"), request).await
    }

    async fn delete_template(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/templates/{id}/"))).await
    }

    async fn create_template_exercise(
        &self,
        request: &CreateTemplateExerciseRequest,
    ) -> GatewayResult<TemplateExercise> {
        self.post_json("/template_exercises/", request).await
    }

    async fn update_template_exercise(
        &self,
        id: &str,
        request: &UpdateTemplateExerciseRequest,
    ) -> GatewayResult<TemplateExercise> {
        self.patch_json(&format!("/template_exercises/{id}/"), request).await
    }

    async fn delete_template_exercise(&self, id: &str) -> GatewayResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/template_exercises/{id}/"))).await
    }
}
