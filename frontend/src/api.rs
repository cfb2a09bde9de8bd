use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    AuthResponse, Category, CategoryId, LoginRequest, NewCategory, NewSubtask, Priority, ProfileUpdate,
    RegisterRequest, SubtaskId, Todo, TodoDraft, TodoId, User,
};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use url::Url;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(String),
    Text(String),
}

impl Body {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_string(value)
            .map(Body::Json)
            .map_err(|e| ApiError::Encode(e.to_string()))
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => "application/json",
            Body::Text(_) => "text/plain",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Body::Json(text) | Body::Text(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The server could not be reached at all.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// REST client for the todo backend.
///
/// The bearer token travels with the client value rather than living in
/// shared state: derive a client per session with [`ApiClient::with_bearer`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Rc<dyn Transport>,
    bearer: Option<Rc<str>>,
}

impl ApiClient {
    pub fn new(base_url: Url, transport: Rc<dyn Transport>) -> Self {
        Self { base_url, transport, bearer: None }
    }

    pub fn with_bearer(&self, token: Option<&str>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: Rc::clone(&self.transport),
            bearer: token.filter(|t| !t.is_empty()).map(Rc::from),
        }
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn request(&self, method: Method, url: Url, body: Option<Body>) -> Result<HttpResponse, ApiError> {
        let mut headers = Vec::new();
        if let Some(token) = &self.bearer {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        if let Some(body) = &body {
            headers.push(("Content-Type".to_string(), body.content_type().to_string()));
        }

        log::debug!("{} {}", method, url);
        let request = HttpRequest { method, url: url.to_string(), headers, body };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Network(e.0))?;

        if response.is_success() {
            Ok(response)
        } else {
            log::debug!("{} {} -> {}", method, url, response.status);
            Err(ApiError::Http { status: response.status, body: response.body })
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, url: Url, body: Option<Body>) -> Result<T, ApiError> {
        let response = self.request(method, url, body).await?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.fetch(Method::Get, self.endpoint(segments), None).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(method, self.endpoint(segments), Some(Body::json(body)?)).await
    }

    async fn discard(&self, method: Method, segments: &[&str], body: Option<Body>) -> Result<(), ApiError> {
        self.request(method, self.endpoint(segments), body).await.map(|_| ())
    }

    // Auth

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::Post, &["api", "auth", "login"], credentials).await
    }

    pub async fn register(&self, fields: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::Post, &["api", "auth", "register"], fields).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get(&["api", "auth", "me"]).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.discard(Method::Post, &["api", "auth", "logout"], None).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.send_json(Method::Put, &["api", "users", "profile"], update).await
    }

    // Todos

    pub async fn todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos"]).await
    }

    pub async fn create_todo(&self, draft: &TodoDraft) -> Result<Todo, ApiError> {
        self.send_json(Method::Post, &["api", "todos"], draft).await
    }

    pub async fn update_todo(&self, id: TodoId, draft: &TodoDraft) -> Result<Todo, ApiError> {
        self.send_json(Method::Put, &["api", "todos", &id.to_string()], draft).await
    }

    pub async fn delete_todo(&self, id: TodoId) -> Result<(), ApiError> {
        self.discard(Method::Delete, &["api", "todos", &id.to_string()], None).await
    }

    pub async fn completed_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "completed"]).await
    }

    pub async fn pending_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "pending"]).await
    }

    pub async fn search_todos(&self, query: &str) -> Result<Vec<Todo>, ApiError> {
        let mut url = self.endpoint(&["api", "todos", "search"]);
        url.query_pairs_mut().append_pair("query", query);
        self.fetch(Method::Get, url, None).await
    }

    pub async fn todos_in_category(&self, name: &str) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "category", name]).await
    }

    pub async fn todos_with_priority(&self, priority: Priority) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "priority", priority.as_str()]).await
    }

    pub async fn overdue_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "overdue"]).await
    }

    pub async fn todos_with_tag(&self, tag: &str) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "tag", tag]).await
    }

    pub async fn recurring_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.get(&["api", "todos", "recurring"]).await
    }

    // Sub-resources of a single todo; each returns the updated todo.

    pub async fn add_subtask(&self, id: TodoId, title: &str) -> Result<Todo, ApiError> {
        let subtask = NewSubtask { title: title.to_string(), completed: false };
        self.send_json(Method::Post, &["api", "todos", &id.to_string(), "subtasks"], &subtask)
            .await
    }

    pub async fn set_subtask_completed(
        &self,
        id: TodoId,
        subtask: SubtaskId,
        completed: bool,
    ) -> Result<Todo, ApiError> {
        let mut url = self.endpoint(&["api", "todos", &id.to_string(), "subtasks", &subtask.to_string()]);
        url.query_pairs_mut().append_pair("completed", if completed { "true" } else { "false" });
        self.fetch(Method::Put, url, None).await
    }

    pub async fn remove_subtask(&self, id: TodoId, subtask: SubtaskId) -> Result<Todo, ApiError> {
        let url = self.endpoint(&["api", "todos", &id.to_string(), "subtasks", &subtask.to_string()]);
        self.fetch(Method::Delete, url, None).await
    }

    pub async fn update_notes(&self, id: TodoId, notes: &str) -> Result<Todo, ApiError> {
        let url = self.endpoint(&["api", "todos", &id.to_string(), "notes"]);
        self.fetch(Method::Put, url, Some(Body::Text(notes.to_string()))).await
    }

    pub async fn update_attachment(&self, id: TodoId, attachment_url: &str) -> Result<Todo, ApiError> {
        let url = self.endpoint(&["api", "todos", &id.to_string(), "attachment"]);
        self.fetch(Method::Put, url, Some(Body::Text(attachment_url.to_string()))).await
    }

    // Categories

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get(&["api", "todos", "categories"]).await
    }

    pub async fn create_category(&self, name: &str) -> Result<(), ApiError> {
        let body = Body::json(&NewCategory { name: name.to_string() })?;
        self.discard(Method::Post, &["api", "todos", "categories"], Some(body)).await
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.discard(Method::Delete, &["api", "todos", "categories", &id.to_string()], None)
            .await
    }
}
