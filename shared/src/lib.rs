use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod query;
pub mod stats;
pub mod wire;

pub type TodoId = i64;
pub type SubtaskId = i64;
pub type CategoryId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl User {
    /// Full name when the user has set one, username otherwise.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Path segment form used by `/api/todos/priority/{level}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 5] = [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "NONE",
            Recurrence::Daily => "DAILY",
            Recurrence::Weekly => "WEEKLY",
            Recurrence::Monthly => "MONTHLY",
            Recurrence::Yearly => "YEARLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::None => "None",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Yearly => "Yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value.trim()))
    }

    pub fn is_recurring(&self) -> bool {
        *self != Recurrence::None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "wire::optional_datetime")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "wire::optional_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "wire::optional_datetime")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub tags: BTreeSet<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default, deserialize_with = "wire::progress")]
    pub progress: u8,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub recurrence_type: Recurrence,
    #[serde(default, deserialize_with = "wire::optional_datetime")]
    pub recurrence_end_date: Option<NaiveDateTime>,
}

impl Todo {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.completed).count()
    }
}

/// Body of `POST /api/todos` and `PUT /api/todos/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub completed: bool,
    pub due_date: Option<NaiveDateTime>,
    pub tags: BTreeSet<String>,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub progress: u8,
    pub recurrence_type: Recurrence,
    pub recurrence_end_date: Option<NaiveDateTime>,
}

impl From<&Todo> for TodoDraft {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description().to_string(),
            category: todo.category().to_string(),
            priority: todo.priority,
            completed: todo.completed,
            due_date: todo.due_date,
            tags: todo.tags.clone(),
            notes: todo.notes.clone(),
            attachment_url: todo.attachment_url.clone(),
            progress: todo.progress,
            recurrence_type: todo.recurrence_type,
            recurrence_end_date: todo.recurrence_end_date,
        }
    }
}

impl TodoDraft {
    /// The same todo with its completion flag flipped, as sent by the list toggle.
    pub fn toggled(todo: &Todo) -> Self {
        let mut draft = Self::from(todo);
        draft.completed = !todo.completed;
        draft
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub todo_count: u32,
}

impl Category {
    /// Only empty categories may be deleted; the server has the final say.
    pub fn can_delete(&self) -> bool {
        self.todo_count == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubtask {
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login and registration reply. Both fields are optional on the wire so
/// that a reply missing either can be reported instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
