//! Filtering and sorting of the todos page list.

use crate::Todo;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    fn admits(&self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::CreatedAt, SortKey::DueDate, SortKey::Priority];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "Newest",
            SortKey::DueDate => "Due date",
            SortKey::Priority => "Priority",
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "createdAt",
            SortKey::DueDate => "dueDate",
            SortKey::Priority => "priority",
        }
    }

    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.value() == value)
            .unwrap_or_default()
    }

    fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            SortKey::CreatedAt => descending_dated(a.created_at, b.created_at),
            SortKey::DueDate => ascending_dated(a.due_date, b.due_date),
            SortKey::Priority => b.priority.cmp(&a.priority),
        }
    }
}

fn descending_dated(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn ascending_dated(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodoQuery {
    pub status: StatusFilter,
    pub search: String,
    /// `None` selects every category.
    pub category: Option<String>,
    pub sort: SortKey,
    pub show_completed: bool,
}

impl Default for TodoQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            search: String::new(),
            category: None,
            sort: SortKey::CreatedAt,
            show_completed: true,
        }
    }
}

impl TodoQuery {
    pub fn matches(&self, todo: &Todo) -> bool {
        if !self.status.admits(todo) || (!self.show_completed && todo.completed) {
            return false;
        }
        if let Some(category) = &self.category {
            if todo.category() != category {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || todo.title.to_lowercase().contains(&needle)
            || todo.description().to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, todos: &'a [Todo]) -> Vec<&'a Todo> {
        let mut visible: Vec<&Todo> = todos.iter().filter(|t| self.matches(t)).collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_datetime;
    use crate::Priority;

    fn todo(id: i64, title: &str, category: &str, completed: bool) -> Todo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "description": format!("details for {title}"),
            "category": category,
            "completed": completed,
        }))
        .unwrap()
    }

    fn sample() -> Vec<Todo> {
        let mut todos = vec![
            todo(1, "Complete project proposal", "Work", false),
            todo(2, "Buy groceries", "Personal", true),
            todo(3, "Review code changes", "Work", false),
            todo(4, "Plan vacation", "Personal", false),
        ];
        todos[0].priority = Priority::High;
        todos[1].priority = Priority::Medium;
        todos[2].priority = Priority::High;
        todos[3].priority = Priority::Low;
        todos[0].due_date = parse_datetime("2025-06-05");
        todos[2].due_date = parse_datetime("2025-06-03");
        todos[0].created_at = parse_datetime("2025-05-01");
        todos[1].created_at = parse_datetime("2025-05-04");
        todos[2].created_at = parse_datetime("2025-05-02");
        todos[3].created_at = parse_datetime("2025-05-03");
        todos
    }

    fn ids(todos: Vec<&Todo>) -> Vec<i64> {
        todos.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn default_query_lists_newest_first() {
        let todos = sample();
        assert_eq!(ids(TodoQuery::default().apply(&todos)), vec![2, 4, 3, 1]);
    }

    #[test]
    fn status_and_category_combine() {
        let todos = sample();
        let query = TodoQuery {
            status: StatusFilter::Active,
            category: Some("Personal".into()),
            ..Default::default()
        };
        assert_eq!(ids(query.apply(&todos)), vec![4]);
    }

    #[test]
    fn search_covers_title_and_description_case_insensitively() {
        let todos = sample();
        let query = TodoQuery { search: "GROCER".into(), ..Default::default() };
        assert_eq!(ids(query.apply(&todos)), vec![2]);

        let query = TodoQuery { search: "details for plan".into(), ..Default::default() };
        assert_eq!(ids(query.apply(&todos)), vec![4]);
    }

    #[test]
    fn due_date_sort_puts_undated_last() {
        let todos = sample();
        let query = TodoQuery { sort: SortKey::DueDate, ..Default::default() };
        assert_eq!(ids(query.apply(&todos)), vec![3, 1, 2, 4]);
    }

    #[test]
    fn priority_sort_is_high_first_and_stable() {
        let todos = sample();
        let query = TodoQuery { sort: SortKey::Priority, ..Default::default() };
        assert_eq!(ids(query.apply(&todos)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn hiding_completed_overrides_status_filter() {
        let todos = sample();
        let query = TodoQuery {
            status: StatusFilter::Completed,
            show_completed: false,
            ..Default::default()
        };
        assert!(query.apply(&todos).is_empty());
    }

    #[test]
    fn unknown_sort_value_falls_back_to_newest() {
        assert_eq!(SortKey::from_value("dueDate"), SortKey::DueDate);
        assert_eq!(SortKey::from_value("bogus"), SortKey::CreatedAt);
    }
}
