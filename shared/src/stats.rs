//! Dashboard aggregates, recomputed from the fetched todo list on every render.

use crate::Todo;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const RECENT_LIMIT: usize = 5;
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub by_category: BTreeMap<String, usize>,
}

impl DashboardStats {
    pub fn compute(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
            by_category: by_category(todos),
        }
    }

    pub fn completion_rate(&self) -> u8 {
        completion_rate(self.completed, self.total)
    }

    /// Category counts, largest first; ties by name.
    pub fn categories_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .by_category
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Percentage of completed todos rounded half up, 0 for an empty list.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

pub fn by_category(todos: &[Todo]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for todo in todos {
        let name = match todo.category().trim() {
            "" => UNCATEGORIZED,
            name => name,
        };
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn overdue(todos: &[Todo], now: NaiveDateTime) -> Vec<&Todo> {
    todos.iter().filter(|t| t.is_overdue(now)).collect()
}

/// Newest first by `createdAt`; undated todos last, ties keep list order.
pub fn recent(todos: &[Todo], limit: usize) -> Vec<&Todo> {
    let mut sorted: Vec<&Todo> = todos.iter().collect();
    sorted.sort_by(|a, b| newest_first(a.created_at, b.created_at));
    sorted.truncate(limit);
    sorted
}

fn newest_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Everything the dashboard page renders, borrowed from one list snapshot.
#[derive(Debug, Clone)]
pub struct DashboardSummary<'a> {
    pub stats: DashboardStats,
    pub completion_rate: u8,
    pub overdue: Vec<&'a Todo>,
    pub recent: Vec<&'a Todo>,
}

impl<'a> DashboardSummary<'a> {
    pub fn new(todos: &'a [Todo], now: NaiveDateTime) -> Self {
        let stats = DashboardStats::compute(todos);
        Self {
            completion_rate: stats.completion_rate(),
            stats,
            overdue: overdue(todos, now),
            recent: recent(todos, RECENT_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_datetime;

    fn todo(id: i64, category: &str, completed: bool) -> Todo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("todo {id}"),
            "category": category,
            "completed": completed,
        }))
        .unwrap()
    }

    fn dated(id: i64, created: &str) -> Todo {
        let mut t = todo(id, "Work", false);
        t.created_at = parse_datetime(created);
        t
    }

    #[test]
    fn completion_rate_handles_empty_and_half() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(5, 10), 50);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(DashboardStats::default().completion_rate(), 0);
    }

    #[test]
    fn counts_by_category() {
        let todos = vec![todo(1, "Work", false), todo(2, "Work", true), todo(3, "Home", false)];
        let stats = DashboardStats::compute(&todos);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.by_category.get("Work"), Some(&2));
        assert_eq!(stats.by_category.get("Home"), Some(&1));
        assert_eq!(stats.by_category.len(), 2);
        assert_eq!(stats.categories_by_count(), vec![("Work", 2), ("Home", 1)]);
    }

    #[test]
    fn blank_category_is_grouped_as_uncategorized() {
        let mut bare = todo(1, "", false);
        bare.category = None;
        let counts = by_category(&[bare, todo(2, "  ", false)]);
        assert_eq!(counts.get(UNCATEGORIZED), Some(&2));
    }

    #[test]
    fn overdue_skips_completed_and_undated() {
        let now = parse_datetime("2025-06-04T12:00:00").unwrap();
        let mut late = todo(1, "Work", false);
        late.due_date = parse_datetime("2025-06-03");
        let mut done = todo(2, "Work", true);
        done.due_date = parse_datetime("2025-06-01");
        let mut future = todo(3, "Work", false);
        future.due_date = parse_datetime("2025-06-05");
        let undated = todo(4, "Work", false);

        let todos = vec![late, done, future, undated];
        let ids: Vec<i64> = overdue(&todos, now).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn recent_is_newest_first_and_stable() {
        let todos = vec![
            dated(1, "2025-06-01T08:00:00"),
            dated(2, "2025-06-03T08:00:00"),
            todo(3, "Work", false),
            dated(4, "2025-06-01T08:00:00"),
            dated(5, "2025-06-02T08:00:00"),
        ];
        let ids: Vec<i64> = recent(&todos, 10).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 5, 1, 4, 3]);

        let top: Vec<i64> = recent(&todos, 2).iter().map(|t| t.id).collect();
        assert_eq!(top, vec![2, 5]);
    }

    #[test]
    fn summary_combines_everything() {
        let now = parse_datetime("2025-06-10").unwrap();
        let mut todos: Vec<Todo> = (1..=7).map(|i| dated(i, &format!("2025-06-0{i}"))).collect();
        todos[0].completed = true;
        todos[1].due_date = parse_datetime("2025-06-09");

        let summary = DashboardSummary::new(&todos, now);
        assert_eq!(summary.stats.total, 7);
        assert_eq!(summary.completion_rate, 14);
        assert_eq!(summary.overdue.len(), 1);
        assert_eq!(summary.recent.len(), RECENT_LIMIT);
        assert_eq!(summary.recent[0].id, 7);
    }
}
