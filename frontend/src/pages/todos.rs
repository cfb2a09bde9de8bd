use chrono::{Local, NaiveDateTime};
use sauron::{
    html::{attributes, attributes::*, *},
    prelude::*,
};
use shared::query::{SortKey, StatusFilter, TodoQuery};
use shared::wire::parse_datetime;
use shared::{Category, Priority, Recurrence, Todo, TodoDraft, TodoId};
use std::collections::BTreeSet;

use super::{chip, CARD, INPUT_CLASS, PRIMARY_BUTTON};
use crate::app::Msg;

/// Text-field state behind both the "new todo" card and inline editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    /// `YYYY-MM-DD` as produced by a date input.
    pub due_date: String,
    /// Comma separated.
    pub tags: String,
    pub recurrence: Recurrence,
    /// `YYYY-MM-DD`; ignored unless the todo repeats.
    pub recurrence_end: String,
    pub notes: String,
    pub progress: String,
}

impl TodoForm {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description().to_string(),
            category: todo.category().to_string(),
            priority: todo.priority,
            due_date: todo.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            tags: todo.tags.iter().cloned().collect::<Vec<_>>().join(", "),
            recurrence: todo.recurrence_type,
            recurrence_end: todo
                .recurrence_end_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            notes: todo.notes.clone().unwrap_or_default(),
            progress: todo.progress.to_string(),
        }
    }

    /// Validates the fields and lays them over `base`, so attributes the
    /// form doesn't show (completion, attachment) survive an edit.
    pub fn to_draft(&self, base: Option<&Todo>) -> Result<TodoDraft, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".into());
        }

        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(parse_datetime(raw).ok_or_else(|| format!("Invalid due date: {}", raw))?),
        };

        let recurrence_end = match self.recurrence_end.trim() {
            _ if !self.recurrence.is_recurring() => None,
            "" => None,
            raw => Some(parse_datetime(raw).ok_or_else(|| format!("Invalid end date: {}", raw))?),
        };
        if let (Some(due), Some(end)) = (due_date, recurrence_end) {
            if end < due {
                return Err("Repetition cannot end before the due date".into());
            }
        }

        let progress = match self.progress.trim() {
            "" => base.map(|t| t.progress).unwrap_or_default(),
            raw => match raw.parse::<u8>() {
                Ok(value) if value <= 100 => value,
                _ => return Err("Progress must be a number between 0 and 100".into()),
            },
        };

        let tags: BTreeSet<String> = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        let notes = self.notes.trim();
        let mut draft = base.map(TodoDraft::from).unwrap_or_default();
        draft.title = title.to_string();
        draft.description = self.description.trim().to_string();
        draft.category = self.category.trim().to_string();
        draft.priority = self.priority;
        draft.due_date = due_date;
        draft.tags = tags;
        draft.recurrence_type = self.recurrence;
        draft.recurrence_end_date = recurrence_end;
        draft.notes = (!notes.is_empty()).then(|| notes.to_string());
        draft.progress = progress;
        Ok(draft)
    }
}

#[derive(Debug, Default)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub creating: bool,
    pub draft: TodoForm,
    pub editing: Option<(TodoId, TodoForm)>,
    /// Todos with a mutation in flight; their controls are disabled.
    pub busy: BTreeSet<TodoId>,
    pub query: TodoQuery,
    pub expanded: Option<TodoId>,
    pub subtask_title: String,
    /// Attachment URL field of the expanded todo.
    pub attachment_input: String,
}

impl TodoPage {
    pub fn loaded(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    pub fn created(&mut self, todo: Todo) {
        self.todos.insert(0, todo);
        self.draft = TodoForm::default();
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn start_edit(&mut self, id: TodoId) {
        if let Some(todo) = self.find(id) {
            self.editing = Some((id, TodoForm::from_todo(todo)));
        }
    }

    pub fn edit_form(&mut self, change: impl FnOnce(&mut TodoForm)) {
        if let Some((_, form)) = &mut self.editing {
            change(form);
        }
    }

    /// Draft for the todo being edited. `None` when `id` is not the one
    /// open for editing or it already has a save in flight.
    pub fn finish_edit(&self, id: TodoId) -> Option<Result<TodoDraft, String>> {
        match &self.editing {
            Some((editing, form)) if *editing == id && !self.busy.contains(&id) => {
                Some(form.to_draft(self.find(id)))
            }
            _ => None,
        }
    }

    /// Swaps in the server's copy of a todo.
    pub fn saved(&mut self, todo: Todo) {
        self.busy.remove(&todo.id);
        if matches!(self.editing, Some((id, _)) if id == todo.id) {
            self.editing = None;
        }
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }

    pub fn settle_failed(&mut self, id: TodoId) {
        self.busy.remove(&id);
    }

    pub fn deleted(&mut self, id: TodoId) {
        self.busy.remove(&id);
        self.todos.retain(|t| t.id != id);
        if matches!(self.editing, Some((editing, _)) if editing == id) {
            self.editing = None;
        }
        if self.expanded == Some(id) {
            self.expanded = None;
        }
    }

    pub fn toggle_expanded(&mut self, id: TodoId) {
        self.expanded = if self.expanded == Some(id) { None } else { Some(id) };
        self.subtask_title.clear();
        self.attachment_input = self
            .expanded
            .and_then(|open| self.find(open))
            .and_then(|todo| todo.attachment_url.clone())
            .unwrap_or_default();
    }

    /// New attachment URL for the expanded todo, when it differs from the
    /// stored one and nothing else is in flight for it.
    pub fn attachment_change(&self, id: TodoId) -> Option<String> {
        if self.expanded != Some(id) || self.busy.contains(&id) {
            return None;
        }
        let current = self.find(id)?.attachment_url.as_deref().unwrap_or_default();
        let wanted = self.attachment_input.trim();
        (wanted != current).then(|| wanted.to_string())
    }

    pub fn view(&self, categories: &[Category]) -> Node<Msg> {
        let now = Local::now().naive_local();
        let visible = self.query.apply(&self.todos);

        div([class("space-y-8")], [
            self.view_create(categories),
            div([class(CARD)], [
                h2([class("text-2xl font-bold text-ctp-text mb-6")], [text("Your Todos")]),
                self.view_filters(categories),
                if self.loading {
                    div([class("text-center py-10 text-ctp-subtext0 italic")], [text("Loading todos...")])
                } else if self.todos.is_empty() {
                    p([class("text-center py-10 text-ctp-subtext0")], [text("No todos yet. Add one above!")])
                } else if visible.is_empty() {
                    p([class("text-center py-10 text-ctp-subtext0")], [text("No todos match your filters")])
                } else {
                    ul(
                        [class("space-y-3")],
                        visible.into_iter().map(|todo| self.view_todo(todo, now)).collect::<Vec<_>>(),
                    )
                },
            ]),
        ])
    }

    fn view_create(&self, categories: &[Category]) -> Node<Msg> {
        let draft = &self.draft;
        div([class(CARD)], [
            h2([class("text-2xl font-bold text-ctp-text mb-6")], [text("Add New Todo")]),
            div([class("grid grid-cols-1 md:grid-cols-2 gap-4")], [
                input([
                    r#type("text"),
                    placeholder("What needs to be done?"),
                    value(&draft.title),
                    on_input(|event| Msg::SetDraftTitle(event.value())),
                    class(INPUT_CLASS),
                ], []),
                input([
                    r#type("text"),
                    placeholder("Category"),
                    value(&draft.category),
                    on_input(|event| Msg::SetDraftCategory(event.value())),
                    class(INPUT_CLASS),
                ], []),
                textarea([
                    placeholder("Description (optional)"),
                    value(&draft.description),
                    on_input(|event| Msg::SetDraftDescription(event.value())),
                    class(&format!("md:col-span-2 {}", INPUT_CLASS)),
                ], []),
                input([
                    r#type("date"),
                    value(&draft.due_date),
                    on_input(|event| Msg::SetDraftDueDate(event.value())),
                    class(INPUT_CLASS),
                ], []),
                input([
                    r#type("text"),
                    placeholder("Tags, comma separated"),
                    value(&draft.tags),
                    on_input(|event| Msg::SetDraftTags(event.value())),
                    class(INPUT_CLASS),
                ], []),
            ]),
            if categories.is_empty() {
                text("")
            } else {
                div(
                    [class("flex flex-wrap gap-2 mt-4")],
                    categories
                        .iter()
                        .map(|c| chip(&c.name, draft.category == c.name, Msg::SetDraftCategory(c.name.clone())))
                        .collect::<Vec<_>>(),
                )
            },
            picker_row(
                "Priority",
                Priority::ALL
                    .into_iter()
                    .map(|p| chip(p.label(), draft.priority == p, Msg::SetDraftPriority(p)))
                    .collect(),
            ),
            recurrence_row(draft, Msg::SetDraftRecurrence, Msg::SetDraftRecurrenceEnd),
            div([class("mt-6")], [
                button([
                    on_click(|_| Msg::CreateTodo),
                    disabled(self.creating || draft.title.trim().is_empty()),
                    class(PRIMARY_BUTTON),
                ], [text(if self.creating { "Adding..." } else { "Add Todo" })]),
            ]),
        ])
    }

    fn view_filters(&self, categories: &[Category]) -> Node<Msg> {
        let query = &self.query;
        let mut category_chips = vec![chip("All", query.category.is_none(), Msg::SetCategoryFilter(None))];
        category_chips.extend(categories.iter().map(|c| {
            chip(
                &c.name,
                query.category.as_deref() == Some(c.name.as_str()),
                Msg::SetCategoryFilter(Some(c.name.clone())),
            )
        }));

        div([class("space-y-3 mb-6")], [
            input([
                r#type("search"),
                placeholder("Search todos..."),
                value(&query.search),
                on_input(|event| Msg::SetSearch(event.value())),
                class(INPUT_CLASS),
            ], []),
            picker_row(
                "Show",
                StatusFilter::ALL
                    .into_iter()
                    .map(|s| chip(s.label(), query.status == s, Msg::SetStatusFilter(s)))
                    .collect(),
            ),
            picker_row("Category", category_chips),
            picker_row(
                "Sort by",
                SortKey::ALL
                    .into_iter()
                    .map(|k| chip(k.label(), query.sort == k, Msg::SetSort(k)))
                    .collect(),
            ),
            label([class("flex items-center gap-2 text-sm text-ctp-subtext1")], [
                input([
                    r#type("checkbox"),
                    checked(query.show_completed),
                    on_click(|_| Msg::ToggleShowCompleted),
                ], []),
                text("Show completed"),
            ]),
        ])
    }

    fn view_todo(&self, todo: &Todo, now: NaiveDateTime) -> Node<Msg> {
        let id = todo.id;
        let busy = self.busy.contains(&id);

        if let Some((_, form)) = self.editing.as_ref().filter(|(editing, _)| *editing == id) {
            return li([key(id.to_string()), class("bg-ctp-surface1 rounded-lg p-4 border border-ctp-blue")], [
                view_edit(id, form, busy),
            ]);
        }

        let overdue = todo.is_overdue(now);
        let expanded = self.expanded == Some(id);
        li([key(id.to_string()), class(&format!(
            "bg-ctp-surface1 rounded-lg p-4 border {}",
            if overdue { "border-ctp-red" } else { "border-ctp-surface2" }
        ))], [
            div([class("flex items-start gap-3")], [
                input([
                    r#type("checkbox"),
                    checked(todo.completed),
                    disabled(busy),
                    on_click(move |_| Msg::ToggleTodo(id)),
                    class("mt-1"),
                ], []),
                div([class("flex-1 min-w-0")], [
                    p([class(if todo.completed {
                        "font-medium line-through text-ctp-subtext0"
                    } else {
                        "font-medium text-ctp-text"
                    })], [text(&todo.title)]),
                    if todo.description().is_empty() {
                        text("")
                    } else {
                        p([class("text-sm text-ctp-subtext0 mt-1")], [text(todo.description())])
                    },
                    div([class("flex flex-wrap items-center gap-2 mt-2 text-xs")], badges(todo, overdue)),
                    if todo.progress > 0 {
                        div([class("w-full bg-ctp-surface2 rounded-full h-1 mt-3")], [div([
                            class("bg-ctp-green h-1 rounded-full"),
                            attributes::styles([("width", format!("{}%", todo.progress))]),
                        ], [])])
                    } else {
                        text("")
                    },
                ]),
                div([class("flex items-center gap-2")], [
                    small_button(
                        &format!("Subtasks {}/{}", todo.completed_subtasks(), todo.subtasks.len()),
                        false,
                        Msg::ExpandTodo(id),
                    ),
                    small_button("Edit", busy, Msg::EditTodo(id)),
                    small_button("Delete", busy, Msg::DeleteTodo(id)),
                ]),
            ]),
            if expanded { self.view_subtasks(todo, busy) } else { text("") },
        ])
    }

    fn view_subtasks(&self, todo: &Todo, busy: bool) -> Node<Msg> {
        let id = todo.id;
        div([class("mt-4 pl-8 space-y-2")], [
            ul(
                [class("space-y-1")],
                todo.subtasks
                    .iter()
                    .map(|subtask| {
                        let subtask_id = subtask.id;
                        let done = subtask.completed;
                        li([key(subtask_id.to_string()), class("flex items-center gap-2 text-sm")], [
                            input([
                                r#type("checkbox"),
                                checked(done),
                                disabled(busy),
                                on_click(move |_| Msg::ToggleSubtask(id, subtask_id, !done)),
                            ], []),
                            span(
                                [class(if done { "flex-1 line-through text-ctp-subtext0" } else { "flex-1" })],
                                [text(&subtask.title)],
                            ),
                            small_button("Remove", busy, Msg::RemoveSubtask(id, subtask_id)),
                        ])
                    })
                    .collect::<Vec<_>>(),
            ),
            div([class("flex gap-2")], [
                input([
                    r#type("text"),
                    placeholder("New subtask"),
                    value(&self.subtask_title),
                    on_input(|event| Msg::SetSubtaskTitle(event.value())),
                    class(INPUT_CLASS),
                ], []),
                small_button("Add", busy || self.subtask_title.trim().is_empty(), Msg::AddSubtask(id)),
            ]),
            match todo.notes.as_deref() {
                Some(notes) if !notes.is_empty() => {
                    p([class("text-sm text-ctp-subtext1 italic")], [text(&format!("Notes: {}", notes))])
                }
                _ => text(""),
            },
            div([class("flex gap-2")], [
                input([
                    r#type("url"),
                    placeholder("Attachment URL"),
                    value(&self.attachment_input),
                    on_input(|event| Msg::SetAttachmentInput(event.value())),
                    class(INPUT_CLASS),
                ], []),
                small_button("Save link", busy || self.attachment_change(id).is_none(), Msg::SaveAttachment(id)),
            ]),
            match todo.attachment_url.as_deref() {
                Some(link) if !link.is_empty() => a([
                    href(link.to_string()),
                    attr("target", "_blank"),
                    attr("rel", "noopener noreferrer"),
                    class("text-sm text-ctp-blue hover:underline break-all"),
                ], [text(&format!("📎 {}", link))]),
                _ => text(""),
            },
        ])
    }
}

fn view_edit(id: TodoId, form: &TodoForm, busy: bool) -> Node<Msg> {
    div([class("space-y-3")], [
        input([
            r#type("text"),
            value(&form.title),
            on_input(|event| Msg::SetEditTitle(event.value())),
            class(INPUT_CLASS),
        ], []),
        textarea([
            placeholder("Description"),
            value(&form.description),
            on_input(|event| Msg::SetEditDescription(event.value())),
            class(INPUT_CLASS),
        ], []),
        div([class("grid grid-cols-1 md:grid-cols-3 gap-3")], [
            input([
                r#type("text"),
                placeholder("Category"),
                value(&form.category),
                on_input(|event| Msg::SetEditCategory(event.value())),
                class(INPUT_CLASS),
            ], []),
            input([
                r#type("date"),
                value(&form.due_date),
                on_input(|event| Msg::SetEditDueDate(event.value())),
                class(INPUT_CLASS),
            ], []),
            input([
                r#type("number"),
                placeholder("Progress %"),
                value(&form.progress),
                on_input(|event| Msg::SetEditProgress(event.value())),
                class(INPUT_CLASS),
            ], []),
        ]),
        textarea([
            placeholder("Notes"),
            value(&form.notes),
            on_input(|event| Msg::SetEditNotes(event.value())),
            class(INPUT_CLASS),
        ], []),
        picker_row(
            "Priority",
            Priority::ALL
                .into_iter()
                .map(|p| chip(p.label(), form.priority == p, Msg::SetEditPriority(p)))
                .collect(),
        ),
        recurrence_row(form, Msg::SetEditRecurrence, Msg::SetEditRecurrenceEnd),
        div([class("flex gap-2")], [
            button([
                on_click(move |_| Msg::SaveEdit(id)),
                disabled(busy || form.title.trim().is_empty()),
                class(PRIMARY_BUTTON),
            ], [text(if busy { "Saving..." } else { "Save" })]),
            small_button("Cancel", false, Msg::CancelEdit),
        ]),
    ])
}

fn badges(todo: &Todo, overdue: bool) -> Vec<Node<Msg>> {
    let priority_class = match todo.priority {
        Priority::High => "bg-ctp-red/20 text-ctp-red",
        Priority::Medium => "bg-ctp-yellow/20 text-ctp-yellow",
        Priority::Low => "bg-ctp-green/20 text-ctp-green",
    };
    let mut nodes = vec![span(
        [class(&format!("px-2 py-0.5 rounded-full {}", priority_class))],
        [text(todo.priority.label())],
    )];
    if !todo.category().is_empty() {
        nodes.push(span([class("px-2 py-0.5 rounded-full bg-ctp-blue/20 text-ctp-blue")], [text(todo.category())]));
    }
    if let Some(due) = todo.due_date {
        nodes.push(span(
            [class(if overdue { "text-ctp-red font-semibold" } else { "text-ctp-subtext0" })],
            [text(&format!("{} {}", if overdue { "Overdue:" } else { "Due" }, due.format("%b %d, %Y")))],
        ));
    }
    if todo.recurrence_type.is_recurring() {
        nodes.push(span([class("text-ctp-mauve")], [text(&format!("↻ {}", todo.recurrence_type.label()))]));
    }
    nodes.extend(
        todo.tags
            .iter()
            .map(|tag| span([class("px-2 py-0.5 rounded bg-ctp-surface2 text-ctp-subtext1")], [text(&format!("#{}", tag))])),
    );
    nodes
}

/// Recurrence chips plus, for repeating todos, the date repetition stops.
fn recurrence_row(form: &TodoForm, pick: fn(Recurrence) -> Msg, set_end: fn(String) -> Msg) -> Node<Msg> {
    let mut chips: Vec<Node<Msg>> = Recurrence::ALL
        .into_iter()
        .map(|r| chip(r.label(), form.recurrence == r, pick(r)))
        .collect();
    if form.recurrence.is_recurring() {
        chips.push(span([class("text-sm text-ctp-subtext0 ml-2")], [text("until")]));
        chips.push(input([
            r#type("date"),
            value(&form.recurrence_end),
            on_input(move |event| set_end(event.value())),
            class("px-2 py-1 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-sm text-ctp-text"),
        ], []));
    }
    picker_row("Repeats", chips)
}

fn picker_row(caption: &str, chips: Vec<Node<Msg>>) -> Node<Msg> {
    div([class("flex flex-wrap items-center gap-2 mt-4")], [
        span([class("text-sm font-medium text-ctp-subtext0 w-20")], [text(caption)]),
        div([class("flex flex-wrap gap-2")], chips),
    ])
}

fn small_button(caption: &str, inactive: bool, msg: Msg) -> Node<Msg> {
    button([
        on_click(move |_| msg.clone()),
        disabled(inactive),
        class("px-3 py-1 rounded-md text-sm bg-ctp-surface2 text-ctp-text hover:bg-ctp-overlay0 disabled:opacity-50 transition-colors duration-200"),
    ], [text(caption)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn todo(id: TodoId, title: &str) -> Todo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "category": "Work",
            "priority": "HIGH",
            "completed": true,
            "dueDate": "2025-06-03T00:00:00",
            "tags": ["urgent", "client"],
            "attachmentUrl": "https://files.example.com/brief.pdf",
            "progress": 40
        }))
        .unwrap()
    }

    #[test]
    fn new_todo_requires_a_title() {
        let form = TodoForm { title: "   ".into(), ..Default::default() };
        assert_eq!(form.to_draft(None), Err("Title is required".to_string()));
    }

    #[test]
    fn form_fields_are_normalized() {
        let form = TodoForm {
            title: " Plan vacation ".into(),
            category: "Personal ".into(),
            due_date: "2025-06-15".into(),
            tags: "travel, , summer,travel".into(),
            recurrence: Recurrence::Yearly,
            ..Default::default()
        };
        let draft = form.to_draft(None).unwrap();

        assert_eq!(draft.title, "Plan vacation");
        assert_eq!(draft.category, "Personal");
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 6, 15).and_then(|d| d.and_hms_opt(0, 0, 0)));
        assert_eq!(draft.tags.iter().map(String::as_str).collect::<Vec<_>>(), ["summer", "travel"]);
        assert_eq!(draft.recurrence_type, Recurrence::Yearly);
        assert_eq!(draft.notes, None);
        assert!(!draft.completed);
    }

    #[test]
    fn bad_due_date_and_progress_are_rejected() {
        let form = TodoForm { title: "x".into(), due_date: "someday".into(), ..Default::default() };
        assert!(form.to_draft(None).is_err());

        let form = TodoForm { title: "x".into(), progress: "150".into(), ..Default::default() };
        assert_eq!(
            form.to_draft(None),
            Err("Progress must be a number between 0 and 100".to_string())
        );
    }

    #[test]
    fn editing_keeps_fields_the_form_does_not_show() {
        let original = todo(1, "Review code changes");
        let mut form = TodoForm::from_todo(&original);
        assert_eq!(form.due_date, "2025-06-03");
        assert_eq!(form.tags, "client, urgent");
        assert_eq!(form.progress, "40");

        form.title = "Review pull request".into();
        form.notes = "ask about tests".into();
        let draft = form.to_draft(Some(&original)).unwrap();

        assert_eq!(draft.title, "Review pull request");
        assert!(draft.completed);
        assert_eq!(draft.attachment_url.as_deref(), Some("https://files.example.com/brief.pdf"));
        assert_eq!(draft.notes.as_deref(), Some("ask about tests"));
        assert_eq!(draft.progress, 40);
        assert_eq!(draft.due_date, original.due_date);
    }

    #[test]
    fn edit_cycle_replaces_the_todo_after_save() {
        let mut page = TodoPage::default();
        page.loaded(vec![todo(1, "First"), todo(2, "Second")]);

        page.start_edit(2);
        page.edit_form(|form| form.title = "Second, revised".into());
        assert!(page.finish_edit(1).is_none());

        let draft = page.finish_edit(2).unwrap().unwrap();
        assert_eq!(draft.title, "Second, revised");

        page.busy.insert(2);
        assert!(page.finish_edit(2).is_none());

        let mut updated = todo(2, "Second, revised");
        updated.completed = false;
        page.saved(updated);

        assert!(page.editing.is_none());
        assert!(page.busy.is_empty());
        assert_eq!(page.find(2).map(|t| t.title.as_str()), Some("Second, revised"));
        assert_eq!(page.todos.len(), 2);
    }

    #[test]
    fn failed_save_leaves_list_and_edit_open() {
        let mut page = TodoPage::default();
        page.loaded(vec![todo(1, "First")]);
        page.start_edit(1);
        page.busy.insert(1);

        page.settle_failed(1);

        assert!(page.busy.is_empty());
        assert!(page.editing.is_some());
        assert_eq!(page.find(1).map(|t| t.title.as_str()), Some("First"));
    }

    #[test]
    fn create_and_delete_update_the_list() {
        let mut page = TodoPage::default();
        page.loaded(vec![todo(1, "First")]);
        page.draft.title = "Second".into();

        page.created(todo(2, "Second"));
        assert_eq!(page.todos.iter().map(|t| t.id).collect::<Vec<_>>(), [2, 1]);
        assert_eq!(page.draft, TodoForm::default());

        page.toggle_expanded(2);
        page.start_edit(2);
        page.busy.insert(2);
        page.deleted(2);

        assert_eq!(page.todos.len(), 1);
        assert!(page.editing.is_none());
        assert!(page.expanded.is_none());
        assert!(page.busy.is_empty());
    }

    #[test]
    fn expanding_toggles_and_resets_subtask_input() {
        let mut page = TodoPage::default();
        page.toggle_expanded(3);
        page.subtask_title = "draft".into();
        page.toggle_expanded(3);

        assert_eq!(page.expanded, None);
        assert!(page.subtask_title.is_empty());
    }

    #[test]
    fn repetition_end_applies_only_to_recurring_todos() {
        let form = TodoForm {
            title: "Water plants".into(),
            recurrence_end: "2025-09-01".into(),
            ..Default::default()
        };
        assert_eq!(form.to_draft(None).unwrap().recurrence_end_date, None);

        let form = TodoForm { recurrence: Recurrence::Weekly, ..form };
        assert_eq!(
            form.to_draft(None).unwrap().recurrence_end_date,
            NaiveDate::from_ymd_opt(2025, 9, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
    }

    #[test]
    fn repetition_cannot_end_before_it_is_due() {
        let form = TodoForm {
            title: "Water plants".into(),
            due_date: "2025-06-15".into(),
            recurrence: Recurrence::Daily,
            recurrence_end: "2025-06-01".into(),
            ..Default::default()
        };
        assert_eq!(form.to_draft(None), Err("Repetition cannot end before the due date".to_string()));

        let form = TodoForm { recurrence_end: "soon".into(), ..form };
        assert_eq!(form.to_draft(None), Err("Invalid end date: soon".to_string()));
    }

    #[test]
    fn editing_shows_the_repetition_end() {
        let mut original = todo(1, "Water plants");
        original.recurrence_type = Recurrence::Monthly;
        original.recurrence_end_date = NaiveDate::from_ymd_opt(2025, 12, 31).and_then(|d| d.and_hms_opt(0, 0, 0));

        let form = TodoForm::from_todo(&original);
        assert_eq!(form.recurrence, Recurrence::Monthly);
        assert_eq!(form.recurrence_end, "2025-12-31");
        assert_eq!(form.to_draft(Some(&original)).unwrap().recurrence_end_date, original.recurrence_end_date);
    }

    #[test]
    fn attachment_input_follows_the_expanded_todo() {
        let mut page = TodoPage::default();
        let mut bare = todo(2, "Second");
        bare.attachment_url = None;
        page.loaded(vec![todo(1, "First"), bare]);

        page.toggle_expanded(1);
        assert_eq!(page.attachment_input, "https://files.example.com/brief.pdf");

        page.toggle_expanded(2);
        assert!(page.attachment_input.is_empty());
    }

    #[test]
    fn attachment_change_needs_a_new_link_on_an_idle_expanded_todo() {
        let mut page = TodoPage::default();
        page.loaded(vec![todo(1, "First")]);
        page.attachment_input = "https://files.example.com/other.pdf".into();
        assert_eq!(page.attachment_change(1), None);

        page.toggle_expanded(1);
        assert_eq!(page.attachment_change(1), None);

        page.attachment_input = " https://files.example.com/other.pdf ".into();
        assert_eq!(page.attachment_change(1).as_deref(), Some("https://files.example.com/other.pdf"));

        page.busy.insert(1);
        assert_eq!(page.attachment_change(1), None);
        page.busy.clear();

        page.attachment_input.clear();
        assert_eq!(page.attachment_change(1).as_deref(), Some(""));
    }
}
