use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{AuthResponse, Category, CategoryId, Priority, Recurrence, SubtaskId, Todo, TodoDraft, TodoId, User};
use std::rc::Rc;

use crate::api::{ApiClient, Transport};
use crate::browser::Browser;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::pages::auth::AuthForm;
use crate::pages::categories::CategoryPage;
use crate::pages::profile::ProfileForm;
use crate::pages::todos::TodoPage;
use crate::route::{self, GuardDecision, Route};
use crate::session::{AuthAction, SessionMachine, SessionObserver};
use crate::token_store::TokenStore;
use shared::query::{SortKey, StatusFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum Msg {
    // Navigation
    NavigateTo(Route),
    /// Back/forward landed on this path; `None` when nothing can be observed.
    HistoryPopped(Option<String>),
    SessionChecked(Result<User, ApiError>),
    DismissNotice,

    // Auth
    SetUsername(String),
    SetEmail(String),
    SetPassword(String),
    SetConfirmPassword(String),
    SubmitLogin,
    SubmitRegister,
    AuthSettled(AuthAction, Result<AuthResponse, ApiError>),
    Logout,
    RemoteLogoutDone(Result<(), ApiError>),

    // Todos
    TodosLoaded(Result<Vec<Todo>, ApiError>),
    CategoriesLoaded(Result<Vec<Category>, ApiError>),
    SetDraftTitle(String),
    SetDraftDescription(String),
    SetDraftCategory(String),
    SetDraftPriority(Priority),
    SetDraftDueDate(String),
    SetDraftTags(String),
    SetDraftRecurrence(Recurrence),
    SetDraftRecurrenceEnd(String),
    CreateTodo,
    TodoCreated(Result<Todo, ApiError>),
    ToggleTodo(TodoId),
    EditTodo(TodoId),
    SetEditTitle(String),
    SetEditDescription(String),
    SetEditCategory(String),
    SetEditPriority(Priority),
    SetEditDueDate(String),
    SetEditNotes(String),
    SetEditProgress(String),
    SetEditRecurrence(Recurrence),
    SetEditRecurrenceEnd(String),
    SaveEdit(TodoId),
    CancelEdit,
    TodoSaved(TodoId, Result<Todo, ApiError>),
    DeleteTodo(TodoId),
    TodoDeleted(TodoId, Result<(), ApiError>),
    ExpandTodo(TodoId),
    SetSubtaskTitle(String),
    AddSubtask(TodoId),
    ToggleSubtask(TodoId, SubtaskId, bool),
    RemoveSubtask(TodoId, SubtaskId),
    SetAttachmentInput(String),
    SaveAttachment(TodoId),
    SetSearch(String),
    SetStatusFilter(StatusFilter),
    SetCategoryFilter(Option<String>),
    SetSort(SortKey),
    ToggleShowCompleted,

    // Categories
    SetNewCategory(String),
    CreateCategory,
    CategoryCreated(Result<(), ApiError>),
    DeleteCategory(CategoryId),
    CategoryDeleted(Result<(), ApiError>),

    // Profile
    SetProfileFullName(String),
    SetProfileEmail(String),
    SetCurrentPassword(String),
    SetNewPassword(String),
    SetConfirmNewPassword(String),
    SaveProfile,
    ProfileSaved(Result<User, ApiError>),
}

pub struct Model {
    pub(crate) api: ApiClient,
    pub(crate) session: SessionMachine,
    pub(crate) route: Route,
    pub(crate) notice: Option<Notice>,
    pub(crate) auth: AuthForm,
    pub(crate) todos: TodoPage,
    pub(crate) categories: CategoryPage,
    pub(crate) profile: ProfileForm,
    browser: Rc<dyn Browser>,
}

impl Model {
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn Transport>,
        store: Rc<dyn TokenStore>,
        observer: Rc<dyn SessionObserver>,
        browser: Rc<dyn Browser>,
    ) -> Self {
        Self {
            api: ApiClient::new(config.api_base_url.clone(), transport),
            session: SessionMachine::new(store, observer),
            route: Route::HOME,
            notice: None,
            auth: AuthForm::default(),
            todos: TodoPage::default(),
            categories: CategoryPage::default(),
            profile: ProfileForm::default(),
            browser,
        }
    }

    /// API client carrying the current session's token.
    fn client(&self) -> ApiClient {
        self.session.client(&self.api)
    }

    fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice { kind, text: text.into() });
    }

    /// Routes an API failure: a 401 ends the session and bounces to the
    /// login page, anything else becomes a dismissible notice.
    fn fail(&mut self, error: ApiError, fallback: &str) -> Cmd<Msg> {
        log::warn!("{}: {}", fallback, error);
        if self.session.handle_api_error(&error) {
            self.notice = None;
            return self.show(self.route, false);
        }
        self.notify(NoticeKind::Error, error.user_message(fallback));
        Cmd::none()
    }

    /// Runs the route guard for `requested` and mounts whatever page the
    /// viewer ends up on. Redirects replace the history entry.
    fn show(&mut self, requested: Route, push: bool) -> Cmd<Msg> {
        let status = self.session.status();
        let target = route::resolve(status, requested);
        if target != self.route || target != requested {
            if push && target == requested {
                self.browser.push(target);
            } else {
                self.browser.replace(target);
            }
        }
        self.route = target;
        if status.is_pending() {
            return Cmd::none();
        }
        self.mount(target)
    }

    /// Fresh page state and data for `route`; snapshots of other pages are dropped.
    fn mount(&mut self, route: Route) -> Cmd<Msg> {
        self.todos = TodoPage::default();
        self.categories = CategoryPage::default();
        match route {
            Route::Login | Route::Register => {
                self.auth = AuthForm::default();
                Cmd::none()
            }
            Route::Dashboard => self.load_todos(),
            Route::Todos => Cmd::batch(vec![self.load_todos(), self.load_categories()]),
            Route::Categories => self.load_categories(),
            Route::Profile => {
                self.profile = ProfileForm::for_user(self.session.user());
                Cmd::none()
            }
        }
    }

    fn load_todos(&mut self) -> Cmd<Msg> {
        self.todos.loading = true;
        let api = self.client();
        Cmd::new(async move { Msg::TodosLoaded(api.todos().await) })
    }

    fn load_categories(&mut self) -> Cmd<Msg> {
        self.categories.loading = true;
        let api = self.client();
        Cmd::new(async move { Msg::CategoriesLoaded(api.categories().await) })
    }

    fn watch_history(&self) -> Cmd<Msg> {
        let popped = self.browser.next_pop();
        Cmd::new(async move { Msg::HistoryPopped(popped.await) })
    }

    fn save_todo(&mut self, id: TodoId, draft: TodoDraft) -> Cmd<Msg> {
        self.todos.busy.insert(id);
        let api = self.client();
        Cmd::new(async move { Msg::TodoSaved(id, api.update_todo(id, &draft).await) })
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        let requested = self
            .browser
            .current_path()
            .map(|p| Route::from_path(&p))
            .unwrap_or(Route::HOME);
        self.route = requested;
        let start = match self.session.begin_initialize() {
            Some(token) => {
                let api = self.api.with_bearer(Some(&token));
                Cmd::new(async move { Msg::SessionChecked(api.current_user().await) })
            }
            None => self.show(requested, false),
        };
        Cmd::batch(vec![start, self.watch_history()])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::NavigateTo(route) => {
                self.notice = None;
                self.show(route, true)
            }
            Msg::HistoryPopped(None) => Cmd::none(),
            Msg::HistoryPopped(Some(path)) => {
                self.notice = None;
                let rearm = self.watch_history();
                Cmd::batch(vec![rearm, self.show(Route::from_path(&path), false)])
            }
            Msg::SessionChecked(result) => {
                self.session.finish_initialize(result);
                self.show(self.route, false)
            }
            Msg::DismissNotice => {
                self.notice = None;
                self.session.dismiss_error();
                Cmd::none()
            }

            Msg::SetUsername(value) => {
                self.auth.username = value;
                Cmd::none()
            }
            Msg::SetEmail(value) => {
                self.auth.email = value;
                Cmd::none()
            }
            Msg::SetPassword(value) => {
                self.auth.password = value;
                Cmd::none()
            }
            Msg::SetConfirmPassword(value) => {
                self.auth.confirm_password = value;
                Cmd::none()
            }
            Msg::SubmitLogin => {
                if self.auth.submitting {
                    return Cmd::none();
                }
                self.session.dismiss_error();
                match self.auth.login_request() {
                    Ok(credentials) => {
                        self.auth.begin_submit();
                        let api = self.api.with_bearer(None);
                        Cmd::new(async move { Msg::AuthSettled(AuthAction::Login, api.login(&credentials).await) })
                    }
                    Err(problem) => {
                        self.auth.error = Some(problem);
                        Cmd::none()
                    }
                }
            }
            Msg::SubmitRegister => {
                if self.auth.submitting {
                    return Cmd::none();
                }
                self.session.dismiss_error();
                match self.auth.register_request() {
                    Ok(fields) => {
                        self.auth.begin_submit();
                        let api = self.api.with_bearer(None);
                        Cmd::new(async move { Msg::AuthSettled(AuthAction::Register, api.register(&fields).await) })
                    }
                    Err(problem) => {
                        self.auth.error = Some(problem);
                        Cmd::none()
                    }
                }
            }
            Msg::AuthSettled(action, result) => {
                self.auth.submitting = false;
                match self.session.finish_auth(action, result) {
                    Ok(()) => self.show(Route::HOME, true),
                    Err(failure) => {
                        self.auth.password.clear();
                        self.auth.confirm_password.clear();
                        log::debug!("{:?} rejected: {}", action, failure.error);
                        Cmd::none()
                    }
                }
            }
            Msg::Logout => {
                let api = self.client();
                self.session.logout();
                self.notice = None;
                let farewell = Cmd::new(async move { Msg::RemoteLogoutDone(api.logout().await) });
                Cmd::batch(vec![farewell, self.show(Route::Login, true)])
            }
            Msg::RemoteLogoutDone(result) => {
                if let Err(e) = result {
                    log::debug!("server-side logout failed: {}", e);
                }
                Cmd::none()
            }

            Msg::TodosLoaded(result) => {
                self.todos.loading = false;
                match result {
                    Ok(todos) => {
                        self.todos.loaded(todos);
                        Cmd::none()
                    }
                    Err(e) => self.fail(e, "Failed to fetch todos"),
                }
            }
            Msg::CategoriesLoaded(result) => {
                self.categories.loading = false;
                match result {
                    Ok(categories) => {
                        self.categories.loaded(categories);
                        Cmd::none()
                    }
                    Err(e) => self.fail(e, "Failed to load categories"),
                }
            }
            Msg::SetDraftTitle(value) => {
                self.todos.draft.title = value;
                Cmd::none()
            }
            Msg::SetDraftDescription(value) => {
                self.todos.draft.description = value;
                Cmd::none()
            }
            Msg::SetDraftCategory(value) => {
                self.todos.draft.category = value;
                Cmd::none()
            }
            Msg::SetDraftPriority(priority) => {
                self.todos.draft.priority = priority;
                Cmd::none()
            }
            Msg::SetDraftDueDate(value) => {
                self.todos.draft.due_date = value;
                Cmd::none()
            }
            Msg::SetDraftTags(value) => {
                self.todos.draft.tags = value;
                Cmd::none()
            }
            Msg::SetDraftRecurrence(recurrence) => {
                self.todos.draft.recurrence = recurrence;
                Cmd::none()
            }
            Msg::SetDraftRecurrenceEnd(value) => {
                self.todos.draft.recurrence_end = value;
                Cmd::none()
            }
            Msg::CreateTodo => match self.todos.draft.to_draft(None) {
                Ok(draft) => {
                    self.todos.creating = true;
                    let api = self.client();
                    Cmd::new(async move { Msg::TodoCreated(api.create_todo(&draft).await) })
                }
                Err(problem) => {
                    self.notify(NoticeKind::Error, problem);
                    Cmd::none()
                }
            },
            Msg::TodoCreated(result) => {
                self.todos.creating = false;
                match result {
                    Ok(todo) => {
                        self.todos.created(todo);
                        Cmd::none()
                    }
                    Err(e) => self.fail(e, "Failed to add todo"),
                }
            }
            Msg::ToggleTodo(id) => match self.todos.find(id).map(TodoDraft::toggled) {
                Some(draft) if !self.todos.busy.contains(&id) => self.save_todo(id, draft),
                _ => Cmd::none(),
            },
            Msg::EditTodo(id) => {
                self.todos.start_edit(id);
                Cmd::none()
            }
            Msg::SetEditTitle(value) => {
                self.todos.edit_form(|form| form.title = value);
                Cmd::none()
            }
            Msg::SetEditDescription(value) => {
                self.todos.edit_form(|form| form.description = value);
                Cmd::none()
            }
            Msg::SetEditCategory(value) => {
                self.todos.edit_form(|form| form.category = value);
                Cmd::none()
            }
            Msg::SetEditPriority(priority) => {
                self.todos.edit_form(|form| form.priority = priority);
                Cmd::none()
            }
            Msg::SetEditDueDate(value) => {
                self.todos.edit_form(|form| form.due_date = value);
                Cmd::none()
            }
            Msg::SetEditNotes(value) => {
                self.todos.edit_form(|form| form.notes = value);
                Cmd::none()
            }
            Msg::SetEditProgress(value) => {
                self.todos.edit_form(|form| form.progress = value);
                Cmd::none()
            }
            Msg::SetEditRecurrence(recurrence) => {
                self.todos.edit_form(|form| form.recurrence = recurrence);
                Cmd::none()
            }
            Msg::SetEditRecurrenceEnd(value) => {
                self.todos.edit_form(|form| form.recurrence_end = value);
                Cmd::none()
            }
            Msg::SaveEdit(id) => match self.todos.finish_edit(id) {
                Some(Ok(draft)) => self.save_todo(id, draft),
                Some(Err(problem)) => {
                    self.notify(NoticeKind::Error, problem);
                    Cmd::none()
                }
                None => Cmd::none(),
            },
            Msg::CancelEdit => {
                self.todos.editing = None;
                Cmd::none()
            }
            Msg::TodoSaved(id, result) => match result {
                Ok(todo) => {
                    self.todos.saved(todo);
                    Cmd::none()
                }
                Err(e) => {
                    self.todos.settle_failed(id);
                    self.fail(e, "Failed to update todo")
                }
            },
            Msg::DeleteTodo(id) => {
                if self.todos.busy.contains(&id) || !self.browser.confirm("Are you sure you want to delete this todo?") {
                    return Cmd::none();
                }
                self.todos.busy.insert(id);
                let api = self.client();
                Cmd::new(async move { Msg::TodoDeleted(id, api.delete_todo(id).await) })
            }
            Msg::TodoDeleted(id, result) => match result {
                Ok(()) => {
                    self.todos.deleted(id);
                    Cmd::none()
                }
                Err(e) => {
                    self.todos.settle_failed(id);
                    self.fail(e, "Failed to delete todo")
                }
            },
            Msg::ExpandTodo(id) => {
                self.todos.toggle_expanded(id);
                Cmd::none()
            }
            Msg::SetSubtaskTitle(value) => {
                self.todos.subtask_title = value;
                Cmd::none()
            }
            Msg::AddSubtask(id) => {
                let title = self.todos.subtask_title.trim().to_string();
                if title.is_empty() || self.todos.busy.contains(&id) {
                    return Cmd::none();
                }
                self.todos.subtask_title.clear();
                self.todos.busy.insert(id);
                let api = self.client();
                Cmd::new(async move { Msg::TodoSaved(id, api.add_subtask(id, &title).await) })
            }
            Msg::ToggleSubtask(id, subtask, completed) => {
                if self.todos.busy.contains(&id) {
                    return Cmd::none();
                }
                self.todos.busy.insert(id);
                let api = self.client();
                Cmd::new(async move { Msg::TodoSaved(id, api.set_subtask_completed(id, subtask, completed).await) })
            }
            Msg::RemoveSubtask(id, subtask) => {
                if self.todos.busy.contains(&id) {
                    return Cmd::none();
                }
                self.todos.busy.insert(id);
                let api = self.client();
                Cmd::new(async move { Msg::TodoSaved(id, api.remove_subtask(id, subtask).await) })
            }
            Msg::SetAttachmentInput(value) => {
                self.todos.attachment_input = value;
                Cmd::none()
            }
            Msg::SaveAttachment(id) => match self.todos.attachment_change(id) {
                Some(link) => {
                    self.todos.busy.insert(id);
                    let api = self.client();
                    Cmd::new(async move { Msg::TodoSaved(id, api.update_attachment(id, &link).await) })
                }
                None => Cmd::none(),
            },
            Msg::SetSearch(value) => {
                self.todos.query.search = value;
                Cmd::none()
            }
            Msg::SetStatusFilter(status) => {
                self.todos.query.status = status;
                Cmd::none()
            }
            Msg::SetCategoryFilter(category) => {
                self.todos.query.category = category;
                Cmd::none()
            }
            Msg::SetSort(sort) => {
                self.todos.query.sort = sort;
                Cmd::none()
            }
            Msg::ToggleShowCompleted => {
                self.todos.query.show_completed = !self.todos.query.show_completed;
                Cmd::none()
            }

            Msg::SetNewCategory(value) => {
                self.categories.new_name = value;
                Cmd::none()
            }
            Msg::CreateCategory => match self.categories.new_category() {
                Ok(name) => {
                    self.categories.saving = true;
                    let api = self.client();
                    Cmd::new(async move { Msg::CategoryCreated(api.create_category(&name).await) })
                }
                Err(problem) => {
                    self.notify(NoticeKind::Error, problem);
                    Cmd::none()
                }
            },
            Msg::CategoryCreated(result) => {
                self.categories.saving = false;
                match result {
                    Ok(()) => {
                        self.categories.new_name.clear();
                        self.notify(NoticeKind::Success, "Category added successfully");
                        self.load_categories()
                    }
                    Err(e) => self.fail(e, "Failed to add category"),
                }
            }
            Msg::DeleteCategory(id) => {
                if !self.categories.can_delete(id) || !self.browser.confirm("Are you sure you want to delete this category?") {
                    return Cmd::none();
                }
                self.categories.saving = true;
                let api = self.client();
                Cmd::new(async move { Msg::CategoryDeleted(api.delete_category(id).await) })
            }
            Msg::CategoryDeleted(result) => {
                self.categories.saving = false;
                match result {
                    Ok(()) => {
                        self.notify(NoticeKind::Success, "Category deleted successfully");
                        self.load_categories()
                    }
                    Err(e) => self.fail(e, "Failed to delete category"),
                }
            }

            Msg::SetProfileFullName(value) => {
                self.profile.full_name = value;
                Cmd::none()
            }
            Msg::SetProfileEmail(value) => {
                self.profile.email = value;
                Cmd::none()
            }
            Msg::SetCurrentPassword(value) => {
                self.profile.current_password = value;
                Cmd::none()
            }
            Msg::SetNewPassword(value) => {
                self.profile.new_password = value;
                Cmd::none()
            }
            Msg::SetConfirmNewPassword(value) => {
                self.profile.confirm_password = value;
                Cmd::none()
            }
            Msg::SaveProfile => {
                if self.profile.saving {
                    return Cmd::none();
                }
                match self.profile.update_request() {
                    Ok(update) => {
                        self.profile.saving = true;
                        let api = self.client();
                        Cmd::new(async move { Msg::ProfileSaved(api.update_profile(&update).await) })
                    }
                    Err(problem) => {
                        self.notify(NoticeKind::Error, problem);
                        Cmd::none()
                    }
                }
            }
            Msg::ProfileSaved(result) => {
                self.profile.saving = false;
                match result {
                    Ok(user) => {
                        self.profile.saved(&user);
                        self.session.replace_user(user);
                        self.notify(NoticeKind::Success, "Profile updated successfully");
                        Cmd::none()
                    }
                    Err(e) => self.fail(e, "Failed to update profile"),
                }
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        let page = match route::guard(self.session.status(), self.route) {
            GuardDecision::Pending => self.view_loading(),
            GuardDecision::RedirectToLogin | GuardDecision::RedirectToHome => self.view_loading(),
            GuardDecision::Render => match self.route {
                Route::Login => self.auth.view_login(self.session.last_error()),
                Route::Register => self.auth.view_register(self.session.last_error()),
                Route::Dashboard => self.view_dashboard(),
                Route::Todos => self.todos.view(&self.categories.categories),
                Route::Categories => self.categories.view(),
                Route::Profile => self.profile.view(self.session.user()),
            },
        };

        let authenticated = self.session.is_authenticated();
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                if authenticated { self.view_header() } else { text("") },
                div(
                    [class("max-w-6xl mx-auto px-6 py-8")],
                    [
                        if authenticated { self.view_notice() } else { text("") },
                        page,
                    ],
                ),
            ],
        )
    }
}

impl Model {
    fn view_loading(&self) -> Node<Msg> {
        div([class("text-center py-20 text-ctp-subtext0 italic")], [text("Loading...")])
    }

    fn view_header(&self) -> Node<Msg> {
        let name = self.session.user().map(|u| u.display_name().to_string()).unwrap_or_default();
        header([class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")], [
            div([class("max-w-6xl mx-auto px-6 py-4")], [
                div([class("flex items-center justify-between")], [
                    h1([class("text-2xl font-bold text-ctp-text")], [text("Todo App")]),
                    nav([class("flex items-center space-x-4")], [
                        self.nav_link(Route::Dashboard),
                        self.nav_link(Route::Todos),
                        self.nav_link(Route::Categories),
                        self.nav_link(Route::Profile),
                        span([class("text-sm text-ctp-subtext0 pl-4")], [text(&name)]),
                        button([
                            on_click(|_| Msg::Logout),
                            class("px-3 py-2 rounded-md text-sm font-medium text-ctp-red hover:bg-ctp-surface0 transition-colors duration-200"),
                        ], [text("Logout")]),
                    ]),
                ]),
            ]),
        ])
    }

    fn nav_link(&self, route: Route) -> Node<Msg> {
        let is_active = self.route == route;
        a([
            href(route.to_path()),
            on_click(move |event| {
                event.prevent_default();
                Msg::NavigateTo(route)
            }),
            class(&format!(
                "px-3 py-2 rounded-md text-sm font-medium transition-colors duration-200 {}",
                if is_active {
                    "bg-ctp-blue text-ctp-base"
                } else {
                    "text-ctp-subtext0 hover:text-ctp-text hover:bg-ctp-surface0"
                }
            )),
        ], [text(route.title())])
    }

    fn view_notice(&self) -> Node<Msg> {
        match &self.notice {
            Some(notice) => div([
                class(&format!(
                    "mb-6 flex items-center justify-between rounded-lg px-4 py-3 border {}",
                    match notice.kind {
                        NoticeKind::Error => "bg-ctp-red/10 border-ctp-red text-ctp-red",
                        NoticeKind::Success => "bg-ctp-green/10 border-ctp-green text-ctp-green",
                    }
                )),
            ], [
                span([], [text(&notice.text)]),
                button([on_click(|_| Msg::DismissNotice), class("ml-4 font-bold")], [text("×")]),
            ]),
            None => text(""),
        }
    }
}
