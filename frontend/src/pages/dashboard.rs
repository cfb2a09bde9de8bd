use chrono::Local;
use sauron::{
    html::{attributes, attributes::*, *},
    prelude::*,
};
use shared::stats::DashboardSummary;
use shared::Todo;

use super::CARD;
use crate::app::{Model, Msg};
use crate::route::Route;

impl Model {
    pub(crate) fn view_dashboard(&self) -> Node<Msg> {
        if self.todos.loading && self.todos.todos.is_empty() {
            return div([class("text-center py-10 text-ctp-subtext0 italic")], [text("Loading...")]);
        }

        let now = Local::now().naive_local();
        let summary = DashboardSummary::new(&self.todos.todos, now);
        let greeting = self
            .session
            .user()
            .map(|u| format!("Welcome back, {}", u.display_name()))
            .unwrap_or_else(|| "Welcome back".to_string());

        div([class("space-y-8")], [
            div([class(CARD)], [
                h2([class("text-3xl font-bold text-ctp-text mb-6")], [text(&greeting)]),
                div([class("grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6")], [
                    stat_card("Total Todos", &summary.stats.total.to_string(), "📝"),
                    stat_card("Completed", &summary.stats.completed.to_string(), "✅"),
                    stat_card("Pending", &summary.stats.pending.to_string(), "⏳"),
                    stat_card("Overdue", &summary.overdue.len().to_string(), "⚠️"),
                ]),
            ]),
            div([class("grid grid-cols-1 md:grid-cols-2 gap-8")], [
                div([class(CARD)], [
                    h3([class("text-xl font-semibold text-ctp-text mb-4")], [text("Progress")]),
                    progress_bar("Completion rate", summary.completion_rate, "bg-ctp-green"),
                    h4([class("text-sm font-medium text-ctp-subtext0 mt-6 mb-3")], [text("By category")]),
                    div(
                        [class("space-y-3")],
                        summary
                            .stats
                            .categories_by_count()
                            .into_iter()
                            .map(|(name, count)| {
                                let share = shared::stats::completion_rate(count, summary.stats.total);
                                progress_bar(&format!("{} ({})", name, count), share, "bg-ctp-blue")
                            })
                            .collect::<Vec<_>>(),
                    ),
                ]),
                div([class(CARD)], [
                    div([class("flex items-center justify-between mb-4")], [
                        h3([class("text-xl font-semibold text-ctp-text")], [text("Recent Todos")]),
                        a([
                            href(Route::Todos.to_path()),
                            on_click(|event| {
                                event.prevent_default();
                                Msg::NavigateTo(Route::Todos)
                            }),
                            class("text-sm text-ctp-blue hover:underline"),
                        ], [text("View all")]),
                    ]),
                    if summary.recent.is_empty() {
                        p([class("text-ctp-subtext0")], [text("No todos yet. Create one to get started!")])
                    } else {
                        ul(
                            [class("space-y-2")],
                            summary.recent.iter().map(|todo| recent_row(todo, now)).collect::<Vec<_>>(),
                        )
                    },
                ]),
            ]),
        ])
    }
}

fn stat_card(card_title: &str, stat: &str, icon: &str) -> Node<Msg> {
    div([class("bg-ctp-surface1 rounded-lg p-6 border border-ctp-surface2")], [
        div([class("flex items-center justify-between")], [
            div([], [
                p([class("text-sm font-medium text-ctp-subtext0")], [text(card_title)]),
                p([class("text-2xl font-bold text-ctp-text mt-1")], [text(stat)]),
            ]),
            span([class("text-3xl")], [text(icon)]),
        ]),
    ])
}

fn progress_bar(caption: &str, percentage: u8, color_class: &str) -> Node<Msg> {
    div([class("flex items-center justify-between")], [
        span([class("text-sm font-medium text-ctp-text w-40 truncate")], [text(caption)]),
        div([class("flex-1 mx-4")], [
            div([class("w-full bg-ctp-surface2 rounded-full h-2")], [
                div([
                    class(&format!("{} h-2 rounded-full transition-all duration-500", color_class)),
                    attributes::styles([("width", format!("{}%", percentage))]),
                ], []),
            ]),
        ]),
        span([class("text-sm text-ctp-subtext0")], [text(&format!("{}%", percentage))]),
    ])
}

fn recent_row(todo: &Todo, now: chrono::NaiveDateTime) -> Node<Msg> {
    let overdue = todo.is_overdue(now);
    li([key(todo.id.to_string()), class("flex items-center justify-between py-2 border-b border-ctp-surface1")], [
        span(
            [class(if todo.completed { "line-through text-ctp-subtext0" } else { "text-ctp-text" })],
            [text(&todo.title)],
        ),
        span([class(&format!(
            "text-xs {}",
            if overdue { "text-ctp-red font-semibold" } else { "text-ctp-subtext0" }
        ))], [text(&match todo.due_date {
            Some(due) if overdue => format!("Overdue since {}", due.format("%b %d")),
            Some(due) => format!("Due {}", due.format("%b %d")),
            None => todo.category().to_string(),
        })]),
    ])
}
