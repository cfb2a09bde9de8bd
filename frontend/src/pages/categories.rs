use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{Category, CategoryId};

use super::{CARD, INPUT_CLASS, PRIMARY_BUTTON};
use crate::app::Msg;

#[derive(Debug, Default)]
pub struct CategoryPage {
    pub categories: Vec<Category>,
    pub loading: bool,
    /// A create or delete is in flight.
    pub saving: bool,
    pub new_name: String,
}

impl CategoryPage {
    pub fn loaded(&mut self, mut categories: Vec<Category>) {
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        self.categories = categories;
    }

    /// Trimmed name for a new category, or why it can't be created.
    pub fn new_category(&self) -> Result<String, String> {
        if self.saving {
            return Err("Please wait for the previous change to finish".into());
        }
        let name = self.new_name.trim();
        if name.is_empty() {
            return Err("Category name is required".into());
        }
        if self.categories.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            return Err(format!("Category \"{}\" already exists", name));
        }
        Ok(name.to_string())
    }

    pub fn can_delete(&self, id: CategoryId) -> bool {
        !self.saving && self.categories.iter().any(|c| c.id == id && c.can_delete())
    }

    pub fn view(&self) -> Node<Msg> {
        div([class(CARD)], [
            h2([class("text-2xl font-bold text-ctp-text mb-6")], [text("Categories")]),
            div([class("flex gap-3 mb-6")], [
                input([
                    r#type("text"),
                    placeholder("New category name"),
                    value(&self.new_name),
                    on_input(|event| Msg::SetNewCategory(event.value())),
                    class(INPUT_CLASS),
                ], []),
                button([
                    on_click(|_| Msg::CreateCategory),
                    disabled(self.saving || self.new_name.trim().is_empty()),
                    class(PRIMARY_BUTTON),
                ], [text("Add")]),
            ]),
            if self.loading {
                div([class("text-center py-10 text-ctp-subtext0 italic")], [text("Loading categories...")])
            } else if self.categories.is_empty() {
                p([class("text-center py-10 text-ctp-subtext0")], [text("No categories yet")])
            } else {
                ul(
                    [class("divide-y divide-ctp-surface1")],
                    self.categories.iter().map(|c| self.view_category(c)).collect::<Vec<_>>(),
                )
            },
        ])
    }

    fn view_category(&self, category: &Category) -> Node<Msg> {
        let id = category.id;
        let deletable = self.can_delete(id);
        li([key(id.to_string()), class("flex items-center justify-between py-3")], [
            div([], [
                span([class("text-ctp-text font-medium")], [text(&category.name)]),
                span([class("ml-3 text-sm text-ctp-subtext0")], [text(&match category.todo_count {
                    1 => "1 todo".to_string(),
                    n => format!("{} todos", n),
                })]),
            ]),
            button([
                on_click(move |_| Msg::DeleteCategory(id)),
                disabled(!deletable),
                class("px-3 py-1 rounded-md text-sm text-ctp-red hover:bg-ctp-surface1 disabled:opacity-40 disabled:cursor-not-allowed"),
            ], [text(if category.can_delete() { "Delete" } else { "In use" })]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: CategoryId, name: &str, todo_count: u32) -> Category {
        Category { id, name: name.into(), todo_count }
    }

    fn page() -> CategoryPage {
        let mut page = CategoryPage::default();
        page.loaded(vec![category(1, "work", 3), category(2, "Home", 0), category(3, "Errands", 1)]);
        page
    }

    #[test]
    fn categories_are_listed_by_name() {
        let names: Vec<_> = page().categories.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, ["Errands", "Home", "work"]);
    }

    #[test]
    fn new_category_is_validated() {
        let mut page = page();
        page.new_name = "  ".into();
        assert_eq!(page.new_category(), Err("Category name is required".to_string()));

        page.new_name = "WORK".into();
        assert!(page.new_category().is_err());

        page.new_name = " Shopping ".into();
        assert_eq!(page.new_category(), Ok("Shopping".to_string()));

        page.saving = true;
        assert!(page.new_category().is_err());
    }

    #[test]
    fn only_empty_categories_can_be_deleted() {
        let mut page = page();
        assert!(page.can_delete(2));
        assert!(!page.can_delete(1));
        assert!(!page.can_delete(42));

        page.saving = true;
        assert!(!page.can_delete(2));
    }
}
