use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{ProfileUpdate, User};

use super::{CARD, INPUT_CLASS, PRIMARY_BUTTON};
use crate::app::Msg;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub saving: bool,
}

impl ProfileForm {
    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            full_name: user.and_then(|u| u.full_name.clone()).unwrap_or_default(),
            email: user.and_then(|u| u.email.clone()).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn update_request(&self) -> Result<ProfileUpdate, String> {
        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err("Please enter a valid email address".into());
        }

        let changing_password = !self.new_password.is_empty();
        if changing_password {
            if self.current_password.is_empty() {
                return Err("Current password is required to set a new password".into());
            }
            if self.new_password != self.confirm_password {
                return Err("New passwords do not match".into());
            }
        }

        Ok(ProfileUpdate {
            full_name: self.full_name.trim().to_string(),
            email: email.to_string(),
            current_password: changing_password.then(|| self.current_password.clone()),
            new_password: changing_password.then(|| self.new_password.clone()),
        })
    }

    /// Reloads the fields from the server's copy and forgets the passwords.
    pub fn saved(&mut self, user: &User) {
        *self = Self::for_user(Some(user));
    }

    pub fn view(&self, user: Option<&User>) -> Node<Msg> {
        let username = user.map(|u| u.username.as_str()).unwrap_or_default();
        div([class(&format!("max-w-2xl mx-auto {}", CARD))], [
            h2([class("text-2xl font-bold text-ctp-text mb-2")], [text("Profile")]),
            p([class("text-ctp-subtext0 mb-6")], [text(&format!("Signed in as {}", username))]),
            div([class("space-y-4")], [
                field("text", "Full name", &self.full_name, Msg::SetProfileFullName),
                field("email", "Email", &self.email, Msg::SetProfileEmail),
                h3([class("text-lg font-semibold text-ctp-text pt-4")], [text("Change password")]),
                field("password", "Current password", &self.current_password, Msg::SetCurrentPassword),
                field("password", "New password", &self.new_password, Msg::SetNewPassword),
                field("password", "Confirm new password", &self.confirm_password, Msg::SetConfirmNewPassword),
                button([
                    on_click(|_| Msg::SaveProfile),
                    disabled(self.saving),
                    class(PRIMARY_BUTTON),
                ], [text(if self.saving { "Saving..." } else { "Save changes" })]),
            ]),
        ])
    }
}

fn field(kind: &str, label_text: &str, current: &str, msg: fn(String) -> Msg) -> Node<Msg> {
    div([], [
        label([class("block text-sm font-medium text-ctp-subtext1 mb-1")], [text(label_text)]),
        input([
            r#type(kind.to_string()),
            value(current.to_string()),
            on_input(move |event| msg(event.value())),
            class(INPUT_CLASS),
        ], []),
    ])
}
