use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{LoginRequest, RegisterRequest};

use super::{error_banner, INPUT_CLASS, PRIMARY_BUTTON};
use crate::app::Msg;
use crate::route::Route;

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub submitting: bool,
    /// Validation problem found before anything was sent.
    pub error: Option<String>,
}

impl AuthForm {
    pub fn begin_submit(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    pub fn login_request(&self) -> Result<LoginRequest, String> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err("Please enter both username and password".into());
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }

    pub fn register_request(&self) -> Result<RegisterRequest, String> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err("All fields are required".into());
        }
        if !email.contains('@') {
            return Err("Please enter a valid email address".into());
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match".into());
        }
        Ok(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }

    pub fn view_login(&self, server_error: Option<&str>) -> Node<Msg> {
        self.view_card(
            "Welcome back",
            server_error,
            vec![
                self.field("text", "Username", &self.username, Msg::SetUsername),
                self.field("password", "Password", &self.password, Msg::SetPassword),
                button([
                    on_click(|_| Msg::SubmitLogin),
                    disabled(self.submitting),
                    class(&format!("w-full {}", PRIMARY_BUTTON)),
                ], [text(if self.submitting { "Signing in..." } else { "Sign in" })]),
                switch_link("Don't have an account?", "Register", Route::Register),
            ],
        )
    }

    pub fn view_register(&self, server_error: Option<&str>) -> Node<Msg> {
        self.view_card(
            "Create your account",
            server_error,
            vec![
                self.field("text", "Username", &self.username, Msg::SetUsername),
                self.field("email", "Email", &self.email, Msg::SetEmail),
                self.field("password", "Password", &self.password, Msg::SetPassword),
                self.field("password", "Confirm password", &self.confirm_password, Msg::SetConfirmPassword),
                button([
                    on_click(|_| Msg::SubmitRegister),
                    disabled(self.submitting),
                    class(&format!("w-full {}", PRIMARY_BUTTON)),
                ], [text(if self.submitting { "Creating account..." } else { "Register" })]),
                switch_link("Already have an account?", "Sign in", Route::Login),
            ],
        )
    }

    fn view_card(&self, heading: &str, server_error: Option<&str>, body: Vec<Node<Msg>>) -> Node<Msg> {
        let problem = self.error.as_deref().or(server_error);
        div([class("flex justify-center pt-16")], [
            div([class("w-full max-w-md bg-ctp-surface0 rounded-lg shadow-lg p-8 border border-ctp-surface1")], [
                h2([class("text-2xl font-bold text-ctp-text mb-6 text-center")], [text(heading)]),
                error_banner(problem),
                div([class("space-y-4")], body),
            ]),
        ])
    }

    fn field(&self, kind: &str, label_text: &str, current: &str, msg: fn(String) -> Msg) -> Node<Msg> {
        div([], [
            label([class("block text-sm font-medium text-ctp-subtext1 mb-1")], [text(label_text)]),
            input([
                r#type(kind.to_string()),
                placeholder(label_text.to_string()),
                value(current.to_string()),
                on_input(move |event| msg(event.value())),
                class(INPUT_CLASS),
            ], []),
        ])
    }
}

fn switch_link(prompt: &str, label_text: &str, route: Route) -> Node<Msg> {
    p([class("text-sm text-center text-ctp-subtext0")], [
        text(prompt),
        text(" "),
        a([
            href(route.to_path()),
            on_click(move |event| {
                event.prevent_default();
                Msg::NavigateTo(route)
            }),
            class("text-ctp-blue hover:underline"),
        ], [text(label_text)]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str, confirm: &str) -> AuthForm {
        AuthForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
            ..Default::default()
        }
    }

    #[test]
    fn login_needs_both_fields() {
        assert!(form("", "", "secret", "").login_request().is_err());
        assert!(form("alice", "", "", "").login_request().is_err());

        let request = form("  alice ", "", "secret", "").login_request().unwrap();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "secret");
    }

    #[test]
    fn register_checks_email_and_confirmation() {
        assert_eq!(
            form("bob", "bob.example.com", "pw", "pw").register_request().unwrap_err(),
            "Please enter a valid email address"
        );
        assert_eq!(
            form("bob", "bob@example.com", "pw", "pq").register_request().unwrap_err(),
            "Passwords do not match"
        );
        let request = form("bob", "bob@example.com", "pw", "pw").register_request().unwrap();
        assert_eq!(request.email, "bob@example.com");
    }

    #[test]
    fn submitting_clears_previous_problem() {
        let mut auth = form("alice", "", "", "");
        auth.error = auth.login_request().err();
        assert!(auth.error.is_some());

        auth.begin_submit();
        assert!(auth.submitting);
        assert_eq!(auth.error, None);
    }
}
