use js_sys::Promise;
use std::future::Future;
use std::pin::Pin;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use crate::route::Route;

/// Resolves with the location path after a back/forward navigation, or
/// `None` when there is no window to listen on.
pub type PoppedPath = Pin<Box<dyn Future<Output = Option<String>>>>;

/// Window services the application uses besides rendering: the address
/// bar, session history and confirmation prompts.
pub trait Browser {
    fn current_path(&self) -> Option<String>;
    /// Adds a history entry for `route`.
    fn push(&self, route: Route);
    /// Rewrites the current history entry to `route`.
    fn replace(&self, route: Route);
    fn confirm(&self, message: &str) -> bool;
    fn next_pop(&self) -> PoppedPath;
}

pub struct WindowBrowser;

impl Browser for WindowBrowser {
    fn current_path(&self) -> Option<String> {
        window().and_then(|w| w.location().pathname().ok())
    }

    fn push(&self, route: Route) {
        if let Some(history) = window().and_then(|w| w.history().ok()) {
            if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(route.to_path())) {
                log::warn!("pushState to {} failed: {:?}", route.to_path(), e);
            }
        }
    }

    fn replace(&self, route: Route) {
        if let Some(history) = window().and_then(|w| w.history().ok()) {
            if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(route.to_path())) {
                log::warn!("replaceState to {} failed: {:?}", route.to_path(), e);
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn next_pop(&self) -> PoppedPath {
        Box::pin(async {
            let window = window()?;
            // Each wait installs its own handler; only one is ever pending.
            let popped = Promise::new(&mut |resolve, _reject| {
                window.set_onpopstate(Some(&resolve));
            });
            JsFuture::from(popped).await.ok()?;
            window.location().pathname().ok()
        })
    }
}
