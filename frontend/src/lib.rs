pub mod api;
pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pages;
pub mod route;
pub mod session;
pub mod token_store;

#[cfg(test)]
mod testing;

use sauron::prelude::*;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::app::Model;
use crate::browser::WindowBrowser;
use crate::config::ClientConfig;
use crate::fetch::FetchTransport;
use crate::logging::LogObserver;
use crate::token_store::{LocalStorageTokenStore, MemoryTokenStore, TokenStore};

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            console::error_1(&JsValue::from(format!("invalid client configuration: {}", e)));
            return;
        }
    };
    logging::init(config.log_level);
    log::info!("starting against {}", config.api_base_url);

    let store: Rc<dyn TokenStore> = match LocalStorageTokenStore::open(config.token_key.as_str()) {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::warn!("{}; sessions will not survive a reload", e);
            Rc::new(MemoryTokenStore::default())
        }
    };

    Program::mount_to_body(Model::new(
        &config,
        Rc::new(FetchTransport),
        store,
        Rc::new(LogObserver),
        Rc::new(WindowBrowser),
    ));
}
