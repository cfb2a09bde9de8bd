use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::session::{LogoutReason, SessionEvent, SessionObserver};

/// `log` sink writing to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from(format!("[{}] {}: {}", record.level(), record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Forwards session transitions to the `log` facade.
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::NoStoredToken => log::info!("no stored session"),
            SessionEvent::Restoring => log::debug!("checking stored session token"),
            SessionEvent::Restored { username } => log::info!("session restored for {}", username),
            SessionEvent::RestoreFailed { error } => log::warn!("stored session rejected: {}", error),
            SessionEvent::StaleRestoreIgnored => log::debug!("ignoring late session check"),
            SessionEvent::Authenticated { action, username } => {
                log::info!("{:?} succeeded for {}", action, username)
            }
            SessionEvent::AuthFailed { action, error } => log::warn!("{:?} failed: {}", action, error),
            SessionEvent::TokenNotPersisted { error } => {
                log::warn!("session token kept in memory only: {}", error)
            }
            SessionEvent::LoggedOut { reason: LogoutReason::Unauthorized } => {
                log::warn!("server rejected session token, logged out")
            }
            SessionEvent::LoggedOut { reason } => log::info!("logged out ({:?})", reason),
            SessionEvent::UserReplaced { username } => log::debug!("profile refreshed for {}", username),
        }
    }
}
