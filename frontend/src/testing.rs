//! In-memory collaborators for native tests.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future;
use std::rc::Rc;
use url::Url;

use crate::api::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use crate::browser::{Browser, PoppedPath};
use crate::route::Route;
use crate::session::{SessionEvent, SessionObserver};

/// Replays queued replies in order and records every request it sees.
#[derive(Default)]
pub struct StubTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .push_back(Ok(HttpResponse { status, body: body.to_string() }));
    }

    pub fn reply_json(&self, status: u16, body: serde_json::Value) {
        self.reply(status, &body.to_string());
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no reply queued".into())))
    }
}

pub fn client(stub: &Rc<StubTransport>) -> ApiClient {
    ApiClient::new(Url::parse("http://api.test").unwrap(), stub.clone())
}

#[derive(Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<SessionEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    Pushed(Route),
    Replaced(Route),
}

/// Browser at a fixed path that records history writes and answers every
/// confirmation the same way.
pub struct RecordingBrowser {
    path: String,
    accept: Cell<bool>,
    history: RefCell<Vec<HistoryEntry>>,
}

impl RecordingBrowser {
    pub fn at(path: &str) -> Rc<Self> {
        Rc::new(Self {
            path: path.to_string(),
            accept: Cell::new(true),
            history: RefCell::new(Vec::new()),
        })
    }

    pub fn decline_confirmations(&self) {
        self.accept.set(false);
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.borrow().clone()
    }
}

impl Browser for RecordingBrowser {
    fn current_path(&self) -> Option<String> {
        Some(self.path.clone())
    }

    fn push(&self, route: Route) {
        self.history.borrow_mut().push(HistoryEntry::Pushed(route));
    }

    fn replace(&self, route: Route) {
        self.history.borrow_mut().push(HistoryEntry::Replaced(route));
    }

    fn confirm(&self, _message: &str) -> bool {
        self.accept.get()
    }

    fn next_pop(&self) -> PoppedPath {
        Box::pin(future::pending())
    }
}
