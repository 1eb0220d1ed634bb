//! Process-wide transient notifications.
//!
//! State changes only through [`AlertBus::dispatch`]; renderers observe it with
//! [`AlertBus::subscribe`]. Clones share the same state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    TopRight,
    TopCenter,
    BottomRight,
    BottomCenter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertState {
    pub alerts: Vec<Alert>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub enum AlertAction {
    Push(Alert),
    Dismiss(Uuid),
    Clear,
}

pub fn reduce(state: &mut AlertState, action: AlertAction) {
    match action {
        AlertAction::Push(alert) => state.alerts.push(alert),
        AlertAction::Dismiss(id) => state.alerts.retain(|alert| alert.id != id),
        AlertAction::Clear => state.alerts.clear(),
    }
}

#[derive(Clone, Debug)]
pub struct AlertBus {
    state: Arc<watch::Sender<AlertState>>,
    auto_hide: Option<Duration>,
}

impl AlertBus {
    pub fn new(auto_hide: Option<Duration>) -> Self {
        Self::with_position(auto_hide, Position::default())
    }

    pub fn with_position(auto_hide: Option<Duration>, position: Position) -> Self {
        let (tx, _rx) = watch::channel(AlertState {
            alerts: Vec::new(),
            position,
        });
        Self {
            state: Arc::new(tx),
            auto_hide,
        }
    }

    pub fn dispatch(&self, action: AlertAction) {
        self.state.send_modify(|state| reduce(state, action));
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AlertState {
        self.state.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state.borrow().alerts.clone()
    }

    /// Adds an alert and returns its id. Schedules auto-dismiss when running on a
    /// tokio runtime and an auto-hide delay is configured.
    pub fn push(&self, text: impl Into<String>, severity: Severity) -> Uuid {
        let alert = Alert {
            id: Uuid::new_v4(),
            text: text.into(),
            severity,
        };
        let id = alert.id;
        debug!(%id, ?severity, text = %alert.text, "alert");
        self.dispatch(AlertAction::Push(alert));

        if let (Some(delay), Ok(handle)) = (self.auto_hide, tokio::runtime::Handle::try_current()) {
            let bus = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                bus.dismiss(id);
            });
        }
        id
    }

    pub fn dismiss(&self, id: Uuid) {
        self.dispatch(AlertAction::Dismiss(id));
    }

    pub fn clear(&self) {
        self.dispatch(AlertAction::Clear);
    }

    pub fn success(&self, text: impl Into<String>) -> Uuid {
        self.push(text, Severity::Success)
    }

    pub fn info(&self, text: impl Into<String>) -> Uuid {
        self.push(text, Severity::Info)
    }

    pub fn warning(&self, text: impl Into<String>) -> Uuid {
        self.push(text, Severity::Warning)
    }

    pub fn error(&self, text: impl Into<String>) -> Uuid {
        self.push(text, Severity::Error)
    }

    /// Reports a failed operation once, using the backend's message when it sent one.
    pub fn report(&self, err: &ClientError) -> Uuid {
        self.error(err.user_message())
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new(None)
    }
}
