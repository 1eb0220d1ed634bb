pub mod alerts;
pub mod api;
pub mod auth;
pub mod debounce;
pub mod error;
pub mod form;
pub mod ical;
pub mod list_view;
pub mod models;
pub mod screens;
pub mod settings;
pub mod storage;
pub mod theme;
pub mod validation;

use std::sync::Arc;

use tracing::{info, warn};

use crate::alerts::AlertBus;
use crate::api::ApiClient;
use crate::auth::{Role, Session};
use crate::error::ClientError;
use crate::screens::ScreenContext;
use crate::settings::Settings;
use crate::storage::LocalStorage;
use crate::theme::ThemeStore;

/// Everything a front-end needs, wired once at start-up.
#[derive(Clone, Debug)]
pub struct App {
    pub settings: Settings,
    pub api: Arc<ApiClient>,
    pub alerts: AlertBus,
    pub storage: LocalStorage,
    pub theme: ThemeStore,
    pub session: Option<Session>,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, ClientError> {
        let api = Arc::new(ApiClient::new(
            settings.api_base_url.clone(),
            settings.request_timeout(),
        )?);
        let storage = LocalStorage::new(&settings.storage_dir);
        let theme = ThemeStore::new(api.clone(), storage.clone());
        Ok(Self {
            alerts: AlertBus::new(settings.alert_auto_hide()),
            settings,
            api,
            storage,
            theme,
            session: None,
        })
    }

    /// Role of the logged-in user; `staff` (no mutating controls) when logged out.
    pub fn role(&self) -> Role {
        self.session.as_ref().map(Session::role).unwrap_or_default()
    }

    pub fn context(&self) -> ScreenContext {
        ScreenContext {
            api: self.api.clone(),
            alerts: self.alerts.clone(),
            role: self.role(),
            rows_per_page: self.settings.rows_per_page,
            search_debounce: self.settings.search_debounce(),
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, ClientError> {
        match Session::login(&self.api, &self.storage, email, password).await {
            Ok(session) => Ok(&*self.session.insert(session)),
            Err(err) => {
                self.alerts.report(&err);
                Err(err)
            }
        }
    }

    pub async fn restore_session(&mut self) -> Result<Option<&Session>, ClientError> {
        self.session = Session::restore(&self.api, &self.storage).await?;
        Ok(self.session.as_ref())
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        match self.session.take() {
            Some(session) => session.logout(&self.api, &self.storage),
            None => Ok(()),
        }
    }
}

pub fn init_tracing(settings: &Settings) {
    let default_filter = if settings.debug { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .try_init();
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    init_tracing(&settings);

    let mut app = App::new(settings)?;
    info!(api = %app.settings.api_base_url, "starting gym console");

    match app.restore_session().await {
        Ok(Some(session)) => info!(user = %session.user.email, "session restored"),
        Ok(None) => info!("no stored session, login required"),
        Err(err) => warn!(error = %err, "could not restore session"),
    }

    let theme = app.theme.load().await;
    info!(mode = ?theme.mode, role = ?app.role(), "gym console ready");
    Ok(())
}
