//! Light/dark mode and accent colours.
//!
//! The visible theme changes synchronously; local storage is written next and the
//! backend settings resource is synced best-effort afterwards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::{Setting, SettingCategory, SettingValue};
use crate::storage::{DARK_MODE_KEY, LocalStorage, PRIMARY_COLOR_KEY, SECONDARY_COLOR_KEY};

pub const THEME_MODE_SETTING: &str = "themeMode";
pub const DARK_MODE_SETTING: &str = "darkMode";
pub const PRIMARY_COLOR_SETTING: &str = "primaryColor";
pub const SECONDARY_COLOR_SETTING: &str = "secondaryColor";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Boolean(dark) => Some(if *dark { ThemeMode::Dark } else { ThemeMode::Light }),
            SettingValue::String(s) if s.eq_ignore_ascii_case("dark") => Some(ThemeMode::Dark),
            SettingValue::String(s) if s.eq_ignore_ascii_case("light") => Some(ThemeMode::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Light,
            primary_color: "#1976d2".to_string(),
            secondary_color: "#dc004e".to_string(),
        }
    }
}

/// Colours a renderer needs for the current mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub mode: ThemeMode,
    pub primary: String,
    pub secondary: String,
    pub background: &'static str,
    pub paper: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
}

impl ThemeSettings {
    pub fn palette(&self) -> Palette {
        let (background, paper, text_primary, text_secondary) = match self.mode {
            ThemeMode::Light => ("#f5f5f5", "#ffffff", "rgba(0, 0, 0, 0.87)", "rgba(0, 0, 0, 0.6)"),
            ThemeMode::Dark => ("#121212", "#1e1e1e", "#ffffff", "rgba(255, 255, 255, 0.7)"),
        };
        Palette {
            mode: self.mode,
            primary: self.primary_color.clone(),
            secondary: self.secondary_color.clone(),
            background,
            paper,
            text_primary,
            text_secondary,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ThemeAction {
    ToggleMode,
    SetMode(ThemeMode),
    SetColors { primary: String, secondary: String },
    Replace(ThemeSettings),
}

pub fn reduce(state: &mut ThemeSettings, action: ThemeAction) {
    match action {
        ThemeAction::ToggleMode => state.mode = state.mode.toggled(),
        ThemeAction::SetMode(mode) => state.mode = mode,
        ThemeAction::SetColors { primary, secondary } => {
            state.primary_color = primary;
            state.secondary_color = secondary;
        }
        ThemeAction::Replace(next) => *state = next,
    }
}

/// Whether a change reached the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced,
    LocalOnly,
}

#[derive(Clone, Debug)]
pub struct ThemeStore {
    state: Arc<watch::Sender<ThemeSettings>>,
    storage: LocalStorage,
    api: Arc<ApiClient>,
}

impl ThemeStore {
    pub fn new(api: Arc<ApiClient>, storage: LocalStorage) -> Self {
        let (tx, _rx) = watch::channel(ThemeSettings::default());
        Self {
            state: Arc::new(tx),
            storage,
            api,
        }
    }

    pub fn current(&self) -> ThemeSettings {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeSettings> {
        self.state.subscribe()
    }

    pub fn palette(&self) -> Palette {
        self.state.borrow().palette()
    }

    pub fn dispatch(&self, action: ThemeAction) {
        self.state.send_modify(|state| reduce(state, action));
    }

    fn read_local(&self) -> ThemeSettings {
        let defaults = ThemeSettings::default();
        let mode = match self.storage.get::<bool>(DARK_MODE_KEY) {
            Some(true) => ThemeMode::Dark,
            Some(false) | None => ThemeMode::Light,
        };
        ThemeSettings {
            mode,
            primary_color: self
                .storage
                .get(PRIMARY_COLOR_KEY)
                .unwrap_or(defaults.primary_color),
            secondary_color: self
                .storage
                .get(SECONDARY_COLOR_KEY)
                .unwrap_or(defaults.secondary_color),
        }
    }

    fn write_local(&self, settings: &ThemeSettings) {
        let result = self
            .storage
            .set(DARK_MODE_KEY, &settings.mode.is_dark())
            .and_then(|()| self.storage.set(PRIMARY_COLOR_KEY, &settings.primary_color))
            .and_then(|()| self.storage.set(SECONDARY_COLOR_KEY, &settings.secondary_color));
        if let Err(err) = result {
            warn!(error = %err, "failed to persist theme locally");
        }
    }

    /// Loads local storage first, then lets backend appearance settings override it.
    pub async fn load(&self) -> ThemeSettings {
        let mut settings = self.read_local();
        self.dispatch(ThemeAction::Replace(settings.clone()));

        match self.api.settings(Some(SettingCategory::Appearance)).await {
            Ok(remote) => {
                if apply_remote(&mut settings, &remote) {
                    debug!(mode = ?settings.mode, "theme overridden by backend settings");
                    self.dispatch(ThemeAction::Replace(settings.clone()));
                    self.write_local(&settings);
                }
            }
            Err(err) => warn!(error = %err, "using locally stored theme"),
        }
        settings
    }

    pub async fn toggle_mode(&self) -> SyncOutcome {
        self.dispatch(ThemeAction::ToggleMode);
        let settings = self.current();
        self.write_local(&settings);

        let value = SettingValue::Boolean(settings.mode.is_dark());
        self.sync(&[(DARK_MODE_SETTING, value)]).await
    }

    pub async fn set_mode(&self, mode: ThemeMode) -> SyncOutcome {
        self.dispatch(ThemeAction::SetMode(mode));
        self.write_local(&self.current());
        self.sync(&[(DARK_MODE_SETTING, SettingValue::Boolean(mode.is_dark()))])
            .await
    }

    pub async fn set_colors(&self, primary: String, secondary: String) -> SyncOutcome {
        self.dispatch(ThemeAction::SetColors {
            primary: primary.clone(),
            secondary: secondary.clone(),
        });
        self.write_local(&self.current());
        self.sync(&[
            (PRIMARY_COLOR_SETTING, SettingValue::String(primary)),
            (SECONDARY_COLOR_SETTING, SettingValue::String(secondary)),
        ])
        .await
    }

    async fn sync(&self, values: &[(&str, SettingValue)]) -> SyncOutcome {
        for (key, value) in values {
            if let Err(err) = self.api.update_setting(key, value).await {
                warn!(key, error = %err, "theme kept locally, backend sync failed");
                return SyncOutcome::LocalOnly;
            }
        }
        SyncOutcome::Synced
    }
}

/// Applies backend appearance settings. Returns whether anything matched.
///
/// `darkMode` is the key this store writes, so it wins over a legacy `themeMode`
/// whatever order the backend lists them in.
fn apply_remote(settings: &mut ThemeSettings, remote: &[Setting]) -> bool {
    let mut applied = false;
    let mode = [DARK_MODE_SETTING, THEME_MODE_SETTING].iter().find_map(|key| {
        remote
            .iter()
            .filter(|setting| setting.key == *key)
            .find_map(|setting| ThemeMode::from_setting(&setting.value))
    });
    if let Some(mode) = mode {
        settings.mode = mode;
        applied = true;
    }
    for setting in remote {
        match setting.key.as_str() {
            PRIMARY_COLOR_SETTING => {
                if let Some(color) = setting.value.as_str().filter(|c| !c.is_empty()) {
                    settings.primary_color = color.to_string();
                    applied = true;
                }
            }
            SECONDARY_COLOR_SETTING => {
                if let Some(color) = setting.value.as_str().filter(|c| !c.is_empty()) {
                    settings.secondary_color = color.to_string();
                    applied = true;
                }
            }
            _ => {}
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reducer_toggle() {
        let mut state = ThemeSettings::default();
        reduce(&mut state, ThemeAction::ToggleMode);
        assert_eq!(state.mode, ThemeMode::Dark);
        reduce(&mut state, ThemeAction::ToggleMode);
        assert_eq!(state.mode, ThemeMode::Light);
    }

    #[test]
    fn test_palette_follows_mode() {
        let mut state = ThemeSettings::default();
        assert_eq!(state.palette().background, "#f5f5f5");
        reduce(&mut state, ThemeAction::SetMode(ThemeMode::Dark));
        assert_eq!(state.palette().background, "#121212");
        assert_eq!(state.palette().primary, "#1976d2");
    }

    #[test]
    fn test_apply_remote() {
        let remote: Vec<Setting> = serde_json::from_value(json!([
            {"key": "themeMode", "value": "dark", "type": "string", "category": "appearance"},
            {"key": "primaryColor", "value": "#000000", "type": "string", "category": "appearance"},
            {"key": "fontSize", "value": 14, "type": "number", "category": "appearance"}
        ]))
        .unwrap();
        let mut settings = ThemeSettings::default();
        assert!(apply_remote(&mut settings, &remote));
        assert_eq!(settings.mode, ThemeMode::Dark);
        assert_eq!(settings.primary_color, "#000000");
        assert_eq!(settings.secondary_color, "#dc004e");
    }

    #[test]
    fn test_dark_mode_key_wins_over_theme_mode() {
        let remote: Vec<Setting> = serde_json::from_value(json!([
            {"key": "darkMode", "value": true, "type": "boolean", "category": "appearance"},
            {"key": "themeMode", "value": "light", "type": "string", "category": "appearance"}
        ]))
        .unwrap();
        let mut settings = ThemeSettings::default();
        assert!(apply_remote(&mut settings, &remote));
        assert_eq!(settings.mode, ThemeMode::Dark);

        let reversed: Vec<Setting> = remote.into_iter().rev().collect();
        let mut settings = ThemeSettings::default();
        apply_remote(&mut settings, &reversed);
        assert_eq!(settings.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_apply_remote_without_theme_keys() {
        let mut settings = ThemeSettings::default();
        assert!(!apply_remote(&mut settings, &[]));
        assert_eq!(settings, ThemeSettings::default());
    }
}
