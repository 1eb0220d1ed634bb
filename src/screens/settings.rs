use crate::auth::{self, Gate};
use crate::error::ClientError;
use crate::models::{Setting, SettingCategory, SettingValue};
use crate::screens::ScreenContext;
use crate::theme::{SyncOutcome, ThemeSettings, ThemeStore};
use crate::validation::Validator;

/// Settings grouped by category, plus the appearance controls.
#[derive(Debug)]
pub struct SettingsScreen {
    ctx: ScreenContext,
    theme: ThemeStore,
    settings: Vec<Setting>,
}

impl SettingsScreen {
    pub fn new(ctx: ScreenContext, theme: ThemeStore) -> Self {
        Self {
            ctx,
            theme,
            settings: Vec::new(),
        }
    }

    pub fn can_edit(&self) -> bool {
        Gate::Managers.allows(self.ctx.role)
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.settings = self
            .ctx
            .api
            .settings(None)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        Ok(())
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Every category in display order, each with its settings (possibly none).
    pub fn grouped(&self) -> Vec<(SettingCategory, Vec<&Setting>)> {
        SettingCategory::ALL
            .into_iter()
            .map(|category| {
                let items = self
                    .settings
                    .iter()
                    .filter(|s| s.category == category)
                    .collect();
                (category, items)
            })
            .collect()
    }

    /// Parses `raw` according to the setting's type tag and saves it.
    pub async fn update(&mut self, key: &str, raw: &str) -> Result<SettingValue, ClientError> {
        auth::require(Gate::Managers, self.ctx.role, "change settings")
            .map_err(|err| self.ctx.fail(err))?;
        let Some(index) = self.settings.iter().position(|s| s.key == key) else {
            return Err(self.ctx.fail(ClientError::NotFound(format!("Unknown setting {key}"))));
        };
        let kind = self.settings[index].value.kind();
        let value = SettingValue::parse_input(kind, raw).map_err(|err| self.ctx.fail(err))?;

        self.ctx
            .api
            .update_setting(key, &value)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        if let Some(setting) = self.settings.get_mut(index) {
            setting.value = value.clone();
            self.ctx
                .alerts
                .success(format!("{} updated", setting.label));
        }
        Ok(value)
    }

    pub fn theme(&self) -> ThemeSettings {
        self.theme.current()
    }

    /// Flips light/dark at once; a failed backend sync only produces a warning.
    pub async fn toggle_dark_mode(&self) -> SyncOutcome {
        let outcome = self.theme.toggle_mode().await;
        if outcome == SyncOutcome::LocalOnly {
            self.ctx
                .alerts
                .warning("Theme saved on this device only; server sync failed");
        }
        outcome
    }

    pub async fn set_colors(&self, primary: &str, secondary: &str) -> Result<SyncOutcome, ClientError> {
        let mut v = Validator::new();
        v.hex_color("primaryColor", primary);
        v.hex_color("secondaryColor", secondary);
        v.finish()
            .map_err(|fields| self.ctx.fail(ClientError::Validation(fields)))?;

        let outcome = self
            .theme
            .set_colors(primary.trim().to_string(), secondary.trim().to_string())
            .await;
        if outcome == SyncOutcome::LocalOnly {
            self.ctx
                .alerts
                .warning("Colours saved on this device only; server sync failed");
        }
        Ok(outcome)
    }
}
