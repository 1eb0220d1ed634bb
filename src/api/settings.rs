use http::Method;
use serde_json::json;

use crate::api::{ApiClient, Page, envelope};
use crate::error::ClientError;
use crate::models::{Setting, SettingCategory, SettingValue};

impl ApiClient {
    pub async fn settings(&self, category: Option<SettingCategory>) -> Result<Vec<Setting>, ClientError> {
        let query: Vec<(&str, String)> = category
            .map(|c| vec![("category", c.as_str().to_string())])
            .unwrap_or_default();
        let value = self.list_raw("settings", &query).await?;
        let page: Page<Setting> = envelope::normalize_list(value, "settings")?;
        Ok(page.items)
    }

    pub async fn update_setting(&self, key: &str, value: &SettingValue) -> Result<(), ClientError> {
        let body = json!({ "value": value.to_json() });
        self.send_empty(Method::PUT, &format!("settings/{key}"), Some(&body))
            .await
    }
}
