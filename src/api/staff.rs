//! Sub-resources attached to a staff record.

use http::Method;
use serde_json::json;

use crate::api::{ApiClient, Page, envelope};
use crate::error::ClientError;
use crate::models::{Certification, Resource, ScheduleEntry, Staff};

impl ApiClient {
    pub async fn certifications(&self, staff_id: &str) -> Result<Vec<Certification>, ClientError> {
        let path = format!("{}/{staff_id}/certifications", Staff::PATH);
        let value = self.list_raw(&path, &[]).await?;
        let page: Page<Certification> = envelope::normalize_list(value, "certifications")?;
        Ok(page.items)
    }

    pub async fn add_certification(
        &self,
        staff_id: &str,
        certification: &Certification,
    ) -> Result<Certification, ClientError> {
        self.post_json(
            &format!("{}/{staff_id}/certifications", Staff::PATH),
            certification,
        )
        .await
    }

    pub async fn remove_certification(
        &self,
        staff_id: &str,
        certification_id: &str,
    ) -> Result<(), ClientError> {
        self.send_empty(
            Method::DELETE,
            &format!("{}/{staff_id}/certifications/{certification_id}", Staff::PATH),
            None,
        )
        .await
    }

    pub async fn schedule(&self, staff_id: &str) -> Result<Vec<ScheduleEntry>, ClientError> {
        let path = format!("{}/{staff_id}/schedule", Staff::PATH);
        let value = self.list_raw(&path, &[]).await?;
        let page: Page<ScheduleEntry> = envelope::normalize_list(value, "schedule")?;
        Ok(page.items)
    }

    /// Replaces the whole weekly schedule.
    pub async fn replace_schedule(
        &self,
        staff_id: &str,
        entries: &[ScheduleEntry],
    ) -> Result<(), ClientError> {
        let body = json!({ "schedule": entries });
        self.send_empty(
            Method::PUT,
            &format!("{}/{staff_id}/schedule", Staff::PATH),
            Some(&body),
        )
        .await
    }
}
