use http::Method;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{Attendance, Resource};

impl ApiClient {
    /// `POST /api/attendance/checkout/:id` stamps the check-out time server-side.
    pub async fn checkout(&self, attendance_id: &str) -> Result<(), ClientError> {
        self.send_empty(
            Method::POST,
            &format!("{}/checkout/{attendance_id}", Attendance::PATH),
            None,
        )
        .await
    }
}
