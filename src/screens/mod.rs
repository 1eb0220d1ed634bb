//! Screen controllers: fetch, filter/paginate, validate, mutate, re-fetch.
//!
//! Each controller is handed its collaborators through [`ScreenContext`]; none of
//! them reach for global state.

pub mod attendance;
pub mod classes;
pub mod gyms;
pub mod list;
pub mod member_search;
pub mod reports;
pub mod settings;
pub mod staff;

use std::sync::Arc;
use std::time::Duration;

use crate::alerts::AlertBus;
use crate::api::ApiClient;
use crate::auth::Role;
use crate::error::ClientError;

pub use attendance::{AttendanceDetailScreen, AttendanceForm, AttendanceListScreen};
pub use classes::{ClassDetailScreen, ClassForm};
pub use gyms::{GymDetailScreen, GymForm};
pub use list::ResourceListScreen;
pub use member_search::MemberSearch;
pub use reports::{ChartSeries, ReportKind, ReportsScreen};
pub use settings::SettingsScreen;
pub use staff::{StaffDetailScreen, StaffForm, StaffTab};

#[derive(Clone, Debug)]
pub struct ScreenContext {
    pub api: Arc<ApiClient>,
    pub alerts: AlertBus,
    pub role: Role,
    pub rows_per_page: usize,
    pub search_debounce: Duration,
}

impl ScreenContext {
    /// Reports `err` as an alert and hands it back for `?`.
    pub(crate) fn fail(&self, err: ClientError) -> ClientError {
        if !matches!(err, ClientError::Validation(_)) {
            self.alerts.report(&err);
        } else {
            self.alerts.warning(err.user_message());
        }
        err
    }
}
