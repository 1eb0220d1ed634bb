use chrono::{DateTime, Utc};
use tracing::info;

use crate::auth::{self, Controls};
use crate::error::{ClientError, FieldErrors};
use crate::form::{FormErrors, FormMode, Opened};
use crate::list_view::{ListView, Pagination};
use crate::models::attendance::AttendancePayload;
use crate::models::{Attendance, AttendanceType, GymClass, Member, Reference, Resource};
use crate::screens::{MemberSearch, ScreenContext};
use crate::validation::{Validator, compose_datetime, split_datetime};

pub const LIST_ROUTE: &str = "/attendance";

/// Server-paginated attendance list with check-out.
#[derive(Debug)]
pub struct AttendanceListScreen {
    ctx: ScreenContext,
    view: ListView<Attendance>,
}

impl AttendanceListScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        let view = ListView::new(Pagination::Server, ctx.rows_per_page);
        Self { ctx, view }
    }

    pub fn view(&self) -> &ListView<Attendance> {
        &self.view
    }

    pub fn controls(&self) -> Controls {
        Controls::for_role(self.ctx.role, Attendance::GATE)
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let page = self
            .ctx
            .api
            .list_page::<Attendance>(self.view.page(), self.view.rows_per_page(), None)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        self.view.set_items(page.items, page.total);
        Ok(())
    }

    /// Filters the fetched page by member name, email or phone.
    pub fn search(&mut self, term: impl Into<String>) {
        self.view.set_search(term);
    }

    pub async fn set_page(&mut self, page: usize) -> Result<(), ClientError> {
        self.view.set_page(page);
        self.load().await
    }

    pub async fn set_rows_per_page(&mut self, rows: usize) -> Result<(), ClientError> {
        self.view.set_rows_per_page(rows);
        self.load().await
    }

    pub async fn checkout(&mut self, id: &str) -> Result<(), ClientError> {
        auth::require(Attendance::GATE, self.ctx.role, "check members out")
            .map_err(|err| self.ctx.fail(err))?;
        self.ctx
            .api
            .checkout(id)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        info!(%id, "checked out");
        self.ctx.alerts.success("Member checked out successfully");
        self.load().await
    }

    pub fn request_delete(&mut self, id: &str) -> Result<(), ClientError> {
        auth::require(Attendance::GATE, self.ctx.role, "delete attendance records")
            .map_err(|err| self.ctx.fail(err))?;
        self.view.request_delete(id);
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.view.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) -> Result<bool, ClientError> {
        let Some(id) = self.view.confirm_delete() else {
            return Ok(false);
        };
        self.ctx
            .api
            .delete::<Attendance>(&id)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        self.ctx.alerts.success("Attendance record deleted successfully");
        self.load().await?;
        Ok(true)
    }
}

/// Editable attendance fields, kept as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceForm {
    pub member: String,
    pub check_in_date: String,
    pub check_in_time: String,
    pub check_out_date: String,
    pub check_out_time: String,
    pub attendance_type: AttendanceType,
    pub class_session: String,
    pub notes: String,
}

impl AttendanceForm {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        let mut form = Self::default();
        form.set_check_in(now);
        form
    }

    pub fn from_record(record: &Attendance) -> Self {
        let mut form = Self {
            member: record.member.id().unwrap_or_default().to_string(),
            attendance_type: record.attendance_type,
            class_session: record
                .class_session
                .as_ref()
                .and_then(Reference::id)
                .unwrap_or_default()
                .to_string(),
            notes: record.notes.clone().unwrap_or_default(),
            ..Self::default()
        };
        form.set_check_in(record.check_in_time);
        form.set_check_out(record.check_out_time);
        form
    }

    /// Single date-time input alternative to the split fields.
    pub fn set_check_in(&mut self, at: DateTime<Utc>) {
        (self.check_in_date, self.check_in_time) = split_datetime(at);
    }

    pub fn set_check_out(&mut self, at: Option<DateTime<Utc>>) {
        match at {
            Some(at) => (self.check_out_date, self.check_out_time) = split_datetime(at),
            None => {
                self.check_out_date.clear();
                self.check_out_time.clear();
            }
        }
    }

    pub fn validate(&self) -> Result<AttendancePayload, FieldErrors> {
        let mut v = Validator::new();
        v.required("member", &self.member, "Member");

        let check_in = match compose_datetime(&self.check_in_date, &self.check_in_time) {
            Ok(at) => Some(at),
            Err(msg) => {
                v.error("checkInTime", format!("Check-in time {msg}"));
                None
            }
        };

        let out_date = self.check_out_date.trim();
        let out_time = self.check_out_time.trim();
        let check_out = match (out_date.is_empty(), out_time.is_empty()) {
            (true, true) => None,
            (false, false) => match compose_datetime(out_date, out_time) {
                Ok(at) => Some(at),
                Err(msg) => {
                    v.error("checkOutTime", format!("Check-out time {msg}"));
                    None
                }
            },
            _ => {
                v.error("checkOutTime", "Check-out needs both a date and a time");
                None
            }
        };

        if let (Some(check_in), Some(check_out)) = (check_in, check_out)
            && check_out <= check_in
        {
            v.error("checkOutTime", "Check-out time must be after check-in time");
        }

        let class_session = self.class_session.trim();
        if self.attendance_type == AttendanceType::Class && class_session.is_empty() {
            v.error("classSession", "Class session is required for class attendance");
        }

        v.finish()?;
        let check_in_time = check_in.ok_or_else(FieldErrors::new)?;
        let notes = self.notes.trim();
        Ok(AttendancePayload {
            member: self.member.trim().to_string(),
            check_in_time,
            check_out_time: check_out,
            attendance_type: self.attendance_type,
            class_session: (self.attendance_type == AttendanceType::Class)
                .then(|| class_session.to_string()),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Create, edit or view one attendance record.
#[derive(Debug)]
pub struct AttendanceDetailScreen {
    ctx: ScreenContext,
    mode: FormMode,
    pub form: AttendanceForm,
    errors: FormErrors,
    classes: Vec<GymClass>,
    record: Option<Attendance>,
    members: MemberSearch,
}

impl AttendanceDetailScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        let members = MemberSearch::new(&ctx);
        Self {
            ctx,
            mode: FormMode::Create,
            form: AttendanceForm::starting_at(Utc::now()),
            errors: FormErrors::default(),
            classes: Vec::new(),
            record: None,
            members,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn record(&self) -> Option<&Attendance> {
        self.record.as_ref()
    }

    /// Active classes offered in the class-session picker.
    pub fn classes(&self) -> &[GymClass] {
        &self.classes
    }

    pub fn member_search(&self) -> &MemberSearch {
        &self.members
    }

    pub fn controls(&self) -> Controls {
        Controls::for_role(self.ctx.role, Attendance::GATE)
    }

    pub async fn open(&mut self, route: &str) -> Result<Opened, ClientError> {
        let Some(mode) = FormMode::from_route(route, LIST_ROUTE) else {
            return Ok(Opened::Redirect(LIST_ROUTE.to_string()));
        };
        if !mode.is_read_only() {
            auth::require(Attendance::GATE, self.ctx.role, "edit attendance records")
                .map_err(|err| self.ctx.fail(err))?;
        }
        self.mode = mode;
        self.errors.clear();
        self.load_classes().await;

        let Some(id) = self.mode.id().map(str::to_string) else {
            self.record = None;
            self.form = AttendanceForm::starting_at(Utc::now());
            return Ok(Opened::Ready);
        };

        match self.ctx.api.get::<Attendance>(&id).await {
            Ok(record) => {
                self.form = AttendanceForm::from_record(&record);
                self.record = Some(record);
                Ok(Opened::Ready)
            }
            Err(err) if err.is_not_found() => {
                self.ctx.alerts.error("Attendance record not found");
                Ok(Opened::Redirect(LIST_ROUTE.to_string()))
            }
            Err(err) => Err(self.ctx.fail(err)),
        }
    }

    async fn load_classes(&mut self) {
        match self
            .ctx
            .api
            .list_with::<GymClass>(&[("isActive", "true".to_string())])
            .await
        {
            Ok(page) => self.classes = page.items.into_iter().filter(|c| c.is_active).collect(),
            Err(err) => {
                self.ctx.alerts.report(&err);
                self.classes.clear();
            }
        }
    }

    pub fn search_members(&self, term: &str) {
        self.members.on_input(term);
    }

    pub fn select_member(&mut self, member: &Member) {
        self.form.member = member.id.clone().unwrap_or_default();
        self.errors.clear_field("member");
    }

    pub async fn submit(&mut self) -> Result<Attendance, ClientError> {
        if self.mode.is_read_only() {
            return Err(ClientError::Forbidden("This record is read-only".into()));
        }
        self.errors.clear();
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(fields) => {
                self.errors.replace(fields.clone());
                return Err(ClientError::Validation(fields));
            }
        };

        let result = match &self.mode {
            FormMode::Edit(id) => self.ctx.api.update::<Attendance>(id, &payload).await,
            _ => self.ctx.api.create::<Attendance>(&payload).await,
        };
        match result {
            Ok(saved) => {
                let verb = if self.mode == FormMode::Create { "created" } else { "updated" };
                self.ctx.alerts.success(format!("Attendance record {verb} successfully"));
                self.record = Some(saved.clone());
                Ok(saved)
            }
            Err(err) => {
                self.errors.absorb(&err);
                Err(self.ctx.fail(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn valid_form() -> AttendanceForm {
        AttendanceForm {
            member: "m1".into(),
            check_in_date: "2025-03-01".into(),
            check_in_time: "08:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_valid() {
        let payload = valid_form().validate().unwrap();
        assert_eq!(payload.member, "m1");
        assert_eq!(payload.check_in_time, Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
        assert_eq!(payload.check_out_time, None);
        assert_eq!(payload.class_session, None);
    }

    #[test]
    fn test_check_out_must_follow_check_in() {
        let mut form = valid_form();
        form.check_out_date = "2025-03-01".into();
        form.check_out_time = "07:59".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["checkOutTime"], "Check-out time must be after check-in time");

        form.check_out_time = "08:00".into();
        assert!(form.validate().unwrap_err().contains_key("checkOutTime"));

        form.check_out_time = "09:30".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_untouched_record_round_trips() {
        let record: Attendance = serde_json::from_str(
            r#"{"_id":"a1","member":"m1","checkInTime":"2025-03-01T08:00:10Z","checkOutTime":"2025-03-01T08:00:50Z"}"#,
        )
        .unwrap();
        let payload = AttendanceForm::from_record(&record).validate().unwrap();
        assert_eq!(payload.check_in_time, record.check_in_time);
        assert_eq!(payload.check_out_time, record.check_out_time);
    }

    #[test]
    fn test_half_filled_check_out() {
        let mut form = valid_form();
        form.check_out_date = "2025-03-01".into();
        assert!(form.validate().unwrap_err().contains_key("checkOutTime"));
    }

    #[test]
    fn test_class_requires_session() {
        let mut form = valid_form();
        form.attendance_type = AttendanceType::Class;
        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("classSession"));

        form.class_session = "c1".into();
        let payload = form.validate().unwrap();
        assert_eq!(payload.class_session.as_deref(), Some("c1"));
    }

    #[test]
    fn test_session_dropped_for_gym_visits() {
        let mut form = valid_form();
        form.class_session = "c1".into();
        assert_eq!(form.validate().unwrap().class_session, None);
    }

    #[test]
    fn test_missing_member_and_check_in() {
        let form = AttendanceForm::default();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["member"], "Member is required");
        assert_eq!(errors["checkInTime"], "Check-in time is required");
    }

    #[test]
    fn test_round_trip_from_record() {
        let record: Attendance = serde_json::from_str(
            r#"{"_id":"a1","member":"m1","checkInTime":"2025-03-01T08:00:00Z","checkOutTime":"2025-03-01T09:00:00Z","attendanceType":"class","classSession":{"_id":"c9","name":"Spin"}}"#,
        )
        .unwrap();
        let form = AttendanceForm::from_record(&record);
        assert_eq!(form.class_session, "c9");
        assert_eq!(form.check_out_time, "09:00");
        assert!(form.validate().is_ok());
    }
}
