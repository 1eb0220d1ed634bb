//! Staff detail: a three-tab form plus certifications and weekly schedule.

use chrono::NaiveDate;
use futures::try_join;
use tracing::info;

use crate::auth::{self, Controls};
use crate::error::{ClientError, FieldErrors};
use crate::form::{FormErrors, FormMode, Opened};
use crate::ical::ScheduleExporter;
use crate::models::{
    Address, Certification, EmergencyContact, PayFrequency, Resource, Salary, ScheduleEntry, Staff,
};
use crate::screens::ScreenContext;
use crate::validation::{Validator, parse_time};

pub const LIST_ROUTE: &str = "/staff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StaffTab {
    Personal,
    Employment,
    Contact,
}

impl StaffTab {
    pub const ALL: [StaffTab; 3] = [StaffTab::Personal, StaffTab::Employment, StaffTab::Contact];

    pub fn next(self) -> Option<Self> {
        match self {
            StaffTab::Personal => Some(StaffTab::Employment),
            StaffTab::Employment => Some(StaffTab::Contact),
            StaffTab::Contact => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            StaffTab::Personal => None,
            StaffTab::Employment => Some(StaffTab::Personal),
            StaffTab::Contact => Some(StaffTab::Employment),
        }
    }

    /// The tab that shows `field`.
    pub fn for_field(field: &str) -> Self {
        match field.split('.').next().unwrap_or(field) {
            "position" | "specializations" | "salary" | "hireDate" | "isActive" => {
                StaffTab::Employment
            }
            "address" | "emergencyContact" => StaffTab::Contact,
            _ => StaffTab::Personal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    /// Comma separated.
    pub specializations: String,
    pub hire_date: String,
    pub salary_amount: String,
    pub salary_currency: String,
    pub payment_frequency: PayFrequency,
    pub is_active: bool,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
}

impl Default for StaffForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            position: String::new(),
            specializations: String::new(),
            hire_date: String::new(),
            salary_amount: String::new(),
            salary_currency: "USD".to_string(),
            payment_frequency: PayFrequency::default(),
            is_active: true,
            address: Address::default(),
            emergency_contact: EmergencyContact::default(),
        }
    }
}

impl StaffForm {
    pub fn from_record(staff: &Staff) -> Self {
        Self {
            first_name: staff.first_name.clone(),
            last_name: staff.last_name.clone(),
            email: staff.email.clone(),
            phone: staff.phone.clone(),
            position: staff.position.clone(),
            specializations: staff.specializations.join(", "),
            hire_date: staff
                .hire_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            salary_amount: staff.salary.amount.to_string(),
            salary_currency: staff.salary.currency.clone(),
            payment_frequency: staff.salary.payment_frequency,
            is_active: staff.is_active,
            address: staff.address.clone(),
            emergency_contact: staff.emergency_contact.clone(),
        }
    }

    fn check_tab(&self, tab: StaffTab, v: &mut Validator) {
        match tab {
            StaffTab::Personal => {
                v.required("firstName", &self.first_name, "First name");
                v.required("lastName", &self.last_name, "Last name");
                v.email("email", &self.email);
                v.phone("phone", &self.phone);
            }
            StaffTab::Employment => {
                v.required("position", &self.position, "Position");
                v.non_negative_amount("salary.amount", &self.salary_amount, "Salary");
                v.optional_date("hireDate", &self.hire_date, "Hire date");
            }
            StaffTab::Contact => {
                let contact = &self.emergency_contact;
                if !contact.name.trim().is_empty() || !contact.phone.trim().is_empty() {
                    v.required("emergencyContact.name", &contact.name, "Contact name");
                    v.phone("emergencyContact.phone", &contact.phone);
                }
            }
        }
    }

    pub fn validate_tab(&self, tab: StaffTab) -> Result<(), FieldErrors> {
        let mut v = Validator::new();
        self.check_tab(tab, &mut v);
        v.finish()
    }

    pub fn validate(&self) -> Result<Staff, FieldErrors> {
        let mut v = Validator::new();
        for tab in StaffTab::ALL {
            self.check_tab(tab, &mut v);
        }
        let amount = v
            .non_negative_amount("salary.amount", &self.salary_amount, "Salary")
            .unwrap_or_default();
        let hire_date = v.optional_date("hireDate", &self.hire_date, "Hire date");
        v.finish()?;

        Ok(Staff {
            id: None,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            position: self.position.trim().to_string(),
            specializations: self
                .specializations
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            address: self.address.clone(),
            emergency_contact: self.emergency_contact.clone(),
            salary: Salary {
                amount,
                currency: self.salary_currency.trim().to_string(),
                payment_frequency: self.payment_frequency,
            },
            hire_date: hire_date.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|d| d.and_utc()),
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CertificationForm {
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub certificate_number: String,
}

impl CertificationForm {
    pub fn validate(&self) -> Result<Certification, FieldErrors> {
        let mut v = Validator::new();
        v.required("name", &self.name, "Certification name");
        v.required("issuingOrganization", &self.issuing_organization, "Issuing organization");
        let issued = v.date("issueDate", &self.issue_date, "Issue date");
        let expires = v.optional_date("expiryDate", &self.expiry_date, "Expiry date");
        if let (Some(issued), Some(expires)) = (issued, expires)
            && expires <= issued
        {
            v.error("expiryDate", "Expiry date must be after the issue date");
        }
        v.finish()?;

        let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        let number = self.certificate_number.trim();
        Ok(Certification {
            id: None,
            name: self.name.trim().to_string(),
            issuing_organization: self.issuing_organization.trim().to_string(),
            issue_date: issued.and_then(midnight).ok_or_else(FieldErrors::new)?,
            expiry_date: expires.and_then(midnight),
            certificate_number: (!number.is_empty()).then(|| number.to_string()),
        })
    }
}

/// Errors keyed `schedule.<index>` for entries that do not form a valid shift.
pub fn validate_schedule(entries: &[ScheduleEntry]) -> Result<(), FieldErrors> {
    let mut v = Validator::new();
    for (index, entry) in entries.iter().enumerate() {
        let field = format!("schedule.{index}");
        match (parse_time(&entry.start_time), parse_time(&entry.end_time)) {
            (Ok(start), Ok(end)) if end > start => {}
            (Ok(_), Ok(_)) => v.error(&field, "Shift must end after it starts"),
            _ => v.error(&field, "Shift times must look like HH:MM"),
        }
    }
    v.finish()
}

#[derive(Debug)]
pub struct StaffDetailScreen {
    ctx: ScreenContext,
    mode: FormMode,
    tab: StaffTab,
    pub form: StaffForm,
    errors: FormErrors,
    record: Option<Staff>,
    certifications: Vec<Certification>,
    schedule: Vec<ScheduleEntry>,
}

impl StaffDetailScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            mode: FormMode::Create,
            tab: StaffTab::Personal,
            form: StaffForm::default(),
            errors: FormErrors::default(),
            record: None,
            certifications: Vec::new(),
            schedule: Vec::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn tab(&self) -> StaffTab {
        self.tab
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn record(&self) -> Option<&Staff> {
        self.record.as_ref()
    }

    pub fn certifications(&self) -> &[Certification] {
        &self.certifications
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn controls(&self) -> Controls {
        Controls {
            checkout: false,
            ..Controls::for_role(self.ctx.role, Staff::GATE)
        }
    }

    fn staff_id(&self) -> Result<String, ClientError> {
        self.record
            .as_ref()
            .and_then(|staff| staff.id.clone())
            .ok_or_else(|| ClientError::NotFound("Save the staff member first".into()))
    }

    fn require_edit(&self, action: &str) -> Result<(), ClientError> {
        if self.mode.is_read_only() {
            return Err(self.ctx.fail(ClientError::Forbidden(format!(
                "Cannot {action} while viewing"
            ))));
        }
        auth::require(Staff::GATE, self.ctx.role, action).map_err(|err| self.ctx.fail(err))
    }

    pub async fn open(&mut self, route: &str) -> Result<Opened, ClientError> {
        let Some(mode) = FormMode::from_route(route, LIST_ROUTE) else {
            return Ok(Opened::Redirect(LIST_ROUTE.to_string()));
        };
        if !mode.is_read_only() {
            auth::require(Staff::GATE, self.ctx.role, "edit staff").map_err(|err| self.ctx.fail(err))?;
        }
        self.mode = mode;
        self.tab = StaffTab::Personal;
        self.errors.clear();

        let Some(id) = self.mode.id().map(str::to_string) else {
            self.form = StaffForm::default();
            self.record = None;
            self.certifications.clear();
            self.schedule.clear();
            return Ok(Opened::Ready);
        };

        let api = &self.ctx.api;
        let loaded = try_join!(api.get::<Staff>(&id), api.certifications(&id), api.schedule(&id));
        match loaded {
            Ok((staff, certifications, schedule)) => {
                self.form = StaffForm::from_record(&staff);
                self.record = Some(staff);
                self.certifications = certifications;
                self.schedule = schedule;
                Ok(Opened::Ready)
            }
            Err(err) if err.is_not_found() => {
                self.ctx.alerts.error("Staff member not found");
                Ok(Opened::Redirect(LIST_ROUTE.to_string()))
            }
            Err(err) => Err(self.ctx.fail(err)),
        }
    }

    /// Validates the current tab and moves forward when it is clean.
    pub fn next_tab(&mut self) -> Result<StaffTab, FieldErrors> {
        self.errors.clear();
        if let Err(fields) = self.form.validate_tab(self.tab) {
            self.errors.replace(fields.clone());
            return Err(fields);
        }
        if let Some(next) = self.tab.next() {
            self.tab = next;
        }
        Ok(self.tab)
    }

    pub fn previous_tab(&mut self) -> StaffTab {
        if let Some(previous) = self.tab.previous() {
            self.tab = previous;
        }
        self.tab
    }

    pub fn go_to_tab(&mut self, tab: StaffTab) {
        self.tab = tab;
    }

    pub async fn submit(&mut self) -> Result<Staff, ClientError> {
        if self.mode.is_read_only() {
            return Err(ClientError::Forbidden("This staff record is read-only".into()));
        }
        self.errors.clear();
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(fields) => {
                self.show_first_error_tab(&fields);
                self.errors.replace(fields.clone());
                return Err(ClientError::Validation(fields));
            }
        };

        let result = match &self.mode {
            FormMode::Edit(id) => self.ctx.api.update::<Staff>(id, &payload).await,
            _ => self.ctx.api.create::<Staff>(&payload).await,
        };
        match result {
            Ok(saved) => {
                let verb = if self.mode == FormMode::Create { "added" } else { "updated" };
                self.ctx
                    .alerts
                    .success(format!("Staff member {verb} successfully"));
                if self.mode == FormMode::Create
                    && let Some(id) = saved.id.clone()
                {
                    self.mode = FormMode::Edit(id);
                }
                self.record = Some(saved.clone());
                Ok(saved)
            }
            Err(err) => {
                if let ClientError::Validation(fields) = &err {
                    self.show_first_error_tab(fields);
                }
                self.errors.absorb(&err);
                Err(self.ctx.fail(err))
            }
        }
    }

    fn show_first_error_tab(&mut self, fields: &FieldErrors) {
        if let Some(tab) = fields.keys().map(|field| StaffTab::for_field(field)).min() {
            self.tab = tab;
        }
    }

    pub async fn add_certification(&mut self, form: &CertificationForm) -> Result<(), ClientError> {
        self.require_edit("add certifications")?;
        let id = self.staff_id().map_err(|err| self.ctx.fail(err))?;
        let certification = match form.validate() {
            Ok(certification) => certification,
            Err(fields) => {
                self.errors.replace(fields.clone());
                return Err(ClientError::Validation(fields));
            }
        };
        self.ctx
            .api
            .add_certification(&id, &certification)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        self.ctx.alerts.success("Certification added");
        self.reload_certifications(&id).await
    }

    pub async fn remove_certification(&mut self, certification_id: &str) -> Result<(), ClientError> {
        self.require_edit("remove certifications")?;
        let id = self.staff_id().map_err(|err| self.ctx.fail(err))?;
        self.ctx
            .api
            .remove_certification(&id, certification_id)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        self.ctx.alerts.success("Certification removed");
        self.reload_certifications(&id).await
    }

    async fn reload_certifications(&mut self, id: &str) -> Result<(), ClientError> {
        self.certifications = self
            .ctx
            .api
            .certifications(id)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        Ok(())
    }

    pub async fn save_schedule(&mut self, entries: Vec<ScheduleEntry>) -> Result<(), ClientError> {
        self.require_edit("change schedules")?;
        let id = self.staff_id().map_err(|err| self.ctx.fail(err))?;
        if let Err(fields) = validate_schedule(&entries) {
            self.errors.replace(fields.clone());
            return Err(ClientError::Validation(fields));
        }
        self.ctx
            .api
            .replace_schedule(&id, &entries)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        info!(staff = %id, shifts = entries.len(), "schedule saved");
        self.ctx.alerts.success("Schedule updated");
        self.schedule = self
            .ctx
            .api
            .schedule(&id)
            .await
            .map_err(|err| self.ctx.fail(err))?;
        Ok(())
    }

    /// The loaded weekly schedule as an iCalendar document for the week of `monday`.
    pub fn export_schedule(&self, monday: NaiveDate) -> Result<Vec<u8>, ClientError> {
        let staff = self
            .record
            .as_ref()
            .ok_or_else(|| ClientError::NotFound("No staff member loaded".into()))?;
        Ok(ScheduleExporter::new().generate(staff, &self.schedule, monday))
    }
}
