use serde::Serialize;

use crate::auth::{self, Controls};
use crate::error::{ClientError, FieldErrors};
use crate::form::{FormErrors, FormMode, Opened};
use crate::models::{Address, Gym, Resource};
use crate::screens::ScreenContext;
use crate::validation::Validator;

pub const LIST_ROUTE: &str = "/gyms";

#[derive(Debug, Clone, PartialEq)]
pub struct GymForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: Address,
    pub is_active: bool,
}

impl Default for GymForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            address: Address::default(),
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GymPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: Address,
    pub is_active: bool,
}

impl GymForm {
    pub fn from_record(gym: &Gym) -> Self {
        Self {
            name: gym.name.clone(),
            email: gym.email.clone(),
            phone: gym.phone.clone(),
            website: gym.website.clone().unwrap_or_default(),
            address: gym.address.clone(),
            is_active: gym.is_active,
        }
    }

    pub fn validate(&self) -> Result<GymPayload, FieldErrors> {
        let mut v = Validator::new();
        v.required("name", &self.name, "Gym name");
        v.email("email", &self.email);
        v.phone("phone", &self.phone);
        v.finish()?;

        let website = self.website.trim();
        Ok(GymPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            website: (!website.is_empty()).then(|| website.to_string()),
            address: self.address.clone(),
            is_active: self.is_active,
        })
    }
}

/// Gym management, available to superadmins only.
#[derive(Debug)]
pub struct GymDetailScreen {
    ctx: ScreenContext,
    mode: FormMode,
    pub form: GymForm,
    errors: FormErrors,
}

impl GymDetailScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            mode: FormMode::Create,
            form: GymForm::default(),
            errors: FormErrors::default(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn controls(&self) -> Controls {
        Controls {
            checkout: false,
            ..Controls::for_role(self.ctx.role, Gym::GATE)
        }
    }

    pub async fn open(&mut self, route: &str) -> Result<Opened, ClientError> {
        auth::require(Gym::GATE, self.ctx.role, "manage gyms").map_err(|err| self.ctx.fail(err))?;
        let Some(mode) = FormMode::from_route(route, LIST_ROUTE) else {
            return Ok(Opened::Redirect(LIST_ROUTE.to_string()));
        };
        self.mode = mode;
        self.errors.clear();

        let Some(id) = self.mode.id().map(str::to_string) else {
            self.form = GymForm::default();
            return Ok(Opened::Ready);
        };
        match self.ctx.api.get::<Gym>(&id).await {
            Ok(gym) => {
                self.form = GymForm::from_record(&gym);
                Ok(Opened::Ready)
            }
            Err(err) if err.is_not_found() => {
                self.ctx.alerts.error("Gym not found");
                Ok(Opened::Redirect(LIST_ROUTE.to_string()))
            }
            Err(err) => Err(self.ctx.fail(err)),
        }
    }

    pub async fn submit(&mut self) -> Result<Gym, ClientError> {
        if self.mode.is_read_only() {
            return Err(ClientError::Forbidden("This gym is read-only".into()));
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
            FormMode::Edit(id) => self.ctx.api.update::<Gym>(id, &payload).await,
            _ => self.ctx.api.create::<Gym>(&payload).await,
        };
        match result {
            Ok(saved) => {
                self.ctx.alerts.success(format!("Gym {} saved", saved.name));
                Ok(saved)
            }
            Err(err) => {
                self.errors.absorb(&err);
                Err(self.ctx.fail(err))
            }
        }
    }
}
