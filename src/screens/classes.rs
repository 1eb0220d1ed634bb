use crate::auth::{self, Controls};
use crate::error::{ClientError, FieldErrors};
use crate::form::{FormErrors, FormMode, Opened};
use crate::models::class::ClassPayload;
use crate::models::{Difficulty, GymClass, Reference, Resource, Staff};
use crate::screens::ScreenContext;
use crate::validation::Validator;

pub const LIST_ROUTE: &str = "/classes";

#[derive(Debug, Clone, PartialEq)]
pub struct ClassForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub duration: String,
    pub capacity: String,
    pub instructor: String,
    pub difficulty: Difficulty,
    pub is_active: bool,
}

impl Default for ClassForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            duration: "60".to_string(),
            capacity: "20".to_string(),
            instructor: String::new(),
            difficulty: Difficulty::default(),
            is_active: true,
        }
    }
}

impl ClassForm {
    pub fn from_record(class: &GymClass) -> Self {
        Self {
            name: class.name.clone(),
            description: class.description.clone().unwrap_or_default(),
            category: class.category.clone(),
            duration: class.duration.to_string(),
            capacity: class.capacity.to_string(),
            instructor: class
                .instructor
                .as_ref()
                .and_then(Reference::id)
                .unwrap_or_default()
                .to_string(),
            difficulty: class.difficulty,
            is_active: class.is_active,
        }
    }

    pub fn validate(&self) -> Result<ClassPayload, FieldErrors> {
        let mut v = Validator::new();
        v.required("name", &self.name, "Class name");
        v.required("category", &self.category, "Category");
        v.required("instructor", &self.instructor, "Instructor");
        let duration = v.positive_int("duration", &self.duration, "Duration");
        let capacity = v.positive_int("capacity", &self.capacity, "Capacity");
        v.finish()?;

        let description = self.description.trim();
        Ok(ClassPayload {
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            category: self.category.trim().to_string(),
            duration: duration.unwrap_or_default(),
            capacity: capacity.unwrap_or_default(),
            instructor: self.instructor.trim().to_string(),
            difficulty: self.difficulty,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug)]
pub struct ClassDetailScreen {
    ctx: ScreenContext,
    mode: FormMode,
    pub form: ClassForm,
    errors: FormErrors,
    instructors: Vec<Staff>,
}

impl ClassDetailScreen {
    pub fn new(ctx: ScreenContext) -> Self {
        Self {
            ctx,
            mode: FormMode::Create,
            form: ClassForm::default(),
            errors: FormErrors::default(),
            instructors: Vec::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn instructors(&self) -> &[Staff] {
        &self.instructors
    }

    pub fn controls(&self) -> Controls {
        Controls {
            checkout: false,
            ..Controls::for_role(self.ctx.role, GymClass::GATE)
        }
    }

    pub async fn open(&mut self, route: &str) -> Result<Opened, ClientError> {
        let Some(mode) = FormMode::from_route(route, LIST_ROUTE) else {
            return Ok(Opened::Redirect(LIST_ROUTE.to_string()));
        };
        if !mode.is_read_only() {
            auth::require(GymClass::GATE, self.ctx.role, "edit classes")
                .map_err(|err| self.ctx.fail(err))?;
        }
        self.mode = mode;
        self.errors.clear();

        match self.ctx.api.list::<Staff>().await {
            Ok(page) => self.instructors = page.items,
            Err(err) => {
                self.ctx.alerts.report(&err);
                self.instructors.clear();
            }
        }

        let Some(id) = self.mode.id().map(str::to_string) else {
            self.form = ClassForm::default();
            return Ok(Opened::Ready);
        };
        match self.ctx.api.get::<GymClass>(&id).await {
            Ok(class) => {
                self.form = ClassForm::from_record(&class);
                Ok(Opened::Ready)
            }
            Err(err) if err.is_not_found() => {
                self.ctx.alerts.error("Class not found");
                Ok(Opened::Redirect(LIST_ROUTE.to_string()))
            }
            Err(err) => Err(self.ctx.fail(err)),
        }
    }

    pub async fn submit(&mut self) -> Result<GymClass, ClientError> {
        if self.mode.is_read_only() {
            return Err(ClientError::Forbidden("This class is read-only".into()));
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
            FormMode::Edit(id) => self.ctx.api.update::<GymClass>(id, &payload).await,
            _ => self.ctx.api.create::<GymClass>(&payload).await,
        };
        match result {
            Ok(saved) => {
                let verb = if self.mode == FormMode::Create { "created" } else { "updated" };
                self.ctx.alerts.success(format!("Class {verb} successfully"));
                Ok(saved)
            }
            Err(err) => {
                self.errors.absorb(&err);
                Err(self.ctx.fail(err))
            }
        }
    }
}
