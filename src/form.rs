//! Shared pieces of the detail/edit screens.

use crate::error::{ClientError, FieldErrors};

/// What a detail route asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
    View(String),
}

impl FormMode {
    /// Decodes `<base>/new`, `<base>/:id/edit` and `<base>/:id`.
    pub fn from_route(route: &str, base: &str) -> Option<Self> {
        let rest = route
            .trim_end_matches('/')
            .strip_prefix(base.trim_end_matches('/'))?
            .strip_prefix('/')?;
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["new"] => Some(FormMode::Create),
            [id, "edit"] => Some(FormMode::Edit((*id).to_string())),
            [id] => Some(FormMode::View((*id).to_string())),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) | FormMode::View(id) => Some(id),
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, FormMode::View(_))
    }
}

/// Result of opening a detail route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    Ready,
    /// The record is gone; navigate back to the parent list.
    Redirect(String),
}

/// Field errors currently displayed by a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    fields: FieldErrors,
}

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn all(&self) -> &FieldErrors {
        &self.fields
    }

    pub fn replace(&mut self, fields: FieldErrors) {
        self.fields = fields;
    }

    /// Server-side errors land in the same map as local ones, keyed by field.
    pub fn merge(&mut self, fields: FieldErrors) {
        self.fields.extend(fields);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// Merges validation errors out of a failed submit; other errors pass through untouched.
    pub fn absorb(&mut self, err: &ClientError) {
        if let ClientError::Validation(fields) = err {
            self.merge(fields.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_modes() {
        assert_eq!(FormMode::from_route("/attendance/new", "/attendance"), Some(FormMode::Create));
        assert_eq!(
            FormMode::from_route("/attendance/abc123/edit", "/attendance"),
            Some(FormMode::Edit("abc123".into()))
        );
        assert_eq!(
            FormMode::from_route("/attendance/abc123/", "/attendance"),
            Some(FormMode::View("abc123".into()))
        );
        assert_eq!(FormMode::from_route("/attendance", "/attendance"), None);
        assert_eq!(FormMode::from_route("/classes/new", "/attendance"), None);
        assert_eq!(FormMode::from_route("/attendance/a/b/c", "/attendance"), None);
    }

    #[test]
    fn test_read_only() {
        assert!(FormMode::View("1".into()).is_read_only());
        assert!(!FormMode::Edit("1".into()).is_read_only());
        assert_eq!(FormMode::Create.id(), None);
    }

    #[test]
    fn test_merge_server_errors() {
        let mut errors = FormErrors::default();
        errors.replace(FieldErrors::from([("notes".to_string(), "Too long".to_string())]));
        let server = ClientError::Validation(FieldErrors::from([(
            "member".to_string(),
            "Member does not exist".to_string(),
        )]));
        errors.absorb(&server);
        assert_eq!(errors.get("notes"), Some("Too long"));
        assert_eq!(errors.get("member"), Some("Member does not exist"));

        errors.absorb(&ClientError::NotFound("x".into()));
        assert_eq!(errors.all().len(), 2);
    }
}
