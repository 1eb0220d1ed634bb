use serde::{Deserialize, Serialize};

use crate::auth::Gate;
use crate::models::{Reference, Resource, Searchable, Staff};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    AllLevels,
}

/// A class offered by the gym. Named `GymClass` to stay clear of the keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GymClass {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Reference<Staff>>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl GymClass {
    pub fn instructor_name(&self) -> Option<String> {
        self.instructor
            .as_ref()
            .and_then(Reference::populated)
            .map(Staff::full_name)
    }
}

impl Resource for GymClass {
    const PATH: &'static str = "classes";
    const NAME: &'static str = "Class";
    const GATE: Gate = Gate::Managers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for GymClass {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.category.as_str()];
        if let Some(staff) = self.instructor.as_ref().and_then(Reference::populated) {
            fields.push(staff.first_name.as_str());
            fields.push(staff.last_name.as_str());
        }
        fields
    }
}

/// Body sent when creating or updating a class.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub duration: u32,
    pub capacity: u32,
    pub instructor: String,
    pub difficulty: Difficulty,
    pub is_active: bool,
}
