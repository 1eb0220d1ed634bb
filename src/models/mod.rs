//! Transient client copies of the backend's REST resources.
//!
//! Field names follow the backend's camelCase JSON; ids arrive as `_id`.

pub mod attendance;
pub mod billing;
pub mod class;
pub mod gym;
pub mod member;
pub mod setting;
pub mod staff;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::Gate;

pub use attendance::{Attendance, AttendanceType};
pub use billing::{Membership, Payment, PaymentStatus};
pub use class::{Difficulty, GymClass};
pub use gym::Gym;
pub use member::{Member, MemberStatus};
pub use setting::{Setting, SettingCategory, SettingType, SettingValue};
pub use staff::{
    Address, Certification, DayOfWeek, EmergencyContact, PayFrequency, Salary, ScheduleEntry,
    Staff,
};

/// A REST collection under `/api/<PATH>`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path segment, e.g. `classes`.
    const PATH: &'static str;
    /// Human-readable singular name used in alerts.
    const NAME: &'static str;
    /// Which roles may mutate the collection.
    const GATE: Gate;
    /// Roles allowed to see the collection at all. `None` means every logged-in role.
    const LIST_GATE: Option<Gate> = None;

    fn id(&self) -> Option<&str>;
}

/// Free-text search support for list filtering.
pub trait Searchable {
    /// Fields the search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over [`Searchable::search_fields`].
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A reference to another resource, either as a bare id or populated by the backend.
/// `Missing` is a `null` left behind when the referenced record was deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(String),
    Populated(Box<T>),
    Missing,
}

impl<T> Default for Reference<T> {
    fn default() -> Self {
        Reference::Missing
    }
}

impl<T: Resource> Reference<T> {
    pub fn id(&self) -> Option<&str> {
        match self {
            Reference::Id(id) => Some(id),
            Reference::Populated(inner) => inner.id(),
            Reference::Missing => None,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Reference::Id(_) | Reference::Missing => None,
            Reference::Populated(inner) => Some(&**inner),
        }
    }
}

impl<T> From<String> for Reference<T> {
    fn from(id: String) -> Self {
        Reference::Id(id)
    }
}

pub(crate) fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}
