use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Gate;
use crate::models::{GymClass, Member, Reference, Resource, Searchable};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceType {
    #[default]
    Gym,
    Class,
    PersonalTraining,
}

impl AttendanceType {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceType::Gym => "Gym",
            AttendanceType::Class => "Class",
            AttendanceType::PersonalTraining => "Personal training",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub member: Reference<Member>,
    pub check_in_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attendance_type: AttendanceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_session: Option<Reference<GymClass>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Attendance {
    pub fn is_checked_out(&self) -> bool {
        self.check_out_time.is_some()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.check_out_time.map(|out| out - self.check_in_time)
    }

    pub fn member_name(&self) -> String {
        self.member
            .populated()
            .map(Member::full_name)
            .unwrap_or_else(|| "Unknown member".to_string())
    }
}

impl Resource for Attendance {
    const PATH: &'static str = "attendance";
    const NAME: &'static str = "Attendance record";
    const GATE: Gate = Gate::Managers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for Attendance {
    fn search_fields(&self) -> Vec<&str> {
        match self.member.populated() {
            Some(member) => member.search_fields(),
            None => Vec::new(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.member
            .populated()
            .is_some_and(|member| member.matches(needle))
    }
}

/// Body sent when creating or updating an attendance record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePayload {
    pub member: String,
    pub check_in_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub attendance_type: AttendanceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_populated_member() {
        let json = r#"{
            "_id": "a1",
            "member": {"_id": "m1", "firstName": "Jane", "lastName": "Doe", "email": "jane@example.com", "phone": "555-0100"},
            "checkInTime": "2025-03-01T08:00:00Z",
            "checkOutTime": "2025-03-01T09:30:00Z",
            "attendanceType": "class",
            "classSession": "c1"
        }"#;
        let record: Attendance = serde_json::from_str(json).unwrap();
        assert_eq!(record.member.id(), Some("m1"));
        assert_eq!(record.attendance_type, AttendanceType::Class);
        assert_eq!(record.duration(), Some(Duration::minutes(90)));
        assert!(record.matches("555-01"));
        assert!(record.matches("jane@"));
    }

    #[test]
    fn test_unpopulated_member_never_matches() {
        let json = r#"{"member":"m1","checkInTime":"2025-03-01T08:00:00Z"}"#;
        let record: Attendance = serde_json::from_str(json).unwrap();
        assert_eq!(record.attendance_type, AttendanceType::Gym);
        assert!(!record.is_checked_out());
        assert!(!record.matches("m1"));
        assert_eq!(record.member_name(), "Unknown member");
    }
}
