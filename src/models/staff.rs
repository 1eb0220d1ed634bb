use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Gate;
use crate::models::{Resource, Searchable, full_name};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Address {
    pub fn one_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.zip_code, &self.country]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayFrequency {
    Hourly,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Annually,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Salary {
    pub amount: f64,
    pub currency: String,
    pub payment_frequency: PayFrequency,
}

impl Default for Salary {
    fn default() -> Self {
        Self {
            amount: 0.0,
            currency: "USD".to_string(),
            payment_frequency: PayFrequency::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Staff {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub specializations: Vec<String>,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
    pub salary: Salary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Default for Staff {
    fn default() -> Self {
        Self {
            id: None,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            position: String::new(),
            specializations: Vec::new(),
            address: Address::default(),
            emergency_contact: EmergencyContact::default(),
            salary: Salary::default(),
            hire_date: None,
            is_active: true,
        }
    }
}

impl Staff {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

impl Resource for Staff {
    const PATH: &'static str = "staff";
    const NAME: &'static str = "Staff member";
    const GATE: Gate = Gate::Managers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for Staff {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.position.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
}

impl Certification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < now)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Days since Monday.
    pub fn offset(self) -> i64 {
        self as i64
    }
}

/// One weekly shift, times as `HH:MM`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScheduleEntry {
    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()
    }

    pub fn end(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_defaults() {
        let staff: Staff = serde_json::from_str(
            r#"{"_id":"s1","firstName":"Ann","lastName":"Lee","position":"trainer","specializations":["yoga"]}"#,
        )
        .unwrap();
        assert_eq!(staff.salary.currency, "USD");
        assert_eq!(staff.address, Address::default());
        assert!(staff.matches("trainer"));
        assert!(staff.is_active);

        let inactive: Staff = serde_json::from_str(r#"{"isActive":false}"#).unwrap();
        assert!(!inactive.is_active);
    }

    #[test]
    fn test_address_one_line_skips_blanks() {
        let address = Address {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            country: "US".into(),
            ..Default::default()
        };
        assert_eq!(address.one_line(), "1 Main St, Springfield, US");
    }

    #[test]
    fn test_schedule_entry_times() {
        let entry = ScheduleEntry {
            day_of_week: DayOfWeek::Wednesday,
            start_time: "06:30".into(),
            end_time: "14:00".into(),
            notes: None,
        };
        assert_eq!(entry.start(), NaiveTime::from_hms_opt(6, 30, 0));
        assert_eq!(entry.end(), NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(DayOfWeek::Wednesday.offset(), 2);
    }
}
