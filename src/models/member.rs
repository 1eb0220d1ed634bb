use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Gate;
use crate::models::{Resource, Searchable, full_name};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Expired,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub status: MemberStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<DateTime<Utc>>,
}

impl Member {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

impl Resource for Member {
    const PATH: &'static str = "members";
    const NAME: &'static str = "Member";
    const GATE: Gate = Gate::Managers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for Member {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
        ]
    }

    fn matches(&self, needle: &str) -> bool {
        self.full_name().to_lowercase().contains(needle)
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}
