use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Gate;
use crate::models::{Member, Reference, Resource, Searchable};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Membership {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Months.
    pub duration: u32,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl Resource for Membership {
    const PATH: &'static str = "memberships";
    const NAME: &'static str = "Membership";
    const GATE: Gate = Gate::Managers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for Membership {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub member: Reference<Member>,
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Payment {
    const PATH: &'static str = "payments";
    const NAME: &'static str = "Payment";
    const GATE: Gate = Gate::Managers;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.payment_method.as_str()];
        if let Some(description) = &self.description {
            fields.push(description.as_str());
        }
        if let Some(member) = self.member.populated() {
            fields.extend(member.search_fields());
        }
        fields
    }
}
