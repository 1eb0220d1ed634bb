use serde::{Deserialize, Serialize};

use crate::auth::Gate;
use crate::models::{Address, Resource, Searchable};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Gym {
    #[serde(rename = "_id", alias = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: Address,
    pub is_active: bool,
}

impl Resource for Gym {
    const PATH: &'static str = "gyms";
    const NAME: &'static str = "Gym";
    const GATE: Gate = Gate::SuperAdmin;
    const LIST_GATE: Option<Gate> = Some(Gate::SuperAdmin);

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Searchable for Gym {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.address.city.as_str(),
        ]
    }
}
