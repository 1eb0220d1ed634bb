use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::storage::{LocalStorage, TOKEN_KEY};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Which roles see the mutating controls of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// `admin` and `manager`.
    Managers,
    /// `superadmin` only.
    SuperAdmin,
}

impl Gate {
    pub fn allows(self, role: Role) -> bool {
        match self {
            Gate::Managers => matches!(role, Role::Admin | Role::Manager),
            Gate::SuperAdmin => role == Role::SuperAdmin,
        }
    }
}

/// Mutating controls a list or detail screen may show.
///
/// This is display gating only. The backend enforces permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
    pub checkout: bool,
}

impl Controls {
    pub fn for_role(role: Role, gate: Gate) -> Self {
        let allowed = gate.allows(role);
        Self {
            add: allowed,
            edit: allowed,
            delete: allowed,
            checkout: allowed,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.add || self.edit || self.delete || self.checkout
    }
}

/// Refuses a gated operation before it reaches the network.
pub fn require(gate: Gate, role: Role, action: &str) -> Result<(), ClientError> {
    if gate.allows(role) {
        Ok(())
    } else {
        Err(ClientError::Forbidden(format!(
            "You do not have permission to {action}"
        )))
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// The logged-in user plus the token persisted in local storage.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }

    pub async fn login(
        api: &ApiClient,
        storage: &LocalStorage,
        email: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let response: LoginResponse = api
            .post_json("auth/login", &LoginRequest { email, password })
            .await?;
        api.set_token(Some(response.token.clone()));

        let user: User = match api.get_json("auth").await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "login rejected, could not load user");
                api.set_token(None);
                return Err(err);
            }
        };
        if let Err(err) = storage.set(TOKEN_KEY, &response.token) {
            api.set_token(None);
            return Err(err);
        }
        info!(email = %user.email, role = ?user.role, "logged in");
        Ok(Self { user })
    }

    /// Re-attaches a stored token. Returns `None` when there is no usable token.
    pub async fn restore(api: &ApiClient, storage: &LocalStorage) -> Result<Option<Self>, ClientError> {
        let Some(token) = storage.get::<String>(TOKEN_KEY) else {
            return Ok(None);
        };
        api.set_token(Some(token));

        match api.get_json::<User>("auth").await {
            Ok(user) => Ok(Some(Self { user })),
            Err(ClientError::Unauthorized(msg)) => {
                warn!(%msg, "stored token rejected");
                api.set_token(None);
                storage.remove(TOKEN_KEY)?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn logout(self, api: &ApiClient, storage: &LocalStorage) -> Result<(), ClientError> {
        api.set_token(None);
        storage.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_managers() {
        assert!(Gate::Managers.allows(Role::Admin));
        assert!(Gate::Managers.allows(Role::Manager));
        assert!(!Gate::Managers.allows(Role::Staff));
        assert!(!Gate::Managers.allows(Role::SuperAdmin));
    }

    #[test]
    fn test_gate_super_admin() {
        assert!(Gate::SuperAdmin.allows(Role::SuperAdmin));
        assert!(!Gate::SuperAdmin.allows(Role::Admin));
    }

    #[test]
    fn test_controls_hidden_for_staff() {
        let controls = Controls::for_role(Role::Staff, Gate::Managers);
        assert!(!controls.any());
        assert_eq!(controls, Controls::none());
    }

    #[test]
    fn test_require() {
        assert!(require(Gate::Managers, Role::Manager, "delete classes").is_ok());
        let err = require(Gate::Managers, Role::Staff, "delete classes").unwrap_err();
        assert_eq!(err.user_message(), "You do not have permission to delete classes");
    }

    #[test]
    fn test_role_wire_names() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","name":"Root","email":"root@example.com","role":"superadmin"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
    }
}
