use serde::{Deserialize, Serialize};

use super::UserId;

/// Roles recognized by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    BusinessOwner,
    Admin,
}

impl Role {
    /// Accepts the wire spellings used across the platform
    /// ("business owner", "business_owner", "business-owner").
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "candidate" => Some(Self::Candidate),
            "business_owner" => Some(Self::BusinessOwner),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::BusinessOwner => "business owner",
            Role::Admin => "admin",
        }
    }
}

/// A platform user. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

/// Payload for creating a user (signup, OAuth login, or import placeholder).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub google_id: Option<String>,
}

impl NewUser {
    /// Placeholder candidate synthesized while importing a spreadsheet row.
    /// The temporary password is not a usable credential.
    pub fn import_placeholder(name: Option<&str>, email: &str, phone: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or("Unknown Applicant").to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            password_hash: "tempPassword123".to_string(),
            role: Role::Candidate,
            google_id: None,
        }
    }
}
