use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FormId;

/// Business intake questionnaire, unique per email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: FormId,
    pub email: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    pub company_industry: String,
    pub company_location: String,
    pub position_needed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<String>,
    pub work_model: String,
    pub employment_type: String,
}

/// Public submission payload for the business questionnaire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestionnaire {
    pub email: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    pub company_industry: String,
    pub company_location: String,
    pub position_needed: String,
    #[serde(default)]
    pub years_of_experience: Option<String>,
    pub work_model: String,
    pub employment_type: String,
}

/// Candidate talent-pool submission, unique per email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talent {
    pub id: FormId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    pub cv_url: String,
    pub created_at: DateTime<Utc>,
}

/// Public submission payload for the talent pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTalent {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    pub cv_url: String,
}
