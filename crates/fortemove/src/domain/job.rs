use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JobId;

/// A posted job. "Deleting" a job only clears `active`; the record stays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub salary_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_cover: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Payload for creating a job. Salary must be present when it is visible.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    pub location: String,
    #[serde(default)]
    pub salary_visible: bool,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub image_cover: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial update applied by an admin; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_visible: Option<bool>,
    pub salary: Option<i64>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
}

impl Job {
    pub fn apply_patch(&mut self, patch: JobPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(requirements) = patch.requirements {
            self.requirements = requirements;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(salary_visible) = patch.salary_visible {
            self.salary_visible = salary_visible;
        }
        if let Some(salary) = patch.salary {
            self.salary = Some(salary);
        }
        if let Some(image_cover) = patch.image_cover {
            self.image_cover = Some(image_cover);
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
    }
}
