use std::sync::Arc;

use crate::domain::{NewQuestionnaire, NewTalent, Questionnaire, Talent};
use crate::store::FormStore;

use super::ServiceError;

/// Public intake-form submission. Listing and deletion live on the admin
/// service; submission requires no principal.
pub struct FormService {
    forms: Arc<dyn FormStore>,
}

impl FormService {
    pub fn new(forms: Arc<dyn FormStore>) -> Self {
        Self { forms }
    }

    pub fn submit_questionnaire(
        &self,
        new: NewQuestionnaire,
    ) -> Result<Questionnaire, ServiceError> {
        Ok(self.forms.insert_questionnaire(new)?)
    }

    pub fn submit_talent(&self, new: NewTalent) -> Result<Talent, ServiceError> {
        Ok(self.forms.insert_talent(new)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStores;

    fn talent(email: &str) -> NewTalent {
        NewTalent {
            email: email.to_string(),
            name: Some("Jane".to_string()),
            phone: None,
            profession: Some("Engineer".to_string()),
            experience: Some("3-5 years".to_string()),
            cv_url: "uploads/cv.pdf".to_string(),
        }
    }

    #[test]
    fn duplicate_talent_email_is_a_conflict() {
        let stores = MemoryStores::default();
        let service = FormService::new(stores.forms.clone());
        service.submit_talent(talent("jane@example.com")).expect("first");
        let err = service
            .submit_talent(talent("Jane@Example.com"))
            .expect_err("duplicate");
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
