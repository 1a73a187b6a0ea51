//! Entity types shared by the record store, query builder, and services.

pub mod application;
pub mod forms;
pub mod job;
pub mod user;

pub use application::{
    Application, ApplicationStatus, ApplicationView, JobSnapshot, NewApplication, Populated,
    UserSnapshot,
};
pub use forms::{NewQuestionnaire, NewTalent, Questionnaire, Talent};
pub use job::{Job, JobPatch, NewJob};
pub use user::{NewUser, Role, User};

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Identifier for a posted job.
    JobId
);
id_type!(
    /// Identifier for a platform user.
    UserId
);
id_type!(
    /// Identifier for a submitted application.
    ApplicationId
);
id_type!(
    /// Identifier for an intake form submission.
    FormId
);
