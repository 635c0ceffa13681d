//! Registration records (multistep questionnaire).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegdashError, Result};

/// Progress of a registration through the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    InProgress,
    Completed,
}

impl RegistrationStatus {
    /// Status implied by the step a registrant has reached.
    pub fn for_step(current_step: u32, total_steps: u32) -> Self {
        if current_step >= total_steps {
            RegistrationStatus::Completed
        } else {
            RegistrationStatus::InProgress
        }
    }
}

/// Stored registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub status: RegistrationStatus,
    pub current_step: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

/// Form submission (also used for config seed rows).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRegistration {
    pub full_name: String,
    pub email: String,
    pub current_step: u32,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    /// Only honoured for seed data; submissions are stamped by the backend.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewRegistration {
    pub fn validate(&self, total_steps: u32) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(RegdashError::BadRequest("full_name must not be empty".into()));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(RegdashError::BadRequest(format!("invalid email: {email}")));
            }
        }
        if self.current_step == 0 || self.current_step > total_steps {
            return Err(RegdashError::BadRequest(format!(
                "current_step must be between 1 and {total_steps}"
            )));
        }
        Ok(())
    }
}
