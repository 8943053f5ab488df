//! Client records and the two list kinds a client can live in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Opaque client identifier (UUID v4 text for new clients).
pub type ClientId = String;

/// Which of a folder's lists a client belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    Active,
    Potential,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientKind::Active => "active",
            ClientKind::Potential => "potential",
        }
    }

    /// Section heading shown above the list.
    pub fn section_title(&self) -> &'static str {
        match self {
            ClientKind::Active => "Active Clients",
            ClientKind::Potential => "Potential Clients",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ClientKind::Active),
            "potential" => Ok(ClientKind::Potential),
            other => Err(StoreError::Validation(format!(
                "unknown client kind '{}' (expected 'active' or 'potential')",
                other
            ))),
        }
    }
}

/// A business contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub business_name: String,
    pub contact_details: String,
    pub problem_description: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
}

impl Client {
    /// Build a client from validated input with a fresh id and the current time.
    pub fn new(input: ValidClient) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            business_name: input.business_name,
            contact_details: input.contact_details,
            problem_description: input.problem_description,
            added_at: now_millis(),
        }
    }
}

/// Current time at the millisecond precision snapshots store.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Raw user input for a new client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    pub business_name: String,
    pub contact_details: String,
    pub problem_description: String,
}

/// Input that passed validation: all fields trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidClient {
    business_name: String,
    contact_details: String,
    problem_description: String,
}

impl NewClient {
    pub fn new(
        business_name: impl Into<String>,
        contact_details: impl Into<String>,
        problem_description: impl Into<String>,
    ) -> Self {
        Self {
            business_name: business_name.into(),
            contact_details: contact_details.into(),
            problem_description: problem_description.into(),
        }
    }

    /// Trim every field and reject the input if any is left empty.
    pub fn validate(&self) -> Result<ValidClient, StoreError> {
        let business_name = required(&self.business_name, "business name")?;
        let contact_details = required(&self.contact_details, "contact details")?;
        let problem_description = required(&self.problem_description, "problem description")?;
        Ok(ValidClient {
            business_name,
            contact_details,
            problem_description,
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
