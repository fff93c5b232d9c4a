use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored in place of an optional contact field left blank.
pub const NOT_PROVIDED: &str = "not provided";

/// Choices offered for "how did you hear about us".
pub const REFERRAL_SOURCES: [&str; 5] = ["friend", "social media", "advertisement", "in store", "other"];

/// Where the registration was submitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Hosted,
    Local,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Hosted => "hosted",
            Origin::Local => "local",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hosted" => Ok(Origin::Hosted),
            "local" => Ok(Origin::Local),
            other => Err(format!("unknown origin '{other}'")),
        }
    }
}

/// A stored registration. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub ticket_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub referral_source: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn pending(&self) -> PendingRegistration {
        PendingRegistration {
            registration_id: self.id,
            ticket_id: self.ticket_id.clone(),
        }
    }
}

/// Registration ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub ticket_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub referral_source: String,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
}

impl NewRegistration {
    /// Build from already-trimmed input, substituting `NOT_PROVIDED` for blank optionals.
    pub fn from_input(input: &RegistrationInput, origin: Origin, created_at: DateTime<Utc>) -> Self {
        Self {
            ticket_id: input.ticket_id.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: or_not_provided(&input.phone),
            referral_source: or_not_provided(&input.referral_source),
            origin,
            created_at,
        }
    }
}

fn or_not_provided(value: &str) -> String {
    if value.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        value.to_string()
    }
}

/// The reference handed from the registration page to the survey page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub registration_id: i64,
    pub ticket_id: String,
}

/// Raw registration fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegistrationInput {
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub referral_source: String,
}

impl RegistrationInput {
    pub fn trimmed(&self) -> Self {
        Self {
            ticket_id: self.ticket_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            referral_source: self.referral_source.trim().to_string(),
        }
    }
}
