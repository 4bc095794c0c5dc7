//! Actor records and the gender enumeration

use std::fmt;

/// Gender as extracted from a description
///
/// A closed enumeration. Anything the extractor cannot map to one of
/// these variants is treated as unknown (`None` at the field level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Any other stated gender
    Other,
}

impl Gender {
    /// Canonical lowercase string used in prompts, storage, and the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse a canonical string; unknown values yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }

    /// All variants in declaration order
    pub fn values() -> [Gender; 3] {
        [Gender::Male, Gender::Female, Gender::Other]
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured actor record produced by the extraction pipeline,
/// not yet persisted (no id, no owner)
///
/// The three string fields are mandatory: the parser rejects model
/// output that leaves any of them empty. Everything else is optional
/// and passes through as extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorDraft {
    /// Extracted first name, non-empty
    pub first_name: String,

    /// Extracted last name, non-empty
    pub last_name: String,

    /// Extracted address, non-empty
    pub address: String,

    /// Extracted gender, if stated
    pub gender: Option<Gender>,

    /// Height in whole units, if stated
    pub height: Option<u32>,

    /// Weight in whole units, if stated
    pub weight: Option<u32>,

    /// Age in years, if stated
    pub age: Option<u32>,

    /// The original free-text description this draft was extracted from
    pub description: String,
}

/// A stored actor record owned by a user account
///
/// Created once by the store pipeline after successful extraction,
/// never updated. The pair `(user_id, description)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Row identifier
    pub id: i64,

    /// Owning user identifier
    pub user_id: i64,

    /// Extracted first name
    pub first_name: String,

    /// Extracted last name
    pub last_name: String,

    /// Extracted address
    pub address: String,

    /// Extracted gender, if stated
    pub gender: Option<Gender>,

    /// Height in whole units, if stated
    pub height: Option<u32>,

    /// Weight in whole units, if stated
    pub weight: Option<u32>,

    /// Age in years, if stated
    pub age: Option<u32>,

    /// Original submitted description
    pub description: String,

    /// Creation timestamp (Unix epoch seconds)
    pub created_at: u64,
}
