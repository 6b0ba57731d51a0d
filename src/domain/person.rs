use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::validators::{age_on, validate_birth_date, validate_name, ADULT_AGE};

/// Age bracket derived from a person's age on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeStatus {
    Adult,
    Minor,
}

impl AgeStatus {
    pub const fn from_age(age: u32) -> Self {
        if age >= ADULT_AGE {
            Self::Adult
        } else {
            Self::Minor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Adult => "adult",
            Self::Minor => "minor",
        }
    }
}

/// Validated name and birth date shared by guardians and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalData {
    name: String,
    birth_date: NaiveDate,
}

impl PersonalData {
    /// Validates the name first, then the birth date.
    pub fn new(raw_name: &str, raw_birth_date: &str, today: NaiveDate) -> Result<Self, DomainError> {
        let name = validate_name(raw_name)?;
        let birth_date = validate_birth_date(raw_birth_date, today)?;
        Ok(Self { name, birth_date })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn age(&self, as_of: NaiveDate) -> u32 {
        age_on(self.birth_date, as_of)
    }
}

/// Capability shared by guardians and children.
pub trait Person {
    fn personal(&self) -> &PersonalData;

    /// Age bracket reported by this kind of person on `as_of`.
    fn age_status(&self, as_of: NaiveDate) -> AgeStatus;

    fn name(&self) -> &str {
        self.personal().name()
    }

    fn birth_date(&self) -> NaiveDate {
        self.personal().birth_date()
    }

    fn age(&self, as_of: NaiveDate) -> u32 {
        self.personal().age(as_of)
    }
}
