use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::guardian::Guardian;
use super::ids::{ChildId, GuardianId};
use super::person::{AgeStatus, Person, PersonalData};
use super::sensory::SensoryProfile;
use super::validators::ADULT_AGE;

/// Categorical indicator of a child's care-support needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    Low,
    Moderate,
    High,
}

impl SupportLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Moderate, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Moderate => 2,
            Self::High => 3,
        }
    }
}

impl FromStr for SupportLevel {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "low" | "baixo" | "1" => Ok(Self::Low),
            "moderate" | "moderado" | "2" => Ok(Self::Moderate),
            "high" | "alto" | "3" => Ok(Self::High),
            _ => Err(DomainError::InvalidSupportLevel(value.trim().to_string())),
        }
    }
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw, unvalidated child fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildInput {
    pub name: String,
    pub birth_date: String,
    pub support_level: String,
    pub sensory_profile: Option<SensoryProfile>,
}

/// Minor linked to exactly one guardian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    id: ChildId,
    personal: PersonalData,
    guardian_id: GuardianId,
    support_level: SupportLevel,
    sensory_profile: Option<SensoryProfile>,
}

impl Child {
    /// Build a child for an existing guardian. The guardian's child list is not
    /// touched; link the result with [`Guardian::add_child`].
    pub fn new(
        id: ChildId,
        input: ChildInput,
        guardian: Option<&Guardian>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let guardian_id = guardian.map(|guardian| guardian.id().clone());
        let child = Self::build(id, input, guardian_id, today)?;
        let age = child.personal.age(today);
        if age >= ADULT_AGE {
            return Err(DomainError::ChildNotMinor { age });
        }
        Ok(child)
    }

    /// Rebuild a stored child without the construction-time minor rule.
    pub fn restore(
        id: ChildId,
        input: ChildInput,
        guardian_id: GuardianId,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let guardian_id = Some(guardian_id).filter(|id| !id.as_str().trim().is_empty());
        Self::build(id, input, guardian_id, today)
    }

    fn build(
        id: ChildId,
        input: ChildInput,
        guardian_id: Option<GuardianId>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let personal = PersonalData::new(&input.name, &input.birth_date, today)?;
        let guardian_id = guardian_id.ok_or(DomainError::MissingGuardian)?;
        let support_level = input.support_level.parse()?;

        Ok(Self {
            id,
            personal,
            guardian_id,
            support_level,
            sensory_profile: input.sensory_profile,
        })
    }

    pub fn id(&self) -> &ChildId {
        &self.id
    }

    pub fn guardian_id(&self) -> &GuardianId {
        &self.guardian_id
    }

    pub fn support_level(&self) -> SupportLevel {
        self.support_level
    }

    pub fn sensory_profile(&self) -> Option<&SensoryProfile> {
        self.sensory_profile.as_ref()
    }

    pub fn set_sensory_profile(&mut self, profile: Option<SensoryProfile>) {
        self.sensory_profile = profile;
    }

    pub fn update_support_level(&mut self, raw: &str) -> Result<(), DomainError> {
        self.support_level = raw.parse()?;
        Ok(())
    }

    /// Replace name and birth date, re-checking that the child is a minor.
    pub fn update_personal(
        &mut self,
        raw_name: &str,
        raw_birth_date: &str,
        today: NaiveDate,
    ) -> Result<(), DomainError> {
        let personal = PersonalData::new(raw_name, raw_birth_date, today)?;
        let age = personal.age(today);
        if age >= ADULT_AGE {
            return Err(DomainError::ChildNotMinor { age });
        }
        self.personal = personal;
        Ok(())
    }
}

impl Person for Child {
    fn personal(&self) -> &PersonalData {
        &self.personal
    }

    fn age_status(&self, as_of: NaiveDate) -> AgeStatus {
        AgeStatus::from_age(self.age(as_of))
    }
}
