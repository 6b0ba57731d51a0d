use chrono::NaiveDate;

use super::child::Child;
use super::error::DomainError;
use super::ids::{ChildId, GuardianId};
use super::person::{AgeStatus, Person, PersonalData};
use super::policy::ValidationPolicy;
use super::validators::{non_blank, validate_email, validate_id_number, validate_phone, ADULT_AGE};

/// Raw, unvalidated guardian fields as typed by a user or read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardianInput {
    pub name: String,
    pub birth_date: String,
    pub email: String,
    pub phone: Option<String>,
    pub guardian_type: String,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub max_children: u32,
}

/// Adult responsible for a bounded set of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guardian {
    id: GuardianId,
    personal: PersonalData,
    email: String,
    phone: Option<String>,
    guardian_type: String,
    address: Option<String>,
    national_id: Option<String>,
    max_children: u32,
    children: Vec<ChildId>,
}

impl Guardian {
    /// Validate every field and require the guardian to be an adult on `today`.
    pub fn new(
        id: GuardianId,
        input: GuardianInput,
        policy: &ValidationPolicy,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let guardian = Self::build(id, input, policy, today)?;
        if policy.require_national_id() && guardian.national_id.is_none() {
            return Err(DomainError::InvalidId);
        }
        let age = guardian.personal.age(today);
        if age < ADULT_AGE {
            return Err(DomainError::GuardianTooYoung { age });
        }
        Ok(guardian)
    }

    /// Rebuild a stored guardian. Field formats, capacity and the uniqueness of
    /// the child list are checked. The construction-time adulthood and
    /// mandatory national id rules are not.
    pub fn restore(
        id: GuardianId,
        input: GuardianInput,
        children: Vec<ChildId>,
        policy: &ValidationPolicy,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let mut guardian = Self::build(id, input, policy, today)?;
        if children.len() > guardian.max_children as usize {
            return Err(DomainError::CapacityExceeded {
                max: guardian.max_children,
            });
        }
        for (index, child_id) in children.iter().enumerate() {
            if children[..index].contains(child_id) {
                return Err(DomainError::DuplicateChild(child_id.clone()));
            }
        }
        guardian.children = children;
        Ok(guardian)
    }

    fn build(
        id: GuardianId,
        input: GuardianInput,
        policy: &ValidationPolicy,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let personal = PersonalData::new(&input.name, &input.birth_date, today)?;
        let email = validate_email(&input.email)?;
        let phone = validate_optional_phone(input.phone, policy)?;
        let national_id = non_blank(input.national_id)
            .map(|raw| validate_id_number(&raw))
            .transpose()?;

        Ok(Self {
            id,
            personal,
            email,
            phone,
            guardian_type: input.guardian_type.trim().to_string(),
            address: non_blank(input.address),
            national_id,
            max_children: input.max_children,
            children: Vec::new(),
        })
    }

    pub fn id(&self) -> &GuardianId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn guardian_type(&self) -> &str {
        &self.guardian_type
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn national_id(&self) -> Option<&str> {
        self.national_id.as_deref()
    }

    pub fn max_children(&self) -> u32 {
        self.max_children
    }

    pub fn children(&self) -> &[ChildId] {
        &self.children
    }

    pub fn has_capacity(&self) -> bool {
        self.children.len() < self.max_children as usize
    }

    /// Link a child created for this guardian, preserving the order of addition.
    pub fn add_child(&mut self, child: &Child) -> Result<(), DomainError> {
        if child.guardian_id() != &self.id {
            return Err(DomainError::GuardianMismatch {
                expected: self.id.clone(),
                found: child.guardian_id().clone(),
            });
        }
        if self.children.contains(child.id()) {
            return Err(DomainError::DuplicateChild(child.id().clone()));
        }
        if !self.has_capacity() {
            return Err(DomainError::CapacityExceeded {
                max: self.max_children,
            });
        }

        self.children.push(child.id().clone());
        Ok(())
    }

    pub fn remove_child_by_id(&mut self, child_id: &ChildId) -> Result<(), DomainError> {
        let position = self
            .children
            .iter()
            .position(|id| id == child_id)
            .ok_or_else(|| DomainError::ChildNotFound(child_id.clone()))?;
        self.children.remove(position);
        Ok(())
    }

    /// Replace name and birth date, re-checking adulthood.
    pub fn update_personal(
        &mut self,
        raw_name: &str,
        raw_birth_date: &str,
        today: NaiveDate,
    ) -> Result<(), DomainError> {
        let personal = PersonalData::new(raw_name, raw_birth_date, today)?;
        let age = personal.age(today);
        if age < ADULT_AGE {
            return Err(DomainError::GuardianTooYoung { age });
        }
        self.personal = personal;
        Ok(())
    }

    pub fn update_contact(
        &mut self,
        raw_email: &str,
        raw_phone: Option<String>,
        policy: &ValidationPolicy,
    ) -> Result<(), DomainError> {
        let email = validate_email(raw_email)?;
        let phone = validate_optional_phone(raw_phone, policy)?;
        self.email = email;
        self.phone = phone;
        Ok(())
    }

    pub fn update_address(&mut self, address: Option<String>) {
        self.address = non_blank(address);
    }
}

impl Person for Guardian {
    fn personal(&self) -> &PersonalData {
        &self.personal
    }

    fn age_status(&self, as_of: NaiveDate) -> AgeStatus {
        AgeStatus::from_age(self.age(as_of))
    }
}

fn validate_optional_phone(
    raw: Option<String>,
    policy: &ValidationPolicy,
) -> Result<Option<String>, DomainError> {
    non_blank(raw)
        .map(|phone| validate_phone(&phone, policy.phone_max_digits()))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::child::ChildInput;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    fn maria_input() -> GuardianInput {
        GuardianInput {
            name: "Maria Silva".to_string(),
            birth_date: "01/01/1980".to_string(),
            email: "maria@example.com".to_string(),
            max_children: 2,
            ..GuardianInput::default()
        }
    }

    fn maria() -> Guardian {
        Guardian::new(
            GuardianId::new("g-1"),
            maria_input(),
            &ValidationPolicy::default(),
            today(),
        )
        .expect("maria is valid")
    }

    fn child_of(guardian: &Guardian, id: &str) -> Child {
        Child::new(
            ChildId::new(id),
            ChildInput {
                name: "Ana Souza".to_string(),
                birth_date: "10/07/2015".to_string(),
                support_level: "moderate".to_string(),
                sensory_profile: None,
            },
            Some(guardian),
            today(),
        )
        .expect("child is valid")
    }

    #[test]
    fn adult_guardian_is_constructed() {
        let guardian = maria();
        assert_eq!(guardian.name(), "Maria Silva");
        assert_eq!(guardian.age_status(today()), AgeStatus::Adult);
        assert!(guardian.children().is_empty());
    }

    #[test]
    fn underage_guardian_is_rejected() {
        let mut input = maria_input();
        input.name = "Pedro Júnior".to_string();
        input.birth_date = "01/01/2010".to_string();
        let result = Guardian::new(
            GuardianId::new("g-2"),
            input,
            &ValidationPolicy::default(),
            today(),
        );
        assert_eq!(result, Err(DomainError::GuardianTooYoung { age: 15 }));
    }

    #[test]
    fn first_failing_field_wins() {
        let mut input = maria_input();
        input.email = "broken".to_string();
        input.phone = Some("12-34".to_string());
        let result = Guardian::new(
            GuardianId::new("g-3"),
            input,
            &ValidationPolicy::default(),
            today(),
        );
        assert_eq!(result, Err(DomainError::InvalidEmail));
    }

    #[test]
    fn national_id_required_by_policy() {
        let policy = ValidationPolicy::new(9, true);
        let result = Guardian::new(GuardianId::new("g-4"), maria_input(), &policy, today());
        assert_eq!(result, Err(DomainError::InvalidId));

        let mut input = maria_input();
        input.national_id = Some("11122233344".to_string());
        let guardian =
            Guardian::new(GuardianId::new("g-4"), input, &policy, today()).expect("valid id");
        assert_eq!(guardian.national_id(), Some("11122233344"));
    }

    #[test]
    fn restore_skips_national_id_requirement_but_not_duplicates() {
        let policy = ValidationPolicy::new(9, true);
        let guardian = Guardian::restore(
            GuardianId::new("g-5"),
            maria_input(),
            vec![ChildId::new("c-1")],
            &policy,
            today(),
        )
        .expect("stored guardian loads");
        assert_eq!(guardian.national_id(), None);

        let result = Guardian::restore(
            GuardianId::new("g-5"),
            maria_input(),
            vec![ChildId::new("c-1"), ChildId::new("c-1")],
            &policy,
            today(),
        );
        assert_eq!(result, Err(DomainError::DuplicateChild(ChildId::new("c-1"))));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut guardian = maria();
        guardian
            .add_child(&child_of(&guardian.clone(), "c-1"))
            .expect("first child fits");
        guardian
            .add_child(&child_of(&guardian.clone(), "c-2"))
            .expect("second child fits");

        let third = child_of(&guardian.clone(), "c-3");
        assert_eq!(
            guardian.add_child(&third),
            Err(DomainError::CapacityExceeded { max: 2 })
        );
        assert_eq!(
            guardian.children(),
            &[ChildId::new("c-1"), ChildId::new("c-2")]
        );
    }

    #[test]
    fn zero_capacity_guardian_cannot_link_children() {
        let mut input = maria_input();
        input.max_children = 0;
        let mut guardian = Guardian::new(
            GuardianId::new("g-5"),
            input,
            &ValidationPolicy::default(),
            today(),
        )
        .expect("valid guardian");
        let child = child_of(&guardian.clone(), "c-1");
        assert_eq!(
            guardian.add_child(&child),
            Err(DomainError::CapacityExceeded { max: 0 })
        );
    }

    #[test]
    fn duplicate_and_foreign_children_are_rejected() {
        let mut guardian = maria();
        let child = child_of(&guardian.clone(), "c-1");
        guardian.add_child(&child).expect("first link");
        assert_eq!(
            guardian.add_child(&child),
            Err(DomainError::DuplicateChild(ChildId::new("c-1")))
        );

        let other = Guardian::new(
            GuardianId::new("g-9"),
            maria_input(),
            &ValidationPolicy::default(),
            today(),
        )
        .expect("valid guardian");
        let foreign = child_of(&other, "c-9");
        assert!(matches!(
            guardian.add_child(&foreign),
            Err(DomainError::GuardianMismatch { .. })
        ));
    }

    #[test]
    fn remove_child_by_id() {
        let mut guardian = maria();
        let child = child_of(&guardian.clone(), "c-1");
        guardian.add_child(&child).expect("link");

        assert_eq!(
            guardian.remove_child_by_id(&ChildId::new("missing")),
            Err(DomainError::ChildNotFound(ChildId::new("missing")))
        );
        guardian
            .remove_child_by_id(&ChildId::new("c-1"))
            .expect("child removed");
        assert!(guardian.children().is_empty());
    }

    #[test]
    fn failed_update_leaves_guardian_untouched() {
        let mut guardian = maria();
        let before = guardian.clone();
        assert!(guardian
            .update_contact("new@example.com", Some("abc".to_string()), &ValidationPolicy::default())
            .is_err());
        assert!(guardian
            .update_personal("Maria Silva", "01/01/2015", today())
            .is_err());
        assert_eq!(guardian, before);
    }
}
