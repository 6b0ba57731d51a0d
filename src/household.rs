use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{
    CalendarEvent, Child, ChildId, ChildInput, DomainError, EventId, Guardian, GuardianId,
    GuardianInput, Routine, RoutineId, SensoryProfile, ValidationPolicy,
};

/// Error raised by the household aggregate.
#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("guardian {0} not found")]
    GuardianNotFound(GuardianId),
    #[error("child {0} not found")]
    ChildNotFound(ChildId),
    #[error("routine {0} not found")]
    RoutineNotFound(RoutineId),
    #[error("event {0} not found")]
    EventNotFound(EventId),
    #[error("id {0} is already in use")]
    DuplicateId(String),
    #[error("inconsistent stored data: {0}")]
    Inconsistent(String),
}

/// Id-addressed registry of every record, keeping guardian/child edges and
/// child-owned routines and events consistent.
#[derive(Debug, Clone, Default)]
pub struct Household {
    policy: ValidationPolicy,
    guardians: BTreeMap<GuardianId, Guardian>,
    children: BTreeMap<ChildId, Child>,
    routines: BTreeMap<RoutineId, Routine>,
    events: BTreeMap<EventId, CalendarEvent>,
}

impl Household {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Assemble a household from already restored records, checking that every
    /// reference resolves.
    pub fn from_parts(
        policy: ValidationPolicy,
        guardians: Vec<Guardian>,
        children: Vec<Child>,
        routines: Vec<Routine>,
        events: Vec<CalendarEvent>,
    ) -> Result<Self, HouseholdError> {
        let mut household = Self::new(policy);

        for guardian in guardians {
            let key = guardian.id().clone();
            if household.guardians.insert(key.clone(), guardian).is_some() {
                return Err(HouseholdError::DuplicateId(key.to_string()));
            }
        }

        for child in children {
            let guardian = household
                .guardians
                .get(child.guardian_id())
                .ok_or_else(|| HouseholdError::GuardianNotFound(child.guardian_id().clone()))?;
            if !guardian.children().contains(child.id()) {
                return Err(HouseholdError::Inconsistent(format!(
                    "child {} is not listed by guardian {}",
                    child.id(),
                    guardian.id()
                )));
            }
            let key = child.id().clone();
            if household.children.insert(key.clone(), child).is_some() {
                return Err(HouseholdError::DuplicateId(key.to_string()));
            }
        }

        for guardian in household.guardians.values() {
            for listed in guardian.children() {
                let child = household
                    .children
                    .get(listed)
                    .ok_or_else(|| HouseholdError::ChildNotFound(listed.clone()))?;
                if child.guardian_id() != guardian.id() {
                    return Err(HouseholdError::Inconsistent(format!(
                        "guardian {} lists child {} which belongs to guardian {}",
                        guardian.id(),
                        listed,
                        child.guardian_id()
                    )));
                }
            }
        }

        for routine in routines {
            household.require_child(routine.child_id())?;
            let key = routine.id().clone();
            if household.routines.insert(key.clone(), routine).is_some() {
                return Err(HouseholdError::DuplicateId(key.to_string()));
            }
        }

        for event in events {
            household.require_child(event.child_id())?;
            let key = event.id().clone();
            if household.events.insert(key.clone(), event).is_some() {
                return Err(HouseholdError::DuplicateId(key.to_string()));
            }
        }

        Ok(household)
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn register_guardian(
        &mut self,
        id: GuardianId,
        input: GuardianInput,
        today: NaiveDate,
    ) -> Result<&Guardian, HouseholdError> {
        if self.guardians.contains_key(&id) {
            return Err(HouseholdError::DuplicateId(id.to_string()));
        }

        let guardian = Guardian::new(id.clone(), input, &self.policy, today)?;
        info!(guardian_id = %id, "registered guardian");
        Ok(self.guardians.entry(id).or_insert(guardian))
    }

    /// Create a child and link it to its guardian in one step; nothing is stored
    /// when either the child or the link is rejected.
    pub fn register_child(
        &mut self,
        id: ChildId,
        guardian_id: &GuardianId,
        input: ChildInput,
        today: NaiveDate,
    ) -> Result<&Child, HouseholdError> {
        if self.children.contains_key(&id) {
            return Err(HouseholdError::DuplicateId(id.to_string()));
        }

        let guardian = self
            .guardians
            .get_mut(guardian_id)
            .ok_or_else(|| HouseholdError::GuardianNotFound(guardian_id.clone()))?;

        let child = Child::new(id.clone(), input, Some(&*guardian), today)?;
        guardian.add_child(&child)?;

        info!(child_id = %id, guardian_id = %guardian_id, "registered child");
        Ok(self.children.entry(id).or_insert(child))
    }

    /// Delete a child together with its guardian link, routines and events.
    pub fn remove_child(&mut self, child_id: &ChildId) -> Result<Child, HouseholdError> {
        let guardian_id = self.require_child(child_id)?.guardian_id().clone();
        if let Some(guardian) = self.guardians.get_mut(&guardian_id) {
            if guardian.children().contains(child_id) {
                guardian.remove_child_by_id(child_id)?;
            }
        }

        let child = self
            .children
            .remove(child_id)
            .ok_or_else(|| HouseholdError::ChildNotFound(child_id.clone()))?;

        let routines_before = self.routines.len();
        self.routines.retain(|_, routine| routine.child_id() != child_id);
        let events_before = self.events.len();
        self.events.retain(|_, event| event.child_id() != child_id);

        info!(
            child_id = %child_id,
            routines_removed = routines_before - self.routines.len(),
            events_removed = events_before - self.events.len(),
            "removed child"
        );
        Ok(child)
    }

    pub fn set_sensory_profile(
        &mut self,
        child_id: &ChildId,
        profile: Option<SensoryProfile>,
    ) -> Result<&Child, HouseholdError> {
        let child = self
            .children
            .get_mut(child_id)
            .ok_or_else(|| HouseholdError::ChildNotFound(child_id.clone()))?;
        child.set_sensory_profile(profile);
        debug!(child_id = %child_id, "updated sensory profile");
        Ok(child)
    }

    pub fn add_routine(&mut self, routine: Routine) -> Result<&Routine, HouseholdError> {
        self.require_child(routine.child_id())?;
        let id = routine.id().clone();
        if self.routines.contains_key(&id) {
            return Err(HouseholdError::DuplicateId(id.to_string()));
        }

        info!(routine_id = %id, child_id = %routine.child_id(), "added routine");
        Ok(self.routines.entry(id).or_insert(routine))
    }

    pub fn remove_routine(&mut self, routine_id: &RoutineId) -> Result<Routine, HouseholdError> {
        let routine = self
            .routines
            .remove(routine_id)
            .ok_or_else(|| HouseholdError::RoutineNotFound(routine_id.clone()))?;
        info!(routine_id = %routine_id, "removed routine");
        Ok(routine)
    }

    pub fn add_event(
        &mut self,
        id: EventId,
        title: &str,
        child_id: &ChildId,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<&CalendarEvent, HouseholdError> {
        if self.events.contains_key(&id) {
            return Err(HouseholdError::DuplicateId(id.to_string()));
        }
        let child = self.require_child(child_id)?;
        let event = CalendarEvent::new(id.clone(), title, child, date, description)?;

        info!(event_id = %id, child_id = %child_id, %date, "added event");
        Ok(self.events.entry(id).or_insert(event))
    }

    pub fn remove_event(&mut self, event_id: &EventId) -> Result<CalendarEvent, HouseholdError> {
        let event = self
            .events
            .remove(event_id)
            .ok_or_else(|| HouseholdError::EventNotFound(event_id.clone()))?;
        info!(event_id = %event_id, "removed event");
        Ok(event)
    }

    pub fn guardian(&self, id: &GuardianId) -> Result<&Guardian, HouseholdError> {
        self.guardians
            .get(id)
            .ok_or_else(|| HouseholdError::GuardianNotFound(id.clone()))
    }

    pub fn guardian_mut(&mut self, id: &GuardianId) -> Result<&mut Guardian, HouseholdError> {
        self.guardians
            .get_mut(id)
            .ok_or_else(|| HouseholdError::GuardianNotFound(id.clone()))
    }

    pub fn child(&self, id: &ChildId) -> Result<&Child, HouseholdError> {
        self.require_child(id)
    }

    pub fn child_mut(&mut self, id: &ChildId) -> Result<&mut Child, HouseholdError> {
        self.children
            .get_mut(id)
            .ok_or_else(|| HouseholdError::ChildNotFound(id.clone()))
    }

    pub fn routine(&self, id: &RoutineId) -> Result<&Routine, HouseholdError> {
        self.routines
            .get(id)
            .ok_or_else(|| HouseholdError::RoutineNotFound(id.clone()))
    }

    pub fn routine_mut(&mut self, id: &RoutineId) -> Result<&mut Routine, HouseholdError> {
        self.routines
            .get_mut(id)
            .ok_or_else(|| HouseholdError::RoutineNotFound(id.clone()))
    }

    pub fn guardians(&self) -> impl Iterator<Item = &Guardian> {
        self.guardians.values()
    }

    pub fn children(&self) -> impl Iterator<Item = &Child> {
        self.children.values()
    }

    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.routines.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.values()
    }

    /// Children in the order they were linked to the guardian.
    pub fn children_of(&self, guardian_id: &GuardianId) -> Result<Vec<&Child>, HouseholdError> {
        let guardian = self.guardian(guardian_id)?;
        Ok(guardian
            .children()
            .iter()
            .filter_map(|id| self.children.get(id))
            .collect())
    }

    pub fn routines_for(&self, child_id: &ChildId) -> Vec<&Routine> {
        self.routines
            .values()
            .filter(|routine| routine.child_id() == child_id)
            .collect()
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self
            .events
            .values()
            .filter(|event| event.date() == date)
            .collect();
        events.sort_by(|a, b| a.title().cmp(b.title()));
        events
    }

    fn require_child(&self, id: &ChildId) -> Result<&Child, HouseholdError> {
        self.children
            .get(id)
            .ok_or_else(|| HouseholdError::ChildNotFound(id.clone()))
    }
}
