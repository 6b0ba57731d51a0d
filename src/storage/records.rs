//! Plain persistence records. Dates are `DD/MM/YYYY`, times `HH:MM`, enums are
//! strings, and ids are the opaque id strings.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::validators::{format_date, format_time, parse_date, validate_time_of_day};
use crate::domain::{
    CalendarEvent, Child, ChildId, ChildInput, DomainError, EventId, Guardian, GuardianId,
    GuardianInput, ItemId, Recurrence, RecurrenceType, Routine, RoutineExecution, RoutineId,
    RoutineItem, SensoryProfile, ValidationPolicy,
};
use crate::domain::{parse_weekday, Person};
use crate::household::Household;

use super::StorageError;

/// Whole-file snapshot of a household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub guardians: Vec<GuardianRecord>,
    pub children: Vec<ChildRecord>,
    pub routines: Vec<RoutineRecord>,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianRecord {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub guardian_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    pub max_children: u32,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub support_level: String,
    pub guardian_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensory_profile: Option<SensoryProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineRecord {
    pub id: String,
    pub child_id: String,
    pub name: String,
    pub recurrence_type: RecurrenceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<String>,
    #[serde(default)]
    pub items: Vec<RoutineItemRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executions: Vec<ExecutionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineItemRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub date: String,
    #[serde(default)]
    pub completed_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub child_id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Dataset {
    pub fn from_household(household: &Household) -> Self {
        Self {
            guardians: household.guardians().map(GuardianRecord::from).collect(),
            children: household.children().map(ChildRecord::from).collect(),
            routines: household.routines().map(RoutineRecord::from).collect(),
            events: household.events().map(EventRecord::from).collect(),
        }
    }

    /// Rebuild every record and the references between them.
    pub fn into_household(
        self,
        policy: ValidationPolicy,
        today: NaiveDate,
    ) -> Result<Household, StorageError> {
        let guardians = self
            .guardians
            .into_iter()
            .map(|record| record.restore(&policy, today))
            .collect::<Result<Vec<_>, _>>()?;
        let children = self
            .children
            .into_iter()
            .map(|record| record.restore(today))
            .collect::<Result<Vec<_>, _>>()?;
        let routines = self
            .routines
            .into_iter()
            .map(RoutineRecord::restore)
            .collect::<Result<Vec<_>, _>>()?;
        let events = self
            .events
            .into_iter()
            .map(EventRecord::restore)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Household::from_parts(
            policy, guardians, children, routines, events,
        )?)
    }

    pub fn is_empty(&self) -> bool {
        self.guardians.is_empty()
            && self.children.is_empty()
            && self.routines.is_empty()
            && self.events.is_empty()
    }
}

impl From<&Guardian> for GuardianRecord {
    fn from(guardian: &Guardian) -> Self {
        Self {
            id: guardian.id().to_string(),
            name: guardian.name().to_string(),
            birth_date: format_date(guardian.birth_date()),
            email: guardian.email().to_string(),
            phone: guardian.phone().map(str::to_string),
            guardian_type: guardian.guardian_type().to_string(),
            address: guardian.address().map(str::to_string),
            national_id: guardian.national_id().map(str::to_string),
            max_children: guardian.max_children(),
            children: guardian.children().iter().map(ChildId::to_string).collect(),
        }
    }
}

impl GuardianRecord {
    pub fn restore(self, policy: &ValidationPolicy, today: NaiveDate) -> Result<Guardian, DomainError> {
        let children = self.children.into_iter().map(ChildId::new).collect();
        Guardian::restore(
            GuardianId::new(self.id),
            GuardianInput {
                name: self.name,
                birth_date: self.birth_date,
                email: self.email,
                phone: self.phone,
                guardian_type: self.guardian_type,
                address: self.address,
                national_id: self.national_id,
                max_children: self.max_children,
            },
            children,
            policy,
            today,
        )
    }
}

impl From<&Child> for ChildRecord {
    fn from(child: &Child) -> Self {
        Self {
            id: child.id().to_string(),
            name: child.name().to_string(),
            birth_date: format_date(child.birth_date()),
            support_level: child.support_level().label().to_string(),
            guardian_id: child.guardian_id().to_string(),
            sensory_profile: child.sensory_profile().cloned(),
        }
    }
}

impl ChildRecord {
    pub fn restore(self, today: NaiveDate) -> Result<Child, DomainError> {
        Child::restore(
            ChildId::new(self.id),
            ChildInput {
                name: self.name,
                birth_date: self.birth_date,
                support_level: self.support_level,
                sensory_profile: self.sensory_profile,
            },
            GuardianId::new(self.guardian_id),
            today,
        )
    }
}

impl From<&Routine> for RoutineRecord {
    fn from(routine: &Routine) -> Self {
        let recurrence = routine.recurrence();
        Self {
            id: routine.id().to_string(),
            child_id: routine.child_id().to_string(),
            name: routine.name().to_string(),
            recurrence_type: recurrence.kind(),
            scheduled_date: recurrence.scheduled_date().map(format_date),
            weekdays: recurrence.weekdays().iter().map(Weekday::to_string).collect(),
            items: routine.items().iter().map(RoutineItemRecord::from).collect(),
            executions: routine
                .executions()
                .iter()
                .map(ExecutionRecord::from)
                .collect(),
        }
    }
}

impl RoutineRecord {
    pub fn restore(self) -> Result<Routine, DomainError> {
        let scheduled_date = self.scheduled_date.as_deref().map(parse_date).transpose()?;
        let weekdays = self
            .weekdays
            .iter()
            .map(|raw| parse_weekday(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let recurrence = Recurrence::from_parts(self.recurrence_type, scheduled_date, &weekdays)?;

        let items = self
            .items
            .into_iter()
            .map(RoutineItemRecord::restore)
            .collect::<Result<Vec<_>, _>>()?;
        let executions = self
            .executions
            .into_iter()
            .map(ExecutionRecord::restore)
            .collect::<Result<Vec<_>, _>>()?;

        Routine::restore(
            RoutineId::new(self.id),
            ChildId::new(self.child_id),
            &self.name,
            recurrence,
            items,
            executions,
        )
    }
}

impl From<&RoutineItem> for RoutineItemRecord {
    fn from(item: &RoutineItem) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_string(),
            description: item.description().map(str::to_string),
            start_time: item.start_time().map(format_time),
            end_time: item.end_time().map(format_time),
            order: i64::from(item.order()),
        }
    }
}

impl RoutineItemRecord {
    pub fn restore(self) -> Result<RoutineItem, DomainError> {
        let start_time = self
            .start_time
            .as_deref()
            .map(validate_time_of_day)
            .transpose()?;
        let end_time = self
            .end_time
            .as_deref()
            .map(validate_time_of_day)
            .transpose()?;

        RoutineItem::new(
            ItemId::new(self.id),
            &self.name,
            self.description,
            start_time,
            end_time,
            self.order,
        )
    }
}

impl From<&RoutineExecution> for ExecutionRecord {
    fn from(execution: &RoutineExecution) -> Self {
        Self {
            date: format_date(execution.date),
            completed_items: execution
                .completed_items
                .iter()
                .map(ItemId::to_string)
                .collect(),
            notes: execution.notes.clone(),
        }
    }
}

impl ExecutionRecord {
    pub fn restore(self) -> Result<RoutineExecution, DomainError> {
        Ok(RoutineExecution {
            date: parse_date(&self.date)?,
            completed_items: self.completed_items.into_iter().map(ItemId::new).collect(),
            notes: self.notes,
        })
    }
}

impl From<&CalendarEvent> for EventRecord {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            id: event.id().to_string(),
            title: event.title().to_string(),
            child_id: event.child_id().to_string(),
            date: format_date(event.date()),
            description: event.description().map(str::to_string),
        }
    }
}

impl EventRecord {
    pub fn restore(self) -> Result<CalendarEvent, DomainError> {
        CalendarEvent::restore(
            EventId::new(self.id),
            &self.title,
            ChildId::new(self.child_id),
            parse_date(&self.date)?,
            self.description,
        )
    }
}
