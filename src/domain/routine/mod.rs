//! Routines: ordered checklists of steps with a recurrence policy.
//!
//! Every mutating operation works on a candidate copy of the item list, runs the
//! full validation over it, and only then commits. A failed call leaves the
//! routine exactly as it was.

mod item;
mod recurrence;

#[cfg(test)]
mod tests;

pub use item::RoutineItem;
pub use recurrence::{parse_weekday, Recurrence, RecurrenceType};

use chrono::{NaiveDate, NaiveTime};

use super::error::DomainError;
use super::ids::{ChildId, ItemId, RoutineId};
use super::validators::non_blank;

const FIXED_TEMPLATES: [&str; 6] = [
    "Morning routine",
    "School preparation",
    "Mealtime",
    "Therapy session",
    "Afternoon activities",
    "Bedtime routine",
];

/// One completed run of a routine on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineExecution {
    pub date: NaiveDate,
    pub completed_items: Vec<ItemId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    id: RoutineId,
    child_id: ChildId,
    name: String,
    recurrence: Recurrence,
    items: Vec<RoutineItem>,
    executions: Vec<RoutineExecution>,
}

impl Routine {
    pub fn new(
        id: RoutineId,
        child_id: ChildId,
        name: &str,
        recurrence: Recurrence,
    ) -> Result<Self, DomainError> {
        Self::restore(id, child_id, name, recurrence, Vec::new(), Vec::new())
    }

    /// Rebuild a stored routine. Items must already carry orders `1..=N` and
    /// logged executions may only name those items.
    pub fn restore(
        id: RoutineId,
        child_id: ChildId,
        name: &str,
        recurrence: Recurrence,
        mut items: Vec<RoutineItem>,
        executions: Vec<RoutineExecution>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyRoutineName);
        }

        let recurrence = recurrence.normalized();
        recurrence.validate()?;
        items.sort_by_key(RoutineItem::order);
        validate_items(&items)?;
        for execution in &executions {
            if let Some(unknown) = execution
                .completed_items
                .iter()
                .find(|id| !items.iter().any(|item| item.id() == *id))
            {
                return Err(DomainError::ItemNotFound(unknown.clone()));
            }
        }

        Ok(Self {
            id,
            child_id,
            name: name.to_string(),
            recurrence,
            items,
            executions,
        })
    }

    pub fn id(&self) -> &RoutineId {
        &self.id
    }

    pub fn child_id(&self) -> &ChildId {
        &self.child_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    pub fn recurrence_type(&self) -> RecurrenceType {
        self.recurrence.kind()
    }

    /// Items sorted ascending by order.
    pub fn items(&self) -> &[RoutineItem] {
        &self.items
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&RoutineItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    pub fn executions(&self) -> &[RoutineExecution] {
        &self.executions
    }

    /// Convenience names offered when creating a routine from scratch.
    pub fn suggest_fixed_templates() -> &'static [&'static str] {
        &FIXED_TEMPLATES
    }

    pub fn applies_on_date(&self, date: NaiveDate) -> bool {
        self.recurrence.applies_on(date)
    }

    pub fn set_recurrence(&mut self, recurrence: Recurrence) -> Result<(), DomainError> {
        let recurrence = recurrence.normalized();
        recurrence.validate()?;
        self.recurrence = recurrence;
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyRoutineName);
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Insert an item at the order it carries. Orders are compacted to `1..=N`
    /// afterwards, keeping relative positions.
    pub fn register_item(&mut self, item: RoutineItem) -> Result<(), DomainError> {
        if self.items.iter().any(|existing| existing.order() == item.order()) {
            return Err(DomainError::DuplicateOrder(item.order()));
        }
        if self.item(item.id()).is_some() {
            return Err(DomainError::DuplicateItem(item.id().clone()));
        }

        let mut candidate = self.items.clone();
        candidate.push(item);
        candidate.sort_by_key(RoutineItem::order);
        reindex(&mut candidate);
        self.commit(candidate)
    }

    /// Append a new step after the current last one and return its id.
    pub fn register_item_auto(
        &mut self,
        name: &str,
        description: Option<String>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<ItemId, DomainError> {
        let next_order = self
            .items
            .iter()
            .map(RoutineItem::order)
            .max()
            .map_or(1, |max| max + 1);

        let item = RoutineItem::new(
            ItemId::generate(),
            name,
            description,
            start_time,
            end_time,
            i64::from(next_order),
        )?;
        let item_id = item.id().clone();

        let mut candidate = self.items.clone();
        candidate.push(item);
        candidate.sort_by_key(RoutineItem::order);
        self.commit(candidate)?;
        Ok(item_id)
    }

    /// Remove an item and close the gap. The item also leaves every logged
    /// execution.
    pub fn remove_item(&mut self, item_id: &ItemId) -> Result<RoutineItem, DomainError> {
        let position = self.position_of(item_id)?;

        let mut candidate = self.items.clone();
        let removed = candidate.remove(position);
        reindex(&mut candidate);
        self.commit(candidate)?;
        for execution in &mut self.executions {
            execution.completed_items.retain(|id| id != item_id);
        }
        Ok(removed)
    }

    /// Move an item to `new_order` (1-based), shifting the others. Orders past
    /// the end are clamped to the last position.
    pub fn reorder_item(&mut self, item_id: &ItemId, new_order: i64) -> Result<(), DomainError> {
        if new_order < 1 {
            return Err(DomainError::InvalidOrder(new_order));
        }
        let position = self.position_of(item_id)?;

        let mut candidate = self.items.clone();
        let target = candidate.remove(position);
        candidate.sort_by_key(RoutineItem::order);

        let slot = usize::try_from(new_order)
            .unwrap_or(usize::MAX)
            .min(candidate.len() + 1);
        candidate.insert(slot - 1, target);
        reindex(&mut candidate);
        self.commit(candidate)
    }

    pub fn update_item(
        &mut self,
        item_id: &ItemId,
        name: &str,
        description: Option<String>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<(), DomainError> {
        let position = self.position_of(item_id)?;
        self.items[position].update_fields(name, description, start_time, end_time)
    }

    /// Log a run of this routine. The date must be one the routine applies to and
    /// every completed item must belong to it.
    pub fn record_execution(
        &mut self,
        date: NaiveDate,
        completed_items: &[ItemId],
        notes: Option<String>,
    ) -> Result<(), DomainError> {
        if !self.applies_on_date(date) {
            return Err(DomainError::NotScheduled(date));
        }

        let mut completed: Vec<ItemId> = Vec::with_capacity(completed_items.len());
        for item_id in completed_items {
            self.position_of(item_id)?;
            if !completed.contains(item_id) {
                completed.push(item_id.clone());
            }
        }

        self.executions.push(RoutineExecution {
            date,
            completed_items: completed,
            notes: non_blank(notes),
        });
        Ok(())
    }

    fn position_of(&self, item_id: &ItemId) -> Result<usize, DomainError> {
        self.items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or_else(|| DomainError::ItemNotFound(item_id.clone()))
    }

    fn commit(&mut self, candidate: Vec<RoutineItem>) -> Result<(), DomainError> {
        self.recurrence.validate()?;
        validate_items(&candidate)?;
        self.items = candidate;
        Ok(())
    }
}

fn reindex(items: &mut [RoutineItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as u32 + 1);
    }
}

/// Items must be sorted with orders exactly `1..=N`.
fn validate_items(items: &[RoutineItem]) -> Result<(), DomainError> {
    for (index, item) in items.iter().enumerate() {
        if index > 0 && items[index - 1].order() == item.order() {
            return Err(DomainError::DuplicateOrder(item.order()));
        }
        if item.order() as usize != index + 1 {
            return Err(DomainError::InvalidOrder(i64::from(item.order())));
        }
    }

    for (index, item) in items.iter().enumerate() {
        if items[..index].iter().any(|other| other.id() == item.id()) {
            return Err(DomainError::DuplicateItem(item.id().clone()));
        }
    }
    Ok(())
}
