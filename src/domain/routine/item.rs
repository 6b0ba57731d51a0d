use chrono::NaiveTime;

use crate::domain::error::DomainError;
use crate::domain::ids::ItemId;
use crate::domain::validators::non_blank;

/// A single ordered step of a routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineItem {
    id: ItemId,
    name: String,
    description: Option<String>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    order: u32,
}

impl RoutineItem {
    pub fn new(
        id: ItemId,
        name: &str,
        description: Option<String>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
        order: i64,
    ) -> Result<Self, DomainError> {
        let name = validate_item_name(name)?;
        validate_window(start_time, end_time)?;
        let order = validate_order(order)?;

        Ok(Self {
            id,
            name,
            description: non_blank(description),
            start_time,
            end_time,
            order,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    /// Replace the descriptive fields; the item is unchanged when validation fails.
    pub fn update_fields(
        &mut self,
        name: &str,
        description: Option<String>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Result<(), DomainError> {
        let name = validate_item_name(name)?;
        validate_window(start_time, end_time)?;

        self.name = name;
        self.description = non_blank(description);
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    pub(super) fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

fn validate_item_name(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyItemName);
    }
    Ok(trimmed.to_string())
}

fn validate_window(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Result<(), DomainError> {
    match (start, end) {
        (None, Some(_)) => Err(DomainError::InvalidTimeWindow(
            "an end time requires a start time",
        )),
        (Some(start), Some(end)) if end < start => Err(DomainError::InvalidTimeWindow(
            "end time cannot be before start time",
        )),
        _ => Ok(()),
    }
}

pub(super) fn validate_order(order: i64) -> Result<u32, DomainError> {
    if order < 1 {
        return Err(DomainError::InvalidOrder(order));
    }
    u32::try_from(order).map_err(|_| DomainError::InvalidOrder(order))
}
