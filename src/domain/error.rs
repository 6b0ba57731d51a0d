use chrono::NaiveDate;

use super::ids::{ChildId, GuardianId, ItemId};

/// Validation and invariant failures raised by the domain records.
///
/// Every constructor and mutating operation reports exactly one of these to its
/// caller; a failed call never leaves a partially built or partially mutated
/// record behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("invalid name: {0}")]
    InvalidName(&'static str),
    #[error("invalid date: {0}")]
    InvalidDate(&'static str),
    #[error("invalid email: expected user@domain.tld")]
    InvalidEmail,
    #[error("invalid phone: digits only, at most {max_digits}")]
    InvalidPhone { max_digits: u8 },
    #[error("invalid id number: expected exactly 11 digits")]
    InvalidId,
    #[error("guardian must be at least 18 years old (age {age})")]
    GuardianTooYoung { age: u32 },
    #[error("child must be younger than 18 (age {age})")]
    ChildNotMinor { age: u32 },
    #[error("every child must be linked to a guardian")]
    MissingGuardian,
    #[error("guardian already has the maximum of {max} children")]
    CapacityExceeded { max: u32 },
    #[error("child {0} not found")]
    ChildNotFound(ChildId),
    #[error("order {0} is already taken in this routine")]
    DuplicateOrder(u32),
    #[error("order must be 1 or greater (found {0})")]
    InvalidOrder(i64),
    #[error("routine item {0} not found")]
    ItemNotFound(ItemId),
    #[error("routine item {0} is already registered")]
    DuplicateItem(ItemId),
    #[error("invalid recurrence configuration: {0}")]
    InvalidRecurrenceConfiguration(&'static str),
    #[error("invalid support level '{0}': expected low, moderate or high")]
    InvalidSupportLevel(String),
    #[error("invalid time of day '{0}': expected HH:MM")]
    InvalidTime(String),
    #[error("invalid time window: {0}")]
    InvalidTimeWindow(&'static str),
    #[error("routine item name cannot be empty")]
    EmptyItemName,
    #[error("routine name cannot be empty")]
    EmptyRoutineName,
    #[error("event title cannot be empty")]
    EmptyTitle,
    #[error("child belongs to guardian {found}, not {expected}")]
    GuardianMismatch {
        expected: GuardianId,
        found: GuardianId,
    },
    #[error("child {0} is already linked to this guardian")]
    DuplicateChild(ChildId),
    #[error("routine is not scheduled on {0}")]
    NotScheduled(NaiveDate),
}
