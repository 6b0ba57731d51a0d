//! Validated domain records: guardians, children, routines and calendar events.
//!
//! Nothing in this module performs I/O or logging; callers inject "today" and
//! receive a typed [`DomainError`] for every rejected input.

pub mod child;
pub mod error;
pub mod event;
pub mod guardian;
pub mod ids;
pub mod person;
pub mod policy;
pub mod routine;
pub mod sensory;
pub mod validators;

pub use child::{Child, ChildInput, SupportLevel};
pub use error::DomainError;
pub use event::CalendarEvent;
pub use guardian::{Guardian, GuardianInput};
pub use ids::{ChildId, EventId, GuardianId, ItemId, RoutineId};
pub use person::{AgeStatus, Person, PersonalData};
pub use policy::ValidationPolicy;
pub use routine::{
    parse_weekday, Recurrence, RecurrenceType, Routine, RoutineExecution, RoutineItem,
};
pub use sensory::SensoryProfile;
