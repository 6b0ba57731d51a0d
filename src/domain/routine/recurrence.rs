use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceType {
    SingleDate,
    EveryDay,
    SpecificWeekdays,
}

impl RecurrenceType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleDate => "SINGLE_DATE",
            Self::EveryDay => "EVERY_DAY",
            Self::SpecificWeekdays => "SPECIFIC_WEEKDAYS",
        }
    }
}

impl FromStr for RecurrenceType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SINGLE_DATE" | "SINGLE" | "ONCE" => Ok(Self::SingleDate),
            "EVERY_DAY" | "DAILY" => Ok(Self::EveryDay),
            "SPECIFIC_WEEKDAYS" | "WEEKDAYS" | "WEEKLY" => Ok(Self::SpecificWeekdays),
            _ => Err(DomainError::InvalidRecurrenceConfiguration(
                "unknown recurrence type",
            )),
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Policy deciding which calendar dates a routine applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    SingleDate(NaiveDate),
    EveryDay,
    /// Deduplicated, Monday first.
    SpecificWeekdays(Vec<Weekday>),
}

impl Recurrence {
    /// Assemble a recurrence from loosely typed parts, enforcing that exactly the
    /// field required by `kind` is populated.
    pub fn from_parts(
        kind: RecurrenceType,
        scheduled_date: Option<NaiveDate>,
        weekdays: &[Weekday],
    ) -> Result<Self, DomainError> {
        match kind {
            RecurrenceType::SingleDate => {
                if !weekdays.is_empty() {
                    return Err(DomainError::InvalidRecurrenceConfiguration(
                        "a single-date routine cannot list weekdays",
                    ));
                }
                scheduled_date.map(Self::SingleDate).ok_or(
                    DomainError::InvalidRecurrenceConfiguration(
                        "a single-date routine requires a scheduled date",
                    ),
                )
            }
            RecurrenceType::EveryDay => {
                if scheduled_date.is_some() || !weekdays.is_empty() {
                    return Err(DomainError::InvalidRecurrenceConfiguration(
                        "an every-day routine takes neither a date nor weekdays",
                    ));
                }
                Ok(Self::EveryDay)
            }
            RecurrenceType::SpecificWeekdays => {
                if scheduled_date.is_some() {
                    return Err(DomainError::InvalidRecurrenceConfiguration(
                        "a weekday routine cannot have a scheduled date",
                    ));
                }
                Self::weekly(weekdays)
            }
        }
    }

    pub fn weekly(weekdays: &[Weekday]) -> Result<Self, DomainError> {
        let normalized = normalize_weekdays(weekdays);
        if normalized.is_empty() {
            return Err(DomainError::InvalidRecurrenceConfiguration(
                "a weekday routine requires at least one weekday",
            ));
        }
        Ok(Self::SpecificWeekdays(normalized))
    }

    pub fn kind(&self) -> RecurrenceType {
        match self {
            Self::SingleDate(_) => RecurrenceType::SingleDate,
            Self::EveryDay => RecurrenceType::EveryDay,
            Self::SpecificWeekdays(_) => RecurrenceType::SpecificWeekdays,
        }
    }

    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        match self {
            Self::SingleDate(date) => Some(*date),
            _ => None,
        }
    }

    pub fn weekdays(&self) -> &[Weekday] {
        match self {
            Self::SpecificWeekdays(days) => days,
            _ => &[],
        }
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self {
            Self::SingleDate(scheduled) => *scheduled == date,
            Self::EveryDay => true,
            Self::SpecificWeekdays(days) => days.contains(&date.weekday()),
        }
    }

    pub(super) fn normalized(self) -> Self {
        match self {
            Self::SpecificWeekdays(days) => Self::SpecificWeekdays(normalize_weekdays(&days)),
            other => other,
        }
    }

    pub(super) fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::SpecificWeekdays(days) if days.is_empty() => Err(
                DomainError::InvalidRecurrenceConfiguration(
                    "a weekday routine requires at least one weekday",
                ),
            ),
            _ => Ok(()),
        }
    }
}

fn normalize_weekdays(weekdays: &[Weekday]) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = weekdays.to_vec();
    days.sort_by_key(|day| day.num_days_from_monday());
    days.dedup();
    days
}

/// Parse a weekday name such as `mon`, `Monday`, or the Portuguese `seg`/`segunda`.
pub fn parse_weekday(raw: &str) -> Result<Weekday, DomainError> {
    let value = raw.trim().to_lowercase();
    if let Ok(day) = value.parse::<Weekday>() {
        return Ok(day);
    }

    let day = match value.as_str() {
        "seg" | "segunda" => Weekday::Mon,
        "ter" | "terca" | "terça" => Weekday::Tue,
        "qua" | "quarta" => Weekday::Wed,
        "qui" | "quinta" => Weekday::Thu,
        "sex" | "sexta" => Weekday::Fri,
        "sab" | "sabado" | "sábado" => Weekday::Sat,
        "dom" | "domingo" => Weekday::Sun,
        _ => {
            return Err(DomainError::InvalidRecurrenceConfiguration(
                "unknown weekday name",
            ))
        }
    };
    Ok(day)
}
