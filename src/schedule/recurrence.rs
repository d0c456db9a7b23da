//! Cron recurrence evaluation
//!
//! Expressions use the standard five-field syntax:
//!
//! ```text
//! ┌───────────── minute        0-59
//! │ ┌─────────── hour          0-23
//! │ │ ┌───────── day of month  1-31
//! │ │ │ ┌─────── month         1-12 or JAN-DEC
//! │ │ │ │ ┌───── day of week   0-7 or SUN-SAT (0 and 7 are Sunday)
//! * * * * *
//! ```
//!
//! Each field is a comma list of `*`, `N`, `A-B`, `*/S`, `A-B/S` or `A/S`.
//! When both day fields are restricted a day matches if either one matches,
//! otherwise both must match.
//!
//! Fields are expanded here and handed to the `cron` crate as an explicit
//! six-field expression (seconds pinned to 0), which does the calendar
//! stepping. The `cron` crate numbers weekdays from Sunday = 1, so weekdays are
//! passed by name.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use cron::Schedule;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Weekday names as accepted by the `cron` crate
const ENGINE_WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Errors raised while parsing a recurrence expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    /// The expression does not have exactly five fields
    #[error("expected 5 fields (minute hour day-of-month month day-of-week), found {0}")]
    FieldCount(usize),

    /// An `@` macro that has no five-field equivalent
    #[error("unsupported macro '{0}'")]
    UnknownMacro(String),

    /// A field failed to parse
    #[error("invalid {field} field '{value}': {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Field text as written
        value: String,
        /// What is wrong with it
        reason: String,
    },

    /// The normalized expression was rejected by the scheduling engine
    #[error("cron engine rejected '{expression}': {reason}")]
    Engine {
        /// Normalized six-field expression
        expression: String,
        /// Engine error message
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldKind {
    const ALL: [FieldKind; 5] = [
        FieldKind::Minute,
        FieldKind::Hour,
        FieldKind::DayOfMonth,
        FieldKind::Month,
        FieldKind::DayOfWeek,
    ];

    fn name(self) -> &'static str {
        match self {
            FieldKind::Minute => "minute",
            FieldKind::Hour => "hour",
            FieldKind::DayOfMonth => "day-of-month",
            FieldKind::Month => "month",
            FieldKind::DayOfWeek => "day-of-week",
        }
    }

    /// Inclusive bounds; day-of-week accepts 7 as an alias for Sunday
    fn bounds(self) -> (u32, u32) {
        match self {
            FieldKind::Minute => (0, 59),
            FieldKind::Hour => (0, 23),
            FieldKind::DayOfMonth => (1, 31),
            FieldKind::Month => (1, 12),
            FieldKind::DayOfWeek => (0, 7),
        }
    }

    fn is_day_field(self) -> bool {
        matches!(self, FieldKind::DayOfMonth | FieldKind::DayOfWeek)
    }

    fn lookup_name(self, text: &str) -> Option<u32> {
        let lower = text.to_ascii_lowercase();
        let position = |names: &[&str]| names.iter().position(|name| *name == lower);
        match self {
            FieldKind::Month => position(&MONTH_NAMES).map(|i| i as u32 + 1),
            FieldKind::DayOfWeek => position(&WEEKDAY_NAMES).map(|i| i as u32),
            _ => None,
        }
    }
}

/// One expanded field
#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    kind: FieldKind,
    values: BTreeSet<u32>,
    /// Field text starts with `*` (or `?` for day fields)
    starred: bool,
}

impl Field {
    fn parse(kind: FieldKind, text: &str) -> Result<Self, RecurrenceError> {
        let invalid = |reason: String| RecurrenceError::InvalidField {
            field: kind.name(),
            value: text.to_string(),
            reason,
        };

        let (min, max) = kind.bounds();
        let is_wildcard = |part: &str| part == "*" || (kind.is_day_field() && part == "?");
        let mut values = BTreeSet::new();

        for item in text.split(',') {
            let mut pieces = item.split('/');
            let range_part = pieces.next().unwrap_or_default();
            let step = match pieces.next() {
                Some(step_text) => {
                    let step: u32 = step_text
                        .parse()
                        .map_err(|_| invalid(format!("invalid step '{}'", step_text)))?;
                    if step == 0 {
                        return Err(invalid("step must be greater than 0".to_string()));
                    }
                    Some(step)
                }
                None => None,
            };
            if pieces.next().is_some() {
                return Err(invalid(format!("too many '/' in '{}'", item)));
            }

            let (start, end) = if is_wildcard(range_part) {
                (min, max)
            } else if let Some((low, high)) = range_part.split_once('-') {
                let low = Self::parse_value(kind, low).map_err(&invalid)?;
                let high = Self::parse_value(kind, high).map_err(&invalid)?;
                if low > high {
                    return Err(invalid(format!("reversed range {}-{}", low, high)));
                }
                (low, high)
            } else {
                let value = Self::parse_value(kind, range_part).map_err(&invalid)?;
                // `A/S` runs from A to the end of the field
                (value, if step.is_some() { max } else { value })
            };

            values.extend((start..=end).step_by(step.unwrap_or(1) as usize));
        }

        if kind == FieldKind::DayOfWeek && values.remove(&7) {
            values.insert(0);
        }

        Ok(Self {
            kind,
            values,
            starred: text.starts_with('*') || (kind.is_day_field() && text.starts_with('?')),
        })
    }

    fn parse_value(kind: FieldKind, text: &str) -> Result<u32, String> {
        let (min, max) = kind.bounds();
        let value = match text.parse::<u32>() {
            Ok(value) => value,
            Err(_) => kind
                .lookup_name(text)
                .ok_or_else(|| format!("unknown value '{}'", text))?,
        };
        if value < min || value > max {
            return Err(format!("{} is outside {}-{}", value, min, max));
        }
        Ok(value)
    }

    /// Field rendered for the `cron` crate
    fn render(&self) -> String {
        let (min, max) = match self.kind {
            FieldKind::DayOfWeek => (0, 6),
            kind => kind.bounds(),
        };
        if (min..=max).all(|v| self.values.contains(&v)) {
            return "*".to_string();
        }
        let items: Vec<String> = match self.kind {
            FieldKind::DayOfWeek => self
                .values
                .iter()
                .map(|v| ENGINE_WEEKDAYS[*v as usize].to_string())
                .collect(),
            _ => self.values.iter().map(u32::to_string).collect(),
        };
        items.join(",")
    }
}

/// Expand an `@` macro to its five-field form
fn expand_macro(expression: &str) -> Result<&'static str, RecurrenceError> {
    match expression.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => Ok("0 0 1 1 *"),
        "@monthly" => Ok("0 0 1 * *"),
        "@weekly" => Ok("0 0 * * 0"),
        "@daily" | "@midnight" => Ok("0 0 * * *"),
        "@hourly" => Ok("0 * * * *"),
        _ => Err(RecurrenceError::UnknownMacro(expression.to_string())),
    }
}

/// A parsed cron recurrence rule
#[derive(Debug, Clone)]
pub struct Recurrence {
    expression: String,
    /// One schedule, or two when both day fields are restricted (either may match)
    schedules: Vec<Schedule>,
}

impl Recurrence {
    /// Parse a five-field cron expression or `@` macro
    pub fn parse(expression: &str) -> Result<Self, RecurrenceError> {
        let trimmed = expression.trim();
        let five_field = if trimmed.starts_with('@') {
            expand_macro(trimmed)?
        } else {
            trimmed
        };

        let texts: Vec<&str> = five_field.split_whitespace().collect();
        if texts.len() != FieldKind::ALL.len() {
            return Err(RecurrenceError::FieldCount(texts.len()));
        }

        let fields = FieldKind::ALL
            .iter()
            .zip(&texts)
            .map(|(kind, text)| Field::parse(*kind, text))
            .collect::<Result<Vec<_>, _>>()?;
        let [minute, hour, day_of_month, month, day_of_week] = fields.as_slice() else {
            return Err(RecurrenceError::FieldCount(fields.len()));
        };

        let prefix = format!("0 {} {}", minute.render(), hour.render());
        let month = month.render();
        let normalized = if !day_of_month.starred && !day_of_week.starred {
            vec![
                format!("{} {} {} *", prefix, day_of_month.render(), month),
                format!("{} * {} {}", prefix, month, day_of_week.render()),
            ]
        } else {
            vec![format!(
                "{} {} {} {}",
                prefix,
                day_of_month.render(),
                month,
                day_of_week.render()
            )]
        };

        let schedules = normalized
            .into_iter()
            .map(|expr| {
                Schedule::from_str(&expr).map_err(|e| RecurrenceError::Engine {
                    expression: expr.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            expression: trimmed.to_string(),
            schedules,
        })
    }

    /// The expression as written
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First occurrence strictly after `instant`
    pub fn next_after(&self, instant: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedules
            .iter()
            .filter_map(|schedule| schedule.after(instant).next())
            .min()
    }

    /// Whether the rule fires exactly at `instant`
    ///
    /// True when the next occurrence after `instant - 1s` is `instant` itself.
    pub fn fires_at(&self, instant: DateTime<Utc>) -> bool {
        self.next_after(&(instant - Duration::seconds(1))) == Some(instant)
    }
}

impl FromStr for Recurrence {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
