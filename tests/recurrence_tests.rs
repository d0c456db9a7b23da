//! Tests for recurrence rules across calendar boundaries
//!
//! These tests exercise the public `Recurrence` API over month ends, the
//! 2000 leap day and year boundaries.

use chrono::{DateTime, TimeZone, Utc};
use cron_load_analyzer::schedule::{Recurrence, RecurrenceError};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// Test that day 31 skips the short months
#[test]
fn test_day_31_skips_short_months() {
    let recurrence = Recurrence::parse("0 0 31 * *").unwrap();

    assert!(recurrence.fires_at(at(2000, 1, 31, 0, 0)));
    assert_eq!(
        recurrence.next_after(&at(2000, 1, 31, 0, 0)),
        Some(at(2000, 3, 31, 0, 0))
    );
}

/// Test the 2000 leap day
#[test]
fn test_leap_day() {
    let recurrence = Recurrence::parse("0 0 29 FEB *").unwrap();

    assert_eq!(
        recurrence.next_after(&at(2000, 1, 1, 0, 0)),
        Some(at(2000, 2, 29, 0, 0))
    );
    assert!(recurrence.fires_at(at(2000, 2, 29, 0, 0)));
}

/// Test stepping over the end of a year
#[test]
fn test_year_rollover() {
    let recurrence = Recurrence::parse("@yearly").unwrap();

    assert_eq!(
        recurrence.next_after(&at(2000, 1, 1, 0, 0)),
        Some(at(2001, 1, 1, 0, 0))
    );
}

/// Test the day-of-month OR day-of-week rule over a whole month
#[test]
fn test_restricted_day_fields_over_a_month() {
    // 1st and 15th, plus every Friday
    let recurrence = Recurrence::parse("0 12 1,15 * FRI").unwrap();
    let firing_days: Vec<u32> = (1..=31)
        .filter(|&day| recurrence.fires_at(at(2000, 1, day, 12, 0)))
        .collect();

    assert_eq!(firing_days, vec![1, 7, 14, 15, 21, 28]);
}

/// Test that the weekday field alone restricts when day-of-month is starred
#[test]
fn test_weekday_only_schedule() {
    let recurrence = Recurrence::parse("0 9 * * SUN").unwrap();
    let firing_days: Vec<u32> = (1..=31)
        .filter(|&day| recurrence.fires_at(at(2000, 1, day, 9, 0)))
        .collect();

    assert_eq!(firing_days, vec![2, 9, 16, 23, 30]);
}

/// Test parsing through `FromStr`
#[test]
fn test_from_str() {
    let recurrence: Recurrence = "*/5 * * * *".parse().unwrap();
    assert!(recurrence.fires_at(at(2000, 6, 1, 10, 25)));

    let error = "* * * *".parse::<Recurrence>().unwrap_err();
    assert_eq!(error, RecurrenceError::FieldCount(4));
}

/// Test that reboot-only jobs are rejected
#[test]
fn test_reboot_is_rejected() {
    assert!(Recurrence::parse("@reboot").is_err());
}

/// Test that extended syntax outside the five-field form is a parse error
#[test]
fn test_extended_syntax_is_rejected() {
    for expression in ["0 0 L * *", "0 0 15W * *", "0 0 * * 5#3", "0 0 0 * * * 2000"] {
        assert!(Recurrence::parse(expression).is_err(), "{}", expression);
    }
    assert_eq!(
        Recurrence::parse("0 0 0 1 1 * 2000").unwrap_err(),
        RecurrenceError::FieldCount(7)
    );
}
