use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Local wall-clock time truncated to whole seconds, the precision stored in
/// the database.
pub fn now() -> NaiveDateTime {
    truncate(Local::now().naive_local())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn truncate(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}
