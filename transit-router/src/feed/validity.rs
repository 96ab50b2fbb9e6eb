//! Service-day bitmaps.

use chrono::NaiveDate;

use super::{Calendar, CalendarDate, ExceptionType};

/// The set of service days on which a service runs.
///
/// Stored as one flag per day from `start` to the last date mentioned by the
/// calendar or its exceptions. Dates outside that range never run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validity {
    start: NaiveDate,
    days: Vec<bool>,
}

impl Validity {
    /// Combine a weekly calendar with its date exceptions.
    ///
    /// Returns `None` when there is neither a calendar nor any exception,
    /// since the service's days are then undefined.
    pub fn from_calendar(calendar: Option<&Calendar>, exceptions: &[&CalendarDate]) -> Option<Self> {
        let dates = calendar
            .into_iter()
            .flat_map(|c| [c.start_date, c.end_date])
            .chain(exceptions.iter().map(|e| e.date));
        let (start, end) = dates.fold(None, |range: Option<(NaiveDate, NaiveDate)>, d| {
            Some(match range {
                Some((lo, hi)) => (lo.min(d), hi.max(d)),
                None => (d, d),
            })
        })?;

        let mut days: Vec<bool> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| {
                calendar.is_some_and(|c| c.start_date <= d && d <= c.end_date && c.runs_on_weekday(d))
            })
            .collect();

        for exception in exceptions {
            let idx = (exception.date - start).num_days() as usize;
            days[idx] = exception.exception_type == ExceptionType::Added;
        }

        Some(Self { start, days })
    }

    /// A validity that runs every day in `start..=end`.
    pub fn every_day(start: NaiveDate, end: NaiveDate) -> Self {
        let days = start.iter_days().take_while(|d| *d <= end).map(|_| true).collect();
        Self { start, days }
    }

    /// Returns true if the service runs on `date`.
    pub fn is_active(&self, date: NaiveDate) -> bool {
        let offset = (date - self.start).num_days();
        if offset < 0 {
            return false;
        }
        self.days.get(offset as usize).copied().unwrap_or(false)
    }

    /// Returns the number of days the service runs.
    pub fn active_day_count(&self) -> usize {
        self.days.iter().filter(|d| **d).count()
    }
}
