use crate::error::InvalidRangeError;
use chrono::NaiveDate;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    cursor: Option<NaiveDate>,
}

impl DateRange {
    /// Build an inclusive range. Fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidRangeError> {
        if start > end {
            return Err(InvalidRangeError { start, end });
        }
        Ok(Self {
            start,
            end,
            cursor: Some(start),
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range, endpoints included.
    pub fn days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.succ_opt().filter(|next| *next <= self.end);
        Some(current)
    }
}
