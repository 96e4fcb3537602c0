use chrono::{Datelike, NaiveDate};

/// Inclusive range of calendar days, iterated one day at a time.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Every day of a calendar year, or `None` if the year is outside chrono's range.
    pub fn calendar_year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(DateRange(start, end))
    }

    /// Number of days still to be yielded.
    pub fn day_count(&self) -> usize {
        if self.0 > self.1 {
            0
        } else {
            (self.1 - self.0).num_days() as usize + 1
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0 <= *date && *date <= self.1
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > self.1 {
            return None;
        }
        let current = self.0;
        match current.succ_opt() {
            Some(next) => self.0 = next,
            // Last representable date: make the range empty.
            None => self.1 = current.pred_opt().unwrap_or(current),
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.day_count();
        (n, Some(n))
    }
}
