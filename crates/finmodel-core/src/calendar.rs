use chrono::{Datelike, Months, NaiveDate};

use crate::error::ModelError;
use crate::types::PeriodIndex;
use crate::ModelResult;

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> ModelResult<NaiveDate> {
    let first = date
        .with_day(1)
        .ok_or_else(|| ModelError::DateError(format!("No first day for {date}")))?;
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| ModelError::DateError(format!("Month end of {date} is out of range")))
}

/// Month-end date of every period: period 0 closes the start month and each
/// later period closes the following calendar month.
pub fn period_end_dates(start: NaiveDate, num_periods: PeriodIndex) -> ModelResult<Vec<NaiveDate>> {
    let first = start
        .with_day(1)
        .ok_or_else(|| ModelError::DateError(format!("No first day for {start}")))?;

    (0..num_periods)
        .map(|p| {
            let months = u32::try_from(p)
                .map_err(|_| ModelError::DateError(format!("Period {p} is out of range")))?;
            let month_start = first.checked_add_months(Months::new(months)).ok_or_else(|| {
                ModelError::DateError(format!("Period {p} after {start} is out of range"))
            })?;
            month_end(month_start)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_end_mid_month() {
        assert_eq!(month_end(date(2021, 12, 15)).unwrap(), date(2021, 12, 31));
        assert_eq!(month_end(date(2022, 4, 1)).unwrap(), date(2022, 4, 30));
    }

    #[test]
    fn test_twelve_periods_from_december() {
        let dates = period_end_dates(date(2021, 12, 1), 12).unwrap();
        assert_eq!(dates.len(), 12);
        assert_eq!(dates[0], date(2021, 12, 31));
        assert_eq!(dates[1], date(2022, 1, 31));
        assert_eq!(dates[2], date(2022, 2, 28));
        assert_eq!(dates[3], date(2022, 3, 31));
        assert_eq!(dates[11], date(2022, 11, 30));
    }

    #[test]
    fn test_leap_february() {
        let dates = period_end_dates(date(2024, 1, 31), 3).unwrap();
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
    }

    #[test]
    fn test_zero_periods_is_empty() {
        assert!(period_end_dates(date(2024, 1, 1), 0).unwrap().is_empty());
    }
}
