// 📅 Period Axis Generator - the x-axis shared by every chart
//
// An axis is an ordered list of period boundary dates:
//   day   → every calendar date
//   week  → end of ISO week (Sunday)
//   month → last day of the month
//
// Period i covers (axis[i-1], axis[i]]; period 0 covers its own calendar unit.
// Boundaries are contiguous, strictly increasing and never duplicated.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FlowError;

// ============================================================================
// GRANULARITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Boundary date of the period containing `date`
    pub fn snap(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => end_of_week(date),
            Granularity::Month => end_of_month(date),
        }
    }

    /// First calendar date of the period ending at `boundary`
    pub fn period_start(&self, boundary: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => boundary,
            Granularity::Week => boundary
                .checked_sub_signed(Duration::days(6))
                .unwrap_or(NaiveDate::MIN),
            Granularity::Month => boundary.with_day(1).unwrap_or(boundary),
        }
    }

    fn next_boundary(&self, boundary: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => boundary.succ_opt(),
            Granularity::Week => boundary.checked_add_signed(Duration::days(7)),
            Granularity::Month => boundary.succ_opt().map(end_of_month),
        }
    }
}

impl FromStr for Granularity {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(FlowError::InvalidGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CALENDAR HELPERS
// ============================================================================

/// Sunday closing the ISO week of `date`
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let days_left = 6 - date.weekday().num_days_from_monday() as i64;
    date.checked_add_signed(Duration::days(days_left))
        .unwrap_or(NaiveDate::MAX)
}

/// Last day of the month of `date`
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Midnight UTC at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

// ============================================================================
// PERIOD AXIS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAxis {
    pub granularity: Granularity,
    boundaries: Vec<NaiveDate>,
}

/// Build the axis spanning `[start_date, end_date]` at `granularity`.
///
/// `start_date > end_date` yields an empty axis.
pub fn axis(start_date: NaiveDate, end_date: NaiveDate, granularity: Granularity) -> PeriodAxis {
    let mut boundaries = Vec::new();

    if start_date <= end_date {
        let last = granularity.snap(end_date);
        let mut current = granularity.snap(start_date);

        while current <= last {
            boundaries.push(current);
            match granularity.next_boundary(current) {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    tracing::debug!(
        %start_date,
        %end_date,
        %granularity,
        periods = boundaries.len(),
        "built period axis"
    );

    PeriodAxis {
        granularity,
        boundaries,
    }
}

/// Same as [`axis`], truncating time components first
pub fn axis_between(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> PeriodAxis {
    axis(start.date_naive(), end.date_naive(), granularity)
}

impl PeriodAxis {
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn boundaries(&self) -> &[NaiveDate] {
        &self.boundaries
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.boundaries.get(index).copied()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.boundaries.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.boundaries.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.boundaries.iter()
    }

    /// First calendar date covered by period `index`
    pub fn period_start(&self, index: usize) -> Option<NaiveDate> {
        self.get(index).map(|boundary| self.granularity.period_start(boundary))
    }

    /// Half-open UTC window `[start, end)` covered by period `index`
    pub fn period_window(&self, index: usize) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let boundary = self.get(index)?;
        let start = start_of_day(self.granularity.period_start(boundary));
        let end = start_of_day(boundary)
            .checked_add_signed(Duration::days(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Some((start, end))
    }

    /// Half-open UTC window covering the whole axis
    pub fn range_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, _) = self.period_window(0)?;
        let (_, end) = self.period_window(self.len() - 1)?;
        Some((start, end))
    }

    /// Index of the period containing `date`, None when outside the axis
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let index = self.boundaries.partition_point(|boundary| *boundary < date);
        if index >= self.len() {
            return None;
        }
        match self.period_start(index) {
            Some(start) if date >= start => Some(index),
            _ => None,
        }
    }

    /// Number of leading periods that have started by `date`
    pub fn periods_started_by(&self, date: NaiveDate) -> usize {
        (0..self.len())
            .take_while(|&i| self.period_start(i).map_or(false, |start| start <= date))
            .count()
    }

    /// ISO date labels, one per period
    pub fn labels(&self) -> Vec<String> {
        self.boundaries
            .iter()
            .map(|boundary| boundary.format("%Y-%m-%d").to_string())
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_axis_is_inclusive() {
        let axis = axis(date(2024, 2, 27), date(2024, 3, 2), Granularity::Day);

        assert_eq!(axis.len(), 5);
        assert_eq!(axis.first(), Some(date(2024, 2, 27)));
        assert_eq!(axis.get(2), Some(date(2024, 2, 29)));
        assert_eq!(axis.last(), Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_week_axis_snaps_to_sunday() {
        // 2024-03-06 is a Wednesday, 2024-03-20 a Wednesday
        let axis = axis(date(2024, 3, 6), date(2024, 3, 20), Granularity::Week);

        assert_eq!(
            axis.boundaries(),
            &[date(2024, 3, 10), date(2024, 3, 17), date(2024, 3, 24)]
        );
    }

    #[test]
    fn test_week_axis_same_week_has_one_element() {
        let axis = axis(date(2024, 3, 4), date(2024, 3, 10), Granularity::Week);
        assert_eq!(axis.boundaries(), &[date(2024, 3, 10)]);
    }

    #[test]
    fn test_month_axis_handles_short_months() {
        let axis = axis(date(2024, 1, 15), date(2024, 4, 1), Granularity::Month);

        assert_eq!(
            axis.boundaries(),
            &[date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn test_month_axis_crosses_year() {
        let axis = axis(date(2023, 11, 30), date(2024, 1, 1), Granularity::Month);
        assert_eq!(
            axis.boundaries(),
            &[date(2023, 11, 30), date(2023, 12, 31), date(2024, 1, 31)]
        );
    }

    #[test]
    fn test_start_after_end_is_empty() {
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let axis = axis(date(2024, 3, 10), date(2024, 3, 9), granularity);
            assert!(axis.is_empty());
            assert!(axis.range_window().is_none());
        }
    }

    #[test]
    fn test_axis_between_truncates_time() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 3, 0, 1, 0).unwrap();
        assert_eq!(axis_between(start, end, Granularity::Day).len(), 3);
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("week".parse::<Granularity>(), Ok(Granularity::Week));
        assert_eq!(" Month ".parse::<Granularity>(), Ok(Granularity::Month));
        assert_eq!(
            "quarter".parse::<Granularity>(),
            Err(FlowError::InvalidGranularity("quarter".to_string()))
        );
    }

    #[test]
    fn test_index_of() {
        let axis = axis(date(2024, 3, 6), date(2024, 3, 20), Granularity::Week);

        assert_eq!(axis.index_of(date(2024, 3, 4)), Some(0));
        assert_eq!(axis.index_of(date(2024, 3, 10)), Some(0));
        assert_eq!(axis.index_of(date(2024, 3, 11)), Some(1));
        assert_eq!(axis.index_of(date(2024, 3, 24)), Some(2));
        assert_eq!(axis.index_of(date(2024, 3, 3)), None);
        assert_eq!(axis.index_of(date(2024, 3, 25)), None);
    }

    #[test]
    fn test_period_window() {
        let axis = axis(date(2024, 2, 1), date(2024, 2, 29), Granularity::Month);
        let (start, end) = axis.period_window(0).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_calendar_limits_do_not_overflow() {
        assert_eq!(Granularity::Week.period_start(NaiveDate::MIN), NaiveDate::MIN);

        let last_day = axis(NaiveDate::MAX, NaiveDate::MAX, Granularity::Day);
        let (start, end) = last_day.period_window(0).unwrap();

        assert_eq!(start, start_of_day(NaiveDate::MAX));
        assert!(end > start);
    }

    #[test]
    fn test_periods_started_by() {
        let axis = axis(date(2024, 3, 6), date(2024, 3, 20), Granularity::Week);

        assert_eq!(axis.periods_started_by(date(2024, 3, 1)), 0);
        assert_eq!(axis.periods_started_by(date(2024, 3, 11)), 2);
        assert_eq!(axis.periods_started_by(date(2024, 6, 1)), 3);
    }

    #[test]
    fn test_labels() {
        let axis = axis(date(2024, 3, 1), date(2024, 3, 2), Granularity::Day);
        assert_eq!(axis.labels(), vec!["2024-03-01", "2024-03-02"]);
    }

    fn any_granularity() -> impl Strategy<Value = Granularity> {
        prop_oneof![
            Just(Granularity::Day),
            Just(Granularity::Week),
            Just(Granularity::Month),
        ]
    }

    proptest! {
        #[test]
        fn axis_is_strictly_increasing(
            offset in 0i64..3000,
            span in -60i64..800,
            granularity in any_granularity(),
        ) {
            let start = date(2018, 1, 1) + Duration::days(offset);
            let end = start + Duration::days(span);
            let axis = axis(start, end, granularity);

            prop_assert!(axis.boundaries().windows(2).all(|pair| pair[0] < pair[1]));
            if span < 0 {
                prop_assert!(axis.is_empty());
            } else {
                prop_assert_eq!(axis.first(), Some(granularity.snap(start)));
                prop_assert_eq!(axis.last(), Some(granularity.snap(end)));
            }
        }

        #[test]
        fn day_axis_length_matches_span(offset in 0i64..3000, span in -30i64..400) {
            let start = date(2018, 1, 1) + Duration::days(offset);
            let end = start + Duration::days(span);
            let expected = if span >= 0 { span as usize + 1 } else { 0 };

            prop_assert_eq!(axis(start, end, Granularity::Day).len(), expected);
        }
    }
}
