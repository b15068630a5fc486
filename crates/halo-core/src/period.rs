//! Resolution of named timeframes into comparable current/previous windows.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// An instant range that includes both of its ends.
///
/// A window whose `start` lies after its `end` is empty: nothing is contained.
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Both boundaries are inclusive, so an instant equal to the shared edge of
    /// two adjacent windows is counted by each of them.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// The window of identical duration ending 1ms before this one starts.
    pub fn preceding(&self) -> Self {
        let end = self.start - Duration::milliseconds(1);
        let start = end - self.duration();
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Named selector for the dashboard and report windows.
pub enum Timeframe {
    Today,
    Last7Days,
    Last30Days,
    YearToDate,
    Custom { start: NaiveDate, end: NaiveDate },
    AllTime,
}

impl Timeframe {
    /// Parses a timeframe name; `custom` takes its dates from the extra arguments.
    pub fn parse(
        name: &str,
        custom_start: Option<NaiveDate>,
        custom_end: Option<NaiveDate>,
    ) -> Result<Self, CoreError> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        let timeframe = match normalized.as_str() {
            "today" | "daily" => Timeframe::Today,
            "last7days" | "7d" | "weekly" => Timeframe::Last7Days,
            "last30days" | "30d" | "monthly" => Timeframe::Last30Days,
            "yeartodate" | "ytd" => Timeframe::YearToDate,
            "all" | "alltime" => Timeframe::AllTime,
            "custom" => match (custom_start, custom_end) {
                (Some(start), Some(end)) => Timeframe::Custom { start, end },
                _ => {
                    return Err(CoreError::Validation(
                        "custom timeframe requires a start and an end date".into(),
                    ))
                }
            },
            other => {
                return Err(CoreError::Validation(format!(
                    "unknown timeframe `{other}`"
                )))
            }
        };
        Ok(timeframe)
    }

    pub fn label(&self) -> String {
        match self {
            Timeframe::Today => "Today".into(),
            Timeframe::Last7Days => "Last 7 Days".into(),
            Timeframe::Last30Days => "Last 30 Days".into(),
            Timeframe::YearToDate => "Year to Date".into(),
            Timeframe::Custom { start, end } => format!("{start} to {end}"),
            Timeframe::AllTime => "All Time".into(),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Timeframe::parse(value, None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of resolving a [`Timeframe`].
pub enum ResolvedPeriod {
    /// No filtering; there is no previous period to compare against.
    AllTime,
    Bounded {
        current: PeriodWindow,
        previous: PeriodWindow,
    },
}

impl ResolvedPeriod {
    pub fn current(&self) -> Option<&PeriodWindow> {
        match self {
            ResolvedPeriod::AllTime => None,
            ResolvedPeriod::Bounded { current, .. } => Some(current),
        }
    }

    pub fn previous(&self) -> Option<&PeriodWindow> {
        match self {
            ResolvedPeriod::AllTime => None,
            ResolvedPeriod::Bounded { previous, .. } => Some(previous),
        }
    }
}

/// Resolves `timeframe` relative to `now`. Midnight and end-of-day are taken in
/// the business's local `offset`.
pub fn resolve(timeframe: Timeframe, now: DateTime<Utc>, offset: FixedOffset) -> ResolvedPeriod {
    let today = now.with_timezone(&offset).date_naive();
    let current = match timeframe {
        Timeframe::AllTime => return ResolvedPeriod::AllTime,
        Timeframe::Today => PeriodWindow::new(start_of_day(today, offset), now),
        Timeframe::Last7Days => {
            PeriodWindow::new(start_of_day(today - Duration::days(6), offset), now)
        }
        Timeframe::Last30Days => {
            PeriodWindow::new(start_of_day(today - Duration::days(29), offset), now)
        }
        Timeframe::YearToDate => {
            let jan_first = today - Duration::days(i64::from(today.ordinal0()));
            PeriodWindow::new(start_of_day(jan_first, offset), now)
        }
        Timeframe::Custom { start, end } => {
            PeriodWindow::new(start_of_day(start, offset), end_of_day(end, offset))
        }
    };
    let previous = current.preceding();
    tracing::debug!(
        %timeframe,
        start = %current.start,
        end = %current.end,
        "resolved reporting period"
    );
    ResolvedPeriod::Bounded { current, previous }
}

/// Local midnight of `date`, expressed in UTC.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), offset)
}

/// The last millisecond of `date` in local time, expressed in UTC.
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    start_of_day(date, offset) + Duration::days(1) - Duration::milliseconds(1)
}

pub fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn today_starts_at_local_midnight() {
        // 2024-03-10 09:30 in Manila
        let now = at(2024, 3, 10, 1, 30);
        let resolved = resolve(Timeframe::Today, now, manila());
        let current = resolved.current().unwrap();
        assert_eq!(current.start, at(2024, 3, 9, 16, 0));
        assert_eq!(current.end, now);
    }

    #[test]
    fn last_seven_days_includes_today() {
        let now = at(2024, 3, 10, 12, 0);
        let utc = FixedOffset::east_opt(0).unwrap();
        let resolved = resolve(Timeframe::Last7Days, now, utc);
        assert_eq!(resolved.current().unwrap().start, at(2024, 3, 4, 0, 0));
    }

    #[test]
    fn last_thirty_days_reaches_back_twenty_nine_days() {
        let now = at(2024, 3, 30, 12, 0);
        let utc = FixedOffset::east_opt(0).unwrap();
        let resolved = resolve(Timeframe::Last30Days, now, utc);
        assert_eq!(resolved.current().unwrap().start, at(2024, 3, 1, 0, 0));
    }

    #[test]
    fn year_to_date_starts_on_january_first() {
        let now = at(2024, 7, 15, 12, 0);
        let utc = FixedOffset::east_opt(0).unwrap();
        let resolved = resolve(Timeframe::YearToDate, now, utc);
        assert_eq!(resolved.current().unwrap().start, at(2024, 1, 1, 0, 0));
    }

    #[test]
    fn previous_window_ends_one_millisecond_before_current() {
        let now = at(2024, 3, 10, 12, 0);
        let utc = FixedOffset::east_opt(0).unwrap();
        let ResolvedPeriod::Bounded { current, previous } =
            resolve(Timeframe::Last7Days, now, utc)
        else {
            panic!("expected a bounded period");
        };
        assert_eq!(previous.end, current.start - Duration::milliseconds(1));
        assert_eq!(previous.duration(), current.duration());
    }

    #[test]
    fn custom_window_spans_whole_days() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let resolved = resolve(Timeframe::Custom { start, end }, at(2024, 6, 1, 0, 0), utc);
        let current = resolved.current().unwrap();
        assert_eq!(current.start, at(2024, 2, 1, 0, 0));
        assert_eq!(
            current.end,
            at(2024, 3, 1, 0, 0) - Duration::milliseconds(1)
        );
    }

    #[test]
    fn inverted_custom_window_is_empty() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let resolved = resolve(Timeframe::Custom { start, end }, at(2024, 6, 1, 0, 0), utc);
        let current = resolved.current().unwrap();
        assert!(current.is_empty());
        assert!(!current.contains(at(2024, 2, 5, 0, 0)));
        assert!(!resolved.previous().unwrap().contains(at(2024, 2, 5, 0, 0)));
    }

    #[test]
    fn all_time_has_no_windows() {
        let resolved = resolve(Timeframe::AllTime, at(2024, 1, 1, 0, 0), manila());
        assert_eq!(resolved, ResolvedPeriod::AllTime);
        assert!(resolved.previous().is_none());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let window = PeriodWindow::new(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0));
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
    }

    #[test]
    fn parses_aliases_and_requires_custom_dates() {
        assert_eq!("ytd".parse::<Timeframe>().unwrap(), Timeframe::YearToDate);
        assert_eq!("last-7-days".parse::<Timeframe>().unwrap(), Timeframe::Last7Days);
        assert!(Timeframe::parse("custom", None, None).is_err());
        assert!("fortnight".parse::<Timeframe>().is_err());
    }
}
