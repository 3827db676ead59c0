use chrono::{Datelike, Month, NaiveDate, Weekday};

use crate::analysis::ordered::InsertionOrderedMap;
use crate::models::{ContributionDay, ProductivePeriod};

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn month_name(date: NaiveDate) -> &'static str {
    Month::try_from(date.month() as u8)
        .map(|month| month.name())
        .unwrap_or("Unknown")
}

#[derive(Debug, Clone, Default)]
pub struct CalendarTotals {
    pub by_weekday: InsertionOrderedMap<&'static str, u64>,
    pub by_month: InsertionOrderedMap<&'static str, u64>,
}

impl CalendarTotals {
    /// Sums contributions per weekday and per month, in delivery order.
    pub fn collect<'a, I>(days: I) -> Self
    where
        I: IntoIterator<Item = &'a ContributionDay>,
    {
        let mut totals = Self::default();
        for day in days {
            totals.by_weekday.add(weekday_name(day.date), day.contribution_count);
            totals.by_month.add(month_name(day.date), day.contribution_count);
        }
        totals
    }

    pub fn most_productive_day(&self) -> Option<ProductivePeriod> {
        best_period(&self.by_weekday)
    }

    pub fn most_productive_month(&self) -> Option<ProductivePeriod> {
        best_period(&self.by_month)
    }
}

fn best_period(totals: &InsertionOrderedMap<&'static str, u64>) -> Option<ProductivePeriod> {
    totals.max_entry().map(|(name, contributions)| ProductivePeriod {
        name: name.to_string(),
        contributions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32, count: u64) -> ContributionDay {
        ContributionDay {
            contribution_count: count,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        }
    }

    #[test]
    fn test_names_come_from_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(weekday_name(date), "Monday");
        assert_eq!(month_name(date), "January");
        assert_eq!(month_name(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()), "December");
    }

    #[test]
    fn test_weekday_tie_goes_to_first_seen() {
        // 2025-01-06 is a Monday
        let days = vec![
            day(2025, 1, 6, 4),
            day(2025, 1, 7, 7),
            day(2025, 1, 13, 6),
            day(2025, 1, 14, 3),
        ];
        let totals = CalendarTotals::collect(&days);

        assert_eq!(
            totals.most_productive_day(),
            Some(ProductivePeriod {
                name: "Monday".to_string(),
                contributions: 10
            })
        );
    }

    #[test]
    fn test_month_aggregation() {
        let days = vec![day(2025, 1, 31, 2), day(2025, 2, 1, 5), day(2025, 2, 2, 1)];
        let totals = CalendarTotals::collect(&days);

        let month = totals.most_productive_month().unwrap();
        assert_eq!(month.name, "February");
        assert_eq!(month.contributions, 6);
    }

    #[test]
    fn test_zero_days() {
        let totals = CalendarTotals::collect(&Vec::<ContributionDay>::new());
        assert_eq!(totals.most_productive_day(), None);
        assert_eq!(totals.most_productive_month(), None);
    }

    #[test]
    fn test_all_zero_counts_pick_first_weekday() {
        let days = vec![day(2025, 3, 5, 0), day(2025, 3, 6, 0)];
        let totals = CalendarTotals::collect(&days);
        let best = totals.most_productive_day().unwrap();
        assert_eq!(best.name, "Wednesday");
        assert_eq!(best.contributions, 0);
    }
}
