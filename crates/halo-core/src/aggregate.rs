//! Income and expense totals per period, grouped breakdowns, and
//! period-over-period comparison.

use chrono::{FixedOffset, NaiveDate};
use halo_domain::{Transaction, TransactionKind};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;

use crate::period::{PeriodWindow, ResolvedPeriod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Key used to group expenses.
pub enum ExpenseGrouping {
    #[default]
    Category,
    Vendor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
/// Sums over one window. Groups keep the order their keys were first seen in.
pub struct Aggregate {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub count: usize,
    pub income_by_source: Vec<GroupTotal>,
    pub expenses_by_group: Vec<GroupTotal>,
}

impl Aggregate {
    pub fn income_sorted(&self) -> Vec<GroupTotal> {
        sorted_descending(&self.income_by_source)
    }

    pub fn expenses_sorted(&self) -> Vec<GroupTotal> {
        sorted_descending(&self.expenses_by_group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Percent changes against the previous window. Values may be infinite when the
/// previous figure was zero.
pub struct ChangeSet {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodComparison {
    pub period: ResolvedPeriod,
    pub current: Aggregate,
    /// Absent for all-time views.
    pub previous: Option<Aggregate>,
    pub change: Option<ChangeSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Profit and loss statement for a window, line items sorted by amount.
pub struct ProfitAndLoss {
    pub income_items: Vec<GroupTotal>,
    pub expense_items: Vec<GroupTotal>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

pub struct AggregationService;

impl AggregationService {
    /// Records inside `window`; every record when there is no window.
    pub fn filter<'a>(
        records: &'a [Transaction],
        window: Option<&PeriodWindow>,
    ) -> Vec<&'a Transaction> {
        records
            .iter()
            .filter(|txn| window.map_or(true, |w| w.contains(txn.date)))
            .collect()
    }

    pub fn aggregate(
        records: &[Transaction],
        window: Option<&PeriodWindow>,
        grouping: ExpenseGrouping,
    ) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for txn in Self::filter(records, window) {
            aggregate.count += 1;
            match &txn.kind {
                TransactionKind::Income { source, .. } => {
                    aggregate.income += txn.amount;
                    accumulate(&mut aggregate.income_by_source, source, txn.amount);
                }
                TransactionKind::Expense { vendor, .. } => {
                    aggregate.expenses += txn.amount;
                    let key = match grouping {
                        ExpenseGrouping::Category => txn.category.as_str(),
                        ExpenseGrouping::Vendor => vendor.as_str(),
                    };
                    accumulate(&mut aggregate.expenses_by_group, key, txn.amount);
                }
            }
        }
        aggregate.net = aggregate.income - aggregate.expenses;
        aggregate
    }

    /// Aggregates the current window and, unless all-time, the previous one.
    pub fn compare(
        records: &[Transaction],
        period: &ResolvedPeriod,
        grouping: ExpenseGrouping,
    ) -> PeriodComparison {
        let current = Self::aggregate(records, period.current(), grouping);
        let previous = period
            .previous()
            .map(|window| Self::aggregate(records, Some(window), grouping));
        let change = previous.as_ref().map(|prev| ChangeSet {
            income: change_percent(current.income, prev.income),
            expenses: change_percent(current.expenses, prev.expenses),
            net: change_percent(current.net, prev.net),
        });
        tracing::debug!(
            records = records.len(),
            matched = current.count,
            income = %current.income,
            expenses = %current.expenses,
            "aggregated period"
        );
        PeriodComparison {
            period: *period,
            current,
            previous,
            change,
        }
    }

    /// Per-day income and expense totals keyed by local calendar date, ascending.
    pub fn daily_series(
        records: &[Transaction],
        window: Option<&PeriodWindow>,
        offset: FixedOffset,
    ) -> Vec<DailyTotals> {
        let mut days: Vec<DailyTotals> = Vec::new();
        for txn in Self::filter(records, window) {
            let date = txn.date.with_timezone(&offset).date_naive();
            let index = match days.iter().position(|day| day.date == date) {
                Some(index) => index,
                None => {
                    days.push(DailyTotals {
                        date,
                        income: Decimal::ZERO,
                        expenses: Decimal::ZERO,
                    });
                    days.len() - 1
                }
            };
            if txn.is_income() {
                days[index].income += txn.amount;
            } else {
                days[index].expenses += txn.amount;
            }
        }
        days.sort_by_key(|day| day.date);
        days
    }

    /// Income by source and expenses by category, each sorted descending.
    pub fn profit_and_loss(
        records: &[Transaction],
        window: Option<&PeriodWindow>,
    ) -> ProfitAndLoss {
        let aggregate = Self::aggregate(records, window, ExpenseGrouping::Category);
        ProfitAndLoss {
            income_items: aggregate.income_sorted(),
            expense_items: aggregate.expenses_sorted(),
            total_income: aggregate.income,
            total_expenses: aggregate.expenses,
            net_profit: aggregate.net,
        }
    }
}

/// Percent change from `previous` to `current`, relative to `|previous|`.
///
/// A zero baseline yields `0` when both are zero and `±∞` otherwise, signed like
/// `current`.
pub fn change_percent(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return if current.is_zero() {
            0.0
        } else if current.is_sign_positive() {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    let delta = current - previous;
    delta
        .checked_div(previous.abs())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|percent| percent.to_f64())
        .unwrap_or_else(|| {
            let delta = delta.to_f64().unwrap_or(0.0);
            let base = previous.abs().to_f64().unwrap_or(f64::MIN_POSITIVE);
            delta / base * 100.0
        })
}

pub fn sorted_descending(groups: &[GroupTotal]) -> Vec<GroupTotal> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted
}

fn accumulate(groups: &mut Vec<GroupTotal>, key: &str, amount: Decimal) {
    match groups.iter_mut().find(|group| group.key == key) {
        Some(group) => group.amount += amount,
        None => groups.push(GroupTotal {
            key: key.to_string(),
            amount,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use halo_domain::PaymentMethod;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 10, 0, 0).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::income(day(1), dec!(100), "Rooms", PaymentMethod::Cash, "Rooms"),
            Transaction::expense(day(2), dec!(30), "Utilities", PaymentMethod::Rcbc, "Meralco"),
            Transaction::income(day(3), dec!(50), "Tours", PaymentMethod::GCash, "Tours"),
            Transaction::income(day(4), dec!(25), "Rooms", PaymentMethod::Cash, "Rooms"),
            Transaction::expense(day(4), dec!(70), "F&B", PaymentMethod::Cash, "Market"),
        ]
    }

    #[test]
    fn aggregates_totals_and_groups_in_first_seen_order() {
        let aggregate =
            AggregationService::aggregate(&sample(), None, ExpenseGrouping::Category);
        assert_eq!(aggregate.income, dec!(175));
        assert_eq!(aggregate.expenses, dec!(100));
        assert_eq!(aggregate.net, dec!(75));
        let sources: Vec<_> = aggregate.income_by_source.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(sources, ["Rooms", "Tours"]);
        assert_eq!(aggregate.income_by_source[0].amount, dec!(125));
    }

    #[test]
    fn groups_expenses_by_vendor_when_requested() {
        let aggregate = AggregationService::aggregate(&sample(), None, ExpenseGrouping::Vendor);
        let vendors: Vec<_> = aggregate.expenses_by_group.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(vendors, ["Meralco", "Market"]);
    }

    #[test]
    fn sorted_views_are_descending() {
        let aggregate =
            AggregationService::aggregate(&sample(), None, ExpenseGrouping::Category);
        let expenses = aggregate.expenses_sorted();
        assert_eq!(expenses[0].key, "F&B");
        assert_eq!(expenses[1].key, "Utilities");
    }

    #[test]
    fn window_filter_is_inclusive() {
        let window = PeriodWindow::new(day(2), day(3));
        let aggregate =
            AggregationService::aggregate(&sample(), Some(&window), ExpenseGrouping::Category);
        assert_eq!(aggregate.count, 2);
        assert_eq!(aggregate.income, dec!(50));
        assert_eq!(aggregate.expenses, dec!(30));
    }

    #[test]
    fn change_percent_handles_zero_baseline() {
        assert_eq!(change_percent(dec!(0), dec!(0)), 0.0);
        assert_eq!(change_percent(dec!(5), dec!(0)), f64::INFINITY);
        assert_eq!(change_percent(dec!(-5), dec!(0)), f64::NEG_INFINITY);
    }

    #[test]
    fn change_percent_uses_absolute_baseline() {
        assert_eq!(change_percent(dec!(150), dec!(100)), 50.0);
        assert_eq!(change_percent(dec!(50), dec!(100)), -50.0);
        // net moving from -100 to 50 is an improvement
        assert_eq!(change_percent(dec!(50), dec!(-100)), 150.0);
    }

    #[test]
    fn all_time_comparison_has_no_previous() {
        let comparison = AggregationService::compare(
            &sample(),
            &ResolvedPeriod::AllTime,
            ExpenseGrouping::Category,
        );
        assert_eq!(comparison.current.count, 5);
        assert!(comparison.previous.is_none());
        assert!(comparison.change.is_none());
    }

    #[test]
    fn daily_series_merges_same_day_records() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let series = AggregationService::daily_series(&sample(), None, utc);
        assert_eq!(series.len(), 4);
        let fourth = &series[3];
        assert_eq!(fourth.income, dec!(25));
        assert_eq!(fourth.expenses, dec!(70));
    }

    #[test]
    fn profit_and_loss_totals_match_aggregate() {
        let pnl = AggregationService::profit_and_loss(&sample(), None);
        assert_eq!(pnl.total_income, dec!(175));
        assert_eq!(pnl.net_profit, dec!(75));
        assert_eq!(pnl.income_items[0].key, "Rooms");
    }
}
