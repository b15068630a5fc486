//! Text formatting and argument parsing shared by the command handlers.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cli::context::CommandError;

/// `PHP 1,234.50`; negative amounts keep their sign after the currency code.
pub fn money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{currency} {sign}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Signed percent with one decimal; `N/A` when the change has no finite value.
pub fn change(percent: f64) -> String {
    if percent.is_finite() {
        format!("{percent:+.1}%")
    } else {
        "N/A".to_string()
    }
}

/// First eight characters after the id prefix, enough to tell records apart.
pub fn short_id(id: &str) -> &str {
    let body = id.split_once('-').map_or(id, |(_, rest)| rest);
    body.get(..8).unwrap_or(body)
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

/// Largest magnitude accepted for amounts, rates and hours typed at the shell.
const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000;

pub(crate) fn parse_amount(input: &str) -> Result<Decimal, CommandError> {
    let amount = Decimal::from_str(input.trim().replace(',', "").as_str())
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{input}`")))?;
    if amount.abs() > Decimal::from(AMOUNT_LIMIT) {
        return Err(CommandError::InvalidArguments(format!(
            "amount `{input}` is out of range"
        )));
    }
    Ok(amount)
}

pub(crate) fn parse_enum<T: FromStr<Err = String>>(input: &str) -> Result<T, CommandError> {
    input.parse().map_err(CommandError::InvalidArguments)
}

pub(crate) fn require<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(dec!(11118.75), "PHP"), "PHP 11,118.75");
        assert_eq!(money(dec!(2332164), "PHP"), "PHP 2,332,164.00");
        assert_eq!(money(dec!(-250.5), "PHP"), "PHP -250.50");
        assert_eq!(money(dec!(0), "USD"), "USD 0.00");
    }

    #[test]
    fn infinite_change_is_not_applicable() {
        assert_eq!(change(12.345), "+12.3%");
        assert_eq!(change(-50.0), "-50.0%");
        assert_eq!(change(f64::INFINITY), "N/A");
        assert_eq!(change(f64::NEG_INFINITY), "N/A");
        assert_eq!(change(f64::NAN), "N/A");
    }

    #[test]
    fn short_ids_drop_the_prefix() {
        assert_eq!(short_id("txn-3f2a9c01aa55"), "3f2a9c01");
        assert_eq!(short_id("emp1"), "emp1");
    }

    #[test]
    fn amounts_accept_grouping_commas() {
        assert_eq!(parse_amount("1,500.25").unwrap(), dec!(1500.25));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("79228162514264337593543950335").is_err());
        assert!(parse_amount("-2000000000000000").is_err());
        assert_eq!(parse_amount("1000000000000000").unwrap(), dec!(1000000000000000));
        assert!(parse_date("2024-02-30").is_err());
    }
}
