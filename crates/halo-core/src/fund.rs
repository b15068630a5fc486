use chrono::{DateTime, Utc};
use halo_domain::FundAccount;
use rust_decimal::Decimal;

use crate::{
    storage::{RecordStore, Records},
    CoreError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FundTotals {
    pub total_assets: Decimal,
    /// No liability accounts are tracked yet, so this is always zero.
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
}

pub fn fund_totals(accounts: &[FundAccount]) -> FundTotals {
    let total_assets: Decimal = accounts.iter().map(|account| account.balance).sum();
    let total_liabilities = Decimal::ZERO;
    FundTotals {
        total_assets,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
    }
}

pub struct FundService;

impl FundService {
    pub fn add(store: &dyn RecordStore, account: FundAccount) -> Result<FundAccount, CoreError> {
        if account.name.trim().is_empty() {
            return Err(CoreError::Validation("account name must not be empty".into()));
        }
        Records::add(store, account)
    }

    pub fn delete(store: &dyn RecordStore, account_id: &str) -> Result<FundAccount, CoreError> {
        Records::delete(store, account_id)
    }

    pub fn totals(store: &dyn RecordStore) -> Result<FundTotals, CoreError> {
        let accounts: Vec<FundAccount> = Records::list(store)?;
        Ok(fund_totals(&accounts))
    }

    pub fn set_balance(
        store: &dyn RecordStore,
        account_id: &str,
        balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<FundAccount, CoreError> {
        Records::update(store, account_id, |account: &mut FundAccount| {
            account.balance = balance;
            account.last_updated = now;
            Ok(())
        })
    }

    pub fn toggle_hidden(store: &dyn RecordStore, account_id: &str) -> Result<FundAccount, CoreError> {
        Records::update(store, account_id, |account: &mut FundAccount| {
            account.is_hidden = !account.is_hidden;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_domain::FundAccountType;
    use rust_decimal_macros::dec;

    #[test]
    fn net_worth_equals_assets_without_liabilities() {
        let accounts = vec![
            FundAccount::new("RCBC Savings", FundAccountType::Checking, "RCBC", dec!(120000)),
            FundAccount::new("Petty Cash", FundAccountType::Cash, "On hand", dec!(8500.50)),
        ];
        let totals = fund_totals(&accounts);
        assert_eq!(totals.total_assets, dec!(128500.50));
        assert_eq!(totals.total_liabilities, Decimal::ZERO);
        assert_eq!(totals.net_worth, dec!(128500.50));
    }
}
