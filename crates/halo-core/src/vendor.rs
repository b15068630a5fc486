//! Vendor balances derived from charge/payment history.

use chrono::{DateTime, Utc};
use halo_domain::{Vendor, VendorTransaction, VendorTransactionType};
use rust_decimal::Decimal;

use crate::{
    storage::{RecordStore, Records},
    CoreError,
};

/// `Σ charges − Σ payments` for `vendor_id`; positive means the business owes.
pub fn vendor_balance(vendor_id: &str, transactions: &[VendorTransaction]) -> Decimal {
    transactions
        .iter()
        .filter(|txn| txn.vendor_id == vendor_id)
        .map(|txn| match txn.kind {
            VendorTransactionType::Charge => txn.amount,
            VendorTransactionType::Payment => -txn.amount,
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorBalance {
    pub vendor: Vendor,
    pub balance: Decimal,
}

pub struct VendorService;

impl VendorService {
    pub fn with_balances(vendors: Vec<Vendor>, transactions: &[VendorTransaction]) -> Vec<VendorBalance> {
        vendors
            .into_iter()
            .map(|vendor| {
                let balance = vendor_balance(&vendor.id, transactions);
                VendorBalance { vendor, balance }
            })
            .collect()
    }

    pub fn list_with_balances(store: &dyn RecordStore) -> Result<Vec<VendorBalance>, CoreError> {
        let vendors: Vec<Vendor> = Records::list(store)?;
        let transactions: Vec<VendorTransaction> = Records::list(store)?;
        Ok(Self::with_balances(vendors, &transactions))
    }

    pub fn add(store: &dyn RecordStore, vendor: Vendor) -> Result<Vendor, CoreError> {
        if vendor.name.trim().is_empty() {
            return Err(CoreError::Validation("vendor name must not be empty".into()));
        }
        Records::add(store, vendor)
    }

    pub fn update<F>(store: &dyn RecordStore, vendor_id: &str, now: DateTime<Utc>, change: F) -> Result<Vendor, CoreError>
    where
        F: FnOnce(&mut Vendor),
    {
        Records::update(store, vendor_id, |vendor: &mut Vendor| {
            change(vendor);
            vendor.updated_at = now;
            Ok(())
        })
    }

    pub fn delete_transaction(store: &dyn RecordStore, transaction_id: &str) -> Result<VendorTransaction, CoreError> {
        Records::delete(store, transaction_id)
    }

    /// Total owed across all vendors.
    pub fn total_payable(balances: &[VendorBalance]) -> Decimal {
        balances.iter().map(|entry| entry.balance).sum()
    }

    pub fn record(store: &dyn RecordStore, txn: VendorTransaction) -> Result<VendorTransaction, CoreError> {
        if txn.amount.is_sign_negative() && !txn.amount.is_zero() {
            return Err(CoreError::Validation("vendor transaction amount must not be negative".into()));
        }
        Records::require::<Vendor>(store, &txn.vendor_id)?;
        let saved = Records::add(store, txn)?;
        tracing::info!(vendor = %saved.vendor_id, kind = %saved.kind, amount = %saved.amount, "vendor transaction recorded");
        Ok(saved)
    }

    /// Transactions for one vendor, newest date first.
    pub fn history(store: &dyn RecordStore, vendor_id: &str) -> Result<Vec<VendorTransaction>, CoreError> {
        let mut transactions: Vec<VendorTransaction> = Records::list(store)?;
        transactions.retain(|txn| txn.vendor_id == vendor_id);
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Removes the vendor together with its transaction history.
    pub fn delete(store: &dyn RecordStore, vendor_id: &str) -> Result<Vendor, CoreError> {
        let removed = Records::delete::<Vendor>(store, vendor_id)?;
        let cascaded = Records::retain::<VendorTransaction, _>(store, |txn| txn.vendor_id != vendor_id)?;
        tracing::info!(vendor = %vendor_id, transactions = cascaded, "vendor deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn balance_is_charges_minus_payments() {
        let txns = vec![
            VendorTransaction::charge("v1", dec!(5000), date(1)),
            VendorTransaction::payment("v1", dec!(3000), date(2)),
            VendorTransaction::charge("v2", dec!(999), date(3)),
        ];
        assert_eq!(vendor_balance("v1", &txns), dec!(2000));
        assert_eq!(vendor_balance("v2", &txns), dec!(999));
        assert_eq!(vendor_balance("missing", &txns), Decimal::ZERO);
    }

    #[test]
    fn overpayment_yields_negative_balance() {
        let txns = vec![
            VendorTransaction::charge("v1", dec!(100), date(1)),
            VendorTransaction::payment("v1", dec!(250), date(2)),
        ];
        assert_eq!(vendor_balance("v1", &txns), dec!(-150));
    }

    #[test]
    fn delete_cascades_transactions() {
        let store = MemoryStore::new();
        let keep = Records::add(&store, Vendor::new("Keep", "Supplies")).unwrap();
        let gone = Records::add(&store, Vendor::new("Gone", "Utilities")).unwrap();
        VendorService::record(&store, VendorTransaction::charge(&keep.id, dec!(10), date(1))).unwrap();
        VendorService::record(&store, VendorTransaction::charge(&gone.id, dec!(20), date(1))).unwrap();

        VendorService::delete(&store, &gone.id).unwrap();

        let remaining: Vec<VendorTransaction> = Records::list(&store).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].vendor_id, keep.id);
    }

    #[test]
    fn recording_for_unknown_vendor_fails() {
        let store = MemoryStore::new();
        let err = VendorService::record(&store, VendorTransaction::payment("ghost", dec!(1), date(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
