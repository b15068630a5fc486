//! Income/expense ledger: filtering, lookups, and bulk import.

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use halo_domain::{PaymentMethod, Transaction, TransactionType};

use crate::{
    csv_io,
    period::{end_of_day, start_of_day},
    storage::{RecordStore, Records},
    CoreError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub method: Option<PaymentMethod>,
    pub from: Option<NaiveDate>,
    /// Inclusive; extends to the end of that local day.
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction, offset: FixedOffset) -> bool {
        if self.kind.is_some_and(|kind| txn.transaction_type() != kind) {
            return false;
        }
        if self
            .category
            .as_deref()
            .is_some_and(|category| txn.category != category)
        {
            return false;
        }
        if self.method.as_ref().is_some_and(|method| &txn.method != method) {
            return false;
        }
        if self
            .from
            .is_some_and(|from| txn.date < start_of_day(from, offset))
        {
            return false;
        }
        if self.to.is_some_and(|to| txn.date > end_of_day(to, offset)) {
            return false;
        }
        self.search
            .as_deref()
            .map_or(true, |needle| txn.matches_text(needle))
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Matching records, newest first.
    pub fn filter<'a>(
        records: &'a [Transaction],
        filter: &TransactionFilter,
        offset: FixedOffset,
    ) -> Vec<&'a Transaction> {
        let mut matched: Vec<_> = records
            .iter()
            .filter(|txn| filter.matches(txn, offset))
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        matched
    }

    /// Distinct categories, sorted.
    pub fn categories(records: &[Transaction]) -> Vec<String> {
        let mut categories: Vec<String> = records.iter().map(|txn| txn.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Distinct payment methods, sorted by label.
    pub fn methods(records: &[Transaction]) -> Vec<PaymentMethod> {
        let mut methods: Vec<PaymentMethod> = records.iter().map(|txn| txn.method.clone()).collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods.dedup();
        methods
    }

    pub fn add(store: &dyn RecordStore, txn: Transaction) -> Result<Transaction, CoreError> {
        if txn.amount.is_sign_negative() && !txn.amount.is_zero() {
            return Err(CoreError::Validation("transaction amount must not be negative".into()));
        }
        Records::add(store, txn)
    }

    pub fn update<F>(store: &dyn RecordStore, id: &str, now: DateTime<Utc>, change: F) -> Result<Transaction, CoreError>
    where
        F: FnOnce(&mut Transaction),
    {
        Records::update(store, id, |txn: &mut Transaction| {
            change(txn);
            txn.updated_at = now;
            Ok(())
        })
    }

    pub fn delete(store: &dyn RecordStore, id: &str) -> Result<Transaction, CoreError> {
        Records::delete(store, id)
    }

    /// Parses a CSV upload and stores every row, or nothing if any row fails.
    pub fn import_csv<R: Read>(
        store: &dyn RecordStore,
        reader: R,
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, CoreError> {
        let parsed = csv_io::parse_transactions_csv(reader, offset, now)?;
        let saved = Records::add_batch(store, parsed)?;
        tracing::info!(count = saved.len(), "imported transactions");
        Ok(saved)
    }
}
