//! Invoice totals, numbering, and issuance.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use halo_domain::{new_id, Customer, Invoice, InvoiceStatus, LineItem, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    storage::{RecordStore, Records},
    CoreError,
};

/// Document key the persisted invoice counter lives under.
pub const INVOICE_COUNTER_KEY: &str = "invoice_counter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    /// The discount exceeded subtotal plus tax.
    pub fn is_negative(&self) -> bool {
        self.total.is_sign_negative() && !self.total.is_zero()
    }
}

/// `subtotal = Σ qty × price`; tax applies to the subtotal before the discount,
/// and a non-VAT invoice carries no tax. The total is not floored at zero.
pub fn compute_totals(
    line_items: &[LineItem],
    tax_rate_percent: Decimal,
    discount: Decimal,
    non_vat: bool,
) -> Result<InvoiceTotals, CoreError> {
    let subtotal = line_items.iter().try_fold(Decimal::ZERO, |sum, item| {
        item.checked_total().and_then(|line| sum.checked_add(line))
    });
    let subtotal = subtotal.ok_or_else(|| out_of_range("invoice subtotal"))?;
    let tax_amount = if non_vat {
        Decimal::ZERO
    } else {
        subtotal
            .checked_mul(tax_rate_percent)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| out_of_range("invoice tax"))?
    };
    let total = subtotal
        .checked_add(tax_amount)
        .and_then(|gross| gross.checked_sub(discount))
        .ok_or_else(|| out_of_range("invoice total"))?;
    Ok(InvoiceTotals {
        subtotal,
        tax_amount,
        total,
    })
}

fn out_of_range(what: &str) -> CoreError {
    CoreError::Validation(format!("{what} is too large to represent"))
}

pub fn format_invoice_number(year: i32, sequence: u32) -> String {
    format!("INV-{year}-{sequence:04}")
}

/// Source of invoice numbers. Every call consumes a number, whether or not the
/// invoice it was drawn for is ever saved.
pub trait InvoiceNumberSequence {
    fn next_invoice_number(&mut self, year: i32) -> Result<String, CoreError>;
}

/// Last number issued in each calendar year. Every year runs its own sequence,
/// so issuing a backdated number never disturbs the current year's count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCounter {
    #[serde(default)]
    pub issued: BTreeMap<i32, u32>,
}

impl InvoiceCounter {
    /// A counter whose next number in `year` follows `last`.
    pub fn resuming(year: i32, last: u32) -> Self {
        Self {
            issued: BTreeMap::from([(year, last)]),
        }
    }

    pub fn last_issued(&self, year: i32) -> u32 {
        self.issued.get(&year).copied().unwrap_or(0)
    }

    pub fn advance(&mut self, year: i32) -> String {
        let counter = self.issued.entry(year).or_insert(0);
        *counter += 1;
        format_invoice_number(year, *counter)
    }
}

impl InvoiceNumberSequence for InvoiceCounter {
    fn next_invoice_number(&mut self, year: i32) -> Result<String, CoreError> {
        Ok(self.advance(year))
    }
}

/// Sequence persisted as a single document in a [`RecordStore`].
pub struct StoredInvoiceSequence<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> StoredInvoiceSequence<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// The number the next call would issue, without consuming it.
    pub fn peek(&self, year: i32) -> String {
        format_invoice_number(year, self.load().last_issued(year) + 1)
    }

    fn load(&self) -> InvoiceCounter {
        match Records::load_document::<InvoiceCounter>(self.store, INVOICE_COUNTER_KEY) {
            Ok(Some(counter)) => counter,
            Ok(None) => InvoiceCounter::default(),
            Err(err) => {
                tracing::error!(error = %err, "unreadable invoice counter, starting fresh");
                InvoiceCounter::default()
            }
        }
    }
}

impl InvoiceNumberSequence for StoredInvoiceSequence<'_> {
    fn next_invoice_number(&mut self, year: i32) -> Result<String, CoreError> {
        let mut counter = self.load();
        let number = counter.advance(year);
        Records::save_document(self.store, INVOICE_COUNTER_KEY, &counter)?;
        tracing::debug!(%number, "issued invoice number");
        Ok(number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub customer_id: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub line_items: Vec<LineItem>,
    pub tax_rate: Decimal,
    pub discount: Decimal,
    pub non_vat: bool,
    pub notes: String,
}

impl InvoiceDraft {
    pub fn new(customer_id: impl Into<String>, invoice_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            customer_id: customer_id.into(),
            invoice_date,
            due_date,
            line_items: Vec::new(),
            tax_rate: Decimal::from(12),
            discount: Decimal::ZERO,
            non_vat: false,
            notes: String::new(),
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }

    pub fn totals(&self) -> Result<InvoiceTotals, CoreError> {
        compute_totals(&self.line_items, self.tax_rate, self.discount, self.non_vat)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.customer_id.trim().is_empty() {
            return Err(CoreError::Validation("invoice requires a customer".into()));
        }
        if self.line_items.is_empty() {
            return Err(CoreError::Validation(
                "invoice requires at least one line item".into(),
            ));
        }
        if let Some(item) = self.line_items.iter().find(|item| item.quantity == 0) {
            return Err(CoreError::Validation(format!(
                "line item `{}` must have a quantity of at least 1",
                item.name
            )));
        }
        if let Some(item) = self
            .line_items
            .iter()
            .find(|item| item.unit_price.is_sign_negative() && !item.unit_price.is_zero())
        {
            return Err(CoreError::Validation(format!(
                "line item `{}` has a negative unit price",
                item.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    /// Matches invoice number or customer name, case-insensitively.
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct InvoiceService;

impl InvoiceService {
    /// Validates `draft`, then draws a number for the invoice-date year.
    pub fn build(
        draft: InvoiceDraft,
        sequence: &mut dyn InvoiceNumberSequence,
        now: DateTime<Utc>,
    ) -> Result<Invoice, CoreError> {
        draft.validate()?;
        let totals = draft.totals()?;
        if totals.is_negative() {
            tracing::warn!(total = %totals.total, "invoice discount exceeds subtotal plus tax");
        }
        let invoice_number = sequence.next_invoice_number(draft.invoice_date.year())?;
        Ok(Invoice {
            id: new_id("inv"),
            invoice_number,
            customer_id: draft.customer_id,
            invoice_date: draft.invoice_date,
            due_date: draft.due_date,
            line_items: draft.line_items,
            tax_rate: if draft.non_vat { Decimal::ZERO } else { draft.tax_rate },
            discount: draft.discount,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            total: totals.total,
            notes: draft.notes,
            status: InvoiceStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// Builds the invoice with the stored sequence and saves it.
    pub fn create(store: &dyn RecordStore, draft: InvoiceDraft, now: DateTime<Utc>) -> Result<Invoice, CoreError> {
        Records::require::<Customer>(store, &draft.customer_id)?;
        let mut sequence = StoredInvoiceSequence::new(store);
        let invoice = Self::build(draft, &mut sequence, now)?;
        let saved = Records::add(store, invoice)?;
        tracing::info!(number = %saved.invoice_number, total = %saved.total, "invoice created");
        Ok(saved)
    }

    pub fn add_customer(store: &dyn RecordStore, customer: Customer) -> Result<Customer, CoreError> {
        if customer.name.trim().is_empty() {
            return Err(CoreError::Validation("customer name must not be empty".into()));
        }
        Records::add(store, customer)
    }

    pub fn add_product(store: &dyn RecordStore, product: Product) -> Result<Product, CoreError> {
        if product.price.is_sign_negative() && !product.price.is_zero() {
            return Err(CoreError::Validation("product price must not be negative".into()));
        }
        Records::add(store, product)
    }

    /// Snapshots the stored product into a line item.
    pub fn line_item(store: &dyn RecordStore, product_id: &str, quantity: u32) -> Result<LineItem, CoreError> {
        let product = Records::require::<Product>(store, product_id)?;
        Ok(LineItem::from_product(&product, quantity))
    }

    pub fn set_status(
        store: &dyn RecordStore,
        invoice_id: &str,
        status: InvoiceStatus,
        now: DateTime<Utc>,
    ) -> Result<Invoice, CoreError> {
        Records::update(store, invoice_id, |invoice: &mut Invoice| {
            invoice.status = status;
            invoice.updated_at = now;
            Ok(())
        })
    }

    pub fn filter<'a>(
        invoices: &'a [Invoice],
        customers: &[Customer],
        filter: &InvoiceFilter,
    ) -> Vec<&'a Invoice> {
        let needle = filter
            .search
            .as_deref()
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty());
        invoices
            .iter()
            .filter(|invoice| filter.status.map_or(true, |status| invoice.status == status))
            .filter(|invoice| filter.from.map_or(true, |from| invoice.invoice_date >= from))
            .filter(|invoice| filter.to.map_or(true, |to| invoice.invoice_date <= to))
            .filter(|invoice| match &needle {
                None => true,
                Some(needle) => {
                    let customer = customers
                        .iter()
                        .find(|customer| customer.id == invoice.customer_id)
                        .map(|customer| customer.name.to_lowercase())
                        .unwrap_or_default();
                    invoice.invoice_number.to_lowercase().contains(needle)
                        || customer.contains(needle)
                }
            })
            .collect()
    }
}
