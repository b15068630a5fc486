//! Customers, products, and the invoices issued against them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, address: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: new_id("cust"),
            name: name.into(),
            address: address.into(),
            email: email.into(),
            phone: None,
        }
    }
}

impl Identifiable for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Customer {
    const COLLECTION: &'static str = "customers";
}

impl Displayable for Customer {
    fn display_label(&self) -> String {
        if self.email.is_empty() {
            self.name.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: new_id("prod"),
            name: name.into(),
            description: None,
            price,
        }
    }
}

impl Identifiable for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Product {
    fn display_label(&self) -> String {
        format!("{} @ {}", self.name, self.price)
    }
}

impl Record for Product {
    const COLLECTION: &'static str = "products";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Snapshot of a product at the time it was invoiced.
pub struct LineItem {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: new_id("li"),
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self::new(product.id.clone(), product.name.clone(), quantity, product.price)
    }

    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// `None` when the product of quantity and price overflows.
    pub fn checked_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub line_items: Vec<LineItem>,
    /// Percent, e.g. `12` for 12% VAT. Stored as zero for non-VAT invoices.
    pub tax_rate: Decimal,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub notes: String,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Invoice {
    const COLLECTION: &'static str = "invoices";
}

impl Displayable for Invoice {
    fn display_label(&self) -> String {
        format!("{} [{}] {}", self.invoice_number, self.status, self.total)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
/// Flat status; nothing moves an invoice to `Overdue` automatically.
pub enum InvoiceStatus {
    #[default]
    Draft,
    Paid,
    Overdue,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            other => Err(format!("unknown invoice status `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_item_snapshots_product_price() {
        let mut product = Product::new("Overnight Stay - Deluxe Villa", dec!(15000));
        let item = LineItem::from_product(&product, 2);
        product.price = dec!(18000);
        assert_eq!(item.unit_price, dec!(15000));
        assert_eq!(item.line_total(), dec!(30000));
    }
}
