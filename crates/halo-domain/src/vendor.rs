//! Vendors and the charge/payment history their balance is derived from.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// A supplier. There is deliberately no stored balance; see
/// `halo_core::vendor::vendor_balance`.
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id("ven"),
            name: name.into(),
            category: category.into(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Vendor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Vendor {
    const COLLECTION: &'static str = "vendors";
}

impl Displayable for Vendor {
    fn display_label(&self) -> String {
        if self.category.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.category)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorTransaction {
    pub id: String,
    pub vendor_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: VendorTransactionType,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VendorTransaction {
    pub fn new(
        vendor_id: impl Into<String>,
        kind: VendorTransactionType,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: new_id("vtx"),
            vendor_id: vendor_id.into(),
            amount,
            kind,
            date,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn charge(vendor_id: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(vendor_id, VendorTransactionType::Charge, amount, date)
    }

    pub fn payment(vendor_id: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(vendor_id, VendorTransactionType::Payment, amount, date)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl Identifiable for VendorTransaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for VendorTransaction {
    const COLLECTION: &'static str = "vendor_transactions";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Charges increase what is owed to the vendor, payments reduce it.
pub enum VendorTransactionType {
    Charge,
    Payment,
}

impl fmt::Display for VendorTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VendorTransactionType::Charge => "charge",
            VendorTransactionType::Payment => "payment",
        };
        f.write_str(label)
    }
}

impl FromStr for VendorTransactionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "charge" => Ok(VendorTransactionType::Charge),
            "payment" => Ok(VendorTransactionType::Payment),
            other => Err(format!("unknown vendor transaction type `{other}`")),
        }
    }
}
