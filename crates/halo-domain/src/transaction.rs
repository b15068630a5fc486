//! Income and expense transactions recorded against the business.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// A single income or expense movement. Amounts are never negative; the
/// direction is carried by [`TransactionKind`].
pub struct Transaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default = "Transaction::default_currency")]
    pub currency: String,
    pub category: String,
    pub method: PaymentMethod,
    #[serde(flatten)]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        date: DateTime<Utc>,
        amount: Decimal,
        category: impl Into<String>,
        method: PaymentMethod,
        kind: TransactionKind,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id("txn"),
            date,
            amount,
            currency: DEFAULT_CURRENCY.into(),
            category: category.into(),
            method,
            kind,
            notes: None,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn income(
        date: DateTime<Utc>,
        amount: Decimal,
        category: impl Into<String>,
        method: PaymentMethod,
        source: impl Into<String>,
    ) -> Self {
        Self::new(
            date,
            amount,
            category,
            method,
            TransactionKind::Income {
                source: source.into(),
                reference_id: None,
            },
            "admin",
        )
    }

    pub fn expense(
        date: DateTime<Utc>,
        amount: Decimal,
        category: impl Into<String>,
        method: PaymentMethod,
        vendor: impl Into<String>,
    ) -> Self {
        Self::new(
            date,
            amount,
            category,
            method,
            TransactionKind::Expense {
                vendor: vendor.into(),
                invoice_no: None,
            },
            "admin",
        )
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income { .. })
    }

    /// Income source or expense vendor, whichever the discriminant carries.
    pub fn counterparty(&self) -> &str {
        match &self.kind {
            TransactionKind::Income { source, .. } => source,
            TransactionKind::Expense { vendor, .. } => vendor,
        }
    }

    /// Case-insensitive search across every displayed field.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let mut haystack = vec![
            self.id.clone(),
            self.date.to_rfc3339(),
            self.amount.to_string(),
            self.currency.clone(),
            self.category.clone(),
            self.method.to_string(),
            self.transaction_type().to_string(),
            self.counterparty().to_string(),
            self.created_by.clone(),
        ];
        if let Some(notes) = &self.notes {
            haystack.push(notes.clone());
        }
        if let TransactionKind::Expense {
            invoice_no: Some(invoice),
            ..
        } = &self.kind
        {
            haystack.push(invoice.clone());
        }
        haystack
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }

    pub fn default_currency() -> String {
        DEFAULT_CURRENCY.into()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Transaction {
    const COLLECTION: &'static str = "transactions";
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.transaction_type(),
            self.amount,
            self.category
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
/// Discriminant separating income from expense records.
pub enum TransactionKind {
    Income {
        source: String,
        #[serde(
            rename = "referenceId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        reference_id: Option<String>,
    },
    Expense {
        vendor: String,
        #[serde(rename = "invoiceNo", default, skip_serializing_if = "Option::is_none")]
        invoice_no: Option<String>,
    },
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Income { .. } => TransactionType::Income,
            TransactionKind::Expense { .. } => TransactionType::Expense,
        }
    }

    /// Builds the variant for `kind`, storing `counterparty` as source or vendor.
    pub fn from_type(kind: TransactionType, counterparty: impl Into<String>) -> Self {
        match kind {
            TransactionType::Income => TransactionKind::Income {
                source: counterparty.into(),
                reference_id: None,
            },
            TransactionType::Expense => TransactionKind::Expense {
                vendor: counterparty.into(),
                invoice_no: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// Payment rail a transaction moved through.
pub enum PaymentMethod {
    GCash,
    Rcbc,
    EastWest,
    PayPal,
    Cash,
    Direct,
    /// Rails not in the fixed list, kept verbatim from imported data.
    Other(String),
}

impl PaymentMethod {
    pub const KNOWN: [PaymentMethod; 6] = [
        PaymentMethod::GCash,
        PaymentMethod::Rcbc,
        PaymentMethod::EastWest,
        PaymentMethod::PayPal,
        PaymentMethod::Cash,
        PaymentMethod::Direct,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::GCash => "GCash",
            PaymentMethod::Rcbc => "RCBC",
            PaymentMethod::EastWest => "EastWest",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Direct => "Direct",
            PaymentMethod::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        PaymentMethod::KNOWN
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| PaymentMethod::Other(trimmed.to_string()))
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        PaymentMethod::from(value.to_string())
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_with_flat_type_tag() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let txn = Transaction::expense(date, dec!(2500), "F&B", PaymentMethod::GCash, "Local Market");
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["vendor"], "Local Market");
        assert_eq!(json["method"], "GCash");
        assert_eq!(json["currency"], "PHP");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn reads_records_in_the_browser_shape() {
        let raw = r#"{
            "id": "t1", "type": "income", "date": "2024-01-05T02:00:00.000Z",
            "amount": 15200, "currency": "PHP", "category": "Accommodation",
            "method": "PayPal", "source": "Accommodation", "createdBy": "admin",
            "createdAt": "2024-01-05T02:00:00.000Z", "updatedAt": "2024-01-05T02:00:00.000Z"
        }"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert!(txn.is_income());
        assert_eq!(txn.amount, dec!(15200));
        assert_eq!(txn.counterparty(), "Accommodation");
    }

    #[test]
    fn payment_method_parsing_is_case_insensitive() {
        assert_eq!(PaymentMethod::from("rcbc"), PaymentMethod::Rcbc);
        assert_eq!(PaymentMethod::from(" gcash "), PaymentMethod::GCash);
        assert_eq!(
            PaymentMethod::from("Wire"),
            PaymentMethod::Other("Wire".into())
        );
    }

    #[test]
    fn transaction_type_rejects_unknown_labels() {
        assert_eq!("INCOME".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn text_search_covers_counterparty_and_notes() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let txn = Transaction::income(date, dec!(10), "Tours", PaymentMethod::Cash, "Island Hop")
            .with_notes("group of five");
        assert!(txn.matches_text("island"));
        assert!(txn.matches_text("FIVE"));
        assert!(!txn.matches_text("utilities"));
    }
}
