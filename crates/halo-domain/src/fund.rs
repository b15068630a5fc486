//! Cash and bank accounts the business holds funds in.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundAccount {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FundAccountType,
    pub institution: String,
    pub balance: Decimal,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
}

impl FundAccount {
    pub fn new(
        name: impl Into<String>,
        kind: FundAccountType,
        institution: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id: new_id("fund"),
            name: name.into(),
            kind,
            institution: institution.into(),
            balance,
            last_updated: Utc::now(),
            notes: None,
            is_hidden: false,
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

impl Identifiable for FundAccount {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for FundAccount {
    const COLLECTION: &'static str = "fund_accounts";
}

impl Displayable for FundAccount {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.kind, self.institution)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FundAccountType {
    Checking,
    Cash,
    Digital,
}

impl fmt::Display for FundAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FundAccountType::Checking => "checking",
            FundAccountType::Cash => "cash",
            FundAccountType::Digital => "digital",
        };
        f.write_str(label)
    }
}

impl FromStr for FundAccountType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "checking" | "bank" => Ok(FundAccountType::Checking),
            "cash" => Ok(FundAccountType::Cash),
            "digital" | "e-wallet" => Ok(FundAccountType::Digital),
            other => Err(format!("unknown account type `{other}`")),
        }
    }
}
