//! Employees, their statutory deductions, and payroll entries.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Per-period deductions withheld from gross pay.
pub struct Deductions {
    #[serde(default)]
    pub sss: Decimal,
    #[serde(default)]
    pub philhealth: Decimal,
    #[serde(default)]
    pub pagibig: Decimal,
    #[serde(default)]
    pub tax: Decimal,
}

impl Deductions {
    pub fn new(sss: Decimal, philhealth: Decimal, pagibig: Decimal, tax: Decimal) -> Self {
        Self {
            sss,
            philhealth,
            pagibig,
            tax,
        }
    }

    pub fn total(&self) -> Decimal {
        self.sss + self.philhealth + self.pagibig + self.tax
    }

    pub fn checked_total(&self) -> Option<Decimal> {
        [self.philhealth, self.pagibig, self.tax]
            .into_iter()
            .try_fold(self.sss, |sum, value| sum.checked_add(value))
    }

    pub fn is_non_negative(&self) -> bool {
        [self.sss, self.philhealth, self.pagibig, self.tax]
            .iter()
            .all(|value| !value.is_sign_negative())
    }

    /// Overwrites only the fields present in `patch`.
    pub fn merge(&mut self, patch: &DeductionsPatch) {
        if let Some(value) = patch.sss {
            self.sss = value;
        }
        if let Some(value) = patch.philhealth {
            self.philhealth = value;
        }
        if let Some(value) = patch.pagibig {
            self.pagibig = value;
        }
        if let Some(value) = patch.tax {
            self.tax = value;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeductionsPatch {
    pub sss: Option<Decimal>,
    pub philhealth: Option<Decimal>,
    pub pagibig: Option<Decimal>,
    pub tax: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    /// Hourly rate.
    pub rate: Decimal,
    #[serde(default)]
    pub deductions: Deductions,
    pub hire_date: NaiveDate,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        rate: Decimal,
        hire_date: NaiveDate,
    ) -> Self {
        Self {
            id: new_id("emp"),
            name: name.into(),
            position: position.into(),
            rate,
            deductions: Deductions::default(),
            hire_date,
        }
    }

    pub fn with_deductions(mut self, deductions: Deductions) -> Self {
        self.deductions = deductions;
        self
    }
}

impl Identifiable for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Employee {
    const COLLECTION: &'static str = "employees";
}

impl Displayable for Employee {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.position)
    }
}

/// Field-wise update for an employee; deductions merge rather than replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub position: Option<String>,
    pub rate: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub deductions: DeductionsPatch,
}

impl EmployeePatch {
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.clone();
        }
        if let Some(position) = &self.position {
            employee.position = position.clone();
        }
        if let Some(rate) = self.rate {
            employee.rate = rate;
        }
        if let Some(hire_date) = self.hire_date {
            employee.hire_date = hire_date;
        }
        employee.deductions.merge(&self.deductions);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One employee's pay for one payroll period.
pub struct PayrollEntry {
    pub id: String,
    /// Weak reference; the employee may since have been deleted.
    pub employee_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_pay: Decimal,
    pub deductions: Deductions,
    pub net_pay: Decimal,
    pub status: PayrollStatus,
}

impl PayrollEntry {
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.total()
    }

    /// Deductions exceeded gross pay for the period.
    pub fn has_negative_net(&self) -> bool {
        self.net_pay.is_sign_negative() && !self.net_pay.is_zero()
    }
}

impl Identifiable for PayrollEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for PayrollEntry {
    const COLLECTION: &'static str = "payroll_entries";
}

impl Displayable for PayrollEntry {
    fn display_label(&self) -> String {
        format!(
            "{} to {} net {} [{}]",
            self.period_start, self.period_end, self.net_pay, self.status
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    #[default]
    Draft,
    Approved,
    Paid,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayrollStatus::Draft => "draft",
            PayrollStatus::Approved => "approved",
            PayrollStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

impl FromStr for PayrollStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PayrollStatus::Draft),
            "approved" => Ok(PayrollStatus::Approved),
            "paid" => Ok(PayrollStatus::Paid),
            other => Err(format!("unknown payroll status `{other}`")),
        }
    }
}
