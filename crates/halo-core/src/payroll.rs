//! Gross-to-net payroll for a pay period.

use std::collections::HashMap;

use chrono::NaiveDate;
use halo_domain::{new_id, Deductions, Employee, EmployeePatch, PayrollEntry, PayrollStatus};
use rust_decimal::Decimal;

use crate::{
    storage::{RecordStore, Records},
    CoreError,
};

/// Hours credited to an employee with no explicit entry for the period.
pub const DEFAULT_HOURS_WORKED: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayBreakdown {
    pub gross: Decimal,
    pub total_deductions: Decimal,
    pub net: Decimal,
}

/// `gross = rate × hours`, `net = gross − Σ deductions`. Net pay is not floored
/// at zero; figures too large for a `Decimal` are rejected.
pub fn compute_pay(rate: Decimal, hours: Decimal, deductions: &Deductions) -> Result<PayBreakdown, CoreError> {
    let gross = rate
        .checked_mul(hours)
        .ok_or_else(|| CoreError::Validation(format!("gross pay for {hours} hours at {rate} is too large")))?;
    let total_deductions = deductions
        .checked_total()
        .ok_or_else(|| CoreError::Validation("deductions are too large to total".into()))?;
    let net = gross
        .checked_sub(total_deductions)
        .ok_or_else(|| CoreError::Validation("net pay is too large to represent".into()))?;
    Ok(PayBreakdown {
        gross,
        total_deductions,
        net,
    })
}

#[derive(Debug, Clone, PartialEq)]
/// Inputs for one payroll run. Hours and deductions are keyed by employee id and
/// fall back to `default_hours` and the employee's stored deductions.
pub struct PayrollRequest {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub default_hours: Decimal,
    pub hours_worked: HashMap<String, Decimal>,
    pub deduction_overrides: HashMap<String, Deductions>,
}

impl PayrollRequest {
    pub fn new(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_start,
            period_end,
            default_hours: DEFAULT_HOURS_WORKED,
            hours_worked: HashMap::new(),
            deduction_overrides: HashMap::new(),
        }
    }

    pub fn with_default_hours(mut self, hours: Decimal) -> Self {
        self.default_hours = hours;
        self
    }

    pub fn with_hours(mut self, employee_id: impl Into<String>, hours: Decimal) -> Self {
        self.hours_worked.insert(employee_id.into(), hours);
        self
    }

    pub fn with_deductions(mut self, employee_id: impl Into<String>, deductions: Deductions) -> Self {
        self.deduction_overrides.insert(employee_id.into(), deductions);
        self
    }

    pub fn hours_for(&self, employee_id: &str) -> Decimal {
        self.hours_worked
            .get(employee_id)
            .copied()
            .unwrap_or(self.default_hours)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.period_start > self.period_end {
            return Err(CoreError::Validation(format!(
                "pay period start {} is after end {}",
                self.period_start, self.period_end
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PayrollTotals {
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

impl PayrollTotals {
    pub fn of(entries: &[PayrollEntry]) -> Self {
        entries.iter().fold(Self::default(), |acc, entry| Self {
            gross: acc.gross + entry.gross_pay,
            deductions: acc.deductions + entry.total_deductions(),
            net: acc.net + entry.net_pay,
        })
    }
}

pub struct EmployeeService;

impl EmployeeService {
    pub fn add(store: &dyn RecordStore, employee: Employee) -> Result<Employee, CoreError> {
        if employee.name.trim().is_empty() {
            return Err(CoreError::Validation("employee name must not be empty".into()));
        }
        if employee.rate.is_sign_negative() && !employee.rate.is_zero() {
            return Err(CoreError::Validation("hourly rate must not be negative".into()));
        }
        if !employee.deductions.is_non_negative() {
            return Err(CoreError::Validation("deductions must not be negative".into()));
        }
        Records::add(store, employee)
    }

    pub fn update(store: &dyn RecordStore, employee_id: &str, patch: &EmployeePatch) -> Result<Employee, CoreError> {
        Records::update(store, employee_id, |employee: &mut Employee| {
            patch.apply(employee);
            Ok(())
        })
    }

    /// Payroll entries keep their reference to a deleted employee.
    pub fn delete(store: &dyn RecordStore, employee_id: &str) -> Result<Employee, CoreError> {
        Records::delete(store, employee_id)
    }
}

pub struct PayrollService;

impl PayrollService {
    /// One draft entry per employee, in employee order.
    pub fn calculate(
        employees: &[Employee],
        request: &PayrollRequest,
    ) -> Result<Vec<PayrollEntry>, CoreError> {
        request.validate()?;
        let entries = employees
            .iter()
            .map(|employee| {
                let deductions = request
                    .deduction_overrides
                    .get(&employee.id)
                    .copied()
                    .unwrap_or(employee.deductions);
                let pay = compute_pay(employee.rate, request.hours_for(&employee.id), &deductions)?;
                Ok(PayrollEntry {
                    id: new_id("pay"),
                    employee_id: employee.id.clone(),
                    period_start: request.period_start,
                    period_end: request.period_end,
                    gross_pay: pay.gross,
                    deductions,
                    net_pay: pay.net,
                    status: PayrollStatus::Draft,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        for entry in entries.iter().filter(|entry| entry.has_negative_net()) {
            tracing::warn!(
                employee = %entry.employee_id,
                net = %entry.net_pay,
                "deductions exceed gross pay"
            );
        }
        Ok(entries)
    }

    /// Calculates for every stored employee and saves all entries in one write.
    pub fn run(store: &dyn RecordStore, request: &PayrollRequest) -> Result<Vec<PayrollEntry>, CoreError> {
        let employees: Vec<Employee> = Records::list(store)?;
        let entries = Self::calculate(&employees, request)?;
        let saved = Records::add_batch(store, entries)?;
        tracing::info!(
            entries = saved.len(),
            start = %request.period_start,
            end = %request.period_end,
            "payroll run saved"
        );
        Ok(saved)
    }

    pub fn set_status(
        store: &dyn RecordStore,
        entry_id: &str,
        status: PayrollStatus,
    ) -> Result<PayrollEntry, CoreError> {
        Records::update(store, entry_id, |entry: &mut PayrollEntry| {
            entry.status = status;
            Ok(())
        })
    }

    /// Entries for one employee, most recent period first.
    pub fn history(store: &dyn RecordStore, employee_id: Option<&str>) -> Result<Vec<PayrollEntry>, CoreError> {
        let mut entries: Vec<PayrollEntry> = Records::list(store)?;
        if let Some(id) = employee_id {
            entries.retain(|entry| entry.employee_id == id);
        }
        entries.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn quennie() -> Employee {
        Employee::new("Quennie O", "Front Desk", dec!(150), date(1, 1))
            .with_deductions(Deductions::new(dec!(562.5), dec!(218.75), dec!(100), dec!(0)))
    }

    #[test]
    fn default_hours_produce_expected_net() {
        let employee = quennie();
        let request = PayrollRequest::new(date(3, 1), date(3, 15));
        let entries = PayrollService::calculate(&[employee], &request).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.gross_pay, dec!(12000));
        assert_eq!(entry.total_deductions(), dec!(881.25));
        assert_eq!(entry.net_pay, dec!(11118.75));
        assert_eq!(entry.status, PayrollStatus::Draft);
    }

    #[test]
    fn explicit_hours_and_overrides_win() {
        let employee = quennie();
        let request = PayrollRequest::new(date(3, 1), date(3, 15))
            .with_hours(employee.id.clone(), dec!(40))
            .with_deductions(employee.id.clone(), Deductions::default());
        let entries = PayrollService::calculate(&[employee], &request).unwrap();
        assert_eq!(entries[0].gross_pay, dec!(6000));
        assert_eq!(entries[0].net_pay, dec!(6000));
    }

    #[test]
    fn net_pay_may_go_negative() {
        let employee = quennie();
        let request = PayrollRequest::new(date(3, 1), date(3, 15)).with_hours(employee.id.clone(), dec!(0));
        let entries = PayrollService::calculate(&[employee], &request).unwrap();
        assert_eq!(entries[0].net_pay, dec!(-881.25));
        assert!(entries[0].has_negative_net());
    }

    #[test]
    fn unrepresentable_gross_pay_is_rejected() {
        let mut employee = quennie();
        employee.rate = Decimal::MAX;
        let request = PayrollRequest::new(date(3, 1), date(3, 15));
        let err = PayrollService::calculate(&[employee], &request).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let heavy = Deductions::new(Decimal::MAX, Decimal::MAX, dec!(0), dec!(0));
        assert!(compute_pay(dec!(150), dec!(80), &heavy).is_err());
    }

    #[test]
    fn inverted_period_is_rejected() {
        let request = PayrollRequest::new(date(3, 15), date(3, 1));
        let err = PayrollService::calculate(&[quennie()], &request).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn totals_sum_entries() {
        let request = PayrollRequest::new(date(3, 1), date(3, 15));
        let entries = PayrollService::calculate(&[quennie(), quennie()], &request).unwrap();
        let totals = PayrollTotals::of(&entries);
        assert_eq!(totals.gross, dec!(24000));
        assert_eq!(totals.net, dec!(22237.50));
    }
}
