//! The back office as one unit: a record store, a clock and the persisted
//! configuration, with the cross-service operations the shell performs.

use std::{fs::File, io::BufWriter, path::Path, sync::Arc};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use halo_config::Config;
use halo_core::{
    csv_io, end_of_day, resolve, seed, start_of_day, tasks_due_on, AggregationService, Clock,
    DailyTotals, ExpenseGrouping, InvoiceDraft, InvoiceService, MemoryStore, PayrollRequest,
    PayrollService, PeriodComparison, PeriodWindow, ProfitAndLoss, RecordStore, Records,
    StoredInvoiceSequence, SystemClock, Timeframe, TransactionFilter, TransactionService,
};
use halo_domain::{Invoice, LineItem, PayrollEntry, Task, Transaction};
use rust_decimal::Decimal;

use crate::errors::AppError;

/// Figures behind the dashboard view for one timeframe.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub timeframe: Timeframe,
    pub comparison: PeriodComparison,
    pub daily: Vec<DailyTotals>,
    pub tasks_due_today: usize,
}

/// Options for [`BackOffice::create_invoice`] beyond the customer and items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceOptions {
    /// Falls back to the configured default rate.
    pub tax_rate: Option<Decimal>,
    pub discount: Decimal,
    pub non_vat: bool,
    /// Falls back to the invoice date.
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

pub struct BackOffice {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    config: Config,
    offset: FixedOffset,
}

impl BackOffice {
    pub fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Result<Self, AppError> {
        let offset = offset_of(&config)?;
        Ok(Self {
            store,
            clock,
            config,
            offset,
        })
    }

    /// Ephemeral office on the system clock; nothing touches disk.
    pub fn in_memory(config: Config) -> Result<Self, AppError> {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock), config)
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swaps in a new configuration; rejected when its offset is unusable.
    pub fn set_config(&mut self, config: Config) -> Result<(), AppError> {
        self.offset = offset_of(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current calendar date in the business's local offset.
    pub fn today(&self) -> NaiveDate {
        self.clock.today_in(self.offset)
    }

    pub fn seed_demo_data(&self) -> Result<seed::SeedReport, AppError> {
        Ok(seed::seed_demo_data(self.store(), self.now())?)
    }

    pub fn dashboard(
        &self,
        timeframe: Timeframe,
        grouping: ExpenseGrouping,
    ) -> Result<Dashboard, AppError> {
        let now = self.now();
        let period = resolve(timeframe, now, self.offset);
        let transactions: Vec<Transaction> = Records::list(self.store())?;
        let comparison = AggregationService::compare(&transactions, &period, grouping);
        let daily = AggregationService::daily_series(&transactions, period.current(), self.offset);
        let tasks: Vec<Task> = Records::list(self.store())?;
        let tasks_due_today = tasks_due_on(&tasks, self.today(), self.offset).len();
        Ok(Dashboard {
            timeframe,
            comparison,
            daily,
            tasks_due_today,
        })
    }

    /// Local-day window from the start of `start` through the end of `end`.
    pub fn report_window(&self, start: NaiveDate, end: NaiveDate) -> PeriodWindow {
        PeriodWindow::new(start_of_day(start, self.offset), end_of_day(end, self.offset))
    }

    pub fn profit_and_loss(&self, start: NaiveDate, end: NaiveDate) -> Result<ProfitAndLoss, AppError> {
        let transactions: Vec<Transaction> = Records::list(self.store())?;
        let window = self.report_window(start, end);
        Ok(AggregationService::profit_and_loss(&transactions, Some(&window)))
    }

    pub fn export_profit_and_loss(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        path: &Path,
    ) -> Result<ProfitAndLoss, AppError> {
        let pnl = self.profit_and_loss(start, end)?;
        let file = BufWriter::new(File::create(path)?);
        csv_io::write_profit_and_loss_csv(file, &pnl)?;
        tracing::info!(path = %path.display(), "exported profit and loss");
        Ok(pnl)
    }

    /// Matching transactions, newest first.
    pub fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, AppError> {
        let transactions: Vec<Transaction> = Records::list(self.store())?;
        Ok(TransactionService::filter(&transactions, filter, self.offset)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn import_transactions(&self, path: &Path) -> Result<Vec<Transaction>, AppError> {
        let file = File::open(path)?;
        Ok(TransactionService::import_csv(
            self.store(),
            file,
            self.offset,
            self.now(),
        )?)
    }

    pub fn export_transactions(&self, path: &Path) -> Result<usize, AppError> {
        let transactions = self.transactions(&TransactionFilter::default())?;
        let file = BufWriter::new(File::create(path)?);
        csv_io::write_transactions_csv(file, &transactions)?;
        tracing::info!(path = %path.display(), count = transactions.len(), "exported transactions");
        Ok(transactions.len())
    }

    /// Runs payroll with the configured default hours unless overridden per employee.
    pub fn run_payroll(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        hours: &[(String, Decimal)],
    ) -> Result<Vec<PayrollEntry>, AppError> {
        let request = hours.iter().fold(
            PayrollRequest::new(start, end).with_default_hours(self.config.payroll_default_hours),
            |request, (employee_id, worked)| request.with_hours(employee_id.clone(), *worked),
        );
        Ok(PayrollService::run(self.store(), &request)?)
    }

    /// The number the next invoice dated today would receive.
    pub fn next_invoice_number(&self) -> String {
        StoredInvoiceSequence::new(self.store()).peek(self.today().year())
    }

    /// Creates an invoice dated today from `(product id, quantity)` pairs.
    pub fn create_invoice(
        &self,
        customer_id: &str,
        items: &[(String, u32)],
        options: InvoiceOptions,
    ) -> Result<Invoice, AppError> {
        let today = self.today();
        let line_items = items
            .iter()
            .map(|(product_id, quantity)| InvoiceService::line_item(self.store(), product_id, *quantity))
            .collect::<Result<Vec<LineItem>, _>>()?;
        let mut draft = InvoiceDraft::new(customer_id, today, options.due_date.unwrap_or(today));
        draft.line_items = line_items;
        draft.tax_rate = options.tax_rate.unwrap_or(self.config.default_tax_rate);
        draft.discount = options.discount;
        draft.non_vat = options.non_vat;
        if let Some(notes) = options.notes {
            draft.notes = notes;
        }
        Ok(InvoiceService::create(self.store(), draft, self.now())?)
    }
}

fn offset_of(config: &Config) -> Result<FixedOffset, AppError> {
    config.utc_offset().ok_or_else(|| {
        AppError::InvalidConfig(format!(
            "utc_offset_minutes {} is outside a day",
            config.utc_offset_minutes
        ))
    })
}
