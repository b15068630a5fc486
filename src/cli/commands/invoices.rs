use halo_core::{InvoiceFilter, InvoiceService, Records};
use halo_domain::{Customer, Invoice, InvoiceStatus, Product};

use crate::cli::commands::{lookup, take_option, take_switch};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{money, parse_amount, parse_date, parse_enum, require, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};
use crate::office::InvoiceOptions;

const CREATE_USAGE: &str =
    "invoice-create <customer> <product:qty>... [--tax N] [--discount N] [--non-vat] [--due date] [--notes text]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "invoice-next",
            "Preview the number the next invoice will receive",
            "invoice-next",
            cmd_invoice_next,
        ),
        CommandEntry::new(
            "invoice-create",
            "Create a draft invoice dated today",
            CREATE_USAGE,
            cmd_invoice_create,
        ),
        CommandEntry::new(
            "invoices",
            "List invoices, optionally by status or search text",
            "invoices [draft|paid|overdue] [--search text]",
            cmd_invoices,
        ),
        CommandEntry::new(
            "invoice-show",
            "Show one invoice with its line items",
            "invoice-show <invoice>",
            cmd_invoice_show,
        ),
        CommandEntry::new(
            "invoice-status",
            "Change an invoice's status",
            "invoice-status <invoice> <draft|paid|overdue>",
            cmd_invoice_status,
        ),
        CommandEntry::new("customers", "List customers", "customers", cmd_customers),
        CommandEntry::new(
            "customer-add",
            "Add a customer",
            "customer-add <name> <email> [address]",
            cmd_customer_add,
        ),
        CommandEntry::new("products", "List products and prices", "products", cmd_products),
        CommandEntry::new(
            "product-add",
            "Add a product with a unit price",
            "product-add <name> <price>",
            cmd_product_add,
        ),
    ]
}

fn customer_name(customer: &Customer) -> &str {
    &customer.name
}

fn product_name(product: &Product) -> &str {
    &product.name
}

fn invoice_number(invoice: &Invoice) -> &str {
    &invoice.invoice_number
}

fn cmd_invoice_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(format!("Next invoice number: {}", context.office.next_invoice_number()));
    Ok(())
}

fn cmd_invoice_create(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut args = args.to_vec();
    let options = InvoiceOptions {
        tax_rate: take_option(&mut args, "--tax")?.map(parse_amount).transpose()?,
        discount: take_option(&mut args, "--discount")?
            .map(parse_amount)
            .transpose()?
            .unwrap_or_default(),
        due_date: take_option(&mut args, "--due")?.map(parse_date).transpose()?,
        notes: take_option(&mut args, "--notes")?.map(str::to_string),
        non_vat: take_switch(&mut args, "--non-vat"),
    };

    let customer = lookup::<Customer>(context, require(&args, 0, CREATE_USAGE)?, customer_name)?;
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(format!(
            "at least one product:qty is required\nusage: {CREATE_USAGE}"
        )));
    }
    let mut items = Vec::with_capacity(args.len() - 1);
    for raw in &args[1..] {
        let (reference, quantity) = raw.rsplit_once(':').unwrap_or((*raw, "1"));
        let quantity: u32 = quantity.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("`{quantity}` is not a whole quantity"))
        })?;
        let product = lookup::<Product>(context, reference, product_name)?;
        items.push((product.id, quantity));
    }

    let invoice = context.office.create_invoice(&customer.id, &items, options)?;
    output::success(format!(
        "Created invoice {} for {}.",
        invoice.invoice_number, customer.name
    ));
    print_invoice(&invoice, &customer, context.currency());
    if invoice.total.is_sign_negative() && !invoice.total.is_zero() {
        output::warning("The discount exceeds subtotal plus tax; the total is negative.");
    }
    Ok(())
}

fn cmd_invoices(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut args = args.to_vec();
    let filter = InvoiceFilter {
        search: take_option(&mut args, "--search")?.map(str::to_string),
        status: args
            .first()
            .map(|raw| parse_enum::<InvoiceStatus>(raw))
            .transpose()?,
        ..InvoiceFilter::default()
    };

    let invoices: Vec<Invoice> = Records::list(context.office.store())?;
    let customers: Vec<Customer> = Records::list(context.office.store())?;
    let matching = InvoiceService::filter(&invoices, &customers, &filter);
    if matching.is_empty() {
        output::info("No invoices match.");
        return Ok(());
    }

    let currency = context.currency().to_string();
    let mut table = Table::new()
        .column("Number", Alignment::Left)
        .column("Customer", Alignment::Left)
        .column("Date", Alignment::Left)
        .column("Due", Alignment::Left)
        .column("Total", Alignment::Right)
        .column("Status", Alignment::Left);
    for invoice in &matching {
        let customer = customers
            .iter()
            .find(|customer| customer.id == invoice.customer_id)
            .map_or("(unknown)", customer_name);
        table.row(vec![
            invoice.invoice_number.clone(),
            customer.to_string(),
            invoice.invoice_date.to_string(),
            invoice.due_date.to_string(),
            money(invoice.total, &currency),
            invoice.status.to_string(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_invoice_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let invoice = lookup::<Invoice>(context, require(args, 0, "invoice-show <invoice>")?, invoice_number)?;
    let customer = Records::require::<Customer>(context.office.store(), &invoice.customer_id)?;
    print_invoice(&invoice, &customer, context.currency());
    Ok(())
}

fn cmd_invoice_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "invoice-status <invoice> <draft|paid|overdue>";
    let invoice = lookup::<Invoice>(context, require(args, 0, usage)?, invoice_number)?;
    let status: InvoiceStatus = parse_enum(require(args, 1, usage)?)?;
    let updated = InvoiceService::set_status(context.office.store(), &invoice.id, status, context.office.now())?;
    output::success(format!("Invoice {} is now {}.", updated.invoice_number, updated.status));
    Ok(())
}

fn cmd_customers(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let customers: Vec<Customer> = Records::list(context.office.store())?;
    if customers.is_empty() {
        output::info("No customers yet.");
        return Ok(());
    }
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Name", Alignment::Left)
        .column("Email", Alignment::Left)
        .column("Address", Alignment::Left);
    for customer in &customers {
        table.row(vec![
            short_id(&customer.id).to_string(),
            customer.name.clone(),
            customer.email.clone(),
            customer.address.clone(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_customer_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "customer-add <name> <email> [address]";
    let name = require(args, 0, usage)?;
    let email = require(args, 1, usage)?;
    let address = args.get(2).copied().unwrap_or_default();
    let saved = InvoiceService::add_customer(context.office.store(), Customer::new(name, address, email))?;
    output::success(format!("Added customer {} ({}).", saved.name, short_id(&saved.id)));
    Ok(())
}

fn cmd_products(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let products: Vec<Product> = Records::list(context.office.store())?;
    if products.is_empty() {
        output::info("No products yet.");
        return Ok(());
    }
    let currency = context.currency().to_string();
    let mut table = Table::new()
        .column("Id", Alignment::Left)
        .column("Name", Alignment::Left)
        .column("Price", Alignment::Right);
    for product in &products {
        table.row(vec![
            short_id(&product.id).to_string(),
            product.name.clone(),
            money(product.price, &currency),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_product_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "product-add <name> <price>";
    let name = require(args, 0, usage)?;
    let price = parse_amount(require(args, 1, usage)?)?;
    let saved = InvoiceService::add_product(context.office.store(), Product::new(name, price))?;
    output::success(format!(
        "Added product {} at {}.",
        saved.name,
        money(saved.price, context.currency())
    ));
    Ok(())
}

fn print_invoice(invoice: &Invoice, customer: &Customer, currency: &str) {
    output::section(format!("Invoice {}", invoice.invoice_number));
    output::info(format!("Customer: {}", customer.name));
    output::info(format!(
        "Date: {}  Due: {}  Status: {}",
        invoice.invoice_date, invoice.due_date, invoice.status
    ));
    let mut table = Table::new()
        .column("Item", Alignment::Left)
        .column("Qty", Alignment::Right)
        .column("Unit price", Alignment::Right)
        .column("Amount", Alignment::Right);
    for item in &invoice.line_items {
        table.row(vec![
            item.name.clone(),
            item.quantity.to_string(),
            money(item.unit_price, currency),
            money(item.line_total(), currency),
        ]);
    }
    output::info(table.render());
    output::info(format!("Subtotal: {}", money(invoice.subtotal, currency)));
    output::info(format!("Tax ({}%): {}", invoice.tax_rate, money(invoice.tax_amount, currency)));
    if !invoice.discount.is_zero() {
        output::info(format!("Discount: {}", money(invoice.discount, currency)));
    }
    output::info(format!("Total: {}", money(invoice.total, currency)));
    if !invoice.notes.is_empty() {
        output::info(format!("Notes: {}", invoice.notes));
    }
}
