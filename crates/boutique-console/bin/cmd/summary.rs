use boutique_console::notify::status_family;
use boutique_console::ApiClient;
use clap::Parser;
use colored::Colorize;
use eyre::Result;
use prettytable::{Cell, Row, Table};

#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// Base url of the management backend
    #[arg(long, env = "BOUTIQUE_CONSOLE_API_URL", default_value = "http://127.0.0.1:8990")]
    pub api_url: String,
}

impl SummaryArgs {
    /// One-shot, non-interactive view: franchises and the first order page
    /// printed as tables. Exits with an error when either fetch fails.
    pub fn run(&self) -> Result<()> {
        let client = ApiClient::new(&self.api_url);

        let franchises = client.list_franchises()?;
        let orders = client.list_orders(1)?;

        let mut franchise_table = Table::new();
        franchise_table.add_row(Row::new(vec![
            Cell::new("Id"),
            Cell::new("Name"),
            Cell::new("Email"),
            Cell::new("Phone"),
            Cell::new("State"),
        ]));
        for franchise in &franchises {
            let state = match franchise.active {
                Some(true) => "active".green().to_string(),
                Some(false) => "inactive".red().to_string(),
                None => "-".to_string(),
            };
            franchise_table.add_row(Row::new(vec![
                Cell::new(&franchise.id),
                Cell::new(&franchise.name),
                Cell::new(franchise.email.as_deref().unwrap_or("-")),
                Cell::new(franchise.phone.as_deref().unwrap_or("-")),
                Cell::new(&state),
            ]));
        }

        println!("\nFranchises:");
        franchise_table.printstd();

        let mut order_table = Table::new();
        order_table.add_row(Row::new(vec![
            Cell::new("Id"),
            Cell::new("Customer"),
            Cell::new("Total"),
            Cell::new("Status"),
        ]));
        for order in &orders.data {
            let status = match status_family(&order.status) {
                "delivered" | "confirmed" => order.status.green().to_string(),
                "cancelled" => order.status.red().to_string(),
                _ => order.status.yellow().to_string(),
            };
            let total = order
                .total
                .map(|t| format!("{:.2}", t))
                .unwrap_or_else(|| "-".to_string());
            order_table.add_row(Row::new(vec![
                Cell::new(&order.id),
                Cell::new(order.customer.as_deref().unwrap_or("-")),
                Cell::new(&total),
                Cell::new(&status),
            ]));
        }

        println!(
            "\nOrders (page {} of {}):",
            orders.page, orders.total_pages
        );
        order_table.printstd();

        Ok(())
    }
}
