use boutique_console::{Admin, BoutiqueUser, Franchise, Order, Product};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Text},
    widgets::{Block, Cell, HighlightSpacing, Row, Table, TableState},
    Frame,
};

use crate::cmd::console::widgets::formatters::{
    format_amount, format_datetime, format_flag, status_cell, truncate,
};

pub(crate) fn order_headers() -> &'static [&'static str] {
    &["Id", "Customer", "Total", "Status", "Created"]
}

pub(crate) fn order_rows(orders: &[Order]) -> Vec<Row<'static>> {
    orders
        .iter()
        .map(|order| {
            Row::new(vec![
                Cell::from(order.id.clone()),
                Cell::from(order.customer.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_amount(order.total)),
                status_cell(&order.status),
                Cell::from(format_datetime(order.created_at)),
            ])
        })
        .collect()
}

pub(crate) fn franchise_headers() -> &'static [&'static str] {
    &["Id", "Name", "Email", "Phone", "Commune", "State"]
}

pub(crate) fn franchise_rows(franchises: &[Franchise]) -> Vec<Row<'static>> {
    franchises
        .iter()
        .map(|franchise| {
            let commune = franchise
                .commune
                .as_ref()
                .map(|c| c.name.clone())
                .or_else(|| franchise.commune_id.clone())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(franchise.id.clone()),
                Cell::from(truncate(&franchise.name, 28)),
                Cell::from(franchise.email.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(franchise.phone.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(commune),
                Cell::from(format_flag(franchise.active)),
            ])
        })
        .collect()
}

pub(crate) fn admin_headers() -> &'static [&'static str] {
    &["Id", "Name", "Email", "Phone", "State"]
}

pub(crate) fn admin_rows(admins: &[Admin]) -> Vec<Row<'static>> {
    admins
        .iter()
        .map(|admin| {
            Row::new(vec![
                Cell::from(admin.id.clone()),
                Cell::from(truncate(&admin.name, 28)),
                Cell::from(admin.email.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(admin.phone.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_flag(admin.active)),
            ])
        })
        .collect()
}

pub(crate) fn user_headers() -> &'static [&'static str] {
    &["Id", "Name", "Email", "Boutique", "State"]
}

pub(crate) fn user_rows(users: &[BoutiqueUser]) -> Vec<Row<'static>> {
    users
        .iter()
        .map(|user| {
            let boutique = user
                .boutique
                .as_ref()
                .map(|b| b.name.clone())
                .or_else(|| user.boutique_id.clone())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(user.id.clone()),
                Cell::from(truncate(&user.name, 28)),
                Cell::from(user.email.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(boutique),
                Cell::from(format_flag(user.active)),
            ])
        })
        .collect()
}

pub(crate) fn product_headers() -> &'static [&'static str] {
    &["Id", "Name", "Price", "Weight", "State"]
}

pub(crate) fn product_rows(products: &[Product]) -> Vec<Row<'static>> {
    products
        .iter()
        .map(|product| {
            Row::new(vec![
                Cell::from(product.id.clone()),
                Cell::from(truncate(&product.name, 28)),
                Cell::from(format_amount(product.price)),
                Cell::from(format_amount(product.weight)),
                Cell::from(format_flag(product.active)),
            ])
        })
        .collect()
}

/// Renders the records table for the active tab. `footer` carries the pager
/// line for paginated listings; an empty line hides it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn render_records_panel(
    title: &str,
    headers: &'static [&'static str],
    rows: Vec<Row<'static>>,
    footer: Line<'static>,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
    dimmed: bool,
) {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(headers.iter().map(|h| Cell::from(*h)))
        .style(header_style)
        .height(1);

    let rows: Vec<Row> = if dimmed {
        rows.into_iter()
            .map(|row| row.style(Style::default().fg(Color::DarkGray)))
            .collect()
    } else {
        rows
    };

    let widths: Vec<Constraint> =
        std::iter::repeat(Constraint::Ratio(1, headers.len() as u32))
            .take(headers.len())
            .collect();

    let border_set = if dimmed { border::PLAIN } else { border::THICK };
    let mut block = Block::bordered()
        .title(format!(" {} ", title))
        .border_set(border_set);
    if footer.width() > 0 {
        block = block.title_bottom(footer.centered());
    }
    if dimmed {
        block = block.style(Style::default().fg(Color::DarkGray));
    }

    let selected_row_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .bg(Color::DarkGray);

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(selected_row_style)
        .highlight_symbol(Text::from(">"))
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(table, area, table_state);
}
