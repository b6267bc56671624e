use boutique_console::notify::status_family;
use boutique_console::Order;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::border,
    widgets::{BarChart, Block},
    Frame,
};

const FAMILY_ORDER: &[&str] = &[
    "pending",
    "confirmed",
    "preparing",
    "shipped",
    "delivered",
    "cancelled",
    "other",
];

/// Renders a bar chart of the latest order snapshot grouped by status
/// family. Empty families are skipped so the chart stays compact.
pub(crate) fn render_dashboard(orders: &[Order], area: Rect, frame: &mut Frame) {
    let mut counts = vec![0u64; FAMILY_ORDER.len()];
    for order in orders {
        let family = status_family(&order.status);
        if let Some(slot) = FAMILY_ORDER.iter().position(|f| *f == family) {
            counts[slot] += 1;
        }
    }

    let data: Vec<(&str, u64)> = FAMILY_ORDER
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(family, count)| (*family, count))
        .collect();

    let block = Block::bordered()
        .title(" Orders by status ")
        .border_set(border::THICK);

    if data.is_empty() {
        let inner_area = block.inner(area);
        frame.render_widget(block, area);
        let message = "(no orders in the latest poll)";
        let x = inner_area.x + (inner_area.width.saturating_sub(message.len() as u16)) / 2;
        let y = inner_area.y + inner_area.height / 2;
        if x < inner_area.x + inner_area.width && y < inner_area.y + inner_area.height {
            frame
                .buffer_mut()
                .set_string(x, y, message, Style::default().fg(Color::DarkGray));
        }
        return;
    }

    let chart = BarChart::default()
        .block(block)
        .data(&data)
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}
