use boutique_console::Order;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::cmd::console::widgets::formatters::{format_amount, format_datetime};

/// Centered popup with the full detail of one order, fetched from the
/// order detail route.
pub(crate) fn render_order_detail(order: &Order, area: Rect, frame: &mut Frame) {
    let popup_width = (area.width as f32 * 0.5) as u16;
    let popup_height = 8u16.min(area.height);
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" Order #{} ", order.id))
        .border_set(border::DOUBLE);
    let inner_area = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let label = |text: &str| Span::styled(format!("{:<10}", text), Style::default().fg(Color::Cyan));
    let lines = vec![
        Line::from(vec![
            label("Customer"),
            Span::raw(order.customer.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![label("Status"), Span::raw(order.status.clone())]),
        Line::from(vec![label("Total"), Span::raw(format_amount(order.total))]),
        Line::from(vec![
            label("Created"),
            Span::raw(format_datetime(order.created_at)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner_area);
}
