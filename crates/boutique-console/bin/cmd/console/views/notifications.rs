use boutique_console::NotificationFeed;
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Renders the notifications side panel, most recent entry on top. Unread
/// entries are highlighted until the user marks the feed read.
pub(crate) fn render_notifications_panel(
    feed: &NotificationFeed,
    area: Rect,
    frame: &mut Frame,
    is_focused: bool,
) {
    let border_set = if is_focused {
        border::THICK
    } else {
        border::PLAIN
    };

    let title = if feed.unread_count() > 0 {
        format!(" Notifications ({} unread) ", feed.unread_count())
    } else {
        " Notifications ".to_string()
    };

    let block = Block::bordered().title(title).border_set(border_set);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if feed.is_empty() {
        let placeholder = Paragraph::new(Line::from("(no notifications yet)"))
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(placeholder, inner_area);
        return;
    }

    let lines: Vec<Line> = feed
        .iter()
        .map(|notification| {
            let stamp = notification
                .timestamp
                .with_timezone(&Local)
                .format("%H:%M")
                .to_string();
            let style = if notification.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", stamp), Style::default().fg(Color::Cyan)),
                Span::styled(notification.message.clone(), style),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: false });
    frame.render_widget(paragraph, inner_area);
}
