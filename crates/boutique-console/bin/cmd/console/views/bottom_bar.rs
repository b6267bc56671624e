use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::cmd::console::state::{Alert, Focus};

/// Renders the bottom line: an active alert takes priority, otherwise the
/// context-aware keybindings for the focused panel.
pub(crate) fn render_bottom_bar(
    frame: &mut Frame,
    area: Rect,
    focus: Focus,
    alert: Option<&Alert>,
) {
    if let Some(alert) = alert {
        let style = if alert.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        let paragraph =
            Paragraph::new(Line::from(format!(" {} ", alert.message))).style(style.bold());
        frame.render_widget(paragraph, area);
        return;
    }

    let controls_line = match focus {
        Focus::Records => Line::from(vec![
            " Quit ".into(),
            "<q>".blue().bold(),
            " | Tabs ".into(),
            "<Tab/1-5>".blue().bold(),
            " | Move ".into(),
            "<jk>".blue().bold(),
            " | Page ".into(),
            "<[ ]>".blue().bold(),
            " | Notifs ".into(),
            "<o>".blue().bold(),
            " | Chart ".into(),
            "<d>".blue().bold(),
            " | Add/Edit/Del ".into(),
            "<a e x>".blue().bold(),
        ]),
        Focus::Notifications => Line::from(vec![
            " Quit ".into(),
            "<q>".blue().bold(),
            " | Close ".into(),
            "<o>".blue().bold(),
            " | Mark read ".into(),
            "<r>".blue().bold(),
        ]),
        Focus::Form => Line::from(vec![
            " Fields ".into(),
            "<↑↓/Tab>".blue().bold(),
            " | Toggle ".into(),
            "<Space>".blue().bold(),
            " | Save ".into(),
            "<Enter>".blue().bold(),
            " | Cancel ".into(),
            "<Esc>".blue().bold(),
        ]),
        Focus::Detail => Line::from(vec![
            " Close ".into(),
            "<Esc/Enter>".blue().bold(),
        ]),
    };

    frame.render_widget(Paragraph::new(controls_line).left_aligned(), area);
}
