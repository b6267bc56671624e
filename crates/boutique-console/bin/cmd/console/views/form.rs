use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::cmd::console::state::FormSession;

fn centered_popup(area: Rect, width_pct: f32, height: u16) -> Rect {
    let popup_width = (area.width as f32 * width_pct) as u16;
    let popup_height = height.min(area.height);
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width,
        height: popup_height,
    }
}

/// Renders the create/edit modal on top of everything else. The selected
/// field carries a `>` marker and an input cursor; validation errors are
/// listed under the fields and block submission until fixed.
pub(crate) fn render_form_popup(session: &FormSession, area: Rect, frame: &mut Frame) {
    let height = (session.fields.len() + session.errors.len() + 6) as u16;
    let popup_area = centered_popup(area, 0.6, height);

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" {} ", session.title))
        .title_bottom(
            Line::from(vec![
                " Save ".into(),
                Span::styled("<Enter>", Style::default().fg(Color::Blue)),
                " | Cancel ".into(),
                Span::styled("<Esc>", Style::default().fg(Color::Blue)),
                " | Toggle ".into(),
                Span::styled("<Space> ", Style::default().fg(Color::Blue)),
            ])
            .centered(),
        )
        .border_set(border::DOUBLE);

    let inner_area = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::with_capacity(session.fields.len() + session.errors.len() + 1);
    for (i, field) in session.fields.iter().enumerate() {
        let selected = i == session.cursor;
        let marker = if selected { "> " } else { "  " };
        let label_style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let value_span = match field.flag {
            Some(true) => Span::styled("[x] active", Style::default().fg(Color::Green)),
            Some(false) => Span::styled("[ ] inactive", Style::default().fg(Color::DarkGray)),
            None => {
                let shown = if selected {
                    format!("{}_", field.value)
                } else {
                    field.value.clone()
                };
                Span::raw(shown)
            }
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<12}", field.label), label_style),
            value_span,
        ]));
    }

    if !session.errors.is_empty() {
        lines.push(Line::default());
        for error in &session.errors {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {}", error),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: false });
    frame.render_widget(paragraph, inner_area);
}
