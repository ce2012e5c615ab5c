use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::theme;

const RETRY_HINT: &str = "Please try again later or contact support if the problem persists.";

fn card(frame: &mut Frame, area: Rect, title: Span<'_>, border: ratatui::style::Style, lines: Vec<Line<'_>>) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(theme::surface());

    let height = (lines.len() as u16 + 2).min(area.height);
    let card_area = Rect { height, ..area };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, card_area);
}

pub fn render_loading(frame: &mut Frame, area: Rect) {
    card(
        frame,
        area,
        Span::styled(" Loading... ", theme::gold().add_modifier(Modifier::BOLD)),
        theme::border(),
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Fetching prayer times, please wait...",
                theme::dim(),
            )),
            Line::from(""),
        ],
    );
}

pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    card(
        frame,
        area,
        Span::styled(" Error ", theme::red().add_modifier(Modifier::BOLD)),
        theme::red(),
        vec![
            Line::from(""),
            Line::from(Span::styled(format!("  ✗ {}", message), theme::red())),
            Line::from(Span::styled(format!("  {}", RETRY_HINT), theme::dim())),
            Line::from(""),
        ],
    );
}
