use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::App;
use crate::tui::theme;

const TITLE: &str = "Azan Prayer Times";
const MAX_WIDGET_WIDTH: u16 = 84;

/// Page wrapper around the widget: background, title, centered column.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme::base()), area);

    let big_title_width = (TITLE.width() * 4) as u16;
    let big = area.width >= big_title_width && area.height >= 30;
    let title_height = if big { 5 } else { 2 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(title_height), Constraint::Min(0)])
        .split(area);

    if big {
        let big_text = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(theme::gold())
            .lines(vec![Line::from(TITLE)])
            .build();
        frame.render_widget(big_text, centered(chunks[0], big_title_width));
    } else {
        let title = Paragraph::new(Line::from(Span::styled(
            TITLE,
            theme::gold().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);
    }

    app.draw(frame, centered(chunks[1], MAX_WIDGET_WIDTH));
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
