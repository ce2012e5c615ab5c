use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::PrayerTimings;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, timings: &PrayerTimings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let sunrise = Line::from(vec![
        Span::styled(" ☀ ", theme::yellow()),
        Span::styled(format!("Sunrise: {}", timings.sunrise), theme::bold()),
    ]);
    let sunset = Line::from(vec![
        Span::styled("☾ ", theme::blue()),
        Span::styled(format!("Sunset: {} ", timings.sunset), theme::bold()),
    ]);

    frame.render_widget(Paragraph::new(sunrise), halves[0]);
    frame.render_widget(
        Paragraph::new(sunset).alignment(ratatui::layout::Alignment::Right),
        halves[1],
    );
}
