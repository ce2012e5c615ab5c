use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table},
    Frame,
};

use crate::models::{DelayTimes, PrayerName, PrayerTimings};
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    timings: &PrayerTimings,
    delays: &DelayTimes,
    focused_idx: usize,
) {
    let block = Block::default()
        .title(Span::styled(" Main Prayer Times ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let header = Row::new(vec![
        Cell::from("  Prayer"),
        Cell::from("Time"),
        Cell::from("Adjusted Time"),
        Cell::from("Delay (minutes)"),
    ])
    .style(theme::dim().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = PrayerName::all()
        .into_iter()
        .enumerate()
        .map(|(i, prayer)| {
            let is_focused = i == focused_idx;
            let base = timings.time_of(prayer);
            let delay = delays.get(prayer);
            let adjusted = delays
                .adjusted(prayer, base)
                .unwrap_or_else(|| "--:--".to_string());

            let marker = if is_focused { "▸ " } else { "  " };
            let name_style = if is_focused {
                theme::gold().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };
            let adjusted_style = if delay > 0 { theme::amber() } else { theme::dim() };
            let delay_field = if is_focused {
                Span::styled(format!("[{:>4}▏]", delay), theme::gold())
            } else {
                Span::styled(format!("[{:>4} ]", delay), theme::dim())
            };

            Row::new(vec![
                Cell::from(Span::styled(format!("{}{}", marker, prayer.display_name()), name_style)),
                Cell::from(Span::styled(base.to_string(), theme::bold())),
                Cell::from(Span::styled(adjusted, adjusted_style)),
                Cell::from(delay_field),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
