use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::DateInfo;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, city: &str, date: &DateInfo, azan_playing: bool) {
    let (azan_icon, azan_label, azan_style) = if azan_playing {
        ("♫", " azan playing", theme::green().add_modifier(Modifier::BOLD))
    } else {
        ("♪", " azan off", theme::dim())
    };

    let title = Line::from(vec![
        Span::styled(" ◷ Prayer Times ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled(format!("· {} ", city), theme::dim()),
    ]);

    let text = vec![
        Line::from(vec![
            Span::styled(azan_icon, azan_style),
            Span::styled(azan_label, azan_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(date.readable.as_str(), theme::bold())),
        Line::from(vec![
            Span::styled("Hijri: ", theme::dim()),
            Span::styled(date.hijri.formatted(), theme::amber()),
        ]),
        Line::from(vec![
            Span::styled("Gregorian: ", theme::dim()),
            Span::styled(date.gregorian.formatted(), theme::dim()),
        ]),
    ];

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
