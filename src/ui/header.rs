use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::format::format_duration;
use crate::recorder::Recorder;
use crate::ui::theme::{BorderStyle, Theme};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    recorder: &Recorder,
    interval_secs: u64,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_style.border_type())
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![Span::styled(
        " vitals ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    )];

    if recorder.is_recording() {
        spans.extend([
            Span::raw("  "),
            Span::styled(
                "\u{25cf} REC",
                Style::default()
                    .fg(theme.recording)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format_duration(recorder.elapsed_secs()),
                Style::default().fg(theme.text_primary),
            ),
        ]);
    } else {
        spans.extend([
            Span::raw("  "),
            Span::styled("idle", Style::default().fg(theme.text_secondary)),
        ]);
    }

    spans.extend([
        Span::raw("  "),
        Span::styled(
            format!("every {interval_secs} s"),
            Style::default().fg(theme.text_secondary),
        ),
    ]);

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line), inner);
}
