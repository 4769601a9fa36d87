use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Gauge};

use crate::format::format_bytes;
use crate::system::snapshot::UsageSnapshot;
use crate::ui::theme::{BorderStyle, Theme};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &UsageSnapshot,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_gauge(
        frame,
        chunks[0],
        " CPU ",
        snapshot.cpu_percent,
        format!("{:.1}%", snapshot.cpu_percent),
        theme.cpu_gauge,
        theme,
        border_style,
    );
    render_gauge(
        frame,
        chunks[1],
        " Memory ",
        snapshot.memory_percent,
        byte_label(snapshot.memory_used, snapshot.memory_total, snapshot.memory_percent),
        theme.memory_gauge,
        theme,
        border_style,
    );
    render_gauge(
        frame,
        chunks[2],
        " Disk ",
        snapshot.disk_percent,
        byte_label(snapshot.disk_used, snapshot.disk_total, snapshot.disk_percent),
        theme.disk_gauge,
        theme,
        border_style,
    );
}

fn byte_label(used: u64, total: u64, percent: f32) -> String {
    format!(
        "{}/{} ({:.0}%)",
        format_bytes(used),
        format_bytes(total),
        percent
    )
}

#[allow(clippy::too_many_arguments)]
fn render_gauge(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    percent: f32,
    label: String,
    filled: ratatui::style::Color,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_style.border_type())
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let ratio = (f64::from(percent) / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(filled).bg(theme.gauge_unfilled))
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}
