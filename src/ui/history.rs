use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::HistoryView;
use crate::format::truncate_unicode;
use crate::ui::theme::{BorderStyle, Theme};

const TIMESTAMP_WIDTH: usize = 19;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: &mut HistoryView,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_style.border_type())
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" History ({} samples) ", view.rows.len()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));

    if view.rows.is_empty() {
        let hint = Paragraph::new("No samples recorded yet")
            .style(Style::default().fg(theme.text_secondary))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let header = Row::new(vec!["ID", "CPU %", "Memory %", "Disk %", "Timestamp"])
        .style(
            Style::default()
                .fg(theme.table_header_fg)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.id.to_string()),
                Cell::from(format!("{:.1}", s.cpu_percent)),
                Cell::from(format!("{:.1}", s.memory_percent)),
                Cell::from(format!("{:.1}", s.disk_percent)),
                Cell::from(truncate_unicode(&s.recorded_at, TIMESTAMP_WIDTH)),
            ])
            .style(Style::default().fg(theme.text_primary))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Min(TIMESTAMP_WIDTH as u16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .bg(theme.table_selected_bg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut view.table);
}
