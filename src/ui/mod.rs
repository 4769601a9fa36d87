pub mod header;
pub mod help;
pub mod history;
pub mod meters;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &app.recorder,
        app.interval_secs,
        &app.theme,
        app.border_style,
    );

    let snapshot = app.snapshot;
    let App {
        history: open_view,
        theme,
        border_style,
        ..
    } = &mut *app;
    if let Some(view) = open_view.as_mut() {
        history::render(frame, chunks[1], view, theme, *border_style);
    } else {
        meters::render(frame, chunks[1], &snapshot, theme, *border_style);
    }

    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.interval_input,
        app.status_message.as_ref(),
        &app.theme,
        app.history.is_some(),
        app.recorder.is_recording(),
    );

    // Help overlay — rendered last to appear on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
