//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a two-row split: a scrollable list on top and a one-line
//!   status bar at the bottom.
//! * Only the rows inside the list's inner area are bound each frame (see
//!   [`App::visible_rows`]); the list widget therefore receives a window, not
//!   the whole feed, and the highlight index is relative to that window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::adapter::RowSurface;
use crate::app::App;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_quake_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

/// Colour bands loosely following the USGS map legend.
fn magnitude_color(magnitude: f64) -> Color {
    match magnitude {
        m if m >= 7.0 => Color::Red,
        m if m >= 5.0 => Color::LightRed,
        m if m >= 3.0 => Color::Yellow,
        _ => Color::Green,
    }
}

fn format_time(row: &RowSurface) -> String {
    row.occurred_at()
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown time".into())
}

/// The location span borrows from the row surface.
fn row_line(row: &RowSurface) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            format!("{:>5}", row.magnitude_label()),
            Style::default()
                .fg(magnitude_color(row.magnitude))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:<22}", format_time(row)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
        Span::styled(row.location.as_str(), Style::default().fg(Color::White)),
    ])
}

/// Render the visible window of the earthquake list.
fn draw_quake_list(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inside the border.
    let height = usize::from(area.height.saturating_sub(2));

    let selected = app.selected;
    let rows = app.visible_rows(height);
    let highlighted = rows.iter().position(|row| Some(row.position) == selected);
    let list_items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_line(row))).collect();

    let mut window_state = ListState::default();
    window_state.select(highlighted);

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(" Earthquakes ")
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut window_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} rows", app.row_count()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  Home/End: jump  r: reload"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadMsg;
    use crate::source::EarthquakeRecord;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_with(records: Vec<EarthquakeRecord>) -> App {
        let mut app = App::new();
        app.load_started(1);
        app.apply_load(LoadMsg {
            generation: 1,
            records,
        });
        app
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_with_no_rows() {
        let mut app = App::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();
    }

    #[test]
    fn draw_shows_bound_fields() {
        let mut app = app_with(vec![EarthquakeRecord::new(6.2, "10km N of X", 1_500_000_000_000)]);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("6.2"));
        assert!(text.contains("10km N of X"));
        assert!(text.contains("2017-07-14 02:40 UTC"));
        assert!(text.contains("1 rows"));
    }

    #[test]
    fn draw_scrolls_to_selection_in_tiny_terminal() {
        let records = (0..50)
            .map(|i| EarthquakeRecord::new(1.0, format!("quake-{i:02}"), 0))
            .collect();
        let mut app = app_with(records);
        app.select_last();

        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("quake-49"));
        assert!(!text.contains("quake-00"));
    }

    #[test]
    fn format_time_handles_out_of_range() {
        let row = RowSurface {
            time_ms: i64::MAX,
            ..Default::default()
        };
        assert_eq!(format_time(&row), "unknown time");
    }

    #[test]
    fn row_line_borrows_location() {
        let mut row = RowSurface::default();
        row.bind(0, &EarthquakeRecord::new(4.5, "near the coast", 0));

        let line = row_line(&row);
        let location = line.spans.last().unwrap();
        assert_eq!(location.content, "near the coast");
        assert!(matches!(location.content, std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn magnitude_colors_by_band() {
        assert_eq!(magnitude_color(7.5), Color::Red);
        assert_eq!(magnitude_color(2.0), Color::Green);
    }
}
