use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format_date;

/// Account-wide activity feed. Downloads are filtered out upstream to
/// keep the feed focused on sharing and lifecycle events.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.visible_activity();

    let header = Row::new([
        Cell::from("Date"),
        Cell::from("Action"),
        Cell::from("By"),
        Cell::from("Target"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let when = entry
                .timestamp
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            let target = entry.target_user.as_ref().map_or("-", |u| u.display());
            Row::new(vec![
                Cell::from(when),
                Cell::from(entry.action.clone()),
                Cell::from(entry.actor_display()),
                Cell::from(target),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(14), // Date
        Constraint::Length(12), // Action
        Constraint::Fill(1),    // Actor
        Constraint::Fill(1),    // Target
    ];

    let title = format!(" Activity ({}) ", entries.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !entries.is_empty() {
        state.select(Some(app.activity_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
