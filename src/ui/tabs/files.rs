use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::models::RemoteFile;
use crate::ui::styles;
use crate::utils::{format_date, format_expiry, format_size};

pub fn render_my_files(frame: &mut Frame, app: &App, area: Rect) {
    let files = app.my_files();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Size"),
        Cell::from("Uploaded"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = files
        .iter()
        .map(|file| {
            Row::new(vec![
                Cell::from(file.filename.as_str()),
                Cell::from(file.kind_label()),
                Cell::from(format_size(file.size)),
                Cell::from(uploaded_label(file)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Percentage(45), // Name
        Constraint::Length(8),      // Type
        Constraint::Length(12),     // Size
        Constraint::Fill(1),        // Uploaded
    ];

    let title = format!(" My Files ({}) ", files.len());
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
    if !files.is_empty() {
        state.select(Some(app.my_files_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

pub fn render_shared(frame: &mut Frame, app: &App, area: Rect) {
    let files = app.shared_files();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Owner"),
        Cell::from("Size"),
        Cell::from("Access expires"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = files
        .iter()
        .map(|file| {
            Row::new(vec![
                Cell::from(file.filename.as_str()),
                Cell::from(file.owner_display()),
                Cell::from(format_size(file.size)),
                Cell::from(format_expiry(file.expires_at.as_deref())),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Percentage(40), // Name
        Constraint::Fill(1),        // Owner
        Constraint::Length(12),     // Size
        Constraint::Length(16),     // Expiry
    ];

    let title = format!(" Shared with Me ({}) ", files.len());
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
    if !files.is_empty() {
        state.select(Some(app.shared_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn uploaded_label(file: &RemoteFile) -> String {
    file.uploaded_at
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "-".to_string())
}
