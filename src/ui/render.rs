use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Mode, Screen, Tab};

use super::auth_screens;
use super::overlays;
use super::styles;
use super::tabs::{activity, files};

pub fn render(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Restoring => render_restoring(frame),
        Screen::Login => auth_screens::render_login(frame, app),
        Screen::SignUp => auth_screens::render_signup(frame, app),
        Screen::Main => render_main(frame, app),
    }
}

/// Placeholder while session restoration is unresolved. No gated
/// content is drawn in this state.
fn render_restoring(frame: &mut Frame) {
    let area = centered_rect_fixed(30, 3, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(Line::from(Span::styled(
        " Checking session... ",
        styles::muted_style(),
    )))
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_main(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.mode {
        Mode::ShowingHelp => overlays::render_help(frame),
        Mode::Sharing => overlays::render_share_dialog(frame, app),
        Mode::ViewingAudit => overlays::render_audit_view(frame, app),
        Mode::UploadPrompt => overlays::render_upload_prompt(frame, app),
        Mode::ConfirmingDelete => overlays::render_delete_confirm(frame, app),
        Mode::Normal => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  NUA Files";
    let account = match app.current_user() {
        Some(user) => format!("{} <{}>  [?] Help", user.full_name, user.email),
        None => "[?] Help".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + account.len() + 4),
        )),
        Span::styled(account, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = vec![
        ("[1] My Files", app.current_tab == Tab::MyFiles),
        ("[2] Shared with Me", app.current_tab == Tab::SharedWithMe),
        ("[3] Activity", app.current_tab == Tab::Activity),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *selected {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::MyFiles => files::render_my_files(frame, app, area),
        Tab::SharedWithMe => files::render_shared(frame, app, area),
        Tab::Activity => activity::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::MyFiles => "[u]pload [d]ownload [s]hare [h]istory [x] delete | [q]uit",
        Tab::SharedWithMe => "[d]ownload [h]istory | [q]uit",
        Tab::Activity => "[r]efresh | [q]uit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.files_loading {
        " Loading... ".to_string()
    } else {
        format!(" {} ", app.api.base_url())
    };

    let right_text = format!(" {} ", shortcuts);
    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
