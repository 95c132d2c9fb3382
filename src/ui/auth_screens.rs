//! Login and signup screens, shown while the session is anonymous.

use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus, SignupFocus};

use super::render::centered_rect_fixed;
use super::styles;

const LOGO: [&str; 3] = [
    "      ╔╗╔╦ ╦╔═╗  ╔═╗╦╦  ╔═╗╔═╗",
    "      ║║║║ ║╠═╣  ╠╣ ║║  ║╣ ╚═╗",
    "      ╝╚╝╚═╝╩ ╩  ╚  ╩╩═╝╚═╝╚═╝",
];

fn logo_lines() -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|row| Line::from(Span::styled(*row, styles::title_style())))
        .collect();
    lines.push(Line::from(""));
    lines
}

fn field_line(label: &str, value: &str, masked: bool, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let shown = if masked {
        "*".repeat(value.chars().count().min(24))
    } else {
        value.chars().take(24).collect()
    };
    let display = format!("{:<24}", shown);
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("{:<10}[", label), styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("              ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

pub fn render_login(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();

    lines.push(field_line(
        "Email:",
        &app.login_email,
        false,
        app.login_focus == LoginFocus::Email,
    ));
    lines.push(field_line(
        "Password:",
        &app.login_password,
        true,
        app.login_focus == LoginFocus::Password,
    ));
    lines.push(Line::from(""));
    lines.push(button_line("Sign In", app.login_focus == LoginFocus::Button));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   New here? Press ", styles::muted_style()),
        Span::styled("Ctrl+S", styles::help_key_style()),
        Span::styled(" to sign up", styles::muted_style()),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_signup(frame: &mut Frame, app: &App) {
    let height = if app.signup_error.is_some() { 16 } else { 14 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();

    lines.push(field_line(
        "Name:",
        &app.signup_name,
        false,
        app.signup_focus == SignupFocus::FullName,
    ));
    lines.push(field_line(
        "Email:",
        &app.signup_email,
        false,
        app.signup_focus == SignupFocus::Email,
    ));
    lines.push(field_line(
        "Password:",
        &app.signup_password,
        true,
        app.signup_focus == SignupFocus::Password,
    ));
    lines.push(Line::from(""));
    lines.push(button_line("Sign Up", app.signup_focus == SignupFocus::Button));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to return to sign in", styles::muted_style()),
    ]));

    if let Some(ref error) = app.signup_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
