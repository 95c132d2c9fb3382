//! Modal overlays drawn on top of the main screen.

use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::utils::{format_date, format_expiry, truncate_string};

use super::render::centered_rect_fixed;
use super::styles;

pub fn render_help(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  NUA Files", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-3       ", styles::help_key_style()),
            Span::styled("Switch tabs", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", styles::help_key_style()),
            Span::styled("Prev/next tab", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓       ", styles::help_key_style()),
            Span::styled("Navigate list", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", styles::help_key_style()),
            Span::styled("Close dialog", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Upload a file", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d         ", styles::help_key_style()),
            Span::styled("Download selected file", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  s         ", styles::help_key_style()),
            Span::styled("Share selected file", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  h         ", styles::help_key_style()),
            Span::styled("File history (audit trail)", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  x         ", styles::help_key_style()),
            Span::styled("Delete selected file", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  L         ", styles::help_key_style()),
            Span::styled("Log out", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

pub fn render_share_dialog(frame: &mut Frame, app: &App) {
    let Some(dialog) = app.share_dialog.as_ref() else {
        return;
    };

    let area = centered_rect_fixed(62, 26, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Share: {}", truncate_string(&dialog.filename, 50)),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" People", styles::highlight_style())),
    ];

    if dialog.filtering || !dialog.filter.is_empty() {
        let cursor = if dialog.filtering { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled("   Filter: ", styles::muted_style()),
            Span::styled(format!("{}{}", dialog.filter, cursor), styles::highlight_style()),
        ]));
    }

    let visible = dialog.visible_users();
    if dialog.loading {
        lines.push(Line::from(Span::styled(
            "   Loading users...",
            styles::muted_style(),
        )));
    } else if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "   No matching users",
            styles::muted_style(),
        )));
    } else {
        for (i, user) in visible.iter().enumerate() {
            let marker = if dialog.selected.contains(&user.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if i == dialog.cursor {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            lines.push(Line::from(Span::styled(
                format!("   {} {} <{}>", marker, user.full_name, user.email),
                style,
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Expires: ", styles::highlight_style()),
        Span::raw(dialog.expiry_label()),
        Span::styled("  (press e to change)", styles::muted_style()),
    ]));

    if !dialog.permissions.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Current access",
            styles::highlight_style(),
        )));
        for grant in &dialog.permissions {
            let who = grant.user.as_ref().map_or("Unknown User", |u| u.display());
            let until = format_expiry(grant.expires_at.as_deref());
            lines.push(Line::from(Span::styled(
                format!("   {} ({})", who, until),
                styles::list_item_style(),
            )));
        }
    }

    if let Some(ref link) = dialog.link {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Link: ", styles::highlight_style()),
            Span::styled(truncate_string(&link.url, 52), styles::success_style()),
        ]));
    }

    if let Some(ref status) = dialog.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", status),
            styles::highlight_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Space", styles::help_key_style()),
        Span::styled(" toggle  ", styles::muted_style()),
        Span::styled("/", styles::help_key_style()),
        Span::styled(" filter  ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" share  ", styles::muted_style()),
        Span::styled("l", styles::help_key_style()),
        Span::styled(" link  ", styles::muted_style()),
        Span::styled("r", styles::help_key_style()),
        Span::styled(" revoke  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_audit_view(frame: &mut Frame, app: &App) {
    let Some(view) = app.audit_view.as_ref() else {
        return;
    };

    let area = centered_rect_fixed(64, 20, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" History: {}", truncate_string(&view.filename, 50)),
            styles::title_style(),
        )),
        Line::from(""),
    ];

    if view.loading {
        lines.push(Line::from(Span::styled(
            "   Loading...",
            styles::muted_style(),
        )));
    } else if view.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "   No recorded activity",
            styles::muted_style(),
        )));
    } else {
        for entry in view.entries.iter().take(14) {
            let when = entry
                .timestamp
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<14}", when), styles::muted_style()),
                Span::styled(format!("{:<10}", entry.action), styles::highlight_style()),
                Span::raw(entry.actor_display()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_upload_prompt(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(56, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(" Upload a file", styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Path: ", styles::muted_style()),
            Span::styled(
                format!("{}▌", truncate_string(&app.upload_path, 44)),
                styles::selected_style(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter", styles::help_key_style()),
            Span::styled(" upload  ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_delete_confirm(frame: &mut Frame, app: &App) {
    let filename = app
        .selected_file()
        .map(|f| f.filename.clone())
        .unwrap_or_default();

    let area = centered_rect_fixed(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(" Delete file", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Delete {}?", truncate_string(&filename, 40)),
            styles::highlight_style(),
        )),
        Line::from(Span::styled(
            " This cannot be undone.",
            styles::error_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
