//! Keyboard input handling, dispatched on the current screen and mode.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, LoginFocus, Mode, Screen, SignupFocus, Tab, PAGE_SCROLL_SIZE};

/// Handle a key event. Returns `Ok(true)` when the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.screen {
        Screen::Restoring => Ok(false),
        Screen::Login => handle_login_input(app, key).await,
        Screen::SignUp => handle_signup_input(app, key).await,
        Screen::Main => handle_main_input(app, key).await,
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+S switches to the signup form
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.screen = Screen::SignUp;
        app.signup_error = None;
        return Ok(false);
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.attempt_login().await,
        },
        KeyCode::Backspace => {
            match app.login_focus {
                LoginFocus::Email => {
                    app.login_email.pop();
                }
                LoginFocus::Password => {
                    app.login_password.pop();
                }
                LoginFocus::Button => {}
            };
        }
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => App::push_input(&mut app.login_email, c),
            LoginFocus::Password => App::push_input(&mut app.login_password, c),
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_signup_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.screen = Screen::Login;
            app.login_error = None;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.signup_focus = match app.signup_focus {
                SignupFocus::FullName => SignupFocus::Email,
                SignupFocus::Email => SignupFocus::Password,
                SignupFocus::Password => SignupFocus::Button,
                SignupFocus::Button => SignupFocus::FullName,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.signup_focus = match app.signup_focus {
                SignupFocus::FullName => SignupFocus::Button,
                SignupFocus::Email => SignupFocus::FullName,
                SignupFocus::Password => SignupFocus::Email,
                SignupFocus::Button => SignupFocus::Password,
            };
        }
        KeyCode::Enter => match app.signup_focus {
            SignupFocus::FullName => app.signup_focus = SignupFocus::Email,
            SignupFocus::Email => app.signup_focus = SignupFocus::Password,
            SignupFocus::Password | SignupFocus::Button => app.attempt_signup().await,
        },
        KeyCode::Backspace => {
            match app.signup_focus {
                SignupFocus::FullName => {
                    app.signup_name.pop();
                }
                SignupFocus::Email => {
                    app.signup_email.pop();
                }
                SignupFocus::Password => {
                    app.signup_password.pop();
                }
                SignupFocus::Button => {}
            };
        }
        KeyCode::Char(c) => match app.signup_focus {
            SignupFocus::FullName => App::push_input(&mut app.signup_name, c),
            SignupFocus::Email => App::push_input(&mut app.signup_email, c),
            SignupFocus::Password => App::push_input(&mut app.signup_password, c),
            SignupFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_main_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.mode {
        Mode::Normal => handle_normal_input(app, key).await,
        Mode::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.mode = Mode::Normal;
            }
            Ok(false)
        }
        Mode::Sharing => handle_share_input(app, key),
        Mode::ViewingAudit => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                app.audit_view = None;
                app.mode = Mode::Normal;
            }
            Ok(false)
        }
        Mode::UploadPrompt => handle_upload_input(app, key),
        Mode::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.mode = Mode::Normal;
                    app.delete_selected();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.mode = Mode::Normal;
                }
                _ => {}
            }
            Ok(false)
        }
    }
}

async fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('?') => app.mode = Mode::ShowingHelp,
        KeyCode::Char('1') => app.current_tab = Tab::MyFiles,
        KeyCode::Char('2') => app.current_tab = Tab::SharedWithMe,
        KeyCode::Char('3') => app.current_tab = Tab::Activity,
        KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Char('r') => {
            app.refresh_files();
            app.refresh_activity();
        }
        KeyCode::Char('u') => {
            if app.current_tab == Tab::MyFiles {
                app.upload_path.clear();
                app.mode = Mode::UploadPrompt;
            }
        }
        KeyCode::Char('d') => app.download_selected(),
        KeyCode::Char('s') => app.open_share_dialog(),
        KeyCode::Char('h') => app.open_audit_view(),
        KeyCode::Char('x') => {
            if app.selected_file().is_some_and(|f| f.is_owned()) {
                app.mode = Mode::ConfirmingDelete;
            }
        }
        KeyCode::Char('L') => app.logout().await,
        _ => {}
    }
    Ok(false)
}

fn handle_share_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // While typing a filter, keys edit the filter text only.
    if app
        .share_dialog
        .as_ref()
        .is_some_and(|dialog| dialog.filtering)
    {
        if let Some(dialog) = app.share_dialog.as_mut() {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => dialog.filtering = false,
                KeyCode::Backspace => {
                    dialog.filter.pop();
                    dialog.cursor = 0;
                }
                KeyCode::Char(c) => {
                    App::push_input(&mut dialog.filter, c);
                    dialog.cursor = 0;
                }
                _ => {}
            }
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            app.share_dialog = None;
            app.mode = Mode::Normal;
            return Ok(false);
        }
        KeyCode::Enter => {
            app.share_with_selected();
            return Ok(false);
        }
        KeyCode::Char('l') => {
            app.request_share_link();
            return Ok(false);
        }
        KeyCode::Char('e') => {
            if let Some(dialog) = app.share_dialog.as_mut() {
                dialog.cycle_expiry();
            }
            return Ok(false);
        }
        _ => {}
    }

    let Some(dialog) = app.share_dialog.as_mut() else {
        return Ok(false);
    };
    match key.code {
        KeyCode::Char('/') => dialog.filtering = true,
        KeyCode::Up => dialog.cursor = dialog.cursor.saturating_sub(1),
        KeyCode::Down => {
            let visible = dialog.visible_users().len();
            if dialog.cursor + 1 < visible {
                dialog.cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            let id = dialog
                .visible_users()
                .get(dialog.cursor)
                .map(|u| u.id.clone());
            if let Some(id) = id {
                if !dialog.selected.remove(&id) {
                    dialog.selected.insert(id);
                }
            }
        }
        KeyCode::Char('r') => {
            // Revoke the grant held by the user under the cursor,
            // matched through the directory listing by email.
            let target = dialog.visible_users().get(dialog.cursor).and_then(|user| {
                let has_grant = dialog.permissions.iter().any(|grant| {
                    grant
                        .user
                        .as_ref()
                        .and_then(|u| u.email.as_deref())
                        .is_some_and(|email| email == user.email)
                });
                has_grant.then(|| user.id.clone())
            });
            if let Some(user_id) = target {
                app.revoke_grant(user_id);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_upload_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.upload_path.clear();
            app.mode = Mode::Normal;
        }
        KeyCode::Enter => app.upload_from_prompt(),
        KeyCode::Backspace => {
            app.upload_path.pop();
        }
        KeyCode::Char(c) => App::push_input(&mut app.upload_path, c),
        _ => {}
    }
    Ok(false)
}
