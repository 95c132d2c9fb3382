//! Application state management for the NUA files client.
//!
//! This module contains the core `App` struct that manages all application
//! state, including UI state, the session lifecycle, fetched data, and
//! background task coordination.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, TokenCell};
use crate::auth::{KeyringTokenStore, SessionSnapshot, SessionStatus, SessionStore};
use crate::config::Config;
use crate::models::{
    AuditEntry, DirectoryUser, PermissionEntry, RemoteFile, ShareLink, User,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 covers a refresh burst (files + directory + audit) with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for text inputs (email, password, name, path).
const MAX_INPUT_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Expiry choices cycled in the share dialog, in days. `None` is "never".
const EXPIRY_CHOICES: [Option<u32>; 4] = [None, Some(1), Some(7), Some(30)];

/// The production session type: real backend, OS keychain.
pub type Session = SessionStore<ApiClient, KeyringTokenStore>;

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level screen, driven by the session status. Gated content is
/// only ever rendered from `Main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Session restoration has not resolved; render a placeholder only.
    Restoring,
    Login,
    SignUp,
    Main,
}

/// Modal state within the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    ShowingHelp,
    Sharing,
    ViewingAudit,
    UploadPrompt,
    ConfirmingDelete,
}

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    MyFiles,
    SharedWithMe,
    Activity,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::MyFiles => "My Files",
            Tab::SharedWithMe => "Shared with Me",
            Tab::Activity => "Activity",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::MyFiles => Tab::SharedWithMe,
            Tab::SharedWithMe => Tab::Activity,
            Tab::Activity => Tab::MyFiles,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::MyFiles => Tab::Activity,
            Tab::SharedWithMe => Tab::MyFiles,
            Tab::Activity => Tab::SharedWithMe,
        }
    }
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Signup form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFocus {
    FullName,
    Email,
    Password,
    Button,
}

/// State for the share dialog, opened on a single owned file.
pub struct ShareDialog {
    pub file_id: String,
    pub filename: String,
    /// Everyone who can be shared with, minus the current account.
    pub users: Vec<DirectoryUser>,
    /// Current grants on the file, for display and revocation.
    pub permissions: Vec<PermissionEntry>,
    /// User ids ticked for the next share action.
    pub selected: HashSet<String>,
    pub cursor: usize,
    /// Substring filter over name and email.
    pub filter: String,
    pub filtering: bool,
    /// Index into `EXPIRY_CHOICES`.
    expiry_index: usize,
    pub link: Option<ShareLink>,
    pub loading: bool,
    pub status: Option<String>,
}

impl ShareDialog {
    fn new(file_id: String, filename: String) -> Self {
        Self {
            file_id,
            filename,
            users: Vec::new(),
            permissions: Vec::new(),
            selected: HashSet::new(),
            cursor: 0,
            filter: String::new(),
            filtering: false,
            expiry_index: 0,
            link: None,
            loading: true,
            status: None,
        }
    }

    /// Users matching the current filter, in directory order.
    pub fn visible_users(&self) -> Vec<&crate::models::DirectoryUser> {
        self.users
            .iter()
            .filter(|u| {
                self.filter.is_empty()
                    || crate::utils::contains_ignore_case(&u.full_name, &self.filter)
                    || crate::utils::contains_ignore_case(&u.email, &self.filter)
            })
            .collect()
    }

    pub fn expiry_days(&self) -> Option<u32> {
        EXPIRY_CHOICES[self.expiry_index]
    }

    pub fn cycle_expiry(&mut self) {
        self.expiry_index = (self.expiry_index + 1) % EXPIRY_CHOICES.len();
    }

    pub fn expiry_label(&self) -> String {
        match self.expiry_days() {
            None => "Never".to_string(),
            Some(1) => "1 day".to_string(),
            Some(n) => format!("{} days", n),
        }
    }
}

/// State for the per-file audit overlay.
pub struct AuditView {
    pub file_id: String,
    pub filename: String,
    pub entries: Vec<AuditEntry>,
    pub loading: bool,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks.
///
/// These variants are sent through an MPSC channel from spawned fetch
/// tasks back to the main application loop.
enum FetchResult {
    /// Startup restore resolved to a definite session status
    SessionResolved(SessionStatus),
    /// Full file listing (owned and shared, distinguished by role)
    Files(Vec<RemoteFile>),
    /// User directory for the share dialog
    Directory(Vec<DirectoryUser>),
    /// Current grants for a file (file_id, grants)
    Permissions(String, Vec<PermissionEntry>),
    /// Account-wide activity feed
    Activity(Vec<AuditEntry>),
    /// Audit trail for a single file (file_id, entries)
    FileAudit(String, Vec<AuditEntry>),
    /// Upload finished (filename)
    Uploaded(String),
    /// Delete finished (file_id)
    Deleted(String),
    /// Download finished (filename, destination)
    Downloaded(String, PathBuf),
    /// Share grants applied (file_id)
    Shared(String),
    /// Share link minted (file_id, link)
    LinkMinted(String, ShareLink),
    /// A grant was revoked (file_id)
    Revoked(String),
    /// An error occurred in a background task
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub session: Arc<Session>,
    session_rx: watch::Receiver<SessionSnapshot>,
    cancel: CancellationToken,

    // UI state
    pub screen: Screen,
    pub mode: Mode,
    pub current_tab: Tab,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Signup form state
    pub signup_name: String,
    pub signup_email: String,
    pub signup_password: String,
    pub signup_focus: SignupFocus,
    pub signup_error: Option<String>,

    // Fetched data
    pub files: Vec<RemoteFile>,
    pub activity: Vec<AuditEntry>,
    pub files_loading: bool,

    // Selection indices per tab
    pub my_files_selection: usize,
    pub shared_selection: usize,
    pub activity_selection: usize,

    // Overlay state
    pub share_dialog: Option<ShareDialog>,
    pub audit_view: Option<AuditView>,
    pub upload_path: String,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance. The session starts in
    /// `Restoring`; call `start_restore` once the event loop is up.
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let token_cell = TokenCell::new();
        let api = ApiClient::new(&config.api_url(), token_cell.clone())?;
        let session = Arc::new(SessionStore::new(
            api.clone(),
            KeyringTokenStore,
            token_cell,
        ));
        let session_rx = session.subscribe();

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = config.last_email.clone().unwrap_or_default();

        Ok(Self {
            config,
            api,
            session,
            session_rx,
            cancel: CancellationToken::new(),

            screen: Screen::Restoring,
            mode: Mode::Normal,
            current_tab: Tab::MyFiles,

            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,

            signup_name: String::new(),
            signup_email: String::new(),
            signup_password: String::new(),
            signup_focus: SignupFocus::FullName,
            signup_error: None,

            files: Vec::new(),
            activity: Vec::new(),
            files_loading: false,

            my_files_selection: 0,
            shared_selection: 0,
            activity_selection: 0,

            share_dialog: None,
            audit_view: None,
            upload_path: String::new(),

            fetch_rx: rx,
            fetch_tx: tx,

            status_message: None,
        })
    }

    /// Signal background tasks that the app is going away.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Kick off session restoration in the background. The screen stays
    /// on `Restoring` until the result lands.
    pub fn start_restore(&self) {
        info!("Starting session restore");
        let session = Arc::clone(&self.session);
        let cancel = self.cancel.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let status = session.restore(&cancel).await;
            Self::send_result(&tx, FetchResult::SessionResolved(status)).await;
        });
    }

    /// Attempt login with the credentials from the login form.
    /// Navigation happens when the session transition is observed, so
    /// the committed state is always ahead of the screen change.
    pub async fn attempt_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;

        match self.session.login(&email, &password, &self.cancel).await {
            Ok(user) => {
                info!(email = %user.email, "Login succeeded");
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.login_password.clear();
            }
            Err(e) => {
                debug!(error = %e, "Login rejected");
                self.login_error = Some(e.to_string());
            }
        }
    }

    /// Attempt account creation with the signup form contents. Local
    /// validation failures never reach the network.
    pub async fn attempt_signup(&mut self) {
        let full_name = self.signup_name.trim().to_string();
        let email = self.signup_email.trim().to_string();
        let password = self.signup_password.clone();

        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            self.signup_error = Some("All fields are required".to_string());
            return;
        }

        self.signup_error = None;

        match self
            .session
            .signup(&full_name, &email, &password, &self.cancel)
            .await
        {
            Ok(user) => {
                info!(email = %user.email, "Signup succeeded");
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.signup_password.clear();
            }
            Err(e) => {
                debug!(error = %e, "Signup rejected");
                self.signup_error = Some(e.to_string());
            }
        }
    }

    /// Sign out and drop all fetched data.
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.files.clear();
        self.activity.clear();
        self.share_dialog = None;
        self.audit_view = None;
        self.mode = Mode::Normal;
        self.status_message = None;
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// Files owned by the account.
    pub fn my_files(&self) -> Vec<&RemoteFile> {
        self.files.iter().filter(|f| f.is_owned()).collect()
    }

    /// Files shared with the account by others.
    pub fn shared_files(&self) -> Vec<&RemoteFile> {
        self.files.iter().filter(|f| !f.is_owned()).collect()
    }

    /// Activity feed without download noise.
    pub fn visible_activity(&self) -> Vec<&AuditEntry> {
        self.activity.iter().filter(|e| !e.is_download()).collect()
    }

    /// The file under the cursor on the current tab, if any.
    pub fn selected_file(&self) -> Option<&RemoteFile> {
        match self.current_tab {
            Tab::MyFiles => self.my_files().get(self.my_files_selection).copied(),
            Tab::SharedWithMe => self.shared_files().get(self.shared_selection).copied(),
            Tab::Activity => None,
        }
    }

    pub fn selection(&self) -> usize {
        match self.current_tab {
            Tab::MyFiles => self.my_files_selection,
            Tab::SharedWithMe => self.shared_selection,
            Tab::Activity => self.activity_selection,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = match self.current_tab {
            Tab::MyFiles => self.my_files().len(),
            Tab::SharedWithMe => self.shared_files().len(),
            Tab::Activity => self.visible_activity().len(),
        };
        if len == 0 {
            return;
        }
        let slot = match self.current_tab {
            Tab::MyFiles => &mut self.my_files_selection,
            Tab::SharedWithMe => &mut self.shared_selection,
            Tab::Activity => &mut self.activity_selection,
        };
        *slot = (*slot as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selections(&mut self) {
        let my_len = self.my_files().len();
        let shared_len = self.shared_files().len();
        let activity_len = self.visible_activity().len();
        self.my_files_selection = self.my_files_selection.min(my_len.saturating_sub(1));
        self.shared_selection = self.shared_selection.min(shared_len.saturating_sub(1));
        self.activity_selection = self.activity_selection.min(activity_len.saturating_sub(1));
    }

    // =========================================================================
    // Background fetches
    // =========================================================================

    /// Helper to send fetch results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send fetch result - channel closed");
        }
    }

    /// Refresh the file listing in the background.
    pub fn refresh_files(&mut self) {
        self.files_loading = true;
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.list_files().await {
                Ok(files) => FetchResult::Files(files),
                Err(e) => FetchResult::Error(format!("Failed to load files: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Refresh the account activity feed in the background.
    pub fn refresh_activity(&self) {
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.user_activity().await {
                Ok(entries) => FetchResult::Activity(entries),
                Err(e) => FetchResult::Error(format!("Failed to load activity: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Open the share dialog for the selected file and start loading
    /// the user directory and current grants.
    pub fn open_share_dialog(&mut self) {
        let Some(file) = self.selected_file() else {
            return;
        };
        if !file.is_owned() {
            self.status_message = Some("Only the owner can share a file".to_string());
            return;
        }
        let file_id = file.id.clone();
        let filename = file.filename.clone();

        self.share_dialog = Some(ShareDialog::new(file_id.clone(), filename));
        self.mode = Mode::Sharing;

        let own_email = self.current_user().map(|u| u.email);
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.list_users().await {
                Ok(mut users) => {
                    // The account itself is not a share target.
                    if let Some(own_email) = own_email {
                        users.retain(|u| u.email != own_email);
                    }
                    FetchResult::Directory(users)
                }
                Err(e) => FetchResult::Error(format!("Failed to load users: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });

        self.refresh_permissions(file_id);
    }

    fn refresh_permissions(&self, file_id: String) {
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.file_permissions(&file_id).await {
                Ok(grants) => FetchResult::Permissions(file_id, grants),
                Err(e) => FetchResult::Error(format!("Failed to load permissions: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Apply the share dialog's ticked users as grants on the file.
    pub fn share_with_selected(&mut self) {
        let Some(dialog) = self.share_dialog.as_mut() else {
            return;
        };
        if dialog.selected.is_empty() {
            dialog.status = Some("No users selected".to_string());
            return;
        }

        let file_id = dialog.file_id.clone();
        let user_ids: Vec<String> = dialog.selected.iter().cloned().collect();
        let expires_at = dialog
            .expiry_days()
            .map(|days| chrono::Utc::now() + chrono::Duration::days(days as i64));
        dialog.status = Some("Sharing...".to_string());

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.share_with_users(&file_id, &user_ids, expires_at).await {
                Ok(()) => FetchResult::Shared(file_id),
                Err(e) => FetchResult::Error(format!("Failed to share: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Mint a share link for the dialog's file using its expiry choice.
    pub fn request_share_link(&mut self) {
        let Some(dialog) = self.share_dialog.as_mut() else {
            return;
        };
        let file_id = dialog.file_id.clone();
        let expires_at = dialog
            .expiry_days()
            .map(|days| chrono::Utc::now() + chrono::Duration::days(days as i64));
        dialog.status = Some("Creating link...".to_string());

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.create_share_link(&file_id, expires_at).await {
                Ok(link) => FetchResult::LinkMinted(file_id, link),
                Err(e) => FetchResult::Error(format!("Failed to create link: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Revoke a user's grant on the dialog's file.
    pub fn revoke_grant(&mut self, target_user_id: String) {
        let Some(dialog) = self.share_dialog.as_mut() else {
            return;
        };
        let file_id = dialog.file_id.clone();
        dialog.status = Some("Revoking...".to_string());

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.revoke_access(&file_id, &target_user_id).await {
                Ok(()) => FetchResult::Revoked(file_id),
                Err(e) => FetchResult::Error(format!("Failed to revoke: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Open the audit overlay for the selected file.
    pub fn open_audit_view(&mut self) {
        let Some(file) = self.selected_file() else {
            return;
        };
        let file_id = file.id.clone();
        let filename = file.filename.clone();
        self.audit_view = Some(AuditView {
            file_id: file_id.clone(),
            filename,
            entries: Vec::new(),
            loading: true,
        });
        self.mode = Mode::ViewingAudit;

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.file_audit_log(&file_id).await {
                Ok(entries) => FetchResult::FileAudit(file_id, entries),
                Err(e) => FetchResult::Error(format!("Failed to load audit log: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Upload the file at the path typed into the upload prompt.
    pub fn upload_from_prompt(&mut self) {
        let path = PathBuf::from(self.upload_path.trim());
        self.upload_path.clear();
        self.mode = Mode::Normal;

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                self.status_message = Some("Invalid file path".to_string());
                return;
            }
        };
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.status_message = Some(format!("Cannot read {}: {}", path.display(), e));
                return;
            }
        };
        let content_type = guess_content_type(&filename).to_string();
        self.status_message = Some(format!("Uploading {}...", filename));

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.upload_file(&filename, &content_type, bytes).await {
                Ok(()) => FetchResult::Uploaded(filename),
                Err(e) => FetchResult::Error(format!("Upload failed: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Download the selected file into the local downloads directory.
    pub fn download_selected(&mut self) {
        let Some(file) = self.selected_file() else {
            return;
        };
        let file_id = file.id.clone();
        let filename = file.filename.clone();
        self.status_message = Some(format!("Downloading {}...", filename));

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.download_file(&file_id).await {
                Ok(bytes) => {
                    let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
                    let dest = dir.join(&filename);
                    match std::fs::write(&dest, bytes) {
                        Ok(()) => FetchResult::Downloaded(filename, dest),
                        Err(e) => FetchResult::Error(format!("Failed to save {}: {}", filename, e)),
                    }
                }
                Err(e) => FetchResult::Error(format!("Download failed: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    /// Delete the selected file (owner only, after confirmation).
    pub fn delete_selected(&mut self) {
        let Some(file) = self.selected_file() else {
            return;
        };
        if !file.is_owned() {
            self.status_message = Some("Only the owner can delete a file".to_string());
            return;
        }
        let file_id = file.id.clone();
        let filename = file.filename.clone();
        self.status_message = Some(format!("Deleting {}...", filename));

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = match api.delete_file(&file_id).await {
                Ok(()) => FetchResult::Deleted(file_id),
                Err(e) => FetchResult::Error(format!("Delete failed: {}", e)),
            };
            Self::send_result(&tx, result).await;
        });
    }

    // =========================================================================
    // Background task processing
    // =========================================================================

    /// Drain completed background tasks and reconcile the screen with
    /// the session state. Called from the event loop on every tick.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.process_fetch_result(result);
        }
        self.reconcile_screen();
    }

    /// Follow session transitions: the screen is derived from the
    /// committed session state, never the other way around.
    fn reconcile_screen(&mut self) {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return;
        }
        let snapshot = self.session_rx.borrow_and_update().clone();
        match snapshot.status {
            SessionStatus::Authenticated => {
                if self.screen != Screen::Main {
                    self.screen = Screen::Main;
                    self.mode = Mode::Normal;
                    self.refresh_files();
                    self.refresh_activity();
                }
            }
            SessionStatus::Anonymous => {
                if self.screen == Screen::Main || self.screen == Screen::Restoring {
                    self.screen = Screen::Login;
                    self.files.clear();
                    self.activity.clear();
                }
            }
            SessionStatus::Restoring => {}
        }
    }

    /// Process a single result from a background task.
    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::SessionResolved(status) => {
                debug!(?status, "Session restore resolved");
                // Screen changes ride on reconcile_screen; this covers
                // a restore that resolved without a state transition.
                if self.screen == Screen::Restoring && status == SessionStatus::Anonymous {
                    self.screen = Screen::Login;
                }
            }
            FetchResult::Files(files) => {
                self.files = files;
                self.files_loading = false;
                self.clamp_selections();
            }
            FetchResult::Directory(users) => {
                if let Some(dialog) = self.share_dialog.as_mut() {
                    dialog.users = users;
                    dialog.loading = false;
                }
            }
            FetchResult::Permissions(file_id, grants) => {
                if let Some(dialog) = self.share_dialog.as_mut() {
                    if dialog.file_id == file_id {
                        dialog.permissions = grants;
                    }
                }
            }
            FetchResult::Activity(entries) => {
                self.activity = entries;
                self.clamp_selections();
            }
            FetchResult::FileAudit(file_id, entries) => {
                if let Some(view) = self.audit_view.as_mut() {
                    if view.file_id == file_id {
                        view.entries = entries;
                        view.loading = false;
                    }
                }
            }
            FetchResult::Uploaded(filename) => {
                self.status_message = Some(format!("Uploaded {}", filename));
                self.refresh_files();
                self.refresh_activity();
            }
            FetchResult::Deleted(file_id) => {
                self.files.retain(|f| f.id != file_id);
                self.clamp_selections();
                self.status_message = Some("File deleted".to_string());
            }
            FetchResult::Downloaded(filename, dest) => {
                self.status_message = Some(format!("Saved {} to {}", filename, dest.display()));
            }
            FetchResult::Shared(file_id) => {
                if let Some(dialog) = self.share_dialog.as_mut() {
                    if dialog.file_id == file_id {
                        dialog.status = Some("Shared".to_string());
                        dialog.selected.clear();
                    }
                }
                self.refresh_permissions(file_id);
            }
            FetchResult::LinkMinted(file_id, link) => {
                if let Some(dialog) = self.share_dialog.as_mut() {
                    if dialog.file_id == file_id {
                        dialog.status = Some("Link created".to_string());
                        dialog.link = Some(link);
                    }
                }
            }
            FetchResult::Revoked(file_id) => {
                if let Some(dialog) = self.share_dialog.as_mut() {
                    if dialog.file_id == file_id {
                        dialog.status = Some("Access revoked".to_string());
                    }
                }
                self.refresh_permissions(file_id);
            }
            FetchResult::Error(message) => {
                warn!(%message, "Background task failed");
                if let Some(dialog) = self.share_dialog.as_mut() {
                    dialog.loading = false;
                    dialog.status = Some(message.clone());
                }
                if let Some(view) = self.audit_view.as_mut() {
                    view.loading = false;
                }
                self.files_loading = false;
                self.status_message = Some(message);
            }
        }
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    /// Append a character to a bounded text input.
    pub fn push_input(field: &mut String, c: char) {
        if field.len() < MAX_INPUT_LENGTH {
            field.push(c);
        }
    }
}

/// Guess a MIME type from a filename extension. The server stores it
/// as metadata only.
fn guess_content_type(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" | "log" => "text/plain",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "json" => "application/json",
        "csv" => "text/csv",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(Tab::MyFiles.next(), Tab::SharedWithMe);
        assert_eq!(Tab::Activity.next(), Tab::MyFiles);
        assert_eq!(Tab::MyFiles.prev(), Tab::Activity);
    }

    #[test]
    fn share_dialog_expiry_cycles_through_choices() {
        let mut dialog = ShareDialog::new("f1".to_string(), "notes.txt".to_string());
        assert_eq!(dialog.expiry_days(), None);
        assert_eq!(dialog.expiry_label(), "Never");
        dialog.cycle_expiry();
        assert_eq!(dialog.expiry_days(), Some(1));
        dialog.cycle_expiry();
        dialog.cycle_expiry();
        assert_eq!(dialog.expiry_days(), Some(30));
        dialog.cycle_expiry();
        assert_eq!(dialog.expiry_days(), None);
    }

    #[test]
    fn content_type_guessing() {
        assert_eq!(guess_content_type("report.pdf"), "application/pdf");
        assert_eq!(guess_content_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("mystery"), "application/octet-stream");
    }

    #[test]
    fn bounded_input_stops_growing() {
        let mut field = "x".repeat(MAX_INPUT_LENGTH);
        App::push_input(&mut field, 'y');
        assert_eq!(field.len(), MAX_INPUT_LENGTH);
    }
}
