//! Data models for the NUA file storage API.
//!
//! These mirror the JSON the backend speaks: camelCase field names,
//! optional fields wherever the server has been observed to omit them.

pub mod audit;
pub mod file;
pub mod share;
pub mod user;

pub use audit::{AuditEntry, AuditLogResponse, UserRef};
pub use file::{FileOwner, FileRole, FilesResponse, RemoteFile};
pub use share::{PermissionEntry, PermissionsResponse, ShareLink, ShareLinkResponse};
pub use user::{AuthPayload, DirectoryUser, ProfileResponse, User, UsersResponse};
