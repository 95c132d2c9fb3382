//! API client for the NUA file storage backend.
//!
//! Every request goes through this client, which attaches the current
//! bearer token as an `Authorization` header when one is present. The
//! token is read at dispatch time from a `TokenCell` owned jointly with
//! the session store; nothing else writes to it. The client performs no
//! retries and no automatic logout on 401 - failed responses map to
//! `ApiError` and are handed back to the caller unmodified.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    AuditEntry, AuditLogResponse, AuthPayload, DirectoryUser, FilesResponse, PermissionEntry,
    PermissionsResponse, ProfileResponse, RemoteFile, ShareLink, ShareLinkResponse, User,
    UsersResponse,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow uploads while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared credential cell: written only by the session store, read by
/// the client when a request is dispatched. Lock poisoning is recovered
/// rather than propagated - the cell holds plain data.
#[derive(Clone, Default)]
pub struct TokenCell(Arc<RwLock<Option<String>>>);

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

/// API client for the NUA backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: TokenCell,
}

#[derive(Deserialize)]
struct LinkFileResponse {
    file: RemoteFile,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    /// (e.g. `http://localhost:3001/api`).
    pub fn new(base_url: &str, token: TokenCell) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the auth headers for a request, reading the credential at
    /// dispatch time. Absent credential means no Authorization header.
    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.token.get() {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(e) => warn!(error = %e, "Token not representable as header; omitting"),
            }
        }
        headers
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        debug!(%url, "GET ok");
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        debug!(%url, "POST ok");
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }

    // ===== Auth =====

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.post_json(
            "/auth/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        self.post_json(
            "/auth/signup",
            &serde_json::json!({ "fullName": full_name, "email": email, "password": password }),
        )
        .await
    }

    /// Validate the current token by fetching the account profile.
    pub async fn profile(&self) -> Result<User, ApiError> {
        let resp: ProfileResponse = self.get_json("/auth/profile").await?;
        Ok(resp.user)
    }

    /// Fetch the user directory for the share dialog.
    pub async fn list_users(&self) -> Result<Vec<DirectoryUser>, ApiError> {
        let resp: UsersResponse = self.get_json("/auth/users").await?;
        Ok(resp.users)
    }

    // ===== Files =====

    /// Fetch all files visible to the account: owned and shared-with-me,
    /// distinguished by `role`.
    pub async fn list_files(&self) -> Result<Vec<RemoteFile>, ApiError> {
        let resp: FilesResponse = self.get_json("/files").await?;
        Ok(resp.files)
    }

    /// Upload a single file as multipart form data.
    pub async fn upload_file(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidResponse(format!("bad content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/files/upload"))
            .headers(self.auth_headers())
            .multipart(form)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Download a file's content as raw bytes.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/files/{}/download", file_id)))
            .headers(self.auth_headers())
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/files/{}", file_id)))
            .headers(self.auth_headers())
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Sharing =====

    /// Grant the listed users access to a file, optionally until a deadline.
    pub async fn share_with_users(
        &self,
        file_id: &str,
        user_ids: &[String],
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), ApiError> {
        let mut body = serde_json::json!({ "fileId": file_id, "userIds": user_ids });
        if let Some(deadline) = expires_at {
            body["expiresAt"] = serde_json::json!(deadline.to_rfc3339());
        }

        let response = self
            .client
            .post(self.url("/share/users"))
            .headers(self.auth_headers())
            .json(&body)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Mint a shareable link for a file, optionally expiring.
    pub async fn create_share_link(
        &self,
        file_id: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShareLink, ApiError> {
        let mut body = serde_json::json!({ "fileId": file_id });
        if let Some(deadline) = expires_at {
            body["expiresAt"] = serde_json::json!(deadline.to_rfc3339());
        }

        let resp: ShareLinkResponse = self.post_json("/share/link", &body).await?;
        Ok(resp.share_link)
    }

    /// Resolve a share-link token to its file metadata. The server
    /// rejects expired links; this client just relays the failure.
    pub async fn link_info(&self, link_token: &str) -> Result<RemoteFile, ApiError> {
        let resp: LinkFileResponse = self
            .get_json(&format!("/share/link/{}", link_token))
            .await?;
        Ok(resp.file)
    }

    pub async fn download_via_link(&self, link_token: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/share/link/{}/download", link_token)))
            .headers(self.auth_headers())
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn file_permissions(&self, file_id: &str) -> Result<Vec<PermissionEntry>, ApiError> {
        let resp: PermissionsResponse = self
            .get_json(&format!("/share/permissions/{}", file_id))
            .await?;
        Ok(resp.permissions)
    }

    pub async fn revoke_access(&self, file_id: &str, target_user_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/share/revoke"))
            .headers(self.auth_headers())
            .json(&serde_json::json!({
                "fileId": file_id,
                "targetUserId": target_user_id
            }))
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Audit =====

    pub async fn file_audit_log(&self, file_id: &str) -> Result<Vec<AuditEntry>, ApiError> {
        let resp: AuditLogResponse = self.get_json(&format!("/audit/file/{}", file_id)).await?;
        Ok(resp.logs)
    }

    pub async fn user_activity(&self) -> Result<Vec<AuditEntry>, ApiError> {
        let resp: AuditLogResponse = self.get_json("/audit/user").await?;
        Ok(resp.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cell_roundtrip() {
        let cell = TokenCell::new();
        assert_eq!(cell.get(), None);
        cell.set(Some("abc123".to_string()));
        assert_eq!(cell.get(), Some("abc123".to_string()));
        cell.set(None);
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn header_omitted_without_token() {
        let client = ApiClient::new("http://localhost:3001/api", TokenCell::new()).unwrap();
        assert!(client.auth_headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn header_reflects_cell_at_dispatch_time() {
        let cell = TokenCell::new();
        let client = ApiClient::new("http://localhost:3001/api", cell.clone()).unwrap();

        cell.set(Some("abc123".to_string()));
        let headers = client.auth_headers();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );

        // Clearing the cell is visible to the same client without rebuild.
        cell.set(None);
        assert!(client.auth_headers().get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/api/", TokenCell::new()).unwrap();
        assert_eq!(client.url("/files"), "http://localhost:3001/api/files");
    }
}
