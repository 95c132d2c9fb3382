use serde::{Deserialize, Serialize};

use super::audit::UserRef;

/// A minted shareable link. The server enforces expiry; the client only
/// displays the URL and the deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Body of `POST /share/link`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub share_link: ShareLink,
}

/// One grant in `GET /share/permissions/{fileId}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PermissionsResponse {
    #[serde(default)]
    pub permissions: Vec<PermissionEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_share_link_response() {
        let json = r#"{"shareLink":{"url":"http://localhost:3000/share/tok123",
            "token":"tok123","expiresAt":"2026-09-01T00:00:00.000Z"}}"#;
        let resp: ShareLinkResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.share_link.url, "http://localhost:3000/share/tok123");
        assert_eq!(resp.share_link.token.as_deref(), Some("tok123"));
    }

    #[test]
    fn share_link_without_expiry() {
        let json = r#"{"shareLink":{"url":"http://localhost:3000/share/tok456"}}"#;
        let resp: ShareLinkResponse = serde_json::from_str(json).unwrap();
        assert!(resp.share_link.expires_at.is_none());
    }
}
