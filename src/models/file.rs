use serde::{Deserialize, Serialize};

/// Whether the current account owns a file or merely received access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Owner,
    Viewer,
}

/// The owner record embedded in file listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOwner {
    pub full_name: String,
    pub email: String,
}

/// A file as reported by `GET /files`.
///
/// Timestamps stay as the server's ISO strings; formatting happens at
/// render time in `utils::format`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub filename: String,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "uploadDate", default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub owner: Option<FileOwner>,
    #[serde(default)]
    pub role: Option<FileRole>,
    /// Present on shared files whose access was granted with an expiry.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl RemoteFile {
    pub fn is_owned(&self) -> bool {
        matches!(self.role, Some(FileRole::Owner))
    }

    /// Short type label for list rows, e.g. "PDF" or "PNG".
    pub fn kind_label(&self) -> String {
        self.content_type
            .as_deref()
            .and_then(|t| t.split('/').nth(1))
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| "FILE".to_string())
    }

    pub fn owner_display(&self) -> &str {
        self.owner.as_ref().map(|o| o.full_name.as_str()).unwrap_or("-")
    }
}

/// Body of `GET /files`. The single endpoint returns owned and shared
/// files together, distinguished by `role`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_files_listing() {
        let json = r#"{
            "files": [
                {"id":"f1","filename":"report.pdf","type":"application/pdf","size":14200,
                 "uploadDate":"2026-08-01T10:00:00.000Z",
                 "owner":{"fullName":"Ana","email":"ana@x.com"},"role":"owner"},
                {"id":"f2","filename":"photo.png","type":"image/png","size":88000,
                 "uploadDate":"2026-08-02T09:30:00.000Z",
                 "owner":{"fullName":"Bea Lin","email":"bea@x.com"},"role":"viewer",
                 "expiresAt":"2026-09-01T00:00:00.000Z"}
            ]
        }"#;
        let resp: FilesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.files.len(), 2);
        assert!(resp.files[0].is_owned());
        assert!(!resp.files[1].is_owned());
        assert_eq!(resp.files[0].kind_label(), "PDF");
        assert_eq!(resp.files[1].owner_display(), "Bea Lin");
        assert_eq!(resp.files[1].expires_at.as_deref(), Some("2026-09-01T00:00:00.000Z"));
    }

    #[test]
    fn missing_type_falls_back_to_file_label() {
        let json = r#"{"id":"f3","filename":"notes","size":12}"#;
        let file: RemoteFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.kind_label(), "FILE");
        assert_eq!(file.owner_display(), "-");
    }
}
