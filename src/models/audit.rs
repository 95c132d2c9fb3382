use serde::{Deserialize, Serialize};

/// A user reference as embedded in audit entries. The backend populates
/// these from the accounts collection and may omit either field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserRef {
    pub fn display(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Unknown User")
    }
}

/// One recorded action against a file: upload, download, share, delete.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: String,
    #[serde(rename = "userId", default)]
    pub user: Option<UserRef>,
    /// Populated on share actions: who access was granted to.
    #[serde(rename = "targetUserId", default)]
    pub target_user: Option<UserRef>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AuditEntry {
    pub fn actor_display(&self) -> &str {
        self.user.as_ref().map(|u| u.display()).unwrap_or("Unknown User")
    }

    pub fn is_download(&self) -> bool {
        self.action == "download"
    }
}

/// Body of `GET /audit/file/{id}` and `GET /audit/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogResponse {
    #[serde(default)]
    pub logs: Vec<AuditEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_audit_log() {
        let json = r#"{"logs":[
            {"action":"upload","userId":{"fullName":"Ana","email":"ana@x.com"},
             "timestamp":"2026-08-01T10:00:00.000Z"},
            {"action":"share","userId":{"fullName":"Ana"},
             "targetUserId":{"email":"bea@x.com"},
             "timestamp":"2026-08-02T11:00:00.000Z"},
            {"action":"download","userId":{"email":"bea@x.com"}}
        ]}"#;
        let resp: AuditLogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.logs.len(), 3);
        assert_eq!(resp.logs[0].actor_display(), "Ana");
        assert_eq!(resp.logs[1].target_user.as_ref().unwrap().display(), "bea@x.com");
        assert!(resp.logs[2].is_download());
        assert!(!resp.logs[0].is_download());
    }

    #[test]
    fn actor_falls_back_when_unpopulated() {
        let json = r#"{"action":"delete"}"#;
        let entry: AuditEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.actor_display(), "Unknown User");
    }
}
