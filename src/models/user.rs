use serde::{Deserialize, Serialize};

/// The authenticated account identity.
///
/// Returned by `/auth/login`, `/auth/signup` and `/auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// Body of a successful login or signup: a fresh bearer token plus
/// the identity it proves.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Body of `GET /auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}

/// An entry in the user directory used by the share dialog.
/// The directory endpoint uses Mongo-style `_id` rather than `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// Body of `GET /auth/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_auth_payload() {
        let json = r#"{"token":"abc123","user":{"id":"u1","fullName":"Ana","email":"ana@x.com"}}"#;
        let payload: AuthPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.token, "abc123");
        assert_eq!(payload.user.full_name, "Ana");
        assert_eq!(payload.user.email, "ana@x.com");
    }

    #[test]
    fn parse_directory_users() {
        let json = r#"{"users":[{"_id":"507f1f77bcf86cd799439011","fullName":"Bea Lin","email":"bea@x.com"}]}"#;
        let resp: UsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.users.len(), 1);
        assert_eq!(resp.users[0].id, "507f1f77bcf86cd799439011");
    }
}
