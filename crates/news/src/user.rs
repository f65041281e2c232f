//! Site users as seen by request handlers.

use chrono::{DateTime, Utc};

use newsfeed_core::UserId;
use newsfeed_render::{AsJson, CallableBool, Value};

/// Registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl AsJson for User {
    /// Only identity and role information; contact details and credentials
    /// never leave the server.
    fn as_json(&self) -> Value {
        Value::map([
            ("id", Value::Uuid(*self.id.as_uuid())),
            ("username", Value::from(self.username.as_str())),
            ("is_staff", Value::from(self.is_staff)),
            ("date_joined", Value::from(self.date_joined)),
        ])
    }

    fn type_name(&self) -> &'static str {
        "User"
    }
}

/// User attached to the current request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestUser {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl RequestUser {
    pub fn is_authenticated(&self) -> CallableBool {
        CallableBool(matches!(self, RequestUser::Authenticated(_)))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            RequestUser::Anonymous => None,
            RequestUser::Authenticated(user) => Some(user),
        }
    }
}

impl From<&RequestUser> for Value {
    fn from(user: &RequestUser) -> Self {
        match user {
            RequestUser::Anonymous => Value::AnonymousUser,
            RequestUser::Authenticated(user) => Value::object(user.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use newsfeed_render::Encoder;
    use serde_json::json;

    fn sample_user() -> User {
        User {
            id: UserId::from_uuid(uuid::Uuid::nil()),
            username: "editor".to_string(),
            email: "editor@example.com".to_string(),
            password_hash: "pbkdf2_sha256$...".to_string(),
            is_staff: true,
            date_joined: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn user_json_whitelists_public_fields() {
        let encoded = Encoder::strict().encode(&Value::object(sample_user())).unwrap();
        assert_eq!(
            encoded,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "username": "editor",
                "is_staff": true,
                "date_joined": "2023-01-01T00:00:00Z",
            })
        );
    }

    #[test]
    fn anonymous_request_user_encodes_as_null() {
        let anon = RequestUser::Anonymous;
        let value = Value::map([
            ("user", Value::from(&anon)),
            ("is_authenticated", Value::from(anon.is_authenticated())),
        ]);
        let encoded = Encoder::strict().encode(&value).unwrap();
        assert_eq!(encoded, json!({"user": null, "is_authenticated": false}));
    }

    #[test]
    fn authenticated_request_user_encodes_as_object() {
        let req = RequestUser::Authenticated(sample_user());
        assert_eq!(req.is_authenticated(), true);
        let encoded = Encoder::strict().encode(&Value::from(&req)).unwrap();
        assert_eq!(encoded["username"], json!("editor"));
        assert!(encoded.get("email").is_none());
        assert!(encoded.get("password_hash").is_none());
    }
}
