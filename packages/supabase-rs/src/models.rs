use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub(crate) struct OtpRequest<'a> {
    pub phone: &'a str,
    pub create_user: bool,
    pub channel: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub phone: &'a str,
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Session payload returned by `/verify` and `/token`.
#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: User,
}

/// Session as it is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

impl StoredSession {
    /// Convert a server response, preferring the absolute expiry when present.
    pub fn from_response(response: SessionResponse, now: DateTime<Utc>) -> Self {
        let expires_at = response
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| Some(now + Duration::seconds(response.expires_in)));

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
            user: response.user,
        }
    }

    /// True if the access token is expired or will be within `margin`.
    ///
    /// Sessions without an expiry never expire.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - margin <= now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_at: Option<i64>) -> SessionResponse {
        SessionResponse {
            access_token: "access".to_string(),
            token_type: Some("bearer".to_string()),
            expires_in: 3600,
            expires_at,
            refresh_token: "refresh".to_string(),
            user: User {
                id: Uuid::new_v4(),
                phone: Some("919876543210".to_string()),
            },
        }
    }

    #[test]
    fn test_absolute_expiry_wins() {
        let now = Utc::now();
        let session = StoredSession::from_response(response(Some(1_700_000_000)), now);
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_relative_expiry_used_when_absolute_missing() {
        let now = Utc::now();
        let session = StoredSession::from_response(response(None), now);
        assert_eq!(session.expires_at, Some(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_expiry_margin() {
        let now = Utc::now();
        let mut session = StoredSession::from_response(response(None), now);

        session.expires_at = Some(now + Duration::seconds(5));
        assert!(session.expires_within(Duration::seconds(10), now));

        session.expires_at = Some(now + Duration::seconds(60));
        assert!(!session.expires_within(Duration::seconds(10), now));

        session.expires_at = None;
        assert!(!session.expires_within(Duration::seconds(10), now));
    }
}
