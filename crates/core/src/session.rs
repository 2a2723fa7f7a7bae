//! Token and session lifecycle
//!
//! A [`SessionManager`] owns the persisted bearer token, the session record
//! used for client-side page gating, and the last-activity timestamp that
//! drives the idle logout. All state lives in the injected [`Storage`], so
//! handles sharing a store (tabs of one origin) observe each other's
//! teardown on their next read.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::storage::{Storage, keys};

/// Idle limit before a forced logout: 20 minutes
pub const IDLE_LIMIT_MS: i64 = 20 * 60 * 1000;

/// Role carried by a session record, gating page access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular student account
    Student,
    /// Administrator account
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => f.write_str("student"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Locally persisted user identity, serialized under the `userData` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Backend-assigned user identifier
    pub user_id: String,
    /// Account email, may be empty for code-flow admin logins
    #[serde(default)]
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Role gating page access
    pub role: Role,
    /// When the session was established
    pub login_time: DateTime<Utc>,
}

/// Manages the persisted token, session record and activity timestamp
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn Storage>,
}

impl SessionManager {
    /// Create a manager over the given storage
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The underlying storage handle
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Persist a bearer token. Empty tokens are ignored.
    pub fn save_token(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        self.storage.set(keys::AUTH_TOKEN, token);
    }

    /// The persisted bearer token, if any
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(keys::AUTH_TOKEN)
    }

    /// Remove the persisted bearer token
    pub fn clear_token(&self) {
        self.storage.remove(keys::AUTH_TOKEN);
    }

    /// Persist a session record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn save_session(&self, record: &SessionRecord) -> CoreResult<()> {
        let serialized = serde_json::to_string(record)
            .map_err(|err| CoreError::Serialization(err.to_string()))?;
        self.storage.set(keys::USER_DATA, &serialized);
        Ok(())
    }

    /// The persisted session record, if present and parseable.
    ///
    /// A corrupt `userData` blob is removed and reads as absent, so a bad
    /// write can never wedge the login flow.
    #[must_use]
    pub fn session(&self) -> Option<SessionRecord> {
        let raw = self.storage.get(keys::USER_DATA)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "stored session record is corrupt, clearing it");
                self.storage.remove(keys::USER_DATA);
                None
            }
        }
    }

    /// Remove the persisted session record
    pub fn clear_session(&self) {
        self.storage.remove(keys::USER_DATA);
    }

    /// Require a session with exactly the given role.
    ///
    /// Any other role's presence is treated as unauthenticated: the record
    /// is cleared and the caller is expected to force a re-login.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unauthenticated`] when no session is present and
    /// [`CoreError::RoleMismatch`] when a foreign-role session was cleared.
    pub fn require_role(&self, role: Role) -> CoreResult<SessionRecord> {
        let record = self.session().ok_or(CoreError::Unauthenticated)?;
        if record.role == role {
            Ok(record)
        } else {
            warn!(
                expected = %role,
                found = %record.role,
                "session role does not match page requirement, clearing session"
            );
            self.clear_session();
            Err(CoreError::RoleMismatch {
                expected: role,
                found: record.role,
            })
        }
    }

    /// Tear down the authenticated state: token and session record.
    ///
    /// Invoked by the client on a 401/403 response; also usable directly.
    pub fn expire(&self) {
        self.clear_token();
        self.clear_session();
    }

    /// Full logout: authenticated state plus the activity timestamp
    pub fn logout(&self) {
        self.expire();
        self.storage.remove(keys::LAST_ACTIVITY);
    }

    /// Record user activity at `now`
    pub fn mark_activity(&self, now: DateTime<Utc>) {
        self.storage
            .set(keys::LAST_ACTIVITY, &now.timestamp_millis().to_string());
    }

    /// Millisecond timestamp of the last recorded activity.
    /// A garbled value reads as no recorded activity.
    #[must_use]
    pub fn last_activity(&self) -> Option<i64> {
        self.storage
            .get(keys::LAST_ACTIVITY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }

    /// Whether the session has been idle past [`IDLE_LIMIT_MS`] as of `now`
    #[must_use]
    pub fn idle_expired(&self, now: DateTime<Utc>) -> bool {
        if self.session().is_none() {
            return false;
        }
        match self.last_activity() {
            Some(last) => now.timestamp_millis() - last >= IDLE_LIMIT_MS,
            None => false,
        }
    }

    /// Periodic idle check: logs the user out when the idle limit has
    /// passed. Returns whether a logout happened.
    ///
    /// Without a recorded timestamp the session is given the benefit of the
    /// doubt and activity is marked instead.
    pub fn enforce_idle(&self, now: DateTime<Utc>) -> bool {
        if self.session().is_none() {
            return false;
        }
        let Some(last) = self.last_activity() else {
            self.mark_activity(now);
            return false;
        };
        if now.timestamp_millis() - last >= IDLE_LIMIT_MS {
            warn!("session expired after 20 minutes of inactivity, logging out");
            self.logout();
            true
        } else {
            debug!("idle check passed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::Duration;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemoryStorage::new()))
    }

    fn student_record() -> SessionRecord {
        SessionRecord {
            user_id: "42".to_string(),
            email: "student@uni.example".to_string(),
            name: "Sam Student".to_string(),
            role: Role::Student,
            login_time: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip() {
        let sessions = manager();
        assert_eq!(sessions.token(), None);

        sessions.save_token("tok-1");
        assert_eq!(sessions.token(), Some("tok-1".to_string()));

        sessions.clear_token();
        assert_eq!(sessions.token(), None);
    }

    #[test]
    fn empty_token_is_not_persisted() {
        let sessions = manager();
        sessions.save_token("");
        assert_eq!(sessions.token(), None);
    }

    #[test]
    fn session_round_trip_uses_wire_field_names() {
        let sessions = manager();
        let record = student_record();
        sessions.save_session(&record).unwrap();

        let raw = sessions.storage().get(keys::USER_DATA).unwrap();
        assert!(raw.contains("\"userId\""));
        assert!(raw.contains("\"loginTime\""));
        assert!(raw.contains("\"student\""));

        assert_eq!(sessions.session(), Some(record));
    }

    #[test]
    fn corrupt_session_clears_itself() {
        let sessions = manager();
        sessions.storage().set(keys::USER_DATA, "{not json");

        assert_eq!(sessions.session(), None);
        assert_eq!(sessions.storage().get(keys::USER_DATA), None);
    }

    #[test]
    fn require_role_accepts_matching_role() {
        let sessions = manager();
        sessions.save_session(&student_record()).unwrap();
        assert!(sessions.require_role(Role::Student).is_ok());
        // Still present afterwards
        assert!(sessions.session().is_some());
    }

    #[test]
    fn require_role_clears_foreign_role_session() {
        let sessions = manager();
        sessions.save_session(&student_record()).unwrap();

        let err = sessions.require_role(Role::Admin).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RoleMismatch {
                expected: Role::Admin,
                found: Role::Student
            }
        ));
        assert_eq!(sessions.session(), None);
    }

    #[test]
    fn require_role_without_session_is_unauthenticated() {
        let sessions = manager();
        assert!(matches!(
            sessions.require_role(Role::Student),
            Err(CoreError::Unauthenticated)
        ));
    }

    #[test]
    fn expire_clears_token_and_session() {
        let sessions = manager();
        sessions.save_token("tok");
        sessions.save_session(&student_record()).unwrap();

        sessions.expire();
        assert_eq!(sessions.token(), None);
        assert_eq!(sessions.session(), None);
    }

    #[test]
    fn idle_logout_fires_after_twenty_minutes() {
        let sessions = manager();
        sessions.save_session(&student_record()).unwrap();
        let start = Utc::now();
        sessions.mark_activity(start);

        let just_before = start + Duration::minutes(20) - Duration::seconds(1);
        assert!(!sessions.enforce_idle(just_before));
        assert!(sessions.session().is_some());

        let at_limit = start + Duration::minutes(20);
        assert!(sessions.enforce_idle(at_limit));
        assert_eq!(sessions.session(), None);
        assert_eq!(sessions.last_activity(), None);
    }

    #[test]
    fn idle_check_without_timestamp_marks_activity() {
        let sessions = manager();
        sessions.save_session(&student_record()).unwrap();

        let now = Utc::now();
        assert!(!sessions.enforce_idle(now));
        assert_eq!(sessions.last_activity(), Some(now.timestamp_millis()));
    }

    #[test]
    fn idle_check_without_session_is_a_no_op() {
        let sessions = manager();
        sessions.mark_activity(Utc::now() - Duration::hours(2));
        assert!(!sessions.enforce_idle(Utc::now()));
    }

    #[test]
    fn garbled_activity_timestamp_reads_as_absent() {
        let sessions = manager();
        sessions.storage().set(keys::LAST_ACTIVITY, "soon");
        assert_eq!(sessions.last_activity(), None);
    }
}
