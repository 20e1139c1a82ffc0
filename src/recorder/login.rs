use crate::errors::internal::RecorderError;
use crate::types::internal::event::{EventId, LoginKind, NewLoginEvent};

use super::EventRecorder;

impl EventRecorder {
    /// Record an authentication event
    ///
    /// # Arguments
    /// * `kind` - Login, logout or failed attempt
    /// * `username` - Attempted identity; kept even when no user resolved
    /// * `actor` - Resolved user, absent for failed attempts
    /// * `remote_ip` - Client address when known
    pub async fn try_record_login(
        &self,
        kind: LoginKind,
        username: Option<&str>,
        actor: Option<i64>,
        remote_ip: Option<&str>,
    ) -> Result<EventId, RecorderError> {
        let event = NewLoginEvent {
            kind,
            username: username.map(str::to_string),
            user_id: actor,
            remote_ip: remote_ip.map(str::to_string),
        };

        self.events.append_login(event).await
    }

    /// Record an authentication event, swallowing failures
    pub async fn submit_login_event(
        &self,
        kind: LoginKind,
        username: Option<&str>,
        actor: Option<i64>,
        remote_ip: Option<&str>,
    ) -> Option<EventId> {
        match self
            .try_record_login(kind, username, actor, remote_ip)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Failed to record {} login event: {}", kind, e);
                None
            }
        }
    }
}
