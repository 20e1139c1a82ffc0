use crate::errors::internal::RecorderError;
use crate::types::internal::event::{EventId, NewRequestEvent};

use super::EventRecorder;

impl EventRecorder {
    /// Record an inbound request event
    ///
    /// # Arguments
    /// * `url` - Requested path
    /// * `method` - HTTP method as received
    /// * `query_string` - Raw query string when present
    /// * `actor` - Authenticated user when known
    /// * `remote_ip` - Client address when known
    pub async fn try_record_request(
        &self,
        url: impl Into<String>,
        method: impl Into<String>,
        query_string: Option<&str>,
        actor: Option<i64>,
        remote_ip: Option<&str>,
    ) -> Result<EventId, RecorderError> {
        let event = NewRequestEvent {
            url: url.into(),
            method: method.into(),
            query_string: query_string.map(str::to_string),
            user_id: actor,
            remote_ip: remote_ip.map(str::to_string),
        };

        self.events.append_request(event).await
    }

    /// Record an inbound request event, swallowing failures
    pub async fn submit_request_event(
        &self,
        url: impl Into<String>,
        method: impl Into<String>,
        query_string: Option<&str>,
        actor: Option<i64>,
        remote_ip: Option<&str>,
    ) -> Option<EventId> {
        let method = method.into();
        match self
            .try_record_request(url, method.clone(), query_string, actor, remote_ip)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Failed to record {} request event: {}", method, e);
                None
            }
        }
    }
}
