//! Best-effort forwarding of the API token to the outline service, which may use it to look up
//! further course details on its own.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::aggregate::OutlineService;
use crate::reporting::ErrorExt;
use crate::world::World;

#[derive(Serialize)]
struct SaveToken<'a> {
    token: &'a str,
}

/// A token notification running in the background.
#[derive(Debug)]
pub struct Notification(JoinHandle<()>);

impl Notification {
    /// Gives the notification up to `grace` to complete, then abandons it.
    pub async fn finish(self, grace: Duration) {
        let mut handle = self.0;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                tracing::warn!(%error, "token notification task failed");
            }
            Err(_) => {
                handle.abort();
                tracing::warn!(?grace, "token notification did not finish in time; abandoned");
            }
        }
    }
}

/// Sends the token to the service's `/save-token` endpoint in a separate task. The export never
/// waits for this to succeed; failures are only logged.
pub fn save_token<W: World>(world: Arc<W>, service: OutlineService, token: String) -> Notification {
    Notification(tokio::spawn(async move {
        let url = match service.endpoint("save-token") {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!(error = %error.error_chain(), "not saving token");
                return;
            }
        };
        let body = match serde_json::to_vec(&SaveToken { token: &token }) {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "not saving token");
                return;
            }
        };

        match world.post_json(&url, &body).await {
            Ok(response) if response.status.is_success() => {
                tracing::debug!(%url, "token saved");
            }
            Ok(response) => {
                tracing::warn!(%url, status = %response.status, "saving token failed");
            }
            Err(error) => {
                tracing::warn!(%url, error = %error.error_chain(), "saving token failed");
            }
        }
    }))
}
