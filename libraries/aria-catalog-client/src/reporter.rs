//! Fire-and-forget play reporting over the catalog API.

use crate::client::CatalogClient;
use aria_playback::PlayReporter;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// [`PlayReporter`] that records plays with the catalog.
///
/// Each report is spawned on the given runtime and never awaited by the
/// engine. Failures are logged and dropped; nothing is retried.
#[derive(Clone)]
pub struct CatalogPlayReporter {
    client: CatalogClient,
    runtime: Handle,
}

impl CatalogPlayReporter {
    /// Create a reporter spawning onto `runtime`.
    pub fn new(client: CatalogClient, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    /// Create a reporter on the runtime of the calling context.
    ///
    /// Returns `None` outside a tokio runtime.
    pub fn current(client: CatalogClient) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|runtime| Self::new(client, runtime))
    }
}

impl PlayReporter for CatalogPlayReporter {
    fn report_play(&self, track_id: &str) {
        let client = self.client.clone();
        let track_id = track_id.to_string();

        debug!(track_id = %track_id, "Spawning play report");
        self.runtime.spawn(async move {
            if let Err(e) = client.record_play(&track_id).await {
                warn!(track_id = %track_id, error = %e, "Failed to record play");
            }
        });
    }
}
