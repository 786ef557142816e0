use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::warn;

use crate::config::GeocodePolicy;
use crate::services::location_service::{GeocodeOutcome, Geocoder};

/// Spaces out calls to the wrapped geocoder and retries transient failures.
///
/// One instance is shared by every request so the minimum interval holds
/// process-wide. Callers queue on the lock while they wait for their slot.
pub struct RateLimitedGeocoder {
    inner: Arc<dyn Geocoder>,
    policy: GeocodePolicy,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimitedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, policy: GeocodePolicy) -> Self {
        Self {
            inner,
            policy,
            last_call: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let ready_at = last + self.policy.min_delay;
            if Instant::now() < ready_at {
                sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}

#[async_trait]
impl Geocoder for RateLimitedGeocoder {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        let mut attempt = 0;
        loop {
            self.wait_turn().await;
            match self.inner.geocode(query).await {
                GeocodeOutcome::Unavailable(reason) if attempt < self.policy.max_retries => {
                    attempt += 1;
                    warn!(
                        "📍 Geocoder unavailable for '{}' ({}), retry {}/{}",
                        query, reason, attempt, self.policy.max_retries
                    );
                    sleep(self.policy.error_wait).await;
                }
                outcome => return outcome,
            }
        }
    }
}
