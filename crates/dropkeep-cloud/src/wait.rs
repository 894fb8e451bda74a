//! Polling helpers that turn asynchronous provider operations into
//! sequential steps
//!
//! Only the status check is repeated. The action that produced the
//! operation is never re-issued.

use crate::error::{CloudError, Result};
use crate::model::{OperationStatus, PendingOperation};
use crate::provider::DropletProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Spacing and bound for status polls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Delay before the second poll
    pub initial_interval: Duration,
    /// Upper bound for the delay between polls
    pub max_interval: Duration,
    /// Growth factor applied to the delay after each poll
    pub multiplier: f64,
    /// Total time allowed before giving up
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(30),
            multiplier: 1.5,
            timeout: Duration::from_secs(600),
        }
    }
}

impl WaitConfig {
    /// Fixed-interval polling with the given bound
    pub fn fixed(interval: Duration, timeout: Duration) -> Self {
        Self {
            initial_interval: interval,
            max_interval: interval,
            multiplier: 1.0,
            timeout,
        }
    }

    /// Delay to sleep after poll number `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt as i32);
        let delay = self.initial_interval.as_secs_f64() * factor;
        Duration::from_secs_f64(delay.min(self.max_interval.as_secs_f64()))
    }
}

/// Block until `operation` leaves the in-progress state.
///
/// Errors with [`CloudError::OperationFailed`] when the provider reports the
/// operation as errored and with [`CloudError::OperationTimedOut`] when the
/// bound in `config` passes first.
pub async fn wait_for_operation<P>(
    provider: &P,
    operation: &PendingOperation,
    config: &WaitConfig,
) -> Result<()>
where
    P: DropletProvider + ?Sized,
{
    let label = operation.label();

    if operation.status.is_terminal() {
        return settle(&label, operation.status.clone());
    }

    let label_ref = label.as_str();
    let status = poll_until(&label, config, move || async move {
        let status = provider.operation_status(operation).await?;
        tracing::debug!("{} is {:?}", label_ref, status);
        Ok(status.is_terminal().then_some(status))
    })
    .await?;

    settle(&label, status)
}

/// Block until the droplet reports itself powered off.
pub async fn wait_for_power_off<P>(provider: &P, droplet_id: u64, config: &WaitConfig) -> Result<()>
where
    P: DropletProvider + ?Sized,
{
    let label = format!("power off of droplet {}", droplet_id);
    poll_until(&label, config, move || async move {
        let droplet = provider.refresh_droplet(droplet_id).await?;
        tracing::debug!("droplet {} is {}", droplet_id, droplet.status);
        Ok(droplet.is_off().then_some(()))
    })
    .await
}

fn settle(label: &str, status: OperationStatus) -> Result<()> {
    match status {
        OperationStatus::Completed => Ok(()),
        OperationStatus::Errored { message } => Err(CloudError::OperationFailed {
            operation: label.to_string(),
            message,
        }),
        OperationStatus::InProgress => Err(CloudError::OperationFailed {
            operation: label.to_string(),
            message: "operation has not finished".to_string(),
        }),
    }
}

/// Run `probe` until it yields a value or the bound passes.
async fn poll_until<T, F, Fut>(label: &str, config: &WaitConfig, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<Option<T>>>,
{
    let started = Instant::now();
    let mut attempt = 0;

    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }

        let waited = started.elapsed();
        if waited >= config.timeout {
            return Err(CloudError::OperationTimedOut {
                operation: label.to_string(),
                waited,
            });
        }

        let remaining = config.timeout - waited;
        sleep(config.delay_for_attempt(attempt).min(remaining)).await;
        attempt += 1;
    }
}
