//! Waitlist monitoring.
//!
//! A detached task that polls the inventory source for a waitlisted PNR
//! until it confirms or a monitoring horizon elapses. The monitor outlives
//! the automation run that spawned it and reports only through
//! notifications and the event bus.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::events::EventBus;
use crate::inventory::{InventorySource, WaitlistStatus};
use crate::metrics;
use crate::notification::NotificationSink;

/// Waitlist monitoring behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistConfig {
    /// Interval between status polls (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Total monitoring horizon (milliseconds). The monitor gives up once
    /// this much time has passed without confirmation.
    #[serde(default = "default_max_monitor")]
    pub max_monitor_ms: u64,
}

fn default_poll_interval() -> u64 {
    600_000 // 10 minutes
}

fn default_max_monitor() -> u64 {
    86_400_000 // 24 hours
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_monitor_ms: default_max_monitor(),
        }
    }
}

/// Detached poller for one waitlisted PNR.
pub struct WaitlistMonitor;

impl WaitlistMonitor {
    /// Spawn a monitor task for `pnr`.
    ///
    /// The task ends when the PNR confirms or the horizon elapses; it is
    /// never cancelled by the automation that spawned it.
    pub fn spawn(
        pnr: String,
        config: WaitlistConfig,
        inventory: Arc<dyn InventorySource>,
        notifier: Arc<dyn NotificationSink>,
        events: EventBus,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let poll_interval = Duration::from_millis(config.poll_interval_ms);
            let deadline =
                tokio::time::Instant::now() + Duration::from_millis(config.max_monitor_ms);

            info!("Monitoring waitlist for PNR {}", pnr);

            while tokio::time::Instant::now() < deadline {
                tokio::time::sleep(poll_interval).await;

                match inventory.waitlist_status(&pnr).await {
                    Ok(WaitlistStatus::Confirmed) => {
                        info!("Waitlist confirmed for PNR {}", pnr);
                        metrics::WAITLIST_RESOLUTIONS
                            .with_label_values(&["confirmed"])
                            .inc();
                        events.status_changed(format!("Waitlist confirmed for PNR {}", pnr));
                        if let Err(e) = notifier.send_waitlist_update(&pnr, "Confirmed").await {
                            warn!("Waitlist notification failed for {}: {}", pnr, e);
                        }
                        return;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // Transient poll failures are tolerated; the next
                        // interval retries.
                        warn!("Waitlist status check failed for {}: {}", pnr, e);
                    }
                }
            }

            info!("Waitlist monitoring expired for PNR {}", pnr);
            metrics::WAITLIST_RESOLUTIONS
                .with_label_values(&["expired"])
                .inc();
            events.status_changed(format!("Waitlist monitoring expired for PNR {}", pnr));
        })
    }
}
