//! Navigator daemon: the single consumer that applies change events in order.

use crate::config::WatchConfig;
use crate::error::Result;
use crate::navigator::Navigator;
use crate::types::ChangeEvent;
use parking_lot::RwLock;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Called after each event has been applied, with the handler's result.
pub type EventListener = Box<dyn Fn(&ChangeEvent, &Result<()>) + Send + Sync>;

/// Watch mode daemon
///
/// Owns the receiving end of the change channel and hands every event to the
/// navigator one at a time, in receive order. Each event is fully reconciled
/// before the next one is taken off the channel.
pub struct NavigatorDaemon {
    navigator: Arc<Navigator>,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
    listener: Option<EventListener>,
}

impl NavigatorDaemon {
    pub fn new(navigator: Arc<Navigator>, config: WatchConfig) -> Self {
        Self {
            navigator,
            config,
            running: Arc::new(RwLock::new(true)),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: EventListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn is_running(&self) -> bool {
        *self.running.read()
    }

    /// Process events until stopped or until every sender is dropped.
    /// Returns the number of events applied.
    pub fn run(&self, events: Receiver<ChangeEvent>) -> usize {
        let poll = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let mut processed = 0;
        info!("Navigator daemon started");

        while self.is_running() {
            match events.recv_timeout(poll) {
                Ok(event) => {
                    debug!(?event, "Applying change event");
                    let result = self.navigator.handle_change(&event);
                    if let Err(e) = &result {
                        warn!(?event, error = %e, "Change event rejected");
                    }
                    if let Some(listener) = &self.listener {
                        listener(&event, &result);
                    }
                    processed += 1;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Change channel closed");
                    break;
                }
            }
        }

        *self.running.write() = false;
        info!(processed, "Navigator daemon stopped");
        processed
    }

    /// Run on a dedicated thread.
    pub fn spawn(self: Arc<Self>, events: Receiver<ChangeEvent>) -> std::io::Result<JoinHandle<usize>> {
        std::thread::Builder::new()
            .name("lognav-daemon".to_string())
            .spawn(move || self.run(events))
    }

    /// Stop the daemon after the event in progress, if any.
    pub fn stop(&self) {
        *self.running.write() = false;
    }
}
