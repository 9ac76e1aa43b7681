//! Self-clearing acknowledgment timer for the "copied" flash.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How long the copy acknowledgment stays visible.
pub const CLIPBOARD_FLASH_DURATION: Duration = Duration::from_secs(2);

/// Identifies one arming of a [`ClipboardFlash`].
///
/// Only the most recently armed ticket is current; expiry handlers must
/// check [`FlashTicket::is_current`] before clearing anything.
#[derive(Debug, Clone)]
pub struct FlashTicket {
    epoch: u64,
    latest: Arc<AtomicU64>,
}

impl FlashTicket {
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.epoch
    }
}

/// A cancellable scheduled task that fires once, `duration` after the most
/// recent call to [`ClipboardFlash::arm`].
///
/// Re-arming cancels the pending expiry. Dropping the flash cancels it too,
/// so the timer never outlives its owner.
pub struct ClipboardFlash {
    duration: Duration,
    latest: Arc<AtomicU64>,
    pending: Mutex<Option<CancellationToken>>,
}

impl ClipboardFlash {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            latest: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Schedules `on_expire` after the flash duration, replacing any pending
    /// expiry. Must be called from within a tokio runtime.
    pub fn arm<F>(&self, on_expire: F) -> FlashTicket
    where
        F: FnOnce(FlashTicket) + Send + 'static,
    {
        let epoch = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = FlashTicket {
            epoch,
            latest: Arc::clone(&self.latest),
        };

        let token = CancellationToken::new();
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let duration = self.duration;
        let expired = ticket.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => on_expire(expired),
            }
        });

        ticket
    }

    /// Cancels the pending expiry, if any.
    pub fn cancel(&self) {
        // Invalidate tickets as well, in case the expiry already fired and is
        // waiting on a lock.
        self.latest.fetch_add(1, Ordering::SeqCst);
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(token) = pending {
            token.cancel();
        }
    }
}

impl Default for ClipboardFlash {
    fn default() -> Self {
        Self::new(CLIPBOARD_FLASH_DURATION)
    }
}

impl Drop for ClipboardFlash {
    fn drop(&mut self) {
        self.cancel();
    }
}
