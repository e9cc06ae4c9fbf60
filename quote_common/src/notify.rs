//! Transient user-visible notices.
//!
//! `NotificationBoard` keeps at most one active notice. Posting is non-blocking: the
//! message is stored and logged immediately, and a short-lived thread clears it once
//! the configured duration has elapsed. Front ends that want to show notices wrap the
//! board in their own [`Notifier`]. A notice replaced before its timer fires is
//! left alone by that timer; each notice carries a generation number for this.
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

/// Something that can show a message to the user.
pub trait Notifier: Send + Sync {
    /// Shows `message` without blocking the caller.
    fn notify(&self, message: &str);
}

/// A notice currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown to the user.
    pub message: String,
    /// Local time the notice was posted.
    pub posted_at: DateTime<Local>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    current: Option<Notice>,
}

/// Single-slot notice board with auto-clear.
#[derive(Debug, Clone)]
pub struct NotificationBoard {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl NotificationBoard {
    /// Board whose notices clear after `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    /// Notice on display right now, if any.
    pub fn current(&self) -> Option<Notice> {
        match self.slot.lock() {
            Ok(slot) => slot.current.clone(),
            Err(e) => {
                warn!("Notification board lock poisoned: {}", e);
                None
            }
        }
    }

    fn post(&self, message: &str) -> Option<u64> {
        let mut slot = match self.slot.lock() {
            Ok(slot) => slot,
            Err(e) => {
                warn!("Notification board lock poisoned: {}", e);
                return None;
            }
        };
        slot.generation += 1;
        slot.current = Some(Notice {
            message: message.to_string(),
            posted_at: Local::now(),
        });
        Some(slot.generation)
    }
}

impl Notifier for NotificationBoard {
    fn notify(&self, message: &str) {
        let Some(generation) = self.post(message) else {
            return;
        };
        info!("Notice {}: {}", generation, message);

        let slot = Arc::clone(&self.slot);
        let duration = self.duration;
        thread::spawn(move || {
            thread::sleep(duration);
            if let Ok(mut slot) = slot.lock() {
                if slot.generation == generation {
                    slot.current = None;
                    debug!("Notice {} cleared", generation);
                }
            }
        });
    }
}
