//! Character-by-character reveal of bot messages.
//!
//! Each animation is its own task, keyed by [`MessageId`]. Every tick pushes
//! the next character of the text to the surface; the tick after the last
//! character stops the timer and deregisters the animation. An animation
//! can be cancelled on its own or together with all others through the
//! animator's root token. Cancelling all replaces the root, so animations
//! started afterwards run normally.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::handles::{MessageId, MessageSurface};

/// Default delay between revealed characters.
pub const DEFAULT_TYPING_INTERVAL: Duration = Duration::from_millis(15);

/// Shortest interval accepted; tokio intervals need a non-zero period.
pub const MIN_TYPING_INTERVAL: Duration = Duration::from_millis(1);

/// Runs typing animations.
#[derive(Clone)]
pub struct TypingAnimator {
    interval: Duration,
    root: Arc<Mutex<CancellationToken>>,
    running: Arc<Mutex<HashMap<MessageId, CancellationToken>>>,
}

impl fmt::Debug for TypingAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingAnimator")
            .field("interval", &self.interval)
            .field("active", &self.active())
            .finish()
    }
}

impl Default for TypingAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_INTERVAL)
    }
}

impl TypingAnimator {
    /// Intervals below [`MIN_TYPING_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_TYPING_INTERVAL),
            root: Arc::new(Mutex::new(CancellationToken::new())),
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start revealing `text` into the render unit `id`.
    ///
    /// The unit must already exist on `surface`. The first character shows
    /// one interval after this call.
    pub fn start(
        &self,
        id: MessageId,
        text: String,
        surface: Arc<dyn MessageSurface>,
    ) -> JoinHandle<()> {
        let token = self.root.lock().child_token();
        self.running.lock().insert(id, token.clone());

        let running = Arc::clone(&self.running);
        let period = self.interval;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            let mut chars = text.chars();
            let mut shown = String::with_capacity(text.len());

            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!(name: "typing.cancelled", msg_id = %id, revealed = shown.chars().count(), "Typing animation cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Some(c) = chars.next() {
                            shown.push(c);
                            surface.set_text(id, &shown);
                        } else {
                            break;
                        }
                    }
                }
            }

            running.lock().remove(&id);
        })
    }

    /// Stop one animation. Returns `false` if it was not running.
    pub fn cancel(&self, id: MessageId) -> bool {
        match self.running.lock().remove(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Stop every running animation. The animator stays usable.
    pub fn cancel_all(&self) {
        let old = std::mem::replace(&mut *self.root.lock(), CancellationToken::new());
        old.cancel();
        self.running.lock().clear();
    }

    /// Number of animations still revealing text.
    pub fn active(&self) -> usize {
        self.running.lock().len()
    }

    pub fn is_running(&self, id: MessageId) -> bool {
        self.running.lock().contains_key(&id)
    }
}
