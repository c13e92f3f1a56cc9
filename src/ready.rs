//! One-shot "page structure parsed" signal.
//!
//! Browsers report readiness two ways: a `DOMContentLoaded` event, or
//! `readystatechange` notifications that eventually reach `interactive`.
//! Host adapters feed whichever they have into a [`ReadyTrigger`]; the
//! annotator only ever sees the single [`ReadySignal`] future.
//!
//! ```ignore
//! let (trigger, ready) = ReadySignal::pair();
//!
//! // host adapter, event-capable environment
//! trigger.content_loaded();
//!
//! // host adapter, legacy environment
//! trigger.ready_state_changed("interactive".parse()?);
//!
//! // annotator side
//! ready.await;
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::error::MathError;

// =============================================================================
// ReadyState
// =============================================================================

/// Document loading state as reported by `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Structure parsed, subresources may still be loading
    Interactive,
    /// Everything loaded
    Complete,
}

impl ReadyState {
    /// Whether the document structure is fully parsed in this state
    #[inline]
    pub fn is_parsed(self) -> bool {
        self >= ReadyState::Interactive
    }

    /// DOM spelling of the state
    pub fn as_str(self) -> &'static str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadyState {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loading" => Ok(ReadyState::Loading),
            "interactive" => Ok(ReadyState::Interactive),
            "complete" => Ok(ReadyState::Complete),
            other => Err(MathError::UnknownReadyState(other.to_string())),
        }
    }
}

// =============================================================================
// Shared state
// =============================================================================

#[derive(Default)]
struct Waiters {
    next_key: u64,
    entries: Vec<(u64, Waker)>,
}

#[derive(Default)]
struct Shared {
    fired: AtomicBool,
    waiters: Mutex<Waiters>,
}

impl Shared {
    fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        let entries = std::mem::take(&mut self.waiters.lock().entries);
        for (_, waker) in entries {
            waker.wake();
        }
        true
    }

    fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Store or refresh the waker for `key`, returning the key in use.
    fn register(&self, key: Option<u64>, waker: &Waker) -> u64 {
        let mut waiters = self.waiters.lock();
        if let Some(key) = key {
            if let Some((_, slot)) = waiters.entries.iter_mut().find(|(k, _)| *k == key) {
                if !slot.will_wake(waker) {
                    slot.clone_from(waker);
                }
                return key;
            }
        }
        let key = waiters.next_key;
        waiters.next_key += 1;
        waiters.entries.push((key, waker.clone()));
        key
    }

    fn unregister(&self, key: u64) {
        self.waiters.lock().entries.retain(|(k, _)| *k != key);
    }

    fn waiter_count(&self) -> usize {
        self.waiters.lock().entries.len()
    }
}

// =============================================================================
// ReadySignal
// =============================================================================

/// Future that completes once the page structure is parsed.
///
/// Cheap to clone; every clone completes when the trigger fires. A signal
/// whose triggers are all dropped unfired stays pending forever. Dropping a
/// pending signal removes its waker.
pub struct ReadySignal {
    shared: Arc<Shared>,
    key: Option<u64>,
}

impl ReadySignal {
    /// Create a linked trigger/signal pair.
    pub fn pair() -> (ReadyTrigger, ReadySignal) {
        let shared = Arc::new(Shared::default());
        (
            ReadyTrigger {
                shared: Arc::clone(&shared),
            },
            ReadySignal { shared, key: None },
        )
    }

    /// A signal that has already fired (page known to be ready).
    pub fn ready() -> Self {
        let (trigger, signal) = Self::pair();
        trigger.fire();
        signal
    }

    /// Check without waiting.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.shared.is_fired()
    }
}

impl Clone for ReadySignal {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            key: None,
        }
    }
}

impl Future for ReadySignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.shared.is_fired() {
            return Poll::Ready(());
        }

        let key = self.shared.register(self.key, cx.waker());
        self.key = Some(key);
        // `fire` sets the flag before draining; a fire racing the register
        // above has either drained our waker or is seen here
        if self.shared.is_fired() {
            return Poll::Ready(());
        }
        Poll::Pending
    }
}

impl Drop for ReadySignal {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            if !self.shared.is_fired() {
                self.shared.unregister(key);
            }
        }
    }
}

#[cfg(feature = "async")]
impl futures_util::future::FusedFuture for ReadySignal {
    fn is_terminated(&self) -> bool {
        self.is_ready()
    }
}

impl fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadySignal")
            .field("ready", &self.is_ready())
            .finish()
    }
}

// =============================================================================
// ReadyTrigger
// =============================================================================

/// Host-side handle that fires the [`ReadySignal`].
///
/// Firing is one-shot: only the first successful call wakes waiters, later
/// calls return `false`.
#[derive(Clone)]
pub struct ReadyTrigger {
    shared: Arc<Shared>,
}

impl ReadyTrigger {
    /// Fire the signal. Returns `true` if this call fired it.
    pub fn fire(&self) -> bool {
        self.shared.fire()
    }

    /// The host's "structure parsed" event (`DOMContentLoaded`).
    pub fn content_loaded(&self) -> bool {
        let fired = self.fire();
        if fired {
            log::debug!("ready signal fired by content-loaded event");
        }
        fired
    }

    /// A `readystatechange` notification; fires once the state is parsed.
    pub fn ready_state_changed(&self, state: ReadyState) -> bool {
        if !state.is_parsed() {
            return false;
        }
        let fired = self.fire();
        if fired {
            log::debug!("ready signal fired by ready state {state}");
        }
        fired
    }

    /// Whether the signal has fired.
    #[inline]
    pub fn is_fired(&self) -> bool {
        self.shared.is_fired()
    }
}

impl fmt::Debug for ReadyTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyTrigger")
            .field("fired", &self.is_fired())
            .finish()
    }
}
