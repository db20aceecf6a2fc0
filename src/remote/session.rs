//! Shared remote session management.
//!
//! One connection to the remote tool server exists per process. It is created
//! lazily on first use; concurrent callers arriving before creation completes
//! attach to the same in-flight future rather than opening duplicate
//! connections. A failed creation propagates to every waiter and clears the
//! slot so the next caller retries. Close and error signals invalidate the
//! handle; the next call then reconnects.

use crate::error::BridgeResult;
use crate::remote::transport::TransportHandle;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Factory producing a new connection attempt.
pub type ConnectFactory =
    Box<dyn Fn() -> BoxFuture<'static, BridgeResult<TransportHandle>> + Send + Sync>;

type ConnectFuture = Shared<BoxFuture<'static, BridgeResult<TransportHandle>>>;

/// Single-slot connection state.
enum Slot {
    /// No connection and none being created.
    Absent,
    /// A creation is in flight; all callers await this same future. The
    /// generation tells a finishing waiter whether the slot still belongs to
    /// its attempt.
    Pending(ConnectFuture, u64),
    /// A live handle.
    Ready(TransportHandle),
}

/// Single-slot cache for the shared remote session.
pub struct SessionCell {
    factory: ConnectFactory,
    slot: Mutex<Slot>,
    generation: std::sync::atomic::AtomicU64,
}

impl SessionCell {
    /// Create a cell that connects with the given factory on first use.
    pub fn new(factory: ConnectFactory) -> Self {
        Self {
            factory,
            slot: Mutex::new(Slot::Absent),
            generation: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Get the shared transport handle, connecting if necessary.
    ///
    /// At most one creation is ever in flight; a failure is returned to every
    /// waiter attached to it and resets the slot so a later call can retry.
    pub async fn acquire(&self) -> BridgeResult<TransportHandle> {
        let (pending, generation) = {
            let mut slot = self.slot.lock().expect("session slot poisoned");
            match &*slot {
                Slot::Ready(handle) => return Ok(handle.clone()),
                Slot::Pending(future, generation) => (future.clone(), *generation),
                Slot::Absent => {
                    debug!("Opening remote tool server connection");
                    let generation = self
                        .generation
                        .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
                        + 1;
                    let future = (self.factory)().shared();
                    *slot = Slot::Pending(future.clone(), generation);
                    (future, generation)
                }
            }
        };

        let result = pending.await;

        let mut slot = self.slot.lock().expect("session slot poisoned");
        // Only transition if our creation attempt still owns the slot; an
        // invalidate or a newer attempt may have raced us.
        if let Slot::Pending(_, current) = &*slot {
            if *current == generation {
                *slot = match &result {
                    Ok(handle) => Slot::Ready(handle.clone()),
                    Err(error) => {
                        warn!(error = %error, "Remote connection attempt failed");
                        Slot::Absent
                    }
                };
            }
        }

        result
    }

    /// Drop the current handle (or in-flight creation) so the next call
    /// reconnects. Invoked on close/error signals from the transport.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("session slot poisoned");
        if !matches!(*slot, Slot::Absent) {
            debug!("Invalidating remote tool server connection");
        }
        *slot = Slot::Absent;
    }

    /// True when a live handle is cached (no connection attempt is made).
    pub fn is_ready(&self) -> bool {
        matches!(*self.slot.lock().expect("session slot poisoned"), Slot::Ready(_))
    }
}
