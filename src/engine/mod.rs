//! Transport layer for the Unreal Editor command socket.
//!
//! `EngineBridge` is the client: construct one from a `Config` and share it
//! behind an `Arc`. For call sites that cannot thread a reference (one-shot
//! CLI paths), `shared`/`reset_shared` manage a process-wide instance.

mod connection;
mod error;
pub mod policy;
pub mod response;

pub use connection::EngineBridge;
pub use error::TransportError;

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::config::Config;

/// Process-wide instance slot. This lock only guards the pointer; the
/// bridge's own cycle lock guards the socket.
static SHARED: Lazy<Mutex<Option<Arc<EngineBridge>>>> = Lazy::new(|| Mutex::new(None));

/// Get the shared bridge, creating it lazily on first access. Never
/// connects eagerly — the bridge handles its own retry on first use.
pub fn shared(config: &Config) -> Arc<EngineBridge> {
    let mut slot = SHARED.lock().expect("engine instance lock poisoned");
    slot.get_or_insert_with(|| {
        info!("Creating new EngineBridge instance");
        Arc::new(EngineBridge::new(config))
    })
    .clone()
}

/// Disconnect and discard the shared bridge so the next `shared()` builds
/// a fresh one. Used for explicit error recovery and at shutdown.
pub async fn reset_shared() {
    let existing = {
        let mut slot = SHARED.lock().expect("engine instance lock poisoned");
        slot.take()
    };
    if let Some(bridge) = existing {
        bridge.disconnect().await;
    }
    info!("Engine connection reset");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shared_returns_same_instance_until_reset() {
        let config = Config::default();
        let a = shared(&config);
        let b = shared(&config);
        assert!(Arc::ptr_eq(&a, &b));

        reset_shared().await;
        let c = shared(&config);
        assert!(!Arc::ptr_eq(&a, &c));
        reset_shared().await;
    }
}
