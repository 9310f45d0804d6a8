// ABOUTME: Process-wide dispatch bus installed once during startup wiring
// ABOUTME: Components normally receive a BusHandle; this is the fallback accessor

use std::sync::OnceLock;
use tracing::warn;

use crate::bus::BusHandle;

static GLOBAL_BUS: OnceLock<BusHandle> = OnceLock::new();

/// Install the application's bus. Only the first call wins; later calls are logged and ignored.
pub fn install_global(handle: BusHandle) -> bool {
    if GLOBAL_BUS.set(handle).is_err() {
        warn!("Global dispatch bus was already installed");
        return false;
    }
    true
}

/// The installed bus, if startup wiring already ran
pub fn global() -> Option<&'static BusHandle> {
    GLOBAL_BUS.get()
}
