use crate::data::registry::Registry;

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// State shared by every request handler.
///
/// Built once after loading and handed to the router behind an `Arc`.
/// Nothing in here is mutable, so handlers never lock.
#[derive(Debug, Default)]
pub struct AppState {
    /// All datasets found in the data directory.
    pub registry: Registry,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}
