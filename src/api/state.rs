use crate::services::QueryEngine;

/// Shared application state
///
/// The engine is immutable once built, so handlers share it without a lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: QueryEngine,
}

impl AppState {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }
}
