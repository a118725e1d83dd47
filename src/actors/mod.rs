// ============================================================================
// Actors Module
// ============================================================================
//
// Background infrastructure run as actix actors:
// - CoordinatorActor    - starts and stops the workers below
// - StatusListenerActor - consumes order status events and relays them
// - FileImportActor     - polls the import directory
//
// Note: Domain logic (orders, cart) lives in services, NOT actors.
//
// ============================================================================

mod coordinator;
mod file_import;
mod status_listener;

pub use coordinator::{CoordinatorActor, Shutdown};
pub use file_import::FileImportActor;
pub use status_listener::StatusListenerActor;
