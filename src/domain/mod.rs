// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// - cart:  per-user cart contents
// - order: order creation, listing, and status relay
//
// ============================================================================

pub mod cart;
pub mod order;
