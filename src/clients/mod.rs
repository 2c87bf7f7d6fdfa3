// ============================================================================
// Backend Clients
// ============================================================================
//
// Production implementations of the aggregator's source traits:
// - customers.rs: HTTP client for the customer service
// - profiles.rs: request/response messaging channel to the profile service
//
// ============================================================================

pub mod customers;
pub mod profiles;

pub use customers::CustomerHttpClient;
pub use profiles::ProfileSocketClient;
