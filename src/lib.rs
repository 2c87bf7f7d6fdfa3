// ============================================================================
// CRM Edge Gateway
// ============================================================================
//
// Edge service in front of the CRM backends:
// - Forwards /proxy to the customer service
// - Joins customers with their profiles and streams the pairings on /all
// - Republishes the same join as a GraphQL field resolver on /graphql
//
// ============================================================================

pub mod clients;
pub mod config;
pub mod context;
pub mod crm;
pub mod error;
pub mod gateway;
pub mod graphql;
pub mod model;
pub mod routes;
