// ============================================================================
// Axum Routes Module
// ============================================================================
//
// Structure:
// - mod.rs: Main router assembly and middleware
// - customers.rs: Streaming customer/profile endpoint
// - health.rs: Health check endpoint
//
// The GraphQL surface and the proxy route are mounted here but live in their
// own modules (crate::graphql, crate::gateway).
//
// ============================================================================

mod customers;
mod health;

use async_graphql_axum::GraphQL;
use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::gateway;
use crate::graphql;

/// Create the main application router with all routes
pub fn create_router(ctx: Arc<AppContext>) -> Router {
    let schema = graphql::build_schema(ctx.crm.clone());

    Router::new()
        // Health check (bypasses everything)
        .route("/health", get(health::health_check))
        // Streaming customer/profile join
        .route("/all", get(customers::all_customer_profiles))
        // Fixed proxy path to the customer service
        .route("/proxy", any(gateway::proxy_customers))
        // GraphQL surface over the same aggregator
        .route_service("/graphql", GraphQL::new(schema))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(ctx)
}
