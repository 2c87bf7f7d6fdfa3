/// GET /health
/// Liveness probe; the gateway holds no state of its own to check.
pub async fn health_check() -> &'static str {
    "OK"
}
