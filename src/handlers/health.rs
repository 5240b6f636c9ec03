// GET /
pub async fn health() -> &'static str {
    "HealthTick API is running"
}
