//! Liveness endpoint

/// Always `ok` while the process is serving; poll failures show up in
/// `arris_surfboard_scrape_success` instead.
pub async fn health_check() -> &'static str {
    "ok"
}
