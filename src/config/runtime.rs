use super::ConsoleConfig;
use tracing::warn;

/// Apply environment overrides on top of file/default configuration.
///
/// `lookup` is `std::env::var` in the binary; tests pass a map.
///
/// - `CONSOLE_BACKEND_URL` → `backend.base_url`
/// - `CONSOLE_PAGE_SIZE` → `table.page_size`
/// - `CONSOLE_HOST` / `CONSOLE_PORT` → `location`
pub fn apply_overrides<F>(config: &mut ConsoleConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("CONSOLE_BACKEND_URL") {
        config.backend.base_url = v;
    }
    if let Some(v) = lookup("CONSOLE_PAGE_SIZE") {
        match v.parse::<usize>() {
            Ok(n) if n > 0 => config.table.page_size = n,
            _ => warn!(value = %v, "Ignoring invalid CONSOLE_PAGE_SIZE"),
        }
    }
    if let Some(v) = lookup("CONSOLE_HOST") {
        config.location.host = v;
    }
    if let Some(v) = lookup("CONSOLE_PORT") {
        match v.parse::<u16>() {
            Ok(port) => config.location.port = port,
            Err(_) => warn!(value = %v, "Ignoring invalid CONSOLE_PORT"),
        }
    }
}
