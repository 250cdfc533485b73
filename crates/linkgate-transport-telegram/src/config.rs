//! Telegram transport settings.

/// Maximum retries for a Telegram API call on transient network errors.
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// First backoff delay (milliseconds).
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Backoff ceiling (milliseconds).
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 5_000;

/// Get Telegram API max retries from env or default.
///
/// Environment variable: `TELEGRAM_API_MAX_RETRIES`.
#[must_use]
pub fn get_telegram_max_retries() -> usize {
    std::env::var("TELEGRAM_API_MAX_RETRIES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(TELEGRAM_API_MAX_RETRIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_retries_env_override() {
        std::env::set_var("TELEGRAM_API_MAX_RETRIES", "7");
        assert_eq!(get_telegram_max_retries(), 7);

        std::env::set_var("TELEGRAM_API_MAX_RETRIES", "many");
        assert_eq!(get_telegram_max_retries(), TELEGRAM_API_MAX_RETRIES);

        std::env::remove_var("TELEGRAM_API_MAX_RETRIES");
        assert_eq!(get_telegram_max_retries(), TELEGRAM_API_MAX_RETRIES);
    }
}
