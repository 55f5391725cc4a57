//! Server startup utilities.

use haven_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    __  __
   / / / /___ __   _____  ____
  / /_/ / __ `/ | / / _ \/ __ \
 / __  / /_/ /| |/ /  __/ / / /
/_/ /_/\__,_/ |___/\___/_/ /_/

         Property Marketplace
    "#);
}

/// Prints where the server can be reached.
pub fn print_startup_info(config: &AppConfig) {
    let addr = config.server.addr();
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!(
        "Cache:     {}",
        if config.redis.enabled { config.redis.url.as_str() } else { "disabled" }
    );
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_with_cache_disabled() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        config.redis.enabled = false;
        print_startup_info(&config);
    }
}
