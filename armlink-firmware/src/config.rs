//! Controller configuration loading
//!
//! `build.rs` validates armlink.toml and embeds it as postcard binary.
//! Falls back to the built-in defaults if the blob cannot be decoded.

use defmt::*;

use armlink_core::config::ControllerConfig;

/// Configuration encoded at build time
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/config.bin"));

/// Load the embedded configuration
pub fn load_config() -> ControllerConfig {
    match ControllerConfig::from_bytes(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Loaded embedded configuration ({} bytes)",
                EMBEDDED_CONFIG.len()
            );
            log_config_summary(&config);
            config
        }
        Err(e) => {
            error!("Embedded configuration rejected: {:?}", e);
            warn!("Using built-in defaults");
            ControllerConfig::default()
        }
    }
}

fn log_config_summary(config: &ControllerConfig) {
    debug!("  cycle interval {} ms", config.cycle_interval_ms);
    debug!(
        "  filter k={} deadzone={}us lock={}us/{}ms",
        config.filter.smoothing,
        config.filter.deadzone_us,
        config.filter.static_threshold_us,
        config.filter.static_timeout_ms
    );
    debug!("  lift {:?}", config.lift);
    debug!("  tilt {:?}", config.tilt);
    debug!("  gripper {:?}", config.gripper);
}
