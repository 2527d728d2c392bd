//! Build script for armlink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates armlink.toml and embeds it as postcard binary config

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use armlink_core::config::{ConfigError, ControllerConfig, MAX_CONFIG_SIZE};

fn main() {
    setup_linker();
    embed_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate armlink.toml, then write it to OUT_DIR/config.bin
fn embed_config() {
    println!("cargo:rerun-if-changed=armlink.toml");

    let config_path = Path::new("armlink.toml");
    let config = if config_path.exists() {
        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) => fail("Failed to read armlink.toml", &[e.to_string()]),
        };
        match toml::from_str::<ControllerConfig>(&content) {
            Ok(config) => config,
            Err(e) => fail(
                "Invalid armlink.toml",
                &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
            ),
        }
    } else {
        println!("cargo:warning=armlink.toml not found, embedding default configuration");
        ControllerConfig::default()
    };

    if let Err(e) = config.validate() {
        fail("Invalid configuration in armlink.toml", &[describe(e)]);
    }

    let mut buf = [0u8; MAX_CONFIG_SIZE];
    let encoded = match config.to_slice(&mut buf) {
        Ok(encoded) => encoded,
        Err(e) => fail("Failed to encode configuration", &[describe(e)]),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("config.bin"), &*encoded).unwrap();

    println!("cargo:warning=armlink.toml validated successfully");
}

fn describe(error: ConfigError) -> String {
    match error {
        ConfigError::InvalidLimits(joint) => {
            format!("{:?}: need min_us <= mid_us <= max_us", joint)
        }
        ConfigError::PresetOutOfRange { preset, joint } => {
            format!("preset {:?}: {:?} value outside channel bounds", preset, joint)
        }
        ConfigError::InvalidSmoothing => "filter.smoothing must be at least 1".to_string(),
        ConfigError::Decode => "configuration could not be decoded".to_string(),
        ConfigError::Encode => format!("encoded configuration exceeds {} bytes", MAX_CONFIG_SIZE),
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
