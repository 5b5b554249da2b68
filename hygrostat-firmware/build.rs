//! Build script for hygrostat-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates node.toml at compile time
//! - Embeds the validated config as postcard bytes

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use hygrostat_core::config::NodeConfig;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    setup_linker(&out_dir);
    embed_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate node.toml, then write it to OUT_DIR as postcard bytes
fn embed_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");

    if !config_path.exists() {
        fail(
            "node.toml not found!",
            "The firmware requires a node.toml configuration file\n\
             in the hygrostat-firmware directory.",
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read node.toml", &e.to_string()),
    };

    let config: NodeConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail("Invalid node.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail(
            "Invalid node configuration",
            &format!("{:?}\n{}", e, hint(&config)),
        );
    }

    let bytes = match postcard::to_stdvec(&config) {
        Ok(bytes) => bytes,
        Err(e) => fail("Failed to encode node configuration", &e.to_string()),
    };
    fs::write(out_dir.join("node_config.bin"), &bytes).unwrap();

    println!(
        "cargo:warning=node.toml validated successfully ({} bytes embedded)",
        bytes.len()
    );
}

/// Summary of the values validation looks at
fn hint(config: &NodeConfig) -> String {
    format!(
        "sensor: {} on gpio{}, relay on gpio{}\n\
         sampler: tick {} ms, window {} ms, read every {} ms (minimum {} ms)",
        config.sensor.kind.name(),
        config.sensor.pin.pin,
        config.relay.pin.pin,
        config.sampler.tick_period_ms,
        config.sampler.averaging_window_ms,
        config.sampler.min_read_interval_ms,
        config.sensor.kind.min_refresh_ms(),
    )
}

/// Abort the build with a boxed error message
fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(detail)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
