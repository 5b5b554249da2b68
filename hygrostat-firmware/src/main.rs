//! Hygrostat - Temperature/Humidity Sensor Node Firmware
//!
//! Main firmware binary for RP2040-based sensor nodes. Samples a DHT11 or
//! DHT22 on a fixed tick, averages the readings over a window and hands
//! each closed window to the publisher.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hygrostat_core::config::NodeConfig;
use hygrostat_core::sampling::Sampler;
use hygrostat_drivers::sensor::Dht;
use hygrostat_hal_rp2040::{OpenDrainLine, PinBank};

mod channels;
mod config;
mod tasks;

// Configuration must live forever for task references
static NODE_CONFIG: StaticCell<NodeConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hygrostat firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    let mut pins = PinBank::new(p);
    info!("Peripherals initialized");

    let config: &'static NodeConfig = NODE_CONFIG.init(load_config());
    info!(
        "Node {}: {} on GPIO{}, broker {}:{}",
        config.mqtt.client_id.as_str(),
        config.sensor.kind.name(),
        config.sensor.pin.pin,
        config.mqtt.broker.as_str(),
        config.mqtt.port
    );

    // Sensor data line
    let line = match OpenDrainLine::from_config(&mut pins, &config.sensor.pin) {
        Ok(line) => line,
        Err(e) => {
            error!("Cannot claim sensor pin GPIO{}: {}", config.sensor.pin.pin, e);
            panic!("sensor pin unavailable");
        }
    };
    let sensor = Dht::new(line, Delay, config.sensor.kind);

    // Seeds the averages with one blocking read
    let sampler = Sampler::new(sensor, config.sampler, config.calibration);
    if sampler.has_error() {
        warn!(
            "Initial sensor read failed ({}), values start at zero",
            sampler.sensor().last_error()
        );
    } else {
        info!(
            "Initial reading: T={} H={}",
            sampler.temperature(),
            sampler.humidity()
        );
    }

    // Spawn tasks
    spawner.spawn(tasks::sampler_task(sampler)).unwrap();
    spawner.spawn(tasks::report_task(config)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Load the embedded configuration
///
/// Falls back to defaults if the embedded image is unusable. build.rs
/// rejects invalid files, so this only happens if the image and the
/// firmware's config layout disagree.
fn load_config() -> NodeConfig {
    match config::load_embedded() {
        Ok(config) => {
            info!("Loaded embedded configuration");
            config
        }
        Err(e) => {
            error!("Failed to load embedded config: {}", e);
            error!("Using default configuration");
            NodeConfig::default()
        }
    }
}
