//! Report hand-off task
//!
//! Receives closed-window reports from the sampler task. This is the
//! boundary to the MQTT publisher and relay logic, which live outside
//! this firmware; reports are logged against the topic they belong to.

use defmt::*;

use hygrostat_core::config::{NodeConfig, Topic};

use crate::channels::REPORT;

/// Report task - waits for each closed window
#[embassy_executor::task]
pub async fn report_task(config: &'static NodeConfig) {
    let topic = config.mqtt.topic(Topic::Sensor);
    info!("Report task started, topic {}", topic.as_str());

    loop {
        let report = REPORT.wait().await;

        if report.consecutive_failures > 0 {
            warn!(
                "[{}] window {}: sensor failing, last good T={} H={}",
                topic.as_str(),
                report.window,
                report.temperature,
                report.humidity
            );
        } else {
            info!(
                "[{}] window {}: T={} H={}",
                topic.as_str(),
                report.window,
                report.temperature,
                report.humidity
            );
        }
    }
}
