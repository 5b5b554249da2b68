//! Property tests for the sampler over arbitrary sensor behaviour

use hygrostat_core::config::{Calibration, SamplerConfig, WindowRestart};
use hygrostat_core::sampling::Sampler;
use hygrostat_core::traits::Hygrometer;
use proptest::prelude::*;

/// Sensor replaying a script; `None` entries are failed reads
struct ScriptedSensor {
    script: Vec<Option<(f32, f32)>>,
    position: usize,
    attempts: usize,
    humidity: f32,
}

impl ScriptedSensor {
    fn new(script: Vec<Option<(f32, f32)>>) -> Self {
        Self {
            script,
            position: 0,
            attempts: 0,
            humidity: f32::NAN,
        }
    }
}

impl Hygrometer for ScriptedSensor {
    fn read_temperature(&mut self) -> f32 {
        let entry = self.script[self.position % self.script.len()];
        self.position += 1;
        self.attempts += 1;
        match entry {
            Some((t, h)) => {
                self.humidity = h;
                t
            }
            None => {
                self.humidity = f32::NAN;
                f32::NAN
            }
        }
    }

    fn read_humidity(&mut self) -> f32 {
        self.humidity
    }
}

fn reading() -> impl Strategy<Value = Option<(f32, f32)>> {
    prop_oneof![
        1 => Just(None),
        3 => (-20.0f32..50.0, 5.0f32..95.0).prop_map(Some),
    ]
}

fn script() -> impl Strategy<Value = Vec<Option<(f32, f32)>>> {
    prop::collection::vec(reading(), 1..24)
}

fn restart() -> impl Strategy<Value = WindowRestart> {
    prop_oneof![Just(WindowRestart::Legacy), Just(WindowRestart::Aligned)]
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn smoothed_values_are_never_nan(
        script in script(),
        ticks in 0usize..200,
        tick_ms in 100u32..1000,
        window_ms in 1000u32..20_000,
    ) {
        let mut sampler = Sampler::new(
            ScriptedSensor::new(script),
            SamplerConfig::new(tick_ms, window_ms),
            Calibration::DHT11_BENCH,
        );

        prop_assert!(!sampler.temperature().is_nan());
        prop_assert!(!sampler.humidity().is_nan());

        for _ in 0..ticks {
            sampler.tick();
            prop_assert!(!sampler.temperature().is_nan());
            prop_assert!(!sampler.humidity().is_nan());
        }
    }

    #[test]
    fn reads_happen_every_nth_tick(
        script in script(),
        tick_ms in 100u32..1000,
        interval_ms in 1000u32..5000,
    ) {
        let config = SamplerConfig::new(tick_ms, 60_000).with_min_read_interval(interval_ms);
        let every = config.ticks_per_read() as usize;
        let mut sampler = Sampler::new(ScriptedSensor::new(script), config, Calibration::IDENTITY);

        for index in 0..120usize {
            let before = sampler.sensor().attempts;
            sampler.tick();
            let attempted = sampler.sensor().attempts != before;
            prop_assert_eq!(attempted, index > 0 && index % every == 0);
        }
    }

    #[test]
    fn window_close_resets_accumulators(
        script in script(),
        tick_ms in 100u32..1000,
        window_ms in 1000u32..10_000,
        restart in restart(),
    ) {
        let config = SamplerConfig::new(tick_ms, window_ms).with_window_restart(restart);
        let mut sampler = Sampler::new(ScriptedSensor::new(script), config, Calibration::IDENTITY);

        let mut closes = Vec::new();
        for index in 0..300usize {
            if sampler.tick() {
                closes.push(index);
                prop_assert_eq!(sampler.sample_count(), 0);
                prop_assert_eq!(sampler.accumulated(), (0.0, 0.0));
            }
        }

        // Windows after the first are evenly spaced
        let gaps: Vec<usize> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        if let Some(first) = gaps.first() {
            prop_assert!(gaps.iter().all(|gap| gap == first));
            let expected = match restart {
                WindowRestart::Legacy => closes[0],
                WindowRestart::Aligned => closes[0] + 1,
            };
            prop_assert_eq!(*first, expected);
        }
    }

    #[test]
    fn average_covers_successful_reads_only(
        script in script(),
        ticks in 0usize..150,
    ) {
        let config = SamplerConfig::new(500, 5000);
        let mut sampler = Sampler::new(
            ScriptedSensor::new(script.clone()),
            config,
            Calibration::IDENTITY,
        );

        // Seed read belongs to the first window
        let mut window: Vec<(f32, f32)> = script[0].into_iter().collect();
        let mut last_smoothed = (sampler.temperature(), sampler.humidity());

        for _ in 0..ticks {
            let attempts_before = sampler.sensor().attempts;
            let closed = sampler.tick();

            if sampler.sensor().attempts != attempts_before {
                let entry = script[(sampler.sensor().attempts - 1) % script.len()];
                match entry {
                    Some(pair) => {
                        prop_assert!(!sampler.has_error());
                        window.push(pair);
                    }
                    None => {
                        prop_assert!(sampler.has_error());
                        prop_assert_eq!(
                            (sampler.temperature(), sampler.humidity()),
                            last_smoothed
                        );
                    }
                }
            } else {
                prop_assert!(!sampler.has_error());
            }

            if !window.is_empty() {
                let n = window.len() as f32;
                let mean_t = window.iter().map(|r| r.0).sum::<f32>() / n;
                let mean_h = window.iter().map(|r| r.1).sum::<f32>() / n;
                prop_assert!(close(sampler.temperature(), mean_t));
                prop_assert!(close(sampler.humidity(), mean_h));
            }

            if closed {
                window.clear();
            } else {
                prop_assert_eq!(sampler.sample_count() as usize, window.len());
            }

            last_smoothed = (sampler.temperature(), sampler.humidity());
        }
    }
}
