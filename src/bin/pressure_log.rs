//! Periodically read out the pressure-gauge voltage on channel A and append
//! timestamped readings to a plain-text log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ps2000::{Channel, Coupling, Device, TriggerConfig};

const LOG_FILE: &str = "pressure.log";
/// Number of logged data points before the logger exits on its own.
const CYCLES: usize = 100000;
/// Delay between logged data points.
const LOOP_DELAY: Duration = Duration::from_secs(30);
/// Each logged value is the mean of this many readouts, taken back to back.
const READOUTS_PER_POINT: usize = 5;
const READOUT_DELAY: Duration = Duration::from_secs(1);

// Gauge calibration from the manufacturer's manual.
fn volts_to_mbar(volts: f64) -> f64 {
    const A: f64 = 1.667;
    const B: f64 = 11.46;
    10f64.powf(A * volts - B)
}

fn main() -> ps2000::Result<()> {
    env_logger::init();
    let mut device = Device::new();
    device.open()?;
    let result = run(&mut device);
    device.close();
    result
}

fn run(device: &mut Device) -> ps2000::Result<()> {
    // The gauge output stays below 10 V; channel B is explicitly off.
    device.set_channel(Channel::A, true, 6.0, Coupling::DC)?;
    device.set_channel(Channel::B, false, 6.0, Coupling::DC)?;
    device.set_trigger(&TriggerConfig::default())?;
    device.set_sampling(10, 4.0, 0)?;

    let mut log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
        .expect("failed to open log file");
    println!("reading the pressure gauge every {} s; appending to {}",
             LOOP_DELAY.as_secs(), LOG_FILE);

    for cycle in 1..=CYCLES {
        let mut readouts = Vec::with_capacity(READOUTS_PER_POINT);
        for _ in 0..READOUTS_PER_POINT {
            match device.acquire() {
                Ok(acquisition) => {
                    if let Some(volts) = acquisition.volts(Channel::A) {
                        readouts.push(volts);
                    }
                }
                Err(error) =>
                    log::warn!("readout failed, skipping: {}", error),
            }
            sleep(READOUT_DELAY);
        }
        if readouts.is_empty() {
            log::warn!("no usable readouts this cycle");
            continue;
        }
        let volts = readouts.iter().sum::<f64>() / readouts.len() as f64;
        let mbar = volts_to_mbar(volts);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs();
        println!("{}:   {:.3} V    {:.3e} mbar", timestamp, volts, mbar);
        writeln!(log_file, "{:10}  {:10.6}", timestamp, volts)
            .expect("failed to write log file");
        if cycle < CYCLES {
            sleep(LOOP_DELAY);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gauge_calibration() {
        // 10^0 = 1 mbar exactly at V = B / A.
        assert!((volts_to_mbar(11.46 / 1.667) - 1.0).abs() < 1e-9);
        // An order of magnitude per 0.6 V.
        let ratio = volts_to_mbar(2.0) / volts_to_mbar(2.0 - 1.0 / 1.667);
        assert!((ratio - 10.0).abs() < 1e-9);
    }
}
