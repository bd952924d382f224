use ps2000::{Channel, Coupling, Device, TriggerConfig};

fn main() -> ps2000::Result<()> {
    env_logger::init();
    let mut device = Device::new();
    device.open()?;
    device.set_channel(Channel::A, true, 6.0, Coupling::DC)?;
    device.set_trigger(&TriggerConfig::default())?;
    device.set_sampling(10, 4.0, 0)?;
    let acquisition = device.acquire()?;
    for channel in Channel::ALL {
        if let Some(volts) = acquisition.volts(channel) {
            let overflow = if acquisition.overflowed(channel) { " (overflow)" } else { "" };
            println!("channel {}: {:+.6} V{}", channel, volts, overflow);
        }
    }
    device.close();
    Ok(())
}
