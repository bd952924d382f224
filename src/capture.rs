//! Block-capture results and the readiness wait primitive.

use std::thread::sleep;
use std::time::{Duration, Instant};

use bitflags::bitflags;

use crate::config::Channel;

bitflags! {
    /// Per-channel ADC overflow bits, as reported by the driver for one block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Overflow: u16 {
        const ChannelA = 1<<0;
        const ChannelB = 1<<1;
        const ChannelC = 1<<2;
        const ChannelD = 1<<3;
    }
}

impl Overflow {
    pub fn channel(channel: Channel) -> Self {
        match channel {
            Channel::A => Overflow::ChannelA,
            Channel::B => Overflow::ChannelB,
            Channel::C => Overflow::ChannelC,
            Channel::D => Overflow::ChannelD,
        }
    }
}

/// Outcome of one block capture on a single enabled channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelReading {
    /// Arithmetic mean of the block, converted to volts.
    Volts(f64),
    /// The driver returned no data for this channel.
    ReadError,
}

impl ChannelReading {
    pub fn volts(self) -> Option<f64> {
        match self {
            ChannelReading::Volts(volts) => Some(volts),
            ChannelReading::ReadError => None,
        }
    }
}

/// Averaged voltages for every enabled channel plus the overflow set.
/// Overflow is a warning attached to a successful result, never a failure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acquisition {
    /// One entry per channel slot; `None` for slots that were not enabled.
    pub readings: [Option<ChannelReading>; 4],
    pub overflow: Overflow,
}

impl Acquisition {
    /// Averaged voltage on `channel`, if it was enabled and read back cleanly.
    pub fn volts(&self, channel: Channel) -> Option<f64> {
        self.readings[channel.index()].and_then(ChannelReading::volts)
    }

    /// Whether `channel` exceeded its configured range during the block.
    pub fn overflowed(&self, channel: Channel) -> bool {
        self.overflow.contains(Overflow::channel(channel))
    }
}

/// Blocking wait for block-capture completion: sleep through the estimated
/// collection time, then poll at a fixed interval. The reference behavior has
/// no upper bound on the wait; set `timeout` to bail out on a stuck device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyWait {
    pub poll_interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for ReadyWait {
    fn default() -> Self {
        ReadyWait {
            poll_interval: Duration::from_millis(5),
            timeout: None,
        }
    }
}

impl ReadyWait {
    /// Returns `false` iff the timeout expired before `is_ready` reported
    /// completion. The timeout clock starts after the estimated sleep.
    pub fn block(&self, estimated: Duration, mut is_ready: impl FnMut() -> bool) -> bool {
        sleep(estimated);
        let started = Instant::now();
        while !is_ready() {
            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    return false;
                }
            }
            sleep(self.poll_interval);
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_overflow_decode() {
        let overflow = Overflow::from_bits_truncate(0b0100);
        assert!(overflow.contains(Overflow::ChannelC));
        assert!(!overflow.contains(Overflow::ChannelA));
        assert_eq!(Overflow::channel(Channel::D), Overflow::ChannelD);
    }

    #[test]
    fn test_acquisition_accessors() {
        let mut acquisition = Acquisition::default();
        acquisition.readings[0] = Some(ChannelReading::Volts(1.5));
        acquisition.readings[2] = Some(ChannelReading::ReadError);
        acquisition.overflow = Overflow::ChannelC;
        assert_eq!(acquisition.volts(Channel::A), Some(1.5));
        assert_eq!(acquisition.volts(Channel::B), None);
        assert_eq!(acquisition.volts(Channel::C), None);
        assert!(acquisition.overflowed(Channel::C));
        assert!(!acquisition.overflowed(Channel::A));
    }

    #[test]
    fn test_ready_wait_polls_until_ready() {
        let wait = ReadyWait { poll_interval: Duration::ZERO, timeout: None };
        let mut polls = 0;
        let completed = wait.block(Duration::ZERO, || { polls += 1; polls == 4 });
        assert!(completed);
        assert_eq!(polls, 4);
    }

    #[test]
    fn test_ready_wait_immediate() {
        let wait = ReadyWait::default();
        assert!(wait.block(Duration::ZERO, || true));
    }

    #[test]
    fn test_ready_wait_times_out() {
        let wait = ReadyWait { poll_interval: Duration::ZERO, timeout: Some(Duration::ZERO) };
        assert!(!wait.block(Duration::ZERO, || false));
    }
}
