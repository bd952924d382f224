//! High-level configuration of the device in terms of physical qualities.

use std::fmt;

use crate::params::Range;

/// One of the four input channel slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
    C,
    D,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::A, Channel::B, Channel::C, Channel::D];

    /// Checked conversion from a raw slot index, for callers that do not hold
    /// a `Channel` already. Rejected indices never reach the driver.
    pub fn from_index(index: i16) -> crate::Result<Channel> {
        match index {
            0 => Ok(Channel::A),
            1 => Ok(Channel::B),
            2 => Ok(Channel::C),
            3 => Ok(Channel::D),
            _ => Err(crate::Error::InvalidChannel(index)),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn code(self) -> i16 {
        self as i16
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Channel::A => write!(f, "A"),
            Channel::B => write!(f, "B"),
            Channel::C => write!(f, "C"),
            Channel::D => write!(f, "D"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coupling {
    AC,
    #[default]
    DC,
}

impl Coupling {
    pub(crate) fn code(self) -> i16 {
        match self {
            Coupling::AC => 0,
            Coupling::DC => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    #[default]
    Rising,
    Falling,
}

impl Edge {
    pub(crate) fn code(self) -> i16 {
        match self {
            Edge::Rising  => 0,
            Edge::Falling => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerSource {
    Channel(Channel),
    #[default]
    Disabled,
}

impl TriggerSource {
    // 5 is the distinguished driver constant for "no trigger".
    pub(crate) fn code(self) -> i16 {
        match self {
            TriggerSource::Channel(channel) => channel.code(),
            TriggerSource::Disabled         => 5,
        }
    }
}

/// Trigger setup for subsequent block captures. The threshold is converted to
/// ADC counts against the range of whichever channel was configured last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerConfig {
    pub source: TriggerSource,
    /// Threshold level, in volts.
    pub level_volts: f32,
    pub edge: Edge,
    /// Delay between the trigger event and the start of collection, in
    /// percent of the requested block length.
    pub delay_percent: i16,
    /// Time to wait for a trigger event, in ms; 0 waits forever.
    pub timeout_ms: i16,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig {
            source: TriggerSource::Disabled,
            level_volts: 0.0,
            edge: Edge::Rising,
            delay_percent: 0,
            timeout_ms: 0,
        }
    }
}

/// Per-slot configuration tracked by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    pub enabled: bool,
    pub range: Range,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;

    #[test]
    fn test_channel_from_index() {
        assert_eq!(Channel::from_index(0), Ok(Channel::A));
        assert_eq!(Channel::from_index(3), Ok(Channel::D));
        assert_eq!(Channel::from_index(4), Err(Error::InvalidChannel(4)));
        assert_eq!(Channel::from_index(-1), Err(Error::InvalidChannel(-1)));
    }

    #[test]
    fn test_trigger_source_codes() {
        assert_eq!(TriggerSource::Channel(Channel::A).code(), 0);
        assert_eq!(TriggerSource::Channel(Channel::D).code(), 3);
        assert_eq!(TriggerSource::Disabled.code(), 5);
    }

    #[test]
    fn test_defaults() {
        let trigger = TriggerConfig::default();
        assert_eq!(trigger.source, TriggerSource::Disabled);
        assert_eq!(trigger.edge, Edge::Rising);
        assert_eq!(trigger.timeout_ms, 0);
        let state = ChannelState::default();
        assert!(!state.enabled);
        assert_eq!(state.range, Range::Max);
    }
}
