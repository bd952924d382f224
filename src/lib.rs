mod sys;
mod params;
mod config;
mod capture;
mod device;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No oscilloscope is attached.
    NotFound,
    /// An oscilloscope is attached but could not be opened.
    OpenFailed,
    /// The session is not open; configuration and acquisition are rejected.
    NotOpen,
    InvalidChannel(i16),
    ChannelConfig(Option<DeviceFault>),
    TriggerConfig(Option<DeviceFault>),
    NoChannelsEnabled,
    SamplingConfig(Option<DeviceFault>),
    Disconnected(Option<DeviceFault>),
    CaptureStart(Option<DeviceFault>),
    /// The opt-in readiness timeout expired before the block completed.
    ReadyTimeout,
    AcquisitionRead(Option<DeviceFault>),
    StatusQuery,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn refused(f: &mut std::fmt::Formatter, what: &str, fault: &Option<DeviceFault>)
                -> std::fmt::Result {
            write!(f, "{}", what)?;
            if let Some(fault) = fault {
                write!(f, " ({})", fault)?;
            }
            Ok(())
        }
        match self {
            Self::NotFound =>
                write!(f, "no oscilloscope found"),
            Self::OpenFailed =>
                write!(f, "oscilloscope found but failed to open"),
            Self::NotOpen =>
                write!(f, "device is not open"),
            Self::InvalidChannel(index) =>
                write!(f, "invalid channel index {}", index),
            Self::ChannelConfig(fault) =>
                refused(f, "channel configuration rejected by the driver", fault),
            Self::TriggerConfig(fault) =>
                refused(f, "trigger configuration rejected by the driver", fault),
            Self::NoChannelsEnabled =>
                write!(f, "no channels enabled; enable at least one before configuring sampling"),
            Self::SamplingConfig(fault) =>
                refused(f, "timebase query rejected by the driver", fault),
            Self::Disconnected(fault) =>
                refused(f, "device stopped responding", fault),
            Self::CaptureStart(fault) =>
                refused(f, "failed to start block capture", fault),
            Self::ReadyTimeout =>
                write!(f, "timed out waiting for the block capture to complete"),
            Self::AcquisitionRead(fault) =>
                refused(f, "failed to retrieve captured samples", fault),
            Self::StatusQuery =>
                write!(f, "could not read the device status code"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use sys::{Driver, InfoKind, TimebaseInfo};

pub use params::{
    Range,
    MAX_ADC_VALUE,
    adc_to_millivolts,
    millivolts_to_adc,
};

pub use config::{
    Channel,
    ChannelState,
    Coupling,
    Edge,
    TriggerSource,
    TriggerConfig,
};

pub use capture::{
    Overflow,
    ChannelReading,
    Acquisition,
    ReadyWait,
};

pub use device::{DeviceFault, DeviceInfo};

pub type Device =
    device::Device<crate::sys::imp::Ps2000Driver>;
