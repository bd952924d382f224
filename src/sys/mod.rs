//! The entry-point contract of the vendor binary driver. Out-parameters of
//! the C interface become multi-value returns; raw status codes are passed
//! through unchanged and interpreted by the device layer.

/// Selector for the text fields of the unit-info entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    /// Version number of the driver binary.
    DriverVersion,
    /// USB version used for the connection, e.g. "2.0".
    UsbVersion,
    HardwareVersion,
    /// Model variant, e.g. "2204A".
    ModelNumber,
    SerialNumber,
    /// Calibration date, e.g. "06Jul20".
    CalibrationDate,
    /// Current numeric status code, returned as text.
    ErrorCode,
    KernelDriverVersion,
    DriverPath,
}

impl InfoKind {
    pub(crate) fn code(self) -> i16 {
        match self {
            InfoKind::DriverVersion       => 0,
            InfoKind::UsbVersion          => 1,
            InfoKind::HardwareVersion     => 2,
            InfoKind::ModelNumber         => 3,
            InfoKind::SerialNumber        => 4,
            InfoKind::CalibrationDate     => 5,
            InfoKind::ErrorCode           => 6,
            InfoKind::KernelDriverVersion => 7,
            InfoKind::DriverPath          => 8,
        }
    }
}

/// Out-values of the timebase query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimebaseInfo {
    /// Effective interval between samples, in nanoseconds.
    pub interval_ns: i32,
    /// Most suitable time units for other driver calls.
    pub time_units: i16,
    /// Maximum number of samples one block can hold at this configuration.
    pub max_samples: i32,
}

pub trait Driver {
    /// Vendor-specific pre-open call; must be issued before `open_unit`.
    fn apply_startup_fix(&mut self, magic1: i32, magic2: i32);

    /// Returns a handle: positive = open, 0 = no device, negative = device
    /// present but failed to open.
    fn open_unit(&mut self) -> i16;

    fn close_unit(&mut self, handle: i16) -> i16;

    /// Writes the requested text field into `buffer` and returns its length;
    /// 0 means the field is unavailable.
    fn unit_info(&mut self, handle: i16, buffer: &mut [u8], kind: InfoKind) -> i16;

    fn set_channel(&mut self, handle: i16, channel: i16, enabled: bool, coupling: i16,
                   range: i16) -> i16;

    fn set_trigger(&mut self, handle: i16, source: i16, threshold: i16, edge: i16,
                   delay_percent: i16, timeout_ms: i16) -> i16;

    fn set_ets(&mut self, handle: i16, mode: i16, cycles: i16, interleave: i16) -> i32;

    fn get_timebase(&mut self, handle: i16, timebase: i16, samples: i32, oversample: i16)
        -> (i16, TimebaseInfo);

    fn ping_unit(&mut self, handle: i16) -> i16;

    /// Starts a block capture; returns `(code, estimated collection time in ms)`.
    fn run_block(&mut self, handle: i16, samples: i32, timebase: i16, oversample: i16)
        -> (i16, i32);

    fn is_ready(&mut self, handle: i16) -> bool;

    /// Copies captured samples into the provided per-channel buffers; returns
    /// `(overflow bitmask over channels 0-3, number of samples per channel)`.
    fn get_values(&mut self, handle: i16, buffers: [Option<&mut [i16]>; 4], samples: i32)
        -> (u16, i32);

    fn stop(&mut self, handle: i16) -> i16;
}

#[cfg(feature = "hardware")]
#[path = "vendor.rs"]
pub mod imp;

#[cfg(not(feature = "hardware"))]
#[path = "stub.rs"]
pub mod imp;
