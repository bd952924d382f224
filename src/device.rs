use std::fmt;
use std::time::Duration;

use crate::capture::{Acquisition, ChannelReading, Overflow, ReadyWait};
use crate::config::{Channel, ChannelState, Coupling, TriggerConfig};
use crate::params::{self, Range};
use crate::sys::{Driver, InfoKind, TimebaseInfo};
use crate::{Error, Result};

// Vendor-specific pre-open call; order-dependent, must precede open_unit().
const STARTUP_FIX_MAGIC: (i32, i32) = (0x1ced9168, 0x11e6);

const INFO_BUFFER_LEN: usize = 256;
const STATUS_BUFFER_LEN: usize = 8;

/// Decoded numeric status code of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFault {
    Healthy,
    TooManyUnits,
    OutOfMemory,
    UnitNotFound,
    FirmwareFailed,
    NotResponding,
    ConfigCorrupt,
    OsUnsupported,
}

impl DeviceFault {
    fn from_code(code: i32) -> Option<DeviceFault> {
        match code {
            0 => Some(DeviceFault::Healthy),
            1 => Some(DeviceFault::TooManyUnits),
            2 => Some(DeviceFault::OutOfMemory),
            3 => Some(DeviceFault::UnitNotFound),
            4 => Some(DeviceFault::FirmwareFailed),
            5 => Some(DeviceFault::NotResponding),
            6 => Some(DeviceFault::ConfigCorrupt),
            7 => Some(DeviceFault::OsUnsupported),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Healthy =>
                write!(f, "the oscilloscope is functioning correctly"),
            Self::TooManyUnits =>
                write!(f, "attempt has been made to open more than the maximum number of units"),
            Self::OutOfMemory =>
                write!(f, "not enough memory on the host machine"),
            Self::UnitNotFound =>
                write!(f, "an oscilloscope could not be found"),
            Self::FirmwareFailed =>
                write!(f, "unable to download firmware"),
            Self::NotResponding =>
                write!(f, "the oscilloscope is not responding to commands from the PC"),
            Self::ConfigCorrupt =>
                write!(f, "the device configuration is corrupt or missing"),
            Self::OsUnsupported =>
                write!(f, "the operating system is not supported by this driver"),
        }
    }
}

/// Static identification strings reported by an open device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub model: Option<String>,
    pub calibration_date: Option<String>,
}

#[derive(Debug)]
pub struct Device<D: Driver> {
    driver: D,
    // 0 = no device bound, <0 = present but failed to open, >0 = open.
    handle: i16,
    info: DeviceInfo,
    channels: [ChannelState; 4],
    // The trigger threshold is converted against the range of whichever
    // channel was configured last, enabled or not.
    trigger_range: Range,
    oversample: i16,
    samples: i32,
    timebase: i16,
    timebase_info: TimebaseInfo,
    ready_wait: ReadyWait,
}

impl Device<crate::sys::imp::Ps2000Driver> {
    pub fn new() -> Device<crate::sys::imp::Ps2000Driver> {
        Device::with_driver(crate::sys::imp::Ps2000Driver::new())
    }
}

impl<D: Driver> Device<D> {
    pub fn with_driver(driver: D) -> Device<D> {
        Device {
            driver,
            handle: 0,
            info: DeviceInfo::default(),
            channels: [ChannelState::default(); 4],
            trigger_range: Range::Max,
            oversample: 0,
            samples: 0,
            timebase: 0,
            timebase_info: TimebaseInfo::default(),
            ready_wait: ReadyWait::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle > 0
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn channel_state(&self, channel: Channel) -> ChannelState {
        self.channels[channel.index()]
    }

    /// Sample count one block will actually deliver, after clamping.
    pub fn samples_per_block(&self) -> i32 {
        self.samples
    }

    /// Effective interval between samples reported by the last timebase query.
    pub fn sample_interval_ns(&self) -> i32 {
        self.timebase_info.interval_ns
    }

    pub fn ready_wait(&self) -> ReadyWait {
        self.ready_wait
    }

    /// Replace the sleep-then-poll parameters used while a block completes.
    pub fn set_ready_wait(&mut self, ready_wait: ReadyWait) {
        self.ready_wait = ready_wait;
    }

    fn require_open(&self) -> Result<i16> {
        if self.handle > 0 {
            Ok(self.handle)
        } else {
            Err(Error::NotOpen)
        }
    }

    /// Bind the attached oscilloscope and read its identification strings.
    /// An already-open session is closed (and thereby reset) first.
    pub fn open(&mut self) -> Result<()> {
        if self.handle > 0 {
            self.close();
        }
        self.driver.apply_startup_fix(STARTUP_FIX_MAGIC.0, STARTUP_FIX_MAGIC.1);
        let handle = self.driver.open_unit();
        log::debug!("open_unit() = {}", handle);
        if handle == 0 {
            return Err(Error::NotFound);
        }
        if handle < 0 {
            return Err(Error::OpenFailed);
        }
        self.handle = handle;
        self.info = DeviceInfo {
            model: self.read_info_string(InfoKind::ModelNumber),
            calibration_date: self.read_info_string(InfoKind::CalibrationDate),
        };
        match (&self.info.model, &self.info.calibration_date) {
            (Some(model), Some(date)) =>
                log::info!("found PicoScope {}, calibrated on {}", model, date),
            (Some(model), None) =>
                log::info!("found PicoScope {}", model),
            _ =>
                log::info!("found PicoScope (model string unavailable)"),
        }
        Ok(())
    }

    /// Release the device. Safe to call on an already-closed session; resets
    /// every piece of configuration to its default.
    pub fn close(&mut self) {
        if self.handle != 0 {
            let code = self.driver.close_unit(self.handle);
            log::debug!("close_unit({}) = {}", self.handle, code);
        }
        self.handle = 0;
        self.info = DeviceInfo::default();
        self.channels = [ChannelState::default(); 4];
        self.trigger_range = Range::Max;
        self.oversample = 0;
        self.samples = 0;
        self.timebase = 0;
        self.timebase_info = TimebaseInfo::default();
    }

    fn read_info_string(&mut self, kind: InfoKind) -> Option<String> {
        let mut buffer = [0u8; INFO_BUFFER_LEN];
        let length = self.driver.unit_info(self.handle, &mut buffer[..], kind);
        if length <= 0 {
            return None;
        }
        let bytes = &buffer[..(length as usize).min(buffer.len())];
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim_end_matches('\0');
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Read and decode the numeric status code of the device.
    pub fn query_status(&mut self) -> Result<DeviceFault> {
        self.require_open()?;
        let mut buffer = [0u8; STATUS_BUFFER_LEN];
        let length = self.driver.unit_info(self.handle, &mut buffer[..], InfoKind::ErrorCode);
        if length <= 0 {
            return Err(Error::StatusQuery);
        }
        let bytes = &buffer[..(length as usize).min(buffer.len())];
        let code = std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim_end_matches('\0').trim().parse::<i32>().ok())
            .ok_or(Error::StatusQuery)?;
        let fault = DeviceFault::from_code(code).ok_or(Error::StatusQuery)?;
        log::debug!("query_status() = {:?}", fault);
        Ok(fault)
    }

    // Best-effort fault detail attached to driver-refusal errors.
    fn fault_detail(&mut self) -> Option<DeviceFault> {
        self.query_status().ok()
    }

    /// Configure one channel slot. The selected range is tracked even for a
    /// disabled channel, since it also feeds the trigger threshold conversion.
    pub fn set_channel(&mut self, channel: Channel, enabled: bool, max_volts: f32,
                       coupling: Coupling) -> Result<()> {
        let handle = self.require_open()?;
        let range = Range::from_max_volts(max_volts);
        self.channels[channel.index()] = ChannelState { enabled, range };
        self.trigger_range = range;
        let code = self.driver.set_channel(handle, channel.code(), enabled,
                                           coupling.code(), range.code());
        log::debug!("set_channel({}, enabled={}, {:?}, {:?}) = {}",
                    channel, enabled, coupling, range, code);
        if code == 0 {
            let fault = self.fault_detail();
            log::warn!("failed to set up channel {}", channel);
            return Err(Error::ChannelConfig(fault));
        }
        Ok(())
    }

    /// Configure (or disable) triggering for subsequent blocks. ETS is
    /// unsupported and is forced off on the device as part of this call.
    pub fn set_trigger(&mut self, trigger: &TriggerConfig) -> Result<()> {
        let handle = self.require_open()?;
        let threshold = params::millivolts_to_adc(f64::from(trigger.level_volts) * 1000.0,
                                                  self.trigger_range);
        let code = self.driver.set_trigger(handle, trigger.source.code(), threshold,
                                           trigger.edge.code(), trigger.delay_percent,
                                           trigger.timeout_ms);
        log::debug!("set_trigger({:?}, threshold {} on {:?}) = {}",
                    trigger.source, threshold, self.trigger_range, code);
        let ets_code = self.driver.set_ets(handle, 0, 0, 0);
        log::debug!("set_ets(off) = {}", ets_code);
        if code == 0 {
            let fault = self.fault_detail();
            return Err(Error::TriggerConfig(fault));
        }
        Ok(())
    }

    /// Negotiate the block size, oversample ratio and timebase against the
    /// device. Out-of-bounds requests are adjusted, not rejected: a too-small
    /// timebase is raised to the minimum for the enabled channel count, and a
    /// too-large sample count is clamped to the device-reported maximum.
    pub fn set_sampling(&mut self, samples: i32, extra_adc_bits: f64, timebase: i16)
            -> Result<()> {
        let handle = self.require_open()?;
        let oversample = oversample_ratio(extra_adc_bits);
        let enabled_channels = self.channels.iter().filter(|state| state.enabled).count();
        if enabled_channels == 0 {
            return Err(Error::NoChannelsEnabled);
        }
        let min_timebase = min_timebase(enabled_channels);
        let timebase = if timebase < min_timebase {
            log::warn!("timebase {} is too small for {} enabled channels; raising to {}",
                       timebase, enabled_channels, min_timebase);
            min_timebase
        } else {
            timebase
        };
        let (code, timebase_info) =
            self.driver.get_timebase(handle, timebase, samples, oversample);
        log::debug!("get_timebase({}, {}, x{}) = ({}, {:?})",
                    timebase, samples, oversample, code, timebase_info);
        if code == 0 {
            let fault = self.fault_detail();
            return Err(Error::SamplingConfig(fault));
        }
        let resolved = if timebase_info.max_samples < samples {
            log::warn!("device holds at most {} samples per block at timebase {}; \
                        clamping the requested {}",
                       timebase_info.max_samples, timebase, samples);
            timebase_info.max_samples
        } else {
            samples
        };
        self.oversample = oversample;
        self.samples = resolved;
        self.timebase = timebase;
        self.timebase_info = timebase_info;
        Ok(())
    }

    /// Run one block capture end to end and average it per enabled channel.
    ///
    /// A failed liveness check aborts only this call; the session and its
    /// configuration stay valid for a retry once the device returns.
    pub fn acquire(&mut self) -> Result<Acquisition> {
        let handle = self.require_open()?;
        if self.driver.ping_unit(handle) == 0 {
            let fault = self.fault_detail();
            return Err(Error::Disconnected(fault));
        }
        let (code, estimated_ms) =
            self.driver.run_block(handle, self.samples, self.timebase, self.oversample);
        log::debug!("run_block({}, {}, x{}) = ({}, {} ms)",
                    self.samples, self.timebase, self.oversample, code, estimated_ms);
        if code == 0 {
            let fault = self.fault_detail();
            return Err(Error::CaptureStart(fault));
        }
        let estimated = Duration::from_millis(estimated_ms.max(0) as u64);
        let ready_wait = self.ready_wait;
        let completed = {
            let driver = &mut self.driver;
            ready_wait.block(estimated, || driver.is_ready(handle))
        };
        if !completed {
            self.driver.stop(handle);
            return Err(Error::ReadyTimeout);
        }

        let samples = self.samples;
        let mut storage: [Option<Vec<i16>>; 4] = [None, None, None, None];
        for (slot, state) in storage.iter_mut().zip(self.channels.iter()) {
            if state.enabled {
                *slot = Some(vec![0i16; samples as usize]);
            }
        }
        let buffers = storage.each_mut()
            .map(|slot| slot.as_mut().map(|buffer| buffer.as_mut_slice()));
        let (overflow_bits, returned) = self.driver.get_values(handle, buffers, samples);
        log::debug!("get_values({}) = ({} samples, overflow {:#06b})",
                    samples, returned, overflow_bits);
        let stop_code = self.driver.stop(handle);
        if stop_code == 0 {
            // The data is already on the host; a failed stop is reported,
            // not fatal.
            log::warn!("failed to stop block capture ({:?})", self.fault_detail());
        }
        if returned <= 0 {
            let fault = self.fault_detail();
            return Err(Error::AcquisitionRead(fault));
        }

        let mut acquisition = Acquisition {
            readings: [None; 4],
            overflow: Overflow::from_bits_truncate(overflow_bits),
        };
        for (index, slot) in storage.iter().enumerate() {
            let Some(buffer) = slot else { continue };
            let window = &buffer[..(returned as usize).min(buffer.len())];
            acquisition.readings[index] =
                Some(average_reading(window, self.channels[index].range));
        }
        for channel in Channel::ALL {
            if self.channels[channel.index()].enabled && acquisition.overflowed(channel) {
                log::warn!("overflow on channel {}", channel);
            }
        }
        Ok(acquisition)
    }
}

impl<D: Driver> Drop for Device<D> {
    fn drop(&mut self) {
        self.close();
    }
}

fn average_reading(codes: &[i16], range: Range) -> ChannelReading {
    if codes.is_empty() {
        return ChannelReading::ReadError;
    }
    let total: i64 = codes.iter().map(|&code| i64::from(code)).sum();
    let mean = total as f64 / codes.len() as f64;
    ChannelReading::Volts(params::adc_to_millivolts(mean, range) / 1000.0)
}

// Ratio between the oversampling interval and the sampling interval; each
// extra bit of ADC resolution quadruples it.
fn oversample_ratio(extra_adc_bits: f64) -> i16 {
    4f64.powf(extra_adc_bits).round() as i16
}

// The fastest timebase serves a single channel; every doubling of the
// enabled channel count halves the available rate.
fn min_timebase(enabled_channels: usize) -> i16 {
    (enabled_channels as f64).log2().ceil() as i16
}
