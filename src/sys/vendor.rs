use core::ptr;
use libc::c_char;

use super::{Driver, InfoKind, TimebaseInfo};

#[link(name = "ps2000")]
extern "C" {
    fn ps2000_apply_fix(value: i32, fix: i32) -> i16;
    fn ps2000_open_unit() -> i16;
    fn ps2000_close_unit(handle: i16) -> i16;
    fn ps2000_get_unit_info(handle: i16, string: *mut c_char, string_length: i16,
                            line: i16) -> i16;
    fn ps2000_set_channel(handle: i16, channel: i16, enabled: i16, dc: i16,
                          range: i16) -> i16;
    fn ps2000_set_trigger(handle: i16, source: i16, threshold: i16, direction: i16,
                          delay: i16, auto_trigger_ms: i16) -> i16;
    fn ps2000_set_ets(handle: i16, mode: i16, ets_cycles: i16, ets_interleave: i16) -> i32;
    fn ps2000_get_timebase(handle: i16, timebase: i16, no_of_samples: i32,
                           time_interval: *mut i32, time_units: *mut i16, oversample: i16,
                           max_samples: *mut i32) -> i16;
    fn ps2000PingUnit(handle: i16) -> i16;
    fn ps2000_run_block(handle: i16, no_of_values: i32, timebase: i16, oversample: i16,
                        time_indisposed_ms: *mut i32) -> i16;
    fn ps2000_ready(handle: i16) -> i16;
    fn ps2000_get_values(handle: i16, buffer_a: *mut i16, buffer_b: *mut i16,
                         buffer_c: *mut i16, buffer_d: *mut i16, overflow: *mut i16,
                         no_of_values: i32) -> i32;
    fn ps2000_stop(handle: i16) -> i16;
}

#[derive(Debug, Default)]
pub struct Ps2000Driver;

impl Ps2000Driver {
    pub fn new() -> Ps2000Driver {
        Ps2000Driver
    }
}

impl Driver for Ps2000Driver {
    fn apply_startup_fix(&mut self, magic1: i32, magic2: i32) {
        // SAFETY: only toggles state internal to the vendor binary.
        unsafe { ps2000_apply_fix(magic1, magic2); }
    }

    fn open_unit(&mut self) -> i16 {
        unsafe { ps2000_open_unit() }
    }

    fn close_unit(&mut self, handle: i16) -> i16 {
        unsafe { ps2000_close_unit(handle) }
    }

    fn unit_info(&mut self, handle: i16, buffer: &mut [u8], kind: InfoKind) -> i16 {
        // SAFETY: the driver writes at most `string_length` bytes into the buffer.
        unsafe {
            ps2000_get_unit_info(handle, buffer.as_mut_ptr() as *mut c_char,
                                 buffer.len() as i16, kind.code())
        }
    }

    fn set_channel(&mut self, handle: i16, channel: i16, enabled: bool, coupling: i16,
                   range: i16) -> i16 {
        unsafe { ps2000_set_channel(handle, channel, enabled as i16, coupling, range) }
    }

    fn set_trigger(&mut self, handle: i16, source: i16, threshold: i16, edge: i16,
                   delay_percent: i16, timeout_ms: i16) -> i16 {
        unsafe { ps2000_set_trigger(handle, source, threshold, edge, delay_percent, timeout_ms) }
    }

    fn set_ets(&mut self, handle: i16, mode: i16, cycles: i16, interleave: i16) -> i32 {
        unsafe { ps2000_set_ets(handle, mode, cycles, interleave) }
    }

    fn get_timebase(&mut self, handle: i16, timebase: i16, samples: i32, oversample: i16)
            -> (i16, TimebaseInfo) {
        let mut info = TimebaseInfo::default();
        let code = unsafe {
            ps2000_get_timebase(handle, timebase, samples, &mut info.interval_ns,
                                &mut info.time_units, oversample, &mut info.max_samples)
        };
        (code, info)
    }

    fn ping_unit(&mut self, handle: i16) -> i16 {
        unsafe { ps2000PingUnit(handle) }
    }

    fn run_block(&mut self, handle: i16, samples: i32, timebase: i16, oversample: i16)
            -> (i16, i32) {
        let mut estimated_ms = 0i32;
        let code = unsafe {
            ps2000_run_block(handle, samples, timebase, oversample, &mut estimated_ms)
        };
        (code, estimated_ms)
    }

    fn is_ready(&mut self, handle: i16) -> bool {
        unsafe { ps2000_ready(handle) != 0 }
    }

    fn get_values(&mut self, handle: i16, mut buffers: [Option<&mut [i16]>; 4], samples: i32)
            -> (u16, i32) {
        let mut ptrs = [ptr::null_mut::<i16>(); 4];
        for (ptr, buffer) in ptrs.iter_mut().zip(buffers.iter_mut()) {
            if let Some(buffer) = buffer {
                debug_assert!(buffer.len() >= samples as usize);
                *ptr = buffer.as_mut_ptr();
            }
        }
        let mut overflow = 0i16;
        // SAFETY: every non-null pointer refers to a live buffer of at least
        // `samples` entries, checked above.
        let returned = unsafe {
            ps2000_get_values(handle, ptrs[0], ptrs[1], ptrs[2], ptrs[3], &mut overflow, samples)
        };
        (overflow as u16, returned)
    }

    fn stop(&mut self, handle: i16) -> i16 {
        unsafe { ps2000_stop(handle) }
    }
}
