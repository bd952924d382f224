use super::{Driver, InfoKind, TimebaseInfo};

/// Stand-in for builds without the `hardware` feature, where the vendor
/// binary is not linked in.
#[derive(Debug, Default)]
pub struct Ps2000Driver;

impl Ps2000Driver {
    pub fn new() -> Ps2000Driver {
        Ps2000Driver
    }
}

impl Driver for Ps2000Driver {
    fn apply_startup_fix(&mut self, _magic1: i32, _magic2: i32) {
        unimplemented!()
    }

    fn open_unit(&mut self) -> i16 {
        unimplemented!()
    }

    fn close_unit(&mut self, _handle: i16) -> i16 {
        unimplemented!()
    }

    fn unit_info(&mut self, _handle: i16, _buffer: &mut [u8], _kind: InfoKind) -> i16 {
        unimplemented!()
    }

    fn set_channel(&mut self, _handle: i16, _channel: i16, _enabled: bool, _coupling: i16,
                   _range: i16) -> i16 {
        unimplemented!()
    }

    fn set_trigger(&mut self, _handle: i16, _source: i16, _threshold: i16, _edge: i16,
                   _delay_percent: i16, _timeout_ms: i16) -> i16 {
        unimplemented!()
    }

    fn set_ets(&mut self, _handle: i16, _mode: i16, _cycles: i16, _interleave: i16) -> i32 {
        unimplemented!()
    }

    fn get_timebase(&mut self, _handle: i16, _timebase: i16, _samples: i32, _oversample: i16)
            -> (i16, TimebaseInfo) {
        unimplemented!()
    }

    fn ping_unit(&mut self, _handle: i16) -> i16 {
        unimplemented!()
    }

    fn run_block(&mut self, _handle: i16, _samples: i32, _timebase: i16, _oversample: i16)
            -> (i16, i32) {
        unimplemented!()
    }

    fn is_ready(&mut self, _handle: i16) -> bool {
        unimplemented!()
    }

    fn get_values(&mut self, _handle: i16, _buffers: [Option<&mut [i16]>; 4], _samples: i32)
            -> (u16, i32) {
        unimplemented!()
    }

    fn stop(&mut self, _handle: i16) -> i16 {
        unimplemented!()
    }
}
