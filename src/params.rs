/// Largest raw code the ADC reports at positive full scale.
pub const MAX_ADC_VALUE: i16 = 32767;

/// Input voltage range the device resolves; determines the ADC-to-voltage
/// scale for every conversion on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Range {
    Mv10,
    Mv20,
    Mv50,
    Mv100,
    Mv200,
    Mv500,
    V1,
    V2,
    V5,
    V10,
    V20,
    V50,
    /// Sentinel selected when the expected voltage exceeds every calibrated
    /// range; also the reset state of every channel.
    #[default]
    Max,
}

const RANGE_TABLE: [(f32, Range); 12] = [
    ( 0.010, Range::Mv10),
    ( 0.020, Range::Mv20),
    ( 0.050, Range::Mv50),
    ( 0.100, Range::Mv100),
    ( 0.200, Range::Mv200),
    ( 0.500, Range::Mv500),
    ( 1.0,   Range::V1),
    ( 2.0,   Range::V2),
    ( 5.0,   Range::V5),
    (10.0,   Range::V10),
    (20.0,   Range::V20),
    (50.0,   Range::V50),
];

impl Range {
    /// Select the narrowest range whose full scale still covers `volts`.
    /// Values above the widest calibrated range select `Range::Max`.
    pub fn from_max_volts(volts: f32) -> Range {
        for &(bound, range) in RANGE_TABLE.iter() {
            if volts <= bound {
                return range;
            }
        }
        Range::Max
    }

    /// Full scale of this range in millivolts. The sentinel converts with
    /// the widest calibrated span.
    pub fn full_scale_millivolts(self) -> i32 {
        match self {
            Range::Mv10  => 10,
            Range::Mv20  => 20,
            Range::Mv50  => 50,
            Range::Mv100 => 100,
            Range::Mv200 => 200,
            Range::Mv500 => 500,
            Range::V1    => 1_000,
            Range::V2    => 2_000,
            Range::V5    => 5_000,
            Range::V10   => 10_000,
            Range::V20   => 20_000,
            Range::V50 | Range::Max => 50_000,
        }
    }

    pub(crate) fn code(self) -> i16 {
        self as i16
    }
}

/// Convert a raw ADC code (or an average of codes) to millivolts.
pub fn adc_to_millivolts(code: f64, range: Range) -> f64 {
    code * range.full_scale_millivolts() as f64 / MAX_ADC_VALUE as f64
}

/// Convert millivolts to the nearest raw ADC code. Inputs beyond the range's
/// full scale are not clamped; passing them is a caller error.
pub fn millivolts_to_adc(millivolts: f64, range: Range) -> i16 {
    (millivolts * MAX_ADC_VALUE as f64 / range.full_scale_millivolts() as f64).round() as i16
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bucket_interiors() {
        assert_eq!(Range::from_max_volts(0.005), Range::Mv10);
        assert_eq!(Range::from_max_volts(0.015), Range::Mv20);
        assert_eq!(Range::from_max_volts(0.3),   Range::Mv500);
        assert_eq!(Range::from_max_volts(0.7),   Range::V1);
        assert_eq!(Range::from_max_volts(6.0),   Range::V10);
        assert_eq!(Range::from_max_volts(30.0),  Range::V50);
    }

    #[test]
    fn test_bucket_boundaries_select_lower_bucket() {
        assert_eq!(Range::from_max_volts(0.010), Range::Mv10);
        assert_eq!(Range::from_max_volts(0.020), Range::Mv20);
        assert_eq!(Range::from_max_volts(1.0),   Range::V1);
        assert_eq!(Range::from_max_volts(20.0),  Range::V20);
        assert_eq!(Range::from_max_volts(50.0),  Range::V50);
    }

    #[test]
    fn test_above_top_bucket_is_sentinel() {
        assert_eq!(Range::from_max_volts(50.1),   Range::Max);
        assert_eq!(Range::from_max_volts(1000.0), Range::Max);
    }

    #[test]
    fn test_driver_codes() {
        assert_eq!(Range::Mv10.code(), 0);
        assert_eq!(Range::V1.code(),   6);
        assert_eq!(Range::V50.code(),  11);
        assert_eq!(Range::Max.code(),  12);
    }

    #[test]
    fn test_round_trip_within_one_code() {
        for &(bound, range) in RANGE_TABLE.iter() {
            let full_scale = bound as f64 * 1000.0;
            let lsb = full_scale / MAX_ADC_VALUE as f64;
            for millivolts in [-full_scale, -full_scale / 3.0, 0.0, full_scale / 2.0, full_scale] {
                let code = millivolts_to_adc(millivolts, range);
                let back = adc_to_millivolts(code as f64, range);
                assert!((back - millivolts).abs() <= lsb,
                        "{} mV on {:?} came back as {} mV", millivolts, range, back);
            }
        }
    }

    #[test]
    fn test_full_scale_maps_to_max_code() {
        assert_eq!(millivolts_to_adc(10_000.0, Range::V10), MAX_ADC_VALUE);
        assert_eq!(adc_to_millivolts(MAX_ADC_VALUE as f64, Range::V10), 10_000.0);
        assert_eq!(millivolts_to_adc(-10_000.0, Range::V10), -MAX_ADC_VALUE);
    }

    #[test]
    fn test_sentinel_converts_with_widest_span() {
        assert_eq!(millivolts_to_adc(1000.0, Range::Max),
                   millivolts_to_adc(1000.0, Range::V50));
    }
}
