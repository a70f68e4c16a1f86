//! Unit conversion utilities.
//!
//! DrawingML positions and extents are expressed in English Metric Units
//! (EMU). These helpers convert between EMU and the inch and point values
//! used when laying out slides.

pub const EMUS_PER_INCH: i64 = 914_400;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn emu_to_inches(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_INCH as f64
}

/// Font sizes in DrawingML run properties are hundredths of a point.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_round_trip() {
        assert_eq!(inches_to_emu(1.0), EMUS_PER_INCH);
        assert_eq!(inches_to_emu(0.5), 457_200);
        assert_eq!(inches_to_emu(7.0), 6_400_800);
        assert!((emu_to_inches(inches_to_emu(6.5)) - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_points() {
        assert_eq!(pt_to_centipoints(9.0), 900);
        assert_eq!(pt_to_centipoints(10.5), 1050);
    }
}
