//! Circular progress dial geometry.
//!
//! The dial is drawn as a circle of radius 65 whose stroke is dashed at
//! the progress fraction: the filled arc length is `fraction * 2πr`.

/// Radius of the progress dial, in user units.
pub const DIAL_RADIUS: f64 = 65.0;

/// Stroke dash lengths `(filled, gap)` for a progress fraction on a
/// circle of the given radius. The fraction is clamped to 0..=1.
pub fn dash_array(fraction: f64, radius: f64) -> (f64, f64) {
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let dash = fraction.clamp(0.0, 1.0) * circumference;
    (dash, circumference - dash)
}

/// Format a second count as zero-padded `MM:SS`.
pub fn format_mmss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_array_endpoints() {
        let circumference = 2.0 * std::f64::consts::PI * DIAL_RADIUS;
        let (dash, gap) = dash_array(0.0, DIAL_RADIUS);
        assert_eq!(dash, 0.0);
        assert!((gap - circumference).abs() < 1e-9);

        let (dash, gap) = dash_array(1.0, DIAL_RADIUS);
        assert!((dash - circumference).abs() < 1e-9);
        assert!(gap.abs() < 1e-9);
    }

    #[test]
    fn dash_array_half() {
        let (dash, gap) = dash_array(0.5, DIAL_RADIUS);
        assert!((dash - gap).abs() < 1e-9);
        assert!((dash - std::f64::consts::PI * DIAL_RADIUS).abs() < 1e-9);
    }

    #[test]
    fn dash_array_clamps_out_of_range_fractions() {
        let circumference = 2.0 * std::f64::consts::PI * DIAL_RADIUS;
        assert_eq!(dash_array(-0.5, DIAL_RADIUS).0, 0.0);
        let (dash, _) = dash_array(1.5, DIAL_RADIUS);
        assert!((dash - circumference).abs() < 1e-9);
    }

    #[test]
    fn mmss_is_zero_padded() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(9), "00:09");
        assert_eq!(format_mmss(65), "01:05");
        assert_eq!(format_mmss(25 * 60), "25:00");
        assert_eq!(format_mmss(90 * 60), "90:00");
    }
}
