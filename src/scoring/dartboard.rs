//! Pixel coordinate to dart score mapping for a calibrated camera view.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{calibration::DartboardCalibration, dart::Dart};

/// Sector numbers clockwise from 12 o'clock on a standard board.
pub const SECTOR_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];
/// Angular width of one sector.
const SECTOR_SPAN_DEG: f64 = 18.0;

/// Scoring band a point falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Ring {
    /// Off the board.
    Miss,
    /// Either single bed of a sector.
    Single,
    /// Double ring.
    Double,
    /// Treble ring.
    Triple,
    /// Outer bull (25).
    Bull,
    /// Inner bull (50).
    Dbull,
}

/// A classified point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ScoredDart {
    /// Input x in image pixels.
    pub x: f64,
    /// Input y in image pixels.
    pub y: f64,
    /// Dart the point maps to.
    pub dart: Dart,
    /// Points scored.
    pub score: u16,
    /// Band the point landed in.
    pub ring: Ring,
    /// Numbered sector, absent for bulls and misses.
    pub sector: Option<u8>,
    /// Clockwise angle from 12 o'clock after rotation, in `[0, 360)`.
    pub angle_deg: f64,
    /// Distance from the center over the board radius.
    pub radius_ratio: f64,
    /// Detection confidence clamped into `[0, 1]`.
    pub confidence: f64,
}

/// Wrap any angle into `[0, 360)`.
fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Sector number for a clockwise angle measured from 12 o'clock.
pub fn sector_for_angle(angle_from_up_deg: f64) -> u8 {
    let shifted = normalize_deg(angle_from_up_deg + SECTOR_SPAN_DEG / 2.0);
    let index = (shifted / SECTOR_SPAN_DEG) as usize % SECTOR_ORDER.len();
    SECTOR_ORDER[index]
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Classify one image point against a calibration.
pub fn score_point(x: f64, y: f64, calibration: &DartboardCalibration, confidence: f64) -> ScoredDart {
    let dx = x - calibration.center_x();
    let dy = y - calibration.center_y();
    let radius_ratio = dx.hypot(dy) / calibration.radius_px();

    // Image y grows downwards, so flip it to get a counter-clockwise angle from +x,
    // then turn that into a clockwise angle from 12 o'clock.
    let theta = (-dy).atan2(dx).to_degrees();
    let angle_deg = normalize_deg(90.0 - theta + calibration.rotation_deg());

    let rings = calibration.rings();
    let (dart, ring, sector) = if radius_ratio > rings.double_outer {
        (Dart::MISS, Ring::Miss, None)
    } else if radius_ratio <= rings.inner_bull {
        (Dart::DOUBLE_BULL, Ring::Dbull, None)
    } else if radius_ratio <= rings.outer_bull {
        (Dart::SINGLE_BULL, Ring::Bull, None)
    } else {
        let sector = sector_for_angle(angle_deg);
        let (dart, ring) = if radius_ratio >= rings.double_inner {
            (Dart::double(sector), Ring::Double)
        } else if (rings.triple_inner..=rings.triple_outer).contains(&radius_ratio) {
            (Dart::treble(sector), Ring::Triple)
        } else {
            (Dart::single(sector), Ring::Single)
        };
        (dart.unwrap_or(Dart::MISS), ring, Some(sector))
    };

    ScoredDart {
        x,
        y,
        dart,
        score: dart.score(),
        ring,
        sector,
        angle_deg,
        radius_ratio,
        confidence: clamp_confidence(confidence),
    }
}

/// Classify several `(x, y, confidence)` points independently and total their scores.
pub fn score_points(
    points: &[(f64, f64, f64)],
    calibration: &DartboardCalibration,
) -> (Vec<ScoredDart>, u16) {
    let scored: Vec<ScoredDart> = points
        .iter()
        .map(|&(x, y, confidence)| score_point(x, y, calibration, confidence))
        .collect();
    let total = scored.iter().map(|dart| dart.score).sum();
    (scored, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration(rotation_deg: f64) -> DartboardCalibration {
        DartboardCalibration::with_default_rings(0.0, 0.0, 100.0, rotation_deg).unwrap()
    }

    fn triple(scored: &ScoredDart) -> (u8, u8, u16) {
        (scored.dart.value(), scored.dart.multiplier(), scored.score)
    }

    #[test]
    fn center_is_double_bull() {
        let scored = score_point(0.0, 0.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (25, 2, 50));
        assert_eq!(scored.ring, Ring::Dbull);
        assert_eq!(scored.sector, None);

        let scored = score_point(1.0, 1.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (25, 2, 50));
    }

    #[test]
    fn outer_bull() {
        let scored = score_point(0.0, 8.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (25, 1, 25));
        assert_eq!(scored.ring, Ring::Bull);

        let scored = score_point(9.0, 0.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (25, 1, 25));
    }

    #[test]
    fn outer_bull_edge_is_inclusive() {
        let scored = score_point(0.0, 9.4, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (25, 1, 25));
        assert_eq!(scored.ring, Ring::Bull);

        let scored = score_point(0.0, 9.5, &calibration(0.0), 1.0);
        assert_eq!(scored.ring, Ring::Single);
        assert_eq!(scored.sector, Some(3));
    }

    #[test]
    fn double_twenty_at_top() {
        let scored = score_point(0.0, -98.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (20, 2, 40));
        assert_eq!(scored.ring, Ring::Double);
        assert_eq!(scored.sector, Some(20));
    }

    #[test]
    fn double_six_on_the_right() {
        let scored = score_point(98.0, 0.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (6, 2, 12));
        assert!((scored.angle_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn treble_twenty() {
        let scored = score_point(0.0, -60.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (20, 3, 60));
        assert_eq!(scored.ring, Ring::Triple);
    }

    #[test]
    fn single_between_rings() {
        let scored = score_point(0.0, 40.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (3, 1, 3));
        assert_eq!(scored.ring, Ring::Single);
    }

    #[test]
    fn outside_board_is_miss() {
        let scored = score_point(0.0, -120.0, &calibration(0.0), 1.0);
        assert_eq!(triple(&scored), (0, 0, 0));
        assert_eq!(scored.ring, Ring::Miss);
        assert!(scored.radius_ratio > 1.0);
    }

    #[test]
    fn rotation_shifts_sectors_clockwise() {
        let scored = score_point(0.0, -98.0, &calibration(90.0), 1.0);
        assert_eq!(scored.dart.value(), 6);
        let scored = score_point(0.0, -98.0, &calibration(-18.0), 1.0);
        assert_eq!(scored.dart.value(), 5);
    }

    #[test]
    fn sector_boundaries() {
        assert_eq!(sector_for_angle(0.0), 20);
        assert_eq!(sector_for_angle(8.9), 20);
        assert_eq!(sector_for_angle(9.0), 1);
        assert_eq!(sector_for_angle(351.0), 20);
        assert_eq!(sector_for_angle(350.9), 5);
        assert_eq!(sector_for_angle(-90.0), 11);
        assert_eq!(sector_for_angle(180.0), 3);
        assert_eq!(sector_for_angle(720.0), 20);
    }

    #[test]
    fn confidence_is_clamped() {
        let cal = calibration(0.0);
        assert_eq!(score_point(0.0, 0.0, &cal, 1.7).confidence, 1.0);
        assert_eq!(score_point(0.0, 0.0, &cal, -0.2).confidence, 0.0);
        assert_eq!(score_point(0.0, 0.0, &cal, f64::NAN).confidence, 0.0);
        assert_eq!(score_point(0.0, 0.0, &cal, 0.42).confidence, 0.42);
    }

    #[test]
    fn batch_scores_sum() {
        let cal = DartboardCalibration::with_default_rings(200.0, 150.0, 100.0, 0.0).unwrap();
        let (scored, total) = score_points(
            &[(200.0, 90.0, 0.9), (200.0, 52.0, 0.8), (500.0, 500.0, 0.1)],
            &cal,
        );
        assert_eq!(scored.len(), 3);
        assert_eq!(triple(&scored[0]), (20, 3, 60));
        assert_eq!(triple(&scored[1]), (20, 2, 40));
        assert_eq!(triple(&scored[2]), (0, 0, 0));
        assert_eq!(total, 100);
    }
}
