//! Per-camera dartboard calibration and the in-memory table holding it.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use utoipa::ToSchema;

/// Reasons a calibration is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number (got {value})")]
    NotFinite {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Board radius is zero or negative.
    #[error("radius_px must be > 0 (got {0})")]
    NonPositiveRadius(f64),
    /// A ring ratio is zero or negative.
    #[error("ring ratio {field} must be > 0 (got {value})")]
    NonPositiveRatio {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Ring ratios are out of order.
    #[error(
        "ring ratios must be strictly increasing (double_outer may equal double_inner): {0:?}"
    )]
    NotIncreasing(RingRatios),
}

/// Ring radii as fractions of the outer edge of the double ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RingRatios {
    /// Outer edge of the inner bull (50).
    pub inner_bull: f64,
    /// Outer edge of the outer bull (25).
    pub outer_bull: f64,
    /// Inner edge of the treble ring.
    pub triple_inner: f64,
    /// Outer edge of the treble ring.
    pub triple_outer: f64,
    /// Inner edge of the double ring.
    pub double_inner: f64,
    /// Outer edge of the double ring; anything beyond is off the board.
    pub double_outer: f64,
}

impl Default for RingRatios {
    /// Approximate WDF board proportions.
    fn default() -> Self {
        Self {
            inner_bull: 0.037,
            outer_bull: 0.094,
            triple_inner: 0.582,
            triple_outer: 0.629,
            double_inner: 0.953,
            double_outer: 1.0,
        }
    }
}

impl RingRatios {
    /// Check that every ratio is finite, positive and that the rings nest in board order.
    pub fn validated(self) -> Result<Self, CalibrationError> {
        let fields = [
            ("inner_bull", self.inner_bull),
            ("outer_bull", self.outer_bull),
            ("triple_inner", self.triple_inner),
            ("triple_outer", self.triple_outer),
            ("double_inner", self.double_inner),
            ("double_outer", self.double_outer),
        ];
        for (field, value) in fields {
            ensure_finite(field, value)?;
            if value <= 0.0 {
                return Err(CalibrationError::NonPositiveRatio { field, value });
            }
        }

        let increasing = self.inner_bull < self.outer_bull
            && self.outer_bull < self.triple_inner
            && self.triple_inner < self.triple_outer
            && self.triple_outer < self.double_inner
            && self.double_inner <= self.double_outer;
        if !increasing {
            return Err(CalibrationError::NotIncreasing(self));
        }
        Ok(self)
    }
}

/// Pixel-space calibration of one camera's view of the board.
///
/// Image coordinates grow right and down. A rotation of 0 puts the 20 at 12 o'clock;
/// positive values rotate the sector layout clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct DartboardCalibration {
    center_x: f64,
    center_y: f64,
    radius_px: f64,
    rotation_deg: f64,
    rings: RingRatios,
}

impl DartboardCalibration {
    /// Build a calibration, rejecting non-finite numbers, a non-positive radius or
    /// badly ordered rings.
    pub fn new(
        center_x: f64,
        center_y: f64,
        radius_px: f64,
        rotation_deg: f64,
        rings: RingRatios,
    ) -> Result<Self, CalibrationError> {
        ensure_finite("center_x", center_x)?;
        ensure_finite("center_y", center_y)?;
        ensure_finite("radius_px", radius_px)?;
        ensure_finite("rotation_deg", rotation_deg)?;
        if radius_px <= 0.0 {
            return Err(CalibrationError::NonPositiveRadius(radius_px));
        }
        let rings = rings.validated()?;
        Ok(Self {
            center_x,
            center_y,
            radius_px,
            rotation_deg,
            rings,
        })
    }

    /// Calibration with the default ring proportions.
    pub fn with_default_rings(
        center_x: f64,
        center_y: f64,
        radius_px: f64,
        rotation_deg: f64,
    ) -> Result<Self, CalibrationError> {
        Self::new(
            center_x,
            center_y,
            radius_px,
            rotation_deg,
            RingRatios::default(),
        )
    }

    /// Board center x in pixels.
    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    /// Board center y in pixels.
    pub fn center_y(&self) -> f64 {
        self.center_y
    }

    /// Outer edge of the double ring, in pixels.
    pub fn radius_px(&self) -> f64 {
        self.radius_px
    }

    /// Clockwise sector rotation in degrees.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// Ring proportions relative to the radius.
    pub fn rings(&self) -> &RingRatios {
        &self.rings
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), CalibrationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalibrationError::NotFinite { field, value })
    }
}

/// Calibrations keyed by camera identifier.
#[derive(Debug, Default)]
pub struct CalibrationStore {
    calibrations: DashMap<String, DartboardCalibration>,
}

impl CalibrationStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibration currently stored for `camera_id`.
    pub fn get(&self, camera_id: &str) -> Option<DartboardCalibration> {
        self.calibrations.get(camera_id).map(|entry| *entry)
    }

    /// Store a calibration, returning the one it replaced.
    pub fn set(
        &self,
        camera_id: impl Into<String>,
        calibration: DartboardCalibration,
    ) -> Option<DartboardCalibration> {
        let camera_id = camera_id.into();
        info!(
            camera_id = %camera_id,
            center_x = calibration.center_x,
            center_y = calibration.center_y,
            radius_px = calibration.radius_px,
            rotation_deg = calibration.rotation_deg,
            "storing dartboard calibration"
        );
        self.calibrations.insert(camera_id, calibration)
    }

    /// Forget the calibration for `camera_id`.
    pub fn remove(&self, camera_id: &str) -> Option<DartboardCalibration> {
        self.calibrations
            .remove(camera_id)
            .map(|(_, calibration)| calibration)
    }

    /// Number of calibrated cameras.
    pub fn len(&self) -> usize {
        self.calibrations.len()
    }

    /// True when no camera is calibrated.
    pub fn is_empty(&self) -> bool {
        self.calibrations.is_empty()
    }
}
