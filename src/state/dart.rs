//! Dart vocabulary shared by the match engine, the checkout solver and the board mapper.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Face value of the bullseye.
pub const BULL: u8 = 25;
/// Highest numbered sector on the board.
pub const MAX_SECTOR: u8 = 20;
/// Highest total a single visit of three darts can reach (three treble 20s).
pub const MAX_VISIT_TOTAL: u16 = 180;

/// Reasons a `(value, multiplier)` pair is not a dart that can land on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DartError {
    /// Value is neither 0, 1-20 nor 25.
    #[error("dart value {0} is not 0, 1-20 or 25")]
    InvalidValue(i64),
    /// Multiplier is not 0-3.
    #[error("dart multiplier {0} is not 0-3")]
    InvalidMultiplier(i64),
    /// A miss must be (0, 0) on both fields.
    #[error("a miss must have both value and multiplier set to 0 (got {value}x{multiplier})")]
    InconsistentMiss {
        /// Submitted value.
        value: u8,
        /// Submitted multiplier.
        multiplier: u8,
    },
    /// There is no treble ring around the bull.
    #[error("bull cannot be hit as a treble")]
    TrebleBull,
}

/// A single dart hit.
///
/// Only constructible through [`Dart::new`], so every value in circulation satisfies the
/// board invariants: `multiplier == 0` exactly when `value == 0`, and the bull has no treble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawDart")]
pub struct Dart {
    value: u8,
    multiplier: u8,
}

#[derive(Deserialize)]
struct RawDart {
    value: i64,
    multiplier: i64,
}

impl TryFrom<RawDart> for Dart {
    type Error = DartError;

    fn try_from(raw: RawDart) -> Result<Self, Self::Error> {
        Dart::from_raw(raw.value, raw.multiplier)
    }
}

impl Dart {
    /// A dart that missed the scoring area.
    pub const MISS: Dart = Dart {
        value: 0,
        multiplier: 0,
    };
    /// Outer bull (25).
    pub const SINGLE_BULL: Dart = Dart {
        value: BULL,
        multiplier: 1,
    };
    /// Inner bull (50), counts as a double.
    pub const DOUBLE_BULL: Dart = Dart {
        value: BULL,
        multiplier: 2,
    };

    /// Validate and build a dart.
    pub fn new(value: u8, multiplier: u8) -> Result<Self, DartError> {
        if multiplier > 3 {
            return Err(DartError::InvalidMultiplier(multiplier.into()));
        }
        if !(value <= MAX_SECTOR || value == BULL) {
            return Err(DartError::InvalidValue(value.into()));
        }
        if (value == 0) != (multiplier == 0) {
            return Err(DartError::InconsistentMiss { value, multiplier });
        }
        if value == BULL && multiplier == 3 {
            return Err(DartError::TrebleBull);
        }
        Ok(Self { value, multiplier })
    }

    /// Validate a client-supplied pair whose fields may not even fit a `u8`.
    pub fn from_raw(value: i64, multiplier: i64) -> Result<Self, DartError> {
        let multiplier =
            u8::try_from(multiplier).map_err(|_| DartError::InvalidMultiplier(multiplier))?;
        let value = u8::try_from(value).map_err(|_| DartError::InvalidValue(value))?;
        Self::new(value, multiplier)
    }

    /// Single in the given sector (or outer bull).
    pub fn single(value: u8) -> Result<Self, DartError> {
        Self::new(value, 1)
    }

    /// Double in the given sector (or inner bull).
    pub fn double(value: u8) -> Result<Self, DartError> {
        Self::new(value, 2)
    }

    /// Treble in the given sector.
    pub fn treble(value: u8) -> Result<Self, DartError> {
        Self::new(value, 3)
    }

    /// Face value: 0, 1-20 or 25.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// 0 for a miss, otherwise 1-3.
    pub fn multiplier(&self) -> u8 {
        self.multiplier
    }

    /// Points scored by this dart.
    pub fn score(&self) -> u16 {
        u16::from(self.value) * u16::from(self.multiplier)
    }

    /// Doubles and the inner bull can finish a double-out leg.
    pub fn is_double(&self) -> bool {
        self.multiplier == 2
    }

    /// Missed the scoring area.
    pub fn is_miss(&self) -> bool {
        self.multiplier == 0
    }

    /// Either bull.
    pub fn is_bull(&self) -> bool {
        self.value == BULL
    }

    /// Canonical label (`MISS`, `SBULL`, `DBULL`, `S20`, `D16`, `T19`, ...).
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value, self.multiplier) {
            (_, 0) => f.write_str("MISS"),
            (BULL, 1) => f.write_str("SBULL"),
            (BULL, _) => f.write_str("DBULL"),
            (value, 1) => write!(f, "S{value}"),
            (value, 2) => write!(f, "D{value}"),
            (value, _) => write!(f, "T{value}"),
        }
    }
}

/// Every dart that scores points: singles, doubles and trebles of 1-20, then both bulls.
pub fn scoring_darts() -> impl Iterator<Item = Dart> {
    (1..=MAX_SECTOR)
        .flat_map(|value| (1..=3).map(move |multiplier| Dart { value, multiplier }))
        .chain([Dart::SINGLE_BULL, Dart::DOUBLE_BULL])
}
