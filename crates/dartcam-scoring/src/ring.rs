//! Ring and dart model, and the one place where dart payloads are validated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of numbered sectors on the board.
pub const SECTOR_COUNT: u8 = 20;
/// Sector number used by payloads to denote the bull.
pub const BULL_SECTOR: u8 = 25;

/// Errors produced while normalizing a dart payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DartInputError {
    #[error("unknown ring name {0:?}")]
    UnknownRing(String),

    #[error("cannot determine the ring of the dart")]
    MissingRing,

    #[error("ring {0} needs a sector")]
    MissingSector(Ring),

    #[error("sector {0} out of range (expected 1-20 or 25)")]
    SectorOutOfRange(i64),

    #[error("value {0} out of range (expected 0-60)")]
    ValueOutOfRange(i64),

    #[error("multiplier {0} out of range (expected 0-3)")]
    MultiplierOutOfRange(i64),

    #[error("inconsistent dart: {0}")]
    Inconsistent(String),
}

/// Scoring area a dart landed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ring {
    Miss,
    Single,
    Double,
    Triple,
    /// Outer bull, 25.
    Bull,
    /// Inner bull (bullseye), 50. Counts as a double.
    InnerBull,
}

impl Ring {
    pub fn multiplier(self) -> u8 {
        match self {
            Ring::Miss => 0,
            Ring::Single | Ring::Bull => 1,
            Ring::Double | Ring::InnerBull => 2,
            Ring::Triple => 3,
        }
    }

    /// Whether a dart in this ring can open (double-in) or finish (double-out).
    pub fn is_double_like(self) -> bool {
        matches!(self, Ring::Double | Ring::InnerBull)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ring::Miss => "MISS",
            Ring::Single => "SINGLE",
            Ring::Double => "DOUBLE",
            Ring::Triple => "TRIPLE",
            Ring::Bull => "BULL",
            Ring::InnerBull => "INNER_BULL",
        }
    }

    /// Case-insensitive parse accepting the usual shorthands.
    pub fn parse(name: &str) -> Option<Ring> {
        let key: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        let ring = match key.as_str() {
            "MISS" | "M" | "OUT" | "NONE" => Ring::Miss,
            "SINGLE" | "S" | "SGL" => Ring::Single,
            "DOUBLE" | "D" | "DBL" => Ring::Double,
            "TRIPLE" | "T" | "TREBLE" | "TRP" => Ring::Triple,
            "BULL" | "SB" | "OUTER_BULL" | "SINGLE_BULL" | "25" => Ring::Bull,
            "INNER_BULL" | "DB" | "DOUBLE_BULL" | "BULLSEYE" | "BULLS_EYE" | "DBULL" | "50" => {
                Ring::InnerBull
            }
            _ => return None,
        };
        Some(ring)
    }

    fn segment(multiplier: u8) -> Option<Ring> {
        match multiplier {
            1 => Some(Ring::Single),
            2 => Some(Ring::Double),
            3 => Some(Ring::Triple),
            _ => None,
        }
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ring {
    type Err = DartInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ring::parse(s).ok_or_else(|| DartInputError::UnknownRing(s.to_owned()))
    }
}

/// One validated dart.
///
/// Only built through the constructors below or [`normalize_dart`], so the
/// value always agrees with ring and sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDart", into = "RawDart")]
pub struct Dart {
    value: u8,
    ring: Ring,
    sector: Option<u8>,
    multiplier: Option<u8>,
}

impl Dart {
    pub fn miss() -> Self {
        Self {
            value: 0,
            ring: Ring::Miss,
            sector: None,
            multiplier: Some(0),
        }
    }

    pub fn bull() -> Self {
        Self {
            value: 25,
            ring: Ring::Bull,
            sector: None,
            multiplier: Some(1),
        }
    }

    pub fn inner_bull() -> Self {
        Self {
            value: 50,
            ring: Ring::InnerBull,
            sector: None,
            multiplier: Some(2),
        }
    }

    pub fn single(sector: u8) -> Result<Self, DartInputError> {
        Self::new(Ring::Single, Some(sector))
    }

    pub fn double(sector: u8) -> Result<Self, DartInputError> {
        Self::new(Ring::Double, Some(sector))
    }

    pub fn triple(sector: u8) -> Result<Self, DartInputError> {
        Self::new(Ring::Triple, Some(sector))
    }

    /// Build a dart from ring and sector. Numbered rings need a sector in
    /// 1..=20; miss and bull rings ignore it.
    pub fn new(ring: Ring, sector: Option<u8>) -> Result<Self, DartInputError> {
        match ring {
            Ring::Miss => Ok(Self::miss()),
            Ring::Bull => Ok(Self::bull()),
            Ring::InnerBull => Ok(Self::inner_bull()),
            Ring::Single | Ring::Double | Ring::Triple => {
                let sector = sector.ok_or(DartInputError::MissingSector(ring))?;
                if !(1..=SECTOR_COUNT).contains(&sector) {
                    return Err(DartInputError::SectorOutOfRange(sector as i64));
                }
                let multiplier = ring.multiplier();
                Ok(Self {
                    value: sector * multiplier,
                    ring,
                    sector: Some(sector),
                    multiplier: Some(multiplier),
                })
            }
        }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value as u32
    }

    #[inline]
    pub fn ring(&self) -> Ring {
        self.ring
    }

    #[inline]
    pub fn sector(&self) -> Option<u8> {
        self.sector
    }

    #[inline]
    pub fn multiplier(&self) -> Option<u8> {
        self.multiplier
    }

    #[inline]
    pub fn is_double_like(&self) -> bool {
        self.ring.is_double_like()
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ring, self.sector) {
            (Ring::Single, Some(s)) => write!(f, "S{s}"),
            (Ring::Double, Some(s)) => write!(f, "D{s}"),
            (Ring::Triple, Some(s)) => write!(f, "T{s}"),
            (Ring::Bull, _) => f.write_str("BULL"),
            (Ring::InnerBull, _) => f.write_str("DBULL"),
            _ => f.write_str("MISS"),
        }
    }
}

/// Unvalidated dart payload as it arrives from detection, manual entry or
/// a relay. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<i64>,
}

impl From<Dart> for RawDart {
    fn from(d: Dart) -> Self {
        Self {
            value: Some(d.value as i64),
            ring: Some(d.ring.as_str().to_owned()),
            sector: d.sector.map(i64::from),
            multiplier: d.multiplier.map(i64::from),
        }
    }
}

impl TryFrom<RawDart> for Dart {
    type Error = DartInputError;

    fn try_from(raw: RawDart) -> Result<Self, Self::Error> {
        normalize_dart(&raw)
    }
}

/// Convert any dart payload into a validated [`Dart`].
///
/// A missing ring is inferred from sector and multiplier (or from the value
/// for miss and bull); a missing value is derived from ring and sector.
/// Fields that are present must agree with each other.
pub fn normalize_dart(raw: &RawDart) -> Result<Dart, DartInputError> {
    let ring = match raw.ring.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.parse::<Ring>()?),
        _ => None,
    };
    let sector = raw
        .sector
        .map(|s| match s {
            1..=20 | 25 => Ok(s as u8),
            _ => Err(DartInputError::SectorOutOfRange(s)),
        })
        .transpose()?;
    let multiplier = raw
        .multiplier
        .map(|m| match m {
            0..=3 => Ok(m as u8),
            _ => Err(DartInputError::MultiplierOutOfRange(m)),
        })
        .transpose()?;
    let value = raw
        .value
        .map(|v| match v {
            0..=60 => Ok(v as u8),
            _ => Err(DartInputError::ValueOutOfRange(v)),
        })
        .transpose()?;

    let ring = match ring {
        Some(r) => r,
        None => infer_ring(value, sector, multiplier)?,
    };

    let dart = match ring {
        Ring::Miss | Ring::Bull | Ring::InnerBull => {
            if let Some(s) = sector {
                if ring != Ring::Miss && s != BULL_SECTOR {
                    return Err(DartInputError::Inconsistent(format!(
                        "{ring} with sector {s}"
                    )));
                }
            }
            Dart::new(ring, None)?
        }
        Ring::Single | Ring::Double | Ring::Triple => {
            let m = ring.multiplier();
            let sector = match (sector, value) {
                (Some(s), _) => s,
                (None, Some(v)) if v % m == 0 => v / m,
                (None, Some(v)) => {
                    return Err(DartInputError::Inconsistent(format!(
                        "value {v} is not a {ring} score"
                    )))
                }
                (None, None) => return Err(DartInputError::MissingSector(ring)),
            };
            Dart::new(ring, Some(sector))?
        }
    };

    if let Some(v) = value {
        if v != dart.value {
            return Err(DartInputError::Inconsistent(format!(
                "value {v} does not match {dart} ({})",
                dart.value
            )));
        }
    }
    if let Some(m) = multiplier {
        if m != ring.multiplier() {
            return Err(DartInputError::Inconsistent(format!(
                "multiplier {m} does not match ring {ring}"
            )));
        }
    }
    Ok(dart)
}

fn infer_ring(
    value: Option<u8>,
    sector: Option<u8>,
    multiplier: Option<u8>,
) -> Result<Ring, DartInputError> {
    if sector == Some(BULL_SECTOR) {
        return match (multiplier, value) {
            (Some(0), _) => Ok(Ring::Miss),
            (Some(2), _) | (None, Some(50)) => Ok(Ring::InnerBull),
            (Some(1), _) | (None, _) => Ok(Ring::Bull),
            (Some(m), _) => Err(DartInputError::Inconsistent(format!(
                "bull with multiplier {m}"
            ))),
        };
    }
    match (multiplier, sector, value) {
        (Some(0), _, _) => Ok(Ring::Miss),
        (Some(m), Some(_), _) | (Some(m), None, Some(_)) => {
            Ring::segment(m).ok_or(DartInputError::MissingRing)
        }
        (None, None, Some(0)) => Ok(Ring::Miss),
        (None, None, Some(25)) => Ok(Ring::Bull),
        (None, None, Some(50)) => Ok(Ring::InnerBull),
        (None, Some(s), Some(v)) if v % s == 0 => {
            Ring::segment(v / s).ok_or_else(|| {
                DartInputError::Inconsistent(format!("value {v} with sector {s}"))
            })
        }
        _ => Err(DartInputError::MissingRing),
    }
}
