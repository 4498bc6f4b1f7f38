//! Monetary amounts and basis-point fractions.
//!
//! Amounts are represented as fixed-point integers (u128) in the smallest currency unit
//! to avoid floating-point errors. Fractions are basis points (1/100 of a percent).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Basis points denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// A claim amount in the smallest currency unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Scale by a basis-point fraction, rounding down to the smallest unit.
    ///
    /// Split into quotient and remainder so that `raw * bps` never overflows.
    /// The result is never larger than `self`.
    pub fn mul_bps_floor(self, bps: BasisPoints) -> Self {
        let denom = BPS_DENOMINATOR as u128;
        let bps = bps.raw() as u128;
        let whole = (self.0 / denom) * bps;
        let part = (self.0 % denom) * bps / denom;
        Self(whole + part)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fraction in basis points, always within `0..=10_000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct BasisPoints(u16);

impl BasisPoints {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(BPS_DENOMINATOR);

    /// Returns `None` if `raw` exceeds 10_000.
    pub fn new(raw: u16) -> Option<Self> {
        (raw <= BPS_DENOMINATOR).then_some(Self(raw))
    }

    pub fn raw(&self) -> u16 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u16> for BasisPoints {
    type Error = String;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or_else(|| format!("{raw} exceeds {BPS_DENOMINATOR} basis points"))
    }
}

impl From<BasisPoints> for u16 {
    fn from(bps: BasisPoints) -> u16 {
        bps.0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
