//! Time bases and timestamps.
//!
//! Every stream, codec and container counts time in its own units; a
//! [`TimeBase`] names the real-time length of one tick and a
//! [`Timestamp`] is a tick count paired with its base.

use crate::rational::Rational;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The duration in seconds of one timestamp tick.
///
/// Common bases: `1/1000` (milliseconds), `1/90000` (MPEG), and
/// `1/sample_rate` for audio streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBase(Rational);

impl TimeBase {
    /// Millisecond ticks, the default video encoder base.
    pub const MILLIS: Self = Self(Rational::new_raw(1, 1000));

    /// MPEG 90 kHz ticks, used when millisecond granularity cannot
    /// represent the frame interval exactly.
    pub const MPEG: Self = Self(Rational::new_raw(1, 90000));

    pub fn new(num: i64, den: i64) -> Self {
        Self(Rational::new(num, den))
    }

    /// Audio base: one tick per sample.
    pub fn per_sample(sample_rate: u32) -> Self {
        Self::new(1, sample_rate as i64)
    }

    pub fn as_rational(&self) -> Rational {
        self.0
    }

    /// Convert a tick count in this base into another base, truncating.
    pub fn convert(&self, value: i64, target: TimeBase) -> i64 {
        self.0.rescale(value, target.0)
    }

    /// Convert a tick count in this base into another base, rounding
    /// half to even.
    pub fn convert_rounded(&self, value: i64, target: TimeBase) -> i64 {
        self.0.rescale_rounded(value, target.0)
    }

    pub fn to_seconds(&self, value: i64) -> f64 {
        value as f64 * self.0.to_f64()
    }

    /// Tick count closest to `seconds` in this base.
    pub fn from_seconds(&self, seconds: f64) -> i64 {
        (seconds / self.0.to_f64()).round() as i64
    }
}

impl fmt::Display for TimeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Rational> for TimeBase {
    fn from(r: Rational) -> Self {
        Self(r)
    }
}

/// A tick count with its time base. `Timestamp::NONE_VALUE` marks an
/// absent timestamp (a packet without pts, for example).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timestamp {
    pub value: i64,
    pub time_base: TimeBase,
}

impl Timestamp {
    /// Sentinel for "no timestamp".
    pub const NONE_VALUE: i64 = i64::MIN;

    pub fn new(value: i64, time_base: TimeBase) -> Self {
        Self { value, time_base }
    }

    pub fn none() -> Self {
        Self {
            value: Self::NONE_VALUE,
            time_base: TimeBase::MILLIS,
        }
    }

    pub fn is_some(&self) -> bool {
        self.value != Self::NONE_VALUE
    }

    /// Rescale into `target`, rounding half to even. An absent
    /// timestamp stays absent.
    pub fn rescale(&self, target: TimeBase) -> Self {
        if !self.is_some() {
            return Self::none();
        }
        Self {
            value: self.time_base.convert_rounded(self.value, target),
            time_base: target,
        }
    }

    pub fn to_seconds(&self) -> Option<f64> {
        self.is_some().then(|| self.time_base.to_seconds(self.value))
    }

    pub fn from_seconds(seconds: f64, time_base: TimeBase) -> Self {
        Self {
            value: time_base.from_seconds(seconds),
            time_base,
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_some(), other.is_some()) {
            (false, false) => Ordering::Equal,
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => {
                // Compare in the finer of the two bases.
                let tb = if self.time_base.as_rational() < other.time_base.as_rational() {
                    self.time_base
                } else {
                    other.time_base
                };
                self.rescale(tb).value.cmp(&other.rescale(tb).value)
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_seconds() {
            Some(secs) => {
                let h = (secs / 3600.0) as u32;
                let m = ((secs % 3600.0) / 60.0) as u32;
                write!(f, "{:02}:{:02}:{:06.3}", h, m, secs % 60.0)
            }
            None => write!(f, "NONE"),
        }
    }
}
