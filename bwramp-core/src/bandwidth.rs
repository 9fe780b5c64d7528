//! Bandwidth value codec: human strings to bits per second and back.
//!
//! Decoding accepts a bare number (raw bps) or a number followed by one
//! case-insensitive unit letter: `k` (1e3), `m` (1e6), `g` (1e9) or
//! `t` (1e12). Encoding produces the short form iperf3 accepts for `-b`:
//! three decimals plus `G`, `M` or `K`, or a plain integer below 1K.
//!
//! The round trip is lossy to three decimals of the chosen unit. That is
//! fine for choosing probe targets, not for exact accounting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{GIGA, KILO, MEGA, TERA};
use crate::errors::RampError;

/// A non-negative, finite bandwidth in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bandwidth(f64);

impl Bandwidth {
    /// Wrap a raw bits-per-second value.
    ///
    /// Returns `None` for negative, NaN or infinite input.
    pub fn new(bps: f64) -> Option<Self> {
        if bps.is_finite() && bps >= 0.0 {
            Some(Self(bps))
        } else {
            None
        }
    }

    /// Raw bits per second.
    pub fn bps(self) -> f64 {
        self.0
    }

    /// Canonical short string, e.g. `"2.000G"`.
    pub fn encode(self) -> String {
        encode(self.0)
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.0))
    }
}

impl FromStr for Bandwidth {
    type Err = RampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).ok_or_else(|| RampError::InvalidBandwidth(s.to_string()))
    }
}

/// Decode a human-entered bandwidth string.
///
/// Returns `None` for empty input, an unparseable number, or a value that
/// is negative or not finite.
pub fn decode(text: &str) -> Option<Bandwidth> {
    let s = text.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    let (number, multiplier) = match s.char_indices().last() {
        Some((idx, 'k')) => (&s[..idx], KILO),
        Some((idx, 'm')) => (&s[..idx], MEGA),
        Some((idx, 'g')) => (&s[..idx], GIGA),
        Some((idx, 't')) => (&s[..idx], TERA),
        _ => (s.as_str(), 1.0),
    };

    let value: f64 = number.trim().parse().ok()?;
    Bandwidth::new(value * multiplier)
}

/// Encode raw bits per second into the canonical short form.
pub fn encode(bps: f64) -> String {
    if bps >= GIGA {
        format!("{:.3}G", bps / GIGA)
    } else if bps >= MEGA {
        format!("{:.3}M", bps / MEGA)
    } else if bps >= KILO {
        format!("{:.3}K", bps / KILO)
    } else {
        format!("{bps:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bps(text: &str) -> f64 {
        decode(text).unwrap().bps()
    }

    #[test]
    fn decode_unit_suffixes() {
        assert_eq!(bps("500k"), 500e3);
        assert_eq!(bps("500M"), 500e6);
        assert_eq!(bps("2G"), 2e9);
        assert_eq!(bps("1t"), 1e12);
        assert_eq!(bps("1.5g"), 1.5e9);
    }

    #[test]
    fn decode_bare_number_is_raw_bps() {
        assert_eq!(bps("250"), 250.0);
        assert_eq!(bps("1e6"), 1e6);
    }

    #[test]
    fn decode_trims_whitespace() {
        assert_eq!(bps("  2G  "), 2e9);
        assert_eq!(bps("2 g"), 2e9);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("").is_none());
        assert!(decode("   ").is_none());
        assert!(decode("G").is_none());
        assert!(decode("fast").is_none());
        assert!(decode("2x").is_none());
        assert!(decode("2gg").is_none());
    }

    #[test]
    fn decode_rejects_negative_and_non_finite() {
        assert!(decode("-5M").is_none());
        assert!(decode("nan").is_none());
        assert!(decode("inf").is_none());
    }

    #[test]
    fn encode_picks_largest_unit() {
        assert_eq!(encode(2e9), "2.000G");
        assert_eq!(encode(10e9), "10.000G");
        assert_eq!(encode(1.5e6), "1.500M");
        assert_eq!(encode(1_500.0), "1.500K");
        assert_eq!(encode(250.0), "250");
        assert_eq!(encode(0.0), "0");
    }

    #[test]
    fn encode_unit_boundaries() {
        assert_eq!(encode(999.0), "999");
        assert_eq!(encode(1_000.0), "1.000K");
        assert_eq!(encode(1e6), "1.000M");
        assert_eq!(encode(1e9), "1.000G");
        // No T on the encode side.
        assert_eq!(encode(2e12), "2000.000G");
    }

    #[test]
    fn round_trip_within_three_decimals() {
        for value in [2_000_000_000.0, 1_500_000.0, 1_500.0, 250.0] {
            let decoded = bps(&encode(value));
            let relative = ((decoded - value) / value).abs();
            assert!(relative < 1e-3, "{value} round-tripped to {decoded}");
        }
    }

    #[test]
    fn from_str_reports_input() {
        let err = "twelve".parse::<Bandwidth>().unwrap_err();
        assert!(matches!(err, RampError::InvalidBandwidth(ref s) if s == "twelve"));
        assert_eq!("4G".parse::<Bandwidth>().unwrap().bps(), 4e9);
    }

    #[test]
    fn display_matches_encode() {
        let bw = Bandwidth::new(6e9).unwrap();
        assert_eq!(bw.to_string(), "6.000G");
        assert_eq!(bw.encode(), "6.000G");
    }
}
