//! Probabilistic truth values: (strength, confidence)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Truth value attached to every atom.
///
/// - **strength**: probability that the atom holds (0.0 - 1.0)
/// - **confidence**: reliability of the strength estimate (0.0 - 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TruthValue {
    pub strength: f32,
    pub confidence: f32,
}

impl TruthValue {
    pub fn new(strength: f32, confidence: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&strength));
        debug_assert!((0.0..=1.0).contains(&confidence));
        Self {
            strength,
            confidence,
        }
    }

    /// Fully believed: (1.0, 1.0). Default for freshly created atoms.
    pub fn certain() -> Self {
        Self {
            strength: 1.0,
            confidence: 1.0,
        }
    }

    /// Maximally uncertain: (0.5, 0.0)
    pub fn unknown() -> Self {
        Self {
            strength: 0.5,
            confidence: 0.0,
        }
    }

    /// Expected probability: strength weighted by confidence
    pub fn expectation(&self) -> f32 {
        self.strength * self.confidence
    }

    pub fn is_high_confidence(&self) -> bool {
        self.confidence > 0.8
    }
}

impl Default for TruthValue {
    fn default() -> Self {
        Self::certain()
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.2}, {:.2}>", self.strength, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_expectation() {
        let tv = TruthValue::new(0.8, 0.5);
        assert!(approx_eq(tv.expectation(), 0.4));
    }

    #[test]
    fn test_default_is_certain() {
        let tv = TruthValue::default();
        assert!(approx_eq(tv.strength, 1.0));
        assert!(approx_eq(tv.confidence, 1.0));
        assert!(tv.is_high_confidence());
    }

    #[test]
    fn test_unknown_has_zero_expectation() {
        assert!(approx_eq(TruthValue::unknown().expectation(), 0.0));
        assert!(!TruthValue::unknown().is_high_confidence());
    }
}
