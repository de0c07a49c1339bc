//! Sofa types - the closed set of configurations a variant can be named after.
//!
//! Each type has a key (`TRE_POSTI_MAXI`) and a canonical stored value
//! (`Divano 3 posti maxi`). Stored documents may carry either form in any
//! letter case; the canonical value is what gets written back.

use std::fmt;

/// A sofa configuration. [`SofaType::Custom`] is the sentinel for free-text names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SofaType {
    /// Two-seat sofa
    TwoSeat,
    /// Three-seat sofa
    ThreeSeat,
    /// Wide three-seat sofa
    ThreeSeatMaxi,
    /// Four-seat sofa
    FourSeat,
    /// Corner sofa
    Corner,
    /// Sofa with chaise longue
    Chaise,
    /// Sofa bed
    SofaBed,
    /// Armchair
    Armchair,
    /// Free-text name carried in the variant's custom name
    Custom,
}

impl SofaType {
    /// Every sofa type, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::TwoSeat,
        Self::ThreeSeat,
        Self::ThreeSeatMaxi,
        Self::FourSeat,
        Self::Corner,
        Self::Chaise,
        Self::SofaBed,
        Self::Armchair,
        Self::Custom,
    ];

    /// Enumeration key, e.g. `TRE_POSTI`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TwoSeat => "DUE_POSTI",
            Self::ThreeSeat => "TRE_POSTI",
            Self::ThreeSeatMaxi => "TRE_POSTI_MAXI",
            Self::FourSeat => "QUATTRO_POSTI",
            Self::Corner => "ANGOLARE",
            Self::Chaise => "PENISOLA",
            Self::SofaBed => "DIVANO_LETTO",
            Self::Armchair => "POLTRONA",
            Self::Custom => "CUSTOM",
        }
    }

    /// Canonical stored value, e.g. `Divano 3 posti`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoSeat => "Divano 2 posti",
            Self::ThreeSeat => "Divano 3 posti",
            Self::ThreeSeatMaxi => "Divano 3 posti maxi",
            Self::FourSeat => "Divano 4 posti",
            Self::Corner => "Divano angolare",
            Self::Chaise => "Divano con penisola",
            Self::SofaBed => "Divano letto",
            Self::Armchair => "Poltrona",
            Self::Custom => "custom",
        }
    }

    /// Case-insensitive match against both the canonical value and the key.
    /// Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|t| {
            t.as_str().eq_ignore_ascii_case(wanted) || t.key().eq_ignore_ascii_case(wanted)
        })
    }

    /// True for the free-text sentinel.
    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for SofaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_value_and_key_in_any_case() {
        assert_eq!(
            SofaType::from_str_loose("divano 3 posti MAXI"),
            Some(SofaType::ThreeSeatMaxi)
        );
        assert_eq!(
            SofaType::from_str_loose("tre_posti"),
            Some(SofaType::ThreeSeat)
        );
        assert_eq!(SofaType::from_str_loose("CUSTOM"), Some(SofaType::Custom));
        assert_eq!(SofaType::from_str_loose("  Poltrona "), Some(SofaType::Armchair));
    }

    #[test]
    fn test_unknown_names_do_not_match() {
        assert_eq!(SofaType::from_str_loose("Divano 7 posti"), None);
        assert_eq!(SofaType::from_str_loose(""), None);
        assert_eq!(SofaType::from_str_loose("   "), None);
    }

    #[test]
    fn test_canonical_values_resolve_to_themselves() {
        for t in SofaType::ALL {
            assert_eq!(SofaType::from_str_loose(t.as_str()), Some(t));
            assert_eq!(SofaType::from_str_loose(t.key()), Some(t));
        }
    }
}
