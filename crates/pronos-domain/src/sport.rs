//! Sport categories covered by the product

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of sports a prediction can belong to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SportCategory {
    /// Association football (soccer)
    #[default]
    Football,
    /// Basketball
    Basketball,
    /// Tennis
    Tennis,
}

impl SportCategory {
    /// All categories, in display order
    pub const ALL: [SportCategory; 3] = [
        SportCategory::Football,
        SportCategory::Basketball,
        SportCategory::Tennis,
    ];

    /// Canonical label used on the wire and in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            SportCategory::Football => "Football",
            SportCategory::Basketball => "Basketball",
            SportCategory::Tennis => "Tennis",
        }
    }
}

impl fmt::Display for SportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_football() {
        assert_eq!(SportCategory::default(), SportCategory::Football);
    }

    #[test]
    fn test_display_matches_wire_label() {
        for sport in SportCategory::ALL {
            assert_eq!(sport.to_string(), sport.as_str());
        }
    }

    #[test]
    fn test_serde_uses_variant_name() {
        let json = serde_json::to_string(&SportCategory::Basketball).unwrap();
        assert_eq!(json, "\"Basketball\"");
        let parsed: SportCategory = serde_json::from_str("\"Tennis\"").unwrap();
        assert_eq!(parsed, SportCategory::Tennis);
    }
}
