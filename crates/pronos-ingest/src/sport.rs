//! Map free-text sport labels onto [`SportCategory`]

use pronos_domain::SportCategory;
use tracing::warn;

/// Tokens tested against the uppercased label, in priority order
const SPORT_TOKENS: &[(&str, SportCategory)] = &[
    ("BASKET", SportCategory::Basketball),
    ("TENNIS", SportCategory::Tennis),
    ("FOOTBALL", SportCategory::Football),
];

/// Normalize a sport label returned by the model
///
/// Containment, not equality: "NBA Basketball" and "BASKET-BALL" are both
/// basketball. Unrecognized labels fall back to football with a warning.
pub fn normalize(label: &str) -> SportCategory {
    let upper = label.to_uppercase();
    SPORT_TOKENS
        .iter()
        .find(|(token, _)| upper.contains(*token))
        .map(|(_, sport)| *sport)
        .unwrap_or_else(|| {
            warn!("Unrecognized sport label '{}', defaulting to Football", label);
            SportCategory::Football
        })
}
