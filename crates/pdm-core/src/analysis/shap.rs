//! Ranked feature attributions.

use pdm_common::{AssetId, ShapDirection, ShapFeature};
use pdm_math::{pseudo_random_salted, round4};

/// Candidate features, in attribution order, with their units.
pub const SHAP_CANDIDATES: [(&str, &str); 5] = [
    ("rms_x", "mm/s"),
    ("bearing_deltaT", "°C"),
    ("kurtosis_y", "g"),
    ("motor_current", "A"),
    ("casing_temp", "°C"),
];

/// Attribute `risk` across the candidate features.
///
/// `phi = risk / (i + 1.5) * draw(asset + feature)`; the same draw decides
/// the direction (`+` above 0.5). Sorted descending by `phi`; ties keep
/// candidate order.
pub fn shap_summary(asset: &AssetId, risk: f64) -> Vec<ShapFeature> {
    let mut features: Vec<ShapFeature> = SHAP_CANDIDATES
        .iter()
        .enumerate()
        .map(|(index, &(feature, unit))| {
            let draw = pseudo_random_salted(asset.as_str(), feature);
            let direction = if draw > 0.5 {
                ShapDirection::Positive
            } else {
                ShapDirection::Negative
            };
            ShapFeature {
                feature: feature.to_string(),
                unit: Some(unit.to_string()),
                phi: round4(risk / (index as f64 + 1.5) * draw),
                direction,
                note: Some(format!("{feature} {} risk", direction.arrow())),
            }
        })
        .collect();

    features.sort_by(|a, b| b.phi.total_cmp(&a.phi));
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str) -> AssetId {
        AssetId::parse(id).unwrap()
    }

    #[test]
    fn test_sorted_descending() {
        for id in ["99 P-02", "99 P-11", "SEU3-P-10", "PDU-P-08"] {
            let summary = shap_summary(&asset(id), 0.77);
            assert_eq!(summary.len(), 5);
            assert!(summary.windows(2).all(|w| w[0].phi >= w[1].phi), "{id}");
        }
    }

    #[test]
    fn test_direction_and_note_agree() {
        for f in shap_summary(&asset("99 C-02"), 0.5) {
            let note = f.note.clone().unwrap();
            match f.direction {
                ShapDirection::Positive => assert!(note.ends_with("↑ risk")),
                ShapDirection::Negative => assert!(note.ends_with("↓ risk")),
            }
            assert!(note.starts_with(&f.feature));
        }
    }

    #[test]
    fn test_phi_bounded_by_position_weight() {
        // draw < 1, so phi < risk / 1.5 for every feature.
        let risk = 0.9;
        for f in shap_summary(&asset("PDA-C-01"), risk) {
            assert!(f.phi >= 0.0 && f.phi <= risk / 1.5);
        }
    }

    #[test]
    fn test_zero_risk_gives_zero_phi() {
        let summary = shap_summary(&asset("99 P-02"), 0.0);
        assert!(summary.iter().all(|f| f.phi == 0.0));
        let names: Vec<_> = summary.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, SHAP_CANDIDATES.map(|(n, _)| n));
    }
}
