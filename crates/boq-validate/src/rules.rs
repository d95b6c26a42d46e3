//! Material domain rules.
//!
//! The representative rule set is the exposure-class minimum-strength
//! table for concrete (EN 206 style): each exposure code carries a
//! minimum cylinder strength, and a position declaring both a concrete
//! class and exposure classes must satisfy every declared exposure.
//! The table is data, so further material rule sets can follow the same
//! shape.

use boq_match::markers::{MarkerCategory, TokenBundle};
use boq_model::ValidationResult;

/// Minimum cylinder strength (the `C{n}/..` numerator) per exposure code.
/// `x0` is absent on purpose: no aggressivity, no requirement.
const MIN_STRENGTH: &[(&str, u32)] = &[
    ("xc1", 20),
    ("xc2", 25),
    ("xc3", 30),
    ("xc4", 30),
    ("xd1", 30),
    ("xd2", 30),
    ("xd3", 35),
    ("xs1", 30),
    ("xs2", 35),
    ("xs3", 35),
    ("xf1", 30),
    ("xf2", 25),
    ("xf3", 30),
    ("xf4", 30),
    ("xa1", 30),
    ("xa2", 30),
    ("xa3", 35),
];

fn required_strength(exposure: &str) -> Option<u32> {
    MIN_STRENGTH
        .iter()
        .find(|(code, _)| *code == exposure)
        .map(|(_, strength)| *strength)
}

/// Parses the cylinder strength out of a concrete-class marker
/// (`c25/30` → 25, `lc30/33` → 30).
fn cylinder_strength(marker: &str) -> Option<u32> {
    let digits: String = marker
        .chars()
        .skip_while(|ch| ch.is_ascii_alphabetic())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Cross-checks concrete-class and exposure-class markers.
pub fn check_concrete_exposure(bundle: &TokenBundle, result: &mut ValidationResult) {
    let concrete = bundle.markers_for(MarkerCategory::ConcreteClass);
    let exposure = bundle.markers_for(MarkerCategory::ExposureClass);

    match (concrete, exposure) {
        (Some(concrete), Some(exposure)) => {
            if exposure.iter().all(|code| code == "x0") {
                result.extras.insert(
                    "exposure_note".to_string(),
                    "exposure X0 carries no strength requirement".to_string(),
                );
                return;
            }
            for class in concrete {
                let Some(strength) = cylinder_strength(class) else {
                    continue;
                };
                for code in exposure {
                    if let Some(required) = required_strength(code)
                        && strength < required
                    {
                        result.push_error(format!(
                            "concrete class {class} below minimum for exposure {code} \
                             (requires C{required} or better)"
                        ));
                    }
                }
            }
        }
        (Some(concrete), None) => {
            let classes: Vec<&str> = concrete.iter().map(String::as_str).collect();
            result.push_warning(format!(
                "concrete class {} declared without an exposure class",
                classes.join(", ")
            ));
        }
        (None, Some(exposure)) => {
            let codes: Vec<&str> = exposure.iter().map(String::as_str).collect();
            result.push_warning(format!(
                "exposure class {} declared without a concrete class",
                codes.join(", ")
            ));
        }
        (None, None) => {}
    }
}
