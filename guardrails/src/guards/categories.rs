use guardgate_core::types::guardrails::GuardVerdict;
use guardgate_core::types::moderation::{ModerationCategory, ModerationResult};
use tracing::warn;

use ModerationCategory::*;

/// External categories raised by a Llama Guard 3 hazard code
pub fn map_code(code: &str) -> Option<&'static [ModerationCategory]> {
    let categories: &'static [ModerationCategory] = match code {
        "S1" => &[Violence, ViolenceGraphic],
        "S2" => &[HarassmentThreatening],
        "S3" => &[Sexual, Harassment, Violence],
        "S4" => &[SexualMinors],
        "S5" => &[Harassment],
        // Specialized advice, privacy and intellectual property have no external counterpart
        "S6" | "S7" | "S8" => &[],
        "S9" => &[IllicitViolent],
        "S10" => &[Hate, HateThreatening],
        "S11" => &[SelfHarm, SelfHarmIntent, SelfHarmInstructions],
        "S12" => &[Sexual],
        "S13" => &[],
        _ => return None,
    };
    Some(categories)
}

/// Maps a verdict onto the moderation schema.
///
/// An unsafe verdict is always flagged, even when none of its codes map to an
/// external category.
pub fn to_moderation_result(verdict: &GuardVerdict) -> ModerationResult {
    let mut result = ModerationResult::safe();
    let GuardVerdict::Unsafe {
        violated_categories,
    } = verdict
    else {
        return result;
    };

    result.flagged = true;
    for code in violated_categories {
        match map_code(code.trim()) {
            Some(categories) => {
                for category in categories {
                    result.flag(*category);
                }
            }
            None => warn!("Unknown Llama Guard category code {code:?}"),
        }
    }

    result
}
