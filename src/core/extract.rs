use crate::models::ProfileField;

/// Strategy for guessing which profile field a free-form message refers
/// to.
///
/// Kept outside the matcher so the deterministic scoring path never
/// depends on text heuristics. The session layer uses it to route
/// "change my budget" style requests into an unlock.
pub trait FieldExtractor: Send + Sync {
    /// The field the message most plausibly refers to, if any.
    fn extract(&self, text: &str) -> Option<ProfileField>;

    /// Whether the message asks to revise an already-answered field, and
    /// which one.
    fn change_request(&self, text: &str) -> Option<ProfileField> {
        let lowered = text.to_lowercase();
        const REVISION_CUES: [&str; 4] = ["change", "update", "redo", "instead"];
        if REVISION_CUES.iter().any(|cue| lowered.contains(cue)) {
            self.extract(text)
        } else {
            None
        }
    }
}

/// Extractor for the exact-prompt conversation style: the UI asks one
/// question at a time, so answers always bind to the prompted field and
/// free-form sniffing is never attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptedExtractor;

impl FieldExtractor for PromptedExtractor {
    fn extract(&self, _text: &str) -> Option<ProfileField> {
        None
    }
}

/// Extractor that sniffs field mentions from free-form text by keyword.
///
/// First match wins in canonical field order, so a message naming two
/// fields resolves to one deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    fn keywords(field: ProfileField) -> &'static [&'static str] {
        match field {
            ProfileField::Region => &["region", "state", "area where"],
            ProfileField::UseCategory => &["use it for", "use category", "primary use"],
            ProfileField::YearlyIncome => &["income", "salary", "earn"],
            ProfileField::CreditScore => &["credit"],
            ProfileField::GarageAccess => &["garage"],
            ProfileField::EcoConscious => &["eco", "environment", "green"],
            ProfileField::ChargingAccess => &["charging", "charger", "plug"],
            ProfileField::NeighborhoodType => &["neighborhood", "city", "suburb", "rural"],
            ProfileField::TowingNeeds => &["tow", "trailer", "haul"],
            ProfileField::SafetyPriority => &["safety", "safe"],
            ProfileField::TechFeatures => &["tech", "technology", "features"],
            ProfileField::CarSize => &["size", "compact", "midsize", "full-size"],
            ProfileField::OwnershipRecommendation => &["buy", "lease", "rent"],
            ProfileField::EmploymentStatus => &["employment", "employed", "job"],
            ProfileField::TravelFrequency => &["travel", "trip"],
            ProfileField::OwnershipDuration => &["how long", "own it", "keep it", "duration"],
            ProfileField::Budget => &["budget", "price", "cost", "spend", "afford"],
            ProfileField::AnnualMileage => &["mileage", "miles per year", "miles a year"],
            ProfileField::DriveType => &["drive type", "awd", "fwd", "rwd", "4wd"],
        }
    }
}

impl FieldExtractor for KeywordExtractor {
    fn extract(&self, text: &str) -> Option<ProfileField> {
        let lowered = text.to_lowercase();
        ProfileField::ALL.iter().copied().find(|field| {
            Self::keywords(*field)
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompted_extractor_never_sniffs() {
        let extractor = PromptedExtractor;
        assert_eq!(extractor.extract("change my budget"), None);
        assert_eq!(extractor.change_request("change my budget"), None);
    }

    #[test]
    fn test_keyword_extractor_finds_budget() {
        let extractor = KeywordExtractor;
        assert_eq!(
            extractor.extract("my budget is about 30k"),
            Some(ProfileField::Budget)
        );
    }

    #[test]
    fn test_change_request_requires_revision_cue() {
        let extractor = KeywordExtractor;
        assert_eq!(
            extractor.change_request("change my budget to 40k"),
            Some(ProfileField::Budget)
        );
        // A plain mention is an answer, not a revision.
        assert_eq!(extractor.change_request("my budget is 40k"), None);
    }

    #[test]
    fn test_first_field_in_canonical_order_wins() {
        let extractor = KeywordExtractor;
        // Mentions both Region and Budget; Region comes first.
        assert_eq!(
            extractor.extract("update the region and budget"),
            Some(ProfileField::Region)
        );
    }

    #[test]
    fn test_unrecognized_text_extracts_nothing() {
        let extractor = KeywordExtractor;
        assert_eq!(extractor.extract("hello there"), None);
    }
}
