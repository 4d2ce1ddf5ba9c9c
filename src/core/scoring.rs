use crate::models::{MatchWeights, ProfileField, UserProfile, VehicleRecord};

/// Calculate the weighted partial-match score for one catalog row.
///
/// This is Stage 3 of the matching pipeline. For every answered profile
/// field with a configured weight, the weight is added when the answer
/// text appears case-insensitively as a substring of the row's
/// corresponding catalog column. Deliberately fuzzy: user free text
/// rarely matches catalog vocabulary exactly.
///
/// Budget has no catalog column. A row scored here has already survived
/// the budget filter, so an answered budget earns its weight outright.
///
/// Unanswered, blank, and unweighted fields contribute zero; missing
/// catalog columns read as empty text and can never error.
pub fn score_vehicle(
    record: &VehicleRecord,
    profile: &UserProfile,
    weights: &MatchWeights,
) -> f64 {
    let mut score = 0.0;

    for (field, answer) in profile.iter() {
        let answer = answer.trim();
        if answer.is_empty() {
            continue;
        }
        let Some(weight) = weights.get(*field) else {
            continue;
        };

        match field.catalog_column() {
            Some(column) => {
                let haystack = record.column_text(column).to_lowercase();
                if haystack.contains(&answer.to_lowercase()) {
                    score += weight;
                }
            }
            None => {
                debug_assert_eq!(*field, ProfileField::Budget);
                score += weight;
            }
        }
    }

    score
}
