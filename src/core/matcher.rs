use crate::core::{
    budget::parse_budget_ceiling,
    filters::{passes_brand_filter, passes_budget_filter},
    scoring::score_vehicle,
};
use crate::models::{
    BrandFilterSet, MatchWeights, ProfileField, ScoredVehicle, UserProfile, VehicleRecord,
};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredVehicle>,
    pub total_candidates: usize,
    /// The slack-adjusted ceiling the budget filter applied.
    pub budget_ceiling: f64,
}

/// Main matching orchestrator - implements the filtering pipeline
///
/// # Pipeline Stages
/// 1. Brand filter (blocked wins over preferred)
/// 2. Budget ceiling with slack
/// 3. Weighted partial-match scoring
/// 4. Ranking and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: MatchWeights,
    slack_multiplier: f64,
    default_budget_ceiling: f64,
}

impl Matcher {
    pub fn new(weights: MatchWeights, slack_multiplier: f64, default_budget_ceiling: f64) -> Self {
        Self {
            weights,
            slack_multiplier,
            default_budget_ceiling,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(MatchWeights::default(), 1.2, 45_000.0)
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Rank the catalog against the current profile and brand sets.
    ///
    /// Deterministic: identical inputs produce identical ordered output.
    /// An empty profile degrades to newest-first among rows under the
    /// slack-adjusted default ceiling. Malformed profile values never
    /// error; a budget that fails to parse falls back to the default
    /// ceiling.
    ///
    /// # Arguments
    /// * `profile` - The collected user answers
    /// * `brands` - The session's blocked/preferred brand sets
    /// * `catalog` - All catalog rows
    /// * `top_n` - Maximum number of matches to return
    pub fn find_matches(
        &self,
        profile: &UserProfile,
        brands: &BrandFilterSet,
        catalog: &[VehicleRecord],
        top_n: usize,
    ) -> MatchResult {
        let total_candidates = catalog.len();

        let ceiling = profile
            .get(ProfileField::Budget)
            .and_then(parse_budget_ceiling)
            .unwrap_or(self.default_budget_ceiling);

        let mut matches: Vec<ScoredVehicle> = catalog
            .iter()
            // Stage 1: brand sets
            .filter(|record| passes_brand_filter(record, brands))
            // Stage 2: budget ceiling
            .filter(|record| passes_budget_filter(record, ceiling, self.slack_multiplier))
            // Stage 3: weighted scoring
            .map(|record| ScoredVehicle {
                vehicle: record.clone(),
                score: score_vehicle(record, profile, &self.weights),
            })
            .collect();

        // Stage 4: score descending, newer model year breaks ties. The
        // sort is stable, so rows tied beyond that keep catalog order.
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.vehicle.model_year.cmp(&a.vehicle.model_year))
        });

        matches.truncate(top_n);

        MatchResult {
            matches,
            total_candidates,
            budget_ceiling: ceiling * self.slack_multiplier,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_record(
        brand: &str,
        model: &str,
        year: i32,
        msrp: &str,
        car_size: &str,
    ) -> VehicleRecord {
        let (msrp_min, msrp_max) = crate::core::budget::parse_msrp_bounds(msrp);
        VehicleRecord {
            brand: brand.to_string(),
            model: model.to_string(),
            model_year: year,
            msrp_range: msrp.to_string(),
            msrp_min,
            msrp_max,
            vehicle_type: "Commuting".to_string(),
            fuel_type: "Gas".to_string(),
            drive_type: "FWD".to_string(),
            car_size: car_size.to_string(),
            extras: HashMap::new(),
        }
    }

    fn two_row_catalog() -> Vec<VehicleRecord> {
        vec![
            create_record("BrandX", "ModelA", 2023, "$20,000", "Compact"),
            create_record("BrandY", "ModelB", 2024, "$60,000", "SUV"),
        ]
    }

    #[test]
    fn test_budget_and_size_select_single_row() {
        let matcher = Matcher::with_default_weights();
        let mut profile = UserProfile::new();
        profile.set(ProfileField::Budget, "25k");
        profile.set(ProfileField::CarSize, "Compact");

        let result = matcher.find_matches(&profile, &BrandFilterSet::new(), &two_row_catalog(), 3);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].vehicle.model, "ModelA");
        // Budget weight 2.0 + Car Size weight 0.7
        assert!((result.matches[0].score - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_empty_profile_ranks_newest_first() {
        let matcher = Matcher::with_default_weights();
        let profile = UserProfile::new();

        let result = matcher.find_matches(&profile, &BrandFilterSet::new(), &two_row_catalog(), 3);

        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].vehicle.model, "ModelB");
        assert_eq!(result.matches[1].vehicle.model, "ModelA");
        assert_eq!(result.matches[0].score, 0.0);
    }

    #[test]
    fn test_blocked_brand_never_returned() {
        let matcher = Matcher::with_default_weights();
        let mut brands = BrandFilterSet::new();
        brands.block("BrandX");

        let result = matcher.find_matches(&UserProfile::new(), &brands, &two_row_catalog(), 3);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].vehicle.brand, "BrandY");
    }

    #[test]
    fn test_all_rows_filtered_returns_empty() {
        let matcher = Matcher::with_default_weights();
        let mut brands = BrandFilterSet::new();
        brands.block("BrandX");
        brands.block("BrandY");

        let result = matcher.find_matches(&UserProfile::new(), &brands, &two_row_catalog(), 3);

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 2);
    }

    #[test]
    fn test_unparsable_budget_falls_back_to_default() {
        let matcher = Matcher::with_default_weights();
        let mut profile = UserProfile::new();
        profile.set(ProfileField::Budget, "not sure yet");

        let result = matcher.find_matches(&profile, &BrandFilterSet::new(), &two_row_catalog(), 3);

        // Default ceiling 45000 * 1.2 = 54000: ModelA passes, ModelB does not.
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].vehicle.model, "ModelA");
    }

    #[test]
    fn test_respects_top_n() {
        let matcher = Matcher::with_default_weights();
        let catalog: Vec<VehicleRecord> = (0..20)
            .map(|i| {
                create_record(
                    "BrandX",
                    &format!("Model{}", i),
                    2015 + (i % 10),
                    "$20,000",
                    "Compact",
                )
            })
            .collect();

        let result = matcher.find_matches(&UserProfile::new(), &BrandFilterSet::new(), &catalog, 5);

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.total_candidates, 20);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let matcher = Matcher::with_default_weights();
        let catalog = two_row_catalog();
        let mut profile = UserProfile::new();
        profile.set(ProfileField::CarSize, "SUV");

        let first = matcher.find_matches(&profile, &BrandFilterSet::new(), &catalog, 3);
        let second = matcher.find_matches(&profile, &BrandFilterSet::new(), &catalog, 3);

        let order = |r: &MatchResult| {
            r.matches
                .iter()
                .map(|m| (m.vehicle.model.clone(), m.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
    }
}
