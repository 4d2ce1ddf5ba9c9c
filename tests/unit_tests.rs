// Unit tests for the Vehicle Advisor core

use std::collections::HashMap;
use vehicle_advisor::core::{
    parse_budget_ceiling, parse_msrp_bounds, passes_brand_filter, passes_budget_filter,
    score_vehicle, FieldExtractor, KeywordExtractor, PromptedExtractor,
};
use vehicle_advisor::models::{
    BrandFilterSet, MatchWeights, ProfileField, UserProfile, VehicleRecord,
};

fn create_record(brand: &str, model: &str, year: i32, msrp: &str) -> VehicleRecord {
    let (msrp_min, msrp_max) = parse_msrp_bounds(msrp);
    VehicleRecord {
        brand: brand.to_string(),
        model: model.to_string(),
        model_year: year,
        msrp_range: msrp.to_string(),
        msrp_min,
        msrp_max,
        vehicle_type: "SUV".to_string(),
        fuel_type: "Gas".to_string(),
        drive_type: "AWD".to_string(),
        car_size: "Midsize".to_string(),
        extras: HashMap::from([("Region".to_string(), "Northeast, Midwest".to_string())]),
    }
}

#[test]
fn test_budget_parse_plain_and_currency() {
    assert_eq!(parse_budget_ceiling("30000"), Some(30000.0));
    assert_eq!(parse_budget_ceiling("$30,000"), Some(30000.0));
    assert_eq!(parse_budget_ceiling("  $30,000 or so "), Some(30000.0));
}

#[test]
fn test_budget_parse_k_suffix() {
    assert_eq!(parse_budget_ceiling("25k"), Some(25000.0));
    assert_eq!(parse_budget_ceiling("under $50k, maybe less"), Some(50000.0));
}

#[test]
fn test_budget_parse_first_number_wins() {
    assert_eq!(
        parse_budget_ceiling("between $30,000 and $40,000"),
        Some(30000.0)
    );
}

#[test]
fn test_budget_parse_failure_returns_none() {
    assert_eq!(parse_budget_ceiling("still deciding"), None);
}

#[test]
fn test_msrp_bounds_single_and_range() {
    assert_eq!(parse_msrp_bounds("$20,000"), (Some(20000.0), Some(20000.0)));
    assert_eq!(
        parse_msrp_bounds("$28,500 - $41,000"),
        (Some(28500.0), Some(41000.0))
    );
    assert_eq!(parse_msrp_bounds("TBD"), (None, None));
}

#[test]
fn test_brand_filter_block_precedence() {
    let mut filters = BrandFilterSet::new();
    filters.prefer("Toyota");
    filters.block("Toyota");

    let record = create_record("Toyota", "RAV4", 2024, "$28,500");
    assert!(!passes_brand_filter(&record, &filters));
}

#[test]
fn test_budget_filter_respects_slack() {
    let record = create_record("Toyota", "RAV4", 2024, "$28,500");

    assert!(passes_budget_filter(&record, 28500.0, 1.0));
    assert!(!passes_budget_filter(&record, 25000.0, 1.0));
    assert!(passes_budget_filter(&record, 25000.0, 1.2));
}

#[test]
fn test_budget_filter_unknown_price_excluded() {
    let record = create_record("Toyota", "RAV4", 2024, "call dealer");

    assert!(!passes_budget_filter(&record, 45000.0, 1.2));
}

#[test]
fn test_score_sums_matched_weights() {
    let record = create_record("Toyota", "RAV4", 2024, "$28,500");
    let weights = MatchWeights::default();

    let mut profile = UserProfile::new();
    profile.set(ProfileField::CarSize, "midsize");
    profile.set(ProfileField::DriveType, "AWD");

    let score = score_vehicle(&record, &profile, &weights);
    // Car Size 0.7 + Drive Type 1.0
    assert!((score - 1.7).abs() < 1e-9);
}

#[test]
fn test_score_monotone_in_matching_fields() {
    let record = create_record("Toyota", "RAV4", 2024, "$28,500");
    let weights = MatchWeights::default();
    let mut profile = UserProfile::new();

    let mut last = score_vehicle(&record, &profile, &weights);
    for (field, answer) in [
        (ProfileField::Region, "northeast"),
        (ProfileField::CarSize, "midsize"),
        (ProfileField::DriveType, "awd"),
        (ProfileField::Budget, "30k"),
    ] {
        profile.set(field, answer);
        let score = score_vehicle(&record, &profile, &weights);
        assert!(score >= last, "score decreased after adding {}", field);
        last = score;
    }
}

#[test]
fn test_score_ignores_blank_answers() {
    let record = create_record("Toyota", "RAV4", 2024, "$28,500");
    let mut profile = UserProfile::new();
    profile.set(ProfileField::CarSize, "   ");

    let score = score_vehicle(&record, &profile, &MatchWeights::default());
    assert_eq!(score, 0.0);
}

#[test]
fn test_prompted_extractor_is_inert() {
    let extractor = PromptedExtractor;
    assert_eq!(extractor.extract("I want to change my budget"), None);
}

#[test]
fn test_keyword_extractor_change_request() {
    let extractor = KeywordExtractor;
    assert_eq!(
        extractor.change_request("please update my credit info"),
        Some(ProfileField::CreditScore)
    );
    assert_eq!(extractor.change_request("720 or so"), None);
}
