use crate::core::budget::UNPRICED_SENTINEL;
use crate::models::{BrandFilterSet, VehicleRecord};

/// Check a row against the session's brand sets.
///
/// This is Stage 1 of the matching pipeline. Blocking wins over
/// preference; a non-empty preferred set excludes every other brand.
#[inline]
pub fn passes_brand_filter(record: &VehicleRecord, filters: &BrandFilterSet) -> bool {
    filters.allows(&record.brand)
}

/// Check a row against the slack-adjusted budget ceiling.
///
/// This is Stage 2. Rows with no parsable catalog price are priced at a
/// high sentinel so they are effectively excluded rather than admitted
/// for free.
#[inline]
pub fn passes_budget_filter(record: &VehicleRecord, ceiling: f64, slack_multiplier: f64) -> bool {
    effective_msrp_min(record) <= ceiling * slack_multiplier
}

/// The minimum price used for budget comparisons.
#[inline]
pub fn effective_msrp_min(record: &VehicleRecord) -> f64 {
    record.msrp_min.unwrap_or(UNPRICED_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(brand: &str, msrp_min: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            brand: brand.to_string(),
            model: "Test".to_string(),
            model_year: 2024,
            msrp_range: String::new(),
            msrp_min,
            msrp_max: msrp_min,
            vehicle_type: String::new(),
            fuel_type: String::new(),
            drive_type: String::new(),
            car_size: String::new(),
            extras: HashMap::new(),
        }
    }

    #[test]
    fn test_blocked_brand_rejected() {
        let mut filters = BrandFilterSet::new();
        filters.block("Ford");

        assert!(!passes_brand_filter(&record("Ford", None), &filters));
        assert!(passes_brand_filter(&record("Honda", None), &filters));
    }

    #[test]
    fn test_preferred_set_restricts() {
        let mut filters = BrandFilterSet::new();
        filters.prefer("Honda");

        assert!(passes_brand_filter(&record("honda", None), &filters));
        assert!(!passes_brand_filter(&record("Toyota", None), &filters));
    }

    #[test]
    fn test_budget_slack_admits_near_budget_rows() {
        let row = record("Honda", Some(28000.0));

        assert!(!passes_budget_filter(&row, 25000.0, 1.0));
        assert!(passes_budget_filter(&row, 25000.0, 1.2));
    }

    #[test]
    fn test_unpriced_row_is_not_free() {
        let row = record("Honda", None);

        assert!(!passes_budget_filter(&row, 45000.0, 1.2));
        // An extreme ceiling can still admit it past the sentinel.
        assert!(passes_budget_filter(&row, 100_000.0, 1.0));
    }
}
