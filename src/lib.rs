//! Vehicle Advisor - conversational vehicle recommendation service
//!
//! This library provides the profile-collection state machine and the
//! catalog filtering/scoring engine behind the advisor, plus the HTTP
//! shell that serves them per session.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{AdvanceResult, FieldOrder, Matcher, ProfileCollector};
pub use models::{
    BrandFilterSet, MatchWeights, ProfileField, ScoredVehicle, UserProfile, VehicleRecord,
};
pub use services::{AdvisorSession, CatalogStore, Explainer, SessionStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let collector = ProfileCollector::full_sequence();
        assert_eq!(collector.current_field(), Some(ProfileField::Region));
    }
}
