// Core algorithm exports
pub mod budget;
pub mod collector;
pub mod extract;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use budget::{parse_budget_ceiling, parse_msrp_bounds, UNPRICED_SENTINEL};
pub use collector::{AdvanceResult, FieldOrder, ProfileCollector};
pub use extract::{FieldExtractor, KeywordExtractor, PromptedExtractor};
pub use filters::{effective_msrp_min, passes_brand_filter, passes_budget_filter};
pub use matcher::{MatchResult, Matcher};
pub use scoring::score_vehicle;
