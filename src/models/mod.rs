// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BrandFilterSet, MatchWeights, ProfileField, ScoredVehicle, UserProfile, VehicleRecord,
};
pub use requests::{BrandFilterRequest, MatchesQuery, SubmitAnswerRequest, UnlockFieldRequest};
pub use responses::{
    AnswerResponse, AnswerStatus, BrandFilterResponse, ErrorResponse, HealthResponse,
    MatchesResponse, ProfileResponse, SessionCreatedResponse, UnlockResponse,
};
