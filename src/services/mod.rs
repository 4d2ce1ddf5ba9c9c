// Service exports
pub mod catalog;
pub mod explainer;
pub mod session;

pub use catalog::{CatalogError, CatalogStore};
pub use explainer::{ChatExplainer, Explainer, ExplainerError};
pub use session::{AdvisorSession, MatchError, SessionError, SessionStore};
