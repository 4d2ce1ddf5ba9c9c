use crate::core::{AdvanceResult, FieldExtractor, FieldOrder, Matcher, ProfileCollector};
use crate::models::{
    AnswerResponse, AnswerStatus, BrandFilterRequest, BrandFilterResponse, ErrorResponse,
    HealthResponse, MatchesQuery, MatchesResponse, ProfileResponse, SessionCreatedResponse,
    SubmitAnswerRequest, UnlockFieldRequest, UnlockResponse,
};
use crate::services::{AdvisorSession, CatalogStore, Explainer, SessionStore};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub sessions: Arc<SessionStore>,
    pub explainer: Arc<dyn Explainer>,
    pub extractor: Arc<dyn FieldExtractor>,
    pub matcher: Matcher,
    pub field_order: FieldOrder,
    pub completion_threshold: usize,
    pub default_top_n: usize,
}

impl AppState {
    fn new_session(&self) -> AdvisorSession {
        let collector = ProfileCollector::new(
            self.field_order,
            self.completion_threshold,
            self.matcher.weights().clone(),
        );
        AdvisorSession::new(self.catalog.clone(), self.matcher.clone(), collector)
    }
}

/// Configure all advisor routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/sessions", web::post().to(create_session))
        .route("/sessions/{id}/answer", web::post().to(submit_answer))
        .route("/sessions/{id}/unlock", web::post().to(unlock_field))
        .route("/sessions/{id}/profile", web::get().to(get_profile))
        .route("/sessions/{id}/matches", web::get().to(get_matches))
        .route("/sessions/{id}/brands", web::put().to(set_brand_filters))
        .route("/sessions/{id}/restart", web::post().to(restart_session));
}

fn session_not_found(id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "session_not_found".to_string(),
        message: format!("Session not found or expired: {}", id),
        status_code: 404,
    })
}

fn catalog_unavailable() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "catalog_unavailable".to_string(),
        message: "Vehicle catalog is not loaded".to_string(),
        status_code: 500,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: state.catalog.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create a new advisor session
///
/// POST /api/v1/sessions
async fn create_session(state: web::Data<AppState>) -> impl Responder {
    let session = state.new_session();
    let field = session.pending_question();
    let id = state.sessions.create(session).await;

    tracing::info!("Session {} created ({} live)", id, state.sessions.live_count());

    HttpResponse::Ok().json(SessionCreatedResponse {
        session_id: id,
        field,
        question: field.map(|f| f.question().to_string()),
    })
}

/// Submit one free-text answer for the current question
///
/// POST /api/v1/sessions/{id}/answer
///
/// Request body:
/// ```json
/// { "text": "string" }
/// ```
///
/// A message that reads as a revision request ("change my budget") is
/// routed into an unlock instead of being stored as an answer.
async fn submit_answer(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SubmitAnswerRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = path.into_inner();
    let handle = match state.sessions.get(&id).await {
        Ok(handle) => handle,
        Err(_) => return session_not_found(&id),
    };
    let mut session = handle.lock().await;

    // Revision requests unlock the named field instead of answering the
    // current one.
    if let Some(field) = state.extractor.change_request(&req.text) {
        if session.request_unlock(field) {
            tracing::info!("Session {}: re-opened {}", id, field);
            let shortlist = match session.compute_matches(state.default_top_n) {
                Ok(result) => result.matches,
                Err(_) => return catalog_unavailable(),
            };
            return HttpResponse::Ok().json(AnswerResponse {
                status: AnswerStatus::Unlocked,
                field: Some(field),
                question: Some(field.question().to_string()),
                complete: session.is_complete(),
                locked_fields: session.get_profile().locked_count(),
                shortlist,
            });
        }
    }

    let advance = session.submit_answer(&req.text);
    let (status, field, question) = match advance {
        AdvanceResult::Advanced { field, next } => (
            AnswerStatus::Advanced,
            Some(field),
            next.map(|f| f.question().to_string()),
        ),
        AdvanceResult::Rejected { field } => (
            AnswerStatus::Rejected,
            Some(field),
            Some(field.question().to_string()),
        ),
        AdvanceResult::AlreadyComplete => (AnswerStatus::Complete, None, None),
    };

    let shortlist = match session.compute_matches(state.default_top_n) {
        Ok(result) => result.matches,
        Err(_) => return catalog_unavailable(),
    };

    tracing::debug!(
        "Session {}: answer handled ({:?}, {} fields locked)",
        id,
        status,
        session.get_profile().locked_count()
    );

    HttpResponse::Ok().json(AnswerResponse {
        status,
        field,
        question,
        complete: session.is_complete(),
        locked_fields: session.get_profile().locked_count(),
        shortlist,
    })
}

/// Re-open exactly one answered field
///
/// POST /api/v1/sessions/{id}/unlock
///
/// Request body:
/// ```json
/// { "field": "Budget" }
/// ```
async fn unlock_field(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UnlockFieldRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let handle = match state.sessions.get(&id).await {
        Ok(handle) => handle,
        Err(_) => return session_not_found(&id),
    };
    let mut session = handle.lock().await;

    let changed = session.request_unlock(req.field);
    if changed {
        tracing::info!("Session {}: unlocked {}", id, req.field);
    }

    HttpResponse::Ok().json(UnlockResponse {
        changed,
        field: req.field,
        question: changed.then(|| req.field.question().to_string()),
    })
}

/// Current profile state
///
/// GET /api/v1/sessions/{id}/profile
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let handle = match state.sessions.get(&id).await {
        Ok(handle) => handle,
        Err(_) => return session_not_found(&id),
    };
    let session = handle.lock().await;

    HttpResponse::Ok().json(ProfileResponse {
        profile: session.get_profile().clone(),
        locked_fields: session.get_profile().locked_count(),
        complete: session.is_complete(),
        question: session
            .pending_question()
            .map(|f| f.question().to_string()),
    })
}

/// Ranked shortlist for the current profile
///
/// GET /api/v1/sessions/{id}/matches?topN=3&explain=true
///
/// With `explain=true` the hosted model phrases an explanation; its
/// failure is surfaced as 502 rather than substituting fabricated text.
async fn get_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    let id = path.into_inner();
    let handle = match state.sessions.get(&id).await {
        Ok(handle) => handle,
        Err(_) => return session_not_found(&id),
    };
    let session = handle.lock().await;

    let top_n = query.top_n.unwrap_or(state.default_top_n);
    let result = match session.compute_matches(top_n) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Session {}: matching failed: {}", id, e);
            return catalog_unavailable();
        }
    };

    let explanation = if query.explain && !result.matches.is_empty() {
        match state
            .explainer
            .explain(session.get_profile(), &result.matches)
            .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!("Session {}: explanation failed: {}", id, e);
                return HttpResponse::BadGateway().json(ErrorResponse {
                    error: "explanation_failed".to_string(),
                    message: e.to_string(),
                    status_code: 502,
                });
            }
        }
    } else {
        None
    };

    tracing::info!(
        "Session {}: returning {} matches (from {} candidates)",
        id,
        result.matches.len(),
        result.total_candidates
    );

    HttpResponse::Ok().json(MatchesResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
        explanation,
    })
}

/// Replace the session's blocked/preferred brand sets
///
/// PUT /api/v1/sessions/{id}/brands
///
/// Request body:
/// ```json
/// { "blocked": ["Ford"], "preferred": [] }
/// ```
async fn set_brand_filters(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<BrandFilterRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let id = path.into_inner();
    let handle = match state.sessions.get(&id).await {
        Ok(handle) => handle,
        Err(_) => return session_not_found(&id),
    };
    let mut session = handle.lock().await;

    session.set_blocked_brands(&req.blocked);
    session.set_preferred_brands(&req.preferred);

    HttpResponse::Ok().json(BrandFilterResponse {
        blocked: session
            .brand_filters()
            .blocked()
            .map(str::to_string)
            .collect(),
        preferred: session
            .brand_filters()
            .preferred()
            .map(str::to_string)
            .collect(),
    })
}

/// Forget every answer and brand filter and start over
///
/// POST /api/v1/sessions/{id}/restart
async fn restart_session(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let handle = match state.sessions.get(&id).await {
        Ok(handle) => handle,
        Err(_) => return session_not_found(&id),
    };
    let mut session = handle.lock().await;

    session.restart();
    let field = session.pending_question();

    tracing::info!("Session {} restarted", id);

    HttpResponse::Ok().json(SessionCreatedResponse {
        session_id: id,
        field,
        question: field.map(|f| f.question().to_string()),
    })
}
