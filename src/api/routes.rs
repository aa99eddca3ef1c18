//! API route definitions

use super::handlers::{self, ApiState};
use super::{auth_handlers, emotion_handlers, emotion_record_handlers, symptom_handlers, thought_handlers};
use crate::auth::require_auth;
use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router.
///
/// Public routes: health, token verification, and the emotion/symptom
/// catalogs. Everything user-scoped sits behind `require_auth`.
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Token verification without provisioning
        .route("/auth/verify-token", get(auth_handlers::verify_token))
        // ====================================================================
        // Catalogs
        // ====================================================================
        .route(
            "/emotions",
            get(emotion_handlers::list_emotions).post(emotion_handlers::add_emotion),
        )
        .route(
            "/symptoms",
            get(symptom_handlers::list_symptoms).post(symptom_handlers::add_symptom),
        );

    let protected = Router::new()
        .route("/auth/me", get(auth_handlers::me))
        .route(
            "/emotions/frequency",
            get(emotion_handlers::emotion_frequency),
        )
        .route(
            "/symptoms/symptoms-time-patterns",
            get(symptom_handlers::symptom_time_patterns),
        )
        // ====================================================================
        // Thought records
        // ====================================================================
        .route(
            "/thought-records",
            get(thought_handlers::list_thought_records)
                .post(thought_handlers::create_thought_record),
        )
        .route(
            "/thought-records/patterns",
            get(thought_handlers::thought_patterns),
        )
        .route(
            "/thought-records/insights-summary",
            get(thought_handlers::insights_summary),
        )
        .route(
            "/thought-records/{record_id}",
            axum::routing::put(thought_handlers::update_thought_record)
                .delete(thought_handlers::delete_thought_record),
        )
        // ====================================================================
        // Emotion records
        // ====================================================================
        .route(
            "/emotion-records",
            get(emotion_record_handlers::list_emotion_records)
                .post(emotion_record_handlers::create_emotion_record),
        )
        .route(
            "/emotion-records/patterns",
            get(emotion_record_handlers::emotion_patterns),
        )
        .route(
            "/emotion-records/{record_id}",
            axum::routing::put(emotion_record_handlers::update_emotion_record)
                .delete(emotion_record_handlers::delete_emotion_record),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Tests
// ============================================================================
