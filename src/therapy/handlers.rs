use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;
use crate::therapy::dto::{
    HealthResponse, RoastRequest, RoastResponse, SessionSummaryResponse, TherapyMessageRequest,
    TherapyMessageResponse,
};
use crate::therapy::score::score;
use crate::therapy::session::SessionSummary;

pub fn therapy_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/therapy-message", post(therapy_message))
        .route("/roast-me", post(roast_me))
        .route("/user-sessions/:user_id", get(user_session))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Server is running and ready to provide questionable advice",
        therapy_quality: "Consistently disappointing",
        timestamp: OffsetDateTime::now_utc(),
    })
}

#[instrument(skip(state, payload), fields(user_id = %payload.user_id))]
async fn therapy_message(
    State(state): State<AppState>,
    Json(payload): Json<TherapyMessageRequest>,
) -> Result<Json<TherapyMessageResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation(
            "How can I judge you if you don't tell me what's wrong?".into(),
        ));
    }

    let reply = state.generator.generate(&payload.message).await;
    let meter = score(&reply.response);
    let session = state
        .sessions
        .record_exchange(&payload.user_id, &payload.message, &reply.response, meter.score)
        .await;

    Ok(Json(TherapyMessageResponse {
        therapy_response: reply,
        useless_meter: meter,
        roast_level: session.roast_level,
        message_count: session.messages.len(),
        therapist_mood: "professionally disappointed",
        timestamp: OffsetDateTime::now_utc(),
    }))
}

/// Stateless roast: a canned prompt per topic fed through the same
/// generator and scorer, no session bookkeeping.
#[instrument(skip(state, payload), fields(topic = %payload.topic))]
async fn roast_me(
    State(state): State<AppState>,
    Json(payload): Json<RoastRequest>,
) -> Json<RoastResponse> {
    let prompt = roast_prompt(&payload.topic);
    let roast = state.generator.generate(prompt).await;
    let useless_meter = score(&roast.response);

    Json(RoastResponse {
        roast,
        topic: payload.topic,
        intensity: payload.intensity,
        useless_meter,
        disclaimer: "Roast provided by yourself. You asked for this.",
        timestamp: OffsetDateTime::now_utc(),
    })
}

#[instrument(skip(state))]
async fn user_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<SessionSummaryResponse> {
    let summary = match state.sessions.get(&user_id).await {
        Some(session) => session.summary(),
        None => SessionSummary::empty(),
    };
    Json(SessionSummaryResponse { user_id, summary })
}

fn roast_prompt(topic: &str) -> &'static str {
    match topic {
        "general_existence" => "Roast me about my life choices in general",
        "work_life" => "Roast me about my work and career decisions",
        "relationships" => "Roast me about my relationship skills",
        "self_care" => "Roast me about my self-care routine",
        "decision_making" => "Roast me about how I make decisions",
        _ => "Just roast me about whatever",
    }
}
