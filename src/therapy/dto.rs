use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::therapy::generator::TherapyResponse;
use crate::therapy::score::ScoreBreakdown;
use crate::therapy::session::SessionSummary;

#[derive(Debug, Deserialize)]
pub struct TherapyMessageRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TherapyMessageResponse {
    pub therapy_response: TherapyResponse,
    pub useless_meter: ScoreBreakdown,
    pub roast_level: f64,
    pub message_count: usize,
    pub therapist_mood: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct RoastRequest {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_intensity")]
    pub intensity: String,
}

fn default_topic() -> String {
    "general_existence".into()
}

fn default_intensity() -> String {
    "medium".into()
}

#[derive(Debug, Serialize)]
pub struct RoastResponse {
    pub roast: TherapyResponse,
    pub topic: String,
    pub intensity: String,
    pub useless_meter: ScoreBreakdown,
    pub disclaimer: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct SessionSummaryResponse {
    pub user_id: String,
    #[serde(flatten)]
    pub summary: SessionSummary,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub therapy_quality: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
