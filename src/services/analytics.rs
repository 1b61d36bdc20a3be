//! Fire-and-forget usage analytics.
//!
//! Every tracker spawns a detached task: failures are logged at warn and
//! swallowed, never retried, and never surfaced to the user or allowed to
//! block the main flow.

use serde::Serialize;
use tracing::warn;

use crate::{
    dto::contest::ContestMode,
    services::api::ApiClient,
};

/// Whether a contest was AI-generated or drawn from a course bank.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestKind {
    /// AI-generated question set.
    Normal,
    /// Course question bank.
    Nptel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserContestPayload<'a> {
    user_id: &'a str,
    contest_type: ContestKind,
    mode: ContestMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserNptelPayload<'a> {
    user_id: &'a str,
    start_cnt: u32,
    end_cnt: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyUserPayload<'a> {
    user_id: &'a str,
    timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    contest_type: Option<ContestKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<ContestMode>,
    start_cnt: u32,
    end_cnt: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContestPayload<'a> {
    contest_id: &'a str,
    timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NptelPracticePayload<'a> {
    subject: &'a str,
    timestamp: u64,
}

fn fire<T: Serialize>(api: &ApiClient, path: &'static str, payload: &T) {
    let body = match serde_json::to_value(payload) {
        Ok(body) => body,
        Err(err) => {
            warn!(path, error = %err, "analytics payload could not be encoded");
            return;
        }
    };
    let api = api.clone();
    tokio::spawn(async move {
        if let Err(err) = api.post_analytics(path, &body).await {
            warn!(path, error = %err, "analytics post failed");
        }
    });
}

/// Record that a user created or joined a contest.
pub fn track_user_contest(api: &ApiClient, user_id: &str, kind: ContestKind, mode: ContestMode) {
    fire(
        api,
        "/api/analytics/user-contest-analytics",
        &UserContestPayload {
            user_id,
            contest_type: kind,
            mode,
        },
    );
}

/// Record practice starts/completions for a user.
pub fn track_user_practice(api: &ApiClient, user_id: &str, started: u32, finished: u32) {
    fire(
        api,
        "/api/analytics/user-nptel-analytics",
        &UserNptelPayload {
            user_id,
            start_cnt: started,
            end_cnt: finished,
        },
    );
}

/// Record daily activity for a user.
pub fn track_daily_activity(
    api: &ApiClient,
    user_id: &str,
    timestamp: u64,
    kind: Option<ContestKind>,
    mode: Option<ContestMode>,
    started: u32,
    finished: u32,
) {
    fire(
        api,
        "/api/analytics/daily-user-analytics",
        &DailyUserPayload {
            user_id,
            timestamp,
            contest_type: kind,
            mode,
            start_cnt: started,
            end_cnt: finished,
        },
    );
}

/// Record that a contest was created.
pub fn track_contest_created(api: &ApiClient, contest_id: &str, timestamp: u64, topic: Option<&str>) {
    fire(
        api,
        "/api/analytics/contest-analytics",
        &ContestPayload {
            contest_id,
            timestamp,
            topic,
        },
    );
}

/// Record a practice session against its course.
pub fn track_practice_session(api: &ApiClient, subject: &str, timestamp: u64) {
    fire(
        api,
        "/api/analytics/nptel-practice-analytics",
        &NptelPracticePayload { subject, timestamp },
    );
}
