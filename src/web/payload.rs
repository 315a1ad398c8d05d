//! JSON request/response types for the HTTP API and the status feed.
//!
//! Request field names are camelCase to match the shipped UI. This layer
//! is pure (no transport), so the whole wire contract is host-testable.

use serde::{Deserialize, Serialize};

use crate::app::commands::{AppCommand, CustomProfile};
use crate::app::events::StatusReport;
use crate::process::ProcessType;

// ───────────────────────────────────────────────────────────────
// Requests
// ───────────────────────────────────────────────────────────────

/// Body of `POST /api/process/start`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    /// Process type discriminant: 1 = holding, 2 = incubation.
    #[serde(rename = "type")]
    pub process_type: u8,
    #[serde(rename = "profileId")]
    pub profile_id: u8,
    #[serde(rename = "startDay", default = "default_start_day")]
    pub start_day: u16,
}

fn default_start_day() -> u16 {
    1
}

impl StartRequest {
    pub fn into_command(self) -> Result<AppCommand, &'static str> {
        let process_type = match ProcessType::from_u8(self.process_type) {
            Some(ProcessType::None) | None => return Err("bad_process_type"),
            Some(t) => t,
        };
        Ok(AppCommand::StartProcess {
            process_type,
            profile_id: self.profile_id,
            start_day: self.start_day,
        })
    }
}

/// Body of `POST /api/profile/custom`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomProfileRequest {
    #[serde(rename = "minF")]
    pub min_f: f32,
    #[serde(rename = "maxF")]
    pub max_f: f32,
    #[serde(rename = "humMin")]
    pub hum_min: f32,
    #[serde(rename = "humMax")]
    pub hum_max: f32,
    #[serde(rename = "totalDays", default)]
    pub total_days: u16,
    #[serde(rename = "turnsPerDay", default)]
    pub turns_per_day: u8,
}

impl CustomProfileRequest {
    pub fn into_command(self) -> AppCommand {
        AppCommand::SetCustomProfile(CustomProfile {
            temp_min_f: self.min_f,
            temp_max_f: self.max_f,
            hum_min: self.hum_min,
            hum_max: self.hum_max,
            total_days: self.total_days,
            turns_per_day: self.turns_per_day,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Responses
// ───────────────────────────────────────────────────────────────

/// Uniform command acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<&'static str>,
}

impl CommandResponse {
    pub fn accepted() -> Self {
        Self { ok: true, err: None }
    }

    pub fn rejected(err: &'static str) -> Self {
        Self {
            ok: false,
            err: Some(err),
        }
    }

    pub fn to_json(&self) -> String {
        // Two scalar fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{\"ok\":false}"))
    }
}

/// Serialize a status snapshot for `GET /api/state` and the push feed.
/// `None` floats become `null`.
pub fn status_json(report: &StatusReport) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| String::from("{}"))
}
