//! Maintenance job selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Scheduled maintenance jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceAction {
    /// Zero activity counters not yet reset today
    ResetActivity,
    /// Snapshot user activity and photo ratings into `daily_stats`
    UpdateStats,
}

impl MaintenanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResetActivity => "reset_activity",
            Self::UpdateStats => "update_stats",
        }
    }
}

impl Default for MaintenanceAction {
    fn default() -> Self {
        Self::UpdateStats
    }
}

impl fmt::Display for MaintenanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset_activity" => Ok(Self::ResetActivity),
            "update_stats" => Ok(Self::UpdateStats),
            other => Err(ValidationError::InvalidVariant {
                field: "action",
                value: other.to_owned(),
            }),
        }
    }
}

/// Query string of `POST /maintenance`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceQuery {
    pub action: Option<String>,
}

impl MaintenanceQuery {
    pub fn action(&self) -> Result<MaintenanceAction, ValidationError> {
        self.action
            .as_deref()
            .map_or(Ok(MaintenanceAction::default()), str::parse)
    }
}
