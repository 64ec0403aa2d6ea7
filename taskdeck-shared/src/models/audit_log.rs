/// Audit log model
///
/// The audit log is append-only. Clients read it and post new entries; nothing
/// ever updates or removes one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

/// One audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,

    /// Acting user
    pub user_id: Uuid,

    /// Action label, e.g. `"create"`
    pub action: String,

    /// Kind of resource acted on, e.g. `"task"`
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    pub timestamp: DateTime<Utc>,

    /// Free-form context supplied by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

/// Body of `POST /audit-log`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditEntry {
    #[validate(length(min = 1, max = 100, message = "Action must be between 1 and 100 characters"))]
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl NewAuditEntry {
    pub fn new(action: impl Into<String>, details: Option<JsonValue>) -> Self {
        Self {
            action: action.into(),
            resource_type: None,
            resource_id: None,
            details,
        }
    }
}

/// Coarse classification of an action label, used for badges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Other,
}

impl AuditAction {
    /// Classifies an action label case-insensitively
    pub fn classify(action: &str) -> Self {
        match action.to_lowercase().as_str() {
            "create" => AuditAction::Create,
            "update" => AuditAction::Update,
            "delete" => AuditAction::Delete,
            _ => AuditAction::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Other => "other",
        }
    }
}
