//! Audit trail of user actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One recorded action, joined with the actor's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Acting user; null once the user is deleted.
    pub actor_id: Option<Uuid>,
    /// Display name of the acting user.
    pub actor_name: Option<String>,
    /// Dotted action name such as `stock.adjust` or `location.delete`.
    pub action: String,
    /// Kind of record acted on, e.g. `inventory_item`.
    pub target_type: String,
    /// Record acted on.
    pub target_id: Option<Uuid>,
    /// Action-specific payload.
    pub details: Option<serde_json::Value>,
    /// Client address from the request.
    pub ip_address: Option<String>,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`AuditLogEntry`].
#[derive(Debug, Clone)]
pub struct CreateAuditLogEntry {
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub target_type: String,
    pub target_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

/// Audit log search; every field narrows the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Acting user.
    #[serde(default)]
    pub actor_id: Option<Uuid>,
    /// Action name or dotted prefix: `stock` matches `stock.adjust` and `stock.transfer`.
    #[serde(default)]
    pub action: Option<String>,
    /// Target kind.
    #[serde(default)]
    pub target_type: Option<String>,
    /// Target record.
    #[serde(default)]
    pub target_id: Option<Uuid>,
}

impl AuditFilter {
    /// `LIKE` pattern for the action filter: exact name or any action under it.
    pub fn action_patterns(&self) -> Option<(String, String)> {
        let action = self.action.as_deref()?.trim().trim_end_matches('.');
        if action.is_empty() {
            return None;
        }
        let escaped = action.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        Some((action.to_string(), format!("{escaped}.%")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_patterns() {
        let filter = AuditFilter {
            action: Some("stock.".to_string()),
            ..AuditFilter::default()
        };
        assert_eq!(
            filter.action_patterns(),
            Some(("stock".to_string(), "stock.%".to_string()))
        );

        let underscored = AuditFilter {
            action: Some("bulk_move".to_string()),
            ..AuditFilter::default()
        };
        assert_eq!(underscored.action_patterns().unwrap().1, "bulk\\_move.%");

        assert_eq!(AuditFilter::default().action_patterns(), None);
    }
}
