//! Tenant invitation model and the status → action policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::{Entity, InvitationId, OrganizationRoleId, TenantId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

/// Invitation lifecycle status, as reported by the tenant API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvitationStatus {
    /// Sent and waiting for the invitee.
    Pending,
    /// The invitee joined the tenant.
    Accepted,
    /// Passed `expires_at` without being accepted.
    Expired,
    /// Withdrawn by a tenant admin.
    Revoked,
}

impl core::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "Pending"),
            InvitationStatus::Accepted => write!(f, "Accepted"),
            InvitationStatus::Expired => write!(f, "Expired"),
            InvitationStatus::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Visual tone of the status tag shown next to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Alert,
    Success,
    Error,
    Info,
}

impl InvitationStatus {
    pub fn tone(&self) -> StatusTone {
        match self {
            InvitationStatus::Pending => StatusTone::Alert,
            InvitationStatus::Accepted => StatusTone::Success,
            InvitationStatus::Revoked => StatusTone::Error,
            InvitationStatus::Expired => StatusTone::Info,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Row actions offered for an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationAction {
    ResendInvite,
    Revoke,
    DeleteRecord,
}

impl core::fmt::Display for InvitationAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvitationAction::ResendInvite => write!(f, "resend_invite"),
            InvitationAction::Revoke => write!(f, "revoke"),
            InvitationAction::DeleteRecord => write!(f, "delete_invitation_record"),
        }
    }
}

/// Actions that apply to an invitation in `status`, in menu order.
///
/// Accepted invitations can't be re-sent, only pending ones can be revoked,
/// and pending ones must be revoked before their record can be deleted.
pub fn available_actions(status: InvitationStatus) -> Vec<InvitationAction> {
    let mut actions = Vec::with_capacity(2);
    if status != InvitationStatus::Accepted {
        actions.push(InvitationAction::ResendInvite);
    }
    if status == InvitationStatus::Pending {
        actions.push(InvitationAction::Revoke);
    }
    if status != InvitationStatus::Pending {
        actions.push(InvitationAction::DeleteRecord);
    }
    actions
}

// ─────────────────────────────────────────────────────────────────────────────
// Invitation
// ─────────────────────────────────────────────────────────────────────────────

/// Organization role granted to the invitee on acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRole {
    pub id: OrganizationRoleId,
    pub name: String,
}

/// A tenant member invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInvitation {
    pub id: InvitationId,
    pub tenant_id: TenantId,
    pub inviter_id: Option<UserId>,
    /// Invitee email address.
    pub invitee: String,
    pub status: InvitationStatus,
    pub organization_roles: Vec<OrganizationRole>,
    pub accepted_user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TenantInvitation {
    pub fn allows(&self, action: InvitationAction) -> bool {
        available_actions(self.status).contains(&action)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Entity for TenantInvitation {
    type Id = InvitationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
