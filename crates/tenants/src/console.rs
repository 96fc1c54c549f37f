//! Console-side invitation workflow.
//!
//! Every mutating call re-reads the invitation, checks the action against
//! [`available_actions`](crate::invitation::available_actions) and only then
//! talks to the remote API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use warden_core::{DomainError, InvitationId, OrganizationRoleId, TenantId, UserId};

use crate::api::{CreateInvitations, TenantApiError, TenantInvitationsApi};
use crate::invitation::{InvitationAction, InvitationStatus, TenantInvitation};

/// Invitation workflow error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvitationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("action {action} is not available for a {status} invitation")]
    ActionNotAllowed {
        action: InvitationAction,
        status: InvitationStatus,
    },

    #[error("tenant api: {0}")]
    Remote(#[from] TenantApiError),
}

/// Outcome message the presentation layer shows after a successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationNotice {
    InvitationSent,
    InvitationRevoked,
    InvitationDeleted,
}

impl InvitationNotice {
    /// Phrase key under `tenant_members.messages`.
    pub fn message_key(&self) -> &'static str {
        match self {
            InvitationNotice::InvitationSent => "invitation_sent",
            InvitationNotice::InvitationRevoked => "invitation_revoked",
            InvitationNotice::InvitationDeleted => "invitation_deleted",
        }
    }
}

/// Invitation management for one tenant.
#[derive(Debug, Clone)]
pub struct InvitationsConsole<A> {
    api: A,
    tenant_id: TenantId,
}

impl<A> InvitationsConsole<A>
where
    A: TenantInvitationsApi,
{
    pub fn new(api: A, tenant_id: TenantId) -> Self {
        Self { api, tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn list(&self) -> Result<Vec<TenantInvitation>, InvitationError> {
        Ok(self.api.list_invitations(self.tenant_id)?)
    }

    /// Invite `invitees` (email addresses) with the given organization roles.
    pub fn invite(
        &self,
        inviter_id: Option<UserId>,
        invitees: &[String],
        role_ids: Vec<OrganizationRoleId>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<TenantInvitation>, InvitationNotice), InvitationError> {
        if invitees.is_empty() {
            return Err(DomainError::validation("at least one invitee is required").into());
        }
        if expires_at <= now {
            return Err(DomainError::validation("expiration must be in the future").into());
        }

        let mut normalized: Vec<String> = Vec::with_capacity(invitees.len());
        for raw in invitees {
            let email = normalize_email(raw)?;
            if !normalized.contains(&email) {
                normalized.push(email);
            }
        }

        let created = self.api.create_invitations(
            self.tenant_id,
            CreateInvitations {
                inviter_id,
                invitees: normalized,
                role_ids,
                expires_at,
            },
        )?;

        tracing::info!(tenant_id = %self.tenant_id, count = created.len(), "invitations created");
        Ok((created, InvitationNotice::InvitationSent))
    }

    pub fn resend(&self, invitation_id: InvitationId) -> Result<InvitationNotice, InvitationError> {
        self.ensure_allowed(invitation_id, InvitationAction::ResendInvite)?;
        self.api
            .resend_invitation_message(self.tenant_id, invitation_id)?;

        tracing::info!(tenant_id = %self.tenant_id, %invitation_id, "invitation re-sent");
        Ok(InvitationNotice::InvitationSent)
    }

    pub fn revoke(&self, invitation_id: InvitationId) -> Result<InvitationNotice, InvitationError> {
        self.ensure_allowed(invitation_id, InvitationAction::Revoke)?;
        self.api
            .update_invitation_status(self.tenant_id, invitation_id, InvitationStatus::Revoked)?;

        tracing::info!(tenant_id = %self.tenant_id, %invitation_id, "invitation revoked");
        Ok(InvitationNotice::InvitationRevoked)
    }

    pub fn delete(&self, invitation_id: InvitationId) -> Result<InvitationNotice, InvitationError> {
        self.ensure_allowed(invitation_id, InvitationAction::DeleteRecord)?;
        self.api.delete_invitation(self.tenant_id, invitation_id)?;

        tracing::info!(tenant_id = %self.tenant_id, %invitation_id, "invitation deleted");
        Ok(InvitationNotice::InvitationDeleted)
    }

    fn ensure_allowed(
        &self,
        invitation_id: InvitationId,
        action: InvitationAction,
    ) -> Result<TenantInvitation, InvitationError> {
        let invitation = self
            .api
            .list_invitations(self.tenant_id)?
            .into_iter()
            .find(|invitation| invitation.id == invitation_id)
            .ok_or(InvitationError::Domain(DomainError::not_found()))?;

        if !invitation.allows(action) {
            tracing::warn!(
                tenant_id = %self.tenant_id,
                %invitation_id,
                %action,
                status = %invitation.status,
                "invitation action refused"
            );
            return Err(InvitationError::ActionNotAllowed {
                action,
                status: invitation.status,
            });
        }
        Ok(invitation)
    }
}

fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!("invalid email: {raw}")));
    }
    Ok(email)
}
