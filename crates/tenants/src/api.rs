//! Remote tenant API seam for invitations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::{InvitationId, OrganizationRoleId, TenantId, UserId};

use crate::invitation::{InvitationStatus, TenantInvitation};

/// Request body for inviting one or more members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitations {
    pub inviter_id: Option<UserId>,
    pub invitees: Vec<String>,
    pub role_ids: Vec<OrganizationRoleId>,
    pub expires_at: DateTime<Utc>,
}

/// Failure reported by the tenant API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantApiError {
    #[error("invitation not found: {0}")]
    NotFound(InvitationId),

    /// The server refused the operation for the invitation's current state.
    #[error("invitation {id} is {status}: {message}")]
    InvalidState {
        id: InvitationId,
        status: InvitationStatus,
        message: String,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Remote tenant API used by the console.
///
/// Every call is tenant-scoped; an invitation id from another tenant behaves
/// as not found.
pub trait TenantInvitationsApi: Send + Sync {
    /// `GET /api/tenants/:tenantId/invitations`
    fn list_invitations(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<TenantInvitation>, TenantApiError>;

    /// `POST /api/tenants/:tenantId/invitations`
    fn create_invitations(
        &self,
        tenant_id: TenantId,
        request: CreateInvitations,
    ) -> Result<Vec<TenantInvitation>, TenantApiError>;

    /// `PATCH /api/tenants/:tenantId/invitations/:invitationId/status`
    fn update_invitation_status(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
        status: InvitationStatus,
    ) -> Result<TenantInvitation, TenantApiError>;

    /// `DELETE /api/tenants/:tenantId/invitations/:invitationId`
    fn delete_invitation(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), TenantApiError>;

    /// `POST /api/tenants/:tenantId/invitations/:invitationId/message`
    fn resend_invitation_message(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), TenantApiError>;
}

impl<A> TenantInvitationsApi for Arc<A>
where
    A: TenantInvitationsApi + ?Sized,
{
    fn list_invitations(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<TenantInvitation>, TenantApiError> {
        (**self).list_invitations(tenant_id)
    }

    fn create_invitations(
        &self,
        tenant_id: TenantId,
        request: CreateInvitations,
    ) -> Result<Vec<TenantInvitation>, TenantApiError> {
        (**self).create_invitations(tenant_id, request)
    }

    fn update_invitation_status(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
        status: InvitationStatus,
    ) -> Result<TenantInvitation, TenantApiError> {
        (**self).update_invitation_status(tenant_id, invitation_id, status)
    }

    fn delete_invitation(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), TenantApiError> {
        (**self).delete_invitation(tenant_id, invitation_id)
    }

    fn resend_invitation_message(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), TenantApiError> {
        (**self).resend_invitation_message(tenant_id, invitation_id)
    }
}
