use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use warden_core::{InvitationId, OrganizationRoleId, TenantId};

use crate::api::{CreateInvitations, TenantApiError, TenantInvitationsApi};
use crate::invitation::{InvitationStatus, OrganizationRole, TenantInvitation};

#[derive(Debug, Default)]
struct State {
    invitations: HashMap<(TenantId, InvitationId), TenantInvitation>,
    roles: HashMap<OrganizationRoleId, OrganizationRole>,
    messages: Vec<(TenantId, InvitationId)>,
}

/// In-memory tenant API for tests/dev.
///
/// Applies the same state rules as the hosted service: only pending
/// invitations can be revoked or accepted, pending ones can't be deleted, and
/// accepted ones can't be re-sent. Pending invitations past `expires_at` are
/// reported as expired.
#[derive(Debug, Default)]
pub struct InMemoryTenantInvitationsApi {
    state: RwLock<State>,
}

fn poisoned<E>(_: E) -> TenantApiError {
    TenantApiError::Transport("tenant api state lock poisoned".to_string())
}

impl InMemoryTenantInvitationsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an organization role available for new invitations.
    pub fn register_role(&self, role: OrganizationRole) -> Result<(), TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.roles.insert(role.id, role);
        Ok(())
    }

    /// Seed an invitation as-is.
    pub fn insert(&self, invitation: TenantInvitation) -> Result<(), TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state
            .invitations
            .insert((invitation.tenant_id, invitation.id), invitation);
        Ok(())
    }

    /// Invitation messages sent so far for `tenant_id`, oldest first.
    pub fn sent_messages(&self, tenant_id: TenantId) -> Result<Vec<InvitationId>, TenantApiError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .messages
            .iter()
            .filter(|(tid, _)| *tid == tenant_id)
            .map(|(_, id)| *id)
            .collect())
    }
}

impl State {
    fn invitation_mut(
        &mut self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<&mut TenantInvitation, TenantApiError> {
        let invitation = self
            .invitations
            .get_mut(&(tenant_id, invitation_id))
            .ok_or(TenantApiError::NotFound(invitation_id))?;

        if invitation.status == InvitationStatus::Pending && invitation.is_expired_at(Utc::now()) {
            invitation.status = InvitationStatus::Expired;
        }
        Ok(invitation)
    }
}

fn invalid_state(invitation: &TenantInvitation, message: &str) -> TenantApiError {
    TenantApiError::InvalidState {
        id: invitation.id,
        status: invitation.status,
        message: message.to_string(),
    }
}

impl TenantInvitationsApi for InMemoryTenantInvitationsApi {
    fn list_invitations(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<TenantInvitation>, TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let now = Utc::now();

        let mut invitations: Vec<TenantInvitation> = state
            .invitations
            .iter_mut()
            .filter(|((tid, _), _)| *tid == tenant_id)
            .map(|(_, invitation)| {
                if invitation.status == InvitationStatus::Pending && invitation.is_expired_at(now) {
                    invitation.status = InvitationStatus::Expired;
                }
                invitation.clone()
            })
            .collect();

        // Newest first; ids break ties between invitations created together.
        invitations.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(invitations)
    }

    fn create_invitations(
        &self,
        tenant_id: TenantId,
        request: CreateInvitations,
    ) -> Result<Vec<TenantInvitation>, TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let now = Utc::now();

        let organization_roles = request
            .role_ids
            .iter()
            .map(|id| {
                state
                    .roles
                    .get(id)
                    .cloned()
                    .ok_or_else(|| TenantApiError::BadRequest(format!("unknown role: {id}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for invitee in &request.invitees {
            let already_pending = state.invitations.values().any(|existing| {
                existing.tenant_id == tenant_id
                    && existing.invitee == *invitee
                    && existing.status == InvitationStatus::Pending
                    && !existing.is_expired_at(now)
            });
            if already_pending {
                return Err(TenantApiError::BadRequest(format!(
                    "{invitee} already has a pending invitation"
                )));
            }
        }

        let created: Vec<TenantInvitation> = request
            .invitees
            .iter()
            .map(|invitee| TenantInvitation {
                id: InvitationId::new(),
                tenant_id,
                inviter_id: request.inviter_id,
                invitee: invitee.clone(),
                status: InvitationStatus::Pending,
                organization_roles: organization_roles.clone(),
                accepted_user_id: None,
                created_at: now,
                updated_at: now,
                expires_at: request.expires_at,
            })
            .collect();

        for invitation in &created {
            state
                .invitations
                .insert((tenant_id, invitation.id), invitation.clone());
            state.messages.push((tenant_id, invitation.id));
        }
        Ok(created)
    }

    fn update_invitation_status(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
        status: InvitationStatus,
    ) -> Result<TenantInvitation, TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let invitation = state.invitation_mut(tenant_id, invitation_id)?;

        match status {
            InvitationStatus::Revoked | InvitationStatus::Accepted => {
                if invitation.status != InvitationStatus::Pending {
                    return Err(invalid_state(
                        invitation,
                        "only pending invitations can change status",
                    ));
                }
            }
            InvitationStatus::Pending | InvitationStatus::Expired => {
                return Err(TenantApiError::BadRequest(format!(
                    "status can't be set to {status}"
                )));
            }
        }

        invitation.status = status;
        invitation.updated_at = Utc::now();
        Ok(invitation.clone())
    }

    fn delete_invitation(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let invitation = state.invitation_mut(tenant_id, invitation_id)?;

        if invitation.status == InvitationStatus::Pending {
            return Err(invalid_state(invitation, "pending invitations must be revoked first"));
        }

        state.invitations.remove(&(tenant_id, invitation_id));
        Ok(())
    }

    fn resend_invitation_message(
        &self,
        tenant_id: TenantId,
        invitation_id: InvitationId,
    ) -> Result<(), TenantApiError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let invitation = state.invitation_mut(tenant_id, invitation_id)?;

        if invitation.status == InvitationStatus::Accepted {
            return Err(invalid_state(invitation, "invitation was already accepted"));
        }

        state.messages.push((tenant_id, invitation_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pending(tenant_id: TenantId, invitee: &str, expires_in: Duration) -> TenantInvitation {
        let now = Utc::now();
        TenantInvitation {
            id: InvitationId::new(),
            tenant_id,
            inviter_id: None,
            invitee: invitee.to_string(),
            status: InvitationStatus::Pending,
            organization_roles: vec![],
            accepted_user_id: None,
            created_at: now,
            updated_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn lapsed_pending_invitation_is_listed_as_expired() {
        let api = InMemoryTenantInvitationsApi::new();
        let tenant_id = TenantId::new();
        api.insert(pending(tenant_id, "late@example.com", Duration::seconds(-1)))
            .unwrap();

        let listed = api.list_invitations(tenant_id).unwrap();
        assert_eq!(listed[0].status, InvitationStatus::Expired);
    }

    #[test]
    fn other_tenants_see_nothing() {
        let api = InMemoryTenantInvitationsApi::new();
        let tenant_id = TenantId::new();
        let invitation = pending(tenant_id, "a@example.com", Duration::days(7));
        let id = invitation.id;
        api.insert(invitation).unwrap();

        let other = TenantId::new();
        assert!(api.list_invitations(other).unwrap().is_empty());
        assert_eq!(
            api.resend_invitation_message(other, id),
            Err(TenantApiError::NotFound(id))
        );
    }

    #[test]
    fn pending_cannot_be_deleted() {
        let api = InMemoryTenantInvitationsApi::new();
        let tenant_id = TenantId::new();
        let invitation = pending(tenant_id, "a@example.com", Duration::days(7));
        let id = invitation.id;
        api.insert(invitation).unwrap();

        let err = api.delete_invitation(tenant_id, id).unwrap_err();
        assert!(matches!(
            err,
            TenantApiError::InvalidState { status: InvitationStatus::Pending, .. }
        ));
    }

    #[test]
    fn status_cannot_be_reset_to_pending() {
        let api = InMemoryTenantInvitationsApi::new();
        let tenant_id = TenantId::new();
        let invitation = pending(tenant_id, "a@example.com", Duration::days(7));
        let id = invitation.id;
        api.insert(invitation).unwrap();

        assert!(matches!(
            api.update_invitation_status(tenant_id, id, InvitationStatus::Pending),
            Err(TenantApiError::BadRequest(_))
        ));
    }

    #[test]
    fn unknown_role_is_a_bad_request() {
        let api = InMemoryTenantInvitationsApi::new();
        let result = api.create_invitations(
            TenantId::new(),
            CreateInvitations {
                inviter_id: None,
                invitees: vec!["a@example.com".to_string()],
                role_ids: vec![OrganizationRoleId::new()],
                expires_at: Utc::now() + Duration::days(7),
            },
        );
        assert!(matches!(result, Err(TenantApiError::BadRequest(_))));
    }
}
