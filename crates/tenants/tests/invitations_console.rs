use std::sync::Arc;

use chrono::{Duration, Utc};
use warden_core::{DomainError, InvitationId, OrganizationRoleId, TenantId, UserId};
use warden_tenants::{
    InMemoryTenantInvitationsApi, InvitationAction, InvitationError, InvitationNotice,
    InvitationStatus, InvitationsConsole, OrganizationRole, TenantApiError, TenantInvitation,
    TenantInvitationsApi,
};

struct Fixture {
    api: Arc<InMemoryTenantInvitationsApi>,
    console: InvitationsConsole<Arc<InMemoryTenantInvitationsApi>>,
    admin_role: OrganizationRoleId,
}

fn fixture() -> Fixture {
    let api = Arc::new(InMemoryTenantInvitationsApi::new());
    let admin_role = OrganizationRoleId::new();
    api.register_role(OrganizationRole {
        id: admin_role,
        name: "admin".to_string(),
    })
    .unwrap();

    let console = InvitationsConsole::new(Arc::clone(&api), TenantId::new());
    Fixture {
        api,
        console,
        admin_role,
    }
}

fn invite_one(f: &Fixture, email: &str) -> TenantInvitation {
    let now = Utc::now();
    let (mut created, notice) = f
        .console
        .invite(
            Some(UserId::new()),
            &[email.to_string()],
            vec![f.admin_role],
            now + Duration::days(7),
            now,
        )
        .unwrap();
    assert_eq!(notice, InvitationNotice::InvitationSent);
    created.remove(0)
}

fn seed(f: &Fixture, status: InvitationStatus) -> InvitationId {
    let now = Utc::now();
    let invitation = TenantInvitation {
        id: InvitationId::new(),
        tenant_id: f.console.tenant_id(),
        inviter_id: None,
        invitee: format!("{status}@example.com").to_lowercase(),
        status,
        organization_roles: vec![],
        accepted_user_id: None,
        created_at: now,
        updated_at: now,
        expires_at: now + Duration::days(7),
    };
    let id = invitation.id;
    f.api.insert(invitation).unwrap();
    id
}

#[test]
fn invite_creates_pending_invitation_and_sends_message() {
    let f = fixture();
    let invitation = invite_one(&f, "  Bob@Example.com ");

    assert_eq!(invitation.invitee, "bob@example.com");
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.organization_roles[0].name, "admin");

    let listed = f.console.list().unwrap();
    assert_eq!(listed, vec![invitation.clone()]);
    assert_eq!(
        f.api.sent_messages(f.console.tenant_id()).unwrap(),
        vec![invitation.id]
    );
}

#[test]
fn invite_deduplicates_and_validates_input() {
    let f = fixture();
    let now = Utc::now();

    let (created, _) = f
        .console
        .invite(
            None,
            &["a@example.com".to_string(), "A@example.com".to_string()],
            vec![],
            now + Duration::days(1),
            now,
        )
        .unwrap();
    assert_eq!(created.len(), 1);

    let err = f
        .console
        .invite(None, &[], vec![], now + Duration::days(1), now)
        .unwrap_err();
    assert!(matches!(err, InvitationError::Domain(DomainError::Validation(_))));

    let err = f
        .console
        .invite(None, &["b@example.com".to_string()], vec![], now, now)
        .unwrap_err();
    assert!(matches!(err, InvitationError::Domain(DomainError::Validation(_))));

    let err = f
        .console
        .invite(None, &["not-an-email".to_string()], vec![], now + Duration::days(1), now)
        .unwrap_err();
    assert!(matches!(err, InvitationError::Domain(DomainError::Validation(_))));
}

#[test]
fn second_pending_invitation_for_same_invitee_is_refused_remotely() {
    let f = fixture();
    invite_one(&f, "carol@example.com");

    let now = Utc::now();
    let err = f
        .console
        .invite(
            None,
            &["carol@example.com".to_string()],
            vec![],
            now + Duration::days(1),
            now,
        )
        .unwrap_err();
    assert!(matches!(err, InvitationError::Remote(TenantApiError::BadRequest(_))));
}

#[test]
fn revoke_then_delete() {
    let f = fixture();
    let invitation = invite_one(&f, "dave@example.com");

    // Pending invitations must be revoked before their record goes away.
    let err = f.console.delete(invitation.id).unwrap_err();
    assert_eq!(
        err,
        InvitationError::ActionNotAllowed {
            action: InvitationAction::DeleteRecord,
            status: InvitationStatus::Pending,
        }
    );

    assert_eq!(
        f.console.revoke(invitation.id).unwrap(),
        InvitationNotice::InvitationRevoked
    );
    let listed = f.console.list().unwrap();
    assert_eq!(listed[0].status, InvitationStatus::Revoked);

    assert_eq!(
        f.console.revoke(invitation.id).unwrap_err(),
        InvitationError::ActionNotAllowed {
            action: InvitationAction::Revoke,
            status: InvitationStatus::Revoked,
        }
    );

    assert_eq!(
        f.console.delete(invitation.id).unwrap(),
        InvitationNotice::InvitationDeleted
    );
    assert!(f.console.list().unwrap().is_empty());
}

#[test]
fn accepted_invitation_cannot_be_resent() {
    let f = fixture();
    let id = seed(&f, InvitationStatus::Accepted);

    let err = f.console.resend(id).unwrap_err();
    assert_eq!(
        err,
        InvitationError::ActionNotAllowed {
            action: InvitationAction::ResendInvite,
            status: InvitationStatus::Accepted,
        }
    );
    assert!(f.api.sent_messages(f.console.tenant_id()).unwrap().is_empty());

    assert_eq!(f.console.delete(id).unwrap(), InvitationNotice::InvitationDeleted);
}

#[test]
fn expired_invitation_can_be_resent() {
    let f = fixture();
    let id = seed(&f, InvitationStatus::Expired);

    assert_eq!(f.console.resend(id).unwrap(), InvitationNotice::InvitationSent);
    assert_eq!(f.api.sent_messages(f.console.tenant_id()).unwrap(), vec![id]);
}

#[test]
fn refused_actions_never_reach_the_api() {
    let f = fixture();
    let id = seed(&f, InvitationStatus::Pending);

    assert!(f.console.delete(id).is_err());
    // Still present, still pending.
    let listed = f.api.list_invitations(f.console.tenant_id()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, InvitationStatus::Pending);
}

#[test]
fn unknown_or_foreign_invitation_is_not_found() {
    let f = fixture();
    let err = f.console.revoke(InvitationId::new()).unwrap_err();
    assert_eq!(err, InvitationError::Domain(DomainError::NotFound));

    let other = InvitationsConsole::new(Arc::clone(&f.api), TenantId::new());
    let id = seed(&f, InvitationStatus::Revoked);
    assert_eq!(
        other.delete(id).unwrap_err(),
        InvitationError::Domain(DomainError::NotFound)
    );
}
