//! `warden-tenants` — tenant member invitations as driven from the console.
//!
//! The invitation records live behind a remote tenant API; this crate owns the
//! rules for which actions apply to which invitation and the calls made to
//! carry them out.

pub mod api;
pub mod console;
pub mod in_memory;
pub mod invitation;

pub use api::{CreateInvitations, TenantApiError, TenantInvitationsApi};
pub use console::{InvitationError, InvitationNotice, InvitationsConsole};
pub use in_memory::InMemoryTenantInvitationsApi;
pub use invitation::{
    InvitationAction, InvitationStatus, OrganizationRole, StatusTone, TenantInvitation,
    available_actions,
};
