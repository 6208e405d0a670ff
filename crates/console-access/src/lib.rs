//! Navigation gate over session state.
//!
//! `evaluate` is a pure function of the session snapshot and the roles a
//! destination requires. It holds no state and performs no I/O; the
//! caller renders a placeholder, follows the redirect, or shows the
//! guarded content.

use console_session::SessionSnapshot;
use console_types::Role;

/// Where to send a navigation attempt that may not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The login screen.
    Login,
    /// The "forbidden" screen for authenticated but under-privileged users.
    Forbidden,
}

/// Outcome of gating one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session state is still loading; render a placeholder, do not
    /// redirect yet.
    Pending,
    /// The guarded content may render.
    Allow,
    /// Navigation must be redirected.
    Redirect(Destination),
}

/// Gate a navigation attempt.
///
/// `required_roles: None` means any authenticated user may proceed;
/// `Some(roles)` additionally requires the user's role to be a member.
pub fn evaluate(snapshot: &SessionSnapshot, required_roles: Option<&[Role]>) -> GateDecision {
    if snapshot.loading {
        return GateDecision::Pending;
    }

    let Some(user) = &snapshot.user else {
        return GateDecision::Redirect(Destination::Login);
    };

    if let Some(roles) = required_roles {
        if !roles.contains(&user.role) {
            return GateDecision::Redirect(Destination::Forbidden);
        }
    }

    GateDecision::Allow
}
