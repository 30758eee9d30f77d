//! Page navigation guard.
//!
//! Decides, from the requested path and the visitor's role, whether a page
//! request proceeds or is redirected. Fetching the session is left to the
//! caller; `role` is `None` when there is no session.

use crate::models::Role;

/// Pages only meaningful to signed-out visitors.
pub const AUTH_ROUTES: &[&str] = &[
    "/signin",
    "/signup",
    "/reset-password",
    "/forgot-password",
    "/email-verified",
];

/// Prefixes that require a session.
pub const PROTECTED_ROUTES: &[&str] = &["/admin", "/account"];

const PASSTHROUGH_PREFIXES: &[&str] = &["/api", "/trpc"];

const SIGNIN: &str = "/signin";
const ADMIN_HOME: &str = "/admin";
const ACCOUNT_HOME: &str = "/account";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Redirect(&'static str),
}

fn is_passthrough(path: &str) -> bool {
    PASSTHROUGH_PREFIXES.iter().any(|p| path.starts_with(p))
}

fn is_auth_route(path: &str) -> bool {
    AUTH_ROUTES.contains(&path)
}

fn is_protected(path: &str) -> bool {
    PROTECTED_ROUTES.iter().any(|p| path.starts_with(p))
}

/// Whether deciding on `path` depends on the session at all.
pub fn needs_session(path: &str) -> bool {
    !is_passthrough(path) && (is_auth_route(path) || is_protected(path))
}

pub fn decide(path: &str, role: Option<Role>) -> Navigation {
    if !needs_session(path) {
        return Navigation::Next;
    }

    let Some(role) = role else {
        return if is_protected(path) {
            Navigation::Redirect(SIGNIN)
        } else {
            Navigation::Next
        };
    };

    if is_auth_route(path) {
        return match role {
            Role::Admin => Navigation::Redirect(ADMIN_HOME),
            Role::User => Navigation::Redirect(ACCOUNT_HOME),
            Role::Moderator => Navigation::Next,
        };
    }

    match role {
        Role::Admin if path.starts_with(ACCOUNT_HOME) => Navigation::Redirect(ADMIN_HOME),
        Role::User if path.starts_with(ADMIN_HOME) => Navigation::Redirect(ACCOUNT_HOME),
        _ => Navigation::Next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths_pass_through() {
        assert_eq!(decide("/api/tasks", None), Navigation::Next);
        assert_eq!(decide("/trpc/anything", Some(Role::User)), Navigation::Next);
        assert!(!needs_session("/api/auth/get-session"));
    }

    #[test]
    fn test_signed_in_user_leaves_auth_pages() {
        assert_eq!(
            decide("/signin", Some(Role::User)),
            Navigation::Redirect("/account")
        );
        assert_eq!(
            decide("/signup", Some(Role::Admin)),
            Navigation::Redirect("/admin")
        );
        assert_eq!(decide("/signin", Some(Role::Moderator)), Navigation::Next);
        assert_eq!(decide("/signin", None), Navigation::Next);
    }

    #[test]
    fn test_protected_pages_need_a_session() {
        assert_eq!(decide("/admin", None), Navigation::Redirect("/signin"));
        assert_eq!(
            decide("/account/settings", None),
            Navigation::Redirect("/signin")
        );
    }

    #[test]
    fn test_roles_are_sent_to_their_area() {
        assert_eq!(
            decide("/account", Some(Role::Admin)),
            Navigation::Redirect("/admin")
        );
        assert_eq!(
            decide("/admin/users", Some(Role::User)),
            Navigation::Redirect("/account")
        );
        assert_eq!(decide("/admin/users", Some(Role::Admin)), Navigation::Next);
        assert_eq!(decide("/account", Some(Role::User)), Navigation::Next);
    }

    #[test]
    fn test_missing_role_is_treated_as_user() {
        let role = Role::from_db(None);
        assert_eq!(
            decide("/signin", Some(role)),
            Navigation::Redirect("/account")
        );
        assert_eq!(
            decide("/admin", Some(role)),
            Navigation::Redirect("/account")
        );
        assert_eq!(decide("/account", Some(role)), Navigation::Next);
    }

    #[test]
    fn test_public_pages() {
        assert!(!needs_session("/"));
        assert!(!needs_session("/signin/extra"));
        assert_eq!(decide("/pricing", None), Navigation::Next);
    }
}
