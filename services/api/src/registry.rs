//! Route Registry
//!
//! The single list of route groups mounted under [`BASE_PATH`]. Prefixes are
//! disjoint, so mounting order has no effect on matching.

use axum::Router;
use std::sync::Arc;
use wisby_core::api::{BASE_PATH, paths};

use crate::handlers;
use crate::state::AppState;

pub struct RouteGroup {
    pub prefix: &'static str,
    pub routes: fn() -> Router<Arc<AppState>>,
}

pub const ROUTE_GROUPS: &[RouteGroup] = &[
    RouteGroup {
        prefix: paths::INDEX,
        routes: handlers::index::routes,
    },
    RouteGroup {
        prefix: paths::TASKS,
        routes: handlers::tasks::routes,
    },
    RouteGroup {
        prefix: paths::GRADE,
        routes: handlers::grade::routes,
    },
    RouteGroup {
        prefix: paths::USER,
        routes: handlers::user::routes,
    },
    RouteGroup {
        prefix: paths::SYSTEM,
        routes: handlers::system::routes,
    },
    RouteGroup {
        prefix: paths::AUTH,
        routes: handlers::auth::routes,
    },
];

/// Content groups served by the content service, not this API. Requests to
/// them reach the 404 fallback.
pub const UNMOUNTED_GROUPS: &[&str] = &[
    "/books",
    "/subjects",
    "/lessons",
    "/answer",
    "/media",
    "/quizzes",
    "/paymentPlans",
    "/section",
    "/studentPayments",
    "/videoLesson",
];

/// Builds the `/api` router from [`ROUTE_GROUPS`].
pub fn register_routes(state: Arc<AppState>) -> Router {
    let api = ROUTE_GROUPS
        .iter()
        .fold(Router::new(), |router, group| {
            // axum does not nest at the root; the index group merges instead.
            if group.prefix == paths::INDEX {
                router.merge((group.routes)())
            } else {
                router.nest(group.prefix, (group.routes)())
            }
        });

    Router::new().nest(BASE_PATH, api).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefixes_are_disjoint() {
        let mounted: Vec<&str> = ROUTE_GROUPS.iter().map(|g| g.prefix).collect();
        let unique: HashSet<&str> = mounted
            .iter()
            .chain(UNMOUNTED_GROUPS.iter())
            .copied()
            .collect();
        assert_eq!(unique.len(), mounted.len() + UNMOUNTED_GROUPS.len());
    }
}
