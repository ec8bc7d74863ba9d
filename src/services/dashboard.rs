//! Dashboard landing page: counters and navigation.

use crate::api::client::ResourceApi;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::blog::BlogCategory;
use crate::domain::catalog::{Category, Coupon, Course, Enrollment, Group};
use crate::domain::location::{Branch, District, Division};
use crate::domain::people::{Student, Teacher};
use crate::domain::resource::Resource;
use crate::dto::main::{DashboardPageData, NavLink, StatCard};
use crate::services::resources::{display_value, humanize};
use crate::services::{ServiceError, ServiceResult};

fn link<R: Resource>(user: &AuthenticatedUser) -> Option<NavLink> {
    user.can(&R::permission("list")).then(|| NavLink {
        title: R::TITLE,
        path: R::base_path(),
        section: R::SECTION,
    })
}

/// Listing pages the user may open, in sidebar order.
pub fn navigation(user: &AuthenticatedUser) -> Vec<NavLink> {
    [
        link::<Division>(user),
        link::<District>(user),
        link::<Branch>(user),
        link::<Category>(user),
        link::<Course>(user),
        link::<Group>(user),
        link::<Enrollment>(user),
        link::<Coupon>(user),
        link::<BlogCategory>(user),
        link::<Student>(user),
        link::<Teacher>(user),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Loads the counters shown on the dashboard. A failed load keeps the page
/// usable and reports the message instead.
pub async fn load_dashboard<A: ResourceApi>(
    api: &A,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardPageData> {
    let links = navigation(user);

    match api.stats(user).await {
        Ok(success) => Ok(DashboardPageData {
            stats: success
                .data
                .iter()
                .map(|(key, value)| StatCard {
                    label: humanize(key),
                    value: display_value(value),
                })
                .collect(),
            links,
            stats_error: None,
        }),
        Err(err) if err.is_unauthenticated() => Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to load dashboard stats: {err:?}");
            Ok(DashboardPageData {
                stats: Vec::new(),
                links,
                stats_error: Some(err.to_string()),
            })
        }
    }
}
