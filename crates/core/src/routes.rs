//! Navigation targets the host renders.

use crate::types::EntityId;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const TASHIH_DASHBOARD_PATH: &str = "/dashboard/tashih";

/// A page the host can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    TashihDashboard,
    TaqrirKhassReview(EntityId),
    TaqrirJamaiReview(EntityId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Login => LOGIN_PATH.to_string(),
            Self::Dashboard => DASHBOARD_PATH.to_string(),
            Self::TashihDashboard => TASHIH_DASHBOARD_PATH.to_string(),
            Self::TaqrirKhassReview(id) => format!("{TASHIH_DASHBOARD_PATH}/taqrir-khass/{id}"),
            Self::TaqrirJamaiReview(id) => format!("{TASHIH_DASHBOARD_PATH}/taqrir-jamai/{id}"),
        }
    }

    /// The dynamic `id` route parameter, if the page has one.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::TaqrirKhassReview(id) | Self::TaqrirJamaiReview(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
