use super::api::{Api, ClientError};
use super::auth_gate::RequestContext;
use super::checkout::share_link;
use super::route::{Navigation, Route};
use crate::models::{User, Valentine};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardEntry {
    pub valentine: Valentine,
    /// Only completed records can be shared.
    pub share_link: Option<String>,
}

/// The `/dashboard` screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub user: User,
    pub entries: Vec<DashboardEntry>,
}

impl Dashboard {
    pub async fn load(
        api: &dyn Api,
        context: RequestContext,
        origin: &str,
    ) -> Result<Navigation<Self>, ClientError> {
        let valentines = match api.list_valentines().await {
            Ok(valentines) => valentines,
            Err(ClientError::Unauthorized) => return Ok(Navigation::Redirect(Route::Login)),
            Err(e) => return Err(e),
        };

        let entries = valentines
            .into_iter()
            .map(|valentine| DashboardEntry {
                share_link: valentine
                    .is_paid()
                    .then(|| share_link(origin, &valentine.valentine_id)),
                valentine,
            })
            .collect();

        Ok(Navigation::Show(Self {
            user: context.user,
            entries,
        }))
    }

    /// Signs out and returns to `/login` even if the backend call fails.
    pub async fn logout(api: &dyn Api) -> Route {
        if let Err(e) = api.logout().await {
            tracing::warn!(error = %e, "logout failed");
        }
        Route::Login
    }
}
