use std::fmt;

/// Client-side screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Create,
    Payment(String),
    Success(String),
    Valentine(String),
}

impl Route {
    /// Parses a path, ignoring any query or fragment.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["dashboard"] => Some(Route::Dashboard),
            ["create"] => Some(Route::Create),
            ["payment", id] if !id.is_empty() => Some(Route::Payment(id.to_string())),
            ["success", id] if !id.is_empty() => Some(Route::Success(id.to_string())),
            ["v", id] if !id.is_empty() => Some(Route::Valentine(id.to_string())),
            _ => None,
        }
    }

    /// Screens that sit behind the auth gate.
    pub fn is_owner_facing(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Create | Route::Payment(_) | Route::Success(_)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/login"),
            Route::Dashboard => f.write_str("/dashboard"),
            Route::Create => f.write_str("/create"),
            Route::Payment(id) => write!(f, "/payment/{id}"),
            Route::Success(id) => write!(f, "/success/{id}"),
            Route::Valentine(id) => write!(f, "/v/{id}"),
        }
    }
}

/// Either render a screen or move somewhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation<T> {
    Show(T),
    Redirect(Route),
}

impl<T> Navigation<T> {
    pub fn redirect(&self) -> Option<&Route> {
        match self {
            Navigation::Redirect(route) => Some(route),
            Navigation::Show(_) => None,
        }
    }

    pub fn shown(self) -> Option<T> {
        match self {
            Navigation::Show(screen) => Some(screen),
            Navigation::Redirect(_) => None,
        }
    }
}
