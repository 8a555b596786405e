//! Typed web-client flows over the REST contract
//!
//! Each screen is a plain async controller over [`Api`], so the same code
//! drives a real backend through [`HttpApi`] or a fake in tests. Navigation
//! is expressed as [`Route`] values.

pub mod api;
pub mod auth_gate;
pub mod checkout;
pub mod dashboard;
pub mod route;
pub mod session;

pub use api::{Api, ClientError, HttpApi};
pub use auth_gate::{
    session_id_from_fragment, sign_in_url, AuthCallback, AuthGate, CallbackOutcome,
    RequestContext,
};
pub use checkout::{
    share_link, BundleOption, CheckoutError, CheckoutFlow, CreateFlow, CreateForm, FormError,
    GatewayCallback, SuccessPage,
};
pub use dashboard::{Dashboard, DashboardEntry};
pub use route::{Navigation, Route};
pub use session::{Celebration, RecipientSession, SessionView};
