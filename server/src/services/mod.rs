//! Business logic services

pub mod auth;
pub mod payment;
pub mod valentine;

pub use auth::{AuthService, HttpIdentityProvider, IdentityError, IdentityProvider, SignedIn};
pub use payment::{
    sign_payment, verify_payment_signature, GatewayError, GatewayOrder, GatewayOrderRequest,
    PaymentGateway, PaymentService, RazorpayGateway,
};
pub use valentine::ValentineService;
