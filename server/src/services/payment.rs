//! Payment service layer - pricing, gateway orders and signature checks

use std::sync::Arc;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use validator::Validate;

use crate::config::RazorpayConfig;
use crate::error::ApiError;
use crate::models::{
    BundleType, CreateOrderRequest, MessageResponse, OrderCreated, PriceTable, Pricing, User,
    VerifyPaymentRequest, DEFAULT_TIMEZONE,
};
use crate::store::Store;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway credentials are not configured")]
    NotConfigured,

    #[error("payment gateway rejected the order (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("payment gateway unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OrderNotes {
    pub bundle_type: String,
    pub timezone: String,
}

/// Body of the gateway's create-order call
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GatewayOrderRequest {
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
}

/// Razorpay orders API over basic auth
pub struct RazorpayGateway {
    http: Client,
    config: RazorpayConfig,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, order: &GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        if !self.config.is_configured() {
            return Err(GatewayError::NotConfigured);
        }

        let url = format!("{}/orders", self.config.api_url.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }
}

fn payment_mac(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    Some(mac)
}

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"` under the gateway secret.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> Option<String> {
    let mac = payment_mac(secret, order_id, payment_id)?;
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a gateway signature.
pub fn verify_payment_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    payment_mac(secret, order_id, payment_id)
        .is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

/// Payment service for checkout of valentine drafts
pub struct PaymentService {
    store: Arc<dyn Store>,
    gateway: Arc<dyn PaymentGateway>,
    key_secret: String,
}

impl PaymentService {
    pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>, key_secret: String) -> Self {
        Self {
            store,
            gateway,
            key_secret,
        }
    }

    pub fn pricing(&self, timezone: &str) -> Pricing {
        PriceTable::for_timezone(timezone).pricing(timezone)
    }

    /// Opens a gateway order priced from the server's table. Client-sent
    /// amounts are ignored.
    #[tracing::instrument(name = "Create payment order", skip(self, user, request), fields(valentine_id = %request.valentine_id))]
    pub async fn create_order(
        &self,
        user: &User,
        request: CreateOrderRequest,
    ) -> Result<OrderCreated, ApiError> {
        request.validate()?;

        let valentine = self
            .store
            .get_valentine(&request.valentine_id)
            .await?
            .filter(|v| v.user_id == user.user_id)
            .ok_or(ApiError::NotFound("Valentine"))?;

        let bundle = BundleType::from_name(request.bundle_type.as_deref());
        let timezone = request
            .timezone
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let table = PriceTable::for_timezone(&timezone);

        let order = self
            .gateway
            .create_order(&GatewayOrderRequest {
                amount: table.minor_units(bundle),
                currency: table.currency.to_string(),
                receipt: valentine.valentine_id.clone(),
                notes: OrderNotes {
                    bundle_type: bundle.as_str().to_string(),
                    timezone,
                },
            })
            .await
            .map_err(|e| match e {
                GatewayError::NotConfigured => ApiError::NotConfigured("Payment gateway"),
                other => ApiError::Upstream(other.to_string()),
            })?;

        self.store
            .attach_order(&valentine.valentine_id, &order.id)
            .await?;

        tracing::info!(order_id = %order.id, bundle = bundle.as_str(), "payment order created");

        Ok(OrderCreated {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            bundle_type: bundle,
            display_amount: table.display_amount(bundle),
        })
    }

    /// Checks the gateway signature and marks the draft completed.
    #[tracing::instrument(name = "Verify payment", skip(self, user, request), fields(valentine_id = %request.valentine_id))]
    pub async fn verify(
        &self,
        user: &User,
        request: VerifyPaymentRequest,
    ) -> Result<MessageResponse, ApiError> {
        request.validate()?;

        if !verify_payment_signature(
            &self.key_secret,
            &request.order_id,
            &request.payment_id,
            &request.signature,
        ) {
            tracing::warn!("payment signature mismatch");
            return Err(ApiError::InvalidSignature);
        }

        let valentine = self
            .store
            .get_valentine(&request.valentine_id)
            .await?
            .filter(|v| v.user_id == user.user_id)
            .ok_or(ApiError::NotFound("Valentine"))?;

        if valentine.order_id.as_deref() != Some(request.order_id.as_str()) {
            return Err(ApiError::InvalidRequest(
                "Order does not belong to this valentine".to_string(),
            ));
        }

        if valentine.is_paid() {
            return Ok(MessageResponse::new("Payment verified successfully"));
        }

        self.store
            .mark_paid(&valentine.valentine_id, &request.payment_id)
            .await?;

        tracing::info!(payment_id = %request.payment_id, "payment completed");

        Ok(MessageResponse::new("Payment verified successfully"))
    }
}
