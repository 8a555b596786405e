//! Creation form, checkout and the owner's success page

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::api::{Api, ClientError};
use super::route::{Navigation, Route};
use crate::models::{
    BundleType, CreateOrderRequest, CreateValentineRequest, OrderCreated, Pricing,
    TemplateDescriptor, TemplateId, Valentine, VerifyPaymentRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please pick a template! 🎭")]
    MissingTemplate,

    #[error("Fill in all fields! ✏️")]
    MissingFields,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("No payment order is open")]
    NoOrder,

    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),

    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Draft as typed into the creation screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    pub template_id: Option<TemplateId>,
    pub emoji_style: String,
    pub background_theme: String,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            from_name: String::new(),
            to_name: String::new(),
            message: String::new(),
            template_id: None,
            emoji_style: "cute".to_string(),
            background_theme: "pink".to_string(),
        }
    }
}

impl CreateForm {
    pub fn validate(&self) -> Result<CreateValentineRequest, FormError> {
        let template_id = self.template_id.ok_or(FormError::MissingTemplate)?;

        if [&self.from_name, &self.to_name, &self.message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(FormError::MissingFields);
        }

        Ok(CreateValentineRequest {
            from_name: self.from_name.clone(),
            to_name: self.to_name.clone(),
            message: self.message.clone(),
            template_id: template_id.as_str().to_string(),
            emoji_style: self.emoji_style.clone(),
            background_theme: self.background_theme.clone(),
        })
    }
}

/// The `/create` screen.
pub struct CreateFlow {
    api: Arc<dyn Api>,
    catalog: Vec<TemplateDescriptor>,
    error: Option<String>,
}

impl CreateFlow {
    /// Loads the template catalog once. A failed load leaves it empty.
    pub async fn load(api: Arc<dyn Api>) -> Self {
        let catalog = api.templates().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "template catalog unavailable");
            Vec::new()
        });

        Self {
            api,
            catalog,
            error: None,
        }
    }

    pub fn catalog(&self) -> &[TemplateDescriptor] {
        &self.catalog
    }

    /// Last error shown to the user.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates locally, then creates the draft and moves to checkout.
    pub async fn submit(&mut self, form: &CreateForm) -> Result<Route, CheckoutError> {
        let request = form.validate().map_err(|e| {
            self.error = Some(e.to_string());
            e
        })?;

        match self.api.create_valentine(&request).await {
            Ok(valentine) => {
                self.error = None;
                Ok(Route::Payment(valentine.valentine_id))
            }
            Err(ClientError::Unauthorized) => Ok(Route::Login),
            Err(e) => {
                self.error = Some(e.detail());
                Err(e.into())
            }
        }
    }
}

/// Priced bundle choice on the checkout screen.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleOption {
    pub bundle: BundleType,
    pub links: u32,
    pub price: f64,
    pub label: String,
}

/// What the hosted widget hands back on success. Untrusted until verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCallback {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// The `/payment/{id}` screen.
pub struct CheckoutFlow {
    api: Arc<dyn Api>,
    valentine: Valentine,
    timezone: String,
    pricing: Pricing,
    selected: BundleType,
    order: Option<OrderCreated>,
    error: Option<String>,
}

impl CheckoutFlow {
    /// Completed records skip straight to the success page.
    pub async fn open(
        api: Arc<dyn Api>,
        id: &str,
        timezone: &str,
    ) -> Result<Navigation<Self>, ClientError> {
        let valentine = match api.get_valentine(id).await {
            Ok(valentine) => valentine,
            Err(ClientError::Unauthorized) => return Ok(Navigation::Redirect(Route::Login)),
            Err(e) => return Err(e),
        };

        if valentine.is_paid() {
            return Ok(Navigation::Redirect(Route::Success(valentine.valentine_id)));
        }

        let pricing = api.pricing(timezone).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "pricing unavailable, showing defaults");
            Pricing::fallback(timezone)
        });

        Ok(Navigation::Show(Self {
            api,
            valentine,
            timezone: timezone.to_string(),
            pricing,
            selected: BundleType::Single,
            order: None,
            error: None,
        }))
    }

    pub fn valentine(&self) -> &Valentine {
        &self.valentine
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn selected(&self) -> BundleType {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn bundles(&self) -> Vec<BundleOption> {
        BundleType::ALL
            .into_iter()
            .map(|bundle| {
                let price = self.pricing.price(bundle);
                BundleOption {
                    bundle,
                    links: bundle.links(),
                    price,
                    label: format!("{}{:.2}", self.pricing.symbol, price),
                }
            })
            .collect()
    }

    pub fn select(&mut self, bundle: BundleType) {
        self.selected = bundle;
    }

    /// Opens a gateway order for the selected bundle.
    pub async fn begin(&mut self) -> Result<&OrderCreated, CheckoutError> {
        let request = CreateOrderRequest {
            valentine_id: self.valentine.valentine_id.clone(),
            amount: Some(self.pricing.price(self.selected)),
            currency: Some(self.pricing.currency.clone()),
            bundle_type: Some(self.selected.as_str().to_string()),
            timezone: Some(self.timezone.clone()),
        };

        match self.api.create_order(&request).await {
            Ok(order) => {
                self.error = None;
                let order = self.order.insert(order);
                Ok(&*order)
            }
            Err(e) => {
                self.error = Some(format!("Failed to start payment: {}", e.detail()));
                Err(e.into())
            }
        }
    }

    /// Server-side verification of the widget callback. Only a verified
    /// payment moves on to the success page.
    pub async fn confirm(&mut self, callback: GatewayCallback) -> Result<Route, CheckoutError> {
        if self.order.is_none() {
            return Err(CheckoutError::NoOrder);
        }

        let request = VerifyPaymentRequest {
            order_id: callback.order_id,
            payment_id: callback.payment_id,
            signature: callback.signature,
            valentine_id: self.valentine.valentine_id.clone(),
        };

        match self.api.verify_payment(&request).await {
            Ok(_) => {
                self.error = None;
                Ok(Route::Success(self.valentine.valentine_id.clone()))
            }
            Err(e) => {
                let detail = e.detail();
                tracing::warn!(valentine_id = %self.valentine.valentine_id, error = %detail, "payment verification failed");
                self.error = Some(format!("Payment verification failed: {detail}"));
                Err(CheckoutError::VerificationFailed(detail))
            }
        }
    }
}

impl fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("valentine", &self.valentine.valentine_id)
            .field("selected", &self.selected)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Public link for a valentine under the app's origin.
pub fn share_link(origin: &str, valentine_id: &str) -> String {
    format!(
        "{}{}",
        origin.trim_end_matches('/'),
        Route::Valentine(valentine_id.to_string())
    )
}

/// The `/success/{id}` screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessPage {
    pub valentine: Valentine,
    pub share_link: String,
}

impl SuccessPage {
    /// Pending records go back to checkout.
    pub async fn open(
        api: &dyn Api,
        id: &str,
        origin: &str,
    ) -> Result<Navigation<Self>, ClientError> {
        let valentine = match api.get_valentine(id).await {
            Ok(valentine) => valentine,
            Err(ClientError::Unauthorized) => return Ok(Navigation::Redirect(Route::Login)),
            Err(e) => return Err(e),
        };

        if !valentine.is_paid() {
            return Ok(Navigation::Redirect(Route::Payment(valentine.valentine_id)));
        }

        Ok(Navigation::Show(Self {
            share_link: share_link(origin, &valentine.valentine_id),
            valentine,
        }))
    }
}
