//! Pricing and checkout models

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Timezones billed in the South Asia region.
pub const SOUTH_ASIAN_TIMEZONES: [&str; 9] = [
    "Asia/Kolkata",
    "Asia/Calcutta",
    "Asia/Karachi",
    "Asia/Dhaka",
    "Asia/Colombo",
    "Asia/Kathmandu",
    "Asia/Thimphu",
    "Indian/Maldives",
    "Asia/Kabul",
];

/// Purchasable quantity-of-links tier
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BundleType {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "bundle_3")]
    Bundle3,
    #[serde(rename = "bundle_5")]
    Bundle5,
}

impl BundleType {
    pub const ALL: [BundleType; 3] = [BundleType::Single, BundleType::Bundle3, BundleType::Bundle5];

    pub fn links(&self) -> u32 {
        match self {
            BundleType::Single => 1,
            BundleType::Bundle3 => 3,
            BundleType::Bundle5 => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BundleType::Single => "single",
            BundleType::Bundle3 => "bundle_3",
            BundleType::Bundle5 => "bundle_5",
        }
    }

    /// Unknown or missing bundle names fall back to a single link.
    pub fn from_name(name: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|bundle| Some(bundle.as_str()) == name)
            .unwrap_or_default()
    }
}

/// Regional price list, amounts in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTable {
    pub region: &'static str,
    pub currency: &'static str,
    pub symbol: &'static str,
    pub single: i64,
    pub bundle_3: i64,
    pub bundle_5: i64,
}

const SOUTH_ASIA: PriceTable = PriceTable {
    region: "South Asia",
    currency: "INR",
    symbol: "₹",
    single: 999,
    bundle_3: 2499,
    bundle_5: 3499,
};

const INTERNATIONAL: PriceTable = PriceTable {
    region: "International",
    currency: "USD",
    symbol: "$",
    single: 299,
    bundle_3: 749,
    bundle_5: 1049,
};

impl PriceTable {
    pub fn for_timezone(timezone: &str) -> &'static PriceTable {
        if SOUTH_ASIAN_TIMEZONES.contains(&timezone) {
            &SOUTH_ASIA
        } else {
            &INTERNATIONAL
        }
    }

    pub fn minor_units(&self, bundle: BundleType) -> i64 {
        match bundle {
            BundleType::Single => self.single,
            BundleType::Bundle3 => self.bundle_3,
            BundleType::Bundle5 => self.bundle_5,
        }
    }

    pub fn display_amount(&self, bundle: BundleType) -> f64 {
        to_major(self.minor_units(bundle))
    }

    pub fn pricing(&self, timezone: &str) -> Pricing {
        Pricing {
            timezone: timezone.to_string(),
            region: self.region.to_string(),
            currency: self.currency.to_string(),
            symbol: self.symbol.to_string(),
            prices: Prices {
                single: to_major(self.single),
                bundle_3: to_major(self.bundle_3),
                bundle_5: to_major(self.bundle_5),
            },
        }
    }
}

fn to_major(minor: i64) -> f64 {
    minor as f64 / 100.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prices {
    pub single: f64,
    pub bundle_3: f64,
    pub bundle_5: f64,
}

/// Response of `POST /api/payment/pricing`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pricing {
    pub timezone: String,
    pub region: String,
    pub currency: String,
    pub symbol: String,
    pub prices: Prices,
}

impl Pricing {
    /// Pricing used when the pricing service cannot be reached.
    pub fn fallback(timezone: &str) -> Self {
        PriceTable::for_timezone(timezone).pricing(timezone)
    }

    pub fn price(&self, bundle: BundleType) -> f64 {
        match bundle {
            BundleType::Single => self.prices.single,
            BundleType::Bundle3 => self.prices.bundle_3,
            BundleType::Bundle5 => self.prices.bundle_5,
        }
    }
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Request DTO for `POST /api/payment/create-order`
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub valentine_id: String,
    /// Advisory only, the server prices from its own table.
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub bundle_type: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Order handed to the hosted checkout widget
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderCreated {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub bundle_type: BundleType,
    pub display_amount: f64,
}

/// Identifiers the gateway hands back to the widget's success callback
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    #[validate(length(min = 1))]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    #[validate(length(min = 1))]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    #[validate(length(min = 1))]
    pub signature: String,
    #[validate(length(min = 1))]
    pub valentine_id: String,
}
