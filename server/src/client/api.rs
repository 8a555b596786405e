//! Typed client for the REST contract

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use thiserror::Error;

use crate::models::{
    Answer, CreateOrderRequest, CreateValentineRequest, MessageResponse, OrderCreated, Pricing,
    TemplateDescriptor, User, Valentine, VerifyPaymentRequest,
};
use crate::services::auth::SESSION_ID_HEADER;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Message suitable for an error toast.
    pub fn detail(&self) -> String {
        match self {
            ClientError::Rejected { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Every call the web client makes to the backend.
#[async_trait]
pub trait Api: Send + Sync {
    async fn templates(&self) -> Result<Vec<TemplateDescriptor>, ClientError>;

    async fn create_valentine(
        &self,
        request: &CreateValentineRequest,
    ) -> Result<Valentine, ClientError>;

    async fn list_valentines(&self) -> Result<Vec<Valentine>, ClientError>;

    async fn get_valentine(&self, id: &str) -> Result<Valentine, ClientError>;

    async fn submit_response(&self, id: &str, answer: Answer)
        -> Result<MessageResponse, ClientError>;

    async fn pricing(&self, timezone: &str) -> Result<Pricing, ClientError>;

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderCreated, ClientError>;

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<MessageResponse, ClientError>;

    async fn me(&self) -> Result<User, ClientError>;

    async fn exchange_session(&self, session_id: &str) -> Result<User, ClientError>;

    async fn logout(&self) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// `Api` over HTTP. The session cookie lives in the client's cookie jar.
#[derive(Clone, Debug)]
pub struct HttpApi {
    http: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/valentines/{id}/{tail..}` with the id percent-encoded as a
    /// single path segment.
    fn valentine_url(&self, id: &str, tail: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.url("/api/valentines"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(id)
            .extend(tail);
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            s if s.is_success() => Ok(response.json::<T>().await?),
            s => {
                let text = response.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<ErrorBody>(&text)
                    .map(|body| body.detail)
                    .unwrap_or(text);
                Err(ClientError::Rejected {
                    status: s.as_u16(),
                    detail,
                })
            }
        }
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn templates(&self) -> Result<Vec<TemplateDescriptor>, ClientError> {
        let response = self.http.get(self.url("/api/templates")).send().await?;
        Self::read(response).await
    }

    async fn create_valentine(
        &self,
        request: &CreateValentineRequest,
    ) -> Result<Valentine, ClientError> {
        let response = self
            .http
            .post(self.url("/api/valentines"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn list_valentines(&self) -> Result<Vec<Valentine>, ClientError> {
        let response = self.http.get(self.url("/api/valentines")).send().await?;
        Self::read(response).await
    }

    async fn get_valentine(&self, id: &str) -> Result<Valentine, ClientError> {
        let response = self
            .http
            .get(self.valentine_url(id, &[])?)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn submit_response(
        &self,
        id: &str,
        answer: Answer,
    ) -> Result<MessageResponse, ClientError> {
        let response = self
            .http
            .post(self.valentine_url(id, &["response"])?)
            .json(&json!({ "response": answer.as_str() }))
            .send()
            .await?;
        Self::read(response).await
    }

    async fn pricing(&self, timezone: &str) -> Result<Pricing, ClientError> {
        let response = self
            .http
            .post(self.url("/api/payment/pricing"))
            .json(&json!({ "timezone": timezone }))
            .send()
            .await?;
        Self::read(response).await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderCreated, ClientError> {
        let response = self
            .http
            .post(self.url("/api/payment/create-order"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<MessageResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/payment/verify"))
            .json(request)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn me(&self) -> Result<User, ClientError> {
        let response = self.http.get(self.url("/api/auth/me")).send().await?;
        Self::read(response).await
    }

    async fn exchange_session(&self, session_id: &str) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/session"))
            .header(SESSION_ID_HEADER, session_id)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/api/auth/logout")).send().await?;
        Self::read::<MessageResponse>(response).await.map(|_| ())
    }
}
