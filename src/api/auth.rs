use super::{message_of, ApiError, BlogApi};
use crate::http::{PendingRequest, Transport};
use crate::types::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

impl<T: Transport> BlogApi<T> {
    pub async fn register(&self, form: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        let request = PendingRequest::post("/api/register/").json(form)?;
        Ok(message_of(&self.direct(request).await?))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.sign_in("/api/login/", email, password).await
    }

    pub async fn admin_login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.sign_in("/api/admin/login/", email, password).await
    }

    async fn sign_in(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        let request = PendingRequest::post(path).json(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        Ok(self.direct(request).await?.json()?)
    }

    /// Revokes the current token server side. Sent once; an expired session is not
    /// refreshed just to end it.
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        let response = self.direct(PendingRequest::post("/api/logout/")).await?;
        Ok(message_of(&response))
    }
}
