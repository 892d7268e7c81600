// Auth endpoints
//
// Cookie-based session login/logout plus the account lifecycle flows
// (registration, OTP verification, password reset, device sessions).
// Successful login leaves access and refresh cookies in the client's jar.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::LottoClient;
use crate::error::Error;
use crate::models::{
    DeviceSession, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    ResetTokenResponse,
};

impl LottoClient {
    /// Authenticate with phone + password.
    ///
    /// `POST auth/login`. A 401 here is a credential problem, never a
    /// refresh trigger.
    pub async fn login(&self, phone: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(phone, "logging in");
        let body = json!({
            "phone": phone,
            "password": password.expose_secret(),
        });
        let resp: LoginResponse = self.post("auth/login", &body).await?;
        debug!(user_id = %resp.user.id, role = %resp.user.role, "login successful");
        Ok(resp)
    }

    /// End the current session. `POST auth/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.post_no_response("auth/logout", &json!({})).await
    }

    /// `POST auth/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, Error> {
        debug!(phone = %req.phone, "registering account");
        self.post("auth/register", req).await
    }

    /// Confirm the registration OTP. `POST auth/verify`
    pub async fn verify_otp(&self, user_id: &str, otp: &str) -> Result<MessageResponse, Error> {
        debug!(user_id, "verifying registration otp");
        self.post("auth/verify", &json!({ "userId": user_id, "otp": otp }))
            .await
    }

    /// Send a password-reset OTP. `POST auth/forgot-password`
    pub async fn forgot_password(&self, phone: &str) -> Result<MessageResponse, Error> {
        debug!(phone, "requesting password reset otp");
        self.post("auth/forgot-password", &json!({ "phone": phone }))
            .await
    }

    /// Exchange a reset OTP for a reset token. `POST auth/forgot-password/verify`
    pub async fn verify_forgot_otp(
        &self,
        phone: &str,
        otp: &str,
    ) -> Result<ResetTokenResponse, Error> {
        debug!(phone, "verifying password reset otp");
        self.post(
            "auth/forgot-password/verify",
            &json!({ "phone": phone, "otp": otp }),
        )
        .await
    }

    /// `POST auth/reset-password`
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &SecretString,
    ) -> Result<MessageResponse, Error> {
        debug!("resetting password");
        self.post(
            "auth/reset-password",
            &json!({
                "resetToken": reset_token,
                "newPassword": new_password.expose_secret(),
            }),
        )
        .await
    }

    /// Devices signed in to this account. `GET auth/devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceSession>, Error> {
        debug!("listing device sessions");
        self.get("auth/devices").await
    }

    /// Sign a device out. `DELETE auth/devices/{id}`
    pub async fn revoke_device(&self, device_id: &str) -> Result<(), Error> {
        debug!(device_id, "revoking device session");
        self.delete(&format!("auth/devices/{device_id}")).await
    }
}
