use crate::errors::FormError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Turns the credential handed over by the identity widget into the signed-in email.
pub trait CredentialDecoder {
    fn decode_email(&self, credential: &str) -> Result<String, FormError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    email: Option<String>,
}

/// Reads the `email` claim from a JWT payload without checking its signature.
/// The widget is trusted; verification belongs to the attendance backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedJwtDecoder;

impl CredentialDecoder for UnverifiedJwtDecoder {
    fn decode_email(&self, credential: &str) -> Result<String, FormError> {
        let mut parts = credential.trim().split('.');
        let payload = match (parts.next(), parts.next()) {
            (Some(header), Some(payload)) if !header.is_empty() && !payload.is_empty() => payload,
            _ => return Err(FormError::credential("token is not a JWT")),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| FormError::credential(format!("invalid payload encoding: {err}")))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|err| FormError::credential(format!("invalid payload: {err}")))?;

        match claims.email.map(|email| email.trim().to_string()) {
            Some(email) if !email.is_empty() => Ok(email),
            _ => Err(FormError::credential("token has no email claim")),
        }
    }
}

/// Settings rendered into the page to bootstrap the sign-in widget.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub client_id: String,
    pub prompt_on_load: bool,
}

impl WidgetSettings {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            prompt_on_load: true,
        }
    }
}

#[cfg(test)]
pub(crate) fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}
