use axum::http::StatusCode;
use std::fmt;

/// Failures the form controller can run into while handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Credential(String),
    NotRegistered,
    Transport(String),
    Decode(String),
    Validation(String),
    Rejected { status: u16, detail: String },
    Busy,
    UnknownTask(u64),
}

impl FormError {
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown to the user in a failure notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Credential(reason) => format!("Sign-in failed: {reason}"),
            Self::NotRegistered => "Email not registered".to_string(),
            Self::Transport(message) | Self::Decode(message) => format!("Error: {message}"),
            Self::Validation(message) => message.clone(),
            Self::Rejected { detail, .. } => format!("Error: {detail}"),
            Self::Busy => "A submission is already in progress".to_string(),
            Self::UnknownTask(id) => format!("Task {id} no longer exists"),
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential(reason) => write!(f, "credential could not be decoded: {reason}"),
            Self::NotRegistered => write!(f, "email not registered"),
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::Decode(message) => write!(f, "unreadable response body: {message}"),
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::Rejected { status, detail } => write!(f, "rejected with {status}: {detail}"),
            Self::Busy => write!(f, "submission already in progress"),
            Self::UnknownTask(id) => write!(f, "unknown task block {id}"),
        }
    }
}

impl std::error::Error for FormError {}

impl From<reqwest::Error> for FormError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::UnknownTask(_) => Self::not_found(err.to_string()),
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_uses_server_detail() {
        let err = FormError::Rejected {
            status: 400,
            detail: "late checkout".into(),
        };
        assert_eq!(err.user_message(), "Error: late checkout");
    }

    #[test]
    fn unknown_task_maps_to_not_found() {
        let err = AppError::from(FormError::UnknownTask(7));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
