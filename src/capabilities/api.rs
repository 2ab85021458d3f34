use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Secret;
use crate::profile::{ProfileResponse, ProfileUpdate};
use crate::{AppError, ErrorKind};

/// Operations against the external profile endpoint. Transport, auth framing
/// and timeouts all live in the shell; the core only sees success or a
/// classified failure.
///
/// The credential travels inside the operation (explicit injection) rather
/// than being looked up from ambient storage, so the core stays free of
/// hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiOperation {
    FetchProfile {
        token: Secret,
        request_id: String,
    },
    SaveProfile {
        token: Secret,
        profile: ProfileUpdate,
        request_id: String,
    },
}

impl ApiOperation {
    #[must_use]
    pub fn fetch(token: Secret) -> Self {
        Self::FetchProfile {
            token,
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn save(token: Secret, profile: ProfileUpdate) -> Self {
        Self::SaveProfile {
            token,
            profile,
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::FetchProfile { request_id, .. } | Self::SaveProfile { request_id, .. } => {
                request_id
            }
        }
    }
}

impl Operation for ApiOperation {
    type Output = ApiResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiOutput {
    Profile(ProfileResponse),
    Saved,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    #[error("authorization rejected (status {status})")]
    Unauthorized { status: u16 },

    #[error("network failure: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl ApiError {
    /// Classifies an HTTP status the shell saw on the profile endpoint.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            408 => Self::Timeout,
            _ => Self::Server {
                status,
                message: message.into(),
            },
        }
    }

    /// Authorization failures force the unauthenticated state; everything
    /// else is reported without downgrading the session.
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout => true,
            Self::Server { status, .. } => *status >= 500,
            Self::Unauthorized { .. } | Self::InvalidResponse { .. } => false,
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        let kind = match &e {
            ApiError::Unauthorized { .. } => ErrorKind::Authentication,
            ApiError::Network { .. } => ErrorKind::Network,
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::Server { status, .. } if *status >= 500 => ErrorKind::Server,
            ApiError::Server { .. } => ErrorKind::Validation,
            ApiError::InvalidResponse { .. } => ErrorKind::Deserialization,
        };
        AppError::new(kind, e.to_string())
    }
}

pub type ApiResult = Result<ApiOutput, ApiError>;

/// Remote profile sync capability.
pub struct Api<Ev> {
    context: CapabilityContext<ApiOperation, Ev>,
}

impl<Ev> Clone for Api<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Api<Ev> {
    type Operation = ApiOperation;
    type MappedSelf<MappedEv> = Api<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Api::new(self.context.map_event(f))
    }
}

impl<Ev> Api<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ApiOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn fetch_profile<F>(&self, token: Secret, make_event: F)
    where
        F: FnOnce(ApiResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(ApiOperation::fetch(token)).await;
            context.update_app(make_event(result));
        });
    }

    pub fn save_profile<F>(&self, token: Secret, profile: ProfileUpdate, make_event: F)
    where
        F: FnOnce(ApiResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(ApiOperation::save(token, profile))
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorSeverity;

    #[test]
    fn status_classification() {
        assert!(ApiError::from_status(401, "expired").is_authorization());
        assert!(ApiError::from_status(403, "forbidden").is_authorization());
        assert!(!ApiError::from_status(500, "boom").is_authorization());
        assert!(matches!(ApiError::from_status(408, ""), ApiError::Timeout));
    }

    #[test]
    fn retryability_follows_the_taxonomy() {
        assert!(ApiError::Timeout.is_retryable());
        assert!(ApiError::Network {
            message: "dns".into()
        }
        .is_retryable());
        assert!(ApiError::from_status(503, "unavailable").is_retryable());
        assert!(!ApiError::from_status(400, "bad request").is_retryable());
        assert!(!ApiError::from_status(401, "expired").is_retryable());
    }

    #[test]
    fn app_error_mapping_keeps_severity() {
        let auth: AppError = ApiError::from_status(401, "expired").into();
        assert_eq!(auth.kind, ErrorKind::Authentication);
        assert_eq!(auth.severity, ErrorSeverity::Permanent);

        let transient: AppError = ApiError::Network {
            message: "offline".into(),
        }
        .into();
        assert_eq!(transient.kind, ErrorKind::Network);
        assert_eq!(transient.severity, ErrorSeverity::Transient);
        assert!(transient.is_retryable());
    }

    #[test]
    fn operations_carry_distinct_request_ids() {
        let a = ApiOperation::fetch(Secret::new("t".into()));
        let b = ApiOperation::fetch(Secret::new("t".into()));
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn operation_debug_never_leaks_the_token() {
        let op = ApiOperation::fetch(Secret::new("jwt-value".into()));
        let rendered = format!("{op:?}");
        assert!(!rendered.contains("jwt-value"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
