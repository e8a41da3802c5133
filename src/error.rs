//! Error types used by the service builder and the drain path.
//!
//! The core lifecycle calls (`init`, `run`, `stop`) are infallible and report
//! anomalies through the injected [`Logger`](crate::Logger) only.
//! [`ServiceError`] is returned by the operations layered on top of them:
//! building a service and waiting for its worker to exit.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced around a service's lifecycle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A service was built without a name.
    #[error("service name must not be empty")]
    EmptyName,

    /// The worker did not exit within the grace period.
    #[error("service {service:?} did not stop within {grace:?}")]
    GraceExceeded {
        /// Name of the service being drained.
        service: String,
        /// The grace duration that elapsed.
        grace: Duration,
    },

    /// The worker terminated by panicking instead of observing the stop signal.
    #[error("worker of service {service:?} panicked: {info}")]
    WorkerPanicked {
        /// Name of the service whose worker panicked.
        service: String,
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use servicekit::ServiceError;
    /// use std::time::Duration;
    ///
    /// let err = ServiceError::GraceExceeded { service: "db".into(), grace: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "service_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::EmptyName => "service_empty_name",
            ServiceError::GraceExceeded { .. } => "service_grace_exceeded",
            ServiceError::WorkerPanicked { .. } => "service_worker_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServiceError::EmptyName => "empty service name".to_string(),
            ServiceError::GraceExceeded { service, grace } => {
                format!("grace exceeded after {grace:?}; service={service}")
            }
            ServiceError::WorkerPanicked { service, info } => {
                format!("worker panic: {info}; service={service}")
            }
        }
    }
}
