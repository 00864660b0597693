//! Application-wide error types.
//!
//! Every error leaves the API as a `{code, message}` JSON body; `AppError`
//! owns the status and code mapping, and its display form is the message
//! sent to the client verbatim.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or is missing.
    #[error("{0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Validation error.
    #[error("{0}")]
    Validation(String),

    /// Invoice number already used within the tenant.
    #[error("{0}")]
    DuplicateInvoiceNumber(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::DuplicateInvoiceNumber(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the wire error code for API responses.
    ///
    /// `DUPLICATE_INVOICE_NUMBER` is the one code clients special-case: they
    /// map it back onto the invoice-number form field.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(
            AppError::DuplicateInvoiceNumber(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::DuplicateInvoiceNumber(String::new()).error_code(),
            "DUPLICATE_INVOICE_NUMBER"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_display_is_the_wire_message() {
        assert_eq!(
            AppError::DuplicateInvoiceNumber("Numero fattura già registrato".into()).to_string(),
            "Numero fattura già registrato"
        );
        assert_eq!(
            AppError::NotFound("Commessa non trovata".into()).to_string(),
            "Commessa non trovata"
        );
    }
}
