//! CMS client errors

use thiserror::Error;

/// Errors raised while talking to the content repository
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid CMS response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no master ref advertised by {0}")]
    NoMasterRef(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("cursor does not belong to this repository: {0}")]
    ForeignCursor(String),
}

impl CmsError {
    /// Whether the CMS rejected the ref or access token used for the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = CmsError::Status {
            status: 404,
            message: "Ref not found".to_string(),
        };
        assert_eq!(err.to_string(), "CMS answered 404: Ref not found");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_server_error_is_not_rejection() {
        let err = CmsError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(!err.is_rejection());
        assert!(!CmsError::NotFound("post".to_string()).is_rejection());
    }
}
