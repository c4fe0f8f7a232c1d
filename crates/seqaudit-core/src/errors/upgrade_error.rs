//! Schema upgrade errors.

use super::error_code::{self, AuditErrorCode};

/// Errors that can occur while upgrading a stored item to a newer schema.
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error("No upgrade step for {item_type} from version {from:?}")]
    MissingStep { item_type: String, from: String },

    #[error("Cannot downgrade {item_type} from version {from:?} to {to:?}")]
    Downgrade {
        item_type: String,
        from: String,
        to: String,
    },

    #[error("Item of type {item_type} is not a JSON object")]
    NotAnObject { item_type: String },

    #[error("Field {field} of {item_type} has an unexpected shape: {message}")]
    InvalidField {
        item_type: String,
        field: String,
        message: String,
    },

    #[error("Cannot resolve {reference:?} in {field} of {item_type}")]
    UnresolvedReference {
        item_type: String,
        field: String,
        reference: String,
    },
}

impl AuditErrorCode for UpgradeError {
    fn error_code(&self) -> &'static str {
        error_code::UPGRADE_ERROR
    }
}
