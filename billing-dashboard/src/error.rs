use error_common::{codes, ClarteError, ErrorContext};
use thiserror::Error;

use crate::models::Collection;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to load {collection}: {message}")]
    Fetch { collection: Collection, message: String },

    #[error("Failed to decode {collection}: {message}")]
    Decode { collection: Collection, message: String },

    #[error("Invalid {collection} record {record_id}: {reason}")]
    InvalidRecord {
        collection: Collection,
        record_id: String,
        reason: String,
    },

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn fetch(collection: Collection, message: impl Into<String>) -> Self {
        Self::Fetch {
            collection,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => codes::data::FETCH_FAILED,
            Self::Decode { .. } => codes::data::DECODE_FAILED,
            Self::InvalidRecord { .. } => codes::validation::INVALID_RECORD,
            Self::Fixture(_) => codes::data::FIXTURE_UNREADABLE,
            Self::Config(_) => codes::configuration::INVALID_CONFIG,
        }
    }

    /// Collection the error belongs to, if any
    pub fn collection(&self) -> Option<Collection> {
        match self {
            Self::Fetch { collection, .. }
            | Self::Decode { collection, .. }
            | Self::InvalidRecord { collection, .. } => Some(*collection),
            Self::Fixture(_) | Self::Config(_) => None,
        }
    }
}

impl From<DashboardError> for ClarteError {
    fn from(err: DashboardError) -> Self {
        let code = err.code();
        let mut context = ErrorContext::new();
        if let Some(collection) = err.collection() {
            context = context.with_collection(collection.table());
        }
        ClarteError::WithContext {
            message: err.to_string(),
            code,
            context,
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
