//! Error types shared by the collaborators and the analysis pipeline.
//!
//! Failures are kept distinct by kind so the pipeline can contain them at the
//! right level:
//!
//! - [`ServiceError`]: a remote service (library or classifier) failed at the
//!   transport, HTTP or decoding level.
//! - [`ClassifyError`]: the classifier either failed as a service or answered
//!   with something that does not fit the response schema.
//! - [`AnalysisError`]: why a single bucket could not be analysed.
//! - [`MergeMismatch`]: a classifier answer that does not line up with the
//!   submitted batch. Not fatal; the affected track is left out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure talking to a remote service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} sent an unreadable response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl ServiceError {
    /// Converts a `ureq` error, keeping the response body of HTTP errors.
    pub(crate) fn from_ureq(service: &'static str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => ServiceError::Status {
                service,
                status,
                message: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ServiceError::Transport {
                service,
                message: transport.to_string(),
            },
        }
    }

    pub(crate) fn decode(service: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Decode {
            service,
            message: message.into(),
        }
    }
}

/// Failure of a single classification request.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier response violates the schema: {0}")]
    SchemaViolation(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Why a bucket could not be analysed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("classification rejected: {0}")]
    SchemaViolation(String),

    #[error("external service failure during {stage}: {source}")]
    ExternalService {
        stage: String,
        #[source]
        source: ServiceError,
    },
}

impl From<ClassifyError> for AnalysisError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::SchemaViolation(reason) => AnalysisError::SchemaViolation(reason),
            ClassifyError::Service(source) => AnalysisError::ExternalService {
                stage: "classification".to_string(),
                source,
            },
        }
    }
}

/// A track the classifier answer and the submitted batch disagree about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MergeMismatch {
    /// A submitted track has no classification in the response.
    #[error("track {id} ({title}) is missing from the classifier response")]
    MissingClassification { id: String, title: String },

    /// The response classifies a track id that was never submitted.
    #[error("classifier returned unknown track id {id}")]
    UnknownId { id: String },

    /// A submitted track has no entry in the popularity map handed to
    /// [`merge_classifications`](crate::orchestrator::merge_classifications).
    ///
    /// `enrich` abandons the whole bucket when a lookup fails, so this only
    /// arises when the merge is called directly with a partial map.
    #[error("no popularity metadata for track {id}")]
    MissingMetadata { id: String },
}

impl MergeMismatch {
    /// The track id the mismatch is about.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            MergeMismatch::MissingClassification { id, .. }
            | MergeMismatch::UnknownId { id }
            | MergeMismatch::MissingMetadata { id } => id,
        }
    }

    /// Whether the mismatch removed a submitted track from the bucket.
    #[must_use]
    pub fn excludes_track(&self) -> bool {
        !matches!(self, MergeMismatch::UnknownId { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_error_maps_to_analysis_error() {
        let schema = AnalysisError::from(ClassifyError::SchemaViolation("bad enum".into()));
        assert!(matches!(schema, AnalysisError::SchemaViolation(ref r) if r == "bad enum"));

        let service = AnalysisError::from(ClassifyError::Service(ServiceError::decode(
            "OpenAI",
            "no choices",
        )));
        assert!(matches!(service, AnalysisError::ExternalService { ref stage, .. } if stage == "classification"));
    }

    #[test]
    fn test_merge_mismatch_exclusion() {
        let missing = MergeMismatch::MissingClassification {
            id: "a".into(),
            title: "A".into(),
        };
        let unknown = MergeMismatch::UnknownId { id: "z".into() };

        assert!(missing.excludes_track());
        assert!(!unknown.excludes_track());
        assert_eq!(unknown.id(), "z");
        assert!(missing.to_string().contains("missing from the classifier response"));
    }
}
