use thiserror::Error;

use crate::source::AttributeError;

#[derive(Error, Debug, Clone)]
pub enum PathError {
    #[error("Attribute path parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("Failed to read attribute '{attribute}' from '{resource}'")]
    AttributeRetrieval {
        resource: String,
        attribute: String,
        #[source]
        source: AttributeError,
    },

    #[error("Unsupported intermediate value [{value}] while processing path segment [{segment}]")]
    UnsupportedSegment { value: String, segment: String },
}
