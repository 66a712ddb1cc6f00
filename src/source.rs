//! The seam to the resource-management collaborator that owns attribute
//! retrieval.
//!
//! The resolution engine never reaches into resources itself; it asks an
//! [`AttributeSource`] for a named attribute and walks whatever value comes
//! back. [`InMemoryAttributeSource`] is the reference implementation, used
//! by tests and by embedders that register attribute values directly.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use thiserror::Error;

use crate::value::AttributeValue;

/// Identifies a managed resource within the monitoring host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Error type for attribute retrieval operations.
#[derive(Error, Debug, Clone)]
pub enum AttributeError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Attribute '{attribute}' not found on '{resource}'")]
    AttributeNotFound { resource: String, attribute: String },

    #[error("Attribute handler for '{attribute}' on '{resource}' failed: {message}")]
    HandlerFault {
        resource: String,
        attribute: String,
        message: String,
    },

    #[error("Attribute access on '{resource}' failed: {message}")]
    AccessFault { resource: String, message: String },
}

/// A trait for retrieving named attribute values from managed resources.
///
/// Implementations own resource discovery, access control, and timeouts;
/// the resolution engine treats every failure as fatal for the current
/// evaluation and never retries.
pub trait AttributeSource: Send + Sync + fmt::Debug {
    /// Retrieves the attribute named `attribute` from `resource`.
    fn attribute(
        &self,
        resource: &ResourceId,
        attribute: &str,
    ) -> Result<AttributeValue, AttributeError>;

    /// Checks whether `resource` is known to this source.
    fn contains(&self, resource: &ResourceId) -> bool;

    /// Returns a human-readable name for this source (for diagnostics).
    fn name(&self) -> &'static str;
}

/// An in-memory attribute source.
///
/// Resources and their attributes are stored in memory and must be
/// pre-populated before use. This is the simplest source and is safe to
/// share across threads.
#[derive(Debug, Default)]
pub struct InMemoryAttributeSource {
    resources: RwLock<HashMap<ResourceId, HashMap<String, AttributeValue>>>,
}

impl InMemoryAttributeSource {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Stores `value` as the attribute named `attribute` of `resource`,
    /// registering the resource if it is not yet known.
    ///
    /// # Errors
    ///
    /// Returns `AttributeError::AccessFault` if the internal lock is
    /// poisoned.
    pub fn insert(
        &self,
        resource: impl Into<ResourceId>,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<(), AttributeError> {
        let resource = resource.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| AttributeError::AccessFault {
                resource: resource.to_string(),
                message: "attribute store lock poisoned".to_string(),
            })?;
        resources
            .entry(resource)
            .or_default()
            .insert(attribute.into(), value.into());
        Ok(())
    }

    /// Removes a resource and all of its attributes.
    ///
    /// Returns `false` if the lock is poisoned or the resource is unknown.
    pub fn remove(&self, resource: &ResourceId) -> bool {
        self.resources
            .write()
            .ok()
            .and_then(|mut resources| resources.remove(resource))
            .is_some()
    }

    /// Clears all resources from the store.
    ///
    /// Does nothing if the lock is poisoned.
    pub fn clear(&self) {
        if let Ok(mut resources) = self.resources.write() {
            resources.clear();
        }
    }

    /// Get the number of registered resources.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    ///
    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.resources.read().map(|r| r.is_empty()).unwrap_or(true)
    }
}

impl AttributeSource for InMemoryAttributeSource {
    fn attribute(
        &self,
        resource: &ResourceId,
        attribute: &str,
    ) -> Result<AttributeValue, AttributeError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| AttributeError::AccessFault {
                resource: resource.to_string(),
                message: "attribute store lock poisoned".to_string(),
            })?;
        let attributes = resources
            .get(resource)
            .ok_or_else(|| AttributeError::ResourceNotFound(resource.to_string()))?;
        attributes
            .get(attribute)
            .cloned()
            .ok_or_else(|| AttributeError::AttributeNotFound {
                resource: resource.to_string(),
                attribute: attribute.to_string(),
            })
    }

    fn contains(&self, resource: &ResourceId) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(resource))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryAttributeSource"
    }
}
