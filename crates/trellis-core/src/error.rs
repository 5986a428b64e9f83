use std::error::Error;
use std::fmt;

use crate::host::HostId;
use crate::suspense::{CacheKey, Suspended};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    Missing { id: HostId },
    NotAnElement { id: HostId },
    NotText { id: HostId },
    NotAChild { parent: HostId, child: HostId },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Missing { id } => write!(f, "host node {id} missing"),
            HostError::NotAnElement { id } => write!(f, "host node {id} is not an element"),
            HostError::NotText { id } => write!(f, "host node {id} is not a text node"),
            HostError::NotAChild { parent, child } => {
                write!(f, "host node {child} is not a child of {parent}")
            }
        }
    }
}

impl Error for HostError {}

/// A resource future that finished with an error. The failure is not cached:
/// the boundary that asked for it keeps showing its fallback.
#[derive(Debug)]
pub struct ResourceError {
    pub key: CacheKey,
    pub source: Box<dyn Error + 'static>,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.key, self.source)
    }
}

impl Error for ResourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

#[derive(Debug)]
pub enum RenderError {
    Host(HostError),
    /// A resource read suspended with no boundary between it and the root.
    UnhandledSuspense(Suspended),
    /// State kept changing during passes; gave up after `passes` passes.
    RenderLoop { passes: usize },
    Resource(ResourceError),
    /// `rerender` was called before any root element was rendered.
    NothingToRender,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Host(err) => write!(f, "host error: {err}"),
            RenderError::UnhandledSuspense(suspended) => {
                write!(f, "suspended outside of any suspense boundary: {suspended}")
            }
            RenderError::RenderLoop { passes } => {
                write!(f, "state kept changing after {passes} render passes")
            }
            RenderError::Resource(err) => err.fmt(f),
            RenderError::NothingToRender => f.write_str("no root element has been rendered"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RenderError::Host(err) => Some(err),
            RenderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for RenderError {
    fn from(err: HostError) -> Self {
        RenderError::Host(err)
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}
