//! Tracking for objects that own native graphics handles.
//!
//! Factories that create a GPU-backed object hand a copy of it to the tracker
//! straight away, so at shutdown the host can release everything in creation
//! order without knowing which registries hold what.
//!
//! Cleanup keeps going past a failed release: the failure is logged, the rest
//! of the list is still released, and the failures are returned together.

use crate::error::{CleanupFailure, EngineError};
use crate::graphics::{GraphicsApi, GraphicsError, NativeHandle};
use crate::identifier::Identifier;
use crate::logger::Logger;

pub trait UnmanagedResource {
    fn identifier(&self) -> &Identifier;
    fn native_handle(&self) -> NativeHandle;
    /// Type name shown in cleanup logs ("Texture", "Shader").
    fn kind(&self) -> &'static str;
    fn release(&self, gpu: &mut dyn GraphicsApi) -> Result<(), GraphicsError>;
}

#[derive(Default)]
pub struct ResourceTracker {
    resources: Vec<Box<dyn UnmanagedResource>>,
    released: bool,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, resource: Box<dyn UnmanagedResource>) {
        self.resources.push(resource);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn UnmanagedResource> {
        self.resources.iter().map(|r| r.as_ref())
    }

    /// Release every tracked resource, oldest first. Entries stay in the list;
    /// calling this again does nothing. Returns how many were released.
    pub fn cleanup_all(&mut self, log: &Logger, gpu: &mut dyn GraphicsApi) -> Result<usize, EngineError> {
        if self.released {
            return Ok(0);
        }
        self.released = true;

        let mut released = 0;
        let mut failures = Vec::new();
        for resource in &self.resources {
            log.debug(format!(
                "Deleting unmanaged resource ({}) '{}' with native handle {}",
                resource.kind(),
                resource.identifier(),
                resource.native_handle()
            ));
            match resource.release(gpu) {
                Ok(()) => released += 1,
                Err(error) => {
                    log.error(format!(
                        "Failed to delete {} '{}' (handle {}): {error}",
                        resource.kind(),
                        resource.identifier(),
                        resource.native_handle()
                    ));
                    failures.push(CleanupFailure {
                        id: resource.identifier().to_string(),
                        handle: resource.native_handle(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(released)
        } else {
            Err(EngineError::ResourceCleanupFailed { failures })
        }
    }
}

impl std::fmt::Debug for ResourceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTracker")
            .field("tracked", &self.resources.len())
            .field("released", &self.released)
            .finish()
    }
}
