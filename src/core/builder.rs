use std::sync::Arc;

use crate::core::{Nest, Settings};

/// Builder for constructing a shared [`Nest`].
///
/// # Example
/// ```
/// use chirp::{Nest, Settings};
///
/// let nest = Nest::builder(Settings::default())
///     .with_error_tolerance(2)
///     .with_bus_capacity(64)
///     .build();
/// assert_eq!(nest.settings().error_tolerance, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NestBuilder {
    settings: Settings,
}

impl NestBuilder {
    /// Creates a new builder with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Overrides the number of failed writes tolerated per client.
    pub fn with_error_tolerance(mut self, error_tolerance: usize) -> Self {
        self.settings.error_tolerance = error_tolerance;
        self
    }

    /// Overrides the event bus capacity.
    pub fn with_bus_capacity(mut self, bus_capacity: usize) -> Self {
        self.settings.bus_capacity = bus_capacity;
        self
    }

    /// Builds the nest, ready to be shared between tasks.
    pub fn build(self) -> Arc<Nest> {
        Arc::new(Nest::new(self.settings))
    }
}
