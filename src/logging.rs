//! Logging utilities.

use slog::Logger;

use crate::entity::short_type_name;

/// Extension trait for `slog::Logger`.
pub trait LoggerExtensions {
    /// Create a new child logger with a `src` key containing the component name.
    fn new_with_component_name<T>(&self) -> Self;
}

impl LoggerExtensions for Logger {
    fn new_with_component_name<T>(&self) -> Self {
        self.new(slog::o!("src" => short_type_name::<T>()))
    }
}
