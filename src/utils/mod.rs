/// Traits for loading configuration from the environment.
pub mod from_env;

/// Tracing subscriber setup.
pub mod tracing;
