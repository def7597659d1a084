//! Integration test crate for CineGrade.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core, color and effect crates to verify they work
//! together.

#[cfg(test)]
mod blending;

#[cfg(test)]
mod pipeline;

#[cfg(test)]
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
