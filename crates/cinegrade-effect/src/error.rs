//! Effect subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EffectError {
    #[error(transparent)]
    Color(#[from] cinegrade_color::ColorError),
}
