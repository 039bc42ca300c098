use thiserror::Error;

use crate::{
    module::nn::{Activation, ModelError},
    normalization::NormalizationError,
};

pub type Result<T> = std::result::Result<T, NetBuilderError>;

#[derive(Debug, Error)]
pub enum NetBuilderError {
    #[error(
        "Must have the same numbers of sizes and activations; got: {sizes:?}, {activations:?}"
    )]
    ConfigMismatch {
        sizes: Vec<usize>,
        activations: Vec<Activation>,
    },

    #[error("No {family} variant registered under the name {name:?}")]
    UnknownVariant { family: &'static str, name: String },

    #[error("A {family} variant is already registered under the name {name:?}")]
    DuplicateVariant { family: &'static str, name: String },

    #[error("Expected a single-key object naming a {family} variant, got: {found}")]
    MalformedUnion { family: &'static str, found: String },

    #[error("Invalid builder configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
