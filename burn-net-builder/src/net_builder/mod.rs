//! Builders that turn declarative configurations into untrained networks.
//!
//! Each builder family has a trait, a union enum with one variant per builder,
//! and a process-wide [`Registry`] mapping variant names to factories.

use crate::{
    error::{NetBuilderError, Result},
    module::nn::Activation,
};

pub mod quantile_dqn;
pub mod registry;
pub mod value;

pub use quantile_dqn::{
    qrdqn_net_builders, DuelingQuantile, DuelingQuantileConfig, QRDQNNetBuilder,
    QRDQNNetBuilderUnion, Quantile, QuantileConfig, QuantileLayout,
};
pub use registry::{Factory, RegisteredVariant, Registry};
pub use value::{
    value_net_builders, FullyConnected, FullyConnectedConfig, ValueNetBuilder,
    ValueNetBuilderUnion,
};

pub(crate) fn check_sizes_and_activations(
    sizes: &[usize],
    activations: &[Activation],
) -> Result<()> {
    if sizes.len() != activations.len() {
        return Err(NetBuilderError::ConfigMismatch {
            sizes: sizes.to_vec(),
            activations: activations.to_vec(),
        });
    }
    Ok(())
}

/// `[input_dim] + sizes + [output_dim]`
pub(crate) fn full_layers(input_dim: usize, sizes: &[usize], output_dim: usize) -> Vec<usize> {
    let mut layers = Vec::with_capacity(sizes.len() + 2);
    layers.push(input_dim);
    layers.extend_from_slice(sizes);
    layers.push(output_dim);
    layers
}

/// Hidden activations followed by a linear output layer.
pub(crate) fn full_activations(activations: &[Activation]) -> Vec<Activation> {
    let mut full = activations.to_vec();
    full.push(Activation::Linear);
    full
}
