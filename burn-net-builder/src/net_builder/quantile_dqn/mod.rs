use std::sync::OnceLock;

use burn::prelude::*;
use serde::Serialize;
use tracing::trace;

use super::{check_sizes_and_activations, full_activations, full_layers, Registry};
use crate::{
    error::Result,
    module::nn::{Activation, QuantileQNetwork},
    normalization::NormalizationData,
};

mod dueling_quantile;
mod quantile;

pub use dueling_quantile::{DuelingQuantile, DuelingQuantileConfig};
pub use quantile::{Quantile, QuantileConfig};

/// Hidden layers and atom count shared by the quantile builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantileLayout {
    sizes: Vec<usize>,
    activations: Vec<Activation>,
    num_atoms: usize,
}

impl QuantileLayout {
    pub fn new(sizes: Vec<usize>, activations: Vec<Activation>, num_atoms: usize) -> Result<Self> {
        check_sizes_and_activations(&sizes, &activations)?;
        Ok(QuantileLayout {
            sizes,
            activations,
            num_atoms,
        })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    /// Full layer sizes and activations of a network mapping `state_dim`
    /// features to `output_dim` actions.
    pub fn network_shape(
        &self,
        state_dim: usize,
        output_dim: usize,
    ) -> (Vec<usize>, Vec<Activation>) {
        (
            full_layers(state_dim, &self.sizes, output_dim),
            full_activations(&self.activations),
        )
    }
}

/// Builds quantile-regression Q-networks.
pub trait QRDQNNetBuilder {
    type Network<B: Backend>: QuantileQNetwork<B>;

    /// `output_dim` is the number of discrete actions.
    fn build_q_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        output_dim: usize,
        device: &B::Device,
    ) -> Result<Self::Network<B>>;

    fn input_dim(&self, state_normalization_data: &NormalizationData) -> Result<usize> {
        Ok(state_normalization_data.num_output_features()?)
    }
}

/// Any registered quantile builder, tagged by its name when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QRDQNNetBuilderUnion {
    Quantile(Quantile),
    DuelingQuantile(DuelingQuantile),
}

impl QRDQNNetBuilderUnion {
    pub fn name(&self) -> &'static str {
        match self {
            QRDQNNetBuilderUnion::Quantile(_) => Quantile::NAME,
            QRDQNNetBuilderUnion::DuelingQuantile(_) => DuelingQuantile::NAME,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        qrdqn_net_builders().from_json_str(json)
    }
}

impl From<Quantile> for QRDQNNetBuilderUnion {
    fn from(builder: Quantile) -> Self {
        QRDQNNetBuilderUnion::Quantile(builder)
    }
}

impl From<DuelingQuantile> for QRDQNNetBuilderUnion {
    fn from(builder: DuelingQuantile) -> Self {
        QRDQNNetBuilderUnion::DuelingQuantile(builder)
    }
}

impl QRDQNNetBuilder for QRDQNNetBuilderUnion {
    type Network<B: Backend> = Box<dyn QuantileQNetwork<B>>;

    fn build_q_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        output_dim: usize,
        device: &B::Device,
    ) -> Result<Self::Network<B>> {
        let network: Box<dyn QuantileQNetwork<B>> = match self {
            QRDQNNetBuilderUnion::Quantile(builder) => Box::new(builder.build_q_network::<B>(
                state_normalization_data,
                output_dim,
                device,
            )?),
            QRDQNNetBuilderUnion::DuelingQuantile(builder) => Box::new(
                builder.build_q_network::<B>(state_normalization_data, output_dim, device)?,
            ),
        };
        Ok(network)
    }
}

impl<B: Backend> QuantileQNetwork<B> for Box<dyn QuantileQNetwork<B>> {
    fn quantiles(&self, state: Tensor<B, 2>) -> Tensor<B, 3> {
        (**self).quantiles(state)
    }

    fn layers(&self) -> &[usize] {
        (**self).layers()
    }

    fn activations(&self) -> &[Activation] {
        (**self).activations()
    }

    fn num_atoms(&self) -> usize {
        (**self).num_atoms()
    }

    fn num_params(&self) -> usize {
        (**self).num_params()
    }
}

pub fn qrdqn_net_builders() -> &'static Registry<QRDQNNetBuilderUnion> {
    static REGISTRY: OnceLock<Registry<QRDQNNetBuilderUnion>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        trace!("registering QRDQNNetBuilder variants");
        Registry::new("QRDQNNetBuilder")
            .with::<Quantile>()
            .with::<DuelingQuantile>()
    })
}
