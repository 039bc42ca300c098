use burn::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{QRDQNNetBuilder, QRDQNNetBuilderUnion, QuantileLayout};
use crate::{
    module::nn::{Activation, DuelingQuantileDQN},
    net_builder::RegisteredVariant,
    normalization::NormalizationData,
};

#[derive(Config, Debug)]
pub struct DuelingQuantileConfig {
    #[config(default = "vec![256, 128]")]
    pub sizes: Vec<usize>,
    #[config(default = "vec![Activation::Relu, Activation::Relu]")]
    pub activations: Vec<Activation>,
    #[config(default = 51)]
    pub num_atoms: usize,
}

impl DuelingQuantileConfig {
    pub fn init(&self) -> crate::Result<DuelingQuantile> {
        QuantileLayout::new(self.sizes.clone(), self.activations.clone(), self.num_atoms)
            .map(DuelingQuantile)
    }
}

/// Builds a [`DuelingQuantileDQN`] around the configured hidden layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuelingQuantile(QuantileLayout);

impl DuelingQuantile {
    pub const NAME: &'static str = "DuelingQuantile";

    pub fn layout(&self) -> &QuantileLayout {
        &self.0
    }
}

impl QRDQNNetBuilder for DuelingQuantile {
    type Network<B: Backend> = DuelingQuantileDQN<B>;

    fn build_q_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        output_dim: usize,
        device: &B::Device,
    ) -> crate::Result<DuelingQuantileDQN<B>> {
        let state_dim = self.input_dim(state_normalization_data)?;
        let (layers, activations) = self.0.network_shape(state_dim, output_dim);
        debug!(
            builder = Self::NAME,
            ?layers,
            num_atoms = self.0.num_atoms(),
            "building q-network"
        );
        Ok(DuelingQuantileDQN::new(layers, activations, self.0.num_atoms(), device)?)
    }
}

impl RegisteredVariant<QRDQNNetBuilderUnion> for DuelingQuantile {
    const NAME: &'static str = DuelingQuantile::NAME;

    fn from_config(config: JsonValue) -> crate::Result<QRDQNNetBuilderUnion> {
        Ok(serde_json::from_value::<DuelingQuantileConfig>(config)?.init()?.into())
    }
}
