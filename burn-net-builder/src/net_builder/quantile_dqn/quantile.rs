use burn::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{QRDQNNetBuilder, QRDQNNetBuilderUnion, QuantileLayout};
use crate::{
    module::nn::{Activation, QuantileDQN},
    net_builder::RegisteredVariant,
    normalization::NormalizationData,
};

#[derive(Config, Debug)]
pub struct QuantileConfig {
    #[config(default = "vec![256, 128]")]
    pub sizes: Vec<usize>,
    #[config(default = "vec![Activation::Relu, Activation::Relu]")]
    pub activations: Vec<Activation>,
    #[config(default = 51)]
    pub num_atoms: usize,
}

impl QuantileConfig {
    pub fn init(&self) -> crate::Result<Quantile> {
        QuantileLayout::new(self.sizes.clone(), self.activations.clone(), self.num_atoms)
            .map(Quantile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quantile(QuantileLayout);

impl Quantile {
    pub const NAME: &'static str = "Quantile";

    pub fn layout(&self) -> &QuantileLayout {
        &self.0
    }
}

impl QRDQNNetBuilder for Quantile {
    type Network<B: Backend> = QuantileDQN<B>;

    fn build_q_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        output_dim: usize,
        device: &B::Device,
    ) -> crate::Result<QuantileDQN<B>> {
        let state_dim = self.input_dim(state_normalization_data)?;
        let (layers, activations) = self.0.network_shape(state_dim, output_dim);
        debug!(
            builder = Self::NAME,
            ?layers,
            num_atoms = self.0.num_atoms(),
            "building q-network"
        );
        Ok(QuantileDQN::new(layers, activations, self.0.num_atoms(), device)?)
    }
}

impl RegisteredVariant<QRDQNNetBuilderUnion> for Quantile {
    const NAME: &'static str = Quantile::NAME;

    fn from_config(config: JsonValue) -> crate::Result<QRDQNNetBuilderUnion> {
        Ok(serde_json::from_value::<QuantileConfig>(config)?.init()?.into())
    }
}
