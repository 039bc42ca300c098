use burn::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{ValueNetBuilder, ValueNetBuilderUnion};
use crate::{
    module::nn::{Activation, FullyConnectedNetwork, FullyConnectedNetworkConfig},
    net_builder::{check_sizes_and_activations, full_activations, full_layers, RegisteredVariant},
    normalization::NormalizationData,
};

#[derive(Config, Debug)]
pub struct FullyConnectedConfig {
    #[config(default = "vec![256, 128]")]
    pub sizes: Vec<usize>,
    #[config(default = "vec![Activation::Relu, Activation::Relu]")]
    pub activations: Vec<Activation>,
    #[config(default = false)]
    pub use_layer_norm: bool,
}

impl FullyConnectedConfig {
    pub fn init(&self) -> crate::Result<FullyConnected> {
        check_sizes_and_activations(&self.sizes, &self.activations)?;
        Ok(FullyConnected {
            sizes: self.sizes.clone(),
            activations: self.activations.clone(),
            use_layer_norm: self.use_layer_norm,
        })
    }
}

/// Builds a scalar-output [`FullyConnectedNetwork`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullyConnected {
    sizes: Vec<usize>,
    activations: Vec<Activation>,
    use_layer_norm: bool,
}

impl FullyConnected {
    pub const NAME: &'static str = "FullyConnected";

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    pub fn use_layer_norm(&self) -> bool {
        self.use_layer_norm
    }
}

impl ValueNetBuilder for FullyConnected {
    fn build_value_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        device: &B::Device,
    ) -> crate::Result<FullyConnectedNetwork<B>> {
        let input_dim = state_normalization_data.num_output_features()?;
        let layers = full_layers(input_dim, &self.sizes, 1);
        debug!(builder = Self::NAME, ?layers, "building value network");
        let network = FullyConnectedNetworkConfig::new(layers, full_activations(&self.activations))
            .with_use_layer_norm(self.use_layer_norm)
            .init(device)?;
        Ok(network)
    }
}

impl RegisteredVariant<ValueNetBuilderUnion> for FullyConnected {
    const NAME: &'static str = FullyConnected::NAME;

    fn from_config(config: JsonValue) -> crate::Result<ValueNetBuilderUnion> {
        Ok(serde_json::from_value::<FullyConnectedConfig>(config)?.init()?.into())
    }
}
