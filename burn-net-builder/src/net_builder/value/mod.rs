use std::sync::OnceLock;

use burn::prelude::*;
use serde::Serialize;
use tracing::trace;

use super::Registry;
use crate::{error::Result, module::nn::FullyConnectedNetwork, normalization::NormalizationData};

mod fully_connected;

pub use fully_connected::{FullyConnected, FullyConnectedConfig};

/// Builds networks estimating the value of a state.
pub trait ValueNetBuilder {
    fn build_value_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        device: &B::Device,
    ) -> Result<FullyConnectedNetwork<B>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValueNetBuilderUnion {
    FullyConnected(FullyConnected),
}

impl ValueNetBuilderUnion {
    pub fn name(&self) -> &'static str {
        match self {
            ValueNetBuilderUnion::FullyConnected(_) => FullyConnected::NAME,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        value_net_builders().from_json_str(json)
    }
}

impl From<FullyConnected> for ValueNetBuilderUnion {
    fn from(builder: FullyConnected) -> Self {
        ValueNetBuilderUnion::FullyConnected(builder)
    }
}

impl ValueNetBuilder for ValueNetBuilderUnion {
    fn build_value_network<B: Backend>(
        &self,
        state_normalization_data: &NormalizationData,
        device: &B::Device,
    ) -> Result<FullyConnectedNetwork<B>> {
        match self {
            ValueNetBuilderUnion::FullyConnected(builder) => {
                builder.build_value_network(state_normalization_data, device)
            }
        }
    }
}

pub fn value_net_builders() -> &'static Registry<ValueNetBuilderUnion> {
    static REGISTRY: OnceLock<Registry<ValueNetBuilderUnion>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        trace!("registering ValueNetBuilder variants");
        Registry::new("ValueNetBuilder").with::<FullyConnected>()
    })
}

#[cfg(test)]
mod tests {
    use burn::{backend::NdArray, tensor::Shape};

    use super::*;
    use crate::{
        module::{component::Value, nn::Activation},
        normalization::NormalizationParameters,
    };

    #[test]
    fn test_value_network_from_registry() {
        assert_eq!(
            value_net_builders().names().collect::<Vec<_>>(),
            ["FullyConnected"]
        );
        let builder = ValueNetBuilderUnion::from_json_str(
            r#"{
                "FullyConnected": {"sizes": [32], "activations": ["gelu"], "use_layer_norm": true}
            }"#,
        )
        .unwrap();
        assert_eq!(builder.name(), "FullyConnected");

        let device = &Default::default();
        let data: NormalizationData = (0..4)
            .map(|id| (id, NormalizationParameters::continuous(0.0, 1.0)))
            .collect();
        let network = builder
            .build_value_network::<NdArray>(&data, device)
            .unwrap();
        assert_eq!(network.layers(), &[4, 32, 1]);
        assert_eq!(network.activations(), &[Activation::Gelu, Activation::Linear]);

        let state = Tensor::<NdArray, 2>::ones([3, 4], device);
        assert_eq!(network.v_batch(&state).shape(), Shape::new([3]));
    }
}
