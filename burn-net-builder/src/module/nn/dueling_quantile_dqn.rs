use burn::module::{Ignored, Module};
use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;

use super::{
    check_layers, Activation, FullyConnectedNetwork, FullyConnectedNetworkConfig, ModelError,
    QuantileQNetwork,
};

/// Quantile Q-network with separate value and advantage streams.
///
/// For `layers = [state_dim, h_1, ..., h_k, action_dim]` the shared trunk covers
/// `[state_dim, ..., h_{k-1}]` and both heads map `h_{k-1} -> h_k -> output`,
/// applying `activations[k - 1]` after the first linear map and `activations[k]`
/// after the second. The value head emits one distribution, the advantage head
/// one per action, and the advantage is centred over actions before being added
/// to the value.
#[derive(Module, Debug)]
pub struct DuelingQuantileDQN<B: Backend> {
    shared: FullyConnectedNetwork<B>,
    value_hidden: Linear<B>,
    value_out: Linear<B>,
    advantage_hidden: Linear<B>,
    advantage_out: Linear<B>,
    head_activation: Ignored<Activation>,
    output_activation: Ignored<Activation>,
    layers: Ignored<Vec<usize>>,
    activations: Ignored<Vec<Activation>>,
    num_atoms: usize,
}

impl<B: Backend> DuelingQuantileDQN<B> {
    pub fn new(
        layers: Vec<usize>,
        activations: Vec<Activation>,
        num_atoms: usize,
        device: &B::Device,
    ) -> Result<Self, ModelError> {
        check_layers(&layers, &activations, 3)?;
        if num_atoms == 0 {
            return Err(ModelError::ZeroAtoms);
        }

        let n = layers.len();
        let (feature_dim, hidden_dim, action_dim) = (layers[n - 3], layers[n - 2], layers[n - 1]);
        let shared = FullyConnectedNetworkConfig::new(
            layers[..n - 2].to_vec(),
            activations[..n - 3].to_vec(),
        )
        .init(device)?;

        Ok(DuelingQuantileDQN {
            shared,
            value_hidden: LinearConfig::new(feature_dim, hidden_dim).init(device),
            value_out: LinearConfig::new(hidden_dim, num_atoms).init(device),
            advantage_hidden: LinearConfig::new(feature_dim, hidden_dim).init(device),
            advantage_out: LinearConfig::new(hidden_dim, action_dim * num_atoms).init(device),
            head_activation: Ignored(activations[n - 3]),
            output_activation: Ignored(activations[n - 2]),
            layers: Ignored(layers),
            activations: Ignored(activations),
            num_atoms,
        })
    }

    fn value(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .head_activation
            .0
            .forward(self.value_hidden.forward(features));
        self.output_activation.0.forward(self.value_out.forward(x))
    }

    fn advantage(&self, features: Tensor<B, 2>) -> Tensor<B, 3> {
        let [batch_size, _] = features.dims();
        let x = self
            .head_activation
            .0
            .forward(self.advantage_hidden.forward(features));
        self.output_activation
            .0
            .forward(self.advantage_out.forward(x))
            .reshape([batch_size, self.action_dim(), self.num_atoms])
    }
}

impl<B: Backend> QuantileQNetwork<B> for DuelingQuantileDQN<B> {
    fn quantiles(&self, state: Tensor<B, 2>) -> Tensor<B, 3> {
        let features = self.shared.forward(state);
        let value = self.value(features.clone()).unsqueeze_dim::<3>(1);
        let advantage = self.advantage(features);
        let mean_advantage = advantage.clone().mean_dim(1);
        value + advantage - mean_advantage
    }

    fn layers(&self) -> &[usize] {
        &self.layers.0
    }

    fn activations(&self) -> &[Activation] {
        &self.activations.0
    }

    fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    fn num_params(&self) -> usize {
        Module::num_params(self)
    }
}
