use std::fmt::Debug;

use burn::module::{Ignored, Module};
use burn::prelude::*;

use super::{
    check_layers, Activation, FullyConnectedNetwork, FullyConnectedNetworkConfig, ModelError,
};
use crate::module::component::Critic;

/// A Q-network that represents each action value by `num_atoms` quantiles.
pub trait QuantileQNetwork<B: Backend>: Send + Debug {
    /// `[batch, state_dim]` to `[batch, action_dim, num_atoms]`.
    fn quantiles(&self, state: Tensor<B, 2>) -> Tensor<B, 3>;

    fn layers(&self) -> &[usize];

    fn activations(&self) -> &[Activation];

    fn num_atoms(&self) -> usize;

    fn num_params(&self) -> usize;

    fn q_values(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        self.quantiles(state).mean_dim(2).squeeze(2)
    }

    fn greedy_actions(&self, state: Tensor<B, 2>) -> Tensor<B, 1, Int> {
        self.q_values(state).argmax(1).squeeze(1)
    }

    fn state_dim(&self) -> usize {
        self.layers()[0]
    }

    fn action_dim(&self) -> usize {
        self.layers()[self.layers().len() - 1]
    }
}

impl<B: Backend, M: QuantileQNetwork<B> + ?Sized> Critic<B> for M {
    type OBatch = Tensor<B, 2>;
    type ABatch = Tensor<B, 2, Int>;

    fn q_batch(&self, observations: &Self::OBatch, actions: &Self::ABatch) -> Tensor<B, 1> {
        self.q_values(observations.clone())
            .gather(1, actions.clone())
            .squeeze(1)
    }
}

#[derive(Module, Debug)]
pub struct QuantileDQN<B: Backend> {
    network: FullyConnectedNetwork<B>,
    layers: Ignored<Vec<usize>>,
    num_atoms: usize,
}

impl<B: Backend> QuantileDQN<B> {
    /// The last entry of `layers` is the number of actions; the final linear
    /// layer is widened to emit `num_atoms` values for each of them.
    pub fn new(
        layers: Vec<usize>,
        activations: Vec<Activation>,
        num_atoms: usize,
        device: &B::Device,
    ) -> Result<Self, ModelError> {
        check_layers(&layers, &activations, 2)?;
        if num_atoms == 0 {
            return Err(ModelError::ZeroAtoms);
        }

        let mut network_layers = layers.clone();
        let last = network_layers.len() - 1;
        network_layers[last] *= num_atoms;
        let network = FullyConnectedNetworkConfig::new(network_layers, activations).init(device)?;

        Ok(QuantileDQN {
            network,
            layers: Ignored(layers),
            num_atoms,
        })
    }
}

impl<B: Backend> QuantileQNetwork<B> for QuantileDQN<B> {
    fn quantiles(&self, state: Tensor<B, 2>) -> Tensor<B, 3> {
        let [batch_size, _] = state.dims();
        self.network
            .forward(state)
            .reshape([batch_size, self.action_dim(), self.num_atoms])
    }

    fn layers(&self) -> &[usize] {
        &self.layers.0
    }

    fn activations(&self) -> &[Activation] {
        self.network.activations()
    }

    fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    fn num_params(&self) -> usize {
        Module::num_params(self)
    }
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::NdArray,
        tensor::{Distribution, Shape},
    };

    use super::*;

    #[test]
    fn test_quantile_dqn_shapes() {
        let device = &Default::default();
        let model = QuantileDQN::<NdArray>::new(
            vec![6, 32, 3],
            vec![Activation::Relu, Activation::Linear],
            11,
            device,
        )
        .unwrap();
        assert_eq!(model.state_dim(), 6);
        assert_eq!(model.action_dim(), 3);
        // Trunk output carries every atom of every action
        assert_eq!(model.network.output_dim(), 33);

        let state = Tensor::<NdArray, 2>::ones([4, 6], device);
        assert_eq!(model.quantiles(state.clone()).shape(), Shape::new([4, 3, 11]));
        assert_eq!(model.q_values(state.clone()).shape(), Shape::new([4, 3]));
        assert_eq!(model.greedy_actions(state.clone()).shape(), Shape::new([4]));

        let actions = Tensor::<NdArray, 2, Int>::zeros([4, 1], device);
        assert_eq!(model.q_batch(&state, &actions).shape(), Shape::new([4]));
    }

    #[test]
    fn test_q_values_are_mean_quantiles() {
        let device = &Default::default();
        let (batch_size, num_actions, num_atoms) = (4, 5, 9);
        let model = QuantileDQN::<NdArray>::new(
            vec![6, 16, num_actions],
            vec![Activation::Relu, Activation::Linear],
            num_atoms,
            device,
        )
        .unwrap();
        let state = Tensor::<NdArray, 2>::random([batch_size, 6], Distribution::Default, device);

        // Row-major [batch, action, atom]
        let quantiles = model.quantiles(state.clone()).into_data();
        let quantiles = quantiles.as_slice::<f32>().unwrap();
        let expected: Vec<Vec<f32>> = (0..batch_size)
            .map(|b| {
                (0..num_actions)
                    .map(|a| {
                        let start = (b * num_actions + a) * num_atoms;
                        quantiles[start..start + num_atoms].iter().sum::<f32>() / num_atoms as f32
                    })
                    .collect()
            })
            .collect();

        let chosen = [4i64, 0, 2, 3];
        let actions = Tensor::<NdArray, 1, Int>::from_ints(chosen, device).unsqueeze_dim::<2>(1);
        let q_batch = model.q_batch(&state, &actions).into_data();
        for (b, (&q, &a)) in q_batch
            .as_slice::<f32>()
            .unwrap()
            .iter()
            .zip(chosen.iter())
            .enumerate()
        {
            assert!((q - expected[b][a as usize]).abs() < 1e-5);
        }

        let greedy = model.greedy_actions(state).into_data();
        let greedy = greedy.as_slice::<i64>().unwrap();
        for (b, row) in expected.iter().enumerate() {
            let best = row
                .iter()
                .enumerate()
                .max_by(|(_, x), (_, y)| x.total_cmp(y))
                .map(|(i, _)| i as i64)
                .unwrap();
            assert_eq!(greedy[b], best);
        }
    }

    #[test]
    fn test_quantile_dqn_rejects_bad_dimensions() {
        let device = &Default::default();
        let err = QuantileDQN::<NdArray>::new(vec![6], vec![], 11, device).unwrap_err();
        assert_eq!(
            err,
            ModelError::TooFewLayers {
                min: 2,
                actual: vec![6]
            }
        );
        let err = QuantileDQN::<NdArray>::new(vec![6, 3], vec![Activation::Linear], 0, device)
            .unwrap_err();
        assert_eq!(err, ModelError::ZeroAtoms);
    }
}
