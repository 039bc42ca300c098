use burn::module::{Ignored, Module};
use burn::nn::{LayerNorm, LayerNormConfig, Linear, LinearConfig};
use burn::prelude::*;

use super::{check_layers, Activation, ModelError};
use crate::module::component::Value;

/// Layer sizes run from input to output; `activations[i]` follows the linear
/// map from `layers[i]` to `layers[i + 1]`.
#[derive(Config, Debug)]
pub struct FullyConnectedNetworkConfig {
    pub layers: Vec<usize>,
    pub activations: Vec<Activation>,
    #[config(default = false)]
    pub use_layer_norm: bool,
}

#[derive(Module, Debug)]
pub struct FullyConnectedNetwork<B: Backend> {
    linear_layers: Vec<Linear<B>>,
    layer_norms: Vec<LayerNorm<B>>,
    layers: Ignored<Vec<usize>>,
    activations: Ignored<Vec<Activation>>,
}

impl FullyConnectedNetworkConfig {
    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<FullyConnectedNetwork<B>, ModelError> {
        check_layers(&self.layers, &self.activations, 1)?;

        let linear_layers = self
            .layers
            .windows(2)
            .map(|pair| LinearConfig::new(pair[0], pair[1]).init(device))
            .collect();

        // Normalise hidden outputs only
        let hidden = self
            .layers
            .get(1..self.layers.len().saturating_sub(1))
            .unwrap_or_default();
        let layer_norms = match self.use_layer_norm {
            true => hidden
                .iter()
                .map(|&size| LayerNormConfig::new(size).init(device))
                .collect(),
            false => Vec::new(),
        };

        Ok(FullyConnectedNetwork {
            linear_layers,
            layer_norms,
            layers: Ignored(self.layers.clone()),
            activations: Ignored(self.activations.clone()),
        })
    }
}

impl<B: Backend> FullyConnectedNetwork<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let mut x = input;
        for (i, (layer, activation)) in self
            .linear_layers
            .iter()
            .zip(self.activations.0.iter())
            .enumerate()
        {
            x = layer.forward(x);
            if let Some(norm) = self.layer_norms.get(i) {
                x = norm.forward(x);
            }
            x = activation.forward(x);
        }
        x
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers.0
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations.0
    }

    pub fn input_dim(&self) -> usize {
        self.layers.0[0]
    }

    pub fn output_dim(&self) -> usize {
        self.layers.0[self.layers.0.len() - 1]
    }
}

/// Only defined for scalar-output networks, as built by the value builders.
impl<B: Backend> Value<B> for FullyConnectedNetwork<B> {
    type OBatch = Tensor<B, 2>;

    fn v_batch(&self, observations: &Self::OBatch) -> Tensor<B, 1> {
        assert_eq!(
            self.output_dim(),
            1,
            "State values need a single output, got layers {:?}",
            self.layers()
        );
        self.forward(observations.clone()).squeeze(1)
    }
}

#[cfg(test)]
mod tests {
    use burn::{
        backend::NdArray,
        tensor::{Shape, Tensor},
    };
    use expect_test::expect;

    use super::*;

    #[test]
    fn test_fully_connected_network() {
        let device = &Default::default();
        for n_hidden_layers in 0..3 {
            let output_size = 3;
            let mut layers = vec![4];
            for i in 0..n_hidden_layers {
                layers.push(32 * (i + 1));
            }
            layers.push(output_size);
            let mut activations = vec![Activation::Relu; n_hidden_layers];
            activations.push(Activation::Linear);

            let model = FullyConnectedNetworkConfig::new(layers.clone(), activations)
                .init::<NdArray>(device)
                .unwrap();
            assert_eq!(model.layers(), layers.as_slice());
            let x = Tensor::<NdArray, 1>::from_floats([1.0, 2.0, 3.0, 4.0], device);
            assert_eq!(model.forward(x).shape(), Shape::new([output_size]));
        }
    }

    #[test]
    fn test_single_size_is_identity() {
        let device = &Default::default();
        let model = FullyConnectedNetworkConfig::new(vec![4], vec![])
            .init::<NdArray>(device)
            .unwrap();
        let x = Tensor::<NdArray, 2>::ones([2, 4], device);
        let y = model.forward(x.clone());
        y.into_data().assert_eq(&x.into_data(), true);
    }

    #[test]
    fn test_layer_norm_on_hidden_layers() {
        let device = &Default::default();
        let model = FullyConnectedNetworkConfig::new(
            vec![6, 16, 8, 1],
            vec![Activation::Tanh, Activation::Tanh, Activation::Linear],
        )
        .with_use_layer_norm(true)
        .init::<NdArray>(device)
        .unwrap();
        assert_eq!(model.layer_norms.len(), 2);
        let x = Tensor::<NdArray, 2>::ones([5, 6], device);
        assert_eq!(model.v_batch(&x).shape(), Shape::new([5]));
    }

    #[test]
    fn test_layer_norm_without_hidden_layers() {
        let device = &Default::default();
        for layers in [vec![4], vec![4, 2]] {
            let activations = vec![Activation::Linear; layers.len() - 1];
            let model = FullyConnectedNetworkConfig::new(layers, activations)
                .with_use_layer_norm(true)
                .init::<NdArray>(device)
                .unwrap();
            assert!(model.layer_norms.is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "State values need a single output")]
    fn test_state_value_requires_scalar_output() {
        let device = &Default::default();
        let model = FullyConnectedNetworkConfig::new(vec![4, 3], vec![Activation::Linear])
            .init::<NdArray>(device)
            .unwrap();
        let _ = model.v_batch(&Tensor::<NdArray, 2>::ones([2, 4], device));
    }

    #[test]
    fn test_invalid_configs() {
        let device: &<NdArray as Backend>::Device = &Default::default();
        let err = FullyConnectedNetworkConfig::new(vec![], vec![])
            .init::<NdArray>(device)
            .unwrap_err();
        expect!["Expected at least 1 layer sizes, got []"].assert_eq(&err.to_string());

        let err = FullyConnectedNetworkConfig::new(vec![4, 0, 2], vec![Activation::Relu; 2])
            .init::<NdArray>(device)
            .unwrap_err();
        expect!["Layer 1 has size zero in [4, 0, 2]"].assert_eq(&err.to_string());

        let err = FullyConnectedNetworkConfig::new(vec![4, 8, 2], vec![Activation::Relu])
            .init::<NdArray>(device)
            .unwrap_err();
        expect!["Expected 2 activations for [4, 8, 2], got 1"].assert_eq(&err.to_string());
    }
}
