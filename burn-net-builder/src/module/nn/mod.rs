use thiserror::Error;

pub mod activation;
pub mod dueling_quantile_dqn;
pub mod fully_connected;
pub mod quantile_dqn;

pub use activation::Activation;
pub use dueling_quantile_dqn::DuelingQuantileDQN;
pub use fully_connected::{FullyConnectedNetwork, FullyConnectedNetworkConfig};
pub use quantile_dqn::{QuantileDQN, QuantileQNetwork};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Expected at least {min} layer sizes, got {actual:?}")]
    TooFewLayers { min: usize, actual: Vec<usize> },

    #[error("Layer {index} has size zero in {layers:?}")]
    ZeroLayerSize { index: usize, layers: Vec<usize> },

    #[error("Expected {expected} activations for {layers:?}, got {actual}")]
    ActivationCount {
        expected: usize,
        actual: usize,
        layers: Vec<usize>,
    },

    #[error("Number of atoms must be positive")]
    ZeroAtoms,

    #[error("Unknown activation {0:?}")]
    UnknownActivation(String),
}

/// Checks `layers` has at least `min` positive sizes and one activation per
/// consecutive pair.
pub(crate) fn check_layers(
    layers: &[usize],
    activations: &[Activation],
    min: usize,
) -> Result<(), ModelError> {
    if layers.len() < min {
        return Err(ModelError::TooFewLayers {
            min,
            actual: layers.to_vec(),
        });
    }
    if let Some(index) = layers.iter().position(|&size| size == 0) {
        return Err(ModelError::ZeroLayerSize {
            index,
            layers: layers.to_vec(),
        });
    }
    if activations.len() + 1 != layers.len() {
        return Err(ModelError::ActivationCount {
            expected: layers.len() - 1,
            actual: activations.len(),
            layers: layers.to_vec(),
        });
    }
    Ok(())
}
