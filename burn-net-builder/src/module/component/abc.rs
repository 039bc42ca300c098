use burn::{prelude::Backend, tensor::Tensor};

/// Estimates the value of taking `actions` in `observations`.
pub trait Critic<B: Backend> {
    type OBatch;
    type ABatch;

    fn q_batch(&self, observations: &Self::OBatch, actions: &Self::ABatch) -> Tensor<B, 1>;
}

/// Estimates the value of `observations`.
pub trait Value<B: Backend> {
    type OBatch;

    fn v_batch(&self, observations: &Self::OBatch) -> Tensor<B, 1>;
}
