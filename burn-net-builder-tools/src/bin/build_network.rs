use std::fs;

use anyhow::{bail, Context, Result};
use burn::{backend::NdArray, prelude::*};
use burn_net_builder::{
    module::nn::QuantileQNetwork,
    net_builder::{QRDQNNetBuilder, QRDQNNetBuilderUnion, ValueNetBuilder, ValueNetBuilderUnion},
    normalization::NormalizationData,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "usage: build_network <builder.json> <normalization.json> [output_dim]";

fn read(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (builder_path, normalization_path, output_dim) = match args.as_slice() {
        [builder, normalization] => (builder, normalization, None),
        [builder, normalization, output_dim] => {
            let output_dim = output_dim
                .parse::<usize>()
                .with_context(|| format!("Invalid output dimension {:?}", output_dim))?;
            (builder, normalization, Some(output_dim))
        }
        _ => bail!(USAGE),
    };

    let builder_json = read(builder_path)?;
    let data: NormalizationData = serde_json::from_str(&read(normalization_path)?)
        .with_context(|| format!("Invalid normalization data in {}", normalization_path))?;
    info!(
        num_features = data.num_features(),
        "loaded normalization data"
    );

    type B = NdArray;
    let device: &Device<B> = &Default::default();

    match output_dim {
        Some(output_dim) => {
            let builder = QRDQNNetBuilderUnion::from_json_str(&builder_json)?;
            let network = builder.build_q_network::<B>(&data, output_dim, device)?;
            info!(
                builder = builder.name(),
                layers = ?network.layers(),
                activations = ?network.activations(),
                num_atoms = network.num_atoms(),
                num_params = network.num_params(),
                "built q-network"
            );
        }
        None => {
            let builder = ValueNetBuilderUnion::from_json_str(&builder_json)?;
            let network = builder.build_value_network::<B>(&data, device)?;
            info!(
                builder = builder.name(),
                layers = ?network.layers(),
                activations = ?network.activations(),
                num_params = network.num_params(),
                "built value network"
            );
        }
    }
    Ok(())
}
