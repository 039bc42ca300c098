//! Per-feature normalization descriptors.
//!
//! Only the parts needed to size a network's input layer are interpreted here;
//! the statistics are carried along so the same JSON can feed a preprocessor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Normalization data contains no features")]
    Empty,

    #[error("Enum feature {feature} has no possible values")]
    EnumWithoutValues { feature: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    Binary,
    Probability,
    Continuous,
    Boxcox,
    Enum,
    Quantile,
    ContinuousAction,
    DoNotPreprocess,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    pub feature_type: FeatureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxcox_lambda: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxcox_shift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stddev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantiles: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl NormalizationParameters {
    fn of_type(feature_type: FeatureType) -> Self {
        Self {
            feature_type,
            boxcox_lambda: None,
            boxcox_shift: None,
            mean: None,
            stddev: None,
            possible_values: None,
            quantiles: None,
            min_value: None,
            max_value: None,
        }
    }

    pub fn continuous(mean: f64, stddev: f64) -> Self {
        Self {
            mean: Some(mean),
            stddev: Some(stddev),
            ..Self::of_type(FeatureType::Continuous)
        }
    }

    pub fn binary() -> Self {
        Self::of_type(FeatureType::Binary)
    }

    pub fn enumeration(possible_values: Vec<i64>) -> Self {
        Self {
            possible_values: Some(possible_values),
            ..Self::of_type(FeatureType::Enum)
        }
    }

    /// Width this feature occupies after preprocessing: one-hot for enums,
    /// a single column otherwise.
    pub fn num_output_features(&self) -> usize {
        match self.feature_type {
            FeatureType::Enum => self.possible_values.as_ref().map_or(0, Vec::len),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationData {
    pub dense_normalization_parameters: BTreeMap<i32, NormalizationParameters>,
}

impl NormalizationData {
    pub fn new(dense_normalization_parameters: BTreeMap<i32, NormalizationParameters>) -> Self {
        Self {
            dense_normalization_parameters,
        }
    }

    pub fn num_features(&self) -> usize {
        self.dense_normalization_parameters.len()
    }

    /// Input dimensionality of a network fed with these features.
    pub fn num_output_features(&self) -> Result<usize, NormalizationError> {
        if self.dense_normalization_parameters.is_empty() {
            return Err(NormalizationError::Empty);
        }
        self.dense_normalization_parameters
            .iter()
            .map(|(&feature, parameters)| match parameters.num_output_features() {
                0 => Err(NormalizationError::EnumWithoutValues { feature }),
                n => Ok(n),
            })
            .sum()
    }
}

impl FromIterator<(i32, NormalizationParameters)> for NormalizationData {
    fn from_iter<T: IntoIterator<Item = (i32, NormalizationParameters)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
