pub mod error;
pub mod module;
pub mod net_builder;
pub mod normalization;

pub use error::{NetBuilderError, Result};
