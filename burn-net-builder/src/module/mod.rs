pub mod component;
pub mod nn;
