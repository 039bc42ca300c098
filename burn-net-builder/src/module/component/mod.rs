mod abc;

pub use abc::{Critic, Value};
