//! A configurable feedforward neural network over flat buffers: validated
//! construction, a cursor-driven forward pass, and single-example
//! backpropagation. Construct, randomize the weights, then `run` or `train`.

mod activations;
mod error;
mod network;
mod topology;
mod training;
mod traversal;

pub use activations::{ActFn, init_sigmoid_lookup};
pub use error::{NetError, Result};
pub use network::Network;
pub use topology::Topology;
