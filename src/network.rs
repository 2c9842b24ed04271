use log::debug;
use rand::Rng;

use crate::activations::ActFn;
use crate::error::{NetError, Result};
use crate::topology::Topology;
use crate::traversal::Traversal;

/// A feedforward network over flat buffers.
///
/// The weight buffer is neuron-major in forward traversal order: for each
/// neuron, one bias weight (applied to a constant input of -1) followed by
/// one weight per incoming connection. Activations and error signals for the
/// hidden and output neurons live in two buffers sharing that indexing; the
/// raw inputs are kept in their own buffer.
///
/// `run` and `train` mutate the activation and delta buffers in place, so one
/// instance must not serve concurrent calls; the sigmoid lookup table is the
/// only shared state and is read-only once built.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) topology: Topology,
    pub(crate) hidden_act: ActFn,
    pub(crate) output_act: ActFn,
    pub(crate) weights: Vec<f64>,
    pub(crate) inputs: Vec<f64>,
    pub(crate) activations: Vec<f64>,
    pub(crate) deltas: Vec<f64>,
}

impl Network {
    /// Validates the dimensions and builds a network with every weight zero.
    ///
    /// # Arguments
    /// * `inputs` - Width of the input vector.
    /// * `hidden_layers` - Hidden layer count; zero wires inputs straight to
    ///   the output layer.
    /// * `hidden_per_layer` - Neurons per hidden layer.
    /// * `outputs` - Width of the output vector.
    /// * `hidden_act` - Activation bound to every hidden neuron.
    /// * `output_act` - Activation bound to every output neuron.
    ///
    /// # Returns
    /// `None` when the dimensions violate the topology invariants.
    pub fn new(
        inputs: usize,
        hidden_layers: usize,
        hidden_per_layer: usize,
        outputs: usize,
        hidden_act: ActFn,
        output_act: ActFn,
    ) -> Option<Self> {
        let topology = Topology::new(inputs, hidden_layers, hidden_per_layer, outputs)?;
        Some(Self::from_topology(topology, hidden_act, output_act))
    }

    /// Builds a network from an already validated topology.
    ///
    /// All buffers are allocated here to their exact derived capacities and
    /// never reallocate afterwards.
    pub fn from_topology(topology: Topology, hidden_act: ActFn, output_act: ActFn) -> Self {
        debug!(
            neurons = topology.total_neurons(),
            weights = topology.total_weights();
            "network allocated"
        );

        Self {
            topology,
            hidden_act,
            output_act,
            weights: vec![0.0; topology.total_weights()],
            inputs: Vec::with_capacity(topology.inputs()),
            activations: Vec::with_capacity(topology.total_activations()),
            deltas: Vec::with_capacity(topology.total_activations()),
        }
    }

    /// Overwrites every weight with an independent uniform draw from
    /// `[-0.5, 0.5)` using the thread-local generator.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::rng());
    }

    /// Seedable twin of [`Network::randomize`] for reproducible runs.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        for weight in &mut self.weights {
            *weight = rng.random::<f64>() - 0.5;
        }

        debug!(weights = self.weights.len(); "weights randomized");
    }

    /// Runs one forward pass, leaving the activations readable through
    /// [`Network::outputs`].
    ///
    /// A single forward-only cursor walks the weight buffer; after the output
    /// layer the pass checks that it consumed exactly the derived weight
    /// count and wrote exactly one activation per hidden/output neuron.
    ///
    /// # Errors
    /// `ShapeMismatch` when `inputs` does not match the topology;
    /// `BrokenInvariant` when a postcondition fails.
    pub fn run(&mut self, inputs: &[f64]) -> Result<()> {
        let topology = self.topology;
        if inputs.len() != topology.inputs() {
            return Err(NetError::ShapeMismatch {
                what: "inputs",
                got: inputs.len(),
                expected: topology.inputs(),
            });
        }

        self.inputs.clear();
        self.inputs.extend_from_slice(inputs);

        let mut pass = Traversal::new(&self.weights, &mut self.activations);

        if topology.hidden_layers() == 0 {
            for _ in 0..topology.outputs() {
                let sum = pass.weighted_sum(&self.inputs)?;
                pass.push(self.output_act.f(sum));
            }
        } else {
            // The first hidden layer reads the raw inputs, every later layer
            // the one before it.
            for _ in 0..topology.hidden_per_layer() {
                let sum = pass.weighted_sum(&self.inputs)?;
                pass.push(self.hidden_act.f(sum));
            }

            for layer in 1..topology.hidden_layers() {
                let prev = topology.activation_range(layer - 1);
                for _ in 0..topology.hidden_per_layer() {
                    let sum = pass.weighted_sum_over(prev.clone())?;
                    pass.push(self.hidden_act.f(sum));
                }
            }

            let last = topology.activation_range(topology.hidden_layers() - 1);
            for _ in 0..topology.outputs() {
                let sum = pass.weighted_sum_over(last.clone())?;
                pass.push(self.output_act.f(sum));
            }
        }

        let consumed = pass.consumed();
        let written = pass.written();

        if consumed != topology.total_weights() {
            return Err(NetError::BrokenInvariant {
                what: "weights consumed",
                got: consumed,
                expected: topology.total_weights(),
            });
        }
        if written != topology.total_activations() {
            return Err(NetError::BrokenInvariant {
                what: "activations written",
                got: written,
                expected: topology.total_activations(),
            });
        }

        Ok(())
    }

    /// The output-layer activations of the most recent forward pass. Empty
    /// before the first successful `run`.
    pub fn outputs(&self) -> &[f64] {
        let range = self
            .topology
            .activation_range(self.topology.hidden_layers());
        self.activations.get(range).unwrap_or(&[])
    }

    /// The flat weight buffer, neuron-major in traversal order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The validated dimensions this network was built with.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn hidden_activation(&self) -> ActFn {
        self.hidden_act
    }

    pub fn output_activation(&self) -> ActFn {
        self.output_act
    }
}
