use std::ops::Range;

/// Validated structural parameters of a network, plus every derived count and
/// offset of its flat buffers.
///
/// Weights are neuron-major: each neuron in forward traversal order owns one
/// bias weight followed by one weight per incoming connection. All offset
/// arithmetic over that layout lives here so the passes and the tests agree
/// on a single source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    inputs: usize,
    hidden_layers: usize,
    hidden_per_layer: usize,
    outputs: usize,
}

impl Topology {
    /// Validates the dimensions and builds a topology.
    ///
    /// # Returns
    /// `None` when `inputs` or `outputs` is zero, or when hidden layers are
    /// requested with zero neurons per layer. `hidden_per_layer` is ignored
    /// when `hidden_layers` is zero.
    pub fn new(
        inputs: usize,
        hidden_layers: usize,
        hidden_per_layer: usize,
        outputs: usize,
    ) -> Option<Self> {
        if inputs == 0 || outputs == 0 {
            return None;
        }
        if hidden_layers > 0 && hidden_per_layer == 0 {
            return None;
        }

        Some(Self {
            inputs,
            hidden_layers,
            hidden_per_layer,
            outputs,
        })
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn hidden_layers(&self) -> usize {
        self.hidden_layers
    }

    pub fn hidden_per_layer(&self) -> usize {
        self.hidden_per_layer
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Total neuron count, raw inputs included.
    pub fn total_neurons(&self) -> usize {
        self.inputs + self.hidden_per_layer * self.hidden_layers + self.outputs
    }

    /// Number of activations one forward pass writes: every hidden and output
    /// neuron. Raw inputs live in their own buffer and are not counted.
    pub fn total_activations(&self) -> usize {
        self.total_neurons() - self.inputs
    }

    /// Weights owned by all hidden layers together.
    pub fn hidden_weights(&self) -> usize {
        if self.hidden_layers == 0 {
            return 0;
        }

        let first = (self.inputs + 1) * self.hidden_per_layer;
        let rest = (self.hidden_layers - 1) * (self.hidden_per_layer + 1) * self.hidden_per_layer;
        first + rest
    }

    /// Weights owned by the output layer: one bias plus one weight per
    /// incoming connection for each of the `outputs` neurons.
    pub fn output_weights(&self) -> usize {
        let fan_in = if self.hidden_layers == 0 {
            self.inputs
        } else {
            self.hidden_per_layer
        };

        (fan_in + 1) * self.outputs
    }

    /// Total weight count of the network.
    pub fn total_weights(&self) -> usize {
        self.hidden_weights() + self.output_weights()
    }

    /// The weight range owned by one forward layer. Hidden layers are indexed
    /// `0..hidden_layers`; the output layer is index `hidden_layers`.
    ///
    /// # Panics
    /// If `layer > hidden_layers`.
    pub fn weight_block(&self, layer: usize) -> Range<usize> {
        assert!(layer <= self.hidden_layers, "layer index out of range");

        if layer == self.hidden_layers {
            let start = self.hidden_weights();
            return start..start + self.output_weights();
        }

        let first = (self.inputs + 1) * self.hidden_per_layer;
        if layer == 0 {
            return 0..first;
        }

        let per_layer = (self.hidden_per_layer + 1) * self.hidden_per_layer;
        let start = first + (layer - 1) * per_layer;
        start..start + per_layer
    }

    /// The range a forward layer writes into the activation and delta
    /// buffers. Same layer indexing as [`Topology::weight_block`].
    ///
    /// # Panics
    /// If `layer > hidden_layers`.
    pub fn activation_range(&self, layer: usize) -> Range<usize> {
        assert!(layer <= self.hidden_layers, "layer index out of range");

        let start = layer * self.hidden_per_layer;
        if layer == self.hidden_layers {
            start..start + self.outputs
        } else {
            start..start + self.hidden_per_layer
        }
    }
}
