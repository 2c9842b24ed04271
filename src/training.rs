use crate::error::{NetError, Result};
use crate::network::Network;

impl Network {
    /// Takes one gradient step: a forward pass, per-neuron error signals, and
    /// an in-place weight update.
    ///
    /// Deltas share the activation buffer's traversal order. Output deltas
    /// are the scaled prediction error; hidden deltas are backpropagated from
    /// the last hidden layer to the first. Every delta is computed before any
    /// weight changes, so the whole update is one gradient step taken at the
    /// pre-update weights. No momentum, decay, or batching; the caller owns
    /// any epoch loop.
    ///
    /// # Errors
    /// Anything `run` returns, plus `ShapeMismatch` when `desired` does not
    /// match the output width.
    pub fn train(&mut self, inputs: &[f64], desired: &[f64], learning_rate: f64) -> Result<()> {
        self.run(inputs)?;

        if desired.len() != self.topology.outputs() {
            return Err(NetError::ShapeMismatch {
                what: "desired outputs",
                got: desired.len(),
                expected: self.topology.outputs(),
            });
        }

        self.deltas.clear();
        self.deltas.resize(self.topology.total_activations(), 0.0);

        self.output_deltas(desired);
        self.hidden_deltas();
        self.update_output_layer(learning_rate);
        self.update_hidden_layers(learning_rate);

        Ok(())
    }

    /// Scaled prediction error for each output neuron.
    fn output_deltas(&mut self, desired: &[f64]) {
        let range = self
            .topology
            .activation_range(self.topology.hidden_layers());

        for (i, &want) in desired.iter().enumerate() {
            let got = self.activations[range.start + i];
            self.deltas[range.start + i] = (want - got) * self.output_act.df(got);
        }
    }

    /// Backpropagates the error signals from the last hidden layer to the
    /// first. The weights tying hidden neuron `j` to the layer in front sit
    /// at offset `k * (fan + 1) + (j + 1)` of that layer's block for each forward
    /// neuron `k`; offset 0 is `k`'s bias weight and is skipped.
    fn hidden_deltas(&mut self) {
        let topology = self.topology;

        for layer in (0..topology.hidden_layers()).rev() {
            let this = topology.activation_range(layer);
            let next = topology.activation_range(layer + 1);
            let block = topology.weight_block(layer + 1);
            let fan = topology.hidden_per_layer() + 1;

            for j in 0..topology.hidden_per_layer() {
                let mut sum = 0.0;
                for k in 0..next.len() {
                    let weight = self.weights[block.start + k * fan + j + 1];
                    sum += self.deltas[next.start + k] * weight;
                }

                let output = self.activations[this.start + j];
                self.deltas[this.start + j] = self.hidden_act.df(output) * sum;
            }
        }
    }

    /// Applies `w += rate * delta * source` across the output layer; the
    /// bias source is the constant -1.
    fn update_output_layer(&mut self, rate: f64) {
        let topology = self.topology;
        let deltas = topology.activation_range(topology.hidden_layers());
        let block = topology.weight_block(topology.hidden_layers());
        let fan = block.len() / topology.outputs();

        let sources: &[f64] = if topology.hidden_layers() == 0 {
            &self.inputs
        } else {
            let last = topology.activation_range(topology.hidden_layers() - 1);
            &self.activations[last]
        };

        for i in 0..topology.outputs() {
            let delta = self.deltas[deltas.start + i];
            let base = block.start + i * fan;

            self.weights[base] += rate * delta * -1.0;
            for (k, &source) in sources.iter().enumerate() {
                self.weights[base + 1 + k] += rate * delta * source;
            }
        }
    }

    /// Same update for the hidden layers, walked last-to-first to mirror the
    /// delta computation.
    fn update_hidden_layers(&mut self, rate: f64) {
        let topology = self.topology;

        for layer in (0..topology.hidden_layers()).rev() {
            let deltas = topology.activation_range(layer);
            let block = topology.weight_block(layer);
            let fan = block.len() / topology.hidden_per_layer();

            let sources: &[f64] = if layer == 0 {
                &self.inputs
            } else {
                let prev = topology.activation_range(layer - 1);
                &self.activations[prev]
            };

            for j in 0..topology.hidden_per_layer() {
                let delta = self.deltas[deltas.start + j];
                let base = block.start + j * fan;

                self.weights[base] += rate * delta * -1.0;
                for (k, &source) in sources.iter().enumerate() {
                    self.weights[base + 1 + k] += rate * delta * source;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::activations::ActFn;
    use crate::error::NetError;
    use crate::network::Network;
    use approx::assert_relative_eq;

    #[test]
    fn train_rejects_mismatched_desired_width() {
        let mut net = Network::new(2, 1, 2, 1, ActFn::Sigmoid, ActFn::Sigmoid).unwrap();
        let err = net.train(&[0.0, 0.0], &[0.0, 0.0], 0.1).unwrap_err();
        assert_eq!(
            err,
            NetError::ShapeMismatch {
                what: "desired outputs",
                got: 2,
                expected: 1,
            }
        );
    }

    /// One input, one sigmoid hidden neuron, one linear output, all formulas
    /// traced by hand: forward gives `s = sigmoid(1)`, the output delta is
    /// `1 - s` and the hidden delta `s * (1 - s) * (1 - s)` through the unit
    /// output weight.
    #[test]
    fn one_step_matches_hand_computed_gradients() {
        let mut net = Network::new(1, 1, 1, 1, ActFn::Sigmoid, ActFn::Linear).unwrap();
        net.weights.copy_from_slice(&[0.0, 1.0, 0.0, 1.0]);

        net.train(&[1.0], &[1.0], 0.5).unwrap();

        let s = 1.0 / (1.0 + (-1.0f64).exp());
        let delta_o = 1.0 - s;
        let delta_h = (s * (1.0 - s)) * (delta_o * 1.0);

        let expected = [
            -(0.5 * delta_h),
            1.0 + 0.5 * delta_h,
            -(0.5 * delta_o),
            1.0 + 0.5 * delta_o * s,
        ];
        for (got, want) in net.weights().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    /// Two hidden neurons with distinct output weights: the backpropagated
    /// sums must pick each neuron's own column, not its sibling's.
    #[test]
    fn backprop_distinguishes_sibling_hidden_neurons() {
        let mut net = Network::new(1, 1, 2, 1, ActFn::Sigmoid, ActFn::Linear).unwrap();
        net.weights
            .copy_from_slice(&[0.0, 1.0, 0.0, -1.0, 0.0, 0.5, 0.25]);

        net.train(&[1.0], &[1.0], 0.1).unwrap();

        let o1 = 1.0 / (1.0 + (-1.0f64).exp());
        let o2 = 1.0 / (1.0 + 1.0f64.exp());
        let out = 0.5 * o1 + 0.25 * o2;
        let delta_o = 1.0 - out;
        let delta_h1 = (o1 * (1.0 - o1)) * (delta_o * 0.5);
        let delta_h2 = (o2 * (1.0 - o2)) * (delta_o * 0.25);

        let expected = [
            -(0.1 * delta_h1),
            1.0 + 0.1 * delta_h1,
            -(0.1 * delta_h2),
            -1.0 + 0.1 * delta_h2,
            -(0.1 * delta_o),
            0.5 + 0.1 * delta_o * o1,
            0.25 + 0.1 * delta_o * o2,
        ];
        for (got, want) in net.weights().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn saturated_threshold_output_passes_no_gradient() {
        let mut net = Network::new(1, 0, 0, 1, ActFn::Sigmoid, ActFn::Threshold).unwrap();
        net.weights.copy_from_slice(&[0.0, 1.0]);

        net.train(&[2.0], &[0.0], 0.5).unwrap();

        assert_eq!(net.outputs(), &[1.0]);
        assert_eq!(net.weights(), &[0.0, 1.0]);
    }
}
