use super::sigmoid;

/// The activation functions a layer can be bound to.
///
/// A network picks one for its hidden layers and one for its output layer at
/// construction; evaluation dispatches on the variant and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActFn {
    /// Exact logistic sigmoid, clamped past +/-45.
    Sigmoid,
    /// Sigmoid approximated by the shared lookup table (nearest entry).
    SigmoidCached,
    /// Identity.
    Linear,
    /// Hard step: 1 for positive sums, 0 otherwise.
    Threshold,
}

use ActFn::*;

impl ActFn {
    /// Maps a neuron's weighted sum to its activation.
    pub fn f(self, z: f64) -> f64 {
        match self {
            Sigmoid => sigmoid::exact(z),
            SigmoidCached => sigmoid::cached(z),
            Linear => z,
            Threshold => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Slope of the activation expressed through its own output value, the
    /// form the backward pass consumes: `o * (1 - o)` for the sigmoid family and
    /// 1 for the identity. `Threshold` outputs are saturated at 0 or 1, so
    /// its slope is 0 and no error flows through step units.
    pub fn df(self, output: f64) -> f64 {
        match self {
            Linear => 1.0,
            Sigmoid | SigmoidCached | Threshold => output * (1.0 - output),
        }
    }
}
