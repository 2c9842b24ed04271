use std::ops::Range;

use crate::error::{NetError, Result};

/// One forward pass's cursor state: a forward-only read position over the
/// flat weight buffer plus the append position of the activation buffer.
///
/// Every layer step threads the same traversal, so the "weights consumed
/// equals total" invariant lives in one object instead of being spread
/// across loop bounds.
pub(crate) struct Traversal<'net> {
    weights: &'net [f64],
    read: usize,
    activations: &'net mut Vec<f64>,
}

impl<'net> Traversal<'net> {
    /// Starts a traversal at the first weight and clears `activations`.
    pub(crate) fn new(weights: &'net [f64], activations: &'net mut Vec<f64>) -> Self {
        activations.clear();

        Self {
            weights,
            read: 0,
            activations,
        }
    }

    /// Consumes one neuron's weights (bias first) against a raw source
    /// slice: `-bias + sum(weight * source)`.
    ///
    /// # Errors
    /// `BrokenInvariant` when the cursor would run past the buffer, meaning
    /// the derived weight count and the layer loops disagree.
    pub(crate) fn weighted_sum(&mut self, sources: &[f64]) -> Result<f64> {
        let mut sum = -self.next_weight()?;
        for &source in sources {
            let weight = self.next_weight()?;
            sum += weight * source;
        }

        Ok(sum)
    }

    /// Same as [`Traversal::weighted_sum`], with the sources taken from a
    /// range of activations this traversal already wrote (a previous layer).
    pub(crate) fn weighted_sum_over(&mut self, prev: Range<usize>) -> Result<f64> {
        let mut sum = -self.next_weight()?;
        for k in prev {
            let weight = self.next_weight()?;
            sum += weight * self.activations[k];
        }

        Ok(sum)
    }

    /// Appends one activation in traversal order.
    pub(crate) fn push(&mut self, activation: f64) {
        self.activations.push(activation);
    }

    /// Weights consumed so far.
    pub(crate) fn consumed(&self) -> usize {
        self.read
    }

    /// Activations written so far.
    pub(crate) fn written(&self) -> usize {
        self.activations.len()
    }

    fn next_weight(&mut self) -> Result<f64> {
        let weight = self
            .weights
            .get(self.read)
            .copied()
            .ok_or(NetError::BrokenInvariant {
                what: "weights consumed",
                got: self.read + 1,
                expected: self.weights.len(),
            })?;

        self.read += 1;
        Ok(weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_bias_then_connection_weights() {
        let weights = [0.5, 2.0, 3.0];
        let mut activations = Vec::new();
        let mut traversal = Traversal::new(&weights, &mut activations);

        let sum = traversal.weighted_sum(&[10.0, 100.0]).unwrap();
        assert_eq!(sum, -0.5 + 2.0 * 10.0 + 3.0 * 100.0);
        assert_eq!(traversal.consumed(), 3);
    }

    #[test]
    fn reads_previously_written_activations_by_range() {
        let weights = [0.25, 0.5, 4.0];
        let mut activations = Vec::new();
        let mut traversal = Traversal::new(&weights, &mut activations);

        traversal.push(2.0);
        traversal.push(3.0);

        let sum = traversal.weighted_sum_over(0..2).unwrap();
        assert_eq!(sum, -0.25 + 0.5 * 2.0 + 4.0 * 3.0);
        assert_eq!(traversal.consumed(), 3);
        assert_eq!(traversal.written(), 2);
    }

    #[test]
    fn errors_instead_of_reading_past_the_buffer() {
        let weights = [1.0, 2.0];
        let mut activations = Vec::new();
        let mut traversal = Traversal::new(&weights, &mut activations);

        let err = traversal.weighted_sum(&[1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            NetError::BrokenInvariant {
                what: "weights consumed",
                got: 3,
                expected: 2,
            }
        );
    }

    #[test]
    fn clears_stale_activations_from_the_last_pass() {
        let weights = [1.0];
        let mut activations = vec![9.0, 9.0, 9.0];
        let traversal = Traversal::new(&weights, &mut activations);

        assert_eq!(traversal.written(), 0);
    }
}
