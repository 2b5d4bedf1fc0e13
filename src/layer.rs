use rand::distributions::Distribution;
use rand::distributions::Standard;
use rand::Rng;

use crate::activation::sigmoid;
use crate::activation::sigmoid_derivative;
use crate::error::NetworkError;
use crate::error::Result;
use crate::matrix::uniform_symmetric;
use crate::matrix::Matrix;
use crate::network::NetworkItem;

/// A dense layer: affine transform followed by a sigmoid.
///
/// The layer keeps the activation of its most recent [`Layer::feedforward`]
/// call, which [`Layer::backpropagate`] reads back when computing deltas.
#[derive(Debug, Clone)]
pub struct Layer<T>
where
    T: NetworkItem,
{
    weights: Matrix<T>,
    bias: Vec<T>,
    activation: Vec<T>,
}

impl<T> Layer<T>
where
    T: NetworkItem,
    Standard: Distribution<T>,
{
    /// Create a layer of `nodes` nodes, each reading `inputs` values, with
    /// weights and biases drawn uniformly from [-1, 1).
    pub fn new<R: Rng + ?Sized>(inputs: usize, nodes: usize, rng: &mut R) -> Self {
        let mut weights = Matrix::new(inputs, nodes);
        weights.randomize(rng);
        let bias = (0..nodes).map(|_| uniform_symmetric(rng)).collect();

        Self {
            weights,
            bias,
            activation: vec![T::zero(); nodes],
        }
    }
}

impl<T> Layer<T>
where
    T: NetworkItem,
{
    /// Assemble a layer from existing parameters. The activation buffer starts zeroed.
    pub fn from_parts(weights: Matrix<T>, bias: Vec<T>) -> Result<Self> {
        if weights.rows == 0 || weights.cols == 0 {
            return Err(NetworkError::EmptyVector);
        }
        if bias.len() != weights.rows {
            return Err(NetworkError::DimensionMismatch {
                expected: weights.rows,
                actual: bias.len(),
            });
        }

        let activation = vec![T::zero(); weights.rows];
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    pub fn inputs(&self) -> usize {
        self.weights.cols
    }

    pub fn nodes(&self) -> usize {
        self.weights.rows
    }

    pub fn weights(&self) -> &Matrix<T> {
        &self.weights
    }

    pub fn bias(&self) -> &[T] {
        &self.bias
    }

    /// Output of the most recent forward pass.
    pub fn activation(&self) -> &[T] {
        &self.activation
    }

    /// Run `input` through the layer.
    ///
    /// The returned slice is the layer's own activation buffer; it stays valid
    /// until the layer is next mutated.
    pub fn feedforward(&mut self, input: &[T]) -> Result<&[T]> {
        self.check_inputs(input)?;

        for (i, value) in self.activation.iter_mut().enumerate() {
            let sum = self
                .weights
                .row(i)
                .iter()
                .zip(input)
                .fold(self.bias[i], |acc, (&w, &x)| acc + w * x);
            *value = sigmoid(sum);
        }

        Ok(&self.activation)
    }

    /// Apply one gradient step for `error` and return the residual for the previous layer.
    ///
    /// `input` must be the value last passed to [`Layer::feedforward`]. The
    /// residual is accumulated from each weight before that weight is updated.
    pub fn backpropagate(&mut self, input: &[T], error: &[T], rate: T) -> Result<Vec<T>> {
        self.check_inputs(input)?;
        if error.len() != self.nodes() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.nodes(),
                actual: error.len(),
            });
        }

        let mut residual = vec![T::zero(); self.inputs()];

        for (i, &err) in error.iter().enumerate() {
            let cost = err * sigmoid_derivative(self.activation[i]);
            let row = self.weights.row_mut(i);

            for ((weight, acc), &x) in row.iter_mut().zip(residual.iter_mut()).zip(input) {
                *acc += cost * *weight;
                *weight += rate * cost * x;
            }

            self.bias[i] += rate * cost;
        }

        Ok(residual)
    }

    /// Subtract a weight-decay term of the same shape as the weights.
    pub(crate) fn decay(&mut self, theta: &Matrix<T>) {
        self.weights -= theta;
    }

    fn check_inputs(&self, input: &[T]) -> Result<()> {
        if input.len() != self.inputs() {
            return Err(NetworkError::DimensionMismatch {
                expected: self.inputs(),
                actual: input.len(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::activation::sigmoid;

    fn fixed_layer() -> Layer<f64> {
        let weights = Matrix::from_rows(&[vec![0.5, -0.25], vec![0.1, 0.2]]).unwrap();
        Layer::from_parts(weights, vec![0.1, -0.3]).unwrap()
    }

    #[test]
    fn test_feedforward_computes_affine_sigmoid() {
        let mut layer = fixed_layer();
        let out = layer.feedforward(&[1.0, 2.0]).unwrap().to_vec();

        assert_relative_eq!(out[0], sigmoid(0.1 + 0.5 - 0.5), epsilon = 1e-12);
        assert_relative_eq!(out[1], sigmoid(-0.3 + 0.1 + 0.4), epsilon = 1e-12);
        assert_eq!(layer.activation(), out.as_slice());
    }

    #[test]
    fn test_feedforward_rejects_wrong_width() {
        let mut layer = fixed_layer();
        let result = layer.feedforward(&[1.0, 2.0, 3.0]);

        assert!(matches!(
            result,
            Err(NetworkError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_backpropagate_uses_pre_update_weights() {
        let mut layer = fixed_layer();
        let input = [1.0, 2.0];
        let before = layer.clone();
        layer.feedforward(&input).unwrap();
        let activation = layer.activation().to_vec();

        let error = [0.4, -0.2];
        let rate = 0.5;
        let residual = layer.backpropagate(&input, &error, rate).unwrap();

        let costs: Vec<f64> = error
            .iter()
            .zip(&activation)
            .map(|(e, a)| e * a * (1.0 - a))
            .collect();

        for j in 0..2 {
            let expected = costs[0] * before.weights()[(j, 0)] + costs[1] * before.weights()[(j, 1)];
            assert_relative_eq!(residual[j], expected, epsilon = 1e-12);
        }

        for i in 0..2 {
            for j in 0..2 {
                let expected = before.weights()[(j, i)] + rate * costs[i] * input[j];
                assert_relative_eq!(layer.weights()[(j, i)], expected, epsilon = 1e-12);
            }
            assert_relative_eq!(layer.bias()[i], before.bias()[i] + rate * costs[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_backpropagate_rejects_wrong_error_width() {
        let mut layer = fixed_layer();
        layer.feedforward(&[1.0, 2.0]).unwrap();

        let result = layer.backpropagate(&[1.0, 2.0], &[0.1], 0.1);
        assert!(matches!(
            result,
            Err(NetworkError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_from_parts_checks_bias_length() {
        let weights = Matrix::from_rows(&[vec![1.0], vec![2.0]]).unwrap();
        let result = Layer::from_parts(weights, vec![0.0]);

        assert!(matches!(
            result,
            Err(NetworkError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
