use std::fmt;

use num::Float;
use rand::distributions::Distribution;
use rand::distributions::Standard;
use rand::Rng;
use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::config::TrainingConfig;
use crate::error::NetworkError;
use crate::error::Result;
use crate::layer::Layer;
use crate::matrix::MatrixItem;

/// A labelled training example: input vector and expected output vector.
pub type Sample<T> = (Vec<T>, Vec<T>);

/// Feed-forward network with one hidden layer and one output layer.
#[derive(Debug, Clone)]
pub struct Network<T = f64>
where
    T: NetworkItem,
{
    hidden: Layer<T>,
    output: Layer<T>,
    /// Whether both activation buffers hold the result of the last `activate`.
    activated: bool,
}

impl<T> Network<T>
where
    T: NetworkItem,
    Standard: Distribution<T>,
{
    /// Create a new network with every weight and bias drawn uniformly from [-1, 1).
    pub fn new<R: Rng + ?Sized>(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if inputs == 0 || hidden == 0 || outputs == 0 {
            return Err(NetworkError::InvalidTopology {
                inputs,
                hidden,
                outputs,
            });
        }

        debug!(inputs, hidden, outputs, "constructing network");

        Ok(Self {
            hidden: Layer::new(inputs, hidden, rng),
            output: Layer::new(hidden, outputs, rng),
            activated: false,
        })
    }
}

impl<T> Network<T>
where
    T: NetworkItem,
{
    /// Chain two existing layers. The output layer must read exactly as many
    /// values as the hidden layer produces.
    pub fn from_layers(hidden: Layer<T>, output: Layer<T>) -> Result<Self> {
        if output.inputs() != hidden.nodes() {
            return Err(NetworkError::DimensionMismatch {
                expected: hidden.nodes(),
                actual: output.inputs(),
            });
        }

        Ok(Self {
            hidden,
            output,
            activated: false,
        })
    }

    pub fn hidden(&self) -> &Layer<T> {
        &self.hidden
    }

    pub fn output(&self) -> &Layer<T> {
        &self.output
    }

    pub fn inputs(&self) -> usize {
        self.hidden.inputs()
    }

    pub fn outputs(&self) -> usize {
        self.output.nodes()
    }

    /// Forwards the input through both layers and returns a copy of the output.
    pub fn activate(&mut self, input: &[T]) -> Result<Vec<T>> {
        self.activated = false;

        let hidden = self.hidden.feedforward(input)?;
        let result = self.output.feedforward(hidden)?.to_vec();

        self.activated = true;
        Ok(result)
    }

    /// One backpropagation step with L2 weight decay.
    ///
    /// Must directly follow `activate` with the same `input`. The decay terms
    /// are `lambda / input.len()` times a snapshot of the weights taken before
    /// backpropagation, and are subtracted once both layers have been updated.
    pub fn train(&mut self, input: &[T], expected: &[T], rate: T, lambda: T) -> Result<()> {
        if !self.activated {
            return Err(NetworkError::NotActivated);
        }
        check_len(self.inputs(), input)?;
        check_len(self.outputs(), expected)?;

        let scale = lambda / scalar::<T>(input.len())?;
        let theta1 = self.hidden.weights().clone() * scale;
        let theta2 = self.output.weights().clone() * scale;

        let error: Vec<T> = expected
            .iter()
            .zip(self.output.activation())
            .map(|(&e, &a)| e - a)
            .collect();

        let residual = self
            .output
            .backpropagate(self.hidden.activation(), &error, rate)?;
        self.hidden.backpropagate(input, &residual, rate)?;

        self.hidden.decay(&theta1);
        self.output.decay(&theta2);

        self.activated = false;
        trace!(error = ?error, "training step");

        Ok(())
    }

    /// `activate` followed by `train` on the same sample.
    pub fn train_sample(&mut self, input: &[T], expected: &[T], rate: T, lambda: T) -> Result<()> {
        self.activate(input)?;
        self.train(input, expected, rate, lambda)
    }

    /// Mean of the per-sample squared error over a dataset.
    pub fn dataset_error(&mut self, samples: &[Sample<T>]) -> Result<T> {
        if samples.is_empty() {
            return Err(NetworkError::EmptyVector);
        }

        let mut total = T::zero();
        for (input, expected) in samples {
            let result = self.activate(input)?;
            total += mean_squared_error(&result, expected)?;
        }

        Ok(total / scalar::<T>(samples.len())?)
    }

    /// Stochastic gradient descent over `samples`, one step per sample, for
    /// `config.epochs` epochs. Returns the dataset error after the last epoch.
    pub fn fit(&mut self, samples: &[Sample<T>], config: &TrainingConfig) -> Result<T> {
        config.validate()?;
        if samples.is_empty() {
            return Err(NetworkError::EmptyVector);
        }

        let rate = config.learning_rate_as::<T>()?;
        let lambda = config.lambda_as::<T>()?;

        for epoch in 1..=config.epochs {
            for (input, expected) in samples {
                self.train_sample(input, expected, rate, lambda)?;
            }

            if config.log_every > 0 && epoch % config.log_every == 0 {
                let error = self.dataset_error(samples)?;
                debug!(epoch, error = ?error, "epoch finished");
            }
        }

        let error = self.dataset_error(samples)?;
        info!(epochs = config.epochs, samples = samples.len(), error = ?error, "training finished");

        Ok(error)
    }

    /// Mean squared error plus `lambda / 2n` times the sum of every squared
    /// weight in both layers, where `n = result.len()`.
    pub fn regularized_cost(&self, result: &[T], expected: &[T], lambda: T) -> Result<T> {
        let mse = mean_squared_error(result, expected)?;
        let two = T::one() + T::one();
        let squares = self.hidden.weights().sum_squares() + self.output.weights().sum_squares();

        Ok(mse + lambda / (two * scalar::<T>(result.len())?) * squares)
    }
}

/// `Σ (expected_i - result_i)^2 / n`.
pub fn mean_squared_error<T: NetworkItem>(result: &[T], expected: &[T]) -> Result<T> {
    if result.is_empty() {
        return Err(NetworkError::EmptyVector);
    }
    check_len(result.len(), expected)?;

    let sum = result
        .iter()
        .zip(expected)
        .fold(T::zero(), |acc, (&r, &e)| acc + (e - r) * (e - r));

    Ok(sum / scalar::<T>(result.len())?)
}

fn check_len<T>(expected: usize, values: &[T]) -> Result<()> {
    if values.len() != expected {
        return Err(NetworkError::DimensionMismatch {
            expected,
            actual: values.len(),
        });
    }

    Ok(())
}

fn scalar<T: NetworkItem>(n: usize) -> Result<T> {
    T::from(n).ok_or(NetworkError::Unrepresentable(n))
}

impl<T> fmt::Display for Network<T>
where
    T: NetworkItem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hidden=[Weights={}, Bias={:?}]\nOutput=[Weights={}, Bias={:?}]",
            self.hidden.weights(),
            self.hidden.bias(),
            self.output.weights(),
            self.output.bias(),
        )
    }
}

pub trait NetworkItem: MatrixItem + Float {}
impl NetworkItem for f32 {}
impl NetworkItem for f64 {}
