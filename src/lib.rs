//! A small feed-forward neural network with one hidden layer.
//!
//! Networks are trained one sample at a time with backpropagation and L2
//! weight decay. Every layer uses a sigmoid activation.
//!
//! ```
//! use neural::Network;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let mut network: Network = Network::new(2, 3, 1, &mut rng)?;
//!
//! let output = network.activate(&[1.0, 0.0])?;
//! network.train(&[1.0, 0.0], &[1.0], 0.1, 0.0)?;
//! assert_eq!(output.len(), 1);
//! # Ok::<(), neural::NetworkError>(())
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod layer;
pub mod matrix;
pub mod network;
mod persist;

pub use config::TrainingConfig;
pub use error::NetworkError;
pub use error::Result;
pub use layer::Layer;
pub use matrix::Matrix;
pub use network::mean_squared_error;
pub use network::Network;
pub use network::NetworkItem;
pub use network::Sample;
