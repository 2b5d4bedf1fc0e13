//! Training configuration.
//!
//! Hyperparameters for [`Network::fit`](crate::Network::fit), loadable from
//! JSON. Missing fields fall back to their defaults.
//!
//! ```json
//! { "learning_rate": 0.1, "lambda": 0.0001, "epochs": 5000, "log_every": 500 }
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

use crate::error::NetworkError;
use crate::error::Result;
use crate::network::NetworkItem;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Step size applied to every gradient update.
    pub learning_rate: f64,

    /// L2 regularization strength.
    pub lambda: f64,

    /// Number of passes over the dataset.
    pub epochs: usize,

    /// Log the dataset error every this many epochs; 0 disables it.
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            lambda: 0.0,
            epochs: 1000,
            log_every: 0,
        }
    }
}

impl TrainingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read training config {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("failed to parse training config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidConfig(
                "learning_rate must be finite and positive".to_string(),
            ));
        }

        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(NetworkError::InvalidConfig(
                "lambda must be finite and non-negative".to_string(),
            ));
        }

        if self.epochs == 0 {
            return Err(NetworkError::InvalidConfig(
                "epochs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub(crate) fn learning_rate_as<T: NetworkItem>(&self) -> Result<T> {
        convert(self.learning_rate, "learning_rate")
    }

    pub(crate) fn lambda_as<T: NetworkItem>(&self) -> Result<T> {
        convert(self.lambda, "lambda")
    }
}

fn convert<T: NetworkItem>(value: f64, name: &str) -> Result<T> {
    T::from(value).ok_or_else(|| {
        NetworkError::InvalidConfig(format!("{name} = {value} does not fit the network's float type"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = TrainingConfig::from_json(r#"{ "epochs": 50 }"#).unwrap();

        assert_eq!(config.epochs, 50);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.lambda, 0.0);
        assert_eq!(config.log_every, 0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for json in [
            r#"{ "learning_rate": 0.0 }"#,
            r#"{ "learning_rate": -1.0 }"#,
            r#"{ "lambda": -0.5 }"#,
            r#"{ "epochs": 0 }"#,
        ] {
            let result = TrainingConfig::from_json(json);
            assert!(
                matches!(result, Err(NetworkError::InvalidConfig(_))),
                "{json} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_bad_json() {
        let result = TrainingConfig::from_json(r#"{ "epochs": "many" }"#);
        assert!(matches!(result, Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = TrainingConfig::from_path("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
