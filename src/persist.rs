//! JSON persistence of network weights and biases.
//!
//! The record has the shape
//! `{"Hidden":{"Weight":[[..]],"Bias":[..]},"Output":{"Weight":[[..]],"Bias":[..]}}`.
//! Activation buffers are not stored; a loaded network starts with zeroed
//! buffers and must be activated before it can be trained.

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::NetworkError;
use crate::error::Result;
use crate::layer::Layer;
use crate::matrix::Matrix;
use crate::network::Network;
use crate::network::NetworkItem;

#[derive(Debug, Serialize, Deserialize)]
struct LayerRecord<T> {
    #[serde(rename = "Weight")]
    weight: Vec<Vec<T>>,
    #[serde(rename = "Bias")]
    bias: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NetworkRecord<T> {
    #[serde(rename = "Hidden")]
    hidden: LayerRecord<T>,
    #[serde(rename = "Output")]
    output: LayerRecord<T>,
}

impl<T: NetworkItem> LayerRecord<T> {
    fn from_layer(layer: &Layer<T>) -> Self {
        Self {
            weight: layer.weights().to_rows(),
            bias: layer.bias().to_vec(),
        }
    }

    fn into_layer(self, name: &str) -> Result<Layer<T>> {
        Matrix::from_rows(&self.weight)
            .and_then(|weights| Layer::from_parts(weights, self.bias))
            .map_err(|err| NetworkError::MalformedState(format!("{name} layer: {err}")))
    }
}

impl<T> Network<T>
where
    T: NetworkItem + Serialize + DeserializeOwned,
{
    /// Write the weights and biases as a single JSON line.
    ///
    /// JSON has no representation for NaN or infinity, so a network holding
    /// such a value is refused with [`NetworkError::MalformedState`] and
    /// nothing is written.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        for (name, layer) in [("hidden", self.hidden()), ("output", self.output())] {
            let finite = layer
                .weights()
                .items
                .iter()
                .chain(layer.bias())
                .all(|value| value.is_finite());
            if !finite {
                return Err(NetworkError::MalformedState(format!(
                    "{name} layer holds a non-finite weight or bias"
                )));
            }
        }

        let record = NetworkRecord {
            hidden: LayerRecord::from_layer(self.hidden()),
            output: LayerRecord::from_layer(self.output()),
        };

        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        debug!(inputs = self.inputs(), outputs = self.outputs(), "saved network");
        Ok(())
    }

    /// Read a network written by [`Network::save`].
    ///
    /// Any record that does not describe two complete, chained layers is
    /// rejected with [`NetworkError::MalformedState`].
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let record: NetworkRecord<T> = serde_json::from_reader(reader).map_err(|err| {
            if err.is_io() {
                NetworkError::Io(err.into())
            } else {
                NetworkError::MalformedState(err.to_string())
            }
        })?;

        let hidden = record.hidden.into_layer("hidden")?;
        let output = record.output.into_layer("output")?;
        let network = Network::from_layers(hidden, output)
            .map_err(|err| NetworkError::MalformedState(format!("layers do not chain: {err}")))?;

        debug!(inputs = network.inputs(), outputs = network.outputs(), "loaded network");
        Ok(network)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        self.save(BufWriter::new(file))
            .with_context(|| format!("failed to save network to {}", path.display()))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

        Self::load(BufReader::new(file))
            .with_context(|| format!("failed to load network from {}", path.display()))
    }
}
