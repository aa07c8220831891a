use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::PAIR_KEY_SEPARATOR;
use crate::error::{GateError, Result};
use crate::geom::Point;

/// Ordered pair of channels plotted against each other (x first).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelPair {
    pub x: String,
    pub y: String,
}

impl ChannelPair {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Canonical filter key, `"{x}|{y}"`. Swapping the axes gives a different key.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.x, PAIR_KEY_SEPARATOR, self.y)
    }
}

impl fmt::Display for ChannelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.x, self.y)
    }
}

/// Keywords carried over from the source file, kept for export.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Summary fields derived from the file header (format version, counts).
    pub header: BTreeMap<String, String>,
    /// Raw TEXT segment keywords.
    pub text: BTreeMap<String, String>,
}

/// Column-oriented event table. Row `i` of every channel is the same event.
#[derive(Clone, Debug)]
pub struct Dataset {
    path: PathBuf,
    channels: Vec<String>,
    columns: Vec<Vec<f64>>,
    metadata: DatasetMetadata,
}

impl Dataset {
    /// Build a dataset, rejecting columns of unequal length so that event
    /// indices mean the same event under every channel pair.
    pub fn new(
        path: impl Into<PathBuf>,
        channels: Vec<String>,
        columns: Vec<Vec<f64>>,
        metadata: DatasetMetadata,
    ) -> Result<Self> {
        if channels.len() != columns.len() {
            return Err(GateError::InvalidFcs(format!(
                "{} channel names for {} columns",
                channels.len(),
                columns.len()
            )));
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for (name, column) in channels.iter().zip(&columns) {
                if column.len() != expected {
                    return Err(GateError::ChannelLengthMismatch {
                        channel: name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }

        Ok(Self {
            path: path.into(),
            channels,
            columns,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn event_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c == name)
    }

    pub fn channel(&self, name: &str) -> Result<&[f64]> {
        self.channel_index(name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| GateError::ChannelNotFound(name.to_string()))
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// The first two channels, the pair a freshly loaded file opens on.
    pub fn default_pair(&self) -> Option<ChannelPair> {
        match self.channels.as_slice() {
            [x, y, ..] => Some(ChannelPair::new(x.clone(), y.clone())),
            _ => None,
        }
    }

    /// Project every event onto `pair`. The result is indexed by event.
    pub fn points(&self, pair: &ChannelPair) -> Result<Vec<Point>> {
        let xs = self.channel(&pair.x)?;
        let ys = self.channel(&pair.y)?;
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| Point::new(x, y))
            .collect())
    }

    /// Single event as a row, in channel order.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.event_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index]).collect())
    }
}
