use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::opts::AnimationOpts;
use crate::data::dataset::ChartDataset;
use crate::data::ledger::{AggregationSource, InMemoryLedger, LedgerPartition};
use crate::data::record::AggregateRecord;
use crate::foundation::error::{ChartError, ChartResult};
use crate::render::style::ChartStyle;

/// Style and pacing loaded together from one JSON document.
///
/// Every field is optional; missing ones keep their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub style: ChartStyle,
    pub animation: AnimationOpts,
}

impl ChartConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> ChartResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ChartError::validation(format!("parse chart config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ChartError::validation(format!("open chart config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.style.validate()?;
        self.animation.validate()
    }
}

/// Chart input document: either pre-aggregated records or a whole ledger.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ChartInput {
    Records(Vec<AggregateRecord>),
    Ledger(InMemoryLedger),
}

impl ChartInput {
    pub fn from_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ChartError::validation(format!("open chart input '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            ChartError::serde(format!("parse chart input '{}': {e}", path.display()))
        })
    }

    /// Normalized dataset. `partition` only applies to ledger documents.
    pub fn dataset(&self, partition: LedgerPartition) -> ChartResult<ChartDataset> {
        match self {
            Self::Records(records) => Ok(ChartDataset::from_records(records.iter().cloned())),
            Self::Ledger(ledger) => ledger.dataset(partition),
        }
    }
}
