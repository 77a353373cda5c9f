use std::collections::BTreeSet;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::presentation::step::AssetLayer;

/// A resource that probed present but could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadFailure {
    #[error("{layer:?} layer failed to load from {path}: {reason}")]
    Layer {
        layer: AssetLayer,
        path: String,
        reason: String,
    },
    #[error("drillhole records failed to load: {reason}")]
    Drillholes { reason: String },
}

/// Collapsed asset-server state for one handle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    pub fn from_state(state: Option<LoadState>) -> Self {
        match state {
            Some(LoadState::Loaded) => Self::Loaded,
            Some(LoadState::Failed(error)) => Self::Failed(error.to_string()),
            Some(LoadState::NotLoaded) | Some(LoadState::Loading) | None => Self::Loading,
        }
    }

    /// Both must load; either failing fails the pair.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Failed(a), Self::Failed(b)) => Self::Failed(format!("{a}; {b}")),
            (Self::Failed(reason), _) | (_, Self::Failed(reason)) => Self::Failed(reason),
            (Self::Loaded, Self::Loaded) => Self::Loaded,
            _ => Self::Loading,
        }
    }
}

/// Load bookkeeping reported to the frontend.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub catalog_complete: bool,
    pub layers_ready: BTreeSet<AssetLayer>,
    pub drillholes_ready: bool,
    pub failures: Vec<LoadFailure>,
}

impl LoadingProgress {
    pub fn record_failure(&mut self, failure: LoadFailure) {
        error!("✗ {}", failure);
        self.failures.push(failure);
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "catalogComplete": self.catalog_complete,
            "layersReady": self.layers_ready.iter().map(|l| l.step().tag()).collect::<Vec<_>>(),
            "drillholesReady": self.drillholes_ready,
            "failures": self.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_waits_for_both() {
        assert_eq!(LoadStatus::Loaded.combine(LoadStatus::Loading), LoadStatus::Loading);
        assert_eq!(LoadStatus::Loaded.combine(LoadStatus::Loaded), LoadStatus::Loaded);
    }

    #[test]
    fn test_pair_fails_if_either_fails() {
        let failed = LoadStatus::Failed("404".to_string());
        assert_eq!(LoadStatus::Loaded.combine(failed.clone()), failed);
        assert_eq!(failed.clone().combine(LoadStatus::Loading), failed);
    }

    #[test]
    fn test_unknown_handle_counts_as_loading() {
        assert_eq!(LoadStatus::from_state(None), LoadStatus::Loading);
        assert_eq!(LoadStatus::from_state(Some(LoadState::Loaded)), LoadStatus::Loaded);
    }
}
