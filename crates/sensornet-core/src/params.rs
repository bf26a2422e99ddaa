//! This module defines [`NetworkParams`], the configuration from which a sensor network is
//! generated or against which a persisted network is checked.

use crate::units::MicroJoules;

/// Network parameters.
#[derive(
    Debug,
    Clone,
    PartialEq,
    typed_builder::TypedBuilder,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct NetworkParams {
    /// Width of the field, in meters.
    pub width: f64,
    /// Length of the field, in meters.
    pub length: f64,
    /// Total number of sensor nodes.
    pub nr_nodes: usize,
    /// Transmission range of every node, in meters.
    pub transmission_range: f64,
    /// Number of data nodes.
    pub nr_data_nodes: usize,
    /// Overflow packets held by each data node.
    pub packets_per_node: u64,
    /// Packets each storage node can absorb.
    pub storage_capacity: u64,
    /// Battery capacity of each node.
    #[builder(setter(into))]
    pub battery_capacity: MicroJoules,
}

impl NetworkParams {
    /// Checks that the parameters describe a buildable network.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [("width", self.width), ("length", self.length)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParamsError::NonPositiveDimension { name, value });
            }
        }
        if !(self.transmission_range.is_finite() && self.transmission_range > 0.0) {
            return Err(ParamsError::NonPositiveRange(self.transmission_range));
        }
        if self.nr_nodes == 0 {
            return Err(ParamsError::NoNodes);
        }
        if self.nr_data_nodes > self.nr_nodes {
            return Err(ParamsError::QuotaExceedsNodes {
                quota: self.nr_data_nodes,
                nodes: self.nr_nodes,
            });
        }
        Ok(())
    }

    /// The number of storage nodes.
    pub fn nr_storage_nodes(&self) -> usize {
        self.nr_nodes.saturating_sub(self.nr_data_nodes)
    }

    /// The default bound on regeneration attempts.
    pub fn default_max_attempts(&self) -> usize {
        self.nr_nodes.saturating_mul(1000)
    }
}

/// Invalid network parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("{name} must be positive (got {value})")]
    NonPositiveDimension { name: &'static str, value: f64 },

    #[error("transmission range must be positive (got {0})")]
    NonPositiveRange(f64),

    #[error("a network needs at least one node")]
    NoNodes,

    #[error("cannot place {quota} data nodes among {nodes} nodes")]
    QuotaExceedsNodes { quota: usize, nodes: usize },

    #[error("expected {expected} node placements, got {got}")]
    PlacementCount { expected: usize, got: usize },

    #[error("expected {expected} data node placements, got {got}")]
    DataPlacementCount { expected: usize, got: usize },
}
