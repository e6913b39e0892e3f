//! Error types.

use crate::neuron::NeuronId;
use std::fmt;
use thiserror::Error;

/// Which end of a synapse an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The source neuron, read for its activation value.
    Pre,
    /// The destination neuron, read for its delta.
    Post,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Endpoint::Pre => f.write_str("pre"),
            Endpoint::Post => f.write_str("post"),
        }
    }
}

/// Failures of a synapse operation.
///
/// None of these are meant to be retried: the operation that produced them
/// must be abandoned by the caller.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum SynapseError {
    /// The endpoint has no neuron assigned.
    #[error("<{operation}> synapse not connected to {endpoint} neuron")]
    Disconnected {
        operation: &'static str,
        endpoint: Endpoint,
    },
    /// The endpoint's handle does not resolve in the supplied neurons.
    #[error("<{operation}> {endpoint} neuron {id} does not exist")]
    UnknownNeuron {
        operation: &'static str,
        endpoint: Endpoint,
        id: NeuronId,
    },
    /// A gradient step was requested with nothing accumulated.
    #[error("<AdjustWeight> no samples accumulated since the last update")]
    NoSamples,
}

/// Failures while loading a `SynapseConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document could not be read into a configuration.
    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// A parameter is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
