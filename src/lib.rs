//! Trainable synapses for feed-forward neural networks.
//!
//! A [`Synapse`](synapse/struct.Synapse.html) is one weighted edge of a
//! network. It borrows its two neurons from an arena the network owns and
//! supports two training rules: gradient descent on the batch-averaged delta,
//! and SARProp's sign-only step with weight decay.
//!
//! # Example
//!
//! ```
//! # use synapse::{NeuronId, NeuronState, Synapse, SynapseConfig};
//! let config = SynapseConfig::default().learning_rate(0.5);
//! let mut neurons = vec![NeuronState::new(1.0, 0.0), NeuronState::new(0.0, 0.0)];
//!
//! let mut synapse = Synapse::with_config(&config).unwrap();
//! synapse.connect(NeuronId(0), NeuronId(1));
//! synapse.set_weight(0.25);
//! assert_eq!(synapse.weighted_value(&neurons).unwrap(), 0.25);
//!
//! // Two samples whose post-neuron errors average to 0.5.
//! for &delta in &[0.25, 0.75] {
//!     neurons[1].delta = delta;
//!     synapse.calculate_delta(&neurons).unwrap();
//! }
//! synapse.adjust_weight().unwrap();
//! assert_eq!(synapse.weight(), 0.0);
//! assert_eq!(synapse.sample_count(), 0);
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod error;
pub mod neuron;
pub mod synapse;

pub use crate::config::{SarpropConfig, SynapseConfig};
pub use crate::error::{ConfigError, Endpoint, SynapseError};
pub use crate::neuron::{Neuron, NeuronId, NeuronState, Neurons};
pub use crate::synapse::{Accumulation, Synapse, UNINITIALIZED_WEIGHT};
