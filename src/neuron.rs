//! Neurons as seen from a synapse.
//!
//! A synapse never owns the neurons it connects. It stores a `NeuronId` for
//! each endpoint and resolves it against whatever arena the network keeps
//! its neurons in.

use std::fmt;

/// Read access to the two outputs a synapse needs from a neuron.
#[cfg_attr(test, mockall::automock)]
pub trait Neuron {
    /// The neuron's output after activation.
    fn activation_value(&self) -> f64;

    /// The error signal propagated back to this neuron.
    fn delta(&self) -> f64;
}

/// A handle to a neuron owned by the surrounding network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronId(pub usize);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NeuronId {
    fn from(index: usize) -> NeuronId {
        NeuronId(index)
    }
}

/// An arena that resolves `NeuronId`s.
pub trait Neurons {
    /// The neuron type stored in the arena.
    type Neuron: Neuron;

    /// Returns the neuron for `id`, or `None` if no such neuron exists.
    fn neuron(&self, id: NeuronId) -> Option<&Self::Neuron>;
}

impl<N: Neuron> Neurons for [N] {
    type Neuron = N;

    fn neuron(&self, id: NeuronId) -> Option<&N> {
        self.get(id.0)
    }
}

impl<N: Neuron> Neurons for Vec<N> {
    type Neuron = N;

    fn neuron(&self, id: NeuronId) -> Option<&N> {
        self.get(id.0)
    }
}

/// A neuron reduced to its two outputs.
///
/// Useful when a network keeps its layer activations and errors in flat
/// storage and only needs to hand synapses a view of them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NeuronState {
    /// Output after activation.
    pub activation: f64,
    /// Back-propagated error.
    pub delta: f64,
}

impl NeuronState {
    /// Creates a neuron with the given outputs.
    pub fn new(activation: f64, delta: f64) -> Self {
        NeuronState { activation, delta }
    }
}

impl Neuron for NeuronState {
    fn activation_value(&self) -> f64 {
        self.activation
    }

    fn delta(&self) -> f64 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_lookup() {
        let neurons = [NeuronState::new(0.5, 0.1), NeuronState::new(0.7, -0.2)];
        let found = neurons[..].neuron(NeuronId(1)).unwrap();
        assert_eq!(found.activation_value(), 0.7);
        assert_eq!(found.delta(), -0.2);
    }

    #[test]
    fn vec_lookup_out_of_range() {
        let neurons = vec![NeuronState::default()];
        assert!(neurons.neuron(NeuronId(1)).is_none());
    }

    #[test]
    fn id_display() {
        assert_eq!(NeuronId::from(3).to_string(), "#3");
    }
}
