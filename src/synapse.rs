//! A weighted, trainable connection between two neurons.
//!
//! A `Synapse` cycles between two phases: it accumulates error gradients over
//! a batch (`calculate_delta`, and for SARProp `sarprop_decay_weights`), then
//! applies exactly one weight update (`adjust_weight` or
//! `sarprop_adjust_weight`), which clears the accumulation again. The two
//! update rules are alternatives; a network trains with one or the other.

use crate::config::{self, SynapseConfig};
use crate::error::{ConfigError, Endpoint, SynapseError};
use crate::neuron::{Neuron, NeuronId, Neurons};

use rand::Rng;

/// The weight of a synapse that has not been assigned one yet.
pub const UNINITIALIZED_WEIGHT: f64 = -1.0;

/// Error gradient summed over the samples of a batch.
///
/// A synapse keeps one of these internally. Hosts that spread a batch over
/// several threads give each thread its own, filled through
/// `Synapse::accumulate_into`, and fold them back with
/// `Synapse::merge_accumulation` before adjusting the weight.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Accumulation {
    delta: f64,
    count: usize,
}

impl Accumulation {
    /// Returns an empty accumulation.
    pub fn new() -> Self {
        Accumulation::default()
    }

    /// The summed gradient.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// The number of samples summed into `delta`.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Adds the gradient contribution of one sample.
    pub fn record(&mut self, post_delta: f64, pre_activation: f64) {
        self.delta += post_delta * pre_activation;
        self.count += 1;
    }

    /// Adds the samples of `other` to this accumulation.
    pub fn merge(&mut self, other: Accumulation) {
        self.delta += other.delta;
        self.count += other.count;
    }

    /// Empties the accumulation.
    pub fn reset(&mut self) {
        *self = Accumulation::default();
    }
}

/// A directed, weighted edge from a pre-neuron to a post-neuron.
#[derive(Clone, Debug, PartialEq)]
pub struct Synapse {
    weight: f64,
    learning_rate: f64,
    accumulation: Accumulation,
    /// Delta seen by the most recent SARProp update.
    prev_delta: f64,
    /// dE/dw, stored on behalf of the training algorithm.
    de_dw: f64,
    weight_bound: f64,
    pre: Option<NeuronId>,
    post: Option<NeuronId>,
}

impl Default for Synapse {
    fn default() -> Self {
        Synapse::new()
    }
}

impl Synapse {
    /// Creates an unconnected synapse with an uninitialized weight and a zero
    /// learning rate.
    pub fn new() -> Self {
        Synapse {
            weight: UNINITIALIZED_WEIGHT,
            learning_rate: 0.0,
            accumulation: Accumulation::new(),
            prev_delta: 0.0,
            de_dw: 0.0,
            weight_bound: SynapseConfig::default().weight_bound,
            pre: None,
            post: None,
        }
    }

    /// Creates an unconnected synapse taking its learning rate and weight
    /// bound from `config`, or an error if `config` is invalid.
    pub fn with_config(config: &SynapseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Synapse {
            learning_rate: config.learning_rate,
            weight_bound: config.weight_bound,
            ..Synapse::new()
        })
    }

    /// The current weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Overwrites the weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Draws a weight uniformly from `[-init_range, init_range]`.
    ///
    /// Fails without touching the weight if `config` is invalid.
    pub fn randomize_weight<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &SynapseConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        let range = config.init_range;
        self.weight = rng.gen_range(-range..=range);
        Ok(())
    }

    /// The step size of both update rules.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Sets the step size of both update rules.
    pub fn set_learning_rate(&mut self, rate: f64) {
        self.learning_rate = rate;
    }

    /// Shrinks the learning rate by the fraction `rate`.
    pub fn decay_learning_rate(&mut self, rate: f64) {
        self.learning_rate *= 1.0 - rate;
    }

    /// SARProp keeps the weight within `[-weight_bound, weight_bound]`.
    pub fn weight_bound(&self) -> f64 {
        self.weight_bound
    }

    /// Sets the SARProp saturation bound. The bound must be finite and
    /// positive; otherwise the current bound is kept.
    pub fn set_weight_bound(&mut self, bound: f64) -> Result<(), ConfigError> {
        config::check_weight_bound(bound)?;
        self.weight_bound = bound;
        Ok(())
    }

    /// The gradient accumulated since the last weight update.
    pub fn delta(&self) -> f64 {
        self.accumulation.delta
    }

    /// The number of samples accumulated since the last weight update.
    pub fn sample_count(&self) -> usize {
        self.accumulation.count
    }

    /// A copy of the accumulated delta and sample count.
    pub fn accumulation(&self) -> Accumulation {
        self.accumulation
    }

    /// The delta seen by the most recent SARProp update.
    pub fn prev_delta(&self) -> f64 {
        self.prev_delta
    }

    /// The stored dE/dw value.
    pub fn de_dw(&self) -> f64 {
        self.de_dw
    }

    /// Stores a dE/dw value.
    pub fn set_de_dw(&mut self, de_dw: f64) {
        self.de_dw = de_dw;
    }

    /// The source neuron, if connected.
    pub fn pre_neuron(&self) -> Option<NeuronId> {
        self.pre
    }

    /// The destination neuron, if connected.
    pub fn post_neuron(&self) -> Option<NeuronId> {
        self.post
    }

    /// Sets the source neuron.
    pub fn set_pre_neuron(&mut self, id: NeuronId) {
        self.pre = Some(id);
    }

    /// Sets the destination neuron.
    pub fn set_post_neuron(&mut self, id: NeuronId) {
        self.post = Some(id);
    }

    /// Connects the synapse from `pre` to `post`.
    pub fn connect(&mut self, pre: NeuronId, post: NeuronId) {
        self.pre = Some(pre);
        self.post = Some(post);
    }

    /// Returns the pre-neuron's activation scaled by the weight.
    pub fn weighted_value<S>(&self, neurons: &S) -> Result<f64, SynapseError>
    where
        S: Neurons + ?Sized,
    {
        let pre = self.resolve(neurons, Endpoint::Pre, "GetWeightedValue")?;
        Ok(self.weight * pre.activation_value())
    }

    /// Returns the post-neuron's delta scaled by the weight.
    pub fn weighted_delta<S>(&self, neurons: &S) -> Result<f64, SynapseError>
    where
        S: Neurons + ?Sized,
    {
        let post = self.resolve(neurons, Endpoint::Post, "GetWeightedDelta")?;
        Ok(self.weight * post.delta())
    }

    /// Accumulates the error gradient of the current sample.
    pub fn calculate_delta<S>(&mut self, neurons: &S) -> Result<(), SynapseError>
    where
        S: Neurons + ?Sized,
    {
        let (post_delta, activation) = self.sample(neurons)?;
        self.accumulation.record(post_delta, activation);
        Ok(())
    }

    /// Like `calculate_delta`, but accumulates into `accumulation` and leaves
    /// the synapse untouched.
    pub fn accumulate_into<S>(
        &self,
        neurons: &S,
        accumulation: &mut Accumulation,
    ) -> Result<(), SynapseError>
    where
        S: Neurons + ?Sized,
    {
        let (post_delta, activation) = self.sample(neurons)?;
        accumulation.record(post_delta, activation);
        Ok(())
    }

    /// Folds an externally filled accumulation into this synapse.
    pub fn merge_accumulation(&mut self, accumulation: Accumulation) {
        self.accumulation.merge(accumulation);
    }

    /// Takes a gradient descent step along the mean accumulated delta and
    /// starts a new batch.
    ///
    /// Fails with `NoSamples`, leaving the synapse unchanged, if nothing has
    /// been accumulated since the last update.
    pub fn adjust_weight(&mut self) -> Result<(), SynapseError> {
        if self.accumulation.count == 0 {
            warn!("weight adjustment requested with no accumulated samples");
            return Err(SynapseError::NoSamples);
        }
        let w_delta = self.accumulation.delta / self.accumulation.count as f64;
        self.weight += -self.learning_rate * w_delta;
        trace!(
            "gradient step of {} over {} samples, weight now {}",
            w_delta,
            self.accumulation.count,
            self.weight
        );
        self.init_delta();
        Ok(())
    }

    /// Clears the accumulated delta and sample count.
    pub fn init_delta(&mut self) {
        self.accumulation.reset();
    }

    /// Adds the gradient of the SARProp weight penalty to the accumulated
    /// delta.
    ///
    /// `decay_factor` is `k1 * 2^(-cooling_rate * epoch)` (see
    /// `SarpropConfig::decay_factor`). The penalty gradient is scaled by the
    /// sample count so it is comparable to the summed data gradient.
    pub fn sarprop_decay_weights(&mut self, decay_factor: f64) {
        let w = self.weight;
        self.accumulation.delta +=
            self.accumulation.count as f64 * decay_factor * w / (1.0 + w * w);
    }

    /// Moves the weight one learning rate step against the sign of the
    /// accumulated delta, saturating at the weight bound, and starts a new
    /// batch.
    pub fn sarprop_adjust_weight(&mut self) {
        let delta = self.accumulation.delta;
        if delta > 0.0 {
            self.weight -= self.learning_rate;
        } else if delta < 0.0 {
            self.weight += self.learning_rate;
        }

        let bound = self.weight_bound;
        if self.weight > bound {
            debug!("weight {} saturated at {}", self.weight, bound);
            self.weight = bound;
        } else if self.weight < -bound {
            debug!("weight {} saturated at {}", self.weight, -bound);
            self.weight = -bound;
        }
        trace!("sign step for delta {}, weight now {}", delta, self.weight);

        self.prev_delta = delta;
        self.init_delta();
    }

    /// Reads `(post delta, pre activation)` for the current sample.
    fn sample<S>(&self, neurons: &S) -> Result<(f64, f64), SynapseError>
    where
        S: Neurons + ?Sized,
    {
        let pre = self.resolve(neurons, Endpoint::Pre, "CalculateDelta")?;
        let post = self.resolve(neurons, Endpoint::Post, "CalculateDelta")?;
        Ok((post.delta(), pre.activation_value()))
    }

    fn resolve<'a, S>(
        &self,
        neurons: &'a S,
        endpoint: Endpoint,
        operation: &'static str,
    ) -> Result<&'a S::Neuron, SynapseError>
    where
        S: Neurons + ?Sized,
    {
        let handle = match endpoint {
            Endpoint::Pre => self.pre,
            Endpoint::Post => self.post,
        };
        let found = match handle {
            None => Err(SynapseError::Disconnected {
                operation,
                endpoint,
            }),
            Some(id) => neurons.neuron(id).ok_or(SynapseError::UnknownNeuron {
                operation,
                endpoint,
                id,
            }),
        };
        found.map_err(|err| {
            error!("{}", err);
            err
        })
    }
}
