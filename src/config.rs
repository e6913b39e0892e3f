//! Training parameters shared by the synapses of a network.
//!
//! # Example
//!
//! ```
//! # use synapse::config::SynapseConfig;
//! let config = SynapseConfig::from_yaml_str(
//!     "learning_rate: 0.05\nsarprop:\n  cooling_rate: 0.02\n",
//! ).unwrap();
//! assert_eq!(config.learning_rate, 0.05);
//! assert_eq!(config.weight_bound, 150.0);
//! assert_eq!(config.sarprop.k1, 0.01);
//! ```

use crate::error::ConfigError;

/// Per-synapse training parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynapseConfig {
    /// Step size for both weight update rules.
    pub learning_rate: f64,
    /// SARProp clamps weights to `[-weight_bound, weight_bound]`.
    pub weight_bound: f64,
    /// Random initial weights are drawn from `[-init_range, init_range]`.
    pub init_range: f64,
    /// Weight decay schedule for SARProp.
    pub sarprop: SarpropConfig,
}

impl Default for SynapseConfig {
    fn default() -> Self {
        SynapseConfig {
            learning_rate: 0.02,
            weight_bound: 150.0,
            init_range: 2.0,
            sarprop: SarpropConfig::default(),
        }
    }
}

impl SynapseConfig {
    /// Parses a YAML document. Missing fields take their default values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: SynapseConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back into YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Sets the learning rate.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the SARProp saturation bound.
    pub fn weight_bound(mut self, bound: f64) -> Self {
        self.weight_bound = bound;
        self
    }

    /// Sets the half-width of the initial weight range.
    pub fn init_range(mut self, range: f64) -> Self {
        self.init_range = range;
        self
    }

    /// Sets the SARProp weight decay parameters.
    pub fn sarprop(mut self, sarprop: SarpropConfig) -> Self {
        self.sarprop = sarprop;
        self
    }

    /// Returns an error describing the first out-of-range parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(invalid("learning_rate", self.learning_rate));
        }
        check_weight_bound(self.weight_bound)?;
        if !self.init_range.is_finite() || self.init_range <= 0.0 {
            return Err(invalid("init_range", self.init_range));
        }
        self.sarprop.validate()
    }
}

/// Weight decay schedule for SARProp.
///
/// SARProp adds `0.5 * k1 * ln(w^2 + 1) * T` to the error function, with the
/// temperature `T = 2^(-cooling_rate * epoch)`. Its gradient with respect to
/// the weight is applied by `Synapse::sarprop_decay_weights`, which takes the
/// weight-independent part of it from `decay_factor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarpropConfig {
    /// Strength of the weight penalty.
    pub k1: f64,
    /// Cooling speed of the temperature.
    pub cooling_rate: f64,
}

impl Default for SarpropConfig {
    fn default() -> Self {
        SarpropConfig {
            k1: 0.01,
            cooling_rate: 0.01,
        }
    }
}

impl SarpropConfig {
    /// Returns `k1 * 2^(-cooling_rate * epoch)`.
    pub fn decay_factor(&self, epoch: usize) -> f64 {
        self.k1 * (-self.cooling_rate * epoch as f64).exp2()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(invalid("sarprop.k1", self.k1));
        }
        if !self.cooling_rate.is_finite() || self.cooling_rate < 0.0 {
            return Err(invalid("sarprop.cooling_rate", self.cooling_rate));
        }
        Ok(())
    }
}

/// Rejects a saturation bound that is not finite and positive.
pub(crate) fn check_weight_bound(bound: f64) -> Result<(), ConfigError> {
    if !bound.is_finite() || bound <= 0.0 {
        return Err(invalid("weight_bound", bound));
    }
    Ok(())
}

fn invalid(field: &str, value: f64) -> ConfigError {
    ConfigError::Invalid(format!("{} may not be {}", field, value))
}
