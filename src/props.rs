//! Run parameters of the ant system.

use crate::error::AcoError;
use ndarray::Array2;
use std::fmt;
use std::str::FromStr;

/// How much pheromone an ant leaves on each edge of its tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositStrategy {
    /// `1 / tour_length` on every edge: shorter tours reinforce harder.
    GlobalQuality,
    /// `1 / edge_length`, independent of how good the whole tour was.
    EdgeQuality,
}

impl DepositStrategy {
    pub fn amount(self, from: usize, to: usize, length: f64, distances: &Array2<f64>) -> f64 {
        match self {
            DepositStrategy::GlobalQuality => 1.0 / length,
            DepositStrategy::EdgeQuality => 1.0 / distances[[from, to]],
        }
    }
}

impl Default for DepositStrategy {
    fn default() -> Self {
        DepositStrategy::GlobalQuality
    }
}

impl FromStr for DepositStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" | "global-quality" => Ok(DepositStrategy::GlobalQuality),
            "edge" | "edge-quality" => Ok(DepositStrategy::EdgeQuality),
            other => Err(format!("unknown deposit strategy `{}` (global, edge)", other)),
        }
    }
}

impl fmt::Display for DepositStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepositStrategy::GlobalQuality => write!(f, "1 / L (global)"),
            DepositStrategy::EdgeQuality => write!(f, "1 / d (edge)"),
        }
    }
}

/// How much the system writes into its trace sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    Off,
    /// Best tour of every iteration.
    Iterations,
    /// Plus every ant's tour and the pheromone matrix.
    Ants,
    /// Plus every probability and random draw.
    Steps,
}

impl Default for TraceLevel {
    fn default() -> Self {
        TraceLevel::Iterations
    }
}

impl FromStr for TraceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(TraceLevel::Off),
            "iterations" => Ok(TraceLevel::Iterations),
            "ants" => Ok(TraceLevel::Ants),
            "steps" => Ok(TraceLevel::Steps),
            other => Err(format!(
                "unknown trace level `{}` (off, iterations, ants, steps)",
                other
            )),
        }
    }
}

/// Parameters of one run.
///
/// ```ignore
/// let props = AntProps::default()
///     .with_alpha(1.0)
///     .with_beta(2.0)
///     .with_rho(0.5)
///     .with_iterations(50)
///     .with_ants(10);
/// ```
#[derive(Debug, Clone)]
pub struct AntProps {
    /// Pheromone exponent.
    pub alpha: f64,
    /// Visibility exponent.
    pub beta: f64,
    /// Evaporation rate in (0, 1].
    pub rho: f64,
    pub initial_pheromone: f64,
    pub iterations: usize,
    pub ants: usize,
    pub deposit: DepositStrategy,
    /// Lower bound applied after evaporation, 0 disables it.
    pub pheromone_floor: f64,
    pub trace: TraceLevel,
}

impl Default for AntProps {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
            initial_pheromone: 0.1,
            iterations: 100,
            ants: 50,
            deposit: DepositStrategy::default(),
            pheromone_floor: 0.0,
            trace: TraceLevel::default(),
        }
    }
}

impl AntProps {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_initial_pheromone(mut self, value: f64) -> Self {
        self.initial_pheromone = value;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    pub fn with_deposit(mut self, deposit: DepositStrategy) -> Self {
        self.deposit = deposit;
        self
    }

    pub fn with_pheromone_floor(mut self, floor: f64) -> Self {
        self.pheromone_floor = floor;
        self
    }

    pub fn with_trace(mut self, trace: TraceLevel) -> Self {
        self.trace = trace;
        self
    }

    /// Checks every parameter before any search work is done.
    pub fn validate(&self) -> Result<(), AcoError> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(AcoError::parameter(
                "alpha",
                format!("must be finite and >= 0, got {}", self.alpha),
            ));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(AcoError::parameter(
                "beta",
                format!("must be finite and >= 0, got {}", self.beta),
            ));
        }
        if !(self.rho > 0.0 && self.rho <= 1.0) {
            return Err(AcoError::parameter(
                "rho",
                format!("must be in (0, 1], got {}", self.rho),
            ));
        }
        if !self.initial_pheromone.is_finite() || self.initial_pheromone <= 0.0 {
            return Err(AcoError::parameter(
                "initial_pheromone",
                format!("must be finite and > 0, got {}", self.initial_pheromone),
            ));
        }
        if self.iterations == 0 {
            return Err(AcoError::parameter("iterations", "must be > 0"));
        }
        if self.ants == 0 {
            return Err(AcoError::parameter("ants", "must be > 0"));
        }
        if !self.pheromone_floor.is_finite() || self.pheromone_floor < 0.0 {
            return Err(AcoError::parameter(
                "pheromone_floor",
                format!("must be finite and >= 0, got {}", self.pheromone_floor),
            ));
        }
        // A full evaporation with no floor leaves every weight at zero for the next iteration
        let wipes_trails = self.rho == 1.0 && self.pheromone_floor == 0.0;
        if wipes_trails && self.alpha > 0.0 && self.iterations > 1 {
            return Err(AcoError::parameter(
                "rho",
                "1 wipes every trail, set a pheromone_floor > 0 or alpha = 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(props: AntProps) -> &'static str {
        match props.validate() {
            Err(AcoError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn defaults_match_reference_run() {
        let props = AntProps::default();
        assert!(props.validate().is_ok());
        assert_eq!(props.iterations, 100);
        assert_eq!(props.ants, 50);
        assert_eq!(props.deposit, DepositStrategy::GlobalQuality);
        assert!((props.beta - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rho_bounds() {
        assert_eq!(rejected(AntProps::default().with_rho(0.0)), "rho");
        assert_eq!(rejected(AntProps::default().with_rho(1.5)), "rho");
        assert_eq!(rejected(AntProps::default().with_rho(f64::NAN)), "rho");
        assert!(AntProps::default()
            .with_rho(1.0)
            .with_pheromone_floor(1e-6)
            .validate()
            .is_ok());
    }

    #[test]
    fn full_evaporation_needs_a_floor() {
        let wiped = AntProps::default().with_rho(1.0).with_iterations(5).with_ants(3);
        assert_eq!(rejected(wiped.clone()), "rho");

        assert!(wiped.clone().with_pheromone_floor(1e-9).validate().is_ok());
        assert!(wiped.clone().with_alpha(0.0).validate().is_ok());
        assert!(wiped.with_iterations(1).validate().is_ok());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(rejected(AntProps::default().with_alpha(-1.0)), "alpha");
        assert_eq!(rejected(AntProps::default().with_beta(f64::INFINITY)), "beta");
        assert_eq!(
            rejected(AntProps::default().with_initial_pheromone(0.0)),
            "initial_pheromone"
        );
        assert_eq!(rejected(AntProps::default().with_iterations(0)), "iterations");
        assert_eq!(rejected(AntProps::default().with_ants(0)), "ants");
        assert_eq!(
            rejected(AntProps::default().with_pheromone_floor(-0.1)),
            "pheromone_floor"
        );
    }

    #[test]
    fn zero_exponents_are_valid() {
        let props = AntProps::default().with_alpha(0.0).with_beta(0.0);
        assert!(props.validate().is_ok());
    }

    #[test]
    fn deposit_amounts() {
        let distances = Array2::from_shape_vec((2, 2), vec![0.0, 4.0, 4.0, 0.0]).unwrap();
        let global = DepositStrategy::GlobalQuality.amount(0, 1, 8.0, &distances);
        let edge = DepositStrategy::EdgeQuality.amount(0, 1, 8.0, &distances);
        assert!((global - 0.125).abs() < 1e-12);
        assert!((edge - 0.25).abs() < 1e-12);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("edge".parse::<DepositStrategy>(), Ok(DepositStrategy::EdgeQuality));
        assert_eq!("Global".parse::<DepositStrategy>(), Ok(DepositStrategy::GlobalQuality));
        assert!("local".parse::<DepositStrategy>().is_err());
        assert_eq!("steps".parse::<TraceLevel>(), Ok(TraceLevel::Steps));
        assert!(TraceLevel::Ants > TraceLevel::Iterations);
    }
}
