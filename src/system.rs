use crate::error::AcoError;
use crate::pheromone::PheromoneMatrix;
use crate::props::{AntProps, TraceLevel};
use crate::selection::{roulette, transition_probabilities};
use crate::utils::{pretty_matrix, ToDisplayPath};
use ndarray::Array2;
use rand::Rng;
use std::io::Write;

fn compute_visiblity_matrix(distances: &Array2<f64>) -> Array2<f64> {
    Array2::from_shape_fn(distances.raw_dim(), |(i, j)| {
        if i == j {
            0.0
        } else {
            1.0 / distances[[i, j]]
        }
    })
}

fn compute_cost(solution: &[usize], distances: &Array2<f64>) -> f64 {
    solution
        .windows(2)
        .fold(0.0, |acc, edge| acc + distances[[edge[0], edge[1]]])
}

fn check_distances(distances: &Array2<f64>) -> Result<(), AcoError> {
    let (rows, cols) = distances.dim();
    if rows != cols {
        return Err(AcoError::NotSquare { rows, cols });
    }
    if rows < 2 {
        return Err(AcoError::TooFewCities(rows));
    }

    for ((from, to), &value) in distances.indexed_iter() {
        if from != to && !(value.is_finite() && value > 0.0) {
            return Err(AcoError::InvalidDistance { from, to, value });
        }
    }

    Ok(())
}

/// A closed tour starting and ending at city 0, with its total length.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub tour: Vec<usize>,
    pub length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    /// `iteration` iterations have completed so far.
    Running { iteration: usize },
    Done,
}

/// Outcome of a single iteration.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// 1-based.
    pub iteration: usize,
    pub best: Solution,
    /// Whether this iteration replaced the global best.
    pub improved: bool,
}

#[derive(Debug, Clone)]
pub struct AntSystem {
    props: AntProps,

    distances: Array2<f64>,
    visibility: Array2<f64>,
    pheromones: PheromoneMatrix,

    phase: Phase,
    best: Option<Solution>,
    history: Vec<f64>,
}

impl AntSystem {
    /// Validates `distances` and `props` and prepares a fresh run.
    pub fn new(distances: Array2<f64>, props: AntProps) -> Result<Self, AcoError> {
        props.validate()?;
        check_distances(&distances)?;

        let pheromones = PheromoneMatrix::new(
            distances.raw_dim(),
            props.initial_pheromone,
            props.pheromone_floor,
        );
        let visibility = compute_visiblity_matrix(&distances);

        Ok(Self {
            history: Vec::with_capacity(props.iterations),
            props,
            distances,
            visibility,
            pheromones,
            phase: Phase::Initialized,
            best: None,
        })
    }

    /// Runs every remaining iteration and returns the best tour found.
    pub fn fit<R, W>(&mut self, rng: &mut R, out: &mut W) -> Result<&Solution, AcoError>
    where
        R: Rng + ?Sized,
        W: Write,
    {
        while self.phase != Phase::Done {
            self.iterate(rng, out)?;
        }

        self.best.as_ref().ok_or(AcoError::Finished)
    }

    /// Sends every ant once, depositing right after each tour, then evaporates.
    pub fn iterate<R, W>(&mut self, rng: &mut R, out: &mut W) -> Result<IterationReport, AcoError>
    where
        R: Rng + ?Sized,
        W: Write,
    {
        let iteration = match self.phase {
            Phase::Initialized => 1,
            Phase::Running { iteration } => iteration + 1,
            Phase::Done => return Err(AcoError::Finished),
        };

        let trace = self.props.trace;
        if trace >= TraceLevel::Ants {
            writeln!(out, "------------------------------------")?;
            writeln!(out, "Iteration {}\n", iteration)?;
            writeln!(
                out,
                "Pheromone matrix:\n{}",
                pretty_matrix(self.pheromones.values(), 6)
            )?;
        }

        let mut iteration_best: Option<Solution> = None;
        let mut improved = false;

        for ant in 0..self.props.ants {
            let solution = self.build_solution(ant, rng, out)?;
            self.deposit(&solution);

            if trace >= TraceLevel::Ants {
                writeln!(
                    out,
                    "Ant {}: {} (cost: {})",
                    ant + 1,
                    solution.tour.to_display_path(),
                    solution.length
                )?;
            }

            if solution.length < self.best_length() {
                self.best = Some(solution.clone());
                improved = true;
            }

            let better = iteration_best
                .as_ref()
                .map_or(true, |best| solution.length < best.length);
            if better {
                iteration_best = Some(solution);
            }
        }

        self.pheromones.evaporate(self.props.rho);
        self.history.push(self.best_length());

        self.phase = if iteration == self.props.iterations {
            Phase::Done
        } else {
            Phase::Running { iteration }
        };

        let best = iteration_best.expect("No ants in this iteration?");

        if trace >= TraceLevel::Iterations {
            writeln!(
                out,
                "Iteration {}: best path {} with cost {}{}",
                iteration,
                best.tour.to_display_path(),
                best.length,
                if improved { " (new global best)" } else { "" }
            )?;
        }

        Ok(IterationReport {
            iteration,
            best,
            improved,
        })
    }

    pub fn props(&self) -> &AntProps {
        &self.props
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    pub fn visibility(&self) -> &Array2<f64> {
        &self.visibility
    }

    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    pub fn best_tour(&self) -> Option<&[usize]> {
        self.best.as_ref().map(|best| best.tour.as_slice())
    }

    /// Length of the best tour so far, infinite before the first ant.
    pub fn best_length(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |best| best.length)
    }

    /// Best length after each completed iteration.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl AntSystem {
    fn build_solution<R, W>(&self, ant: usize, rng: &mut R, out: &mut W) -> Result<Solution, AcoError>
    where
        R: Rng + ?Sized,
        W: Write,
    {
        let no_cities = self.distances.nrows();
        let steps = self.props.trace >= TraceLevel::Steps;

        let mut unvisited: Vec<usize> = (1..no_cities).collect();
        let mut tour = Vec::with_capacity(no_cities + 1);
        tour.push(0);

        if steps {
            writeln!(out, "Ant {}", ant + 1)?;
        }

        while unvisited.len() > 1 {
            let curr = tour[tour.len() - 1];
            let probs = transition_probabilities(
                curr,
                &unvisited,
                &self.pheromones,
                &self.visibility,
                self.props.alpha,
                self.props.beta,
            )?;

            let draw: f64 = rng.gen();
            let choosen = roulette(&probs, draw).ok_or(AcoError::NoCandidates { city: curr })?;

            if steps {
                for (city, prob) in unvisited.iter().zip(&probs) {
                    writeln!(out, "{} -> {}: prob = {}", curr, city, prob)?;
                }
                writeln!(out, "Random draw: {}", draw)?;
                writeln!(out, "Next city: {}", unvisited[choosen])?;
            }

            tour.push(unvisited.remove(choosen));
        }

        // The last city needs no draw
        tour.extend(unvisited.drain(..));
        tour.push(0);

        let length = compute_cost(&tour, &self.distances);
        Ok(Solution { tour, length })
    }

    fn deposit(&mut self, solution: &Solution) {
        let strategy = self.props.deposit;
        let distances = &self.distances;
        let length = solution.length;

        self.pheromones.deposit(&solution.tour, |a, b| {
            strategy.amount(a, b, length, distances)
        });
    }
}
