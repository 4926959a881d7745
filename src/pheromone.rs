use ndarray::{Array2, Ix2, ShapeBuilder};

/// Pheromone trail of every edge.
///
/// Only [`deposit`](Self::deposit) and [`evaporate`](Self::evaporate) mutate
/// it, and both keep the matrix symmetric and non-negative.
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    values: Array2<f64>,
    floor: f64,
}

impl PheromoneMatrix {
    pub fn new<S>(shape: S, initial: f64, floor: f64) -> Self
    where
        S: ShapeBuilder<Dim = Ix2>,
    {
        Self {
            values: Array2::from_elem(shape, initial),
            floor,
        }
    }

    /// Adds `amount(a, b)` to both directions of every edge `a -> b` of `tour`.
    pub fn deposit<F>(&mut self, tour: &[usize], amount: F)
    where
        F: Fn(usize, usize) -> f64,
    {
        for edge in tour.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            let w = amount(a, b);
            self.values[[a, b]] += w;
            self.values[[b, a]] += w;
        }
    }

    pub fn evaporate(&mut self, rho: f64) {
        let floor = self.floor;
        self.values.mapv_inplace(|v| ((1.0 - rho) * v).max(floor));
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.values[[from, to]]
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
