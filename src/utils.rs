use ndarray::Array2;
use std::fmt::Write;

pub trait ToDisplayPath {
    fn to_display_path(&self) -> String;
}

impl ToDisplayPath for [usize] {
    fn to_display_path(&self) -> String {
        self.iter()
            .map(|city| city.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Renders `matrix` with one row per line, every cell `precision` decimals.
pub fn pretty_matrix(matrix: &Array2<f64>, precision: usize) -> String {
    let cells: Vec<Vec<String>> = matrix
        .outer_iter()
        .map(|row| row.iter().map(|v| format!("{:.*}", precision, v)).collect())
        .collect();

    let width = cells
        .iter()
        .flatten()
        .map(|cell| cell.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in cells {
        out.push('[');
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing into a String never fails
            let _ = write!(out, "{:>width$}", cell, width = width);
        }
        out.push_str("]\n");
    }
    out
}
