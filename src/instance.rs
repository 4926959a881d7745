//! TSPLIB `EUC_2D` instances.

use anyhow::{anyhow, bail, Context, Error};
use ndarray::Array2;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Node {
    fn distance_to(&self, other: &Node) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub nodes: Vec<Node>,
}

impl Instance {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("couldn't read instance {}", path.display()))?;

        Self::parse(&text).with_context(|| format!("invalid instance {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut name = None;
        let mut comment = None;
        let mut dimension = None;
        let mut in_coords = false;
        let mut nodes = Vec::new();

        for (no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "EOF" {
                break;
            }

            if in_coords {
                nodes.push(parse_node(line).with_context(|| format!("line {}", no + 1))?);
                continue;
            }

            if line == "NODE_COORD_SECTION" {
                in_coords = true;
                continue;
            }

            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| anyhow!("line {}: expected `KEY : VALUE`, got `{}`", no + 1, line))?;
            let value = value.trim();

            match key.trim() {
                "NAME" => name = Some(value.to_owned()),
                "COMMENT" => comment = Some(value.to_owned()),
                "TYPE" if value != "TSP" => bail!("unsupported problem type `{}`", value),
                "DIMENSION" => {
                    let n: usize = value
                        .parse()
                        .with_context(|| format!("line {}: bad dimension `{}`", no + 1, value))?;
                    dimension = Some(n);
                }
                "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                    bail!("unsupported edge weight type `{}`", value)
                }
                _ => {}
            }
        }

        if !in_coords {
            bail!("missing NODE_COORD_SECTION");
        }
        if let Some(n) = dimension {
            if n != nodes.len() {
                bail!("DIMENSION is {} but {} nodes were given", n, nodes.len());
            }
        }

        Ok(Self {
            name,
            comment,
            nodes,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Euclidean distances between every pair of nodes.
    ///
    /// Coincident nodes are rejected, the ant system can't weigh a zero edge.
    pub fn distance_matrix(&self) -> Result<Array2<f64>, Error> {
        let n = self.nodes.len();
        let mut distances = Array2::zeros((n, n));

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let d = a.distance_to(b);
                if d <= 0.0 {
                    bail!("nodes {} and {} share the same coordinates", a.id, b.id);
                }
                distances[[i, j]] = d;
                distances[[j, i]] = d;
            }
        }

        Ok(distances)
    }
}

fn parse_node(line: &str) -> Result<Node, Error> {
    let mut fields = line.split_whitespace();
    let mut next = |what: &str| {
        fields
            .next()
            .ok_or_else(|| anyhow!("missing {} in `{}`", what, line))
    };

    let id = next("id")?;
    let x = next("x")?;
    let y = next("y")?;

    Ok(Node {
        id: id.parse().with_context(|| format!("bad node id `{}`", id))?,
        x: x.parse().with_context(|| format!("bad x coordinate `{}`", x))?,
        y: y.parse().with_context(|| format!("bad y coordinate `{}`", y))?,
    })
}
