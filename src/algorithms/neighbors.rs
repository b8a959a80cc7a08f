use crate::boid::Boid;
use std::fmt;

/// Candidate lookup for the perception test.
///
/// An implementation only chooses which indices are worth testing; the boid
/// still applies the exact distance and field-of-view check, so swapping the
/// search never changes the steering rules.
pub trait NeighborSearch: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Write candidate indices for `population[index]` into `out`, in
    /// population order. `out` is cleared first.
    fn candidates(&self, population: &[Boid], index: usize, out: &mut Vec<usize>);
}

/// Every other boid is a candidate: the O(n²) scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl NeighborSearch for BruteForce {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    fn candidates(&self, population: &[Boid], index: usize, out: &mut Vec<usize>) {
        out.clear();
        out.extend((0..population.len()).filter(|&j| j != index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoidParams;
    use nalgebra::Vector3;

    #[test]
    fn brute_force_lists_everyone_but_self_in_order() {
        let population: Vec<Boid> = (0..4)
            .map(|i| {
                let position = Vector3::new(i as f64, 0.0, 0.0);
                Boid::new(position, Vector3::zeros(), BoidParams::default())
            })
            .collect();
        let mut out = vec![99];
        BruteForce.candidates(&population, 2, &mut out);
        assert_eq!(out, vec![0, 1, 3]);
    }

    #[test]
    fn brute_force_on_single_boid_is_empty() {
        let population = vec![Boid::new(Vector3::zeros(), Vector3::zeros(), BoidParams::default())];
        let mut out = Vec::new();
        BruteForce.candidates(&population, 0, &mut out);
        assert!(out.is_empty());
        assert_eq!(BruteForce.name(), "brute-force");
    }
}
