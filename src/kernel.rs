//! Precomputed Gaussian kernels for the separable blur pass.
//!
//! Each integer sigma class gets a 1D kernel built once and kept for the
//! life of the table. Raw taps are folded into pairs so one linearly
//! filtered sample reads two texels, halving the tap count. The per-pixel
//! stage walks the weight/offset arrays from the class start offset up to
//! `3 * sigma`, so every sigma a draw will use must be registered first; an
//! unregistered sigma resolves to start offset 0.

use std::collections::HashMap;

/// Fold a discrete Gaussian of the given radius into linear-sampling taps.
///
/// Adjacent raw taps are merged: the pair weight is their sum and the pair
/// offset is biased toward the heavier tap, which reproduces the two-texel
/// read under linear filtering. Weights are normalized by the raw intensity.
fn linear_kernel(radius: i32, sigma: f32) -> (Vec<f32>, Vec<f32>) {
    use std::f32::consts::PI;

    let mut raw_weights = Vec::with_capacity((2 * radius + 1) as usize);
    let mut raw_offsets = Vec::with_capacity((2 * radius + 1) as usize);
    let mut intensity = 0.0;

    for x in -radius..=radius {
        let x = x as f32;
        let g = 1.0 / (2.0 * PI * sigma * sigma).sqrt() * (-x * x / (2.0 * sigma * sigma)).exp();
        raw_weights.push(g);
        raw_offsets.push(x);
        intensity += g;
    }

    let mut weights = Vec::new();
    let mut offsets = Vec::new();

    let mut i = 0;
    while i + 1 < raw_weights.len() {
        let a = raw_weights[i];
        let b = raw_weights[i + 1];
        let pair = a + b;
        weights.push(pair / intensity);
        offsets.push(raw_offsets[i] + a / pair);
        i += 2;
    }

    if i < raw_weights.len() {
        weights.push(raw_weights[i] / intensity);
        offsets.push(raw_offsets[i]);
    }

    (weights, offsets)
}

/// Build-once, read-many kernel storage shared by both blur directions.
///
/// The GPU sees three read-only arrays: a dense sigma-indexed start-offset
/// table plus the parallel weight and offset arrays. Entries keep the
/// `[sigma, start]` pairs in registration order for hosts that want the
/// compact metadata view.
#[derive(Debug, Clone, Default)]
pub struct KernelTable {
    entries: Vec<[u32; 2]>,
    weights: Vec<f32>,
    offsets: Vec<f32>,
    by_sigma: HashMap<u32, u32>,
}

impl KernelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sigma class, generating its taps if not yet present.
    /// Sigma 0 is the passthrough class and never stores taps; re-registering
    /// a sigma keeps its first kernel (first match wins).
    pub fn register(&mut self, sigma: u32) {
        if sigma == 0 || self.by_sigma.contains_key(&sigma) {
            return;
        }

        let start = self.weights.len() as u32;
        let (mut weights, mut offsets) = linear_kernel((sigma * 3) as i32, sigma as f32);
        log::debug!(
            "registered blur sigma {} ({} taps at offset {})",
            sigma,
            weights.len(),
            start
        );
        self.entries.push([sigma, start]);
        self.by_sigma.insert(sigma, start);
        self.weights.append(&mut weights);
        self.offsets.append(&mut offsets);
    }

    /// Start offset for a sigma class; 0 when the sigma was never registered.
    pub fn start_offset(&self, sigma: u32) -> u32 {
        self.by_sigma.get(&sigma).copied().unwrap_or(0)
    }

    /// Dense sigma-indexed start offsets, unregistered slots resolving to 0.
    /// This is the lookup array the blur shader binds.
    pub fn dense_starts(&self) -> Vec<u32> {
        let max_sigma = self.entries.iter().map(|e| e[0]).max().unwrap_or(0);
        let mut starts = vec![0u32; max_sigma as usize + 1];
        for entry in &self.entries {
            starts[entry[0] as usize] = entry[1];
        }
        starts
    }

    /// `[sigma, start]` pairs in registration order.
    pub fn entries(&self) -> &[[u32; 2]] {
        &self.entries
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_kernel_fold() {
        // Radius 3*sigma yields 6*sigma + 1 raw taps, folded to 3*sigma
        // pairs plus one leftover tap.
        let (weights, offsets) = linear_kernel(6, 2.0);
        assert_eq!(weights.len(), 7);
        assert_eq!(offsets.len(), 7);
        // Normalized: everything sums to one.
        let total: f32 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        // Offsets are strictly increasing and sit between their raw pairs.
        for pair in offsets.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(offsets[0] > -6.0 && offsets[0] < -5.0);
    }

    #[test]
    fn test_consumed_taps_cover_the_kernel() {
        // The pixel stage reads taps [start, 3*sigma); for a fresh table
        // that is every pair, leaving only the small unpaired edge tap.
        let mut table = KernelTable::new();
        table.register(2);
        let start = table.start_offset(2) as usize;
        let consumed: f32 = table.weights()[start..6].iter().sum();
        assert!(consumed > 0.99 && consumed <= 1.0);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut table = KernelTable::new();
        table.register(3);
        let weights = table.weights().len();
        table.register(3);
        assert_eq!(table.weights().len(), weights);
        assert_eq!(table.entries().len(), 1);
    }

    #[test]
    fn test_sigma_zero_stores_nothing() {
        let mut table = KernelTable::new();
        table.register(0);
        assert!(table.is_empty());
        assert_eq!(table.start_offset(0), 0);
    }

    #[test]
    fn test_unmatched_sigma_falls_back_to_zero() {
        let mut table = KernelTable::new();
        table.register(2);
        table.register(5);
        assert_eq!(table.start_offset(7), 0);
        let dense = table.dense_starts();
        assert_eq!(dense.len(), 6);
        assert_eq!(dense[2], 0);
        assert_eq!(dense[5], 7);
        assert_eq!(dense[3], 0);
    }
}
