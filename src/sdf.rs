//! Signed-distance-field helpers for rounded rectangles.
//!
//! The texture and shape passes evaluate the same distance function in their
//! fragment shaders; this module is the CPU-side reference used by the
//! software fallback and the tests.

/// Pick the corner radius for the quadrant containing `p`.
///
/// `radii` is ordered top-left, top-right, bottom-right, bottom-left in a
/// y-down space centered on the rectangle. The x sign selects the left or
/// right pair, the y sign selects the final corner.
pub fn corner_radius(p: [f32; 2], radii: [f32; 4]) -> f32 {
    let (top, bottom) = if p[0] > 0.0 {
        (radii[1], radii[2])
    } else {
        (radii[0], radii[3])
    };
    if p[1] > 0.0 { bottom } else { top }
}

/// Exact signed distance from `p` to a rounded rectangle centered at the
/// origin with the given half extent and per-corner radii.
///
/// Negative inside, zero on the boundary, positive outside.
pub fn rounded_rect(p: [f32; 2], half_extent: [f32; 2], radii: [f32; 4]) -> f32 {
    let r = corner_radius(p, radii);
    let q = [
        p[0].abs() - half_extent[0] + r,
        p[1].abs() - half_extent[1] + r,
    ];
    let outside = (q[0].max(0.0) * q[0].max(0.0) + q[1].max(0.0) * q[1].max(0.0)).sqrt();
    q[0].max(q[1]).min(0.0) + outside - r
}

/// Hermite interpolation matching the WGSL `smoothstep` builtin.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map a signed distance to coverage.
///
/// `width` is the local screen-space derivative of the distance (`fwidth` on
/// the GPU); `sharpen` scales it (the texture pass uses [`EDGE_SHARPEN`], the
/// shape pass 1.0). Coverage rises from 0 to 1 across one anti-alias width
/// as the distance crosses the boundary from outside to inside.
pub fn coverage(distance: f32, width: f32, sharpen: f32) -> f32 {
    let w = width * sharpen;
    smoothstep(-w, w, -distance)
}

/// Edge sharpening factor applied to the texture pass anti-alias width.
pub const EDGE_SHARPEN: f32 = 0.6;

/// Analytic soft-shadow falloff over a signed distance.
///
/// `softness` must already be normalized by the quad's minimum side. A
/// non-positive softness degenerates to a hard step on the boundary.
pub fn shadow_falloff(distance: f32, softness: f32) -> f32 {
    if softness <= 0.0 {
        return if distance <= 0.0 { 1.0 } else { 0.0 };
    }
    let d = distance.abs() / softness;
    (-d * d / 2.0).exp() * smoothstep(0.0, 1.0, 1.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_center_of_sharp_box() {
        // The center of an unrounded box sits exactly minus the shorter
        // half-extent from the boundary.
        for half in [[1.0, 2.0], [3.0, 0.5], [10.0, 10.0]] {
            let d = rounded_rect([0.0, 0.0], half, [0.0; 4]);
            assert!(approx_eq(d, -half[0].min(half[1])));
        }
    }

    #[test]
    fn test_boundary_and_outside() {
        let half = [2.0, 1.0];
        assert!(approx_eq(rounded_rect([2.0, 0.0], half, [0.0; 4]), 0.0));
        assert!(approx_eq(rounded_rect([3.0, 0.0], half, [0.0; 4]), 1.0));
        assert!(rounded_rect([3.0, 2.0], half, [0.0; 4]) > 1.0);
    }

    #[test]
    fn test_corner_radius_selection() {
        let radii = [1.0, 2.0, 3.0, 4.0];
        assert!(approx_eq(corner_radius([-1.0, -1.0], radii), 1.0)); // top-left
        assert!(approx_eq(corner_radius([1.0, -1.0], radii), 2.0)); // top-right
        assert!(approx_eq(corner_radius([1.0, 1.0], radii), 3.0)); // bottom-right
        assert!(approx_eq(corner_radius([-1.0, 1.0], radii), 4.0)); // bottom-left
    }

    #[test]
    fn test_rounded_corner_distance() {
        // With radius r, the point diagonally outside the corner circle is at
        // distance sqrt(2)*d - r from the boundary.
        let half = [1.0, 1.0];
        let radii = [0.0, 0.5, 0.0, 0.0];
        let d = rounded_rect([1.0, -1.0], half, radii);
        assert!(approx_eq(d, 0.5f32.hypot(0.5) - 0.5));
    }

    #[test]
    fn test_coverage_monotone_across_edge() {
        // Sampling distances symmetric about the boundary: coverage moves
        // continuously and monotonically from 0 to 1 over one AA width.
        let w = 0.02;
        let mut last = 0.0;
        for i in 0..=20 {
            let distance = w - (i as f32 / 20.0) * 2.0 * w;
            let c = coverage(distance, w, 1.0);
            assert!(c >= last);
            last = c;
        }
        assert!(approx_eq(coverage(w, w, 1.0), 0.0));
        assert!(approx_eq(coverage(-w, w, 1.0), 1.0));
        assert!(approx_eq(coverage(0.0, w, 1.0), 0.5));
    }

    #[test]
    fn test_shadow_falloff_hard_step() {
        assert!(approx_eq(shadow_falloff(-0.5, 0.0), 1.0));
        assert!(approx_eq(shadow_falloff(0.0, 0.0), 1.0));
        assert!(approx_eq(shadow_falloff(0.5, 0.0), 0.0));
        assert!(approx_eq(shadow_falloff(0.5, -1.0), 0.0));
    }

    #[test]
    fn test_shadow_falloff_soft() {
        // Full strength on the boundary, decaying with |distance|, gone past
        // one softness unit.
        assert!(approx_eq(shadow_falloff(0.0, 0.25), 1.0));
        let near = shadow_falloff(0.05, 0.25);
        let far = shadow_falloff(0.2, 0.25);
        assert!(near > far);
        assert!(far > 0.0);
        assert!(approx_eq(shadow_falloff(0.25, 0.25), 0.0));
        assert!(approx_eq(shadow_falloff(-0.3, 0.25), 0.0));
    }
}
