//! CPU fallback implementing the same per-pixel programs as the shaders.
//!
//! Every pass is a pure function over its instance record; the rasterizer
//! loops here exist for hosts without a GPU and for exercising the exact
//! pass semantics in tests. Formulas match the WGSL sources line for line.

use crate::filter::Filters;
use crate::kernel::KernelTable;
use crate::sdf;
use crate::shape::{outer_corner_radii, outer_size, ShapeInstance};
use crate::texture::{TextureOptions, TextureSurface};

/// A straight-alpha RGBA f32 pixel buffer.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<[f32; 4]>,
}

impl Pixmap {
    /// A transparent pixmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; (width * height) as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, data: Vec<[f32; 4]>) -> Option<Self> {
        if data.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: [f32; 4]) {
        self.data.fill(color);
    }

    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.data[(y * self.width + x) as usize]
    }

    pub fn put(&mut self, x: u32, y: u32, color: [f32; 4]) {
        self.data[(y * self.width + x) as usize] = color;
    }

    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        // Clamp to edge like the GPU samplers.
        let x = x.clamp(0, self.width as i64 - 1) as u32;
        let y = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(x, y)
    }

    /// Nearest-neighbor sample at a [0,1]² coordinate.
    pub fn sample_nearest(&self, uv: [f32; 2]) -> [f32; 4] {
        let x = (uv[0] * self.width as f32).floor() as i64;
        let y = (uv[1] * self.height as f32).floor() as i64;
        self.texel(x, y)
    }

    /// Bilinear sample at a [0,1]² coordinate.
    pub fn sample_bilinear(&self, uv: [f32; 2]) -> [f32; 4] {
        let x = uv[0] * self.width as f32 - 0.5;
        let y = uv[1] * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let p00 = self.texel(x0 as i64, y0 as i64);
        let p10 = self.texel(x0 as i64 + 1, y0 as i64);
        let p01 = self.texel(x0 as i64, y0 as i64 + 1);
        let p11 = self.texel(x0 as i64 + 1, y0 as i64 + 1);

        let mut out = [0.0; 4];
        for c in 0..4 {
            let top = p00[c] + (p10[c] - p00[c]) * fx;
            let bottom = p01[c] + (p11[c] - p01[c]) * fx;
            out[c] = top + (bottom - top) * fy;
        }
        out
    }
}

/// Map a unit-square vertex to output pixel space for a texture instance.
pub fn surface_position(
    vertex: [f32; 2],
    rect: [f32; 4],
    scale: [f32; 2],
    rotation_degrees: f32,
) -> [f32; 2] {
    let size = [rect[2] * scale[0], rect[3] * scale[1]];
    let local = [(vertex[0] - 0.5) * size[0], (vertex[1] - 0.5) * size[1]];
    let (s, c) = rotation_degrees.to_radians().sin_cos();
    let rotated = [c * local[0] - s * local[1], s * local[0] + c * local[1]];
    [
        rotated[0] + rect[0] * scale[0] + size[0] * 0.5,
        rotated[1] + rect[1] * scale[1] + size[1] * 0.5,
    ]
}

/// Top-left-origin pixel space to clip space, flipping Y.
pub fn pixel_to_clip(position: [f32; 2], resolution: [u32; 2]) -> [f32; 2] {
    [
        2.0 * position[0] / resolution[0] as f32 - 1.0,
        1.0 - 2.0 * position[1] / resolution[1] as f32,
    ]
}

/// Per-instance state for shading texture-pass pixels.
#[derive(Debug, Clone)]
pub struct TextureShading {
    /// Scaled quad size in pixels
    pub size: [f32; 2],
    /// Corner radius percentages
    pub radius: [f32; 4],
    /// Clipping bounds in output pixel space: [left, top, right, bottom]
    pub bounds: [f32; 4],
    pub filters: Filters,
    /// Shadow offset (x, y) and softness
    pub shadow: [f32; 3],
    pub options: TextureOptions,
}

impl TextureShading {
    pub fn from_surface(surface: &TextureSurface, options: TextureOptions) -> Self {
        Self {
            size: [
                surface.content.width * surface.content.scale[0],
                surface.content.height * surface.content.scale[1],
            ],
            radius: surface.radius,
            bounds: [
                surface.bounds.left as f32,
                surface.bounds.top as f32,
                surface.bounds.right as f32,
                surface.bounds.bottom as f32,
            ],
            filters: surface.content.filters,
            shadow: surface.shadow,
            options,
        }
    }

    /// Normalized corner radii used against the unit quad.
    fn unit_radii(&self) -> [f32; 4] {
        [
            (self.radius[0] * 0.01).min(0.5),
            (self.radius[1] * 0.01).min(0.5),
            (self.radius[2] * 0.01).min(0.5),
            (self.radius[3] * 0.01).min(0.5),
        ]
    }

    /// UV-space anti-alias width: one output pixel's footprint on the unit
    /// quad.
    fn aa_width(&self) -> f32 {
        0.5 * (1.0 / self.size[0] + 1.0 / self.size[1])
    }

    /// Shade one pixel. `sample` is the straight-alpha source texel at `uv`;
    /// returns `None` for the hard discard outside the clipping bounds.
    pub fn shade(&self, uv: [f32; 2], surface_pos: [f32; 2], sample: [f32; 4]) -> Option<[f32; 4]> {
        if surface_pos[0] < self.bounds[0]
            || surface_pos[1] < self.bounds[1]
            || surface_pos[0] > self.bounds[2]
            || surface_pos[1] > self.bounds[3]
        {
            return None;
        }

        let mut color = sample;

        let radii = self.unit_radii();
        let p = [uv[0] - 0.5, uv[1] - 0.5];
        let dist = sdf::rounded_rect(p, [0.5, 0.5], radii);
        color[3] *= sdf::coverage(dist, self.aa_width(), sdf::EDGE_SHARPEN);
        color[3] *= self.filters.opacity;

        let skip_chain =
            self.options.contains(TextureOptions::PACKED_FILTERS) && self.filters.is_identity();
        if !skip_chain {
            let rgb = self.filters.apply([color[0], color[1], color[2]]);
            color = [rgb[0], rgb[1], rgb[2], color[3]];
        }

        if self.options.contains(TextureOptions::SHADOW) {
            let coverage = self.shadow_coverage(p, radii);
            color[3] += coverage * (1.0 - color[3]);
        }

        if self.options.contains(TextureOptions::PACKED_FILTERS) {
            color = [
                color[0] * color[3],
                color[1] * color[3],
                color[2] * color[3],
                color[3],
            ];
        }

        Some(color)
    }

    fn shadow_coverage(&self, p: [f32; 2], radii: [f32; 4]) -> f32 {
        let min_side = self.size[0].min(self.size[1]);
        let softness = self.shadow[2] / min_side;
        let shadow_p = [
            p[0] - self.shadow[0] / self.size[0],
            p[1] - self.shadow[1] / self.size[1],
        ];
        let dist = sdf::rounded_rect(shadow_p, [0.5 + softness, 0.5 + softness], radii);
        sdf::shadow_falloff(dist, softness)
    }
}

fn blend_straight(dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
    let a = src[3];
    [
        src[0] * a + dst[0] * (1.0 - a),
        src[1] * a + dst[1] * (1.0 - a),
        src[2] * a + dst[2] * (1.0 - a),
        a + dst[3] * (1.0 - a),
    ]
}

fn blend_premultiplied(dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
    let a = src[3];
    [
        src[0] + dst[0] * (1.0 - a),
        src[1] + dst[1] * (1.0 - a),
        src[2] + dst[2] * (1.0 - a),
        a + dst[3] * (1.0 - a),
    ]
}

/// Rasterize one texture surface over the target, sampling `source` as the
/// instance's texture layer.
pub fn render_texture_surface(
    target: &mut Pixmap,
    source: &Pixmap,
    surface: &TextureSurface,
    options: TextureOptions,
) {
    let shading = TextureShading::from_surface(surface, options);
    let scale = surface.content.scale;
    let rect = [
        surface.left,
        surface.top,
        surface.content.width,
        surface.content.height,
    ];
    let size = shading.size;
    if size[0] <= 0.0 || size[1] <= 0.0 {
        return;
    }

    let center = [
        rect[0] * scale[0] + size[0] * 0.5,
        rect[1] * scale[1] + size[1] * 0.5,
    ];
    let (s, c) = surface.rotation.to_radians().sin_cos();
    let packed = options.contains(TextureOptions::PACKED_FILTERS);

    for y in 0..target.height() {
        for x in 0..target.width() {
            let position = [x as f32 + 0.5, y as f32 + 0.5];
            // Invert the instance placement to recover the unit-square uv.
            let offset = [position[0] - center[0], position[1] - center[1]];
            let local = [c * offset[0] + s * offset[1], -s * offset[0] + c * offset[1]];
            let uv = [local[0] / size[0] + 0.5, local[1] / size[1] + 0.5];
            if !(0.0..=1.0).contains(&uv[0]) || !(0.0..=1.0).contains(&uv[1]) {
                continue;
            }

            let sample = source.sample_nearest(uv);
            let Some(color) = shading.shade(uv, position, sample) else {
                continue;
            };

            let dst = target.get(x, y);
            let blended = if packed {
                blend_premultiplied(dst, color)
            } else {
                blend_straight(dst, color)
            };
            target.put(x, y, blended);
        }
    }
}

/// Inner, border and outer coverage of a shape pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeCoverage {
    pub inner: f32,
    pub border: f32,
    pub outer: f32,
}

/// Coverage at `local`, measured from the outer-box center in scaled pixel
/// space. `aa` is the screen-space distance derivative (one pixel).
pub fn shape_coverage(instance: &ShapeInstance, local: [f32; 2], aa: f32) -> ShapeCoverage {
    let border = instance.border_size;
    let scale = instance.scale;

    let outer = outer_size(instance.rect_size, border);
    let outer_half = [outer[0] * scale * 0.5, outer[1] * scale * 0.5];
    let outer_radius =
        outer_corner_radii(instance.border_radius, instance.rect_size, border).map(|r| r * scale);

    let outer_dist = sdf::rounded_rect(local, outer_half, outer_radius);
    let outer_coverage = sdf::coverage(outer_dist, aa, 1.0);

    let inner_half = [
        instance.rect_size[0] * scale * 0.5,
        instance.rect_size[1] * scale * 0.5,
    ];
    let inner_offset = [
        (border[0] - border[1]) * scale * 0.5,
        (border[2] - border[3]) * scale * 0.5,
    ];
    let inner_p = [local[0] - inner_offset[0], local[1] - inner_offset[1]];
    let inner_radius = instance.border_radius.map(|r| r * scale);
    let inner_dist = sdf::rounded_rect(inner_p, inner_half, inner_radius);
    let inner_coverage = sdf::coverage(inner_dist, aa, 1.0);

    ShapeCoverage {
        inner: inner_coverage,
        border: outer_coverage - inner_coverage,
        outer: outer_coverage,
    }
}

/// Shade one shape pixel: sRGB-decoded fill and border, each premultiplied
/// by its own alpha and coverage, summed.
pub fn shape_fragment(instance: &ShapeInstance, local: [f32; 2], aa: f32) -> [f32; 4] {
    use crate::filter::srgb_to_linear;

    let coverage = shape_coverage(instance, local, aa);
    let fill_a = instance.rect_color[3] * coverage.inner;
    let border_a = instance.border_color[3] * coverage.border;

    [
        srgb_to_linear(instance.rect_color[0]) * fill_a
            + srgb_to_linear(instance.border_color[0]) * border_a,
        srgb_to_linear(instance.rect_color[1]) * fill_a
            + srgb_to_linear(instance.border_color[1]) * border_a,
        srgb_to_linear(instance.rect_color[2]) * fill_a
            + srgb_to_linear(instance.border_color[2]) * border_a,
        fill_a + border_a,
    ]
}

/// Rasterize one shape over the target (premultiplied-over; draw order
/// stands in for the GPU depth test here).
pub fn render_shape(target: &mut Pixmap, instance: &ShapeInstance) {
    let border = instance.border_size;
    let scale = instance.scale;
    let outer = outer_size(instance.rect_size, border);
    let outer_scaled = [outer[0] * scale, outer[1] * scale];
    let origin = [
        (instance.rect_pos[0] - border[0]) * scale,
        (instance.rect_pos[1] - border[2]) * scale,
    ];
    let center = [
        origin[0] + outer_scaled[0] * 0.5,
        origin[1] + outer_scaled[1] * 0.5,
    ];

    let x0 = origin[0].floor().max(0.0) as u32;
    let y0 = origin[1].floor().max(0.0) as u32;
    let x1 = ((origin[0] + outer_scaled[0]).ceil() as u32).min(target.width());
    let y1 = ((origin[1] + outer_scaled[1]).ceil() as u32).min(target.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let local = [
                x as f32 + 0.5 - center[0],
                y as f32 + 0.5 - center[1],
            ];
            let color = shape_fragment(instance, local, 1.0);
            if color[3] <= 0.0 {
                continue;
            }
            let blended = blend_premultiplied(target.get(x, y), color);
            target.put(x, y, blended);
        }
    }
}

/// Blur axis selector for the two pass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

/// Shade one blur pixel against a sampled source.
///
/// Sigma 0 is a plain passthrough sample independent of tint and table
/// contents; otherwise taps run from the class start offset up to
/// `3 * sigma`, accumulating onto the tint baseline.
pub fn blur_fragment<F>(
    table: &KernelTable,
    sigma: u32,
    tint: [f32; 4],
    uv: [f32; 2],
    axis: BlurAxis,
    texel: [f32; 2],
    sample: F,
) -> [f32; 4]
where
    F: Fn([f32; 2]) -> [f32; 4],
{
    if sigma == 0 {
        return sample(uv);
    }

    let start = table.start_offset(sigma) as usize;
    let end = (3 * sigma as usize).min(table.weights().len());
    let mut color = tint;
    for i in start..end {
        let weight = table.weights()[i];
        let offset = table.offsets()[i];
        let tap = match axis {
            BlurAxis::Horizontal => [uv[0] + offset * texel[0], uv[1]],
            BlurAxis::Vertical => [uv[0], uv[1] + offset * texel[1]],
        };
        let tap_color = sample(tap);
        for channel in 0..4 {
            color[channel] += weight * tap_color[channel];
        }
    }
    color
}

/// Run one blur direction over the whole source, overwriting the target.
pub fn blur_pass(
    target: &mut Pixmap,
    source: &Pixmap,
    table: &KernelTable,
    sigma: u32,
    tint: [f32; 4],
    axis: BlurAxis,
) {
    let texel = [
        1.0 / source.width() as f32,
        1.0 / source.height() as f32,
    ];
    for y in 0..target.height() {
        for x in 0..target.width() {
            let uv = [
                (x as f32 + 0.5) / target.width() as f32,
                (y as f32 + 0.5) / target.height() as f32,
            ];
            let color = blur_fragment(table, sigma, tint, uv, axis, texel, |at| {
                source.sample_bilinear(at)
            });
            target.put(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_surface_position_identity() {
        let rect = [10.0, 20.0, 100.0, 50.0];
        let top_left = surface_position([0.0, 0.0], rect, [1.0, 1.0], 0.0);
        assert!(approx_eq(top_left[0], 10.0));
        assert!(approx_eq(top_left[1], 20.0));
        let bottom_right = surface_position([1.0, 1.0], rect, [1.0, 1.0], 0.0);
        assert!(approx_eq(bottom_right[0], 110.0));
        assert!(approx_eq(bottom_right[1], 70.0));
    }

    #[test]
    fn test_surface_position_rotation_pivots_center() {
        let rect = [0.0, 0.0, 100.0, 50.0];
        let center = surface_position([0.5, 0.5], rect, [1.0, 1.0], 90.0);
        assert!(approx_eq(center[0], 50.0));
        assert!(approx_eq(center[1], 25.0));
        // A quarter turn swaps the half extents around the center.
        let corner = surface_position([1.0, 1.0], rect, [1.0, 1.0], 90.0);
        assert!(approx_eq(corner[0], 25.0));
        assert!(approx_eq(corner[1], 75.0));
    }

    #[test]
    fn test_pixel_to_clip_corners() {
        let resolution = [200, 100];
        let top_left = pixel_to_clip([0.0, 0.0], resolution);
        assert!(approx_eq(top_left[0], -1.0));
        assert!(approx_eq(top_left[1], 1.0));
        let bottom_right = pixel_to_clip([200.0, 100.0], resolution);
        assert!(approx_eq(bottom_right[0], 1.0));
        assert!(approx_eq(bottom_right[1], -1.0));
        let center = pixel_to_clip([100.0, 50.0], resolution);
        assert!(approx_eq(center[0], 0.0));
        assert!(approx_eq(center[1], 0.0));
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut pixmap = Pixmap::new(2, 1);
        pixmap.put(0, 0, [0.0, 0.0, 0.0, 1.0]);
        pixmap.put(1, 0, [1.0, 1.0, 1.0, 1.0]);
        let mid = pixmap.sample_bilinear([0.5, 0.5]);
        assert!(approx_eq(mid[0], 0.5));
    }
}
