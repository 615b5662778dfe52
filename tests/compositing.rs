//! End-to-end checks of the pass semantics through the software fallback.

use scrim::filter::Filters;
use scrim::kernel::KernelTable;
use scrim::shape::ShapeInstance;
use scrim::software::{
    blur_pass, render_shape, render_texture_surface, shape_coverage, BlurAxis, Pixmap,
    TextureShading,
};
use scrim::texture::{SurfaceBounds, SurfaceContent, TextureOptions, TextureSurface};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn solid_pixmap(width: u32, height: u32, color: [f32; 4]) -> Pixmap {
    let mut pixmap = Pixmap::new(width, height);
    pixmap.fill(color);
    pixmap
}

fn plain_surface(bounds: SurfaceBounds) -> TextureSurface<'static> {
    TextureSurface {
        left: 0.0,
        top: 0.0,
        scale: 1.0,
        rotation: 0.0,
        bounds,
        skew: [0.0, 0.0],
        radius: [0.0; 4],
        shadow: [0.0, 0.0, 0.0],
        depth: 0.0,
        content: SurfaceContent {
            width: 100.0,
            height: 100.0,
            bytes: &[],
            scale: [1.0, 1.0],
            filters: Filters::default(),
        },
    }
}

#[test]
fn texture_center_pixel_is_raw_sample_times_opacity() {
    // A 100x100 unrotated, unrounded surface at the origin of a 200x200
    // target: the pixel at (50,50) carries the raw texel modulated by
    // opacity alone.
    let source = solid_pixmap(100, 100, [0.25, 0.5, 0.75, 1.0]);
    let mut surface = plain_surface(SurfaceBounds {
        left: 0,
        top: 0,
        right: 200,
        bottom: 200,
    });
    surface.content.filters.opacity = 0.8;

    let mut target = Pixmap::new(200, 200);
    render_texture_surface(&mut target, &source, &surface, TextureOptions::packed());

    // Premultiplied output over a transparent target.
    let out = target.get(50, 50);
    assert!(approx_eq(out[3], 0.8));
    assert!(approx_eq(out[0], 0.25 * 0.8));
    assert!(approx_eq(out[1], 0.5 * 0.8));
    assert!(approx_eq(out[2], 0.75 * 0.8));

    // Outside the quad nothing is written.
    assert_eq!(target.get(150, 150), [0.0; 4]);
}

#[test]
fn texture_center_pixel_shadowed_configuration() {
    // Same scenario through the shadowed configuration with full opacity:
    // the opaque sample passes through unchanged.
    let source = solid_pixmap(100, 100, [0.25, 0.5, 0.75, 1.0]);
    let surface = plain_surface(SurfaceBounds {
        left: 0,
        top: 0,
        right: 200,
        bottom: 200,
    });

    let mut target = Pixmap::new(200, 200);
    render_texture_surface(&mut target, &source, &surface, TextureOptions::shadowed());

    let out = target.get(50, 50);
    assert!(approx_eq(out[0], 0.25));
    assert!(approx_eq(out[1], 0.5));
    assert!(approx_eq(out[2], 0.75));
    assert!(approx_eq(out[3], 1.0));
}

#[test]
fn texture_bounds_hard_discard() {
    // Clipping bounds cut the quad at x = 40 with no anti-aliasing: one
    // side fully drawn, the other untouched.
    let source = solid_pixmap(100, 100, [1.0, 0.0, 0.0, 1.0]);
    let surface = plain_surface(SurfaceBounds {
        left: 0,
        top: 0,
        right: 40,
        bottom: 200,
    });

    let mut target = Pixmap::new(200, 200);
    render_texture_surface(&mut target, &source, &surface, TextureOptions::packed());

    assert!(target.get(39, 50)[3] > 0.99);
    assert_eq!(target.get(41, 50), [0.0; 4]);
}

#[test]
fn texture_identity_filters_leave_color_unchanged() {
    let shading = TextureShading {
        size: [100.0, 100.0],
        radius: [0.0; 4],
        bounds: [0.0, 0.0, 200.0, 200.0],
        filters: Filters::default(),
        shadow: [0.0; 3],
        options: TextureOptions::packed(),
    };
    let sample = [0.3, 0.6, 0.9, 1.0];
    let out = shading.shade([0.5, 0.5], [50.0, 50.0], sample).unwrap();
    assert!(approx_eq(out[0], 0.3));
    assert!(approx_eq(out[1], 0.6));
    assert!(approx_eq(out[2], 0.9));
    assert!(approx_eq(out[3], 1.0));
}

#[test]
fn texture_rounded_corner_clips_alpha() {
    // Fully rounded corners turn the quad into a disc; the corner texel
    // goes transparent while the center stays opaque.
    let shading = TextureShading {
        size: [100.0, 100.0],
        radius: [50.0; 4],
        bounds: [0.0, 0.0, 200.0, 200.0],
        filters: Filters::default(),
        shadow: [0.0; 3],
        options: TextureOptions::packed(),
    };
    let sample = [1.0, 1.0, 1.0, 1.0];
    let center = shading.shade([0.5, 0.5], [50.0, 50.0], sample).unwrap();
    assert!(approx_eq(center[3], 1.0));
    let corner = shading.shade([0.01, 0.01], [1.0, 1.0], sample).unwrap();
    assert!(approx_eq(corner[3], 0.0));
}

#[test]
fn shape_center_is_fill_edge_is_border() {
    // rect (10,10)-(60,60) with a uniform 5px border: pure fill coverage at
    // the geometric center, pure border 2px inside the outer edge.
    let instance = ShapeInstance {
        rect_pos: [10.0, 10.0],
        rect_size: [50.0, 50.0],
        rect_color: [1.0, 1.0, 1.0, 1.0],
        border_radius: [0.0; 4],
        border_size: [5.0, 5.0, 5.0, 5.0],
        border_color: [0.0, 0.0, 0.0, 1.0],
        scale: 1.0,
        depth: 0.0,
    };

    let center = shape_coverage(&instance, [0.0, 0.0], 1.0);
    assert!(approx_eq(center.inner, 1.0));
    assert!(approx_eq(center.border, 0.0));

    // Outer box spans (5,5)-(65,65); (7, 35) is 2px inside its left edge.
    let local = [7.0 - 35.0, 0.0];
    let edge = shape_coverage(&instance, local, 1.0);
    assert!(edge.border > 0.99);
    assert!(approx_eq(edge.inner, 0.0));
}

#[test]
fn shape_ring_laws() {
    let instance = ShapeInstance {
        rect_pos: [20.0, 20.0],
        rect_size: [60.0, 40.0],
        rect_color: [0.8, 0.2, 0.2, 1.0],
        border_radius: [8.0, 4.0, 12.0, 0.0],
        border_size: [3.0, 6.0, 2.0, 5.0],
        border_color: [0.1, 0.1, 0.1, 1.0],
        scale: 1.0,
        depth: 0.0,
    };

    let mut saw_ring = false;
    for y in 0..110 {
        for x in 0..110 {
            let local = [x as f32 - 50.0, y as f32 - 45.0];
            let coverage = shape_coverage(&instance, local, 0.5);

            // Inner plus border equals outer everywhere.
            assert!(approx_eq(coverage.inner + coverage.border, coverage.outer));

            // Strictly inside the inner box the ring vanishes; strictly
            // outside the outer box everything vanishes.
            if coverage.inner > 0.999 {
                assert!(coverage.border.abs() < 1e-3);
            }
            if coverage.outer < 0.001 {
                assert!(coverage.border.abs() < 1e-3);
            }
            if coverage.border > 0.5 {
                saw_ring = true;
            }
        }
    }
    assert!(saw_ring);
}

#[test]
fn shape_raster_blends_premultiplied() {
    let instance = ShapeInstance {
        rect_pos: [2.0, 2.0],
        rect_size: [12.0, 12.0],
        rect_color: [1.0, 1.0, 1.0, 1.0],
        border_radius: [0.0; 4],
        border_size: [0.0; 4],
        border_color: [0.0; 4],
        scale: 1.0,
        depth: 0.0,
    };

    let mut target = Pixmap::new(16, 16);
    render_shape(&mut target, &instance);

    let center = target.get(8, 8);
    assert!(approx_eq(center[3], 1.0));
    // sRGB white decodes to linear 1.0.
    assert!(approx_eq(center[0], 1.0));
    assert_eq!(target.get(0, 0), [0.0; 4]);
}

#[test]
fn blur_sigma_zero_is_passthrough() {
    // Passthrough ignores tint and table contents entirely.
    let mut table = KernelTable::new();
    table.register(4);

    let mut source = Pixmap::new(8, 8);
    for y in 0..8 {
        for x in 0..8 {
            source.put(x, y, [x as f32 / 8.0, y as f32 / 8.0, 0.5, 1.0]);
        }
    }

    let mut target = Pixmap::new(8, 8);
    blur_pass(
        &mut target,
        &source,
        &table,
        0,
        [0.9, 0.9, 0.9, 0.9],
        BlurAxis::Horizontal,
    );

    for y in 0..8 {
        for x in 0..8 {
            let a = source.get(x, y);
            let b = target.get(x, y);
            for channel in 0..4 {
                assert!(approx_eq(a[channel], b[channel]));
            }
        }
    }
}

#[test]
fn blur_horizontal_spreads_along_x_only() {
    let mut table = KernelTable::new();
    table.register(1);

    let mut source = Pixmap::new(16, 16);
    source.put(8, 8, [1.0, 1.0, 1.0, 1.0]);

    let mut target = Pixmap::new(16, 16);
    blur_pass(&mut target, &source, &table, 1, [0.0; 4], BlurAxis::Horizontal);

    // Energy stays on the impulse row, attenuated by the dropped edge tap.
    let row_sum: f32 = (0..16).map(|x| target.get(x, 8)[0]).sum();
    assert!(row_sum > 0.95 && row_sum <= 1.0);
    assert!(target.get(8, 8)[0] < 1.0);
    assert!(target.get(8, 8)[0] > 0.0);
    assert!(target.get(7, 8)[0] > 0.0);

    for y in 0..16 {
        if y == 8 {
            continue;
        }
        for x in 0..16 {
            assert_eq!(target.get(x, y), [0.0; 4]);
        }
    }
}

#[test]
fn blur_two_pass_spreads_both_axes() {
    let mut table = KernelTable::new();
    table.register(1);

    let mut source = Pixmap::new(16, 16);
    source.put(8, 8, [1.0, 1.0, 1.0, 1.0]);

    let mut intermediate = Pixmap::new(16, 16);
    blur_pass(
        &mut intermediate,
        &source,
        &table,
        1,
        [0.0; 4],
        BlurAxis::Horizontal,
    );
    let mut target = Pixmap::new(16, 16);
    blur_pass(
        &mut target,
        &intermediate,
        &table,
        1,
        [0.0; 4],
        BlurAxis::Vertical,
    );

    assert!(target.get(8, 8)[0] > 0.0);
    assert!(target.get(7, 8)[0] > 0.0);
    assert!(target.get(8, 7)[0] > 0.0);
}

#[test]
fn blur_tint_is_the_accumulator_baseline() {
    let mut table = KernelTable::new();
    table.register(2);

    let source = Pixmap::new(16, 16);
    let mut target = Pixmap::new(16, 16);
    blur_pass(
        &mut target,
        &source,
        &table,
        2,
        [0.125, 0.0, 0.0, 0.25],
        BlurAxis::Vertical,
    );

    // A transparent source leaves exactly the tint everywhere.
    let out = target.get(3, 3);
    assert!(approx_eq(out[0], 0.125));
    assert!(approx_eq(out[3], 0.25));
}

#[test]
fn blur_unregistered_sigma_reads_from_table_start() {
    // Sigma 3 was never registered: the lookup falls back to offset 0 and
    // consumes sigma 2's taps. Not an error, a host data contract.
    let mut table = KernelTable::new();
    table.register(2);

    let mut source = Pixmap::new(16, 16);
    source.fill([0.0, 0.0, 0.0, 1.0]);
    source.put(8, 8, [1.0, 0.0, 0.0, 1.0]);

    let mut target = Pixmap::new(16, 16);
    blur_pass(&mut target, &source, &table, 3, [0.0; 4], BlurAxis::Horizontal);

    // All seven of sigma 2's taps are consumed (7 <= 3 * 3), so alpha
    // accumulates to the full kernel weight.
    let alpha = target.get(2, 2)[3];
    assert!(alpha > 0.99 && alpha <= 1.001);
}
