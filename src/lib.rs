//! GPU compositing core for 2D shell-style UIs.
//!
//! Three specialized passes turn per-element layout and style data into
//! finished pixels:
//!
//! - [`texture::TextureCompositor`] draws layers of a texture array as
//!   rotated, rounded, color-filtered, soft-shadowed quads clipped to an
//!   axis-aligned bounds rectangle;
//! - [`shape::ShapeCompositor`] draws filled rounded rectangles with
//!   independently sized and colored border rings, depth-tested;
//! - [`blur::BlurCompositor`] runs a two-pass separable Gaussian blur over
//!   the texture pass's offscreen output.
//!
//! The host owns windowing, frame scheduling and asset decoding; it hands
//! each pass fully populated instance records plus the shared [`viewport`]
//! uniform and consumes the finished color (and depth) output. The
//! [`software`] module implements the same per-pixel programs as pure
//! functions for GPU-less hosts and for tests.

pub mod blur;
pub mod filter;
pub mod gpu;
pub mod kernel;
pub mod sdf;
pub mod shape;
pub mod software;
pub mod texture;
pub mod viewport;

pub use blur::{BlurCompositor, BlurInstance};
pub use filter::Filters;
pub use kernel::KernelTable;
pub use shape::{ShapeCompositor, ShapeInstance};
pub use texture::{
    SurfaceBounds, SurfaceContent, TextureCompositor, TextureOptions, TextureSurface,
};
pub use viewport::{Resolution, Viewport};
