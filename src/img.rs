//! "Pretty" image generation to display tree skeletons
//!
//! Skeletons are 3D, so they're flattened with an orthographic projection onto one of the three
//! axis-aligned planes (see [`View`]).

use crate::skeleton::Skeleton;
use crate::{Float, Point};

use image::{ImageBuffer, Rgba};
use imageproc::drawing::{self, Blend};
use std::str::FromStr;

/// Creates a color from the provided RGBA integer
///
/// See also: [`rgb`].
///
/// ## Examples
///
/// ```
/// # use tree_skeleton::img::rgba;
/// let transparent = rgba(0x00000000);
/// let red_tint = rgba(0xff000077);
/// let teal = rgba(0x00ffffff);
/// ```
pub fn rgba(int: u32) -> Color {
    let r = ((int >> 24) & 0xff) as u8;
    let g = ((int >> 16) & 0xff) as u8;
    let b = ((int >> 8) & 0xff) as u8;
    let a = (int & 0xff) as u8;

    Rgba([r, g, b, a])
}

/// Creates a color from the provided RGB integer
///
/// See also: [`rgba`].
///
/// ## Panics
///
/// This function panics if the provided integer is greater than `0xffffff`.
///
/// ## Examples
///
/// ```
/// # use tree_skeleton::img::rgb;
/// let red = rgb(0xff0000);
/// let orange = rgb(0xffaa00);
/// assert_eq!(red.0, [0xff, 0, 0, 0xff]);
/// ```
pub fn rgb(int: u32) -> Color {
    assert!(int <= 0xffffff);

    rgba((int << 8) + 0xff)
}

/// The color type we're using
pub type Color = Rgba<u8>;

/// Type alias to represent a number of pixels. This is only provided so that the meaning behind
/// types can be more clear.
pub type PixelCount = u32;

/// The direction that the tree is viewed from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// Looking along -Z: X to the right, Y up
    Front,
    /// Looking along -X: Z to the right, Y up
    Side,
    /// Looking down along -Y: X to the right, Z up
    Top,
}

impl View {
    /// Flattens the point onto the view plane, as (horizontal, vertical)
    pub fn project(&self, p: Point) -> (Float, Float) {
        match self {
            View::Front => (p.x, p.y),
            View::Side => (p.z, p.y),
            View::Top => (p.x, p.z),
        }
    }
}

impl FromStr for View {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<View> {
        match s {
            "front" => Ok(View::Front),
            "side" => Ok(View::Side),
            "top" => Ok(View::Top),
            _ => Err(eyre::eyre!(
                "unknown view {:?}, expected one of: front, side, top",
                s
            )),
        }
    }
}

/// Configuration items for making an image
#[derive(Debug)]
pub struct ImageConfig {
    pub view: View,

    /// The center of the region to use for the image, in view-plane coordinates
    pub centered_at: (Float, Float),

    /// The width of the produced image
    pub width: PixelCount,
    /// The height of the produced image
    pub height: PixelCount,

    /// The scale at which to produce the image
    ///
    /// This value is equivalent to the pixel size that a region size of 1 unit is converted to.
    /// Essentially, if the image has dimensions 1000x500, setting `scale = 500` will make the
    /// image focus on a region that's 2.0x1.0
    pub scale: Float,

    /// Grid lines, given by their color, value, and pixel width on a particular axis
    ///
    /// Lines that are provided earlier will be given precedence (i.e. drawn on top of other lines)
    pub grid_lines: Vec<(Color, Axis, Float, PixelCount)>,

    /// Background color of the image
    pub background: Color,
    /// Color of branches
    pub segment_color: Color,
    /// Color of branch endpoints
    pub point_color: Color,
    /// Radius of the dot drawn at each branch endpoint. Zero disables them.
    pub point_radius: PixelCount,
}

/// The axis on which to draw grid lines -- either the horizontal or vertical one of the view
#[derive(Copy, Clone, Debug)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Helper type alias
type ImageCanvas = Blend<ImageBuffer<Color, Vec<u8>>>;

impl ImageConfig {
    /// Creates a configuration that fits the whole skeleton into an image whose larger side is
    /// `size` pixels, plus `pad` pixels of padding on each axis
    ///
    pub fn fit(skeleton: &Skeleton, view: View, size: PixelCount, pad: PixelCount) -> Self {
        let (lo, hi) = match skeleton.bounds() {
            Some(b) => (view.project(b.min), view.project(b.max)),
            None => ((0.0, 0.0), (0.0, 0.0)),
        };

        let w = hi.0 - lo.0;
        let h = hi.1 - lo.1;
        // A single point (or nothing at all) still needs some scale
        let scale = match w.max(h) {
            extent if extent > 0.0 => size as Float / extent,
            _ => size as Float,
        };

        let width = (scale * w).ceil() as PixelCount + pad;
        let height = (scale * h).ceil() as PixelCount + pad;

        // Mark where the tree is rooted: the ground line from the front or side, or crosshairs
        // through the trunk from above
        let mut grid_lines = Vec::new();
        let ground_color = rgb(0x7a5c3a);
        if let Some(&root) = skeleton.points().first() {
            let (h, v) = view.project(root);
            match view {
                View::Front | View::Side => grid_lines.push((ground_color, Axis::Horizontal, v, 3)),
                View::Top => {
                    grid_lines.push((ground_color, Axis::Horizontal, v, 1));
                    grid_lines.push((ground_color, Axis::Vertical, h, 1));
                }
            }
        }

        ImageConfig {
            view,
            centered_at: ((lo.0 + hi.0) / 2.0, (lo.1 + hi.1) / 2.0),
            width,
            height,
            scale,
            grid_lines,
            background: rgb(0xffffff),
            segment_color: rgb(0x2e7d32),
            point_color: rgb(0x000000),
            point_radius: 2,
        }
    }

    /// Creates an `ImageBuffer` representing the provided skeleton, using the available
    /// configuration options
    pub fn make_image(&self, skeleton: &Skeleton) -> ImageBuffer<Color, Vec<u8>> {
        // Blending from the `image` crate generally assumes that `self` is the background and
        // `other` is the foreground, so things drawn later end up on top.
        let mut buf = Blend(ImageBuffer::from_pixel(
            self.width,
            self.height,
            self.background,
        ));

        let ctx = DrawContext {
            bot_left: (
                self.centered_at.0 - (self.width as Float / self.scale / 2.0),
                self.centered_at.1 - (self.height as Float / self.scale / 2.0),
            ),
            scale: self.scale,
            height: self.height,
        };

        self.draw_grid(&mut buf, ctx);
        self.draw_skeleton(&mut buf, skeleton, ctx);

        buf.0
    }

    /// Draws the required grid lines onto the image
    fn draw_grid(&self, canvas: &mut ImageCanvas, ctx: DrawContext) {
        // Convenience function to process a pair into a Point
        let map = |x, y| imageproc::point::Point { x, y };

        // The iterator here is reversed so that earlier grid lines get drawn last (i.e. on top)
        for &(color, axis, value, px_width) in self.grid_lines.iter().rev() {
            let px_radius = (px_width / 2 + px_width % 2) as i32;

            let points = match axis {
                // A line of constant vertical coordinate
                Axis::Horizontal => {
                    let (_, img_coord) = ctx.coords((0.0, value));
                    if !(0..self.height as i32).contains(&img_coord) {
                        continue;
                    }

                    [
                        map(0, img_coord - px_radius),
                        map(0, img_coord + px_radius),
                        map(self.width as i32, img_coord + px_radius),
                        map(self.width as i32, img_coord - px_radius),
                    ]
                }
                Axis::Vertical => {
                    let (img_coord, _) = ctx.coords((value, 0.0));
                    if !(0..self.width as i32).contains(&img_coord) {
                        continue;
                    }

                    [
                        map(img_coord - px_radius, 0),
                        map(img_coord + px_radius, 0),
                        map(img_coord + px_radius, self.height as i32),
                        map(img_coord - px_radius, self.height as i32),
                    ]
                }
            };

            drawing::draw_polygon_mut(canvas, &points, color);
        }
    }

    /// Draws every segment, then every point on top of them
    fn draw_skeleton(&self, canvas: &mut ImageCanvas, skeleton: &Skeleton, ctx: DrawContext) {
        let to_px = |p: Point| {
            let (x, y) = ctx.coords(self.view.project(p));
            (x as f32, y as f32)
        };

        for s in skeleton.segments() {
            drawing::draw_line_segment_mut(canvas, to_px(s.start), to_px(s.end), self.segment_color);
        }

        if self.point_radius == 0 {
            return;
        }

        for &p in skeleton.points() {
            let center = ctx.coords(self.view.project(p));
            drawing::draw_filled_circle_mut(
                canvas,
                center,
                self.point_radius as i32,
                self.point_color,
            );
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct DrawContext {
    /// The view-plane coordinates of the bottom-left corner of the image
    bot_left: (Float, Float),

    /// The amount scale is multiplied, from the "true" coordinates to the image itself - as a
    /// float
    scale: Float,

    /// The height of the image. We need this because drawing has the origin at the top-left
    /// corner, so we need to flip the image to get it at the bottom-left.
    height: PixelCount,
}

impl DrawContext {
    /// Converts view-plane coordinates to their corresponding location in the image
    ///
    /// The values returned are signed because it's possible for points outside the image to still
    /// provide value (e.g. as the vertices in a polygon).
    fn coords(&self, (h, v): (Float, Float)) -> (i32, i32) {
        let x = ((h - self.bot_left.0) * self.scale).round() as i32;
        let y = ((v - self.bot_left.1) * self.scale).round() as i32;
        (x, self.height as i32 - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::{Preset, TreeGenerator};

    #[test]
    fn test_colors() {
        assert_eq!(rgba(0x11223344), Rgba([0x11, 0x22, 0x33, 0x44]));
        assert_eq!(rgb(0xffaa00), Rgba([0xff, 0xaa, 0x00, 0xff]));
    }

    #[test]
    fn test_projection() {
        let p = Point::new(1.0, 2.0, 3.0);
        assert_eq!(View::Front.project(p), (1.0, 2.0));
        assert_eq!(View::Side.project(p), (3.0, 2.0));
        assert_eq!(View::Top.project(p), (1.0, 3.0));

        assert_eq!("side".parse::<View>().unwrap(), View::Side);
        assert!("back".parse::<View>().is_err());
    }

    #[test]
    fn test_fitted_image_shows_tree() {
        let mut gen = TreeGenerator::new(Preset::Tree1.config(2, 10.0)).unwrap();
        gen.grow();

        let config = ImageConfig::fit(gen.skeleton(), View::Side, 200, 20);
        assert!(config.width.max(config.height) >= 220);

        let img = config.make_image(gen.skeleton());
        assert_eq!(img.dimensions(), (config.width, config.height));

        // The root is drawn as a point, centered horizontally, near the bottom
        let root = gen.points()[0];
        let (x, y) = ctx_for(&config).coords(View::Side.project(root));
        assert!(x >= 0 && y >= 0 && y < config.height as i32);
        assert_eq!(*img.get_pixel(x as u32, y as u32), config.point_color);

        // The corners are left as background
        assert_eq!(*img.get_pixel(0, 0), config.background);
    }

    #[test]
    fn test_empty_skeleton_still_renders() {
        let skeleton = Skeleton::with_capacity(Default::default());
        let config = ImageConfig::fit(&skeleton, View::Top, 50, 10);
        let img = config.make_image(&skeleton);

        assert_eq!(img.dimensions(), (10, 10));
    }

    fn ctx_for(config: &ImageConfig) -> DrawContext {
        DrawContext {
            bot_left: (
                config.centered_at.0 - (config.width as Float / config.scale / 2.0),
                config.centered_at.1 - (config.height as Float / config.scale / 2.0),
            ),
            scale: config.scale,
            height: config.height,
        }
    }
}
