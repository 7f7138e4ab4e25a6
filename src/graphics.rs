//! Rasterization on top of two primitives: set one pixel, fill one rectangle.
//!
//! Every shape here is expressed through [`Canvas::draw_pixel`] and
//! [`Canvas::fill_rect`], so it never sees the bus. Coordinates are logical
//! (post-rotation) and signed; anything off the surface is clipped by the
//! implementor.

use embedded_graphics_core::pixelcolor::Rgb565;

/// Clamp a computed length to a span size.
pub(crate) fn extent(length: i32) -> u16 {
    length.clamp(0, i32::from(u16::MAX)) as u16
}

/// Whether the box from `(x0, y0)` to `(x1, y1)`, inclusive, lies entirely
/// outside a `width` × `height` surface.
pub(crate) fn misses(width: u16, height: u16, (x0, y0): (i64, i64), (x1, y1): (i64, i64)) -> bool {
    x1 < 0 || y1 < 0 || x0 >= i64::from(width) || y0 >= i64::from(height)
}

/// Bounding box test for circles. A circle that touches the surface keeps
/// every point within i32.
fn circle_misses(width: u16, height: u16, x0: i32, y0: i32, radius: u16) -> bool {
    let (x0, y0, r) = (i64::from(x0), i64::from(y0), i64::from(radius));
    misses(width, height, (x0 - r, y0 - r), (x0 + r, y0 + r))
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Canvas",),
    async(feature = "async", keep_self)
)]
/// A surface that can set pixels and fill rectangles.
#[allow(async_fn_in_trait)]
pub trait Canvas {
    type Error;

    /// Current logical width.
    fn width(&self) -> u16;

    /// Current logical height.
    fn height(&self) -> u16;

    /// Set one pixel. Off-surface coordinates are a no-op.
    async fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Self::Error>;

    /// Fill a rectangle, clipped to the surface.
    async fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), Self::Error>;

    async fn hline(&mut self, x: i32, y: i32, width: u16, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_rect(x, y, width, 1, color).await
    }

    async fn vline(&mut self, x: i32, y: i32, height: u16, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_rect(x, y, 1, height, color).await
    }

    /// Bresenham line, both endpoints inclusive.
    async fn line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let (mut x0, mut y0, mut x1, mut y1) =
            (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
        let corners = ((x0.min(x1), y0.min(y1)), (x0.max(x1), y0.max(y1)));
        if misses(self.width(), self.height(), corners.0, corners.1) {
            return Ok(());
        }

        // Iterate along the major axis: swap roles instead of one branch per octant
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;

        // Only the visible span of the major axis is walked. The error term
        // and minor coordinate are advanced past the skipped steps at once.
        let major_extent = if steep { self.height() } else { self.width() };
        let start = x0.max(0);
        let end = x1.min(i64::from(major_extent) - 1);
        if start > x0 {
            let lag = i128::from(start - x0) * i128::from(dy) - i128::from(err);
            let minor_steps = (lag + i128::from(dx) - 1).div_euclid(i128::from(dx));
            err = (i128::from(err) + minor_steps * i128::from(dx)
                - i128::from(start - x0) * i128::from(dy)) as i64;
            y += minor_steps as i64 * ystep;
        }

        // Both coordinates stay between the i32 endpoints
        for x in start..=end {
            if steep {
                self.draw_pixel(y as i32, x as i32, color).await?;
            } else {
                self.draw_pixel(x as i32, y as i32, color).await?;
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
        Ok(())
    }

    /// Outline of a rectangle as four independent edges. Corners are
    /// written twice.
    async fn rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let right = i64::from(x) + i64::from(width) - 1;
        let bottom = i64::from(y) + i64::from(height) - 1;
        if misses(self.width(), self.height(), (x.into(), y.into()), (right, bottom)) {
            return Ok(());
        }
        // A box touching the surface has both edges within i32
        let (right, bottom) = (right as i32, bottom as i32);

        self.hline(x, y, width, color).await?; // top
        self.hline(x, bottom, width, color).await?; // bottom
        self.vline(x, y, height, color).await?; // left
        self.vline(right, y, height, color).await // right
    }

    async fn filled_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        self.fill_rect(x, y, width, height, color).await
    }

    /// Midpoint circle outline.
    async fn circle(&mut self, x0: i32, y0: i32, radius: u16, color: Rgb565) -> Result<(), Self::Error> {
        if circle_misses(self.width(), self.height(), x0, y0, radius) {
            return Ok(());
        }
        let r = i32::from(radius);
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        self.draw_pixel(x0, y0 + r, color).await?;
        self.draw_pixel(x0, y0 - r, color).await?;
        self.draw_pixel(x0 + r, y0, color).await?;
        self.draw_pixel(x0 - r, y0, color).await?;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.draw_pixel(x0 + x, y0 + y, color).await?;
            self.draw_pixel(x0 - x, y0 + y, color).await?;
            self.draw_pixel(x0 + x, y0 - y, color).await?;
            self.draw_pixel(x0 - x, y0 - y, color).await?;
            self.draw_pixel(x0 + y, y0 + x, color).await?;
            self.draw_pixel(x0 - y, y0 + x, color).await?;
            self.draw_pixel(x0 + y, y0 - x, color).await?;
            self.draw_pixel(x0 - y, y0 - x, color).await?;
        }
        Ok(())
    }

    /// Filled circle. Same recurrence as [`Canvas::circle`], emitting four
    /// vertical spans per step instead of eight points.
    async fn filled_circle(
        &mut self,
        x0: i32,
        y0: i32,
        radius: u16,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        if circle_misses(self.width(), self.height(), x0, y0, radius) {
            return Ok(());
        }
        let r = i32::from(radius);
        self.vline(x0, y0 - r, extent(2 * r + 1), color).await?;

        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;

            self.vline(x0 + x, y0 - y, extent(2 * y + 1), color).await?;
            self.vline(x0 - x, y0 - y, extent(2 * y + 1), color).await?;
            self.vline(x0 + y, y0 - x, extent(2 * x + 1), color).await?;
            self.vline(x0 - y, y0 - x, extent(2 * x + 1), color).await?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "async"))]
pub(crate) mod tests {
    use super::*;
    use crate::color::{BLACK, RED, WHITE};
    use core::convert::Infallible;
    use std::collections::BTreeSet;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Call {
        Pixel(i32, i32, Rgb565),
        Fill(i32, i32, u16, u16, Rgb565),
    }

    /// In-memory surface recording every primitive call.
    pub(crate) struct RecordingCanvas {
        pub width: u16,
        pub height: u16,
        pub calls: Vec<Call>,
    }

    impl RecordingCanvas {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }

        /// Every on-surface pixel touched, with the last color written.
        pub fn pixels(&self) -> BTreeSet<(i32, i32, u16)> {
            let mut last = std::collections::BTreeMap::new();
            for call in &self.calls {
                match *call {
                    Call::Pixel(x, y, color) => {
                        if self.on_surface(x, y) {
                            last.insert((x, y), color);
                        }
                    }
                    Call::Fill(x, y, w, h, color) => {
                        for py in y..y.saturating_add(i32::from(h)) {
                            for px in x..x.saturating_add(i32::from(w)) {
                                if self.on_surface(px, py) {
                                    last.insert((px, py), color);
                                }
                            }
                        }
                    }
                }
            }
            last.into_iter()
                .map(|((x, y), color)| (x, y, crate::color::to_raw(color)))
                .collect()
        }

        pub fn points(&self) -> BTreeSet<(i32, i32)> {
            self.pixels().into_iter().map(|(x, y, _)| (x, y)).collect()
        }

        /// Number of pixel writes that reach the surface, overdraw included.
        pub fn writes(&self) -> usize {
            self.calls
                .iter()
                .map(|call| match *call {
                    Call::Pixel(x, y, _) => usize::from(self.on_surface(x, y)),
                    Call::Fill(x, y, w, h, _) => (y..y.saturating_add(i32::from(h)))
                        .flat_map(|py| (x..x.saturating_add(i32::from(w))).map(move |px| (px, py)))
                        .filter(|&(px, py)| self.on_surface(px, py))
                        .count(),
                })
                .sum()
        }

        fn on_surface(&self, x: i32, y: i32) -> bool {
            x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
        }
    }

    impl Canvas for RecordingCanvas {
        type Error = Infallible;

        fn width(&self) -> u16 {
            self.width
        }

        fn height(&self) -> u16 {
            self.height
        }

        async fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Infallible> {
            self.calls.push(Call::Pixel(x, y, color));
            Ok(())
        }

        async fn fill_rect(
            &mut self,
            x: i32,
            y: i32,
            width: u16,
            height: u16,
            color: Rgb565,
        ) -> Result<(), Infallible> {
            self.calls.push(Call::Fill(x, y, width, height, color));
            Ok(())
        }
    }

    #[tokio::test]
    async fn line_is_symmetric() {
        let segments = [
            (0, 0, 10, 3),
            (2, 17, 9, 1),
            (5, 5, 5, 20),
            (30, 4, 1, 4),
            (0, 0, 7, 7),
            (12, 3, 4, 19),
        ];
        for (x0, y0, x1, y1) in segments {
            let mut forward = RecordingCanvas::new(160, 80);
            let mut backward = RecordingCanvas::new(160, 80);
            forward.line(x0, y0, x1, y1, WHITE).await.unwrap();
            backward.line(x1, y1, x0, y0, WHITE).await.unwrap();
            assert_eq!(forward.points(), backward.points(), "{x0},{y0} -> {x1},{y1}");
        }
    }

    #[tokio::test]
    async fn line_includes_both_endpoints_and_is_connected() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.line(3, 2, 40, 17, RED).await.unwrap();
        let points = canvas.points();
        assert!(points.contains(&(3, 2)));
        assert!(points.contains(&(40, 17)));
        // one pixel per column along the major axis
        assert_eq!(points.len(), 38);
    }

    #[tokio::test]
    async fn steep_line_steps_along_y() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.line(1, 0, 3, 10, RED).await.unwrap();
        let points = canvas.points();
        assert_eq!(points.len(), 11);
        for y in 0..=10 {
            assert_eq!(points.iter().filter(|p| p.1 == y).count(), 1);
        }
    }

    #[tokio::test]
    async fn rect_draws_four_edges() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.rect(2, 3, 10, 5, RED).await.unwrap();
        assert_eq!(
            canvas.calls,
            [
                Call::Fill(2, 3, 10, 1, RED),
                Call::Fill(2, 7, 10, 1, RED),
                Call::Fill(2, 3, 1, 5, RED),
                Call::Fill(11, 3, 1, 5, RED),
            ]
        );
        // 2 * 10 + 2 * 5 writes, four corners counted twice
        assert_eq!(canvas.writes(), 30);
        assert_eq!(canvas.points().len(), 26);
    }

    #[tokio::test]
    async fn single_pixel_rect_overlaps() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.rect(4, 4, 1, 1, RED).await.unwrap();
        assert_eq!(canvas.calls.len(), 4);
        assert_eq!(canvas.points().len(), 1);
    }

    #[tokio::test]
    async fn circle_hits_cardinal_points() {
        for r in 1..20u16 {
            let mut canvas = RecordingCanvas::new(160, 80);
            canvas.circle(60, 40, r, WHITE).await.unwrap();
            let points = canvas.points();
            let r = i32::from(r);
            for p in [(60, 40 + r), (60, 40 - r), (60 + r, 40), (60 - r, 40)] {
                assert!(points.contains(&p), "r={r} missing {p:?}");
            }
        }
    }

    #[tokio::test]
    async fn circle_is_eight_way_symmetric() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.circle(50, 40, 13, WHITE).await.unwrap();
        let points = canvas.points();
        for &(x, y) in &points {
            let (dx, dy) = (x - 50, y - 40);
            assert!(points.contains(&(50 - dx, 40 + dy)));
            assert!(points.contains(&(50 + dx, 40 - dy)));
            assert!(points.contains(&(50 + dy, 40 + dx)));
        }
    }

    #[tokio::test]
    async fn filled_circle_covers_outline() {
        for r in 0..16u16 {
            let mut outline = RecordingCanvas::new(160, 80);
            let mut filled = RecordingCanvas::new(160, 80);
            outline.circle(40, 40, r, WHITE).await.unwrap();
            filled.filled_circle(40, 40, r, WHITE).await.unwrap();
            let fill = filled.points();
            assert!(outline.points().is_subset(&fill), "r={r}");
            // nothing escapes the outline's bounding box
            let r = i32::from(r);
            assert!(fill.iter().all(|&(x, y)| (x - 40).abs() <= r && (y - 40).abs() <= r));
        }
    }

    #[tokio::test]
    async fn filled_circle_emits_spans_only() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.filled_circle(40, 40, 6, BLACK).await.unwrap();
        assert!(canvas.calls.iter().all(|c| matches!(c, Call::Fill(_, _, 1, _, _))));
        assert_eq!(canvas.calls[0], Call::Fill(40, 34, 1, 13, BLACK));
        assert_eq!((canvas.calls.len() - 1) % 4, 0);
    }

    #[tokio::test]
    async fn shapes_far_outside_the_surface_draw_nothing() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.rect(i32::MAX, 0, 2, 2, RED).await.unwrap();
        canvas.rect(i32::MIN, i32::MIN, u16::MAX, u16::MAX, RED).await.unwrap();
        canvas.circle(i32::MAX - 1, 0, 5, RED).await.unwrap();
        canvas.circle(0, i32::MIN, u16::MAX, RED).await.unwrap();
        canvas.filled_circle(0, i32::MIN + 2, u16::MAX, RED).await.unwrap();
        canvas.line(i32::MIN, i32::MIN, i32::MIN + 5, i32::MAX, RED).await.unwrap();
        canvas.line(i32::MAX, 0, i32::MAX - 3, 9, RED).await.unwrap();
        assert!(canvas.calls.is_empty());
    }

    #[tokio::test]
    async fn long_lines_only_walk_the_visible_span() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.line(i32::MIN, 0, 1, 0, RED).await.unwrap();
        assert_eq!(canvas.calls, [Call::Pixel(0, 0, RED), Call::Pixel(1, 0, RED)]);

        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, RED).await.unwrap();
        assert_eq!(canvas.calls.len(), 160);
        let diagonal: BTreeSet<_> = (0..80).map(|i| (i, i)).collect();
        assert_eq!(canvas.points(), diagonal);

        // a clipped line keeps the pixels of the unclipped one
        let mut clipped = RecordingCanvas::new(160, 80);
        let mut reference = RecordingCanvas::new(1000, 1000);
        clipped.line(-37, -90, 120, 70, RED).await.unwrap();
        reference.line(-37 + 500, -90 + 500, 120 + 500, 70 + 500, RED).await.unwrap();
        let shifted: BTreeSet<_> = reference
            .points()
            .into_iter()
            .map(|(x, y)| (x - 500, y - 500))
            .filter(|&(x, y)| (0..160).contains(&x) && (0..80).contains(&y))
            .collect();
        assert_eq!(clipped.points(), shifted);
    }

    #[tokio::test]
    async fn shapes_near_the_edge_are_clipped_by_the_surface() {
        let mut canvas = RecordingCanvas::new(160, 80);
        canvas.filled_circle(2, 2, 5, RED).await.unwrap();
        assert!(canvas.points().contains(&(0, 0)));
        assert!(canvas.points().iter().all(|&(x, y)| x >= 0 && y >= 0));
    }
}
