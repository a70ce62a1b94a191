use std::fmt::{self, Display};

use crate::models::RepliconContext;

/// A stretch of the replicon searched by the exhaustive re-search.
///
/// Boundaries are 0-based and half-open, `[begin, end)`. On a circular
/// replicon `begin > end` means the window runs over the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub begin: u32,
    pub end: u32,
}

impl Window {
    pub fn new(begin: u32, end: u32) -> Self {
        Window { begin, end }
    }

    /// The whole replicon as a single non-wrapping window.
    pub fn full(ctx: &RepliconContext) -> Self {
        Window {
            begin: 0,
            end: ctx.size,
        }
    }

    /// Window covering the 1-based inclusive span `[first_begin, last_end]`
    /// extended by `left` bases before it and `right` bases after it.
    ///
    /// On a circular replicon the span may run over the origin
    /// (`first_begin > last_end`); if the extended window would cover the
    /// replicon more than once it is replaced by [`Window::full`]. On a
    /// linear replicon the window is clamped to `[0, size]`.
    pub fn around(
        ctx: &RepliconContext,
        first_begin: u32,
        last_end: u32,
        left: u32,
        right: u32,
    ) -> Self {
        let begin = first_begin.saturating_sub(1).min(ctx.size);
        let end = last_end.min(ctx.size);

        if ctx.is_circular() {
            let span = if end > begin {
                (end - begin) as u64
            } else {
                (ctx.size - begin + end) as u64
            };
            if span + left as u64 + right as u64 >= ctx.size as u64 {
                return Window::full(ctx);
            }
        }

        Window {
            begin: ctx.shift_left(begin, left),
            end: ctx.shift_right(end, right),
        }
    }

    pub fn wraps(&self) -> bool {
        self.begin > self.end
    }

    /// Number of bases covered. A wrapping window on a linear replicon is
    /// meaningless and has width 0.
    pub fn width(&self, ctx: &RepliconContext) -> u32 {
        if !self.wraps() {
            self.end.min(ctx.size).saturating_sub(self.begin)
        } else if ctx.is_circular() {
            ctx.size.saturating_sub(self.begin) + self.end
        } else {
            0
        }
    }

    pub fn is_degenerate(&self, ctx: &RepliconContext) -> bool {
        self.width(ctx) == 0
    }

    /// Distance from the window start to the 1-based position `pos`.
    pub fn offset_of(&self, ctx: &RepliconContext, pos: u32) -> i64 {
        ctx.forward_gap(self.begin, pos.saturating_sub(1))
    }

    /// Translate a 1-based position relative to the window's subsequence into
    /// a 1-based replicon position, wrapping over the origin when needed.
    pub fn to_absolute(&self, ctx: &RepliconContext, relative: u32) -> u32 {
        let pos = self.begin as u64 + relative as u64;
        if pos > ctx.size as u64 {
            (pos - ctx.size as u64) as u32
        } else {
            pos as u32
        }
    }

    /// Next window to the right: starts `overlap` bases before this window's
    /// end and reaches `stride` bases past it.
    pub fn slide_right(&self, ctx: &RepliconContext, overlap: u32, stride: u32) -> Self {
        Window {
            begin: ctx.shift_left(self.end, overlap),
            end: ctx.shift_right(self.end, stride),
        }
    }

    /// Next window to the left: ends `overlap` bases after this window's start
    /// and reaches `stride` bases before it.
    pub fn slide_left(&self, ctx: &RepliconContext, overlap: u32, stride: u32) -> Self {
        Window {
            begin: ctx.shift_left(self.begin, stride),
            end: ctx.shift_right(self.begin, overlap),
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::models::Topology;

    #[fixture]
    fn circular() -> RepliconContext {
        RepliconContext::new("rep", 1000, Topology::Circular).unwrap()
    }

    #[fixture]
    fn linear() -> RepliconContext {
        RepliconContext::new("rep", 1000, Topology::Linear).unwrap()
    }

    #[rstest]
    fn test_around_circular_wraps(circular: RepliconContext) {
        let window = Window::around(&circular, 11, 60, 100, 50);
        assert_eq!(window, Window::new(910, 110));
        assert!(window.wraps());
        assert_eq!(window.width(&circular), 200);
    }

    #[rstest]
    fn test_around_linear_clamps(linear: RepliconContext) {
        let window = Window::around(&linear, 11, 960, 100, 100);
        assert_eq!(window, Window::new(0, 1000));
        assert_eq!(window.width(&linear), 1000);
    }

    #[rstest]
    fn test_around_covering_everything(circular: RepliconContext) {
        let window = Window::around(&circular, 100, 600, 300, 300);
        assert_eq!(window, Window::full(&circular));
    }

    #[rstest]
    fn test_around_span_over_origin(circular: RepliconContext) {
        // span 951..40 runs over the origin
        let window = Window::around(&circular, 951, 40, 10, 10);
        assert_eq!(window, Window::new(940, 50));
        assert_eq!(window.width(&circular), 110);
    }

    #[rstest]
    fn test_degenerate(circular: RepliconContext, linear: RepliconContext) {
        assert!(Window::new(10, 10).is_degenerate(&circular));
        assert!(Window::new(900, 10).is_degenerate(&linear));
        assert!(!Window::new(900, 10).is_degenerate(&circular));
    }

    #[rstest]
    fn test_to_absolute(circular: RepliconContext) {
        let window = Window::new(950, 100);
        assert_eq!(window.to_absolute(&circular, 1), 951);
        assert_eq!(window.to_absolute(&circular, 50), 1000);
        assert_eq!(window.to_absolute(&circular, 51), 1);
        assert_eq!(window.to_absolute(&circular, 100), 50);
    }

    #[rstest]
    fn test_offset_of(circular: RepliconContext) {
        let window = Window::new(950, 100);
        assert_eq!(window.offset_of(&circular, 951), 0);
        assert_eq!(window.offset_of(&circular, 1), 50);
    }

    #[rstest]
    fn test_slides(circular: RepliconContext, linear: RepliconContext) {
        let window = Window::new(800, 900);
        assert_eq!(window.slide_right(&circular, 200, 400), Window::new(700, 300));
        assert_eq!(window.slide_left(&circular, 200, 900), Window::new(900, 0));
        assert_eq!(window.slide_right(&linear, 200, 400), Window::new(700, 1000));
        assert_eq!(window.slide_left(&linear, 200, 900), Window::new(0, 1000));
    }
}
