use kurbo::Point;

/// Square sizing state shared by every instrument widget.
///
/// The drawable diameter is `min(width, height) - 2 * offset`, where the
/// widget side is first held inside `[size_min, size_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeContext {
    size_min: f64,
    size_max: f64,
    offset: f64,
    current_size: f64,
    center: Point,
}

impl SizeContext {
    pub fn new(size_min: f64, size_max: f64, offset: f64) -> Self {
        let size_max = size_max.max(size_min);
        Self {
            size_min,
            size_max,
            offset,
            current_size: (size_min - 2.0 * offset).max(1.0),
            center: Point::new(size_min / 2.0, size_min / 2.0),
        }
    }

    /// Recompute the drawable size for a widget of `width` x `height`.
    /// The instrument stays centered in the widget even when its side is
    /// capped at `size_max`.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        let side = width.min(height).clamp(self.size_min, self.size_max);
        self.current_size = (side - 2.0 * self.offset).max(1.0);
        self.center = Point::new(
            width.max(self.size_min) / 2.0,
            height.max(self.size_min) / 2.0,
        );
    }

    /// Same context with every length multiplied by `factor`, for
    /// high-dpi surfaces.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.size_min * factor,
            self.size_max * factor,
            self.offset * factor,
        )
    }

    pub fn current_size(&self) -> f64 {
        self.current_size
    }

    pub fn half_size(&self) -> f64 {
        self.current_size / 2.0
    }

    /// Units per degree of pitch: 45 degrees spans center to rim.
    pub fn size_ratio(&self) -> f64 {
        self.half_size() / 45.0
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Widget center, the origin every instrument draws around.
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size_min(&self) -> f64 {
        self.size_min
    }

    pub fn size_max(&self) -> f64 {
        self.size_max
    }
}

impl Default for SizeContext {
    fn default() -> Self {
        Self::new(200.0, 600.0, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_size_is_min_minus_offsets() {
        let size = SizeContext::default();
        assert_eq!(size.current_size(), 196.0);
        assert_eq!(size.center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn resize_uses_the_shorter_side() {
        let mut size = SizeContext::default();
        size.on_resize(400.0, 300.0);
        assert_eq!(size.current_size(), 296.0);
        assert_eq!(size.center(), Point::new(200.0, 150.0));
    }

    #[test]
    fn resize_is_held_inside_bounds() {
        let mut size = SizeContext::default();
        size.on_resize(5000.0, 4000.0);
        assert_eq!(size.current_size(), 596.0);
        size.on_resize(10.0, 10.0);
        assert_eq!(size.current_size(), 196.0);
    }

    #[test]
    fn oversized_widget_keeps_instrument_centered() {
        let mut size = SizeContext::default();
        size.on_resize(700.0, 800.0);
        assert_eq!(size.current_size(), 596.0);
        assert_eq!(size.center(), Point::new(350.0, 400.0));
    }

    #[test]
    fn scaled_context_doubles_every_length() {
        let size = SizeContext::default().scaled(2.0);
        assert_eq!((size.size_min(), size.size_max(), size.offset()), (400.0, 1200.0, 4.0));
        assert_eq!(size.current_size(), 392.0);
    }

    #[test]
    fn degenerate_bounds_keep_one_unit() {
        let mut size = SizeContext::new(0.0, 0.0, 2.0);
        size.on_resize(0.0, -5.0);
        assert_eq!(size.current_size(), 1.0);
        assert!(size.size_ratio() > 0.0);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut a = SizeContext::default();
        a.on_resize(321.0, 287.0);
        let first = a;
        a.on_resize(321.0, 287.0);
        assert_eq!(first, a);
    }
}
