use rgb::RGB8;

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Output device for a strip of addressable LEDs.
///
/// `set_pixel_color` only stages a color; nothing reaches the LEDs until
/// `show` pushes the whole strip. Neither call reports failure.
pub trait LedStrip {
    fn set_pixel_color(&mut self, index: usize, color: RGB8);
    fn show(&mut self);
}

/// Last color written to the hardware for every pixel.
pub struct PixelCache {
    colors: Box<[RGB8]>,
}

impl PixelCache {
    /// All pixels start black, matching the strip's power-on state.
    pub fn new(led_count: usize) -> Self {
        PixelCache {
            colors: vec![BLACK; led_count].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[cfg(test)]
    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    /// Store `color` for `index`. Returns true if the cached value changed.
    /// Out of range indices are ignored.
    fn update(&mut self, index: usize, color: RGB8) -> bool {
        match self.colors.get_mut(index) {
            Some(cached) if *cached != color => {
                *cached = color;
                true
            }
            _ => false,
        }
    }
}

/// What a single `render` call did to the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    /// Pixels staged with a new color.
    pub changed: usize,
    /// Whether `show` was issued.
    pub flushed: bool,
}

/// Diffs decoded pixels against the cache and drives the strip.
pub struct Renderer<S: LedStrip> {
    cache: PixelCache,
    strip: S,
}

impl<S: LedStrip> Renderer<S> {
    pub fn new(strip: S, led_count: usize) -> Self {
        Renderer {
            cache: PixelCache::new(led_count),
            strip,
        }
    }

    pub fn cache(&self) -> &PixelCache {
        &self.cache
    }

    #[cfg(test)]
    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// Stage every pixel whose color differs from the cache and flush once
    /// if anything changed.
    pub fn render<I>(&mut self, pixels: I) -> RenderSummary
    where
        I: IntoIterator<Item = (usize, RGB8)>,
    {
        let mut summary = RenderSummary::default();

        for (index, color) in pixels {
            if self.cache.update(index, color) {
                self.strip.set_pixel_color(index, color);
                summary.changed += 1;
            }
        }

        if summary.changed > 0 {
            self.strip.show();
            summary.flushed = true;
        }

        summary
    }

    /// Force the whole strip to black and flush, regardless of the cache.
    pub fn blank(&mut self) {
        for index in 0..self.cache.len() {
            self.cache.update(index, BLACK);
            self.strip.set_pixel_color(index, BLACK);
        }
        self.strip.show();
    }
}
