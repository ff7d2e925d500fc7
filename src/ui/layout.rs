/// Photo fitting
///
/// Sizes a photo to its panel without upscaling, and sizes the full-screen
/// overlay to the viewport. Re-run on every natural-size load and every
/// viewport change.

use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

/// Pixels kept free around the full-screen overlay on each axis
pub const DEFAULT_OVERLAY_MARGIN: f32 = 10.0;

/// Viewports narrower or shorter than this get the compact layout
pub const DEFAULT_SMALL_SCREEN: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Which side of the frame limits the displayed photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The photo fits at natural size
    None,
    Width,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub display_width: f32,
    pub display_height: f32,
    pub overlay_width: f32,
    pub overlay_height: f32,
    pub constrained_by: Constraint,
}

impl LayoutResult {
    /// The overlay only makes sense when the panel shows a reduced photo
    pub fn overlay_enabled(&self) -> bool {
        self.constrained_by != Constraint::None
    }
}

/// Fit with the default overlay margin
pub fn fit(natural: Dimensions, panel: Dimensions, viewport: Dimensions) -> LayoutResult {
    fit_with_margin(natural, panel, viewport, DEFAULT_OVERLAY_MARGIN)
}

pub fn fit_with_margin(
    natural: Dimensions,
    panel: Dimensions,
    viewport: Dimensions,
    margin: f32,
) -> LayoutResult {
    let (display_width, display_height, constrained_by) =
        if panel.width >= natural.width && panel.height >= natural.height {
            (natural.width, natural.height, Constraint::None)
        } else {
            scale_into(natural, panel)
        };

    let window = Dimensions::new(
        (viewport.width - margin).max(0.0),
        (viewport.height - margin).max(0.0),
    );
    let (overlay_width, overlay_height, _) = scale_into(natural, window);

    LayoutResult {
        display_width,
        display_height,
        overlay_width,
        overlay_height,
        constrained_by,
    }
}

/// Scale `natural` into `frame` keeping its aspect, never enlarging
fn scale_into(natural: Dimensions, frame: Dimensions) -> (f32, f32, Constraint) {
    if natural.aspect() >= frame.aspect() {
        let width = frame.width.min(natural.width);
        (width, width * natural.height / natural.width, Constraint::Width)
    } else {
        let height = frame.height.min(natural.height);
        (height * natural.width / natural.height, height, Constraint::Height)
    }
}

pub fn is_small_screen(viewport: Dimensions, threshold: f32) -> bool {
    viewport.width < threshold || viewport.height < threshold
}

/// Read the natural size from an encoded image header
pub fn natural_size_of(bytes: &[u8]) -> Option<Dimensions> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Dimensions::new(width as f32, height as f32))
}

/// Something that shows a photo and can be resized
pub trait PhotoSurface {
    fn natural_size(&self) -> Option<Dimensions>;
    fn panel_size(&self) -> Dimensions;
    fn viewport_size(&self) -> Dimensions;
    /// Apply new dimensions. May report a natural-size change through the
    /// fitter's listener.
    fn apply(&mut self, layout: &LayoutResult);
}

/// The "natural size changed" listener.
///
/// Notifications only count while attached. The fitter detaches it around
/// its own dimension changes so a refit never triggers another refit.
#[derive(Debug)]
pub struct SizeListener {
    attached: Cell<bool>,
    pending: Cell<bool>,
}

impl SizeListener {
    fn new() -> Self {
        Self {
            attached: Cell::new(true),
            pending: Cell::new(false),
        }
    }

    pub fn notify(&self) {
        if self.attached.get() {
            self.pending.set(true);
        }
    }

    /// Consume a pending notification
    pub fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    #[cfg(test)]
    fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

/// Re-entrancy safe driver around `fit`
#[derive(Debug)]
pub struct PhotoFitter {
    listener: Rc<SizeListener>,
    margin: f32,
}

impl PhotoFitter {
    pub fn new(margin: f32) -> Self {
        Self {
            listener: Rc::new(SizeListener::new()),
            margin,
        }
    }

    /// Handle for surfaces that report natural-size changes
    pub fn listener(&self) -> Rc<SizeListener> {
        self.listener.clone()
    }

    /// Recompute and apply the layout with the listener detached
    pub fn refit(&self, surface: &mut dyn PhotoSurface) -> Option<LayoutResult> {
        let natural = surface.natural_size()?;
        let layout =
            fit_with_margin(natural, surface.panel_size(), surface.viewport_size(), self.margin);

        self.listener.attached.set(false);
        surface.apply(&layout);
        self.listener.attached.set(true);

        Some(layout)
    }

    /// Refit if a natural-size change is pending
    pub fn on_natural_size_changed(&self, surface: &mut dyn PhotoSurface) -> Option<LayoutResult> {
        if self.listener.take_pending() {
            self.refit(surface)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: f32, height: f32) -> Dimensions {
        Dimensions::new(width, height)
    }

    #[test]
    fn test_wide_photo_constrained_by_width() {
        let layout = fit(dims(1600.0, 1200.0), dims(800.0, 800.0), dims(1920.0, 1080.0));
        assert_eq!(layout.constrained_by, Constraint::Width);
        assert_eq!(layout.display_width, 800.0);
        assert_eq!(layout.display_height, 600.0);
        assert!(layout.overlay_enabled());
    }

    #[test]
    fn test_small_photo_at_natural_size() {
        let layout = fit(dims(400.0, 300.0), dims(800.0, 800.0), dims(1920.0, 1080.0));
        assert_eq!(layout.constrained_by, Constraint::None);
        assert_eq!(layout.display_width, 400.0);
        assert_eq!(layout.display_height, 300.0);
        assert!(!layout.overlay_enabled());
    }

    #[test]
    fn test_tall_photo_constrained_by_height() {
        let layout = fit(dims(600.0, 1200.0), dims(800.0, 400.0), dims(1920.0, 1080.0));
        assert_eq!(layout.constrained_by, Constraint::Height);
        assert_eq!(layout.display_height, 400.0);
        assert_eq!(layout.display_width, 200.0);
    }

    #[test]
    fn test_overlay_uses_viewport_minus_margin() {
        let layout = fit(dims(4000.0, 3000.0), dims(800.0, 800.0), dims(1010.0, 2000.0));
        assert_eq!(layout.overlay_width, 1000.0);
        assert_eq!(layout.overlay_height, 750.0);

        let tall =
            fit_with_margin(dims(1000.0, 4000.0), dims(500.0, 500.0), dims(2000.0, 1020.0), 20.0);
        assert_eq!(tall.overlay_height, 1000.0);
        assert_eq!(tall.overlay_width, 250.0);
    }

    #[test]
    fn test_overlay_never_enlarges() {
        let layout = fit(dims(1200.0, 900.0), dims(600.0, 600.0), dims(4000.0, 4000.0));
        assert_eq!(layout.overlay_width, 1200.0);
        assert_eq!(layout.overlay_height, 900.0);
    }

    #[test]
    fn test_degenerate_panel_does_not_panic() {
        let layout = fit(dims(800.0, 600.0), dims(0.0, 0.0), dims(5.0, 5.0));
        assert_eq!(layout.display_width, 0.0);
        assert_eq!(layout.display_height, 0.0);
    }

    #[test]
    fn test_small_screen() {
        assert!(is_small_screen(dims(599.0, 900.0), DEFAULT_SMALL_SCREEN));
        assert!(is_small_screen(dims(900.0, 500.0), DEFAULT_SMALL_SCREEN));
        assert!(!is_small_screen(dims(600.0, 600.0), DEFAULT_SMALL_SCREEN));
    }

    #[test]
    fn test_natural_size_of_png_header() {
        let mut bytes = Vec::new();
        image::RgbImage::new(3, 2)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(natural_size_of(&bytes), Some(dims(3.0, 2.0)));
        assert_eq!(natural_size_of(b"not an image"), None);
    }

    /// A surface whose dimension changes report a natural-size change,
    /// as an <img> does while its source is swapped
    struct EchoingSurface {
        listener: Rc<SizeListener>,
        applied: Vec<LayoutResult>,
    }

    impl PhotoSurface for EchoingSurface {
        fn natural_size(&self) -> Option<Dimensions> {
            Some(dims(1600.0, 1200.0))
        }

        fn panel_size(&self) -> Dimensions {
            dims(800.0, 800.0)
        }

        fn viewport_size(&self) -> Dimensions {
            dims(1024.0, 768.0)
        }

        fn apply(&mut self, layout: &LayoutResult) {
            self.applied.push(*layout);
            self.listener.notify();
        }
    }

    #[test]
    fn test_refit_does_not_retrigger_itself() {
        let fitter = PhotoFitter::new(DEFAULT_OVERLAY_MARGIN);
        let mut surface = EchoingSurface {
            listener: fitter.listener(),
            applied: Vec::new(),
        };

        // The image finished loading
        fitter.listener().notify();
        assert!(fitter.on_natural_size_changed(&mut surface).is_some());
        assert!(fitter.listener().is_attached());

        // Applying the layout must not have queued another refit
        assert!(fitter.on_natural_size_changed(&mut surface).is_none());
        assert_eq!(surface.applied.len(), 1);
    }
}
