use crate::config::RevealOptions;
use crate::dom::StyleTarget;
use tracing::trace;

/// One intersection observation for an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Vertical extent of an element relative to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBounds {
    pub top: f64,
    pub height: f64,
}

/// Computes intersection entries the way the observer would, for a viewport
/// whose bottom edge is pulled up by the configured margin.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionGeometry {
    pub viewport_height: f64,
    pub bottom_margin: f64,
    pub threshold: f64,
}

impl IntersectionGeometry {
    pub fn new(viewport_height: f64, options: &RevealOptions) -> Self {
        Self {
            viewport_height,
            bottom_margin: options.bottom_margin_px,
            threshold: options.threshold,
        }
    }

    pub fn entry_for(&self, bounds: ElementBounds) -> IntersectionEntry {
        let root_bottom = (self.viewport_height - self.bottom_margin).max(0.0);
        let visible_top = bounds.top.max(0.0);
        let visible_bottom = (bounds.top + bounds.height).min(root_bottom);
        let visible = (visible_bottom - visible_top).max(0.0);

        let ratio = if bounds.height > 0.0 {
            (visible / bounds.height).min(1.0)
        } else if bounds.top >= 0.0 && bounds.top <= root_bottom {
            // zero-height elements count as fully inside when on screen
            1.0
        } else {
            0.0
        };

        IntersectionEntry {
            is_intersecting: ratio > 0.0 && ratio >= self.threshold,
            ratio,
        }
    }
}

/// Fades elements into place the first time they scroll into view.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    options: RevealOptions,
}

impl RevealAnimator {
    pub fn new(options: RevealOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Apply the revealed state when `entry` intersects. Returns whether it did.
    /// Leaving the viewport never undoes a reveal.
    pub fn handle_entry<T: StyleTarget>(&self, target: &mut T, entry: IntersectionEntry) -> bool {
        if !entry.is_intersecting {
            return false;
        }
        reveal(target);
        trace!(ratio = entry.ratio, "Element revealed");
        true
    }
}

pub fn reveal<T: StyleTarget + ?Sized>(target: &mut T) {
    target.set_style_property("opacity", "1");
    target.set_style_property("transform", "translateY(0)");
}
