//! Tooltip placement near a screen anchor, such as a clicked map marker.
//!
//! Decision rule:
//! 1. Above the anchor, horizontally centered, arrow on the bottom edge.
//! 2. Shift horizontally to stay `padding` away from the left/right viewport edges.
//! 3. Below the anchor (arrow on top) if there is no room above.
//! 4. Beside the anchor, toward the wider half of the viewport, if there is no room below
//!    either. The box is vertically centered on the anchor and clamped to the padded viewport.
//!
//! Inputs are not validated: an oversized tooltip or an empty viewport gives a best-effort
//! position that may lie partly off screen.

use serde::{Deserialize, Serialize};

use crate::types::{ArrowEdge, Point, Size, TooltipPlacement};

/// Distance between the anchor and the nearest tooltip edge, leaving room for the arrow.
pub const DEFAULT_ARROW_GAP: f64 = 16.0;
pub const DEFAULT_PADDING: f64 = 16.0;

/// Tooltip placement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipPlacer {
    /// Minimum distance kept between the tooltip and the viewport edges.
    pub padding: f64,
    /// Distance between the anchor and the tooltip box.
    pub gap: f64,
}

impl Default for TooltipPlacer {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            gap: DEFAULT_ARROW_GAP,
        }
    }
}

impl TooltipPlacer {
    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Compute where the top-left corner of a `tooltip` sized box goes for given anchor.
    pub fn place(&self, anchor: Point, tooltip: Size, viewport: Size) -> TooltipPlacement {
        let (pad, gap) = (self.padding, self.gap);
        let (w, h) = (tooltip.width, tooltip.height);

        let mut x = anchor.x - w / 2.0;
        if x < pad {
            x = pad;
        } else if x + w > viewport.width - pad {
            x = viewport.width - pad - w;
        }

        let above = anchor.y - gap - h;
        if above >= pad {
            return TooltipPlacement {
                x: x,
                y: above,
                arrow_edge: ArrowEdge::Bottom,
            };
        }

        let below = anchor.y + gap;
        if below + h <= viewport.height - pad {
            return TooltipPlacement {
                x: x,
                y: below,
                arrow_edge: ArrowEdge::Top,
            };
        }

        let (x, arrow_edge) = if anchor.x < viewport.width / 2.0 {
            (anchor.x + gap, ArrowEdge::Left)
        } else {
            (anchor.x - gap - w, ArrowEdge::Right)
        };
        // Not f64::clamp: the range is empty when the tooltip is taller than the viewport.
        let y = (anchor.y - h / 2.0).min(viewport.height - pad - h).max(pad);
        TooltipPlacement {
            x: x,
            y: y,
            arrow_edge: arrow_edge,
        }
    }
}

/// Place a tooltip with the default arrow gap and given viewport padding.
pub fn place_tooltip(anchor: Point, tooltip: Size, viewport: Size, padding: f64) -> TooltipPlacement {
    TooltipPlacer::default().padding(padding).place(anchor, tooltip, viewport)
}
