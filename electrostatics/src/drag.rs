//! Drag handling for the balloon and the ruler
//!
//! The object is placed at a fixed anchor plus an offset. While the pointer holds
//! it, a live offset follows the pointer; the offset the widgets compute with is
//! only replaced when the drag ends.

use glam::Vec2;

/// Axis-aligned rectangle in container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, max: min + size }
    }

    /// Rectangle anchored at the origin
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// A draggable object confined to its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSurface {
    anchor: Vec2,
    size: Vec2,
    bounds: Option<Rect>,
    offset: Vec2,
    live: Vec2,
    /// Pointer position relative to the object's corner while held
    grab: Option<Vec2>,
}

impl DragSurface {
    /// `bounds` is `None` while the container geometry is unknown
    pub fn new(anchor: Vec2, size: Vec2, bounds: Option<Rect>) -> Self {
        Self {
            anchor,
            size,
            bounds,
            offset: Vec2::ZERO,
            live: Vec2::ZERO,
            grab: None,
        }
    }

    /// Committed offset from the anchor
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Offset to display, following the pointer during a drag
    pub fn live_offset(&self) -> Vec2 {
        self.live
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Center of the object at its committed position
    pub fn center(&self) -> Vec2 {
        self.anchor + self.offset + self.size * 0.5
    }

    /// Rectangle currently covered on screen
    pub fn live_rect(&self) -> Rect {
        Rect::new(self.anchor + self.live, self.size)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.live_rect().contains(point)
    }

    /// Pick the object up. Returns false when the pointer misses it.
    pub fn begin(&mut self, pointer: Vec2) -> bool {
        if !self.contains(pointer) {
            log::trace!("drag start at {pointer} missed the object");
            return false;
        }
        self.grab = Some(pointer - (self.anchor + self.live));
        true
    }

    /// Follow the pointer, keeping the object inside the container
    pub fn drag_to(&mut self, pointer: Vec2) {
        if let Some(grab) = self.grab {
            self.live = self.clamp(pointer - grab - self.anchor);
        }
    }

    /// Drop the object and commit where it landed
    pub fn end(&mut self) -> Vec2 {
        if self.grab.take().is_some() {
            self.offset = match self.bounds {
                Some(_) => self.live,
                // Unknown geometry: fall back to the default placement
                None => Vec2::ZERO,
            };
            self.live = self.offset;
        }
        self.offset
    }

    /// Back to the default placement, releasing any drag in progress
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.live = Vec2::ZERO;
        self.grab = None;
    }

    fn clamp(&self, offset: Vec2) -> Vec2 {
        match self.bounds {
            Some(bounds) => {
                let lo = bounds.min - self.anchor;
                let hi = (bounds.max - self.size - self.anchor).max(lo);
                offset.clamp(lo, hi)
            }
            None => offset,
        }
    }
}
