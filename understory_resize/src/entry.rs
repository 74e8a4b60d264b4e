// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry snapshots reported by a resize notification.
//!
//! A [`ResizeEntry`] mirrors what platform resize observers report for one
//! element: the content rectangle, the content-box size in logical
//! (writing-mode relative) terms, and optionally the border-box and
//! device-pixel content-box sizes.

use kurbo::{Rect, Size};

/// Logical box size, expressed along the inline and block axes.
///
/// For horizontal writing modes the inline axis is the width and the block
/// axis is the height; [`BoxSize::to_size`] performs that mapping.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoxSize {
    /// Length along the inline axis, in layout units.
    pub inline_size: f64,
    /// Length along the block axis, in layout units.
    pub block_size: f64,
}

impl BoxSize {
    /// A zero-sized box.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a box size from its inline and block lengths.
    #[must_use]
    pub const fn new(inline_size: f64, block_size: f64) -> Self {
        Self {
            inline_size,
            block_size,
        }
    }

    /// Interprets a physical size in a horizontal writing mode.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(size.width, size.height)
    }

    /// Converts to a physical size, assuming a horizontal writing mode.
    #[must_use]
    pub const fn to_size(self) -> Size {
        Size::new(self.inline_size, self.block_size)
    }
}

/// The most recent geometry reported for an observed element.
///
/// `E` is the caller's element reference type (a node id, a DOM handle, ...).
/// The entry holds a clone of it, so it should be cheap and non-owning.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeEntry<E> {
    /// The element this entry describes.
    pub target: E,
    /// Content rectangle, relative to the element's padding box.
    pub content_rect: Rect,
    /// Content-box size.
    pub content_box_size: BoxSize,
    /// Border-box size, when the platform reports it.
    pub border_box_size: Option<BoxSize>,
    /// Content-box size in device pixels, when the platform reports it.
    pub device_pixel_content_box_size: Option<BoxSize>,
}

impl<E> ResizeEntry<E> {
    /// Creates an entry whose content-box size is taken from `content_rect`.
    pub fn new(target: E, content_rect: Rect) -> Self {
        Self {
            target,
            content_rect,
            content_box_size: BoxSize::from_size(content_rect.size()),
            border_box_size: None,
            device_pixel_content_box_size: None,
        }
    }

    /// Overrides the content-box size.
    #[must_use]
    pub fn with_content_box_size(mut self, size: BoxSize) -> Self {
        self.content_box_size = size;
        self
    }

    /// Sets the border-box size.
    #[must_use]
    pub fn with_border_box_size(mut self, size: BoxSize) -> Self {
        self.border_box_size = Some(size);
        self
    }

    /// Sets the device-pixel content-box size.
    #[must_use]
    pub fn with_device_pixel_content_box_size(mut self, size: BoxSize) -> Self {
        self.device_pixel_content_box_size = Some(size);
        self
    }

    /// Origin x coordinate of the content rectangle.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.content_rect.x0
    }

    /// Origin y coordinate of the content rectangle.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.content_rect.y0
    }

    /// Signed width of the content rectangle.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.content_rect.width()
    }

    /// Signed height of the content rectangle.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.content_rect.height()
    }

    /// Smallest y coordinate of the content rectangle.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.content_rect.y0.min(self.content_rect.y1)
    }

    /// Smallest x coordinate of the content rectangle.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.content_rect.x0.min(self.content_rect.x1)
    }

    /// Largest x coordinate of the content rectangle.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.content_rect.x0.max(self.content_rect.x1)
    }

    /// Largest y coordinate of the content rectangle.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.content_rect.y0.max(self.content_rect.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_content_box_from_rect() {
        let entry = ResizeEntry::new(1_u32, Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(entry.content_box_size, BoxSize::new(100.0, 50.0));
        assert_eq!(entry.border_box_size, None);
        assert_eq!(entry.device_pixel_content_box_size, None);
    }

    #[test]
    fn rect_accessors_match_dom_rect_semantics() {
        let entry = ResizeEntry::new(1_u32, Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(entry.x(), 10.0);
        assert_eq!(entry.y(), 20.0);
        assert_eq!(entry.width(), 100.0);
        assert_eq!(entry.height(), 50.0);
        assert_eq!(entry.left(), 10.0);
        assert_eq!(entry.top(), 20.0);
        assert_eq!(entry.right(), 110.0);
        assert_eq!(entry.bottom(), 70.0);
    }

    #[test]
    fn edges_are_normalized_for_negative_extents() {
        // x0/y0 is the origin, x1/y1 = origin + (negative) size.
        let entry = ResizeEntry::new(1_u32, Rect::new(50.0, 40.0, 20.0, 10.0));
        assert_eq!(entry.width(), -30.0);
        assert_eq!(entry.left(), 20.0);
        assert_eq!(entry.right(), 50.0);
        assert_eq!(entry.top(), 10.0);
        assert_eq!(entry.bottom(), 40.0);
    }

    #[test]
    fn builders_override_reported_sizes() {
        let entry = ResizeEntry::new(1_u32, Rect::ZERO)
            .with_content_box_size(BoxSize::new(500.0, 900.0))
            .with_border_box_size(BoxSize::new(520.0, 920.0))
            .with_device_pixel_content_box_size(BoxSize::new(1000.0, 1800.0));
        assert_eq!(entry.content_box_size.inline_size, 500.0);
        assert_eq!(entry.content_box_size.block_size, 900.0);
        assert_eq!(entry.border_box_size, Some(BoxSize::new(520.0, 920.0)));
        assert_eq!(
            entry.device_pixel_content_box_size,
            Some(BoxSize::new(1000.0, 1800.0))
        );
        assert_eq!(entry.content_rect, Rect::ZERO);
    }

    #[test]
    fn box_size_maps_to_horizontal_size() {
        let size = BoxSize::new(3.0, 4.0).to_size();
        assert_eq!(size, Size::new(3.0, 4.0));
        assert_eq!(BoxSize::from_size(size), BoxSize::new(3.0, 4.0));
    }
}
