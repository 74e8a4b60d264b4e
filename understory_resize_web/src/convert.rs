// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning what the browser reported into a [`ResizeEntry`].
//!
//! Nothing here touches JS types, so it builds and is tested on every target.
//! The wasm side only reads the `ResizeObserverEntry` fields into an
//! [`EntryReport`].

use alloc::vec::Vec;

use kurbo::Rect;
use understory_resize::{BoxSize, ResizeEntry};

/// One `ResizeObserverSize` field of an entry, in the shape the engine used.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ReportedSize {
    /// A sequence with one size per fragment.
    Fragments(Vec<BoxSize>),
    /// A bare size object, as older engines report it.
    Single(BoxSize),
    /// Not reported at all.
    Missing,
}

impl ReportedSize {
    /// The first fragment's size, if there is one.
    pub(crate) fn first(&self) -> Option<BoxSize> {
        match self {
            Self::Fragments(sizes) => sizes.first().copied(),
            Self::Single(size) => Some(*size),
            Self::Missing => None,
        }
    }
}

/// The fields of one `ResizeObserverEntry`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EntryReport {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) content_box: ReportedSize,
    pub(crate) border_box: ReportedSize,
    pub(crate) device_pixel_content_box: ReportedSize,
}

impl EntryReport {
    /// The content rectangle, origin plus size as `DOMRectReadOnly` reports it.
    pub(crate) fn content_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Builds the entry for `target`.
    ///
    /// Without a reported content box the size is taken from the rectangle.
    pub(crate) fn into_entry<E>(self, target: E) -> ResizeEntry<E> {
        let mut entry = ResizeEntry::new(target, self.content_rect());
        if let Some(size) = self.content_box.first() {
            entry = entry.with_content_box_size(size);
        }
        if let Some(size) = self.border_box.first() {
            entry = entry.with_border_box_size(size);
        }
        if let Some(size) = self.device_pixel_content_box.first() {
            entry = entry.with_device_pixel_content_box_size(size);
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn report(content_box: ReportedSize) -> EntryReport {
        EntryReport {
            x: 4.0,
            y: 8.0,
            width: 300.0,
            height: 150.0,
            content_box,
            border_box: ReportedSize::Missing,
            device_pixel_content_box: ReportedSize::Missing,
        }
    }

    #[test]
    fn first_fragment_wins() {
        let sizes = ReportedSize::Fragments(vec![
            BoxSize::new(10.0, 20.0),
            BoxSize::new(30.0, 40.0),
        ]);
        assert_eq!(sizes.first(), Some(BoxSize::new(10.0, 20.0)));
        assert_eq!(ReportedSize::Fragments(vec![]).first(), None);
    }

    #[test]
    fn single_size_object_is_accepted() {
        let sizes = ReportedSize::Single(BoxSize::new(12.0, 34.0));
        assert_eq!(sizes.first(), Some(BoxSize::new(12.0, 34.0)));
        assert_eq!(ReportedSize::Missing.first(), None);
    }

    #[test]
    fn content_rect_spans_origin_plus_size() {
        let rect = report(ReportedSize::Missing).content_rect();
        assert_eq!(rect, Rect::new(4.0, 8.0, 304.0, 158.0));
        assert_eq!(rect.width(), 300.0);
        assert_eq!(rect.height(), 150.0);
    }

    #[test]
    fn missing_sizes_fall_back_to_the_rect() {
        let entry = report(ReportedSize::Missing).into_entry(1_u32);
        assert_eq!(entry.target, 1);
        assert_eq!(entry.content_box_size, BoxSize::new(300.0, 150.0));
        assert_eq!(entry.border_box_size, None);
        assert_eq!(entry.device_pixel_content_box_size, None);
    }

    #[test]
    fn reported_sizes_are_carried_over() {
        let mut report = report(ReportedSize::Single(BoxSize::new(290.0, 140.0)));
        report.border_box = ReportedSize::Fragments(vec![BoxSize::new(310.0, 160.0)]);
        report.device_pixel_content_box =
            ReportedSize::Fragments(vec![BoxSize::new(580.0, 280.0)]);

        let entry = report.into_entry(());
        assert_eq!(entry.content_rect, Rect::new(4.0, 8.0, 304.0, 158.0));
        assert_eq!(entry.content_box_size, BoxSize::new(290.0, 140.0));
        assert_eq!(entry.border_box_size, Some(BoxSize::new(310.0, 160.0)));
        assert_eq!(
            entry.device_pixel_content_box_size,
            Some(BoxSize::new(580.0, 280.0))
        );
    }
}
