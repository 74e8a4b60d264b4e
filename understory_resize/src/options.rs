// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration passed to [`ResizeSubscription::new`](crate::ResizeSubscription::new)
//! and [`ResizeSubscription::update`](crate::ResizeSubscription::update).

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::ResizeEntry;

/// Callback invoked with each newly stored entry.
pub type OnResize<E> = Rc<dyn Fn(&ResizeEntry<E>)>;

/// A shared, externally owned slot holding an element reference.
///
/// The host writes the element into the slot (for example when its view is
/// built) and hands a clone to [`ResizeOptions::with_element_ref`]. The
/// subscription only reads it.
pub struct ElementRef<E> {
    slot: Rc<RefCell<Option<E>>>,
}

impl<E> ElementRef<E> {
    /// Creates an empty reference.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Creates a reference already holding `element`.
    #[must_use]
    pub fn with_element(element: E) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(element))),
        }
    }

    /// Replaces the referenced element.
    pub fn set(&self, element: Option<E>) {
        *self.slot.borrow_mut() = element;
    }

    /// Returns `true` if the reference currently holds an element.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl<E: Clone> ElementRef<E> {
    /// Returns a clone of the referenced element, if any.
    #[must_use]
    pub fn get(&self) -> Option<E> {
        self.slot.borrow().clone()
    }
}

impl<E> Clone for ElementRef<E> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<E> Default for ElementRef<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for ElementRef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("slot", &self.slot.borrow())
            .finish()
    }
}

/// Options for a resize subscription.
pub struct ResizeOptions<E> {
    pub(crate) element_ref: Option<ElementRef<E>>,
    pub(crate) on_resize: Option<OnResize<E>>,
}

impl<E> ResizeOptions<E> {
    /// Options with no element reference and no callback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            element_ref: None,
            on_resize: None,
        }
    }

    /// Watches the element held by `element_ref` on mount, without requiring
    /// the host to call [`ResizeHandle::observer`](crate::ResizeHandle::observer).
    #[must_use]
    pub fn with_element_ref(mut self, element_ref: ElementRef<E>) -> Self {
        self.element_ref = Some(element_ref);
        self
    }

    /// Calls `on_resize` with each stored entry.
    #[must_use]
    pub fn with_on_resize(mut self, on_resize: impl Fn(&ResizeEntry<E>) + 'static) -> Self {
        self.on_resize = Some(Rc::new(on_resize));
        self
    }

    /// Like [`ResizeOptions::with_on_resize`], sharing an existing callback.
    #[must_use]
    pub fn with_shared_on_resize(mut self, on_resize: OnResize<E>) -> Self {
        self.on_resize = Some(on_resize);
        self
    }
}

impl<E> Default for ResizeOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ResizeOptions<E> {
    fn clone(&self) -> Self {
        Self {
            element_ref: self.element_ref.clone(),
            on_resize: self.on_resize.clone(),
        }
    }
}

impl<E> fmt::Debug for ResizeOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeOptions")
            .field("element_ref", &self.element_ref.is_some())
            .field("on_resize", &self.on_resize.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ref_clones_share_the_slot() {
        let a = ElementRef::<u32>::new();
        let b = a.clone();
        assert!(!b.is_set());

        a.set(Some(3));
        assert_eq!(b.get(), Some(3));

        b.set(None);
        assert_eq!(a.get(), None);
    }

    #[test]
    fn options_builders_record_configuration() {
        let options = ResizeOptions::<u32>::new();
        assert!(options.element_ref.is_none());
        assert!(options.on_resize.is_none());

        let options = options
            .with_element_ref(ElementRef::with_element(1))
            .with_on_resize(|_| {});
        assert_eq!(options.element_ref.as_ref().and_then(ElementRef::get), Some(1));
        assert!(options.on_resize.is_some());
    }
}
