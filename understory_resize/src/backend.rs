// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The platform seam: how a native resize-notification facility plugs in.
//!
//! A platform provides a [`ResizeBackend`], which creates one
//! [`NativeObserver`] per subscription. The observer watches elements and
//! delivers batches of [`ResizeEntry`] values to the callback it was created
//! with. Delivery must be serialized: a backend never invokes the same
//! callback concurrently with itself. It may however invoke it from inside
//! [`NativeObserver::watch`], as toolkits that report the initial size
//! synchronously do.

use alloc::boxed::Box;

use crate::ResizeEntry;

/// Callback receiving one notification batch.
pub type ResizeCallback<E> = Box<dyn FnMut(&[ResizeEntry<E>])>;

/// A live native subscription that can watch elements.
pub trait NativeObserver<E> {
    /// Starts watching `element`.
    ///
    /// The observer may deliver the element's current size before returning.
    fn watch(&mut self, element: &E);

    /// Stops watching `element`, keeping the subscription alive.
    fn unwatch(&mut self, element: &E);

    /// Stops watching every element and cancels the subscription.
    fn cancel_all(&mut self);
}

/// Factory for native observers.
pub trait ResizeBackend<E> {
    /// Observer type produced by [`ResizeBackend::create`].
    type Observer: NativeObserver<E>;

    /// Returns `false` when the host lacks the native facility.
    fn is_supported(&self) -> bool;

    /// Creates a native observer that reports batches to `callback`.
    fn create(&mut self, callback: ResizeCallback<E>) -> Self::Observer;
}
