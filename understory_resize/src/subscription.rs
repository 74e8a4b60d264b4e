// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The subscription adapter and its shared handle.
//!
//! [`ResizeSubscription`] is owned by the component that wants resize
//! notifications and follows its lifecycle ([`mount`], [`update`],
//! [`unmount`], drop). [`ResizeHandle`] is the cheap, clonable surface the
//! component hands to its view: the latest entry plus the `observer`,
//! `disconnect` and `unobserve` operations.
//!
//! Both share one state cell, so a handle captured before a re-target (or
//! before the native observer existed at all) still acts on whatever native
//! observer is live when it is called.
//!
//! ## Binding rules
//!
//! - A native observer is created only while mounted and once an element is
//!   known. Registering an element before mount just records it.
//! - Registering the element that is already watched is a no-op.
//! - Registering a different element re-targets: the previous observer is
//!   unwatched and cancelled, the latest entry is cleared, and a fresh
//!   observer is created.
//! - After [`ResizeHandle::unobserve`], the native observer is kept and the
//!   next registration reuses it.
//! - After [`ResizeHandle::disconnect`], the next registration creates a new
//!   native observer.
//! - A backend may report the initial size from inside `watch`. Calls made
//!   from `on_resize` during that report (`unobserve`, `disconnect`, or a new
//!   registration) are applied as soon as `watch` returns.
//!
//! ## Refresh policy
//!
//! The latest entry is stored in a plain cell. Receiving a notification never
//! asks the host to refresh; consumers read [`ResizeHandle::entry`] when they
//! next render, or react from the `on_resize` callback.
//!
//! [`mount`]: ResizeSubscription::mount
//! [`update`]: ResizeSubscription::update
//! [`unmount`]: ResizeSubscription::unmount

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::backend::{NativeObserver, ResizeBackend, ResizeCallback};
use crate::options::{ElementRef, OnResize, ResizeOptions};
use crate::{ResizeEntry, ResizeError};

/// Where the owning component is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    Mounted,
    Dropped,
}

/// A native observer together with the element it was bound to.
struct Binding<O, E> {
    id: u64,
    observer: O,
    element: E,
    watching: bool,
}

impl<O, E> Binding<O, E>
where
    O: NativeObserver<E>,
{
    /// Unwatches (if still watching) and cancels the native observer.
    fn release(mut self) {
        if self.watching {
            self.watching = false;
            self.observer.unwatch(&self.element);
        }
        self.observer.cancel_all();
    }
}

/// A release requested while the binding was out of its slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Deferred {
    Unobserve,
    Disconnect,
}

struct Shared<B, E>
where
    B: ResizeBackend<E>,
{
    backend: RefCell<B>,
    lifecycle: Cell<Lifecycle>,
    /// The element to watch, set by configuration or by registration.
    element: RefCell<Option<E>>,
    binding: RefCell<Option<Binding<B::Observer, E>>>,
    /// Id of the observer whose batches are currently accepted.
    live: Cell<Option<u64>>,
    next_id: Cell<u64>,
    latest: RefCell<Option<ResizeEntry<E>>>,
    on_resize: RefCell<Option<OnResize<E>>>,
    /// Set while `attach` has the binding out of its slot and is calling
    /// into the native observer, which may report synchronously.
    attaching: Cell<bool>,
    /// A registration arrived while attaching.
    reattach: Cell<bool>,
    deferred: Cell<Option<Deferred>>,
}

impl<B, E> Shared<B, E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    fn register(self: &Rc<Self>, element: E) {
        if self.lifecycle.get() == Lifecycle::Dropped {
            log::trace!("ignoring element registration after teardown");
            return;
        }
        *self.element.borrow_mut() = Some(element);
        self.attach();
    }

    /// Brings the native binding in line with the element slot.
    fn attach(self: &Rc<Self>) {
        if self.lifecycle.get() != Lifecycle::Mounted {
            return;
        }
        if self.attaching.get() {
            self.reattach.set(true);
            return;
        }
        let Some(element) = self.element.borrow().clone() else {
            return;
        };

        let current = self.binding.borrow_mut().take();
        self.attaching.set(true);
        let binding = match current {
            Some(binding) if binding.watching && binding.element == element => binding,
            Some(mut binding) if !binding.watching => {
                log::debug!("resize observer {} reused for a new watch", binding.id);
                if binding.element != element {
                    *self.latest.borrow_mut() = None;
                }
                binding.element = element;
                binding.watching = true;
                self.live.set(Some(binding.id));
                binding.observer.watch(&binding.element);
                binding
            }
            Some(binding) => {
                log::debug!("resize observer {} re-targeted", binding.id);
                self.live.set(None);
                binding.release();
                *self.latest.borrow_mut() = None;
                self.bind(element)
            }
            None => self.bind(element),
        };
        self.attaching.set(false);
        self.settle(binding);

        if self.reattach.replace(false) {
            self.attach();
        }
    }

    /// Creates a native observer and watches `element` with it.
    fn bind(self: &Rc<Self>, element: E) -> Binding<B::Observer, E> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let weak = Rc::downgrade(self);
        let mut observer = self
            .backend
            .borrow_mut()
            .create(notification_callback(weak, id));
        // `watch` may report the initial size before returning.
        self.live.set(Some(id));
        observer.watch(&element);
        log::debug!("resize observer {id} created and watching");

        Binding {
            id,
            observer,
            element,
            watching: true,
        }
    }

    /// Puts `binding` back, applying whatever was requested while attaching.
    fn settle(&self, mut binding: Binding<B::Observer, E>) {
        match self.deferred.take() {
            Some(Deferred::Disconnect) => {
                binding.observer.cancel_all();
                log::debug!("resize observer {} disconnected while binding", binding.id);
                return;
            }
            Some(Deferred::Unobserve) if binding.watching => {
                binding.watching = false;
                binding.observer.unwatch(&binding.element);
                log::debug!("resize observer {} unwatched while binding", binding.id);
            }
            _ => {}
        }
        if self.lifecycle.get() != Lifecycle::Mounted {
            binding.release();
            return;
        }
        *self.binding.borrow_mut() = Some(binding);
    }

    /// Handles one batch from observer `id`.
    fn deliver(&self, id: u64, batch: &[ResizeEntry<E>]) {
        if self.live.get() != Some(id) {
            log::trace!("dropping batch from inactive resize observer {id}");
            return;
        }
        // Only the first entry counts; a single watched target yields at most
        // one entry per delivery.
        let Some(first) = batch.first() else {
            return;
        };
        *self.latest.borrow_mut() = Some(first.clone());
        log::trace!("resize observer {id} stored a new entry");

        let on_resize = self.on_resize.borrow().clone();
        if let Some(on_resize) = on_resize {
            on_resize(first);
        }
    }

    fn unobserve(&self) -> bool {
        let binding = self.binding.borrow_mut().take();
        let Some(mut binding) = binding else {
            return self.defer(Deferred::Unobserve);
        };
        let released = binding.watching;
        if released {
            self.live.set(None);
            binding.watching = false;
            binding.observer.unwatch(&binding.element);
            log::debug!("resize observer {} unwatched its element", binding.id);
        }
        *self.binding.borrow_mut() = Some(binding);
        released
    }

    fn disconnect(&self) -> bool {
        let binding = self.binding.borrow_mut().take();
        let Some(mut binding) = binding else {
            return self.defer(Deferred::Disconnect);
        };
        self.live.set(None);
        binding.observer.cancel_all();
        log::debug!("resize observer {} disconnected", binding.id);
        true
    }

    /// Records a release that `settle` applies once `attach` is done with
    /// the binding. Returns `false` if there is no binding in flight or the
    /// request adds nothing to one already recorded.
    fn defer(&self, request: Deferred) -> bool {
        if !self.attaching.get() {
            return false;
        }
        let current = self.deferred.get();
        if current == Some(Deferred::Disconnect) || current == Some(request) {
            return false;
        }
        self.live.set(None);
        self.deferred.set(Some(request));
        true
    }

    fn teardown(&self, next: Lifecycle) {
        self.lifecycle.set(next);
        self.live.set(None);
        let binding = self.binding.borrow_mut().take();
        if let Some(binding) = binding {
            log::debug!("resize observer {} released on teardown", binding.id);
            binding.release();
        }
        self.element.borrow_mut().take();
        self.latest.borrow_mut().take();
        if next == Lifecycle::Dropped {
            // The callback may hold handles to this state.
            let on_resize = self.on_resize.borrow_mut().take();
            drop(on_resize);
        }
    }
}

fn notification_callback<B, E>(shared: Weak<Shared<B, E>>, id: u64) -> ResizeCallback<E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    Box::new(move |batch: &[ResizeEntry<E>]| {
        if let Some(shared) = shared.upgrade() {
            shared.deliver(id, batch);
        }
    })
}

/// The outbound surface of a [`ResizeSubscription`].
///
/// Clones share state with the subscription that produced them.
pub struct ResizeHandle<B, E>
where
    B: ResizeBackend<E>,
{
    shared: Rc<Shared<B, E>>,
}

impl<B, E> ResizeHandle<B, E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    /// The most recent entry, or `None` if nothing has been reported for the
    /// current element.
    #[must_use]
    pub fn entry(&self) -> Option<ResizeEntry<E>> {
        self.shared.latest.borrow().clone()
    }

    /// Registers the element to watch; `None` is ignored.
    ///
    /// This has the shape of a view's element-reference callback, so it can
    /// be wired directly to wherever the host learns about its element.
    pub fn observer(&self, element: Option<E>) {
        match element {
            Some(element) => self.shared.register(element),
            None => log::trace!("ignoring empty element registration"),
        }
    }

    /// Cancels the native subscription; no further notifications arrive.
    ///
    /// Returns `false` if there was nothing to cancel.
    pub fn disconnect(&self) -> bool {
        self.shared.disconnect()
    }

    /// Stops watching the current element but keeps the native observer for
    /// reuse.
    ///
    /// Returns `false` if nothing was being watched.
    pub fn unobserve(&self) -> bool {
        self.shared.unobserve()
    }

    /// Returns the element currently registered, if any.
    #[must_use]
    pub fn element(&self) -> Option<E> {
        self.shared.element.borrow().clone()
    }

    /// Returns `true` while an element is being watched.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.shared
            .binding
            .borrow()
            .as_ref()
            .is_some_and(|binding| binding.watching)
    }

    /// Returns `true` while a native observer exists.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.binding.borrow().is_some()
    }
}

impl<B, E> Clone for ResizeHandle<B, E>
where
    B: ResizeBackend<E>,
{
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<B, E> fmt::Debug for ResizeHandle<B, E>
where
    B: ResizeBackend<E>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeHandle")
            .field("lifecycle", &self.shared.lifecycle.get())
            .field("live", &self.shared.live.get())
            .field("has_entry", &self.shared.latest.borrow().is_some())
            .finish_non_exhaustive()
    }
}

/// Subscribes one element to resize notifications for the lifetime of a
/// component.
///
/// Dropping the subscription unmounts it.
pub struct ResizeSubscription<B, E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    handle: ResizeHandle<B, E>,
    element_ref: Option<ElementRef<E>>,
}

impl<B, E> ResizeSubscription<B, E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    /// Creates an unmounted subscription.
    ///
    /// Fails with [`ResizeError::EnvironmentUnsupported`] if `backend` has no
    /// native facility.
    pub fn new(backend: B, options: ResizeOptions<E>) -> Result<Self, ResizeError> {
        if !backend.is_supported() {
            log::warn!("resize notifications are not supported by this host");
            return Err(ResizeError::EnvironmentUnsupported);
        }
        let ResizeOptions {
            element_ref,
            on_resize,
        } = options;
        let shared = Rc::new(Shared {
            backend: RefCell::new(backend),
            lifecycle: Cell::new(Lifecycle::Unmounted),
            element: RefCell::new(None),
            binding: RefCell::new(None),
            live: Cell::new(None),
            next_id: Cell::new(0),
            latest: RefCell::new(None),
            on_resize: RefCell::new(on_resize),
            attaching: Cell::new(false),
            reattach: Cell::new(false),
            deferred: Cell::new(None),
        });
        Ok(Self {
            handle: ResizeHandle { shared },
            element_ref,
        })
    }

    /// Returns a handle sharing this subscription's state.
    #[must_use]
    pub fn handle(&self) -> ResizeHandle<B, E> {
        self.handle.clone()
    }

    /// The owning component entered the tree.
    ///
    /// Watches the registered element, or the one held by the configured
    /// element reference. Does nothing if already mounted.
    pub fn mount(&mut self) {
        if self.handle.shared.lifecycle.get() == Lifecycle::Mounted {
            return;
        }
        self.handle.shared.lifecycle.set(Lifecycle::Mounted);
        self.adopt_element_ref();
        self.handle.shared.attach();
    }

    /// The owning component was rebuilt with new options.
    ///
    /// The callback is replaced. The element reference is only consulted if
    /// no element is registered yet for this mount.
    pub fn update(&mut self, options: ResizeOptions<E>) {
        let ResizeOptions {
            element_ref,
            on_resize,
        } = options;
        *self.handle.shared.on_resize.borrow_mut() = on_resize;
        self.element_ref = element_ref;

        let unbound = self.handle.shared.element.borrow().is_none();
        if unbound && self.is_mounted() {
            self.adopt_element_ref();
            self.handle.shared.attach();
        }
    }

    /// The owning component left the tree.
    ///
    /// Unwatches the element and cancels the native observer (skipping
    /// whatever was already released), then forgets the element and the
    /// latest entry.
    pub fn unmount(&mut self) {
        if self.handle.shared.lifecycle.get() == Lifecycle::Mounted {
            self.handle.shared.teardown(Lifecycle::Unmounted);
        }
    }

    /// Returns `true` between [`mount`](Self::mount) and
    /// [`unmount`](Self::unmount).
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.handle.shared.lifecycle.get() == Lifecycle::Mounted
    }

    /// See [`ResizeHandle::entry`].
    #[must_use]
    pub fn entry(&self) -> Option<ResizeEntry<E>> {
        self.handle.entry()
    }

    /// See [`ResizeHandle::observer`].
    pub fn observer(&self, element: Option<E>) {
        self.handle.observer(element);
    }

    /// See [`ResizeHandle::disconnect`].
    pub fn disconnect(&self) -> bool {
        self.handle.disconnect()
    }

    /// See [`ResizeHandle::unobserve`].
    pub fn unobserve(&self) -> bool {
        self.handle.unobserve()
    }

    fn adopt_element_ref(&self) {
        let mut slot = self.handle.shared.element.borrow_mut();
        if slot.is_some() {
            return;
        }
        if let Some(element) = self.element_ref.as_ref().and_then(ElementRef::get) {
            *slot = Some(element);
        }
    }
}

impl<B, E> Drop for ResizeSubscription<B, E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    fn drop(&mut self) {
        self.handle.shared.teardown(Lifecycle::Dropped);
    }
}

impl<B, E> fmt::Debug for ResizeSubscription<B, E>
where
    B: ResizeBackend<E> + 'static,
    E: Clone + PartialEq + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("handle", &self.handle)
            .field("element_ref", &self.element_ref.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Call, ObserverId, RecordingBackend};
    use alloc::vec;
    use kurbo::Rect;

    type Sub = ResizeSubscription<RecordingBackend<u32>, u32>;

    fn subscription(backend: &RecordingBackend<u32>) -> Sub {
        ResizeSubscription::new(backend.clone(), ResizeOptions::new()).unwrap()
    }

    #[test]
    fn registration_before_mount_is_deferred() {
        let backend = RecordingBackend::new();
        let mut sub = subscription(&backend);

        sub.observer(Some(1));
        assert_eq!(backend.created_count(), 0);
        assert!(!sub.handle().is_connected());

        sub.mount();
        assert_eq!(
            backend.calls(),
            vec![Call::Create(ObserverId(0)), Call::Watch(ObserverId(0), 1)]
        );
    }

    #[test]
    fn mount_is_idempotent() {
        let backend = RecordingBackend::new();
        let mut sub = subscription(&backend);
        sub.observer(Some(1));
        sub.mount();
        sub.mount();
        assert_eq!(backend.created_count(), 1);
        assert_eq!(backend.watch_count(), 1);
    }

    #[test]
    fn stale_observer_batches_are_dropped_after_retarget() {
        let backend = RecordingBackend::new();
        let mut sub = subscription(&backend);
        sub.mount();
        sub.observer(Some(1));
        sub.observer(Some(2));

        backend.deliver_to(ObserverId(0), &[ResizeEntry::new(1, Rect::ZERO)]);
        assert_eq!(sub.entry(), None);

        backend.deliver_to(ObserverId(1), &[ResizeEntry::new(2, Rect::ZERO)]);
        assert_eq!(sub.entry().map(|e| e.target), Some(2));
    }

    #[test]
    fn handle_outliving_subscription_is_inert() {
        let backend = RecordingBackend::new();
        let mut sub = subscription(&backend);
        let handle = sub.handle();
        sub.mount();
        handle.observer(Some(1));
        drop(sub);

        handle.observer(Some(2));
        assert_eq!(handle.element(), None);
        assert!(!handle.disconnect());
        assert!(!handle.unobserve());
        assert_eq!(backend.created_count(), 1);
        assert_eq!(backend.cancel_all_count(), 1);
    }

    #[test]
    fn remount_rebinds_from_element_ref() {
        let backend = RecordingBackend::new();
        let element_ref = ElementRef::with_element(5);
        let mut sub = ResizeSubscription::new(
            backend.clone(),
            ResizeOptions::new().with_element_ref(element_ref),
        )
        .unwrap();

        sub.mount();
        sub.unmount();
        assert!(!sub.is_mounted());
        assert_eq!(sub.handle().element(), None);

        sub.mount();
        assert_eq!(backend.created_count(), 2);
        assert_eq!(backend.watch_count(), 2);
        assert_eq!(sub.handle().element(), Some(5));
    }
}
