// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory resize backend that records calls and delivers batches on
//! demand.
//!
//! [`RecordingBackend`] is intended for tests and headless hosts: it does not
//! measure anything. Tests keep a clone of the backend, hand another clone to
//! a [`ResizeSubscription`](crate::ResizeSubscription), and then assert on
//! [`RecordingBackend::calls`] or push batches with
//! [`RecordingBackend::deliver`].
//!
//! The recorder does not filter deliveries: a batch can still be delivered to
//! an observer that was cancelled, which models a platform flushing a batch
//! that was already queued.
//!
//! ```
//! use understory_resize::recording::{Call, ObserverId, RecordingBackend};
//! use understory_resize::{ResizeOptions, ResizeSubscription};
//!
//! let backend = RecordingBackend::<u32>::new();
//! let mut sub = ResizeSubscription::new(backend.clone(), ResizeOptions::new()).unwrap();
//! sub.observer(Some(7));
//! sub.mount();
//!
//! assert_eq!(
//!     backend.calls(),
//!     vec![Call::Create(ObserverId(0)), Call::Watch(ObserverId(0), 7)]
//! );
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::ResizeEntry;
use crate::backend::{NativeObserver, ResizeBackend, ResizeCallback};

/// Identifies an observer created by a [`RecordingBackend`], in creation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub usize);

/// A call made into the recording backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call<E> {
    /// A native observer was created.
    Create(ObserverId),
    /// An observer started watching an element.
    Watch(ObserverId, E),
    /// An observer stopped watching an element.
    Unwatch(ObserverId, E),
    /// An observer was cancelled.
    CancelAll(ObserverId),
}

struct Recorder<E> {
    supported: bool,
    calls: Vec<Call<E>>,
    callbacks: Vec<Rc<RefCell<ResizeCallback<E>>>>,
}

impl<E> Recorder<E> {
    fn count(&self, pred: impl Fn(&Call<E>) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}

/// Resize backend that records every call.
///
/// Clones share the same recording.
pub struct RecordingBackend<E> {
    inner: Rc<RefCell<Recorder<E>>>,
}

impl<E> RecordingBackend<E> {
    /// Creates a backend that reports itself as supported.
    #[must_use]
    pub fn new() -> Self {
        Self::with_support(true)
    }

    /// Creates a backend that reports the native facility as missing.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::with_support(false)
    }

    fn with_support(supported: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recorder {
                supported,
                calls: Vec::new(),
                callbacks: Vec::new(),
            })),
        }
    }

    /// Number of observers created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Number of `watch` calls across all observers.
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.inner
            .borrow()
            .count(|call| matches!(call, Call::Watch(..)))
    }

    /// Number of `unwatch` calls across all observers.
    #[must_use]
    pub fn unwatch_count(&self) -> usize {
        self.inner
            .borrow()
            .count(|call| matches!(call, Call::Unwatch(..)))
    }

    /// Number of `cancel_all` calls across all observers.
    #[must_use]
    pub fn cancel_all_count(&self) -> usize {
        self.inner
            .borrow()
            .count(|call| matches!(call, Call::CancelAll(..)))
    }

    /// Forgets the calls recorded so far. Observers stay deliverable.
    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Delivers `batch` to the most recently created observer.
    ///
    /// Returns `false` if no observer has been created.
    pub fn deliver(&self, batch: &[ResizeEntry<E>]) -> bool {
        let latest = self.inner.borrow().callbacks.len().checked_sub(1);
        match latest {
            Some(index) => self.deliver_to(ObserverId(index), batch),
            None => false,
        }
    }

    /// Delivers `batch` to observer `id`, whether or not it was cancelled.
    ///
    /// Returns `false` if no such observer exists.
    pub fn deliver_to(&self, id: ObserverId, batch: &[ResizeEntry<E>]) -> bool {
        let callback = self.inner.borrow().callbacks.get(id.0).cloned();
        let Some(callback) = callback else {
            return false;
        };
        let mut callback = callback.borrow_mut();
        (*callback)(batch);
        true
    }
}

impl<E: Clone> RecordingBackend<E> {
    /// Every call recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call<E>> {
        self.inner.borrow().calls.clone()
    }
}

impl<E> Clone for RecordingBackend<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Default for RecordingBackend<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for RecordingBackend<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RecordingBackend")
            .field("supported", &inner.supported)
            .field("calls", &inner.calls)
            .field("observers", &inner.callbacks.len())
            .finish()
    }
}

impl<E: Clone> ResizeBackend<E> for RecordingBackend<E> {
    type Observer = RecordingObserver<E>;

    fn is_supported(&self) -> bool {
        self.inner.borrow().supported
    }

    fn create(&mut self, callback: ResizeCallback<E>) -> Self::Observer {
        let mut inner = self.inner.borrow_mut();
        let id = ObserverId(inner.callbacks.len());
        inner.callbacks.push(Rc::new(RefCell::new(callback)));
        inner.calls.push(Call::Create(id));
        RecordingObserver {
            id,
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Observer handed out by [`RecordingBackend`].
pub struct RecordingObserver<E> {
    id: ObserverId,
    inner: Rc<RefCell<Recorder<E>>>,
}

impl<E> RecordingObserver<E> {
    /// This observer's id.
    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl<E> fmt::Debug for RecordingObserver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingObserver")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<E: Clone> NativeObserver<E> for RecordingObserver<E> {
    fn watch(&mut self, element: &E) {
        self.inner
            .borrow_mut()
            .calls
            .push(Call::Watch(self.id, element.clone()));
    }

    fn unwatch(&mut self, element: &E) {
        self.inner
            .borrow_mut()
            .calls
            .push(Call::Unwatch(self.id, element.clone()));
    }

    fn cancel_all(&mut self) {
        self.inner.borrow_mut().calls.push(Call::CancelAll(self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec;
    use core::cell::Cell;
    use kurbo::Rect;

    #[test]
    fn records_calls_in_order() {
        let mut backend = RecordingBackend::<u32>::new();
        let mut observer = backend.create(Box::new(|_: &[ResizeEntry<u32>]| {}));
        observer.watch(&4);
        observer.unwatch(&4);
        observer.cancel_all();

        assert_eq!(
            backend.calls(),
            vec![
                Call::Create(ObserverId(0)),
                Call::Watch(ObserverId(0), 4),
                Call::Unwatch(ObserverId(0), 4),
                Call::CancelAll(ObserverId(0)),
            ]
        );
        assert_eq!(backend.watch_count(), 1);
        assert_eq!(backend.unwatch_count(), 1);
        assert_eq!(backend.cancel_all_count(), 1);

        backend.clear_calls();
        assert!(backend.calls().is_empty());
        assert_eq!(backend.created_count(), 1);
    }

    #[test]
    fn deliver_targets_latest_observer() {
        let mut backend = RecordingBackend::<u32>::new();
        assert!(!backend.deliver(&[]));

        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let (a, b) = (Rc::clone(&first), Rc::clone(&second));
        let _ = backend.create(Box::new(move |_: &[ResizeEntry<u32>]| {
            a.set(a.get() + 1);
        }));
        let _ = backend.create(Box::new(move |_: &[ResizeEntry<u32>]| {
            b.set(b.get() + 1);
        }));

        assert!(backend.deliver(&[ResizeEntry::new(1, Rect::ZERO)]));
        assert_eq!((first.get(), second.get()), (0, 1));

        assert!(backend.deliver_to(ObserverId(0), &[]));
        assert_eq!((first.get(), second.get()), (1, 1));
        assert!(!backend.deliver_to(ObserverId(9), &[]));
    }

    #[test]
    fn support_flag_is_reported() {
        assert!(RecordingBackend::<u32>::new().is_supported());
        assert!(!RecordingBackend::<u32>::unsupported().is_supported());
    }
}
