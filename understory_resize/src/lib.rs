// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_resize --heading-base-level=0

//! Understory Resize: resize-notification subscriptions for UI elements.
//!
//! This crate bridges a platform's imperative resize-notification facility
//! (such as the browser `ResizeObserver`) and a component lifecycle. A
//! component owns a [`ResizeSubscription`], drives it with
//! [`mount`](ResizeSubscription::mount), [`update`](ResizeSubscription::update)
//! and [`unmount`](ResizeSubscription::unmount) (or just drops it), and hands
//! a [`ResizeHandle`] to its view.
//!
//! The handle exposes four things:
//!
//! - [`entry`](ResizeHandle::entry): the latest [`ResizeEntry`], if any.
//! - [`observer`](ResizeHandle::observer): registers the element to watch.
//! - [`disconnect`](ResizeHandle::disconnect): cancels the native observer.
//! - [`unobserve`](ResizeHandle::unobserve): stops watching the element but
//!   keeps the native observer around for reuse.
//!
//! The platform plugs in through [`ResizeBackend`] and [`NativeObserver`].
//! [`recording::RecordingBackend`] is an in-memory backend for tests; the
//! `understory_resize_web` crate provides one backed by `web_sys`.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use understory_resize::recording::RecordingBackend;
//! use understory_resize::{BoxSize, Rect, ResizeEntry, ResizeOptions, ResizeSubscription};
//!
//! let backend = RecordingBackend::<u32>::new();
//! let calls = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&calls);
//! let options = ResizeOptions::new().with_on_resize(move |_| seen.set(seen.get() + 1));
//!
//! let mut subscription = ResizeSubscription::new(backend.clone(), options).unwrap();
//! let handle = subscription.handle();
//! subscription.mount();
//!
//! // The view learned about its element.
//! handle.observer(Some(42));
//! assert_eq!(backend.watch_count(), 1);
//!
//! // The platform reports a new size.
//! backend.deliver(&[ResizeEntry::new(42, Rect::ZERO)
//!     .with_content_box_size(BoxSize::new(500.0, 900.0))]);
//! let entry = handle.entry().unwrap();
//! assert_eq!(entry.content_box_size.inline_size, 500.0);
//! assert_eq!(entry.target, 42);
//! assert_eq!(calls.get(), 1);
//!
//! // Leaving the tree unwatches and cancels.
//! drop(subscription);
//! assert_eq!(backend.unwatch_count(), 1);
//! assert_eq!(backend.cancel_all_count(), 1);
//! ```
//!
//! ## Element references
//!
//! Instead of calling [`observer`](ResizeHandle::observer), a host can hand
//! over an [`ElementRef`] it fills itself. The reference is read on mount
//! (and on update, while nothing is registered yet). The first element seen
//! wins; later changes to the reference are not re-applied for that mount.
//!
//! ## Notification policy
//!
//! - Empty batches are ignored.
//! - Only the first entry of a batch is kept and forwarded; a subscription
//!   watches one element, so a batch carries at most one entry for it.
//! - Storing an entry never requests a refresh from the host. Read
//!   [`ResizeHandle::entry`] when rendering, or react in the `on_resize`
//!   callback.
//! - After `disconnect` or `unobserve` (including from inside `on_resize`),
//!   no further batch reaches the entry or the callback.
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with `std`.
//! - `libm`: build Kurbo with `libm` for `no_std` targets.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod backend;
mod entry;
mod error;
mod options;
pub mod recording;
mod subscription;

pub use backend::{NativeObserver, ResizeBackend, ResizeCallback};
pub use entry::{BoxSize, ResizeEntry};
pub use error::ResizeError;
pub use kurbo::{Rect, Size};
pub use options::{ElementRef, OnResize, ResizeOptions};
pub use subscription::{ResizeHandle, ResizeSubscription};
