// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_resize_web --heading-base-level=0

//! Browser `ResizeObserver` backend for `understory_resize`.
//!
//! This crate provides a [`ResizeBackend`](understory_resize::ResizeBackend)
//! implementation backed by `web_sys::ResizeObserver` when targeting `wasm32`.
//! Elements are `web_sys::Element` handles.
//!
//! # Usage
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn subscribe(
//!     element: web_sys::Element,
//! ) -> Result<
//!     understory_resize::ResizeSubscription<understory_resize_web::WebResizeBackend, web_sys::Element>,
//!     understory_resize::ResizeError,
//! > {
//!     use understory_resize::{ResizeOptions, ResizeSubscription};
//!     use understory_resize_web::WebResizeBackend;
//!
//!     let options = ResizeOptions::new().with_on_resize(|entry| {
//!         log::info!("resized to {:?}", entry.content_box_size);
//!     });
//!     let mut subscription = ResizeSubscription::new(WebResizeBackend::new(), options)?;
//!     subscription.observer(Some(element));
//!     subscription.mount();
//!     Ok(subscription)
//! }
//! ```
//!
//! Notes:
//! - `WebResizeBackend::is_supported` checks the global scope for
//!   `ResizeObserver`, so creating a subscription fails with
//!   `ResizeError::EnvironmentUnsupported` in hosts without it.
//! - Entries carry `contentRect`, `contentBoxSize`, `borderBoxSize` and
//!   `devicePixelContentBoxSize` when the browser reports them. Older engines
//!   that expose a single size object instead of a sequence are accepted too.
//! - If the browser refuses to construct an observer, a warning is logged and
//!   the returned observer is inert.

#![no_std]

extern crate alloc;

#[cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "entries are only built by the wasm32 backend")
)]
mod convert;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebResizeBackend, WebResizeObserver};
