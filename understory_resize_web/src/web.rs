// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

use js_sys::Array;
use understory_resize::{BoxSize, NativeObserver, ResizeBackend, ResizeCallback, ResizeEntry};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry, ResizeObserverSize};

use crate::convert::{EntryReport, ReportedSize};

/// Creates `web_sys::ResizeObserver` instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebResizeBackend;

impl WebResizeBackend {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResizeBackend<Element> for WebResizeBackend {
    type Observer = WebResizeObserver;

    fn is_supported(&self) -> bool {
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("ResizeObserver"))
            .unwrap_or(false)
    }

    fn create(&mut self, mut callback: ResizeCallback<Element>) -> Self::Observer {
        let closure = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
            let batch: Vec<ResizeEntry<Element>> = entries
                .iter()
                .filter_map(|value| value.dyn_into::<ResizeObserverEntry>().ok())
                .map(|entry| entry_from_js(&entry))
                .collect();
            callback(&batch);
        });
        let observer = match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => Some(observer),
            Err(err) => {
                log::warn!("failed to create ResizeObserver: {err:?}");
                None
            }
        };
        WebResizeObserver {
            observer,
            _callback: closure,
        }
    }
}

/// A live `web_sys::ResizeObserver` and the closure it calls.
///
/// Dropping it disconnects the JS observer before releasing the closure.
pub struct WebResizeObserver {
    observer: Option<ResizeObserver>,
    _callback: Closure<dyn FnMut(Array)>,
}

impl WebResizeObserver {
    /// Returns `false` if the browser refused to create the observer.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.observer.is_some()
    }
}

impl NativeObserver<Element> for WebResizeObserver {
    fn watch(&mut self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.observe(element);
        }
    }

    fn unwatch(&mut self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.unobserve(element);
        }
    }

    fn cancel_all(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

impl Drop for WebResizeObserver {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl fmt::Debug for WebResizeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebResizeObserver")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

fn entry_from_js(entry: &ResizeObserverEntry) -> ResizeEntry<Element> {
    let rect = entry.content_rect();
    EntryReport {
        x: rect.x(),
        y: rect.y(),
        width: rect.width(),
        height: rect.height(),
        content_box: reported_size(entry.content_box_size().into()),
        border_box: reported_size(entry.border_box_size().into()),
        device_pixel_content_box: reported_size(entry.device_pixel_content_box_size().into()),
    }
    .into_entry(entry.target())
}

/// Reads a `ResizeObserverSize` field.
///
/// Some engines report a bare `ResizeObserverSize` instead of a sequence, and
/// `devicePixelContentBoxSize` is missing entirely on others.
fn reported_size(value: JsValue) -> ReportedSize {
    if Array::is_array(&value) {
        let sizes = value
            .unchecked_into::<Array>()
            .iter()
            .filter_map(|item| item.dyn_into::<ResizeObserverSize>().ok())
            .map(|size| box_size(&size))
            .collect();
        return ReportedSize::Fragments(sizes);
    }
    match value.dyn_ref::<ResizeObserverSize>() {
        Some(size) => ReportedSize::Single(box_size(size)),
        None => ReportedSize::Missing,
    }
}

fn box_size(size: &ResizeObserverSize) -> BoxSize {
    BoxSize::new(size.inline_size(), size.block_size())
}
