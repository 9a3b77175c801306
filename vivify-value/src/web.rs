// vivify-value - Web-platform value types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Web-platform values.
//!
//! These are the capability surface the serializer needs from the host's
//! web types: byte content, string form, and metadata. Binary payloads
//! share a [`JsArrayBuffer`] cell, so two blobs over one buffer keep
//! their sharing through a serialization round trip.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::{JsArrayBuffer, JsValue};

// ============================================================================
// Binary Payloads
// ============================================================================

#[derive(Debug)]
struct BlobInner {
    content_type: Rc<str>,
    buffer: JsArrayBuffer,
}

/// Immutable binary payload with a MIME content type.
#[derive(Clone)]
pub struct JsBlob(Rc<BlobInner>);

impl JsBlob {
    /// Create a blob over a shared buffer.
    #[must_use]
    pub fn new(buffer: JsArrayBuffer, content_type: impl AsRef<str>) -> Self {
        JsBlob(Rc::new(BlobInner {
            content_type: Rc::from(content_type.as_ref()),
            buffer,
        }))
    }

    /// Create a blob owning fresh bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>, content_type: impl AsRef<str>) -> Self {
        Self::new(JsArrayBuffer::from_bytes(bytes), content_type)
    }

    /// The MIME content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.0.content_type
    }

    /// The shared byte buffer.
    #[must_use]
    pub fn buffer(&self) -> JsArrayBuffer {
        self.0.buffer.clone()
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

#[derive(Debug)]
struct FileInner {
    name: Rc<str>,
    content_type: Rc<str>,
    last_modified: i64,
    buffer: JsArrayBuffer,
}

/// Named binary payload with content type and last-modified timestamp.
#[derive(Clone)]
pub struct JsFile(Rc<FileInner>);

impl JsFile {
    /// Create a file over a shared buffer.
    #[must_use]
    pub fn new(
        buffer: JsArrayBuffer,
        name: impl AsRef<str>,
        content_type: impl AsRef<str>,
        last_modified: i64,
    ) -> Self {
        JsFile(Rc::new(FileInner {
            name: Rc::from(name.as_ref()),
            content_type: Rc::from(content_type.as_ref()),
            last_modified,
            buffer,
        }))
    }

    /// Create a file owning fresh bytes.
    #[must_use]
    pub fn from_bytes(
        bytes: Vec<u8>,
        name: impl AsRef<str>,
        content_type: impl AsRef<str>,
        last_modified: i64,
    ) -> Self {
        Self::new(
            JsArrayBuffer::from_bytes(bytes),
            name,
            content_type,
            last_modified,
        )
    }

    /// The file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The MIME content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.0.content_type
    }

    /// Epoch milliseconds of the last modification.
    #[must_use]
    pub fn last_modified(&self) -> i64 {
        self.0.last_modified
    }

    /// The shared byte buffer.
    #[must_use]
    pub fn buffer(&self) -> JsArrayBuffer {
        self.0.buffer.clone()
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

// ============================================================================
// URLs
// ============================================================================

#[derive(Debug)]
struct UrlInner {
    href: Rc<str>,
}

/// A parsed URL, carried in href form.
///
/// The serializer only needs the string form; parsing and validation are
/// the host's concern.
#[derive(Clone)]
pub struct JsUrl(Rc<UrlInner>);

impl JsUrl {
    /// Wrap an href.
    #[must_use]
    pub fn new(href: impl AsRef<str>) -> Self {
        JsUrl(Rc::new(UrlInner {
            href: Rc::from(href.as_ref()),
        }))
    }

    /// The href string.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.0.href
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

/// Ordered query-string pairs.
///
/// No normalization is applied; insertion order is preserved exactly.
#[derive(Clone)]
pub struct JsUrlSearchParams(Rc<RefCell<Vec<(Rc<str>, Rc<str>)>>>);

impl JsUrlSearchParams {
    /// Create an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        JsUrlSearchParams(Rc::new(RefCell::new(Vec::new())))
    }

    /// Append a pair (duplicates allowed, as in the platform type).
    pub fn append(&self, key: impl AsRef<str>, value: impl AsRef<str>) {
        self.0
            .borrow_mut()
            .push((Rc::from(key.as_ref()), Rc::from(value.as_ref())));
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True when no pairs are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Rc<str>, Rc<str>)> {
        self.0.borrow().clone()
    }

    /// The `application/x-www-form-urlencoded` rendering.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let entries = self.0.borrow();
        let mut out = String::new();
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            form_urlencode(k, &mut out);
            out.push('=');
            form_urlencode(v, &mut out);
        }
        out
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl Default for JsUrlSearchParams {
    fn default() -> Self {
        Self::new()
    }
}

// Form-urlencoding: unreserved bytes pass, space becomes '+', the rest
// percent-encode.
fn form_urlencode(input: &str, out: &mut String) {
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            other => {
                const HEX: &[u8; 16] = b"0123456789ABCDEF";
                out.push('%');
                out.push(HEX[usize::from(other >> 4)] as char);
                out.push(HEX[usize::from(other & 0xf)] as char);
            }
        }
    }
}

// ============================================================================
// Headers and Form Data
// ============================================================================

/// Ordered header pairs. Names and values are carried verbatim.
#[derive(Clone)]
pub struct JsHeaders(Rc<RefCell<Vec<(Rc<str>, Rc<str>)>>>);

impl JsHeaders {
    /// Create an empty header bag.
    #[must_use]
    pub fn new() -> Self {
        JsHeaders(Rc::new(RefCell::new(Vec::new())))
    }

    /// Append a header pair.
    pub fn append(&self, name: impl AsRef<str>, value: impl AsRef<str>) {
        self.0
            .borrow_mut()
            .push((Rc::from(name.as_ref()), Rc::from(value.as_ref())));
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True when no pairs are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Rc<str>, Rc<str>)> {
        self.0.borrow().clone()
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl Default for JsHeaders {
    fn default() -> Self {
        Self::new()
    }
}

/// A multipart form entry: plain text or a file.
#[derive(Clone)]
pub enum FormDataEntry {
    Text(Rc<str>),
    File(JsFile),
}

impl FormDataEntry {
    /// Convert to the value-model representation.
    #[must_use]
    pub fn to_value(&self) -> JsValue {
        match self {
            FormDataEntry::Text(s) => JsValue::String(s.clone()),
            FormDataEntry::File(f) => JsValue::File(f.clone()),
        }
    }
}

/// Ordered multipart form entries.
#[derive(Clone)]
pub struct JsFormData(Rc<RefCell<Vec<(Rc<str>, FormDataEntry)>>>);

impl JsFormData {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        JsFormData(Rc::new(RefCell::new(Vec::new())))
    }

    /// Append a text entry.
    pub fn append_text(&self, name: impl AsRef<str>, value: impl AsRef<str>) {
        self.0
            .borrow_mut()
            .push((Rc::from(name.as_ref()), FormDataEntry::Text(Rc::from(value.as_ref()))));
    }

    /// Append a file entry.
    pub fn append_file(&self, name: impl AsRef<str>, file: JsFile) {
        self.0
            .borrow_mut()
            .push((Rc::from(name.as_ref()), FormDataEntry::File(file)));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True when no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Rc<str>, FormDataEntry)> {
        self.0.borrow().clone()
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl Default for JsFormData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blobs_share_buffers() {
        let buffer = JsArrayBuffer::from_bytes(vec![1, 2, 3]);
        let a = JsBlob::new(buffer.clone(), "application/octet-stream");
        let b = JsBlob::new(buffer, "application/octet-stream");
        assert_eq!(
            JsValue::ArrayBuffer(a.buffer()).ref_identity(),
            JsValue::ArrayBuffer(b.buffer()).ref_identity()
        );
    }

    #[test]
    fn query_string_encoding() {
        let params = JsUrlSearchParams::new();
        params.append("q", "hello world");
        params.append("lang", "en-GB");
        params.append("sym", "a&b=c");
        assert_eq!(
            params.to_query_string(),
            "q=hello+world&lang=en-GB&sym=a%26b%3Dc"
        );
    }

    #[test]
    fn headers_preserve_order() {
        let headers = JsHeaders::new();
        headers.append("content-type", "text/plain");
        headers.append("x-first", "1");
        headers.append("x-first", "2");
        let entries = headers.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(&*entries[1].0, "x-first");
        assert_eq!(&*entries[1].1, "1");
    }
}
