//! Page capabilities the components depend on.
//!
//! Each component talks to the document through one of these traits instead of
//! looking elements up itself. The browser build implements them for `web-sys`
//! types; [`MemoryElement`] and [`MemoryStorage`] serve tests and headless runs.

use crate::error::Result;
use std::collections::HashMap;

/// An element whose children can be replaced with markup.
pub trait RenderTarget {
    fn set_inner_html(&mut self, html: &str);
}

/// The document root, which carries page-wide state attributes.
pub trait DocumentRoot {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// An element that accepts inline style changes.
pub trait StyleTarget {
    fn set_style_property(&mut self, name: &str, value: &str);
}

/// Persistent string key-value storage.
pub trait PreferenceStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn set_inner_html(&mut self, html: &str) {
        (**self).set_inner_html(html);
    }
}

impl<T: DocumentRoot + ?Sized> DocumentRoot for &mut T {
    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        (**self).set_attribute(name, value);
    }
}

impl<T: StyleTarget + ?Sized> StyleTarget for &mut T {
    fn set_style_property(&mut self, name: &str, value: &str) {
        (**self).set_style_property(name, value);
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &mut T {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

/// In-memory element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryElement {
    pub inner_html: String,
    pub attributes: HashMap<String, String>,
    pub styles: HashMap<String, String>,
    /// Number of times the markup was replaced.
    pub renders: usize,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }
}

impl RenderTarget for MemoryElement {
    fn set_inner_html(&mut self, html: &str) {
        self.inner_html = html.to_string();
        self.renders += 1;
    }
}

impl DocumentRoot for MemoryElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

impl StyleTarget for MemoryElement {
    fn set_style_property(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_string(), value.to_string());
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.items.insert(key.to_string(), value.to_string());
        storage
    }
}

impl PreferenceStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
