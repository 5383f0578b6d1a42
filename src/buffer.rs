use std::collections::HashMap;

use bytemuck::Pod;

/// Borrowed input buffers, one per attribute, laid out in subarray order.
///
/// The tiler only ever reads from these.
#[derive(Debug, Clone, Default)]
pub struct AttributeBuffers<'a> {
    buffers: HashMap<String, &'a [u8]>,
}

impl<'a> AttributeBuffers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw bytes for `name`, replacing any previous buffer
    pub fn insert(&mut self, name: impl Into<String>, bytes: &'a [u8]) -> &mut Self {
        self.buffers.insert(name.into(), bytes);
        self
    }

    /// Set a typed buffer for `name`
    pub fn insert_typed<V: Pod>(&mut self, name: impl Into<String>, values: &'a [V]) -> &mut Self {
        self.insert(name, bytemuck::cast_slice(values))
    }

    pub fn get(&self, name: &str) -> Option<&'a [u8]> {
        self.buffers.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a [u8])> + '_ {
        self.buffers.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
