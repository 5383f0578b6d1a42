use std::collections::HashMap;

use bytemuck::Pod;

use crate::dim::DomainValue;
use crate::error::TilerError;
use crate::shape::Domain;

/* ========================= Attribute ========================= */

/// Attribute description as far as tiling is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    cell_size: u64,
    fill_value: Vec<u8>,
    var_size: bool,
}

impl Attribute {
    /// Fixed-size attribute of `cell_size` bytes, filled with zeros.
    ///
    /// # Panics
    /// Panics if `cell_size == 0`
    pub fn fixed(name: impl Into<String>, cell_size: u64) -> Self {
        assert!(cell_size > 0, "Attribute cell size must be positive");
        Self {
            name: name.into(),
            cell_size,
            fill_value: vec![0; cell_size as usize],
            var_size: false,
        }
    }

    /// Fixed-size attribute holding `cell_val_num` values of `V` per cell,
    /// each filled with `fill`.
    pub fn typed<V: Pod>(name: impl Into<String>, cell_val_num: u64, fill: V) -> Self {
        let one = bytemuck::bytes_of(&fill);
        let mut attr = Self::fixed(name, one.len() as u64 * cell_val_num);
        attr.fill_value = one.repeat(cell_val_num as usize);
        attr
    }

    /// Variable-length attribute; the fixed-size tiling path rejects these
    pub fn var(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell_size: std::mem::size_of::<u64>() as u64,
            fill_value: Vec::new(),
            var_size: true,
        }
    }

    pub fn with_fill_value(mut self, fill_value: Vec<u8>) -> Result<Self, TilerError> {
        if fill_value.len() as u64 != self.cell_size {
            return Err(TilerError::FillValueSizeMismatch {
                name: self.name,
                cell_size: self.cell_size,
                fill_size: fill_value.len() as u64,
            });
        }
        self.fill_value = fill_value;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes per cell; for var-sized attributes, the size of one offset
    pub fn cell_size(&self) -> u64 {
        self.cell_size
    }

    pub fn fill_value(&self) -> &[u8] {
        &self.fill_value
    }

    pub fn var_size(&self) -> bool {
        self.var_size
    }
}

/* ========================= Schema ========================= */

/// The slice of an array schema the tiler needs: domain and attributes
#[derive(Debug, Clone)]
pub struct ArraySchema<T> {
    domain: Domain<T>,
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl<T: DomainValue> ArraySchema<T> {
    pub fn new(domain: Domain<T>) -> Self {
        Self {
            domain,
            attributes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add an attribute; a later attribute with the same name replaces it
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        match self.index.get(attr.name()) {
            Some(&i) => self.attributes[i] = attr,
            None => {
                self.index.insert(attr.name().to_string(), self.attributes.len());
                self.attributes.push(attr);
            }
        }
        self
    }

    pub fn domain(&self) -> &Domain<T> {
        &self.domain
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

}
