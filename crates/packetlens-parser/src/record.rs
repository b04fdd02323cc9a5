//! Structured per-packet records.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One named layer of a packet dump, holding its fields in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    name: String,
    fields: Vec<(String, String)>,
}

impl Layer {
    /// Returns the layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates fields as `(key, value)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields in this layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether this layer holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some((_, v)) = self.fields.iter_mut().find(|(k, _)| k == key) {
            value.clone_into(v);
        } else {
            self.fields.push((key.to_string(), value.to_string()));
        }
    }
}

/// Structured result of parsing one dump unit: ordered layers of ordered
/// fields.
///
/// Layer order reflects the order headers appeared in the dump; field order
/// within a layer is insertion order. Repeated headers for the same layer
/// name merge into the existing layer rather than discarding prior fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketRecord {
    layers: Vec<Layer>,
}

impl PacketRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a layer with the given name exists, creating it on first
    /// occurrence. Returns whether the layer was newly created.
    pub fn open_layer(&mut self, name: &str) -> bool {
        if self.layers.iter().any(|l| l.name == name) {
            return false;
        }
        self.layers.push(Layer {
            name: name.to_string(),
            fields: Vec::new(),
        });
        true
    }

    /// Sets a field on a previously opened layer, overwriting any prior
    /// value for that key. Returns `false` (and drops the field) when the
    /// layer has never been opened.
    pub fn set_field(&mut self, layer: &str, key: &str, value: &str) -> bool {
        let Some(target) = self.layers.iter_mut().find(|l| l.name == layer) else {
            return false;
        };
        target.set(key, value);
        true
    }

    /// Returns a layer by name, if present.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Iterates layers in first-seen order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Number of layers in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the record holds no layers. A record with zero layers is
    /// invalid and must not be emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Serialize for PacketRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.layers.len()))?;
        for layer in &self.layers {
            map.serialize_entry(&layer.name, &LayerFields(layer))?;
        }
        map.end()
    }
}

struct LayerFields<'a>(&'a Layer);

impl Serialize for LayerFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.fields.len()))?;
        for (key, value) in &self.0.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
