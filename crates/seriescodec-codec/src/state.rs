use std::collections::BTreeMap;

use seriescodec_series::{ChannelKey, DataType};

/// Immutable snapshot of one channel schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecState {
    keys: Vec<ChannelKey>,
    data_types: BTreeMap<ChannelKey, DataType>,
    has_variable_data_types: bool,
}

impl CodecState {
    /// Build a state from parallel key and data type slices.
    ///
    /// Keys come out sorted and unique; a repeated key keeps its last data type.
    /// Unpaired trailing entries in the longer slice are ignored.
    pub fn from_schema(keys: &[ChannelKey], data_types: &[DataType]) -> Self {
        let data_types: BTreeMap<ChannelKey, DataType> = keys
            .iter()
            .copied()
            .zip(data_types.iter().copied())
            .collect();
        let has_variable_data_types = data_types.values().any(|dt| dt.is_variable());
        Self {
            keys: data_types.keys().copied().collect(),
            data_types,
            has_variable_data_types,
        }
    }

    /// Channel keys in ascending order.
    pub fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    pub fn data_type(&self, key: ChannelKey) -> Option<DataType> {
        self.data_types.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True if any channel in the schema is variable-width.
    pub fn has_variable_data_types(&self) -> bool {
        self.has_variable_data_types
    }

    /// `(key, data type)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (ChannelKey, DataType)> + '_ {
        self.data_types.iter().map(|(&k, &dt)| (k, dt))
    }
}
