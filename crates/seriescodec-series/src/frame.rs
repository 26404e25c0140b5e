use crate::error::{Result, SeriesError};
use crate::series::Series;

/// Numeric channel identifier.
pub type ChannelKey = u32;

/// Index-aligned `(channel key, Series)` pairs exchanged as one message.
///
/// Keys may repeat and insertion order is preserved. The wire codec sorts by
/// key before encoding, so order carries no meaning on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    keys: Vec<ChannelKey>,
    series: Vec<Series>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            series: Vec::with_capacity(capacity),
        }
    }

    /// Build a frame from parallel key and series vectors.
    pub fn from_parts(keys: Vec<ChannelKey>, series: Vec<Series>) -> Result<Self> {
        if keys.len() != series.len() {
            return Err(SeriesError::LengthMismatch {
                keys: keys.len(),
                series: series.len(),
            });
        }
        Ok(Self { keys, series })
    }

    /// Append a series for `key`.
    pub fn push(&mut self, key: ChannelKey, series: Series) {
        self.keys.push(key);
        self.series.push(series);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[ChannelKey] {
        &self.keys
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// First series stored under `key`.
    pub fn get(&self, key: ChannelKey) -> Option<&Series> {
        self.keys
            .iter()
            .position(|&k| k == key)
            .map(|idx| &self.series[idx])
    }

    pub fn contains(&self, key: ChannelKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChannelKey, &Series)> {
        self.keys.iter().copied().zip(self.series.iter())
    }

    /// Consume the frame into its key and series vectors.
    pub fn into_parts(self) -> (Vec<ChannelKey>, Vec<Series>) {
        (self.keys, self.series)
    }
}

impl FromIterator<(ChannelKey, Series)> for Frame {
    fn from_iter<I: IntoIterator<Item = (ChannelKey, Series)>>(iter: I) -> Self {
        let (keys, series) = iter.into_iter().unzip();
        Self { keys, series }
    }
}

impl IntoIterator for Frame {
    type Item = (ChannelKey, Series);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<ChannelKey>, std::vec::IntoIter<Series>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_insertion_order() {
        let mut frame = Frame::new();
        frame.push(2, Series::from_values(&[1u8]));
        frame.push(1, Series::from_values(&[2u8]));
        assert_eq!(frame.keys(), &[2, 1]);
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.get(1).unwrap().to_values::<u8>().unwrap(),
            vec![2]
        );
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let frame: Frame = [
            (5, Series::from_value(1u8)),
            (5, Series::from_value(2u8)),
        ]
        .into_iter()
        .collect();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(5).unwrap().to_values::<u8>().unwrap(), vec![1]);
    }

    #[test]
    fn from_parts_rejects_mismatched_lengths() {
        let err = Frame::from_parts(vec![1, 2], vec![Series::from_value(1u8)]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LengthMismatch { keys: 2, series: 1 }
        ));
    }

    #[test]
    fn into_iter_yields_pairs() {
        let frame = Frame::from_parts(vec![9], vec![Series::from_value(3u32)]).unwrap();
        assert!(frame.contains(9));
        assert!(!frame.contains(3));
        let pairs: Vec<_> = frame.into_iter().collect();
        assert_eq!(pairs[0].0, 9);
    }
}
