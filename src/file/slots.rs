use crate::stream::StreamId;

/// Keyed, ordered list of the streams of one type in a file
///
/// Streams are looked up by key (`video_stream(n)`) but built in insertion
/// order. Positional queries compact the keys to `0..len` first, so a key
/// always equals the position once the stream number has been read.
#[derive(Debug, Clone, Default)]
pub(crate) struct StreamSlots {
    entries: Vec<(usize, StreamId)>,
    next_key: usize,
}

impl StreamSlots {
    /// Stream stored under `key`
    pub(crate) fn get(&self, key: usize) -> Option<StreamId> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, id)| *id)
    }

    /// Store a stream under an explicit key, at the end of the order
    pub(crate) fn insert(&mut self, key: usize, id: StreamId) {
        self.entries.push((key, id));
        self.next_key = self.next_key.max(key + 1);
    }

    /// Append a stream under the next free key
    pub(crate) fn push(&mut self, id: StreamId) {
        let key = self.next_key;
        self.insert(key, id);
    }

    /// Renumber keys to match positions
    pub(crate) fn compact(&mut self) {
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.0 = position;
        }
        self.next_key = self.entries.len();
    }

    /// Current position of a stream, by identity
    pub(crate) fn position(&self, id: StreamId) -> Option<usize> {
        self.entries.iter().position(|(_, s)| *s == id)
    }

    /// Drop a stream; absent streams are ignored
    pub(crate) fn remove(&mut self, id: StreamId) {
        self.entries.retain(|(_, s)| *s != id);
    }

    /// Move the entry at `from` to `to` (clamped to the end), renumbering keys
    pub(crate) fn relocate(&mut self, from: usize, to: usize) {
        let entry = self.entries.remove(from);
        let to = to.min(self.entries.len());
        self.entries.insert(to, entry);
        self.compact();
    }

    /// Stream ids in build order
    pub(crate) fn ids(&self) -> Vec<StreamId> {
        self.entries.iter().map(|(_, id)| *id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_key_compacts_to_position() {
        let mut slots = StreamSlots::default();
        slots.insert(2, StreamId(7));
        assert_eq!(slots.get(2), Some(StreamId(7)));
        assert_eq!(slots.position(StreamId(7)), Some(0));

        slots.compact();
        assert_eq!(slots.get(0), Some(StreamId(7)));
        assert_eq!(slots.get(2), None);
    }

    #[test]
    fn test_removal_keeps_next_key() {
        let mut slots = StreamSlots::default();
        slots.push(StreamId(0));
        slots.push(StreamId(1));
        slots.remove(StreamId(1));
        slots.push(StreamId(2));

        assert_eq!(slots.get(2), Some(StreamId(2)));
        assert_eq!(slots.position(StreamId(2)), Some(1));
        assert_eq!(slots.get(1), None);
    }

    #[test]
    fn test_relocate_clamps_to_end() {
        let mut slots = StreamSlots::default();
        for n in 0..3 {
            slots.push(StreamId(n));
        }

        slots.relocate(0, 10);
        assert_eq!(slots.ids(), vec![StreamId(1), StreamId(2), StreamId(0)]);

        slots.relocate(2, 0);
        assert_eq!(slots.ids(), vec![StreamId(0), StreamId(1), StreamId(2)]);
    }
}
