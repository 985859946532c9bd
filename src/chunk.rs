//! # Chunk Catalog
//!
//! Static registry of named pitch-class sets ("chunks"): triads, pentatonics
//! and scales. A chunk is a set of semitone offsets from whatever root a rule
//! later binds it to. Only membership matters, so offsets are folded modulo 12
//! and duplicates collapse.
//!
//! The catalog is fixed for the life of the process. Adding a chunk kind means
//! editing [`ChunkCatalog::builtin`].
//!
//! ## Example
//! ```rust
//! use fretboard::chunk::ChunkCatalog;
//! use fretboard::pitch::pitch_class_of;
//!
//! let catalog = ChunkCatalog::builtin();
//! let triad = catalog.chunk_by_id(1).unwrap();
//! assert_eq!(triad.name(), "Maj Triad");
//! assert!(triad.contains(pitch_class_of(4)));
//! assert!(!triad.contains(pitch_class_of(3)));
//! ```

use crate::pitch::{pitch_class_of, PitchClass};
use serde::Serialize;

/// A named set of pitch-class offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    id: u32,
    name: String,
    #[serde(serialize_with = "serialize_mask")]
    intervals: u16,
}

impl Chunk {
    pub fn new(id: u32, name: impl Into<String>, intervals: &[i32]) -> Self {
        let intervals = intervals
            .iter()
            .fold(0u16, |mask, &i| mask | 1u16 << pitch_class_of(i).value());
        Self {
            id,
            name: name.into(),
            intervals,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, offset: PitchClass) -> bool {
        self.intervals & (1u16 << offset.value()) != 0
    }

    /// Offsets in ascending order, without duplicates
    pub fn intervals(&self) -> Vec<u8> {
        mask_offsets(self.intervals)
    }
}

fn mask_offsets(mask: u16) -> Vec<u8> {
    (0..12u8).filter(|i| mask & (1u16 << *i) != 0).collect()
}

fn serialize_mask<S: serde::Serializer>(mask: &u16, serializer: S) -> Result<S::Ok, S::Error> {
    mask_offsets(*mask).serialize(serializer)
}

/// Ordered, read-only collection of chunks
#[derive(Debug, Clone)]
pub struct ChunkCatalog {
    chunks: Vec<Chunk>,
}

impl ChunkCatalog {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// The chunks every engine starts with. Ids 0-4 are stable; saved rules refer to them.
    pub fn builtin() -> Self {
        Self::new(vec![
            Chunk::new(0, "Single Note", &[0]),
            Chunk::new(1, "Maj Triad", &[0, 4, 7]),
            Chunk::new(2, "Min Triad", &[0, 3, 7]),
            Chunk::new(3, "Maj Pentatonic", &[0, 2, 4, 7, 9]),
            Chunk::new(4, "Min Pentatonic", &[0, 3, 5, 7, 10]),
            Chunk::new(5, "Major Scale", &[0, 2, 4, 5, 7, 9, 11]),
            Chunk::new(6, "Natural Minor Scale", &[0, 2, 3, 5, 7, 8, 10]),
        ])
    }

    pub fn list_chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_by_id(&self, id: u32) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by display name (used by session files).
    pub fn chunk_by_name(&self, name: &str) -> Option<&Chunk> {
        let name = name.trim();
        self.chunks.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl Default for ChunkCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_and_order() {
        let catalog = ChunkCatalog::builtin();
        let ids: Vec<u32> = catalog.list_chunks().iter().map(Chunk::id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(catalog.chunk_by_id(4).unwrap().intervals(), vec![0, 3, 5, 7, 10]);
        assert!(catalog.chunk_by_id(99).is_none());
    }

    #[test]
    fn test_intervals_fold_and_dedupe() {
        let chunk = Chunk::new(9, "Odd", &[12, 0, -1, 16, 4]);
        assert_eq!(chunk.intervals(), vec![0, 4, 11]);
        assert!(chunk.contains(pitch_class_of(11)));
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = ChunkCatalog::builtin();
        assert_eq!(catalog.chunk_by_name("min pentatonic").unwrap().id(), 4);
        assert!(catalog.chunk_by_name("Lydian").is_none());
    }

    #[test]
    fn test_serializes_intervals_as_list() {
        let chunk = Chunk::new(2, "Min Triad", &[0, 3, 7]);
        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(json, r#"{"id":2,"name":"Min Triad","intervals":[0,3,7]}"#);
    }
}
