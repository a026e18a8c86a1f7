//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Imperial technology level (TL)
pub type TechLevel = u32;

/// Unique identifier for one construction sequence (a weapon mount or a robot)
///
/// Sequence ids are only ever handed out by the construction engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub Uuid);

impl SequenceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SequenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_id_uniqueness() {
        let a = SequenceId::new();
        let b = SequenceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequence_id_hash() {
        use std::collections::HashMap;
        let id = SequenceId::new();
        let mut map: HashMap<SequenceId, &str> = HashMap::new();
        map.insert(id, "primary");
        assert_eq!(map.get(&id), Some(&"primary"));
    }

    #[test]
    fn test_sequence_id_serde() {
        let id = SequenceId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: SequenceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
