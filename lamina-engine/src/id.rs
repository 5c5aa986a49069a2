//! Stable element identities.
//!
//! The engine owns the hashing scheme; callers never compute identities
//! themselves. An identity is derived from a caller-supplied key string, an
//! optional numeric offset (to disambiguate repeated keys without per-frame
//! string formatting), and a seed taken from the currently open parent
//! element. The same triple always hashes to the same identity, which is
//! what makes ids stable across frames.

use serde::{Deserialize, Serialize};

/// A resolved element identity.
///
/// `id` is the final identity including the offset; `base_id` is the identity
/// the same key would have at offset zero, so tooling can group repeated
/// elements. `source` keeps the original key text for debug display only and
/// takes no part in equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementId {
    pub id: u32,
    pub offset: u32,
    pub base_id: u32,
    pub source: String,
}

impl PartialEq for ElementId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ElementId {}

/// Hash a key string with an offset and parent seed into an identity.
///
/// Add/shift/xor avalanche over the key bytes, then a second round folding
/// in the offset. The offset-free intermediate becomes `base_id`.
pub fn hash_element_key(key: &str, offset: u32, seed: u32) -> ElementId {
    let mut base: u32 = seed;
    for b in key.bytes() {
        base = base.wrapping_add(b as u32);
        base = base.wrapping_add(base << 10);
        base ^= base >> 6;
    }

    let mut hash = base.wrapping_add(offset);
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;

    hash = hash.wrapping_add(hash << 3);
    base = base.wrapping_add(base << 3);
    hash ^= hash >> 11;
    base ^= base >> 11;
    hash = hash.wrapping_add(hash << 15);
    base = base.wrapping_add(base << 15);

    // +1 reserves 0 as the "no element" sentinel
    ElementId {
        id: hash.wrapping_add(1),
        offset,
        base_id: base.wrapping_add(1),
        source: key.to_string(),
    }
}

/// Engine-assigned identity for an anonymous element.
///
/// Mixes a per-frame ordinal with the parent seed so anonymous siblings stay
/// distinct and stable for a given tree shape.
pub fn hash_ordinal(ordinal: u32, seed: u32) -> ElementId {
    let mut hash = seed;
    hash = hash.wrapping_add(ordinal.wrapping_add(48));
    hash = hash.wrapping_add(hash << 10);
    hash ^= hash >> 6;
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    ElementId {
        id: hash.wrapping_add(1),
        offset: ordinal,
        base_id: seed,
        source: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_are_stable() {
        let a = hash_element_key("sidebar", 0, 0);
        let b = hash_element_key("sidebar", 0, 0);
        assert_eq!(a, b);
        assert_eq!(a.base_id, b.base_id);
    }

    #[test]
    fn different_keys_produce_different_ids() {
        assert_ne!(hash_element_key("a", 0, 0), hash_element_key("b", 0, 0));
    }

    #[test]
    fn different_offsets_produce_different_ids() {
        let a = hash_element_key("row", 0, 0);
        let b = hash_element_key("row", 1, 0);
        assert_ne!(a, b);
        // Offset does not change the base identity
        assert_eq!(a.base_id, b.base_id);
    }

    #[test]
    fn seed_scopes_identities_to_parent() {
        let under_a = hash_element_key("item", 0, 17);
        let under_b = hash_element_key("item", 0, 99);
        assert_ne!(under_a, under_b);
    }

    #[test]
    fn zero_is_never_produced() {
        // 0 is the "no element" sentinel; the empty key at seed 0 must not map to it
        assert_ne!(hash_element_key("", 0, 0).id, 0);
        assert_ne!(hash_ordinal(0, 0).id, 0);
    }

    #[test]
    fn ordinals_are_distinct_per_seed() {
        assert_ne!(hash_ordinal(0, 5), hash_ordinal(1, 5));
        assert_ne!(hash_ordinal(0, 5), hash_ordinal(0, 6));
    }

    #[test]
    fn source_text_is_kept_for_debugging() {
        let id = hash_element_key("menu-button", 3, 0);
        assert_eq!(id.source, "menu-button");
        assert_eq!(id.offset, 3);
    }
}
