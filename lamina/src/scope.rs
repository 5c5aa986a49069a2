//! Element keys and scope tokens.

/// A user-supplied element identifier: key text plus a numeric offset that
/// disambiguates repeated keys without per-frame string formatting.
///
/// The key is hashed by the engine together with a seed from the currently
/// open parent, so the same key under different parents yields different
/// identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementKey<'a> {
    pub text: &'a str,
    pub offset: u32,
}

impl<'a> ElementKey<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    pub fn with_offset(text: &'a str, offset: u32) -> Self {
        Self { text, offset }
    }
}

impl<'a> From<&'a str> for ElementKey<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

/// Handle to one opened element within a layout pass.
///
/// Scopes are plain tokens, not guards: the session validates on every call
/// that a token belongs to the current pass and that the addressed element
/// is in a legal state. Tokens from an earlier pass are stale and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementScope {
    pub(crate) index: u32,
    pub(crate) epoch: u64,
}

/// Element lifecycle within a pass.
///
/// `configure` is only legal before posting; children may only open under a
/// posted parent; closing is idempotent once closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementState {
    Configuring,
    Posted,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_str_has_zero_offset() {
        let key: ElementKey = "sidebar".into();
        assert_eq!(key.text, "sidebar");
        assert_eq!(key.offset, 0);
    }

    #[test]
    fn key_with_offset() {
        let key = ElementKey::with_offset("row", 3);
        assert_eq!(key.offset, 3);
        assert_ne!(key, ElementKey::new("row"));
    }
}
