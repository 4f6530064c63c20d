//! Signature-tag interner
//!
//! Overload variants and parametric-field contexts are identified by small
//! interned tokens rather than by the original string hints. Dispatch compares
//! tokens by value; the text survives only for diagnostics and the wire format.

use rustc_hash::FxHashMap;

/// Interned token identifying one overload variant or declaring-type context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureTag(u32);

/// Bidirectional string-to-token table.
#[derive(Debug, Default)]
pub struct TagInterner {
    texts: Vec<String>,
    ids: FxHashMap<String, u32>,
}

impl TagInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a tag string, returning the existing token if already present.
    pub fn intern(&mut self, text: &str) -> SignatureTag {
        if let Some(&id) = self.ids.get(text) {
            return SignatureTag(id);
        }
        let id = self.texts.len() as u32;
        self.texts.push(text.to_string());
        self.ids.insert(text.to_string(), id);
        SignatureTag(id)
    }

    /// Resolve a token back to its text.
    pub fn resolve(&self, tag: SignatureTag) -> &str {
        &self.texts[tag.0 as usize]
    }
}
