//! String interning for lexemes and identifiers.
//!
//! Every lexeme scanned from source is stored once in an [`Interner`] and
//! referred to by a [`Symbol`] everywhere else. Environments and resolver
//! scopes key on symbols, so variable lookup never compares strings; the
//! interner is consulted only when rendering error messages and values.

use indexmap::IndexSet;

/// Index into the interner's storage.
///
/// Uses `u32` to keep tokens small. This limits a program to ~4 billion
/// distinct lexemes, which is more than sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Symbol(u32);

impl Symbol {
    /// Returns the raw index value.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Deduplicating store of every lexeme seen by the lexer.
///
/// Grows while source is scanned and is read-only afterwards. A REPL session
/// keeps one interner alive across lines so a name interned on one line
/// resolves to the same [`Symbol`] on every later line.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Interner {
    strings: IndexSet<Box<str>, ahash::RandomState>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string, returning the symbol it was already stored under
    /// or a freshly assigned one.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(index) = self.strings.get_index_of(text) {
            return Symbol(index.try_into().expect("interner index fits in u32"));
        }
        let (index, _) = self.strings.insert_full(Box::from(text));
        Symbol(index.try_into().expect("interner index fits in u32"))
    }

    /// Returns the string a symbol was interned from.
    ///
    /// # Panics
    /// Panics if the symbol was produced by a different interner.
    #[must_use]
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.strings
            .get_index(symbol.index())
            .expect("symbol from a foreign interner")
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
