//! Interner scenarios.

use fluf::{Interner, Symbol, SymbolLookup};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Small deterministic generator so the bulk test is reproducible.
struct XorShift(u64);

impl XorShift {
    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

#[test]
fn idempotence_and_empty_string() {
    let mut interner = Interner::new();
    let a = interner.intern(b"foo");
    let b = interner.intern(b"foo");
    let c = interner.intern(b"bar");
    assert_eq!(a, b);
    assert_ne!(a, c);

    let empty = interner.intern(b"");
    assert_eq!(interner.intern(b""), empty);
    assert_eq!(interner.resolve(empty), b"");
    assert_eq!(interner.count(), 3);
}

#[test]
fn ten_thousand_random_strings() {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut interner = Interner::new();
    let mut seen = std::collections::HashSet::new();
    let mut pairs = Vec::new();

    while pairs.len() < 10_000 {
        let len = 1 + usize::try_from(rng.next_u64() % 64).unwrap();
        let bytes: Vec<u8> = (0..len).map(|_| rng.next_u64().to_le_bytes()[0]).collect();
        if !seen.insert(bytes.clone()) {
            continue;
        }
        let sym = interner.intern(&bytes);
        pairs.push((sym, bytes));
    }

    assert_eq!(interner.count(), 10_000);
    for (sym, bytes) in &pairs {
        assert_eq!(interner.resolve(*sym), bytes.as_slice());
        assert_eq!(interner.intern(bytes), *sym);
        let with_nul = interner.resolve_with_nul(*sym);
        assert_eq!(with_nul.len(), bytes.len() + 1);
        assert_eq!(with_nul.last(), Some(&0));
    }
    assert_eq!(interner.count(), 10_000);
}

#[test]
fn lookup_trait_object_style() {
    fn describe(lookup: &impl SymbolLookup, sym: Symbol) -> String {
        String::from_utf8_lossy(lookup.resolve(sym)).into_owned()
    }

    let mut interner = Interner::new();
    let sym = interner.intern_str("identifier");
    assert_eq!(describe(&interner, sym), "identifier");
}

proptest! {
    #[test]
    fn symbols_round_trip(strings in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..64)) {
        let mut interner = Interner::new();
        for s in &strings {
            let sym = interner.intern(s);
            prop_assert_eq!(interner.resolve(sym), s.as_slice());
        }
        let distinct: std::collections::HashSet<&Vec<u8>> = strings.iter().collect();
        prop_assert_eq!(interner.count(), distinct.len());
    }
}
