//! The components used together, the way a lexer and diagnostics would.

use fluf::str::chars::{is_ident_continue, is_ident_start};
use fluf::{AllocHandle, Bump, Interner, SourceManager, Span, StrBuf, Symbol};
use pretty_assertions::assert_eq;

/// Identifier spans in a file, found by decoding characters.
fn identifiers(sm: &SourceManager, file: fluf::FileId) -> Vec<Span> {
    let file = sm.file(file);
    let content = fluf::Str::new(file.content());
    let mut chars = content.chars();
    let mut spans = Vec::new();
    while let Some(c) = chars.peek() {
        let start = chars.offset();
        chars.next();
        if !is_ident_start(c) {
            continue;
        }
        while chars.peek().is_some_and(is_ident_continue) {
            chars.next();
        }
        let start = u32::try_from(start).unwrap() + file.base_offset();
        let end = u32::try_from(chars.offset()).unwrap() + file.base_offset();
        spans.push(Span::new(start, end));
    }
    spans
}

#[test]
fn lex_intern_and_report() {
    let mut sm = SourceManager::new();
    sm.add("prelude.f", "type Int\n").unwrap();
    let main = sm.add("main.f", "let größe = 1\nlet y = größe\n").unwrap();

    let mut interner = Interner::new();
    let symbols: Vec<(Symbol, Span)> = identifiers(&sm, main)
        .into_iter()
        .map(|span| (interner.intern(sm.span_text(span).unwrap()), span))
        .collect();

    let names: Vec<&[u8]> = symbols.iter().map(|(s, _)| interner.resolve(*s)).collect();
    assert_eq!(
        names,
        vec![
            &b"let"[..],
            "größe".as_bytes(),
            &b"let"[..],
            &b"y"[..],
            "größe".as_bytes()
        ]
    );
    // "let" and "größe" each intern once.
    assert_eq!(interner.count(), 3);
    assert_eq!(symbols[1].0, symbols[4].0);

    // Report the second use of größe.
    let (sym, span) = symbols[4];
    let location = sm.lookup(span.start).unwrap();
    let name = String::from_utf8_lossy(interner.resolve(sym));
    let mut report = StrBuf::new(AllocHandle::system());
    report
        .append_fmt(format_args!("{location}: `{name}`\n"))
        .unwrap();
    report.append(sm.line_content(span.start)).unwrap();
    assert_eq!(
        report.as_str(),
        Some("main.f:2:9: `größe`\nlet y = größe")
    );
}

#[test]
fn shared_arena_backs_interner_and_sources() {
    let arena = AllocHandle::new(Bump::new(AllocHandle::system()));
    let mut sm = SourceManager::with_alloc(arena.clone());
    let mut interner = Interner::with_alloc(arena);

    let id = sm.add("a.f", "alpha beta\nalpha").unwrap();
    let file = sm.file(id);
    let alpha = interner.intern(&file.content()[0..5]);
    let again = interner.intern(&file.content()[11..16]);
    assert_eq!(alpha, again);
    assert_eq!(interner.resolve_cstr(alpha).to_bytes(), b"alpha");
    drop(sm);
    assert_eq!(interner.resolve(alpha), b"alpha");
}
