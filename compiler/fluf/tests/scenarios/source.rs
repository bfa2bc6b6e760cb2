//! Source manager scenarios.

use fluf::{FileId, SourceManager};
use pretty_assertions::assert_eq;

fn at(sm: &SourceManager, offset: u32) -> Option<(String, u32, u32)> {
    sm.lookup(offset)
        .map(|loc| (loc.name.to_string(), loc.line, loc.column))
}

fn loc(name: &str, line: u32, column: u32) -> Option<(String, u32, u32)> {
    Some((name.to_owned(), line, column))
}

#[test]
fn single_file_positions() {
    fluf::init_tracing();
    let mut sm = SourceManager::new();
    sm.add("a.f", "hello\nworld").unwrap();

    assert_eq!(at(&sm, 0), loc("a.f", 1, 1));
    assert_eq!(at(&sm, 5), loc("a.f", 1, 6));
    assert_eq!(at(&sm, 6), loc("a.f", 2, 1));
    assert_eq!(at(&sm, 10), loc("a.f", 2, 5));
    assert_eq!(at(&sm, 11), loc("a.f", 2, 6));
    assert_eq!(at(&sm, 12), None);
}

#[test]
fn two_files_back_to_back() {
    let mut sm = SourceManager::new();
    sm.add("a", "ab").unwrap();
    sm.add("b", "cd").unwrap();

    assert_eq!(at(&sm, 2), loc("a", 1, 3));
    assert_eq!(at(&sm, 3), loc("b", 1, 1));
    assert_eq!(at(&sm, 4), loc("b", 1, 2));
    assert_eq!(at(&sm, 6), None);
    assert_eq!(sm.total_size(), 6);
}

#[test]
fn recovers_line_text() {
    let mut sm = SourceManager::new();
    sm.add("x", "foo\nbar\nbaz").unwrap();

    assert_eq!(sm.line_content(4), b"bar");
    assert_eq!(sm.line_content(0), b"foo");
    assert_eq!(sm.line_content(8), b"baz");
}

#[test]
fn boundary_files() {
    let mut sm = SourceManager::new();
    let empty = sm.add("empty", "").unwrap();
    let newline = sm.add("newline", "\n").unwrap();
    let open = sm.add("open", "no newline").unwrap();
    let nul = sm.add("nul", b"a\0b\n".as_slice()).unwrap();

    assert_eq!(sm.file(empty).line_count(), 1);
    assert_eq!(sm.file(newline).line_count(), 2);
    assert_eq!(sm.file(open).line_count(), 1);

    let open_base = sm.file(open).base_offset();
    assert_eq!(sm.line_content(open_base + 3), b"no newline");

    let nul_file = sm.file(nul);
    assert_eq!(nul_file.content_with_nul(), b"a\0b\n\0");
    assert_eq!(sm.line_content(nul_file.base_offset() + 2), b"a\0b");
    assert_eq!(at(&sm, nul_file.base_offset() + 2), loc("nul", 1, 3));
    assert_eq!(sm.file_for_offset(nul_file.base_offset()), Some(FileId::from_raw(3)));
}

#[test]
fn many_files_resolve_to_the_right_one() {
    let mut sm = SourceManager::new();
    let mut ids = Vec::new();
    for i in 0..200 {
        let content = "x\n".repeat(i % 7);
        ids.push(sm.add(format!("file{i}.f"), content).unwrap());
    }
    for &id in &ids {
        let file = sm.file(id);
        let location = sm.lookup(file.base_offset()).unwrap();
        assert_eq!(location.file, id);
        assert_eq!((location.line, location.column), (1, 1));
        let end = sm.lookup(file.end_offset()).unwrap();
        assert_eq!(end.file, id);
    }
}
