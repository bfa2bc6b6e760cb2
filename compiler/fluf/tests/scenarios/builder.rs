//! String builder scenarios.

use fluf::{AllocHandle, Bump, StrBuf};
use pretty_assertions::assert_eq;

#[test]
fn thousand_single_byte_appends() {
    let mut buf = StrBuf::new(AllocHandle::system());
    for i in 0..1000usize {
        buf.push(b"0123456789"[i % 10]).unwrap();
        let with_nul = buf.as_bytes_with_nul();
        assert_eq!(with_nul[buf.len()], 0);
        assert_eq!(buf.len(), i + 1);
    }
    assert!(buf.capacity() > buf.len());
}

#[test]
fn formatting_diagnostics_into_an_arena() {
    let arena = AllocHandle::new(Bump::new(AllocHandle::system()));
    let mut buf = StrBuf::new(arena);
    for (line, col) in [(1, 1), (2, 5), (10, 42)] {
        buf.append_fmt(format_args!("main.f:{line}:{col}\n")).unwrap();
    }
    assert_eq!(buf.as_str(), Some("main.f:1:1\nmain.f:2:5\nmain.f:10:42\n"));
    assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
}

#[test]
fn builder_slice_splits_lines() {
    let buf = StrBuf::from_bytes(AllocHandle::system(), b"a\r\nb\nc").unwrap();
    let lines: Vec<String> = buf.as_slice().lines().map(|l| l.to_string()).collect();
    assert_eq!(lines, vec!["a", "b", "c"]);
}
