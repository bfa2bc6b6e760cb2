//! Injected allocation failures at every allocation site.

use std::rc::Rc;

use fluf::alloc::FaultyAlloc;
use fluf::{
    AllocError, AllocHandle, Bump, BumpConfig, InternError, Interner, SourceError, SourceManager,
    StrBuf,
};
use pretty_assertions::assert_eq;

fn faulty(successes: usize) -> (Rc<FaultyAlloc>, AllocHandle) {
    let faulty = Rc::new(FaultyAlloc::fail_after(AllocHandle::system(), successes));
    let handle = AllocHandle::new(Rc::clone(&faulty));
    (faulty, handle)
}

#[test]
fn source_manager_survives_failure_at_each_site() {
    // Each file needs two allocations: the name and the content.
    for budget in 0..6 {
        let (injector, handle) = faulty(budget);
        let mut sm = SourceManager::with_alloc(handle);
        let mut added = 0u32;
        for i in 0..3 {
            match sm.add(format!("f{i}"), "line\n") {
                Ok(_) => added += 1,
                Err(SourceError::Alloc(AllocError::OutOfMemory { .. })) => break,
                Err(other) => panic!("unexpected error {other}"),
            }
        }
        assert_eq!(added as usize, budget / 2);
        assert_eq!(sm.file_count(), added as usize);
        assert_eq!(sm.total_size(), added * 6);
        assert_eq!(injector.failures(), 1);
        for file in sm.files() {
            assert_eq!(sm.line_content(file.base_offset()), b"line");
        }
    }
}

#[test]
fn interner_survives_failure() {
    let (injector, handle) = faulty(0);
    let mut interner = Interner::with_alloc(handle);
    assert!(matches!(
        interner.try_intern(b"first"),
        Err(InternError::Alloc(AllocError::OutOfMemory { .. }))
    ));
    assert!(interner.is_empty());
    assert_eq!(interner.lookup(b"first"), None);

    injector.set_budget(None);
    let sym = interner.try_intern(b"first").unwrap();
    assert_eq!(sym.raw(), 0);
}

#[test]
fn builder_survives_failure() {
    let (_injector, handle) = faulty(1);
    let mut buf = StrBuf::new(handle);
    buf.append(b"0123456789").unwrap();
    assert_eq!(
        buf.append(&[b'x'; 10]),
        Err(AllocError::OutOfMemory { size: 32, align: 1 })
    );
    assert_eq!(buf.as_bytes_with_nul(), b"0123456789\0");
}

#[test]
fn bump_limit_is_an_out_of_memory_condition() {
    let arena = Bump::with_config(
        AllocHandle::system(),
        BumpConfig::DEFAULT
            .with_initial_chunk_size(64)
            .with_limit(64),
    );
    let mut sm = SourceManager::with_alloc(AllocHandle::new(arena));
    sm.add("a", "x".repeat(40)).unwrap();
    assert!(matches!(
        sm.add("b", "y".repeat(40)),
        Err(SourceError::Alloc(AllocError::LimitExceeded { .. }))
    ));
    assert_eq!(sm.file_count(), 1);
}
