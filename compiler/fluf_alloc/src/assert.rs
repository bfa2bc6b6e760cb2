//! Debug-only contract assertions.

/// Assert a contract in debug builds.
///
/// On failure, panics with
/// `Assertion Failed: (<cond>) in <module> at <file>:<line>` followed by the
/// optional formatted message. Release builds skip the check entirely; the
/// condition still has to type-check.
///
/// ```should_panic
/// # #[cfg(debug_assertions)]
/// fluf_alloc::fluf_assert!(1 + 1 == 3, "math is {}", "broken");
/// # #[cfg(not(debug_assertions))]
/// # panic!();
/// ```
#[macro_export]
macro_rules! fluf_assert {
    ($cond:expr $(,)?) => {
        if cfg!(debug_assertions) && !$cond {
            panic!(
                "Assertion Failed: ({}) in {} at {}:{}",
                stringify!($cond),
                module_path!(),
                file!(),
                line!()
            );
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) && !$cond {
            panic!(
                "Assertion Failed: ({}) in {} at {}:{}: {}",
                stringify!($cond),
                module_path!(),
                file!(),
                line!(),
                format_args!($($arg)+)
            );
        }
    };
}
