//! Logging shims.
//!
//! The driver logs through `defmt` or `log`, whichever feature is enabled.
//! With neither, the macros expand to nothing.

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! noop {
    ($($arg:tt)*) => {{}};
}

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, trace, warn};
    } else if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, trace, warn};
    } else {
        pub(crate) use noop as debug;
        pub(crate) use noop as trace;
        pub(crate) use noop as warn;
    }
}
