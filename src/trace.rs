//! Feature-gated tracing macros.
//!
//! With the `tracing` feature enabled this re-exports the `tracing`
//! crate's macros; without it every macro compiles to nothing, so the
//! enumeration loops carry no instrumentation overhead.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop {
    #[macro_export]
    macro_rules! __fpsemi_noop {
        ($($arg:tt)*) => {};
    }

    pub use crate::__fpsemi_noop as debug;
    pub use crate::__fpsemi_noop as info;
    pub use crate::__fpsemi_noop as trace;
    pub use crate::__fpsemi_noop as warn;
}

#[cfg(not(feature = "tracing"))]
pub use noop::{debug, info, trace, warn};
