//! Logging shims: forward to the `log` crate when the `log` feature is
//! enabled, compile to nothing otherwise.

#[cfg(feature = "log")]
#[allow(unused)]
#[macro_use]
mod shims {
    macro_rules! trace {
        ($($args:tt)*) => { ::log::trace!($($args)*) }
    }

    macro_rules! debug {
        ($($args:tt)*) => { ::log::debug!($($args)*) }
    }
}

#[cfg(not(feature = "log"))]
#[allow(unused)]
#[macro_use]
mod shims {
    // The disabled forms still typecheck their format arguments so that
    // builds with and without the feature accept the same code.
    macro_rules! trace {
        ($($args:tt)*) => {{
            if false {
                let _ = format_args!($($args)*);
            }
        }}
    }

    macro_rules! debug {
        ($($args:tt)*) => {{
            if false {
                let _ = format_args!($($args)*);
            }
        }}
    }
}
