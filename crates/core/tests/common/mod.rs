//! DSL macros for building test traces.
//!
//! Produces `Vec<ExecutionRecord<&'static str, u64>>`, every record owned by
//! process [`PID`].
//!
//! # Syntax
//!
//! ```ignore
//! trace! {
//!     w(0, 10; f1, f2),   // write f1 and f2 during [0, 10]
//!     r(5, 15; f1),       // read f1 during [5, 15]
//!     n(3, 4; f3),        // touch f3 without reading or writing
//!     w(20, 30),          // no resources
//! }
//! ```

/// Process id of every record built by the macros.
pub const PID: u64 = 1;

/// Build a single `ExecutionRecord`.
#[macro_export]
macro_rules! rec {
    (w($start:expr, $end:expr $(; $($res:ident),* $(,)?)?)) => {
        tracecop_core::trace::types::ExecutionRecord::<&'static str, u64>::write(
            $crate::common::PID,
            $start,
            $end,
            vec![$($(stringify!($res)),*)?],
        )
    };
    (r($start:expr, $end:expr $(; $($res:ident),* $(,)?)?)) => {
        tracecop_core::trace::types::ExecutionRecord::<&'static str, u64>::read(
            $crate::common::PID,
            $start,
            $end,
            vec![$($(stringify!($res)),*)?],
        )
    };
    (n($start:expr, $end:expr $(; $($res:ident),* $(,)?)?)) => {
        tracecop_core::trace::types::ExecutionRecord::<&'static str, u64>::idle(
            $crate::common::PID,
            $start,
            $end,
            vec![$($(stringify!($res)),*)?],
        )
    };
}

/// Build a full trace from record blocks.
#[macro_export]
macro_rules! trace {
    () => {
        Vec::<tracecop_core::trace::types::ExecutionRecord<&'static str, u64>>::new()
    };
    ($($mode:ident($($args:tt)*)),* $(,)?) => {
        vec![
            $($crate::rec!($mode($($args)*))),*
        ]
    };
}
