//! Stack growth for the recursive evaluator.
//!
//! Evaluation recurses once per nested form and once per non-tail call, so a
//! deep but legitimate recursion would overflow a fixed thread stack long
//! before `MAX_EVAL_DEPTH` is reached. `stacker` moves evaluation onto a fresh
//! heap-allocated segment whenever the current one runs low.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
