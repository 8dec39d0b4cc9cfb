//! Text cleaning for harvested document bodies.
//!
//! [`clean_text`] is a pure string transform applied to every fetched
//! response body before extraction. It carries no I/O and no state, so
//! the caller can run it from any worker.

mod cleanup;

/// Run the full cleanup pipeline on a raw document body.
pub fn clean_text(input: &str) -> String {
    cleanup::run_pipeline(input)
}
