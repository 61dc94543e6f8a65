use thiserror::Error;

/// Errors surfaced by the pipeline.
///
/// Per-item failures (parallel intersections, implausible poses, unstable
/// lifts) are handled locally by skipping the affected item; only a whole
/// input that cannot seed the estimator is escalated to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The segment set reaching the estimator is empty (or became empty
    /// after minimum-length filtering).
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}
