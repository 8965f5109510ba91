use tracing::{Span, field};

use super::TraceId;

/// Root span for one unit of background work (a sweep, a batch, a job).
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        evicted = field::Empty
    )
}
