use std::future::Future;
use std::time::{Duration, Instant};

/// Awaits `fut` and hands back its output with the time it took.
///
/// Runs over `budget` additionally emit a `performance` warning carrying both
/// the elapsed time and the budget, inside whatever span is current.
pub async fn warn_if_slow<F, T>(label: &'static str, budget: Duration, fut: F) -> (T, Duration)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();

    if elapsed > budget {
        tracing::warn!(
            target: "performance",
            label,
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "{label} exceeded its time budget"
        );
    }

    (out, elapsed)
}
