use std::time::Duration;

use criterion::Criterion;

/// Criterion configuration shared by the weight vector benchmarks.
///
/// The measured kernels run in micro- to milliseconds, so a 5s window
/// already yields tight intervals.
pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5))
        .sample_size(20)
}
