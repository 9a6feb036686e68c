use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonically increasing sequence for driver run identifiers.
static RUN_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_seq() -> u64 {
    RUN_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Build a run id used to correlate the log lines of one driver.
///
/// Format: `{provider}-{seq:x}`.
/// - `provider`: JobProvider::name()
/// - `seq`: per-process hex sequence
pub fn make_run_id(provider: &str) -> String {
    format!("{provider}-{seq:x}", seq = next_seq())
}

#[cfg(test)]
mod tests {
    use super::make_run_id;

    #[test]
    fn run_ids_are_unique_and_prefixed() {
        let a = make_run_id("dms");
        let b = make_run_id("dms");
        assert_ne!(a, b);
        assert!(a.starts_with("dms-"));
    }
}
