use std::time::Duration;

use primebench::{
    BenchOutcome, Candidate, Control, RuntimeConfig, Session, chart::LineStyle,
    primes::{IncrementalSieve, eratosthenes},
};

fn session(dir: &std::path::Path, incremental: bool) -> Session {
    let mut session = Session::with_overhead(
        RuntimeConfig {
            repeats: 1,
            incremental,
        },
        dir,
        Duration::ZERO,
    );
    session.set_time_budget(Duration::from_millis(3));
    session.set_warmup_index(50);
    session
}

#[test]
fn test_clear_then_run_has_single_series_and_no_references() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path(), false);
    session
        .benchmark(&Candidate::sized("eratosthenes", eratosthenes))
        .unwrap();
    session.control(Control::ClearAll).unwrap();
    session
        .benchmark(&Candidate::unbounded("f", IncrementalSieve::new))
        .unwrap();
    assert_eq!(session.state().store().names(), vec!["f"]);
    let plan = session.last_plan().unwrap();
    assert!(plan.references.is_empty());
    assert_eq!(plan.current.name, "f");
}

#[test]
fn test_earlier_candidates_become_dashed_references() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path(), true);
    session
        .benchmark(&Candidate::sized("a", eratosthenes))
        .unwrap();
    session
        .benchmark(&Candidate::unbounded("b", IncrementalSieve::new))
        .unwrap();
    let plan = session.last_plan().unwrap();
    assert_eq!(plan.references.len(), 1);
    assert_eq!(plan.references[0].name, "a");
    assert_eq!(plan.references[0].style, LineStyle::Dashed);
    assert_eq!(plan.current.color_index, 1);
    assert!(dir.path().join("loglog.svg").exists());
}

#[test]
fn test_rerun_replaces_series_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path(), false);
    session
        .benchmark(&Candidate::sized("a", eratosthenes))
        .unwrap();
    session
        .benchmark(&Candidate::unbounded("b", IncrementalSieve::new))
        .unwrap();
    session
        .benchmark(&Candidate::sized("a", eratosthenes))
        .unwrap();
    assert_eq!(session.state().store().names(), vec!["a", "b"]);
    assert_eq!(session.last_plan().unwrap().current.color_index, 0);
}

#[test]
fn test_repeat_control_reaches_sampler() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path(), false);
    session.control(Control::SetRepeats(4)).unwrap();
    session.control(Control::SetIncremental(true)).unwrap();
    assert_eq!(session.sampler_config().repeats, 4);
    assert!(session.state().incremental());
}

#[test]
fn test_wrong_candidate_skipped_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session(dir.path(), false);
    let odds = Candidate::unbounded("odds", || (1u64..).map(|n| 2 * n + 1));
    let outcome = session.benchmark(&odds).unwrap();
    assert!(matches!(outcome, BenchOutcome::Skipped(_)));
    assert!(session.last_plan().is_none());
}
