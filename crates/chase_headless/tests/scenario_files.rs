//! Every bundled scenario file parses and passes.

use std::path::PathBuf;

use chase_core::store::MemoryScoreStore;
use chase_headless::runner::HeadlessConfig;
use chase_headless::scenario::Scenario;

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

#[test]
fn test_bundled_scenarios_pass() {
    let mut count = 0;
    for entry in std::fs::read_dir(scenarios_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("ron") {
            continue;
        }
        let scenario = Scenario::load(&path).unwrap();
        let report = scenario
            .run(MemoryScoreStore::default(), &HeadlessConfig::default())
            .unwrap();
        assert!(report.passed(), "{}: {:?}", path.display(), report.failures);
        count += 1;
    }
    assert!(count >= 2);
}

#[test]
fn test_first_steps_frames() {
    let scenario = Scenario::load(scenarios_dir().join("first_steps.ron")).unwrap();
    let report = scenario
        .run(MemoryScoreStore::default(), &HeadlessConfig::default())
        .unwrap();

    assert_eq!(report.frames.len(), 2);
    assert!(report.frames[0].starts_with("Score: 0"));
    assert!(report.frames[1].starts_with("Score: 50"));
    assert_eq!(report.now_ms, 400);
}

#[test]
fn test_early_quit_stops_the_script() {
    let scenario = Scenario::load(scenarios_dir().join("early_quit.ron")).unwrap();
    let report = scenario
        .run(MemoryScoreStore::default(), &HeadlessConfig::default())
        .unwrap();

    assert!(report.passed(), "{:?}", report.failures);
    assert_eq!(report.now_ms, 0);
}
