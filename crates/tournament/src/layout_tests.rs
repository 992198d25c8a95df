use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn layouts_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("defaultCapture.lay"), "%%%%\n%1 2%\n%%%%\n").unwrap();
    fs::write(dir.path().join("tiny"), "%%\n%%\n").unwrap();
    fs::write(dir.path().join(".hidden.lay"), "%").unwrap();
    dir
}

#[test]
fn test_named_layout_is_loaded() {
    let dir = layouts_dir();
    let plan = LayoutPlan::resolve("defaultCapture", dir.path(), &mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(plan.name(), "defaultCapture");
    match &plan.layouts_for(1)[0] {
        LayoutSpec::Map { rows, .. } => assert_eq!(rows.len(), 3),
        other => panic!("unexpected layout {other:?}"),
    }
}

#[test]
fn test_layout_without_extension() {
    let dir = layouts_dir();
    let plan = LayoutPlan::resolve("tiny", dir.path(), &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(plan.name(), "tiny");
}

#[test]
fn test_seeded_random_layout() {
    let dir = layouts_dir();
    let plan = LayoutPlan::resolve("RANDOM23", dir.path(), &mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(
        plan.layouts_for(3),
        vec![LayoutSpec::Random { seed: Some(23) }; 3]
    );
}

#[test]
fn test_random_picks_a_visible_file() {
    let dir = layouts_dir();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..10 {
        let plan = LayoutPlan::resolve("RANDOM", dir.path(), &mut rng).unwrap();
        assert!(["defaultCapture", "tiny"].contains(&plan.name().as_str()));
    }
}

#[test]
fn test_missing_layout_and_bad_seed() {
    let dir = layouts_dir();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        LayoutPlan::resolve("nowhere", dir.path(), &mut rng),
        Err(TournamentError::Layout(_))
    ));
    assert!(matches!(
        LayoutPlan::resolve("RANDOMxyz", dir.path(), &mut rng),
        Err(TournamentError::Configuration { .. })
    ));
}

#[test]
fn test_default_layout_ships_with_the_workspace() {
    use crate::config::TournamentConfig;

    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let config = TournamentConfig::default();

    let plan = LayoutPlan::resolve(
        &config.layout,
        &workspace.join(&config.layouts_dir),
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();

    assert_eq!(plan.name(), "defaultCapture");
    match &plan.layouts_for(1)[0] {
        LayoutSpec::Map { rows, .. } => {
            assert!(rows.iter().all(|row| row.len() == rows[0].len()));
            for agent in ['1', '2', '3', '4'] {
                assert!(rows.iter().any(|row| row.contains(agent)), "agent {agent} missing");
            }
        }
        other => panic!("unexpected layout {other:?}"),
    }
}
