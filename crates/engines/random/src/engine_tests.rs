use super::*;
use arena_core::{DisplayKind, GameState, TeamFactory};
use std::path::Path;

use crate::RandomTeam;

struct Crasher;

impl Agent for Crasher {
    fn register_initial_state(&mut self, _state: &GameState) {}

    fn choose_action(&mut self, _state: &GameState) -> Action {
        panic!("crasher always crashes");
    }
}

struct Sleeper;

impl Agent for Sleeper {
    fn register_initial_state(&mut self, _state: &GameState) {}

    fn choose_action(&mut self, _state: &GameState) -> Action {
        std::thread::sleep(Duration::from_millis(30));
        Action::Stop
    }
}

fn random_agents() -> Vec<Box<dyn Agent>> {
    let args = arena_core::AgentArgs::parse("seed=3");
    let home = RandomTeam.create_team(0, 2, true, &args).unwrap().unwrap();
    let away = RandomTeam.create_team(1, 3, false, &args).unwrap().unwrap();
    home.into_iter()
        .zip(away)
        .flat_map(|(h, a)| [h, a])
        .collect()
}

fn setup(agents: Vec<Box<dyn Agent>>, num_games: u32, dir: &Path) -> MatchSetup {
    MatchSetup {
        layouts: vec![LayoutSpec::Random { seed: Some(1) }; num_games as usize],
        agents,
        display: DisplayKind::Quiet,
        length: 40,
        num_games,
        record: true,
        num_training: 0,
        home_name: "home".to_string(),
        away_name: "away".to_string(),
        mute_agents: true,
        catch_exceptions: true,
        seed: Some(188),
        artifact_dir: dir.to_path_buf(),
    }
}

#[test]
fn plays_requested_number_of_games_and_records_replays() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RandomGameEngine::with_move_budget(None);

    let records = engine.run_games(setup(random_agents(), 3, dir.path())).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.is_irregular()));
    for game_no in 0..3 {
        assert!(dir.path().join(format!("replay-{game_no}")).exists());
    }
}

#[test]
fn training_games_are_neither_recorded_nor_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut match_setup = setup(random_agents(), 3, dir.path());
    match_setup.num_training = 2;

    let records = RandomGameEngine::new().run_games(match_setup).unwrap();

    assert_eq!(records.len(), 1);
    assert!(!dir.path().join("replay-0").exists());
    assert!(!dir.path().join("replay-1").exists());
    assert!(dir.path().join("replay-2").exists());
}

#[test]
fn crashing_agent_forfeits() {
    let dir = tempfile::tempdir().unwrap();
    let mut agents = random_agents();
    agents[1] = Box::new(Crasher);

    let records = RandomGameEngine::new()
        .run_games(setup(agents, 1, dir.path()))
        .unwrap();

    assert!(records[0].agent_crashed);
    assert_eq!(records[0].score, 1);
}

#[test]
fn slow_agent_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let mut agents = random_agents();
    agents[0] = Box::new(Sleeper);

    let records = RandomGameEngine::with_move_budget(Some(Duration::from_millis(5)))
        .run_games(setup(agents, 1, dir.path()))
        .unwrap();

    assert!(records[0].agent_timeout);
    assert_eq!(records[0].score, -1);
}

#[test]
fn rejects_wrong_agent_count() {
    let dir = tempfile::tempdir().unwrap();
    let mut agents = random_agents();
    agents.pop();

    let err = RandomGameEngine::new()
        .run_games(setup(agents, 1, dir.path()))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::AgentCount {
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn fixed_seed_replays_the_same_scores() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let engine = RandomGameEngine::with_move_budget(None);

    let first = engine
        .run_games(setup(random_agents(), 2, first_dir.path()))
        .unwrap();
    let second = engine
        .run_games(setup(random_agents(), 2, second_dir.path()))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn all_training_returns_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut match_setup = setup(random_agents(), 2, dir.path());
    match_setup.num_training = 2;

    let records = RandomGameEngine::with_move_budget(None)
        .run_games(match_setup)
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
