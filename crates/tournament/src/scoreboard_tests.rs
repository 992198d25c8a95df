use super::*;
use std::sync::Arc;
use std::thread;

fn assert_antisymmetric(snapshot: &ScoreboardSnapshot) {
    for (team, opponents) in &snapshot.records {
        for (opponent, record) in opponents {
            let mirror = snapshot.records[opponent][team];
            assert_eq!(record.points, -mirror.points, "{team} vs {opponent}");
        }
    }
}

#[test]
fn test_add_result_updates_both_sides() {
    let scoreboard = Scoreboard::new();
    scoreboard.add_result("red", "blue", 4, ResultCode::Win, ResultCode::Lost);
    scoreboard.add_result("blue", "red", 0, ResultCode::Error, ResultCode::Error);

    let red = scoreboard.record("red", "blue").unwrap();
    let blue = scoreboard.record("blue", "red").unwrap();
    assert_eq!((red.win, red.error, red.points), (1, 1, 4));
    assert_eq!((blue.lost, blue.error, blue.points), (1, 1, -4));
    assert!(scoreboard.record("red", "green").is_none());
}

#[test]
fn test_points_stay_antisymmetric_under_concurrency() {
    let scoreboard = Arc::new(Scoreboard::new());
    let teams = ["a", "b", "c", "d"];

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let scoreboard = Arc::clone(&scoreboard);
            thread::spawn(move || {
                for i in 0..200i64 {
                    let x = teams[(worker + i as usize) % teams.len()];
                    let y = teams[(worker + 1 + 2 * i as usize) % teams.len()];
                    if x == y {
                        continue;
                    }
                    let points = (i % 7) - 3;
                    let (rx, ry) = ResultCode::from_points(points, i % 5 == 0);
                    scoreboard.add_result(x, y, points, rx, ry);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_antisymmetric(&scoreboard.snapshot());
}

#[test]
fn test_ranking_orders_by_score_then_points() {
    let scoreboard = Scoreboard::new();
    // alpha: 2 wins over gamma -> score 10, points 3
    scoreboard.add_result("alpha", "gamma", 1, ResultCode::Win, ResultCode::Lost);
    scoreboard.add_result("alpha", "gamma", 2, ResultCode::Win, ResultCode::Lost);
    // beta: 2 wins over gamma -> score 10, points 9
    scoreboard.add_result("beta", "gamma", 4, ResultCode::Win, ResultCode::Lost);
    scoreboard.add_result("beta", "gamma", 5, ResultCode::Win, ResultCode::Lost);

    let ranking = scoreboard.ranking();
    let order: Vec<_> = ranking.iter().map(|(team, _)| team.as_str()).collect();
    assert_eq!(order, vec!["beta", "alpha", "gamma"]);

    let scores: Vec<_> = ranking.iter().map(|(_, r)| r.score()).collect();
    assert_eq!(scores, vec![10, 10, 4]);
    assert_eq!(ranking[2].1.points, -12);
}

#[test]
fn test_ranking_score_beats_points() {
    let scoreboard = Scoreboard::new();
    // x ties y twice (score 6 each) but loses to z by a landslide.
    scoreboard.add_result("x", "y", 0, ResultCode::Tie, ResultCode::Tie);
    scoreboard.add_result("x", "y", 0, ResultCode::Tie, ResultCode::Tie);
    scoreboard.add_result("z", "x", 30, ResultCode::Win, ResultCode::Lost);

    let ranking = scoreboard.ranking();
    let order: Vec<_> = ranking.iter().map(|(team, _)| team.as_str()).collect();
    // x: 3+3+1 = 7, y: 6, z: 5 (despite +30 points)
    assert_eq!(order, vec!["x", "y", "z"]);
}

#[test]
fn test_participants_and_reference_teams() {
    let scoreboard = Scoreboard::new();
    scoreboard.register_participants(
        ["zulu", "[git]baseline", "alpha"].map(String::from),
    );
    scoreboard.disqualify([("broken".to_string(), Disqualification::NoCreateTeam)]);

    assert_eq!(scoreboard.participants(), vec!["[git]baseline", "alpha", "zulu"]);
    assert_eq!(scoreboard.competing_participants("[git]"), vec!["alpha", "zulu"]);
    assert_eq!(scoreboard.competing_participants("").len(), 3);
    assert_eq!(
        scoreboard.disqualified().get("broken"),
        Some(&Disqualification::NoCreateTeam)
    );
}

#[test]
fn test_add_outcome_uses_home_perspective() {
    let scoreboard = Scoreboard::new();
    scoreboard.add_outcome(&GameOutcome {
        home: "h".to_string(),
        away: "a".to_string(),
        points: -2,
        home_result: ResultCode::Lost,
        away_result: ResultCode::Win,
    });

    assert_eq!(scoreboard.record("a", "h").unwrap().points, 2);
    assert_eq!(scoreboard.record("a", "h").unwrap().win, 1);
}
