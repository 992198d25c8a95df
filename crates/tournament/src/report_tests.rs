use super::*;
use chrono::TimeZone;

use crate::scoreboard::Scoreboard;

fn sample() -> TournamentReport {
    let scoreboard = Scoreboard::new();
    scoreboard.register_participants(["alpha".to_string(), "beta".to_string()]);
    scoreboard.disqualify([("gamma".to_string(), Disqualification::NoCreateTeam)]);
    scoreboard.add_result("alpha", "beta", 3, ResultCode::Win, ResultCode::Lost);
    scoreboard.add_result("beta", "alpha", 0, ResultCode::Tie, ResultCode::Tie);

    let started = Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let finished = Local.with_ymd_and_hms(2024, 3, 1, 12, 5, 0).unwrap();
    TournamentReport::from_snapshot(scoreboard.snapshot(), "defaultCapture", 2, started, finished)
}

#[test]
fn test_ranking_carries_scores() {
    let report = sample();

    let teams: Vec<_> = report.ranking.iter().map(|e| e.team.as_str()).collect();
    assert_eq!(teams, vec!["alpha", "beta"]);
    assert_eq!(report.ranking[0].score, 5 + 3);
    assert_eq!(report.ranking[1].score, 1 + 3);
    assert_eq!(report.ranking[1].record.points, -3);
}

#[test]
fn test_scoreboard_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let report = sample();

    let path = write_scoreboard_json(dir.path(), &report).unwrap();

    assert_eq!(path, dir.path().join(SCOREBOARD_FILE));
    assert_eq!(TournamentReport::load(&path).unwrap(), report);
}

#[test]
fn test_json_uses_result_names() {
    let report = sample();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["disqualified"]["gamma"], "NoCreateTeam");
    assert_eq!(value["records"]["alpha"]["beta"]["points"], 3);
    assert_eq!(value["ranking"][0]["team"], "alpha");
}

#[test]
fn test_text_report() {
    let text = sample().render_text();

    assert!(text.contains("=== Tournament on defaultCapture ==="));
    assert!(text.contains("Participants: alpha, beta"));
    let alpha_line = text.lines().find(|l| l.contains("alpha ")).unwrap();
    assert!(alpha_line.starts_with('1'));
    assert!(text.contains("gamma: No team factory found."));
}
