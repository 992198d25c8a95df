use super::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use arena_core::{AgentArgs, Team};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn no_team(_: usize, _: usize, _: bool, _: &AgentArgs) -> anyhow::Result<Option<Team>> {
    Ok(None)
}

fn participants(n: usize) -> BTreeMap<String, Participant> {
    (0..n)
        .map(|i| {
            let name = format!("team{i:02}");
            let participant = Participant {
                name: name.clone(),
                factory: Arc::new(no_team),
            };
            (name, participant)
        })
        .collect()
}

fn drain(queue: &PairingQueue) -> Vec<Pairing> {
    std::iter::from_fn(|| queue.next(Duration::from_millis(10))).collect()
}

#[test]
fn test_every_pair_exactly_once() {
    for n in [2usize, 3, 5, 8] {
        let queue = make_pairings(&participants(n), &mut StdRng::seed_from_u64(1));
        assert_eq!(queue.total(), n * (n - 1) / 2);
        assert_eq!(queue.len(), queue.total());

        let pairings = drain(&queue);
        assert_eq!(pairings.len(), n * (n - 1) / 2);

        let mut appearances: HashMap<String, usize> = HashMap::new();
        let mut seen = BTreeSet::new();
        for pairing in &pairings {
            assert_ne!(pairing.home.name, pairing.away.name);
            let key = if pairing.home.name < pairing.away.name {
                (pairing.home.name.clone(), pairing.away.name.clone())
            } else {
                (pairing.away.name.clone(), pairing.home.name.clone())
            };
            assert!(seen.insert(key), "duplicate pairing");
            *appearances.entry(pairing.home.name.clone()).or_default() += 1;
            *appearances.entry(pairing.away.name.clone()).or_default() += 1;
        }
        assert_eq!(appearances.len(), n);
        assert!(appearances.values().all(|&count| count == n - 1));
    }
}

#[test]
fn test_too_few_participants_schedule_nothing() {
    for n in [0, 1] {
        let queue = make_pairings(&participants(n), &mut StdRng::seed_from_u64(1));
        assert_eq!(queue.total(), 0);
        assert!(queue.is_empty());
        assert!(queue.next(Duration::from_millis(10)).is_none());
    }
}

#[test]
fn test_home_side_is_randomized() {
    let field = participants(2);
    let mut rng = StdRng::seed_from_u64(42);
    let homes: BTreeSet<String> = (0..64)
        .map(|_| drain(&make_pairings(&field, &mut rng))[0].home.name.clone())
        .collect();
    assert_eq!(homes.len(), 2);
}

#[test]
fn test_pairings_are_taken_at_most_once() {
    let queue = make_pairings(&participants(6), &mut StdRng::seed_from_u64(7));
    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            std::thread::spawn(move || {
                drain(&queue)
                    .into_iter()
                    .map(|p| p.match_no)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut taken: Vec<usize> = consumers
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    taken.sort_unstable();
    assert_eq!(taken, (1..=15).collect::<Vec<_>>());
}
