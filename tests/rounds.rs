//! Integration tests for rounds: creation, pairing, result entry and deletion.

use chess_tournament::{
    amend_result, create_round, delete_round, finish_tournament, record_result, standings,
    start_tournament, Outcome, PairingStrategy, Player, RandomPairing, RoundStatus, Tournament,
    TournamentDetails, TournamentError, TournamentStatus,
};
use chrono::NaiveDate;

fn details(max_players: usize, round_count: u32) -> TournamentDetails {
    TournamentDetails {
        name: "Open de Printemps".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
        max_players,
        round_count,
        format: "rapid".into(),
    }
}

fn player(i: u32) -> Player {
    Player::new(
        i,
        format!("Name{i}"),
        format!("Given{i}"),
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        1500 + i as i32,
    )
}

fn tournament_with_players(n: u32, round_count: u32) -> Tournament {
    let mut t = Tournament::new(0, details(16, round_count));
    for i in 1..=n {
        t.add_player(&player(i)).unwrap();
    }
    t
}

fn score(t: &Tournament, index: u32) -> f64 {
    t.get_player(index).unwrap().score()
}

#[test]
fn create_round_requires_at_least_8_players() {
    for n in 0..8 {
        let mut t = tournament_with_players(n, 4);
        let mut pairing = RandomPairing::seeded(1);
        assert_eq!(
            create_round(&mut t, &mut pairing).unwrap_err(),
            TournamentError::NotEnoughPlayers {
                enrolled: n as usize,
                required: 8
            }
        );
        assert!(t.rounds().is_empty());
    }
}

#[test]
fn create_round_stops_at_round_count() {
    let mut t = tournament_with_players(8, 3);
    let mut pairing = RandomPairing::seeded(2);
    for _ in 0..3 {
        create_round(&mut t, &mut pairing).unwrap();
    }
    for _ in 0..3 {
        assert_eq!(
            create_round(&mut t, &mut pairing).unwrap_err(),
            TournamentError::MaxRoundsReached { round_count: 3 }
        );
    }
    assert_eq!(t.rounds().len(), 3);
    let numbers: Vec<u32> = t.rounds().iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn every_player_is_paired_or_has_the_bye() {
    for n in 8..=16 {
        let mut t = tournament_with_players(n, 1);
        let mut pairing = RandomPairing::seeded(u64::from(n));
        let round = create_round(&mut t, &mut pairing).unwrap();
        assert_eq!(round.matches.len(), (n / 2) as usize);
        assert_eq!(round.bye.is_some(), n % 2 == 1);
        assert_eq!(round.status, RoundStatus::InProgress);

        let mut seen: Vec<u32> = round
            .matches
            .iter()
            .flat_map(|m| [m.white, m.black])
            .chain(round.bye)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn random_pairing_of_seven_gives_three_pairs_and_a_bye() {
    let players: Vec<Player> = (1..=7).map(player).collect();
    let pairings = RandomPairing::seeded(7).pair(&players, &[]);
    assert_eq!(pairings.pairs.len(), 3);
    let bye = pairings.bye.expect("odd field has a bye");
    assert!(pairings.pairs.iter().all(|&(w, b)| w != bye && b != bye));
}

#[test]
fn bye_player_score_is_unaffected() {
    let mut t = tournament_with_players(9, 1);
    let mut pairing = RandomPairing::seeded(9);
    let bye = create_round(&mut t, &mut pairing).unwrap().bye.unwrap();
    for position in 1..=4 {
        record_result(&mut t, 1, position, "1-0").unwrap();
    }
    assert_eq!(score(&t, bye), 0.0);
    let round = t.round(1).unwrap();
    assert!(round.is_completed());
    assert!(round.standings.iter().all(|s| s.player != bye));
}

#[test]
fn record_result_credits_the_right_players() {
    let cases = [("1-0", 1.0, 0.0), ("0-1", 0.0, 1.0), ("0.5-0.5", 0.5, 0.5)];
    for (code, white_pts, black_pts) in cases {
        let mut t = tournament_with_players(8, 1);
        create_round(&mut t, &mut RandomPairing::seeded(3)).unwrap();
        let m = t.round(1).unwrap().matches[0].clone();

        let outcome = record_result(&mut t, 1, 1, code).unwrap();
        assert_eq!(outcome.code(), code);
        assert_eq!(score(&t, m.white), white_pts);
        assert_eq!(score(&t, m.black), black_pts);
        assert_eq!(t.round(1).unwrap().matches[0].outcome, Some(outcome));
    }
}

#[test]
fn invalid_result_changes_nothing() {
    let mut t = tournament_with_players(8, 1);
    create_round(&mut t, &mut RandomPairing::seeded(4)).unwrap();
    let m = t.round(1).unwrap().matches[0].clone();

    for code in ["", "1-1", "draw", "½-½", " 1-0", "1/2-1/2"] {
        assert_eq!(
            record_result(&mut t, 1, 1, code).unwrap_err(),
            TournamentError::InvalidResult(code.to_string())
        );
    }
    assert_eq!(score(&t, m.white), 0.0);
    assert_eq!(score(&t, m.black), 0.0);
    assert_eq!(t.round(1).unwrap().matches[0].outcome, None);
}

#[test]
fn recording_twice_is_rejected() {
    let mut t = tournament_with_players(8, 1);
    create_round(&mut t, &mut RandomPairing::seeded(5)).unwrap();
    let m = t.round(1).unwrap().matches[0].clone();

    record_result(&mut t, 1, 1, "1-0").unwrap();
    assert_eq!(
        record_result(&mut t, 1, 1, "1-0").unwrap_err(),
        TournamentError::ResultAlreadyRecorded {
            round: 1,
            position: 1
        }
    );
    assert_eq!(score(&t, m.white), 1.0);
    assert_eq!(score(&t, m.black), 0.0);
}

#[test]
fn amend_reverses_the_previous_result() {
    let mut t = tournament_with_players(8, 1);
    create_round(&mut t, &mut RandomPairing::seeded(6)).unwrap();
    let m = t.round(1).unwrap().matches[0].clone();

    record_result(&mut t, 1, 1, "1-0").unwrap();
    amend_result(&mut t, 1, 1, "0-1").unwrap();
    assert_eq!(score(&t, m.white), 0.0);
    assert_eq!(score(&t, m.black), 1.0);

    amend_result(&mut t, 1, 1, "0.5-0.5").unwrap();
    assert_eq!(score(&t, m.white), 0.5);
    assert_eq!(score(&t, m.black), 0.5);
    assert_eq!(
        t.round(1).unwrap().matches[0].outcome,
        Some(Outcome::Draw)
    );
}

#[test]
fn unknown_round_or_match_is_reported() {
    let mut t = tournament_with_players(8, 2);
    create_round(&mut t, &mut RandomPairing::seeded(8)).unwrap();

    assert_eq!(
        record_result(&mut t, 2, 1, "1-0").unwrap_err(),
        TournamentError::RoundNotFound(2)
    );
    assert_eq!(
        record_result(&mut t, 0, 1, "1-0").unwrap_err(),
        TournamentError::RoundNotFound(0)
    );
    for position in [0, 5] {
        assert_eq!(
            record_result(&mut t, 1, position, "1-0").unwrap_err(),
            TournamentError::MatchNotFound { round: 1, position }
        );
    }
}

#[test]
fn round_completes_with_local_snapshot() {
    let mut t = tournament_with_players(8, 2);
    let mut pairing = RandomPairing::seeded(10);

    create_round(&mut t, &mut pairing).unwrap();
    for position in 1..=4 {
        record_result(&mut t, 1, position, "1-0").unwrap();
    }
    create_round(&mut t, &mut pairing).unwrap();
    for position in 1..=3 {
        record_result(&mut t, 2, position, "0.5-0.5").unwrap();
    }
    assert_eq!(t.round(2).unwrap().status, RoundStatus::InProgress);
    assert!(t.round(2).unwrap().standings.is_empty());

    record_result(&mut t, 2, 4, "0.5-0.5").unwrap();
    let round = t.round(2).unwrap();
    assert_eq!(round.status, RoundStatus::Completed);
    // Only this round's draws count, not round 1's wins.
    assert_eq!(round.standings.len(), 8);
    assert!(round.standings.iter().all(|s| s.points == 0.5));
    // Ties keep first-appearance order.
    let order: Vec<u32> = round
        .matches
        .iter()
        .flat_map(|m| [m.white, m.black])
        .collect();
    let snapshot: Vec<u32> = round.standings.iter().map(|s| s.player).collect();
    assert_eq!(snapshot, order);
}

#[test]
fn amending_a_completed_round_refreshes_its_snapshot() {
    let mut t = tournament_with_players(8, 1);
    create_round(&mut t, &mut RandomPairing::seeded(11)).unwrap();
    for position in 1..=4 {
        record_result(&mut t, 1, position, "1-0").unwrap();
    }
    let black = t.round(1).unwrap().matches[3].black;
    amend_result(&mut t, 1, 4, "0-1").unwrap();

    let snapshot = &t.round(1).unwrap().standings;
    let entry = snapshot.iter().find(|s| s.player == black).unwrap();
    assert_eq!(entry.points, 1.0);
    assert_eq!(snapshot.iter().filter(|s| s.points == 1.0).count(), 4);
}

#[test]
fn eight_player_round_standings() {
    let mut t = tournament_with_players(8, 5);
    let round = create_round(&mut t, &mut RandomPairing::seeded(12)).unwrap();
    assert_eq!(round.matches.len(), 4);
    assert_eq!(round.bye, None);
    let matches = round.matches.clone();

    for (position, code) in ["1-0", "0-1", "0.5-0.5", "1-0"].iter().enumerate() {
        record_result(&mut t, 1, position + 1, code).unwrap();
    }

    let table = standings(&t);
    assert_eq!(table.len(), 8);
    let points: Vec<f64> = table.iter().map(|s| s.points).collect();
    assert_eq!(points, vec![1.0, 1.0, 1.0, 0.5, 0.5, 0.0, 0.0, 0.0]);

    let mut winners: Vec<u32> = table[..3].iter().map(|s| s.player).collect();
    winners.sort_unstable();
    let mut expected = vec![matches[0].white, matches[1].black, matches[3].white];
    expected.sort_unstable();
    assert_eq!(winners, expected);

    let mut drawn: Vec<u32> = table[3..5].iter().map(|s| s.player).collect();
    drawn.sort_unstable();
    let mut pair = vec![matches[2].white, matches[2].black];
    pair.sort_unstable();
    assert_eq!(drawn, pair);
}

#[test]
fn standings_ties_keep_enrolment_order() {
    let t = tournament_with_players(8, 1);
    let order: Vec<u32> = standings(&t).iter().map(|s| s.player).collect();
    assert_eq!(order, (1..=8).collect::<Vec<_>>());
}

#[test]
fn delete_round_renumbers_and_replays_scores() {
    let mut t = tournament_with_players(8, 3);
    let mut pairing = RandomPairing::seeded(13);
    for number in 1..=3 {
        create_round(&mut t, &mut pairing).unwrap();
        for position in 1..=4 {
            record_result(&mut t, number, position, "1-0").unwrap();
        }
    }

    let removed = delete_round(&mut t, 2).unwrap();
    assert_eq!(removed.number, 2);
    let numbers: Vec<u32> = t.rounds().iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let total: f64 = t.players().iter().map(|p| p.score()).sum();
    assert_eq!(total, 8.0);
    for m in &removed.matches {
        let still_counted: f64 = t
            .rounds()
            .iter()
            .flat_map(|r| r.matches.iter())
            .filter(|x| x.white == m.white)
            .count() as f64;
        assert_eq!(score(&t, m.white), still_counted);
    }

    // A freed slot can be paired again.
    assert_eq!(create_round(&mut t, &mut pairing).unwrap().number, 3);
    assert_eq!(
        delete_round(&mut t, 7).unwrap_err(),
        TournamentError::RoundNotFound(7)
    );
}

#[test]
fn lifecycle_transitions_are_explicit() {
    let mut t = tournament_with_players(8, 1);
    assert_eq!(t.status, TournamentStatus::Pending);
    assert_eq!(finish_tournament(&mut t), Err(TournamentError::InvalidState));

    start_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(start_tournament(&mut t), Err(TournamentError::InvalidState));

    create_round(&mut t, &mut RandomPairing::seeded(14)).unwrap();
    for position in 1..=4 {
        record_result(&mut t, 1, position, "0-1").unwrap();
    }
    // All rounds done, still in progress until finished by hand.
    assert_eq!(t.status, TournamentStatus::InProgress);

    finish_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(finish_tournament(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn completed_tournament_accepts_no_new_rounds() {
    let mut t = tournament_with_players(8, 3);
    start_tournament(&mut t).unwrap();
    finish_tournament(&mut t).unwrap();
    assert_eq!(
        create_round(&mut t, &mut RandomPairing::seeded(15)).unwrap_err(),
        TournamentError::InvalidState
    );
}

#[test]
fn enrolment_respects_capacity_and_uniqueness() {
    let mut t = Tournament::new(0, details(2, 1));
    t.add_player(&player(1)).unwrap();
    assert_eq!(
        t.add_player(&player(1)),
        Err(TournamentError::PlayerAlreadyEnrolled(1))
    );
    t.add_player(&player(2)).unwrap();
    assert_eq!(
        t.add_player(&player(3)),
        Err(TournamentError::TournamentFull { max_players: 2 })
    );
    assert_eq!(t.players().len(), 2);
}

#[test]
fn paired_players_cannot_be_withdrawn() {
    let mut t = tournament_with_players(9, 2);
    t.withdraw_player(9).unwrap();
    assert_eq!(t.withdraw_player(9), Err(TournamentError::PlayerNotFound(9)));

    create_round(&mut t, &mut RandomPairing::seeded(16)).unwrap();
    assert_eq!(t.withdraw_player(1), Err(TournamentError::PlayerHasMatches(1)));

    // Late entries join future rounds only.
    t.add_player(&player(10)).unwrap();
    assert!(!t.round(1).unwrap().involves(10));
}

#[test]
fn details_cannot_shrink_below_existing_state() {
    let mut t = tournament_with_players(8, 2);
    create_round(&mut t, &mut RandomPairing::seeded(17)).unwrap();
    create_round(&mut t, &mut RandomPairing::seeded(18)).unwrap();

    assert!(matches!(
        t.update_details(details(7, 2)),
        Err(TournamentError::InvalidDetails(_))
    ));
    assert!(matches!(
        t.update_details(details(8, 1)),
        Err(TournamentError::InvalidDetails(_))
    ));
    let mut backwards = details(8, 2);
    backwards.end_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert!(matches!(
        t.update_details(backwards),
        Err(TournamentError::InvalidDetails(_))
    ));

    t.update_details(details(12, 4)).unwrap();
    assert_eq!(t.details.round_count, 4);
}
