//! Standings derivation from match history
//!
//! Standings are never stored. They are recomputed from the players of a
//! tournament and its match records whenever pairings or reports need them.

use crate::config::TieBreak;
use crate::types::{MatchRecord, MatchResult, PlayedOpponents, Player, PlayerId, Standing};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Compare two standings in rank order (best first)
pub fn compare_rank(a: &Standing, b: &Standing, tie_break: TieBreak) -> Ordering {
    let by_wins = b.wins.cmp(&a.wins);
    match tie_break {
        TieBreak::WinsOnly => by_wins,
        TieBreak::WinsThenOmw => by_wins.then_with(|| {
            b.opponent_match_win
                .partial_cmp(&a.opponent_match_win)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

/// Sort standings best first. The sort is stable, so equal records keep
/// their incoming (registration) order.
pub fn rank_standings(standings: &mut [Standing], tie_break: TieBreak) {
    standings.sort_by(|a, b| compare_rank(a, b, tie_break));
}

/// Build ranked standings for `players` from `matches`.
///
/// Every player appears even without matches. Only records whose
/// `player_id` belongs to `players` are tallied; the opponent side of a match
/// is expected to be present as its own mirrored record.
pub fn compute_standings(
    players: &[Player],
    matches: &[MatchRecord],
    tie_break: TieBreak,
) -> Vec<Standing> {
    let mut by_id: HashMap<PlayerId, Standing> = players
        .iter()
        .map(|p| (p.id, Standing::new(p.id, p.name.clone())))
        .collect();

    for record in matches {
        let Some(standing) = by_id.get_mut(&record.player_id) else {
            continue;
        };
        standing.matches += 1;
        match record.result {
            MatchResult::Win => standing.wins += 1,
            MatchResult::Lose => standing.losses += 1,
            MatchResult::Tie => standing.ties += 1,
        }
        if record.is_bye() {
            standing.had_bye = true;
        }
    }

    let win_rates: HashMap<PlayerId, f64> = by_id
        .iter()
        .map(|(id, standing)| (*id, standing.win_rate()))
        .collect();

    let mut opponent_rates: HashMap<PlayerId, (f64, u32)> = HashMap::new();
    for record in matches.iter().filter(|r| !r.is_bye()) {
        if !by_id.contains_key(&record.player_id) {
            continue;
        }
        let rate = win_rates.get(&record.opponent_id).copied().unwrap_or(0.0);
        let entry = opponent_rates.entry(record.player_id).or_insert((0.0, 0));
        entry.0 += rate;
        entry.1 += 1;
    }

    for (id, (total, count)) in opponent_rates {
        if let Some(standing) = by_id.get_mut(&id) {
            standing.opponent_match_win = total / count as f64;
        }
    }

    let mut standings: Vec<Standing> = players
        .iter()
        .filter_map(|p| by_id.remove(&p.id))
        .collect();
    rank_standings(&mut standings, tie_break);
    standings
}

/// Map every player to the opponents already faced, bye sentinel included
pub fn compute_played_opponents(matches: &[MatchRecord]) -> PlayedOpponents {
    let mut played = PlayedOpponents::new();
    for record in matches {
        played
            .entry(record.player_id)
            .or_default()
            .insert(record.opponent_id);
    }
    played
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BYE_PLAYER_ID;

    fn player(id: PlayerId, name: &str) -> Player {
        Player::new(id, name, Some("WOW".to_string()))
    }

    fn report(player: PlayerId, opponent: PlayerId, result: MatchResult) -> Vec<MatchRecord> {
        let record = MatchRecord::new("WOW", player, opponent, result);
        let mirror = record.mirrored();
        vec![record, mirror]
    }

    #[test]
    fn test_empty_history_keeps_registration_order() {
        let players = vec![player(3, "C"), player(1, "A"), player(2, "B")];
        let standings = compute_standings(&players, &[], TieBreak::WinsThenOmw);

        let ids: Vec<_> = standings.iter().map(|s| s.player_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(standings.iter().all(|s| s.matches == 0));
    }

    #[test]
    fn test_tallies_and_bye() {
        let players = vec![player(1, "A"), player(2, "B"), player(3, "C")];
        let mut matches = report(1, 2, MatchResult::Win);
        matches.extend(report(2, 3, MatchResult::Tie));
        matches.push(MatchRecord::new("WOW", 3, BYE_PLAYER_ID, MatchResult::Win));

        let standings = compute_standings(&players, &matches, TieBreak::WinsThenOmw);
        let get = |id| standings.iter().find(|s| s.player_id == id).unwrap();

        assert_eq!((get(1).wins, get(1).losses, get(1).ties), (1, 0, 0));
        assert_eq!((get(2).wins, get(2).losses, get(2).ties), (0, 1, 1));
        assert_eq!((get(3).wins, get(3).ties, get(3).matches), (1, 1, 2));
        assert!(get(3).had_bye);
        assert!(!get(1).had_bye);
    }

    #[test]
    fn test_opponent_match_win() {
        let players = vec![player(1, "A"), player(2, "B"), player(3, "C"), player(4, "D")];
        let mut matches = report(1, 2, MatchResult::Win);
        matches.extend(report(3, 4, MatchResult::Win));
        matches.extend(report(1, 3, MatchResult::Win));
        matches.extend(report(2, 4, MatchResult::Win));

        let standings = compute_standings(&players, &matches, TieBreak::WinsThenOmw);
        let get = |id| standings.iter().find(|s| s.player_id == id).unwrap();

        // A beat B (rate 0.5) and C (rate 0.5)
        assert!((get(1).opponent_match_win - 0.5).abs() < 1e-9);
        // B lost to A (rate 1.0), beat D (rate 0.0)
        assert!((get(2).opponent_match_win - 0.5).abs() < 1e-9);
        // C and B both have one win; tie stays in registration order here
        let ids: Vec<_> = standings.iter().map(|s| s.player_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_omw_breaks_equal_wins() {
        let players = vec![player(1, "A"), player(2, "B"), player(3, "C"), player(4, "D")];
        // B beats the strong D, A beats the winless C
        let mut matches = report(4, 3, MatchResult::Win);
        matches.extend(report(1, 3, MatchResult::Win));
        matches.extend(report(2, 4, MatchResult::Win));

        let by_omw = compute_standings(&players, &matches, TieBreak::WinsThenOmw);
        let ids: Vec<_> = by_omw.iter().map(|s| s.player_id).collect();
        assert_eq!(ids[0], 2);

        let by_wins = compute_standings(&players, &matches, TieBreak::WinsOnly);
        let ids: Vec<_> = by_wins.iter().map(|s| s.player_id).collect();
        assert_eq!(ids[..3], [1, 2, 4]);
    }

    #[test]
    fn test_played_opponents_includes_bye() {
        let mut matches = report(1, 2, MatchResult::Lose);
        matches.push(MatchRecord::new("WOW", 3, BYE_PLAYER_ID, MatchResult::Win));

        let played = compute_played_opponents(&matches);
        assert!(played[&1].contains(&2));
        assert!(played[&2].contains(&1));
        assert!(played[&3].contains(&BYE_PLAYER_ID));
        assert!(!played.contains_key(&BYE_PLAYER_ID));
    }
}
