//! Bye selection for odd-sized fields

use crate::config::TieBreak;
use crate::standings::compare_rank;
use crate::types::{PlayedOpponents, Standing, BYE_PLAYER_ID};

/// True if the player already had a bye, either by flag or by history
pub fn has_had_bye(standing: &Standing, played: &PlayedOpponents) -> bool {
    standing.had_bye
        || played
            .get(&standing.player_id)
            .is_some_and(|opponents| opponents.contains(&BYE_PLAYER_ID))
}

/// Pick the bye recipient: the lowest-ranked player without a previous bye.
///
/// Candidates are ordered worst first with a stable sort, so among equal
/// records the earliest registered player is chosen. Returns the index of the
/// chosen player in `standings`, or `None` if every player has had a bye.
pub fn select_bye(
    standings: &[Standing],
    played: &PlayedOpponents,
    tie_break: TieBreak,
) -> Option<usize> {
    let mut candidates: Vec<usize> = (0..standings.len()).collect();
    candidates.sort_by(|&a, &b| compare_rank(&standings[b], &standings[a], tie_break));

    candidates
        .into_iter()
        .find(|&idx| !has_had_bye(&standings[idx], played))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(id: u32, wins: u32, omw: f64, had_bye: bool) -> Standing {
        Standing {
            wins,
            matches: wins,
            opponent_match_win: omw,
            had_bye,
            ..Standing::new(id, format!("P{}", id))
        }
    }

    #[test]
    fn test_lowest_ranked_gets_bye() {
        let standings = vec![
            standing(1, 2, 0.5, false),
            standing(2, 1, 0.5, false),
            standing(3, 0, 0.2, false),
        ];
        let idx = select_bye(&standings, &PlayedOpponents::new(), TieBreak::WinsThenOmw);
        assert_eq!(idx, Some(2));
    }

    #[test]
    fn test_skips_previous_bye_recipients() {
        let standings = vec![
            standing(1, 2, 0.5, false),
            standing(2, 1, 0.5, false),
            standing(3, 0, 0.2, true),
        ];
        let idx = select_bye(&standings, &PlayedOpponents::new(), TieBreak::WinsThenOmw);
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn test_history_counts_as_bye() {
        let standings = vec![standing(1, 1, 0.0, false), standing(2, 0, 0.0, false)];
        let mut played = PlayedOpponents::new();
        played.entry(2).or_default().insert(BYE_PLAYER_ID);

        let idx = select_bye(&standings, &played, TieBreak::WinsThenOmw);
        assert_eq!(idx, Some(0));
    }

    #[test]
    fn test_equal_records_pick_earliest_registered() {
        let standings = vec![
            standing(1, 0, 0.0, false),
            standing(2, 0, 0.0, false),
            standing(3, 0, 0.0, false),
        ];
        let idx = select_bye(&standings, &PlayedOpponents::new(), TieBreak::WinsThenOmw);
        assert_eq!(idx, Some(0));
    }

    #[test]
    fn test_omw_only_matters_with_tie_break() {
        let standings = vec![standing(1, 0, 0.1, false), standing(2, 0, 0.9, false)];
        let played = PlayedOpponents::new();

        assert_eq!(select_bye(&standings, &played, TieBreak::WinsThenOmw), Some(0));
        assert_eq!(select_bye(&standings, &played, TieBreak::WinsOnly), Some(0));

        let reversed = vec![standing(2, 0, 0.9, false), standing(1, 0, 0.1, false)];
        assert_eq!(select_bye(&reversed, &played, TieBreak::WinsThenOmw), Some(1));
        assert_eq!(select_bye(&reversed, &played, TieBreak::WinsOnly), Some(0));
    }

    #[test]
    fn test_exhausted_pool() {
        let standings = vec![standing(1, 1, 0.0, true), standing(2, 0, 0.0, true)];
        assert_eq!(
            select_bye(&standings, &PlayedOpponents::new(), TieBreak::WinsThenOmw),
            None
        );
    }
}
