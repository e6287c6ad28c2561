//! Percentile tier threshold reduction
//!
//! Each tier reads its `tr` from the exact percentile cut position. The
//! `glicko` and `gxe` values come from the nearest entry at or above that
//! position whose rd is settled, so a noisy newcomer sitting on the cut does
//! not define the tier's skill estimate.

use crate::config::{TierCut, TierTable, WalkbackBound};
use crate::error::{LeaderboardError, Result};
use crate::leaderboard::Leaderboard;
use crate::types::{ThresholdRecord, ThresholdResult, TierThreshold};
use tracing::{debug, warn};

/// Compute thresholds for every tier in table order
pub fn compute_thresholds(
    leaderboard: &Leaderboard,
    table: &TierTable,
) -> Result<ThresholdResult> {
    if leaderboard.is_empty() {
        return Err(LeaderboardError::EmptyLeaderboard.into());
    }

    let mut result = ThresholdResult::new();
    for cut in &table.cuts {
        let threshold = compute_tier(leaderboard, table, cut)?;
        debug!(
            "{}: {:?} with glicko {} (#{} -> #{})",
            threshold.tier,
            threshold.record.tr,
            threshold.record.glicko,
            threshold.raw_index,
            threshold.adjusted_index
        );
        result.push(threshold);
    }

    Ok(result)
}

/// Signed cut position, `floor(len * fraction) - 1`, or 0 for the top tier
pub fn raw_index(len: usize, fraction: f64, is_top_tier: bool) -> i64 {
    if is_top_tier {
        0
    } else {
        (len as f64 * fraction).floor() as i64 - 1
    }
}

fn compute_tier(
    leaderboard: &Leaderboard,
    table: &TierTable,
    cut: &TierCut,
) -> Result<TierThreshold> {
    let len = leaderboard.len();
    let is_top = table.is_top_tier(&cut.name);
    let signed = raw_index(len, cut.fraction, is_top);

    let raw = if signed < 0 {
        match table.bound {
            WalkbackBound::Clamp => {
                warn!(
                    "Tier '{}' cut falls before the first of {} entries, using index 0",
                    cut.name, len
                );
                0
            }
            WalkbackBound::Fail => {
                return Err(LeaderboardError::IndexOutOfRange {
                    tier: cut.name.clone(),
                    index: signed,
                    len,
                }
                .into())
            }
        }
    } else {
        signed as usize
    };

    let cut_entry = leaderboard
        .get(raw)
        .ok_or_else(|| LeaderboardError::IndexOutOfRange {
            tier: cut.name.clone(),
            index: signed,
            len,
        })?;

    let adjusted = if is_top {
        raw
    } else {
        settled_index(leaderboard, table, &cut.name, raw)?
    };
    let settled = &leaderboard.entries()[adjusted].league;

    Ok(TierThreshold {
        tier: cut.name.clone(),
        raw_index: raw,
        adjusted_index: adjusted,
        record: ThresholdRecord {
            tr: cut_entry.league.tr,
            glicko: settled.glicko,
            gxe: settled.gxe,
        },
    })
}

/// Walk from `raw` toward the top until rd is within the bound
fn settled_index(
    leaderboard: &Leaderboard,
    table: &TierTable,
    tier: &str,
    raw: usize,
) -> Result<usize> {
    let entries = leaderboard.entries();
    let mut index = raw;

    while entries[index].league.rd > table.max_rd {
        if index == 0 {
            return match table.bound {
                WalkbackBound::Clamp => {
                    warn!(
                        "Tier '{}' found no entry with rd <= {} at or above #{}, using index 0",
                        tier, table.max_rd, raw
                    );
                    Ok(0)
                }
                WalkbackBound::Fail => Err(LeaderboardError::NoSettledEntry {
                    tier: tier.to_string(),
                    raw_index: raw,
                    max_rd: table.max_rd,
                }
                .into()),
            };
        }
        index -= 1;
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, LeagueRecord};
    use proptest::prelude::*;

    /// Descending ratings with the given rd per position
    fn board_with_rd(rds: &[f64]) -> Leaderboard {
        let len = rds.len();
        Leaderboard::from(
            rds.iter()
                .enumerate()
                .map(|(i, rd)| {
                    let mut league =
                        LeagueRecord::new((len - i) as f64, "a", 2000.0 - i as f64, *rd);
                    league.gxe = Some(90.0 - i as f64 / 100.0);
                    Entry::new(format!("player{}", i), league)
                })
                .collect::<Vec<_>>(),
        )
    }

    fn table(cuts: &[(&str, f64)]) -> TierTable {
        TierTable::with_cuts(cuts.iter().map(|(n, f)| TierCut::new(*n, *f)).collect())
    }

    #[test]
    fn test_s_tier_index_for_1000_players() {
        assert_eq!(raw_index(1000, 0.23, false), 229);
    }

    #[test]
    fn test_top_tier_is_always_zero() {
        assert_eq!(raw_index(1, 0.5, true), 0);
        assert_eq!(raw_index(50_000, 0.9, true), 0);
    }

    #[test]
    fn test_settled_board_keeps_raw_index() {
        let board = board_with_rd(&vec![40.0; 1000]);
        let result = compute_thresholds(&board, &TierTable::default()).unwrap();

        assert_eq!(result.len(), 19);
        for tier in result.iter() {
            assert_eq!(tier.raw_index, tier.adjusted_index, "tier {}", tier.tier);
        }
        let s = result.get("s").unwrap();
        assert_eq!(s.raw_index, 229);
        assert_eq!(s.record.tr, board.get(229).unwrap().league.tr);
        assert_eq!(result.get("d").unwrap().raw_index, 999);
    }

    #[test]
    fn test_walkback_skips_unsettled_entries() {
        let mut rds = vec![40.0; 10];
        rds[4] = 120.0;
        rds[3] = 66.0;
        let board = board_with_rd(&rds);

        let result = compute_thresholds(&board, &table(&[("top1", 0.0), ("half", 0.5)])).unwrap();
        let half = result.get("half").unwrap();

        assert_eq!(half.raw_index, 4);
        assert_eq!(half.adjusted_index, 2);
        // tr stays at the exact cut, skill values come from the settled neighbour
        assert_eq!(half.record.tr, board.get(4).unwrap().league.tr);
        assert_eq!(half.record.glicko, board.get(2).unwrap().league.glicko);
        assert_eq!(half.record.gxe, board.get(2).unwrap().league.gxe);
    }

    #[test]
    fn test_rd_equal_to_bound_is_settled() {
        let mut rds = vec![40.0; 4];
        rds[1] = 65.0;
        let board = board_with_rd(&rds);

        let result = compute_thresholds(&board, &table(&[("top1", 0.0), ("half", 0.5)])).unwrap();
        assert_eq!(result.get("half").unwrap().adjusted_index, 1);
    }

    #[test]
    fn test_top_tier_ignores_rd() {
        let board = board_with_rd(&[300.0, 40.0]);
        let result = compute_thresholds(&board, &table(&[("top1", 0.0)])).unwrap();
        let top = result.get("top1").unwrap();

        assert_eq!(top.adjusted_index, 0);
        assert_eq!(top.record.glicko, 2000.0);
    }

    #[test]
    fn test_unsettled_board_clamps_to_zero() {
        let board = board_with_rd(&vec![200.0; 20]);
        let result = compute_thresholds(&board, &TierTable::default()).unwrap();

        // every tier still resolves
        assert_eq!(result.len(), 19);
        for tier in result.iter() {
            assert_eq!(tier.adjusted_index, 0);
        }
    }

    #[test]
    fn test_unsettled_board_fails_when_configured() {
        let board = board_with_rd(&vec![200.0; 20]);
        let mut tiers = table(&[("top1", 0.0), ("half", 0.5)]);
        tiers.bound = WalkbackBound::Fail;

        let err = compute_thresholds(&board, &tiers).unwrap_err();
        match err.downcast_ref::<LeaderboardError>() {
            Some(LeaderboardError::NoSettledEntry { tier, raw_index, .. }) => {
                assert_eq!(tier, "half");
                assert_eq!(*raw_index, 9);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_small_population_negative_cut() {
        let board = board_with_rd(&[40.0, 40.0, 40.0]);

        let result = compute_thresholds(&board, &table(&[("top1", 0.0), ("x", 0.01)])).unwrap();
        assert_eq!(result.get("x").unwrap().raw_index, 0);

        let mut strict = table(&[("top1", 0.0), ("x", 0.01)]);
        strict.bound = WalkbackBound::Fail;
        let err = compute_thresholds(&board, &strict).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeaderboardError>(),
            Some(LeaderboardError::IndexOutOfRange { index: -1, len: 3, .. })
        ));
    }

    #[test]
    fn test_empty_leaderboard() {
        let err = compute_thresholds(&Leaderboard::new(), &TierTable::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeaderboardError>(),
            Some(LeaderboardError::EmptyLeaderboard)
        ));
    }

    proptest! {
        #[test]
        fn prop_raw_index_matches_floor(len in 1usize..100_000, fraction in 0.0f64..=1.0) {
            let expected = (len as f64 * fraction).floor() as i64 - 1;
            prop_assert_eq!(raw_index(len, fraction, false), expected);
            prop_assert!(raw_index(len, fraction, false) < len as i64);
        }

        #[test]
        fn prop_walkback_never_increases_index(rds in proptest::collection::vec(0.0f64..200.0, 1..300)) {
            let board = board_with_rd(&rds);
            let result = compute_thresholds(&board, &TierTable::default()).unwrap();

            for tier in result.iter() {
                prop_assert!(tier.adjusted_index <= tier.raw_index);
                let rd = board.get(tier.adjusted_index).unwrap().league.rd;
                prop_assert!(rd <= 65.0 || tier.adjusted_index == 0 || tier.tier == "top1");
                // everything skipped over was unsettled
                for skipped in (tier.adjusted_index + 1)..=tier.raw_index {
                    prop_assert!(board.get(skipped).unwrap().league.rd > 65.0);
                }
            }
        }
    }
}
