use std::collections::HashMap;

use super::selector;
use super::strategy::Strategy;
use crate::buffered_eprintln;
use crate::records::{MatchMetadata, ScoreRecord};

/// Merge records sharing a login, in order of first appearance.
///
/// The first record seen for a login provides identity and team fields;
/// every later record for that login is folded in with `merge`. `count`
/// ends up as the number of records merged.
pub(super) fn merge_by_login<F>(score_lists: &[Vec<ScoreRecord>], mut merge: F) -> Vec<ScoreRecord>
where
    F: FnMut(&mut ScoreRecord, &ScoreRecord),
{
    let mut merged: Vec<ScoreRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for list in score_lists {
        for record in list {
            match index.get(&record.login) {
                Some(&i) => {
                    let acc = &mut merged[i];
                    merge(acc, record);
                    acc.count += 1;
                }
                None => {
                    index.insert(record.login.clone(), merged.len());
                    let mut first = record.clone();
                    first.count = 1;
                    first.placement = 0;
                    merged.push(first);
                }
            }
        }
    }

    merged
}

/// Sum times over every map, charging author time plus `penalty_ms` for
/// each map a player has no time on. Players never seen are left out.
pub(super) fn with_author_penalty(
    score_lists: &[Vec<ScoreRecord>],
    metadata: &[MatchMetadata],
    penalty_ms: i64,
) -> Vec<ScoreRecord> {
    let mut players = merge_by_login(score_lists, |_, _| {});

    let charges: Vec<i64> = (0..score_lists.len())
        .map(|i| match metadata.get(i).and_then(MatchMetadata::author_time) {
            Some(author) => author.saturating_add(penalty_ms),
            None => {
                let label = metadata.get(i).map(MatchMetadata::label).unwrap_or("?");
                buffered_eprintln!(
                    "Warning: map {} ({}) has no author time, missing players get only the {}ms penalty",
                    i + 1,
                    label,
                    penalty_ms
                );
                penalty_ms
            }
        })
        .collect();

    for player in &mut players {
        let mut total: i64 = 0;
        let mut played = 0;
        for (list, charge) in score_lists.iter().zip(&charges) {
            match list.iter().find(|r| r.login == player.login) {
                Some(record) => {
                    total = total.saturating_add(record.player_score);
                    played += 1;
                }
                None => total = total.saturating_add(*charge),
            }
        }
        player.player_score = total;
        player.count = played;
    }

    players
}

/// Rank each map on its own with that map's mode, then sum placement
/// points: `players_on_map - placement + 1`.
pub(super) fn by_placement_points(
    score_lists: &[Vec<ScoreRecord>],
    metadata: &[MatchMetadata],
) -> Vec<ScoreRecord> {
    let ranked_maps: Vec<Vec<ScoreRecord>> = score_lists
        .iter()
        .enumerate()
        .map(|(i, list)| {
            let map_meta = metadata.get(i..=i).unwrap_or(&[]);
            let mode_script = map_meta.first().map(|m| m.mode_script.as_str()).unwrap_or("");
            let mut strategy = Strategy::new(selector::select(mode_script));

            let mut ranked = strategy.combine(std::slice::from_ref(list), map_meta);
            strategy.sort(&mut ranked);
            strategy.update_placements(&mut ranked);

            let players = ranked.len() as i64;
            for record in &mut ranked {
                record.player_score = players - record.placement as i64 + 1;
            }
            ranked
        })
        .collect();

    let mut merged = merge_by_login(&ranked_maps, |acc, rec| {
        acc.player_score = acc.player_score.saturating_add(rec.player_score);
    });
    for record in &mut merged {
        record.player_score2 = 0;
        record.team_score = 0;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MedalTimes;

    fn rec(login: &str, score: i64) -> ScoreRecord {
        ScoreRecord::new(login, login, "FRA").with_score(score)
    }

    fn medals(author: i64) -> MedalTimes {
        MedalTimes {
            author,
            gold: author + 3_000,
            silver: author + 8_000,
            bronze: author + 15_000,
        }
    }

    fn find<'a>(records: &'a [ScoreRecord], login: &str) -> &'a ScoreRecord {
        records.iter().find(|r| r.login == login).unwrap()
    }

    #[test]
    fn test_merge_keeps_first_seen_order_and_identity() {
        let first = rec("b", 1).with_team(1, "Red", 0);
        let later = rec("b", 2).with_team(0, "Blue", 0);
        let merged = merge_by_login(&[vec![first, rec("a", 1)], vec![later]], |acc, r| {
            acc.player_score += r.player_score;
        });
        assert_eq!(merged[0].login, "b");
        assert_eq!(merged[0].team_name, "Red");
        assert_eq!(merged[0].player_score, 3);
        assert_eq!(merged[1].login, "a");
    }

    #[test]
    fn test_author_penalty_charges_missing_maps() {
        let lists = vec![
            vec![rec("a", 40_000), rec("b", 42_000)],
            vec![rec("a", 50_000)],
        ];
        let meta = vec![
            MatchMetadata::new("TM_TimeAttack_Online").with_medals(medals(39_000)),
            MatchMetadata::new("TM_TimeAttack_Online").with_medals(medals(48_000)),
        ];
        let merged = with_author_penalty(&lists, &meta, 15_000);

        assert_eq!(find(&merged, "a").player_score, 90_000);
        assert_eq!(find(&merged, "a").count, 2);
        // 42s on map 1, author 48s + 15s penalty on map 2
        assert_eq!(find(&merged, "b").player_score, 42_000 + 63_000);
        assert_eq!(find(&merged, "b").count, 1);
    }

    #[test]
    fn test_author_penalty_excludes_unseen_players() {
        let meta = vec![MatchMetadata::new("TM_TimeAttack_Online").with_medals(medals(30_000))];
        let merged = with_author_penalty(&[vec![rec("a", 31_000)]], &meta, 15_000);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_author_penalty_without_medals_uses_penalty_only() {
        let merged = with_author_penalty(
            &[vec![rec("a", 31_000)], vec![rec("b", 20_000)]],
            &[MatchMetadata::new("TM_TimeAttack_Online")],
            15_000,
        );
        assert_eq!(find(&merged, "a").player_score, 31_000 + 15_000);
        assert_eq!(find(&merged, "b").player_score, 15_000 + 20_000);
    }

    #[test]
    fn test_mixed_sums_placement_points() {
        // Rounds map: c 30, a 20, b 10 -> c 3pts, a 2pts, b 1pt
        // TimeAttack map: a 40s, b 45s -> a 2pts, b 1pt
        let lists = vec![
            vec![rec("a", 20), rec("b", 10), rec("c", 30)],
            vec![rec("a", 40_000), rec("b", 45_000)],
        ];
        let meta = vec![
            MatchMetadata::new("Trackmania/TM_Rounds_Online.Script.txt"),
            MatchMetadata::new("Trackmania/TM_TimeAttack_Online.Script.txt"),
        ];
        let merged = by_placement_points(&lists, &meta);

        assert_eq!(find(&merged, "a").player_score, 4);
        assert_eq!(find(&merged, "b").player_score, 2);
        assert_eq!(find(&merged, "c").player_score, 3);
        assert_eq!(find(&merged, "a").count, 2);
        assert_eq!(find(&merged, "c").count, 1);
    }

    #[test]
    fn test_mixed_ties_share_points() {
        let lists = vec![vec![rec("a", 10), rec("b", 10), rec("c", 5)]];
        let meta = vec![MatchMetadata::new("TM_Rounds_Online")];
        let merged = by_placement_points(&lists, &meta);
        // a and b share placement 1 -> 3 points each, c is 3rd -> 1 point
        assert_eq!(find(&merged, "a").player_score, 3);
        assert_eq!(find(&merged, "b").player_score, 3);
        assert_eq!(find(&merged, "c").player_score, 1);
    }
}
