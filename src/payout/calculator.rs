use crate::modes::TieMap;
use crate::records::{PayoutAssignment, ScoreRecord};

/// Split a payout schedule over ranked standings.
///
/// `schedule[0]` is paid to placement 1, `schedule[1]` to placement 2 and so
/// on. A tie group of `k` players starting at placement `p` pools
/// `schedule[p-1 .. p-1+k]` (clipped at the end of the schedule) and every
/// member receives `pool / k`, rounded down but never below 1 when the pool is
/// nonzero. Nobody placed beyond the end of the schedule is paid.
pub fn compute_payouts(
    standings: &[ScoreRecord],
    ties: &TieMap,
    schedule: &[u64],
) -> Vec<PayoutAssignment> {
    let mut ordered: Vec<&ScoreRecord> = standings.iter().filter(|r| r.placement > 0).collect();
    ordered.sort_by_key(|r| r.placement);

    let mut assignments = Vec::new();
    for record in ordered {
        let start = record.placement as usize - 1;
        if start >= schedule.len() {
            break;
        }

        let amount = match ties.get(&record.login) {
            Some(partners) if !partners.is_empty() => {
                let k = partners.len() + 1;
                let end = (start + k).min(schedule.len());
                split_pool(saturating_sum(&schedule[start..end]), k as u64)
            }
            _ => schedule[start],
        };

        assignments.push(PayoutAssignment {
            record: record.clone(),
            amount,
        });
    }
    assignments
}

fn saturating_sum(amounts: &[u64]) -> u64 {
    amounts.iter().fold(0u64, |total, &amount| total.saturating_add(amount))
}

fn split_pool(pool: u64, members: u64) -> u64 {
    let share = pool / members;
    if pool > 0 {
        share.max(1)
    } else {
        share
    }
}

/// Total amount owed across all assignments
pub fn total_paid(assignments: &[PayoutAssignment]) -> u64 {
    assignments
        .iter()
        .fold(0u64, |total, a| total.saturating_add(a.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{Mode, Strategy as RankStrategy};
    use proptest::prelude::*;

    const SCHEDULE: [u64; 5] = [1000, 700, 500, 400, 300];

    fn ranked(scores: &[(&str, i64)]) -> (Vec<ScoreRecord>, TieMap) {
        let strategy = RankStrategy::new(Mode::Rounds);
        let mut records: Vec<ScoreRecord> = scores
            .iter()
            .map(|&(login, score)| ScoreRecord::new(login, login, "FRA").with_score(score))
            .collect();
        strategy.sort(&mut records);
        strategy.update_placements(&mut records);
        let ties = strategy.get_ties(&records);
        (records, ties)
    }

    fn amounts(assignments: &[PayoutAssignment]) -> Vec<(&str, u64)> {
        assignments
            .iter()
            .map(|a| (a.record.login.as_str(), a.amount))
            .collect()
    }

    #[test]
    fn test_tie_at_second_splits_pool() {
        let (records, ties) = ranked(&[
            ("p1", 121),
            ("p2", 150),
            ("p3", 149),
            ("p4", 134),
            ("p5", 267),
            ("p6", 100),
            ("p7", 150),
        ]);
        let payouts = compute_payouts(&records, &ties, &SCHEDULE);
        // p2 and p7 share placement 2: (700 + 500) / 2
        assert_eq!(
            amounts(&payouts),
            vec![("p5", 1000), ("p2", 600), ("p7", 600), ("p3", 400), ("p4", 300)]
        );
    }

    #[test]
    fn test_untied_pays_schedule() {
        let (records, ties) = ranked(&[("a", 30), ("b", 20), ("c", 10)]);
        let payouts = compute_payouts(&records, &ties, &SCHEDULE);
        assert_eq!(amounts(&payouts), vec![("a", 1000), ("b", 700), ("c", 500)]);
        assert_eq!(total_paid(&payouts), 2200);
    }

    #[test]
    fn test_stops_after_schedule() {
        let (records, ties) = ranked(&[("a", 30), ("b", 20), ("c", 10)]);
        let payouts = compute_payouts(&records, &ties, &[50, 25]);
        assert_eq!(amounts(&payouts), vec![("a", 50), ("b", 25)]);
    }

    #[test]
    fn test_tie_pool_clipped_at_schedule_end() {
        let (records, ties) = ranked(&[("a", 30), ("b", 20), ("c", 20), ("d", 20)]);
        let payouts = compute_payouts(&records, &ties, &[100, 60, 30]);
        // b, c, d share placement 2: pool 60 + 30 = 90 over 3
        assert_eq!(amounts(&payouts), vec![("a", 100), ("b", 30), ("c", 30), ("d", 30)]);
    }

    #[test]
    fn test_tiny_pool_pays_at_least_one() {
        let (records, ties) = ranked(&[("a", 5), ("b", 5), ("c", 5)]);
        let payouts = compute_payouts(&records, &ties, &[2]);
        assert_eq!(amounts(&payouts), vec![("a", 1), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_zero_pool_pays_zero() {
        let (records, ties) = ranked(&[("a", 5), ("b", 5)]);
        let payouts = compute_payouts(&records, &ties, &[0, 0]);
        assert_eq!(amounts(&payouts), vec![("a", 0), ("b", 0)]);
    }

    #[test]
    fn test_huge_schedule_saturates() {
        let (records, ties) = ranked(&[("a", 5), ("b", 5), ("c", 1)]);
        let payouts = compute_payouts(&records, &ties, &[u64::MAX, u64::MAX, 1]);
        assert_eq!(amounts(&payouts), vec![("a", u64::MAX / 2), ("b", u64::MAX / 2), ("c", 1)]);
        assert_eq!(total_paid(&payouts), u64::MAX);
    }

    #[test]
    fn test_empty_schedule() {
        let (records, ties) = ranked(&[("a", 5), ("b", 4)]);
        assert!(compute_payouts(&records, &ties, &[]).is_empty());
    }

    #[test]
    fn test_unplaced_records_are_ignored() {
        let records = vec![ScoreRecord::new("a", "a", "FRA").with_score(5)];
        assert!(compute_payouts(&records, &TieMap::new(), &SCHEDULE).is_empty());
    }

    proptest! {
        #[test]
        fn prop_tie_share_matches_pool(
            schedule in prop::collection::vec(0u64..2000, 1..8),
            leaders in 0usize..4,
            tied in 2usize..5,
        ) {
            let mut scores: Vec<(String, i64)> = (0..leaders)
                .map(|i| (format!("lead{i}"), 1000 - i as i64))
                .collect();
            scores.extend((0..tied).map(|i| (format!("tie{i}"), 10)));
            let refs: Vec<(&str, i64)> = scores.iter().map(|(l, s)| (l.as_str(), *s)).collect();
            let (records, ties) = ranked(&refs);

            let payouts = compute_payouts(&records, &ties, &schedule);
            let start = leaders;
            if start < schedule.len() {
                let end = (start + tied).min(schedule.len());
                let pool: u64 = schedule[start..end].iter().sum();
                let expected = if pool > 0 { (pool / tied as u64).max(1) } else { 0 };
                let tie_amounts: Vec<u64> = payouts
                    .iter()
                    .filter(|a| a.record.login.starts_with("tie"))
                    .map(|a| a.amount)
                    .collect();
                prop_assert_eq!(tie_amounts.len(), tied);
                prop_assert!(tie_amounts.iter().all(|&a| a == expected));
            } else {
                prop_assert!(payouts.iter().all(|a| !a.record.login.starts_with("tie")));
            }
        }
    }
}
