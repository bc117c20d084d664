//! Pure statistics: win rates, KDA, per-champion folds and match id ordering.
//!
//! Rounding is half away from zero everywhere. A death count of zero is treated
//! as one when computing KDA.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::db::{ChampionAggregate, MatchRecord};

/// `round(wins * 100 / games)`, `0` when no games were played.
pub fn win_rate(wins: i32, losses: i32) -> i64 {
    let games = i64::from(wins) + i64::from(losses);
    if games <= 0 {
        return 0;
    }

    (i64::from(wins) as f64 * 100.0 / games as f64).round() as i64
}

/// `(kills + assists) / max(deaths, 1)`, two decimals.
pub fn kda(kills: i64, deaths: i64, assists: i64) -> f64 {
    round_to((kills + assists) as f64 / deaths.max(1) as f64, 2)
}

/// `sum / games`, one decimal.
pub fn average(sum: i64, games: i64) -> f64 {
    if games == 0 {
        return 0.0;
    }
    round_to(sum as f64 / games as f64, 1)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Order match ids (`EUW1_7349112729`) by their numeric part, then lexically.
///
/// Ids are only comparable, not contiguous, and the numeric part can differ in width.
pub fn compare_match_ids(a: &str, b: &str) -> Ordering {
    fn sequence(id: &str) -> Option<u64> {
        id.rsplit_once('_')
            .map_or(id, |(_, number)| number)
            .parse()
            .ok()
    }

    match (sequence(a), sequence(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

#[derive(Default)]
struct Totals {
    games: i64,
    wins: i64,
    kills: i64,
    deaths: i64,
    assists: i64,
    cs: i64,
}

/// Fold matches into one aggregate per champion, grouped by `(puuid, champion)`.
pub fn aggregate_champions(matches: &[MatchRecord]) -> Vec<ChampionAggregate> {
    let mut groups: BTreeMap<(&str, &str), Totals> = BTreeMap::new();

    for m in matches {
        let totals = groups
            .entry((m.puuid.as_str(), m.champion_name.as_str()))
            .or_default();
        totals.games += 1;
        totals.wins += i64::from(m.win);
        totals.kills += i64::from(m.kills);
        totals.deaths += i64::from(m.deaths);
        totals.assists += i64::from(m.assists);
        totals.cs += i64::from(m.cs);
    }

    groups
        .into_iter()
        .map(|((puuid, champion), t)| {
            let losses = t.games - t.wins;
            ChampionAggregate {
                puuid: puuid.to_string(),
                champion_name: champion.to_string(),
                matches_played: t.games,
                wins: t.wins,
                losses,
                win_rate: (t.wins as f64 * 100.0 / t.games as f64).round() as i64,
                kda: kda(t.kills, t.deaths, t.assists),
                avg_kills: average(t.kills, t.games),
                avg_deaths: average(t.deaths, t.games),
                avg_assists: average(t.assists, t.games),
                avg_cs: (t.cs as f64 / t.games as f64).round() as i64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(champion: &str, win: bool, kills: i32, deaths: i32, assists: i32, cs: i32) -> MatchRecord {
        MatchRecord {
            puuid: "p1".into(),
            match_id: format!("EUW1_{kills}{deaths}{assists}"),
            queue_id: 420,
            game_mode: "CLASSIC".into(),
            game_duration: 1800,
            champion_name: champion.into(),
            win,
            kills,
            deaths,
            assists,
            kda: kda(kills.into(), deaths.into(), assists.into()),
            cs,
            vision: 10,
            spells: [4, 14],
            items: [0; 7],
            participants: Vec::new(),
        }
    }

    #[test]
    fn win_rate_rounds_and_stays_in_range() {
        assert_eq!(win_rate(0, 0), 0);
        assert_eq!(win_rate(1, 2), 33);
        assert_eq!(win_rate(2, 1), 67);
        assert_eq!(win_rate(1, 1), 50);
        assert_eq!(win_rate(10, 0), 100);
        assert_eq!(win_rate(0, 10), 0);

        for wins in 0..40 {
            for losses in 0..40 {
                let wr = win_rate(wins, losses);
                assert!((0..=100).contains(&wr), "{wins}/{losses} -> {wr}");
            }
        }
    }

    #[test]
    fn kda_clamps_zero_deaths_to_one() {
        assert_eq!(kda(10, 0, 5), 15.0);
        assert_eq!(kda(3, 4, 5), 2.0);
        assert_eq!(kda(2, 3, 0), 0.67);
    }

    #[test]
    fn match_ids_compare_numerically() {
        assert_eq!(compare_match_ids("EUW1_999", "EUW1_1000"), Ordering::Less);
        assert_eq!(compare_match_ids("EUW1_7", "EUW1_7"), Ordering::Equal);
        assert_eq!(compare_match_ids("7", "5"), Ordering::Greater);

        let mut ids = vec!["EUW1_10", "EUW1_9", "EUW1_100"];
        ids.sort_by(|a, b| compare_match_ids(b, a));
        assert_eq!(ids, vec!["EUW1_100", "EUW1_10", "EUW1_9"]);
    }

    #[test]
    fn aggregates_fold_per_champion() {
        let matches = vec![
            record("Ahri", true, 10, 0, 5, 200),
            record("Ahri", false, 2, 4, 6, 150),
            record("Ahri", true, 6, 2, 1, 181),
            record("Zed", false, 1, 9, 0, 90),
        ];

        let aggregates = aggregate_champions(&matches);
        assert_eq!(aggregates.len(), 2);

        let ahri = &aggregates[0];
        assert_eq!(ahri.champion_name, "Ahri");
        assert_eq!(ahri.matches_played, 3);
        assert_eq!(ahri.wins, 2);
        assert_eq!(ahri.losses, 1);
        assert_eq!(ahri.win_rate, 67);
        // (18 + 12) / 6
        assert_eq!(ahri.kda, 5.0);
        assert_eq!(ahri.avg_kills, 6.0);
        assert_eq!(ahri.avg_deaths, 2.0);
        assert_eq!(ahri.avg_assists, 4.0);
        assert_eq!(ahri.avg_cs, 177);

        let zed = &aggregates[1];
        assert_eq!(zed.win_rate, 0);
        assert_eq!(zed.kda, 0.11);
    }

    #[test]
    fn aggregate_with_no_deaths_uses_one() {
        let aggregates = aggregate_champions(&[record("Lux", true, 10, 0, 5, 100)]);
        assert_eq!(aggregates[0].kda, 15.0);
    }
}
