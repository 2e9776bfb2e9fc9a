// Season normalization of cumulative career figures.
//
// Career totals span a varying number of seasons. Every counting stat is
// scaled by `matches_per_season / matches` so players with different
// experience lengths are compared on one season's production. Rate stats
// (strike rate, economy) are already per-ball/per-over and pass through.

use crate::player::{BattingCareer, BowlingCareer, Discipline, InvalidStatsError};

/// One season's worth of batting production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonBatting {
    pub runs: f64,
    pub fours: f64,
    pub sixes: f64,
    pub strike_rate: f64,
    pub runs_in_wins: f64,
    pub high_pressure_runs: f64,
}

impl SeasonBatting {
    pub fn boundaries(&self) -> f64 {
        self.fours + self.sixes
    }
}

/// One season's worth of bowling production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonBowling {
    pub overs: f64,
    pub economy: f64,
    pub wickets: f64,
    pub death_overs: f64,
    pub death_economy: f64,
    pub powerplay_wickets: f64,
}

/// Scale factor from a career of `matches` to one season.
fn season_factor(
    player_id: &str,
    discipline: Discipline,
    matches: u32,
    matches_per_season: u32,
) -> Result<f64, InvalidStatsError> {
    if matches == 0 {
        return Err(InvalidStatsError::ZeroMatches {
            player_id: player_id.to_string(),
            discipline,
        });
    }
    Ok(matches_per_season as f64 / matches as f64)
}

/// Normalize a batting career to one season of `matches_per_season` matches.
pub fn normalize_batting(
    player_id: &str,
    career: &BattingCareer,
    matches_per_season: u32,
) -> Result<SeasonBatting, InvalidStatsError> {
    let k = season_factor(player_id, Discipline::Batting, career.matches, matches_per_season)?;
    Ok(SeasonBatting {
        runs: career.runs as f64 * k,
        fours: career.fours as f64 * k,
        sixes: career.sixes as f64 * k,
        strike_rate: career.strike_rate,
        runs_in_wins: career.runs_in_wins as f64 * k,
        high_pressure_runs: career.high_pressure_runs as f64 * k,
    })
}

/// Normalize a bowling career to one season of `matches_per_season` matches.
pub fn normalize_bowling(
    player_id: &str,
    career: &BowlingCareer,
    matches_per_season: u32,
) -> Result<SeasonBowling, InvalidStatsError> {
    let k = season_factor(player_id, Discipline::Bowling, career.matches, matches_per_season)?;
    Ok(SeasonBowling {
        overs: career.overs * k,
        economy: career.economy,
        wickets: career.wickets as f64 * k,
        death_overs: career.death_overs * k,
        death_economy: career.death_economy,
        powerplay_wickets: career.powerplay_wickets as f64 * k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn five_seasons_scale_to_one() {
        let career = BattingCareer {
            matches: 70,
            runs: 2100,
            fours: 200,
            sixes: 90,
            strike_rate: 142.5,
            runs_in_wins: 1400,
            high_pressure_runs: 350,
        };
        let season = normalize_batting("p", &career, 14).unwrap();
        assert!(approx_eq(season.runs, 420.0, 1e-9));
        assert!(approx_eq(season.boundaries(), 58.0, 1e-9));
        assert!(approx_eq(season.runs_in_wins, 280.0, 1e-9));
        assert!(approx_eq(season.high_pressure_runs, 70.0, 1e-9));
        assert_eq!(season.strike_rate, 142.5);
    }

    #[test]
    fn short_career_scales_up() {
        let career = BowlingCareer {
            matches: 7,
            overs: 26.0,
            economy: 7.8,
            wickets: 9,
            death_overs: 6.0,
            death_economy: 9.5,
            powerplay_wickets: 3,
        };
        let season = normalize_bowling("p", &career, 14).unwrap();
        assert!(approx_eq(season.overs, 52.0, 1e-9));
        assert!(approx_eq(season.wickets, 18.0, 1e-9));
        assert!(approx_eq(season.death_overs, 12.0, 1e-9));
        assert!(approx_eq(season.powerplay_wickets, 6.0, 1e-9));
        assert_eq!(season.economy, 7.8);
        assert_eq!(season.death_economy, 9.5);
    }

    #[test]
    fn zero_matches_fails_instead_of_dividing() {
        let career = BowlingCareer {
            matches: 0,
            overs: 10.0,
            economy: 8.0,
            wickets: 2,
            death_overs: 0.0,
            death_economy: 0.0,
            powerplay_wickets: 0,
        };
        let err = normalize_bowling("zero-guy", &career, 14).unwrap_err();
        assert_eq!(err.player_id(), "zero-guy");
        assert!(matches!(
            err,
            InvalidStatsError::ZeroMatches {
                discipline: Discipline::Bowling,
                ..
            }
        ));
    }
}
