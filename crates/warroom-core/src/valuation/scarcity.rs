// Market-scarcity multiplier.
//
// A premium or discount reflecting how rare a skill profile is in the auction
// pool, independent of raw performance. Rules are evaluated in table order
// and the first match wins; matches never accumulate.

use serde::Deserialize;

use crate::player::{Nationality, PlayerStatRecord, Role};

/// Multiplier for players no rule matches.
pub const DEFAULT_SCARCITY: f64 = 1.0;

/// One row of the scarcity table.
///
/// Every populated condition must hold for the rule to match. Skill
/// thresholds read raw career figures and never match a player who lacks the
/// relevant career block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScarcityRule {
    pub label: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub nationality: Option<Nationality>,
    #[serde(default)]
    pub death_overs_above: Option<f64>,
    #[serde(default)]
    pub wickets_above: Option<u32>,
    #[serde(default)]
    pub strike_rate_above: Option<f64>,
    pub multiplier: f64,
}

impl ScarcityRule {
    fn new(label: &str, multiplier: f64) -> Self {
        ScarcityRule {
            label: label.to_string(),
            role: None,
            nationality: None,
            death_overs_above: None,
            wickets_above: None,
            strike_rate_above: None,
            multiplier,
        }
    }

    pub fn matches(&self, player: &PlayerStatRecord) -> bool {
        if self.role.is_some_and(|r| r != player.role) {
            return false;
        }
        if self.nationality.is_some_and(|n| n != player.nationality) {
            return false;
        }
        if let Some(min) = self.death_overs_above {
            if !player.bowling.as_ref().is_some_and(|b| b.death_overs > min) {
                return false;
            }
        }
        if let Some(min) = self.wickets_above {
            if !player.bowling.as_ref().is_some_and(|b| b.wickets > min) {
                return false;
            }
        }
        if let Some(min) = self.strike_rate_above {
            if !player.batting.as_ref().is_some_and(|b| b.strike_rate > min) {
                return false;
            }
        }
        true
    }
}

/// The first rule matching `player`, if any.
pub fn matching_rule<'a>(rules: &'a [ScarcityRule], player: &PlayerStatRecord) -> Option<&'a ScarcityRule> {
    rules.iter().find(|rule| rule.matches(player))
}

/// Scarcity multiplier for `player` under `rules`.
pub fn scarcity_multiplier(rules: &[ScarcityRule], player: &PlayerStatRecord) -> f64 {
    matching_rule(rules, player)
        .map(|rule| rule.multiplier)
        .unwrap_or(DEFAULT_SCARCITY)
}

/// The shipped rule table, highest priority first.
pub fn default_rules() -> Vec<ScarcityRule> {
    vec![
        ScarcityRule {
            nationality: Some(Nationality::Domestic),
            death_overs_above: Some(50.0),
            ..ScarcityRule::new("Domestic death-overs specialist", 1.5)
        },
        ScarcityRule {
            death_overs_above: Some(50.0),
            ..ScarcityRule::new("Death-overs specialist", 1.3)
        },
        ScarcityRule {
            role: Some(Role::Bowler),
            nationality: Some(Nationality::Domestic),
            wickets_above: Some(40),
            ..ScarcityRule::new("Domestic strike bowler", 1.4)
        },
        ScarcityRule {
            role: Some(Role::Batsman),
            nationality: Some(Nationality::Domestic),
            strike_rate_above: Some(140.0),
            ..ScarcityRule::new("Domestic power hitter", 1.35)
        },
        ScarcityRule {
            role: Some(Role::Bowler),
            wickets_above: Some(45),
            ..ScarcityRule::new("High-volume wicket taker", 1.25)
        },
        ScarcityRule {
            role: Some(Role::AllRounder),
            nationality: Some(Nationality::Domestic),
            ..ScarcityRule::new("Domestic all-rounder", 1.3)
        },
        ScarcityRule {
            role: Some(Role::AllRounder),
            nationality: Some(Nationality::Overseas),
            ..ScarcityRule::new("Overseas all-rounder", 0.95)
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{BattingCareer, BowlingCareer};

    fn bowler(nationality: Nationality, wickets: u32, death_overs: f64) -> PlayerStatRecord {
        PlayerStatRecord {
            id: "bw".into(),
            name: "Bowler".into(),
            team: "CHE".into(),
            role: Role::Bowler,
            nationality,
            age: 28,
            batting: None,
            bowling: Some(BowlingCareer {
                matches: 60,
                overs: 220.0,
                economy: 7.9,
                wickets,
                death_overs,
                death_economy: 9.0,
                powerplay_wickets: 10,
            }),
            wicket_keeper: None,
        }
    }

    fn batsman(nationality: Nationality, strike_rate: f64) -> PlayerStatRecord {
        PlayerStatRecord {
            id: "bt".into(),
            name: "Batsman".into(),
            team: "KOL".into(),
            role: Role::Batsman,
            nationality,
            age: 26,
            batting: Some(BattingCareer {
                matches: 40,
                runs: 1100,
                fours: 90,
                sixes: 50,
                strike_rate,
                runs_in_wins: 500,
                high_pressure_runs: 150,
            }),
            bowling: None,
            wicket_keeper: None,
        }
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        let rules = default_rules();
        // Matches death-specialist (1.5), domestic strike bowler (1.4) and
        // high-volume wicket taker (1.25): only the first counts.
        let p = bowler(Nationality::Domestic, 70, 80.0);
        assert_eq!(scarcity_multiplier(&rules, &p), 1.5);
        assert_eq!(matching_rule(&rules, &p).unwrap().label, "Domestic death-overs specialist");
    }

    #[test]
    fn overseas_death_specialist_gets_lower_premium() {
        let rules = default_rules();
        let p = bowler(Nationality::Overseas, 70, 80.0);
        assert_eq!(scarcity_multiplier(&rules, &p), 1.3);
    }

    #[test]
    fn reordering_the_table_changes_the_winner() {
        let mut rules = default_rules();
        let p = bowler(Nationality::Domestic, 70, 10.0);
        assert_eq!(scarcity_multiplier(&rules, &p), 1.4);

        // Move the wicket-taker rule above the domestic strike bowler rule.
        let wicket_taker = rules.remove(4);
        rules.insert(2, wicket_taker);
        assert_eq!(scarcity_multiplier(&rules, &p), 1.25);
    }

    #[test]
    fn thresholds_are_strict() {
        let rules = default_rules();
        assert_eq!(scarcity_multiplier(&rules, &batsman(Nationality::Domestic, 140.0)), 1.0);
        assert_eq!(scarcity_multiplier(&rules, &batsman(Nationality::Domestic, 140.1)), 1.35);
        assert_eq!(scarcity_multiplier(&rules, &batsman(Nationality::Overseas, 170.0)), 1.0);
    }

    #[test]
    fn all_rounder_premium_and_discount() {
        let rules = default_rules();
        let mut p = batsman(Nationality::Domestic, 130.0);
        p.role = Role::AllRounder;
        p.bowling = bowler(Nationality::Domestic, 20, 5.0).bowling;
        assert_eq!(scarcity_multiplier(&rules, &p), 1.3);

        p.nationality = Nationality::Overseas;
        assert_eq!(scarcity_multiplier(&rules, &p), 0.95);
    }

    #[test]
    fn skill_threshold_needs_the_career_block() {
        let rule = ScarcityRule {
            wickets_above: Some(0),
            ..ScarcityRule::new("any wicket", 2.0)
        };
        assert!(!rule.matches(&batsman(Nationality::Domestic, 150.0)));
    }

    #[test]
    fn empty_table_defaults_to_one() {
        assert_eq!(scarcity_multiplier(&[], &batsman(Nationality::Domestic, 190.0)), 1.0);
    }

    #[test]
    fn rules_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Table {
            scarcity: Vec<ScarcityRule>,
        }
        let text = r#"
[[scarcity]]
label = "Domestic all-rounder"
role = "All-Rounder"
nationality = "Domestic"
multiplier = 1.3
"#;
        let table: Table = toml::from_str(text).unwrap();
        assert_eq!(table.scarcity, vec![default_rules()[5].clone()]);
    }
}
