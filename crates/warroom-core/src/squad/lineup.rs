// Keeper detection and the greedy best-XI projection.

use serde::Serialize;

use crate::player::{PlayerStatRecord, Role};
use crate::valuation::ValuedPlayer;

/// Players in a starting lineup.
pub const LINEUP_SIZE: usize = 11;

const OPENERS: usize = 2;
const MIDDLE_ORDER: usize = 3;
const ALL_ROUNDERS: usize = 2;

// ---------------------------------------------------------------------------
// Keeper eligibility
// ---------------------------------------------------------------------------

/// Decides whether a player can keep wicket.
pub trait KeeperEligibility {
    fn is_keeper(&self, player: &PlayerStatRecord) -> bool;
}

/// Default keeper check: the record's explicit flag when it has one,
/// otherwise a case-insensitive substring match of the name against a hint
/// list.
#[derive(Debug, Clone, PartialEq)]
pub struct NameHintKeeper {
    hints: Vec<String>,
}

impl NameHintKeeper {
    pub fn new<I, S>(hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NameHintKeeper {
            hints: hints
                .into_iter()
                .map(|h| h.as_ref().trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }
}

impl Default for NameHintKeeper {
    fn default() -> Self {
        NameHintKeeper::new(["pant", "samson", "kishan", "dhoni"])
    }
}

impl KeeperEligibility for NameHintKeeper {
    fn is_keeper(&self, player: &PlayerStatRecord) -> bool {
        if let Some(flag) = player.wicket_keeper {
            return flag;
        }
        let name = player.name.to_lowercase();
        self.hints.iter().any(|hint| name.contains(hint.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Best XI
// ---------------------------------------------------------------------------

/// Slot-by-slot projection of the strongest XI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup<'a> {
    pub keeper: Option<&'a PlayerStatRecord>,
    pub openers: Vec<&'a PlayerStatRecord>,
    pub middle_order: Vec<&'a PlayerStatRecord>,
    pub all_rounders: Vec<&'a PlayerStatRecord>,
    pub bowlers: Vec<&'a PlayerStatRecord>,
    pub overseas_count: usize,
    /// Overseas count within the lineup cap. A failing lineup is reported,
    /// never repaired.
    pub is_valid: bool,
    pub total_players: usize,
}

impl<'a> Lineup<'a> {
    /// Every selected player, keeper first.
    pub fn players(&self) -> impl Iterator<Item = &'a PlayerStatRecord> + '_ {
        self.keeper
            .into_iter()
            .chain(self.openers.iter().copied())
            .chain(self.middle_order.iter().copied())
            .chain(self.all_rounders.iter().copied())
            .chain(self.bowlers.iter().copied())
    }
}

/// Greedy single-pass XI selection.
///
/// Keeper is the first eligible batting player in squad order. Openers and
/// middle order are the top batsmen by WAR, then the top two all-rounders,
/// then bowlers by WAR until the lineup is full. Each player fills at most
/// one slot. Returns `None` for squads smaller than eleven.
pub fn best_lineup<'a>(
    entries: &'a [ValuedPlayer],
    keeper: &dyn KeeperEligibility,
    max_overseas: usize,
) -> Option<Lineup<'a>> {
    if entries.len() < LINEUP_SIZE {
        return None;
    }

    let chosen_keeper = entries
        .iter()
        .find(|p| p.record.batting.is_some() && keeper.is_keeper(&p.record));
    let keeper_id = chosen_keeper.map(ValuedPlayer::id);

    let by_war = |role: Role| -> Vec<&'a ValuedPlayer> {
        let mut pool: Vec<&ValuedPlayer> = entries
            .iter()
            .filter(|p| p.record.role == role && Some(p.id()) != keeper_id)
            .collect();
        // Stable: equal WAR keeps squad order.
        pool.sort_by(|a, b| b.valuation.war.total_cmp(&a.valuation.war));
        pool
    };

    let batsmen = by_war(Role::Batsman);
    let openers: Vec<&PlayerStatRecord> = batsmen.iter().take(OPENERS).map(|p| &p.record).collect();
    let middle_order: Vec<&PlayerStatRecord> = batsmen
        .iter()
        .skip(OPENERS)
        .take(MIDDLE_ORDER)
        .map(|p| &p.record)
        .collect();
    let all_rounders: Vec<&PlayerStatRecord> = by_war(Role::AllRounder)
        .into_iter()
        .take(ALL_ROUNDERS)
        .map(|p| &p.record)
        .collect();

    let filled = usize::from(chosen_keeper.is_some()) + openers.len() + middle_order.len() + all_rounders.len();
    let bowlers: Vec<&PlayerStatRecord> = by_war(Role::Bowler)
        .into_iter()
        .take(LINEUP_SIZE.saturating_sub(filled))
        .map(|p| &p.record)
        .collect();

    let mut lineup = Lineup {
        keeper: chosen_keeper.map(|p| &p.record),
        openers,
        middle_order,
        all_rounders,
        bowlers,
        overseas_count: 0,
        is_valid: false,
        total_players: 0,
    };
    lineup.overseas_count = lineup.players().filter(|p| p.is_overseas()).count();
    lineup.total_players = lineup.players().count();
    lineup.is_valid = lineup.overseas_count <= max_overseas;
    Some(lineup)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
