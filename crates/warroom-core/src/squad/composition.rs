// Squad composition counts and positional gap diagnostics.

use std::fmt;

use serde::Serialize;

use crate::player::{Nationality, Role};
use crate::squad::lineup::KeeperEligibility;
use crate::valuation::ValuedPlayer;

/// Headcounts by nationality class and role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub total: usize,
    pub domestic: usize,
    pub overseas: usize,
    pub batsmen: usize,
    pub bowlers: usize,
    pub all_rounders: usize,
}

pub fn composition(entries: &[ValuedPlayer]) -> Composition {
    let mut c = Composition {
        total: entries.len(),
        ..Composition::default()
    };
    for p in entries {
        match p.record.nationality {
            Nationality::Domestic => c.domestic += 1,
            Nationality::Overseas => c.overseas += 1,
        }
        match p.record.role {
            Role::Batsman => c.batsmen += 1,
            Role::Bowler => c.bowlers += 1,
            Role::AllRounder => c.all_rounders += 1,
        }
    }
    c
}

// ---------------------------------------------------------------------------
// Gaps
// ---------------------------------------------------------------------------

/// Severity of a positional gap. Declaration order is severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GapPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl GapPriority {
    pub fn label(&self) -> &'static str {
        match self {
            GapPriority::Critical => "CRITICAL",
            GapPriority::High => "HIGH",
            GapPriority::Medium => "MEDIUM",
            GapPriority::Low => "LOW",
        }
    }
}

impl fmt::Display for GapPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A positional need the squad does not yet cover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub priority: GapPriority,
    pub category: &'static str,
    pub current: usize,
    pub needed: usize,
    pub description: &'static str,
}

/// A positional need: how many squad members must satisfy `qualifies`.
struct NeedRule {
    priority: GapPriority,
    category: &'static str,
    needed: usize,
    description: &'static str,
    qualifies: fn(&ValuedPlayer, &dyn KeeperEligibility) -> bool,
}

const NEED_RULES: &[NeedRule] = &[
    NeedRule {
        priority: GapPriority::Critical,
        category: "Death Bowling",
        needed: 2,
        description: "Need specialist death bowlers",
        qualifies: |p, _| p.record.bowling.as_ref().is_some_and(|b| b.death_overs > 30.0),
    },
    NeedRule {
        priority: GapPriority::High,
        category: "Opening Batsmen",
        needed: 2,
        description: "Need quality opening batsmen",
        qualifies: |p, _| p.record.batting.as_ref().is_some_and(|b| b.strike_rate > 130.0),
    },
    NeedRule {
        priority: GapPriority::Medium,
        category: "Spin Bowling",
        needed: 2,
        description: "Need quality spinners",
        qualifies: |p, _| {
            p.record.role == Role::Bowler && p.record.bowling.as_ref().is_some_and(|b| b.economy < 8.0)
        },
    },
    NeedRule {
        priority: GapPriority::Medium,
        category: "All-Rounders",
        needed: 2,
        description: "Need all-round options for balance",
        qualifies: |p, _| p.record.role == Role::AllRounder,
    },
    NeedRule {
        priority: GapPriority::Critical,
        category: "Wicket-Keeper",
        needed: 1,
        description: "Need at least one keeper-batsman",
        qualifies: |p, keeper| p.record.batting.is_some() && keeper.is_keeper(&p.record),
    },
];

/// Every unmet need, most severe first. Needs of equal severity keep their
/// rule-table order.
pub fn gaps(entries: &[ValuedPlayer], keeper: &dyn KeeperEligibility) -> Vec<Gap> {
    let found = NEED_RULES.iter().filter_map(|rule| {
        let current = entries.iter().filter(|p| (rule.qualifies)(p, keeper)).count();
        (current < rule.needed).then_some(Gap {
            priority: rule.priority,
            category: rule.category,
            current,
            needed: rule.needed,
            description: rule.description,
        })
    });
    sort_by_priority(found.collect())
}

/// Stable sort by severity.
pub fn sort_by_priority(mut gaps: Vec<Gap>) -> Vec<Gap> {
    gaps.sort_by_key(|g| g.priority);
    gaps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
