// Squad construction: roster state, constraint checks, and analytics.

pub mod composition;
pub mod lineup;
pub mod roster;
pub mod validator;

pub use composition::{Composition, Gap, GapPriority};
pub use lineup::{KeeperEligibility, Lineup, NameHintKeeper};
pub use roster::{BudgetSummary, SavedSquad, Squad};
pub use validator::Rejection;
