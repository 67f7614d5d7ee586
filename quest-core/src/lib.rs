//! Game engine for The Dragon's Quest, a small text adventure.
//!
//! This crate provides:
//! - Player state with a bounded health pool, gold and an ordered inventory
//! - A fixed item catalog and the shops that sell it
//! - Intent/Effect rules system for deterministic game state
//! - Single-exchange combat against monsters and the dragon
//!
//! # Quick Start
//!
//! ```
//! use quest_core::{Action, GameSession, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::new("Aria"));
//!
//! let response = session.travel(Action::GoMarket).unwrap();
//! println!("{}", response.narrative);
//! assert_eq!(session.snapshot().gold, 20);
//! ```

pub mod items;
pub mod rules;
pub mod session;
pub mod testing;
pub mod world;

// Primary public API
pub use items::{CatalogId, ShopError};
pub use rules::{
    Action, CombatOutcome, CombatReport, Effect, Intent, ItemUse, Outcome, RetreatReason,
    RuleError, RulesEngine,
};
pub use session::{GameSession, Response, SessionConfig, SessionError};
pub use testing::TestHarness;
pub use world::{
    Ending, Foe, GameStatus, GameWorld, Inventory, InventoryError, Item, ItemKind, ItemView,
    Location, Player, Snapshot,
};
