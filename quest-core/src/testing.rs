//! Testing utilities for the quest engine.
//!
//! This module provides tools for integration testing:
//! - `TestHarness` for scripted game scenarios from a chosen starting state
//! - Assertion helpers for verifying game state

use crate::items::CatalogId;
use crate::rules::{Action, Intent, Outcome};
use crate::session::{GameSession, Response, SessionError};
use crate::world::{Ending, GameStatus, GameWorld, Location, STARTING_GOLD, STARTING_HEALTH};

/// Test harness for running game scenarios.
///
/// The setup methods write the world directly so a scenario can start
/// from any state. Everything after setup goes through the session.
pub struct TestHarness {
    pub session: GameSession,
}

impl TestHarness {
    /// Create a new test harness with a fresh player.
    pub fn new() -> Self {
        Self {
            session: GameSession::with_world(GameWorld::new("Test Hero")),
        }
    }

    /// Give the player copies of catalog items, in order.
    pub fn with_items(mut self, items: &[CatalogId]) -> Self {
        for id in items {
            self.world_mut()
                .player
                .inventory_mut()
                .add(id.template().clone());
        }
        self
    }

    pub fn with_gold(mut self, gold: u32) -> Self {
        let delta = gold as i32 - STARTING_GOLD as i32;
        self.world_mut().player.adjust_gold(delta);
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        let delta = health as i32 - STARTING_HEALTH as i32;
        self.world_mut().player.adjust_health(delta);
        self
    }

    /// Place the player somewhere without travelling.
    pub fn at(mut self, location: Location) -> Self {
        self.world_mut().player.set_location(location);
        self
    }

    fn world_mut(&mut self) -> &mut GameWorld {
        self.session.world_mut()
    }

    /// Perform an intent through the session.
    pub fn act(&mut self, intent: Intent) -> Result<Response, SessionError> {
        self.session.perform(intent)
    }

    /// Perform a move that is expected to be legal.
    #[track_caller]
    pub fn travel(&mut self, action: Action) -> Response {
        match self.session.travel(action) {
            Ok(response) => response,
            Err(e) => panic!("Expected to {action}, got error: {e}"),
        }
    }

    pub fn world(&self) -> &GameWorld {
        self.session.world()
    }

    pub fn health(&self) -> u32 {
        self.world().player.health()
    }

    pub fn gold(&self) -> u32 {
        self.world().player.gold()
    }

    pub fn location(&self) -> Location {
        self.world().player.location()
    }

    /// Names of inventory entries, in order.
    pub fn item_names(&self) -> Vec<String> {
        self.world()
            .player
            .inventory()
            .iter()
            .map(|i| i.name.clone())
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert player health and gold.
#[track_caller]
pub fn assert_vitals(harness: &TestHarness, health: u32, gold: u32) {
    assert_eq!(
        (harness.health(), harness.gold()),
        (health, gold),
        "Expected health {health} and gold {gold}, got {} and {}",
        harness.health(),
        harness.gold()
    );
}

/// Assert the inventory holds exactly these names, in order.
#[track_caller]
pub fn assert_items(harness: &TestHarness, names: &[&str]) {
    let actual = harness.item_names();
    assert_eq!(actual, names, "Unexpected inventory contents");
}

#[track_caller]
pub fn assert_at(harness: &TestHarness, location: Location) {
    assert_eq!(
        harness.location(),
        location,
        "Expected player to be at the {location}"
    );
}

#[track_caller]
pub fn assert_running(harness: &TestHarness) {
    assert_eq!(
        harness.world().status(),
        GameStatus::Running,
        "Expected the game to still be running"
    );
}

#[track_caller]
pub fn assert_ended(harness: &TestHarness, ending: Ending) {
    assert_eq!(
        harness.world().status(),
        GameStatus::Ended(ending),
        "Expected the game to end in {ending:?}"
    );
}

/// Assert a response carried a combat report, in either form.
#[track_caller]
pub fn assert_fought(response: &Response) {
    assert!(
        matches!(
            response.outcome,
            Outcome::Combat(_)
                | Outcome::Moved {
                    encounter: Some(_),
                    ..
                }
        ),
        "Expected a fight, got {:?}",
        response.outcome
    );
}
