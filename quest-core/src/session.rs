//! GameSession - the primary public API for playing a quest.
//!
//! This module wraps the GameWorld and the RulesEngine behind a single
//! entry point. Every player intent goes through [`GameSession::perform`],
//! which resolves it, applies the resulting effects and reports back.

use crate::items::CatalogId;
use crate::rules::{apply_effects, Action, Effect, Intent, Outcome, RuleError, RulesEngine};
use crate::world::{Ending, GameStatus, GameWorld, Snapshot};
use log::{debug, warn};
use thiserror::Error;

/// Errors from GameSession operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("the game is over ({0:?})")]
    GameOver(Ending),
}

/// Configuration for creating a new game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Player name.
    pub player_name: String,
}

impl SessionConfig {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
        }
    }

    /// Set the player name.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("Adventurer")
    }
}

/// Response from a player intent.
#[derive(Debug, Clone)]
pub struct Response {
    /// One-line summary of what happened.
    pub narrative: String,

    /// Effects that were applied to the game world.
    pub effects: Vec<Effect>,

    /// What the intent produced, for the front end to render.
    pub outcome: Outcome,

    /// Set when this intent ended the game.
    pub ending: Option<Ending>,
}

/// A single playthrough.
pub struct GameSession {
    world: GameWorld,
    rules: RulesEngine,
}

impl GameSession {
    /// Start a new game: the player is in the village with full health,
    /// starting gold and nothing in their pack.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_world(GameWorld::new(config.player_name))
    }

    /// Create a session around an existing world.
    pub fn with_world(world: GameWorld) -> Self {
        Self {
            world,
            rules: RulesEngine::new(),
        }
    }

    /// Resolve an intent and apply its effects.
    ///
    /// A rejected intent leaves the world untouched. Once the game has
    /// ended every intent is rejected with [`SessionError::GameOver`].
    pub fn perform(&mut self, intent: Intent) -> Result<Response, SessionError> {
        if let GameStatus::Ended(ending) = self.world.status() {
            warn!("rejected {intent:?}: game already ended");
            return Err(SessionError::GameOver(ending));
        }

        let resolution = self.rules.resolve(&self.world, intent).map_err(|e| {
            warn!("rejected intent: {e}");
            e
        })?;

        apply_effects(&mut self.world, &resolution.effects);
        debug!(
            "applied {} effects, player now at {} health and {} gold",
            resolution.effects.len(),
            self.world.player.health(),
            self.world.player.gold()
        );

        Ok(Response {
            narrative: resolution.narrative,
            effects: resolution.effects,
            outcome: resolution.outcome,
            ending: self.world.status().ending(),
        })
    }

    pub fn travel(&mut self, action: Action) -> Result<Response, SessionError> {
        self.perform(Intent::Move(action))
    }

    pub fn fight(&mut self, dragon: bool) -> Result<Response, SessionError> {
        self.perform(Intent::Fight { dragon })
    }

    /// Use the inventory entry at a zero-based position.
    pub fn use_item(&mut self, index: usize) -> Result<Response, SessionError> {
        self.perform(Intent::UseItem { index })
    }

    pub fn purchase(&mut self, item: CatalogId) -> Result<Response, SessionError> {
        self.perform(Intent::Purchase { item })
    }

    pub fn check_status(&mut self) -> Result<Response, SessionError> {
        self.perform(Intent::CheckStatus)
    }

    pub fn quit(&mut self) -> Result<Response, SessionError> {
        self.perform(Intent::Quit)
    }

    /// Get a reference to the game world.
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Get a mutable reference to the game world.
    ///
    /// Use with caution - direct modifications bypass the rules engine.
    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn snapshot(&self) -> Snapshot {
        self.world.snapshot()
    }

    pub fn status(&self) -> GameStatus {
        self.world.status()
    }

    pub fn is_over(&self) -> bool {
        self.world.is_over()
    }

    pub fn player_name(&self) -> &str {
        self.world.player.name()
    }
}
