//! Game world types.
//!
//! Contains all types for representing game state: items and the inventory
//! that owns them, the player, the fixed set of locations, encounter
//! parameters, and the read-only snapshot handed to the front end.

use log::error;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Health never rises above this value.
pub const MAX_HEALTH: u32 = 100;

/// Health a new player starts with.
pub const STARTING_HEALTH: u32 = 100;

/// Gold a new player starts with.
pub const STARTING_GOLD: u32 = 20;

// ============================================================================
// Items
// ============================================================================

/// What an item is for. Decides how its `effect` value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// `effect` is the amount of health restored.
    Potion,
    /// `effect` is the damage dealt.
    Weapon,
    /// `effect` is the damage prevented.
    Armor,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Potion => "potion",
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A catalog template, or the player's own copy of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    /// Price in gold.
    pub cost: u32,
    pub effect: u32,
    pub description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind, cost: u32, effect: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            cost,
            effect,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Errors from positional inventory access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("no item at position {index} (inventory holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The items a player owns, in the order they were acquired.
///
/// Entries never stack: two swords are two entries, and removing one leaves
/// the other in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the end of the inventory.
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove exactly the entry at `index`, shifting later entries down.
    pub fn remove_at(&mut self, index: usize) -> Result<Item, InventoryError> {
        if index >= self.items.len() {
            return Err(InventoryError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn get(&self, index: usize) -> Result<&Item, InventoryError> {
        self.items.get(index).ok_or(InventoryError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// All entries of the given kind, in acquisition order.
    pub fn items_of_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(move |i| i.kind == kind)
    }

    /// The entry of the given kind with the highest effect.
    /// Ties go to the entry acquired first.
    pub fn best_of_kind(&self, kind: ItemKind) -> Option<&Item> {
        self.items_of_kind(kind)
            .reduce(|best, item| if item.effect > best.effect { item } else { best })
    }

    pub fn has_kind(&self, kind: ItemKind) -> bool {
        self.items.iter().any(|i| i.kind == kind)
    }

    /// Check for a specific item of a specific kind.
    pub fn has_named(&self, kind: ItemKind, name: &str) -> bool {
        self.items.iter().any(|i| i.kind == kind && i.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Player
// ============================================================================

/// Apply a health change to `current`, clamped to `0..=MAX_HEALTH`.
pub fn clamp_health(current: u32, delta: i32) -> u32 {
    (i64::from(current) + i64::from(delta)).clamp(0, i64::from(MAX_HEALTH)) as u32
}

/// The player: the only mutable state in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    health: u32,
    gold: u32,
    location: Location,
    inventory: Inventory,
}

impl Player {
    /// A fresh player in the village with full health, starting gold and no items.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: STARTING_HEALTH,
            gold: STARTING_GOLD,
            location: Location::Village,
            inventory: Inventory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Change health by `delta` and return the new value.
    ///
    /// Every health change in the game goes through here, so the
    /// `0..=MAX_HEALTH` bound holds after any sequence of calls.
    pub fn adjust_health(&mut self, delta: i32) -> u32 {
        self.health = clamp_health(self.health, delta);
        self.health
    }

    /// Change gold by `delta` and return the new total.
    ///
    /// Callers check affordability first. A call that would go below zero is
    /// a bug: it trips a debug assertion and otherwise leaves gold unchanged.
    pub fn adjust_gold(&mut self, delta: i32) -> u32 {
        match self.gold.checked_add_signed(delta) {
            Some(total) => self.gold = total,
            None => {
                debug_assert!(false, "gold would go negative: {} + {delta}", self.gold);
                error!("ignored gold change of {delta} with only {} gold", self.gold);
            }
        }
        self.gold
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

// ============================================================================
// Locations
// ============================================================================

/// The places the player can be. The village is the hub; everything else
/// leads back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Location {
    #[default]
    Village,
    Blacksmith,
    Market,
    Forest,
    Mountains,
}

impl Location {
    pub fn name(&self) -> &'static str {
        match self {
            Location::Village => "village",
            Location::Blacksmith => "blacksmith",
            Location::Market => "market",
            Location::Forest => "forest",
            Location::Mountains => "mountains",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Location::Village => {
                "You're in a bustling village. The blacksmith and market are nearby."
            }
            Location::Blacksmith => {
                "The heat from the forge fills the air. Weapons and armor line the walls."
            }
            Location::Market => {
                "Merchants sell their wares from colorful stalls. A potion seller catches your eye."
            }
            Location::Forest => {
                "The forest is dark and foreboding. You hear strange noises all around you."
            }
            Location::Mountains => "The mountains are treacherous. The dragon awaits!",
        }
    }

    pub fn all() -> [Location; 5] {
        [
            Location::Village,
            Location::Blacksmith,
            Location::Market,
            Location::Forest,
            Location::Mountains,
        ]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Encounters
// ============================================================================

/// Something the player can fight.
///
/// `health` is part of the encounter's description but plays no part in the
/// outcome: every fight is settled in a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Foe {
    Monster,
    Dragon,
}

impl Foe {
    pub fn from_is_dragon(is_dragon: bool) -> Self {
        if is_dragon {
            Foe::Dragon
        } else {
            Foe::Monster
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Foe::Monster => "monster",
            Foe::Dragon => "dragon",
        }
    }

    /// Damage dealt to an unarmored player.
    pub fn damage(&self) -> u32 {
        match self {
            Foe::Monster => 10,
            Foe::Dragon => 20,
        }
    }

    pub fn health(&self) -> u32 {
        match self {
            Foe::Monster => 20,
            Foe::Dragon => 50,
        }
    }

    /// Gold paid out for a victory.
    pub fn reward(&self) -> u32 {
        match self {
            Foe::Monster => 10,
            Foe::Dragon => 100,
        }
    }

    pub fn is_dragon(&self) -> bool {
        matches!(self, Foe::Dragon)
    }
}

impl fmt::Display for Foe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Game World
// ============================================================================

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// The dragon was defeated.
    Victory,
    /// Health reached zero.
    Defeat,
    /// The player walked away.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameStatus {
    #[default]
    Running,
    Ended(Ending),
}

impl GameStatus {
    pub fn ending(&self) -> Option<Ending> {
        match self {
            GameStatus::Running => None,
            GameStatus::Ended(ending) => Some(*ending),
        }
    }
}

/// The complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWorld {
    pub player: Player,
    status: GameStatus,
}

impl GameWorld {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player: Player::new(player_name),
            status: GameStatus::Running,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Ended(_))
    }

    /// Record a terminal condition. The first one recorded sticks.
    pub(crate) fn end(&mut self, ending: Ending) {
        if self.status == GameStatus::Running {
            self.status = GameStatus::Ended(ending);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.player.name().to_string(),
            health: self.player.health(),
            gold: self.player.gold(),
            location: self.player.location(),
            inventory: self
                .player
                .inventory()
                .iter()
                .map(|item| ItemView {
                    name: item.name.clone(),
                    description: item.description.clone(),
                    kind: item.kind,
                })
                .collect(),
            status: self.status,
        }
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Read-only view of the game for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub health: u32,
    pub gold: u32,
    pub location: Location,
    pub inventory: Vec<ItemView>,
    pub status: GameStatus,
}

/// An inventory entry as the front end sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
}
