//! Rules engine with the Intent/Effect system.
//!
//! This module implements the core game mechanic pipeline:
//! 1. The front end turns player input into an Intent
//! 2. RulesEngine resolves the Intent against the current GameWorld
//! 3. Effects are produced that describe state changes
//! 4. Effects are applied to the GameWorld
//!
//! Resolution never mutates the world. An intent that is rejected leaves
//! the game exactly as it was.

use crate::items::{self, CatalogId};
use crate::world::{
    clamp_health, Ending, Foe, GameWorld, InventoryError, Item, ItemKind, Location, Snapshot,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Health lost for challenging the dragon without proper gear.
pub const DRAGON_UNPREPARED_PENALTY: u32 = 30;

/// Health lost for retreating from a fight without a weapon.
pub const UNARMED_RETREAT_PENALTY: u32 = 20;

/// The only weapon good enough for the dragon.
pub const DRAGON_WEAPON: &str = "Steel Sword";

// ============================================================================
// Movement
// ============================================================================

/// A move along the location graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    GoBlacksmith,
    GoMarket,
    EnterForest,
    EnterMountains,
    /// Head back to the village.
    Return,
    /// Challenge the dragon. Only offered in the mountains.
    FightDragon,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GoBlacksmith => "go to the blacksmith",
            Action::GoMarket => "go to the market",
            Action::EnterForest => "enter the forest",
            Action::EnterMountains => "enter the mountains",
            Action::Return => "return to the village",
            Action::FightDragon => "fight the dragon",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where `action` leads from `from`, or `None` if it isn't possible there.
pub fn destination(from: Location, action: Action) -> Option<Location> {
    use Location::*;
    match (from, action) {
        (Village, Action::GoBlacksmith) => Some(Blacksmith),
        (Village, Action::GoMarket) => Some(Market),
        (Village, Action::EnterForest) => Some(Forest),
        (Village, Action::EnterMountains) => Some(Mountains),
        (Blacksmith | Market | Forest | Mountains, Action::Return) => Some(Village),
        (Mountains, Action::FightDragon) => Some(Mountains),
        _ => None,
    }
}

/// The moves available from a location.
pub fn available_actions(from: Location) -> &'static [Action] {
    match from {
        Location::Village => &[
            Action::GoBlacksmith,
            Action::GoMarket,
            Action::EnterForest,
            Action::EnterMountains,
        ],
        Location::Blacksmith | Location::Market | Location::Forest => &[Action::Return],
        Location::Mountains => &[Action::FightDragon, Action::Return],
    }
}

// ============================================================================
// Intents
// ============================================================================

/// An intent represents what the player wants to do.
/// The front end produces intents, the RulesEngine resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Move along the location graph. Entering the forest starts a fight.
    Move(Action),

    /// Fight where you stand
    Fight { dragon: bool },

    /// Use the inventory entry at a zero-based position
    UseItem { index: usize },

    /// Buy a copy of a catalog item from the local shop
    Purchase { item: CatalogId },

    CheckStatus,

    Quit,
}

// ============================================================================
// Effects
// ============================================================================

/// Effects are the result of resolving an intent.
/// They describe concrete state changes to apply to the GameWorld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Health changed (damage, penalty or healing)
    HealthChanged { amount: i32, new_health: u32 },

    GoldChanged {
        amount: i32,
        new_total: u32,
        reason: String,
    },

    ItemAdded { item: Item },

    /// The entry at `index` was removed
    ItemRemoved { index: usize, item_name: String },

    LocationChanged { from: Location, to: Location },

    /// A terminal condition was reached
    GameEnded { ending: Ending },
}

// ============================================================================
// Outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetreatReason {
    /// Took on the dragon without a Steel Sword and armor.
    Unprepared,
    /// Had no weapon at all.
    Unarmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Retreat(RetreatReason),
}

/// Everything that happened in one fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub foe: Foe,
    pub outcome: CombatOutcome,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    /// Damage the player's blow landed. Zero on a retreat.
    pub damage_dealt: u32,
    /// Damage the foe landed. Zero on a retreat.
    pub damage_taken: u32,
    /// Health lost by retreating. Zero on a victory.
    pub penalty: u32,
    pub gold_reward: u32,
}

impl CombatReport {
    pub fn is_victory(&self) -> bool {
        self.outcome == CombatOutcome::Victory
    }
}

/// What happened to a used item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemUse {
    /// A potion was drunk and consumed. `restored` is less than `amount`
    /// when healing was capped at full health.
    Healed {
        amount: u32,
        restored: u32,
        new_health: u32,
    },
    /// A weapon was readied. Nothing changes.
    Readied,
    /// The item has no use outside a fight.
    NoEffect,
}

/// The structured result of an intent, for the front end to narrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved {
        from: Location,
        to: Location,
        /// The fight that starts on arrival, if any.
        encounter: Option<CombatReport>,
    },
    Combat(CombatReport),
    ItemUsed { item: Item, result: ItemUse },
    Purchased { item: Item, gold_left: u32 },
    InsufficientFunds { item: Item, gold: u32 },
    Status(Snapshot),
    Quit,
}

/// The result of resolving an intent.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub effects: Vec<Effect>,
    pub narrative: String,
    pub outcome: Outcome,
}

impl Resolution {
    pub fn new(narrative: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            effects: Vec::new(),
            narrative: narrative.into(),
            outcome,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Why an intent was rejected. A rejected intent changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("cannot {action} from the {location}")]
    IllegalAction { action: Action, location: Location },

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{item} is not sold at the {location}")]
    NotSoldHere { item: CatalogId, location: Location },
}

// ============================================================================
// Rules Engine
// ============================================================================

/// The rules engine resolves intents into effects.
pub struct RulesEngine;

impl RulesEngine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an intent and produce effects.
    pub fn resolve(&self, world: &GameWorld, intent: Intent) -> Result<Resolution, RuleError> {
        let resolution = match intent {
            Intent::Move(action) => self.resolve_move(world, action)?,
            Intent::Fight { dragon } => self.resolve_fight(world, Foe::from_is_dragon(dragon)),
            Intent::UseItem { index } => self.resolve_use_item(world, index)?,
            Intent::Purchase { item } => self.resolve_purchase(world, item)?,
            Intent::CheckStatus => Resolution::new(
                format!("{} checks their status", world.player.name()),
                Outcome::Status(world.snapshot()),
            ),
            Intent::Quit => Resolution::new(
                format!("{} leaves the adventure", world.player.name()),
                Outcome::Quit,
            )
            .with_effect(Effect::GameEnded {
                ending: Ending::Quit,
            }),
        };
        debug!("{} ({} effects)", resolution.narrative, resolution.effects.len());
        Ok(resolution)
    }

    fn resolve_move(&self, world: &GameWorld, action: Action) -> Result<Resolution, RuleError> {
        let from = world.player.location();
        let to = destination(from, action).ok_or(RuleError::IllegalAction {
            action,
            location: from,
        })?;

        match action {
            Action::FightDragon => Ok(self.resolve_fight(world, Foe::Dragon)),
            Action::EnterForest => {
                let (report, effects) = self.resolve_combat(world, Foe::Monster);
                let narrative = format!(
                    "{} enters the {to} and a monster appears: {}",
                    world.player.name(),
                    combat_summary(&report)
                );
                Ok(Resolution::new(
                    narrative,
                    Outcome::Moved {
                        from,
                        to,
                        encounter: Some(report),
                    },
                )
                .with_effect(Effect::LocationChanged { from, to })
                .with_effects(effects))
            }
            _ => Ok(Resolution::new(
                format!("{} travels from the {from} to the {to}", world.player.name()),
                Outcome::Moved {
                    from,
                    to,
                    encounter: None,
                },
            )
            .with_effect(Effect::LocationChanged { from, to })),
        }
    }

    fn resolve_fight(&self, world: &GameWorld, foe: Foe) -> Resolution {
        let (report, effects) = self.resolve_combat(world, foe);
        Resolution::new(
            format!("{} fights the {foe}: {}", world.player.name(), combat_summary(&report)),
            Outcome::Combat(report),
        )
        .with_effects(effects)
    }

    /// Settle a fight in a single exchange.
    ///
    /// The best weapon and armor carried are used automatically. A fight
    /// without a weapon, or against the dragon without a Steel Sword and
    /// some armor, ends in a retreat with a health penalty instead.
    fn resolve_combat(&self, world: &GameWorld, foe: Foe) -> (CombatReport, Vec<Effect>) {
        let player = &world.player;
        let inventory = player.inventory();
        let weapon = inventory.best_of_kind(ItemKind::Weapon).cloned();
        let armor = inventory.best_of_kind(ItemKind::Armor).cloned();

        let prepared = inventory.has_named(ItemKind::Weapon, DRAGON_WEAPON)
            && inventory.has_kind(ItemKind::Armor);
        let retreat = if foe.is_dragon() && !prepared {
            Some((RetreatReason::Unprepared, DRAGON_UNPREPARED_PENALTY))
        } else if weapon.is_none() {
            Some((RetreatReason::Unarmed, UNARMED_RETREAT_PENALTY))
        } else {
            None
        };

        if let Some((reason, penalty)) = retreat {
            let amount = -(penalty as i32);
            let report = CombatReport {
                foe,
                outcome: CombatOutcome::Retreat(reason),
                weapon,
                armor,
                damage_dealt: 0,
                damage_taken: 0,
                penalty,
                gold_reward: 0,
            };
            let effects = vec![Effect::HealthChanged {
                amount,
                new_health: clamp_health(player.health(), amount),
            }];
            return (report, effects);
        }

        let damage_dealt = weapon.as_ref().map_or(0, |w| w.effect).max(1);
        let protection = armor.as_ref().map_or(0, |a| a.effect);
        let damage_taken = foe.damage().saturating_sub(protection).max(1);
        let amount = -(damage_taken as i32);
        let reward = foe.reward();

        let mut effects = Vec::new();
        // Slaying the dragon wins the game even when its last blow is fatal
        if foe.is_dragon() {
            effects.push(Effect::GameEnded {
                ending: Ending::Victory,
            });
        }
        effects.push(Effect::HealthChanged {
            amount,
            new_health: clamp_health(player.health(), amount),
        });
        effects.push(Effect::GoldChanged {
            amount: reward as i32,
            new_total: player.gold() + reward,
            reason: format!("defeating the {foe}"),
        });

        let report = CombatReport {
            foe,
            outcome: CombatOutcome::Victory,
            weapon,
            armor,
            damage_dealt,
            damage_taken,
            penalty: 0,
            gold_reward: reward,
        };
        (report, effects)
    }

    fn resolve_use_item(&self, world: &GameWorld, index: usize) -> Result<Resolution, RuleError> {
        let player = &world.player;
        let item = player.inventory().get(index)?.clone();

        let resolution = match item.kind {
            ItemKind::Potion => {
                let amount = item.effect as i32;
                let new_health = clamp_health(player.health(), amount);
                Resolution::new(
                    format!(
                        "{} drinks the {} (health now {new_health})",
                        player.name(),
                        item.name
                    ),
                    Outcome::ItemUsed {
                        item: item.clone(),
                        result: ItemUse::Healed {
                            amount: item.effect,
                            restored: new_health - player.health(),
                            new_health,
                        },
                    },
                )
                .with_effect(Effect::ItemRemoved {
                    index,
                    item_name: item.name.clone(),
                })
                .with_effect(Effect::HealthChanged { amount, new_health })
            }
            ItemKind::Weapon => Resolution::new(
                format!("{} readies the {} for battle", player.name(), item.name),
                Outcome::ItemUsed {
                    item,
                    result: ItemUse::Readied,
                },
            ),
            ItemKind::Armor => Resolution::new(
                format!("{} has no use for the {} right now", player.name(), item.name),
                Outcome::ItemUsed {
                    item,
                    result: ItemUse::NoEffect,
                },
            ),
        };
        Ok(resolution)
    }

    fn resolve_purchase(&self, world: &GameWorld, id: CatalogId) -> Result<Resolution, RuleError> {
        let player = &world.player;
        let location = player.location();
        if !items::sells(location, id) {
            return Err(RuleError::NotSoldHere { item: id, location });
        }

        let item = id.template().clone();
        let gold = player.gold();
        if gold < item.cost {
            return Ok(Resolution::new(
                format!(
                    "{} can't afford the {} ({} gold, has {gold})",
                    player.name(),
                    item.name,
                    item.cost
                ),
                Outcome::InsufficientFunds { item, gold },
            ));
        }

        let gold_left = gold - item.cost;
        Ok(Resolution::new(
            format!(
                "{} buys the {} for {} gold ({gold_left} left)",
                player.name(),
                item.name,
                item.cost
            ),
            Outcome::Purchased {
                item: item.clone(),
                gold_left,
            },
        )
        .with_effect(Effect::GoldChanged {
            amount: -(item.cost as i32),
            new_total: gold_left,
            reason: format!("buying the {}", item.name),
        })
        .with_effect(Effect::ItemAdded { item }))
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn combat_summary(report: &CombatReport) -> String {
    match report.outcome {
        CombatOutcome::Victory => format!(
            "victory, took {} damage and earned {} gold",
            report.damage_taken, report.gold_reward
        ),
        CombatOutcome::Retreat(RetreatReason::Unprepared) => {
            format!("retreated unprepared, lost {} health", report.penalty)
        }
        CombatOutcome::Retreat(RetreatReason::Unarmed) => {
            format!("retreated unarmed, lost {} health", report.penalty)
        }
    }
}

/// Apply effects to the game world.
pub fn apply_effects(world: &mut GameWorld, effects: &[Effect]) {
    for effect in effects {
        apply_effect(world, effect);
    }
}

/// Apply a single effect to the game world.
pub fn apply_effect(world: &mut GameWorld, effect: &Effect) {
    match effect {
        Effect::HealthChanged { amount, .. } => {
            let health = world.player.adjust_health(*amount);
            if world.player.is_dead() && !world.is_over() {
                info!("{} has fallen (health {health})", world.player.name());
                world.end(Ending::Defeat);
            }
        }
        Effect::GoldChanged { amount, .. } => {
            world.player.adjust_gold(*amount);
        }
        Effect::ItemAdded { item } => {
            world.player.inventory_mut().add(item.clone());
        }
        Effect::ItemRemoved { index, item_name } => {
            if let Err(e) = world.player.inventory_mut().remove_at(*index) {
                warn!("could not remove {item_name}: {e}");
            }
        }
        Effect::LocationChanged { to, .. } => {
            world.player.set_location(*to);
        }
        Effect::GameEnded { ending } => {
            if !world.is_over() {
                info!("game ended: {ending:?}");
            }
            world.end(*ending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(ids: &[CatalogId]) -> GameWorld {
        let mut world = GameWorld::new("Test Hero");
        for id in ids {
            world.player.inventory_mut().add(id.template().clone());
        }
        world
    }

    fn resolve_and_apply(world: &mut GameWorld, intent: Intent) -> Resolution {
        let resolution = RulesEngine::new().resolve(world, intent).unwrap();
        apply_effects(world, &resolution.effects);
        resolution
    }

    fn combat_report(resolution: &Resolution) -> &CombatReport {
        match &resolution.outcome {
            Outcome::Combat(report) => report,
            Outcome::Moved {
                encounter: Some(report),
                ..
            } => report,
            other => panic!("expected a fight, got {other:?}"),
        }
    }

    #[test]
    fn test_destinations() {
        use Location::*;
        assert_eq!(destination(Village, Action::GoBlacksmith), Some(Blacksmith));
        assert_eq!(destination(Village, Action::GoMarket), Some(Market));
        assert_eq!(destination(Village, Action::EnterForest), Some(Forest));
        assert_eq!(destination(Village, Action::EnterMountains), Some(Mountains));
        for from in [Blacksmith, Market, Forest, Mountains] {
            assert_eq!(destination(from, Action::Return), Some(Village));
        }
        assert_eq!(destination(Mountains, Action::FightDragon), Some(Mountains));

        assert_eq!(destination(Village, Action::Return), None);
        assert_eq!(destination(Village, Action::FightDragon), None);
        assert_eq!(destination(Forest, Action::GoMarket), None);
    }

    #[test]
    fn test_available_actions_match_destinations() {
        for from in Location::all() {
            for action in available_actions(from) {
                assert!(
                    destination(from, *action).is_some(),
                    "{action} offered but impossible from {from}"
                );
            }
        }
    }

    #[test]
    fn test_unarmed_fight_retreats() {
        let mut world = world_with(&[]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: false });

        let report = combat_report(&resolution);
        assert_eq!(
            report.outcome,
            CombatOutcome::Retreat(RetreatReason::Unarmed)
        );
        assert_eq!(report.penalty, 20);
        assert_eq!(world.player.health(), 80);
        assert_eq!(world.player.gold(), 20);
    }

    #[test]
    fn test_armor_alone_is_not_a_weapon() {
        let mut world = world_with(&[CatalogId::IronShield]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: false });

        assert_eq!(
            combat_report(&resolution).outcome,
            CombatOutcome::Retreat(RetreatReason::Unarmed)
        );
        assert_eq!(world.player.health(), 80);
    }

    #[test]
    fn test_monster_victory_with_sword() {
        let mut world = world_with(&[CatalogId::Sword]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: false });

        let report = combat_report(&resolution);
        assert!(report.is_victory());
        assert_eq!(report.damage_dealt, 10);
        assert_eq!(report.damage_taken, 10);
        assert_eq!(report.gold_reward, 10);
        assert!(report.armor.is_none());
        assert_eq!(world.player.health(), 90);
        assert_eq!(world.player.gold(), 30);
        assert!(!world.is_over());
    }

    #[test]
    fn test_damage_taken_never_below_one() {
        let mut world = world_with(&[CatalogId::Sword, CatalogId::IronShield]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: false });

        // Monster deals 10, shield blocks 10
        assert_eq!(combat_report(&resolution).damage_taken, 1);
        assert_eq!(world.player.health(), 99);
    }

    #[test]
    fn test_dragon_requires_steel_sword_and_armor() {
        // A sword and shield, but not the Steel Sword
        let mut world = world_with(&[CatalogId::Sword, CatalogId::IronShield]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: true });

        let report = combat_report(&resolution);
        assert_eq!(
            report.outcome,
            CombatOutcome::Retreat(RetreatReason::Unprepared)
        );
        assert_eq!(report.penalty, 30);
        assert_eq!(world.player.health(), 70);
        assert_eq!(world.player.gold(), 20);
        assert!(!world.is_over());

        // Steel Sword but no armor
        let mut world = world_with(&[CatalogId::SteelSword]);
        resolve_and_apply(&mut world, Intent::Fight { dragon: true });
        assert_eq!(world.player.health(), 70);
    }

    #[test]
    fn test_dragon_victory_ends_game() {
        let mut world = world_with(&[CatalogId::SteelSword, CatalogId::IronShield]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: true });

        let report = combat_report(&resolution);
        assert!(report.is_victory());
        assert_eq!(report.damage_dealt, 15);
        assert_eq!(report.damage_taken, 10);
        assert_eq!(world.player.health(), 90);
        assert_eq!(world.player.gold(), 120);
        assert_eq!(world.status().ending(), Some(Ending::Victory));
    }

    #[test]
    fn test_best_gear_is_chosen() {
        let mut world = world_with(&[
            CatalogId::Sword,
            CatalogId::WoodenShield,
            CatalogId::SteelSword,
            CatalogId::IronShield,
        ]);
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: false });

        let report = combat_report(&resolution);
        assert_eq!(report.weapon.as_ref().unwrap().name, "Steel Sword");
        assert_eq!(report.armor.as_ref().unwrap().name, "Iron Shield");
    }

    #[test]
    fn test_entering_forest_triggers_fight() {
        let mut world = world_with(&[]);
        let resolution = resolve_and_apply(&mut world, Intent::Move(Action::EnterForest));

        assert!(matches!(
            resolution.outcome,
            Outcome::Moved {
                to: Location::Forest,
                encounter: Some(_),
                ..
            }
        ));
        assert_eq!(world.player.location(), Location::Forest);
        assert_eq!(world.player.health(), 80);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let world = world_with(&[]);
        let err = RulesEngine::new()
            .resolve(&world, Intent::Move(Action::FightDragon))
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::IllegalAction {
                action: Action::FightDragon,
                location: Location::Village
            }
        );
    }

    #[test]
    fn test_fight_dragon_stays_in_mountains() {
        let mut world = world_with(&[]);
        resolve_and_apply(&mut world, Intent::Move(Action::EnterMountains));
        resolve_and_apply(&mut world, Intent::Move(Action::FightDragon));

        assert_eq!(world.player.location(), Location::Mountains);
        assert_eq!(world.player.health(), 70);
    }

    #[test]
    fn test_potion_heals_and_is_consumed() {
        let mut world = world_with(&[CatalogId::HealthPotion, CatalogId::HealthPotion]);
        world.player.adjust_health(-50);

        let resolution = resolve_and_apply(&mut world, Intent::UseItem { index: 1 });
        assert!(matches!(
            resolution.outcome,
            Outcome::ItemUsed {
                result: ItemUse::Healed {
                    amount: 30,
                    restored: 30,
                    new_health: 80
                },
                ..
            }
        ));
        assert_eq!(world.player.health(), 80);
        assert_eq!(world.player.inventory().len(), 1);
    }

    #[test]
    fn test_potion_healing_caps_at_max() {
        let mut world = world_with(&[CatalogId::HealthPotion]);
        world.player.adjust_health(-10);

        resolve_and_apply(&mut world, Intent::UseItem { index: 0 });
        assert_eq!(world.player.health(), 100);
        assert!(world.player.inventory().is_empty());
    }

    #[test]
    fn test_using_weapon_changes_nothing() {
        let mut world = world_with(&[CatalogId::Sword]);
        let before = world.clone();

        let resolution = resolve_and_apply(&mut world, Intent::UseItem { index: 0 });
        assert!(resolution.effects.is_empty());
        assert!(matches!(
            resolution.outcome,
            Outcome::ItemUsed {
                result: ItemUse::Readied,
                ..
            }
        ));
        assert_eq!(world, before);
    }

    #[test]
    fn test_use_item_out_of_range() {
        let world = world_with(&[CatalogId::Sword]);
        let err = RulesEngine::new()
            .resolve(&world, Intent::UseItem { index: 3 })
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::Inventory(InventoryError::IndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_purchase_deducts_cost_and_adds_copy() {
        let mut world = world_with(&[]);
        world.player.set_location(Location::Blacksmith);

        let resolution = resolve_and_apply(
            &mut world,
            Intent::Purchase {
                item: CatalogId::Sword,
            },
        );
        assert!(matches!(
            resolution.outcome,
            Outcome::Purchased { gold_left: 10, .. }
        ));
        assert_eq!(world.player.gold(), 10);
        assert_eq!(world.player.inventory().len(), 1);
        assert_eq!(
            world.player.inventory().get(0).unwrap(),
            CatalogId::Sword.template()
        );
    }

    #[test]
    fn test_purchase_without_funds_changes_nothing() {
        let mut world = world_with(&[]);
        world.player.set_location(Location::Blacksmith);
        world.player.adjust_gold(-15);
        let before = world.clone();

        let resolution = resolve_and_apply(
            &mut world,
            Intent::Purchase {
                item: CatalogId::WoodenShield,
            },
        );
        assert!(resolution.effects.is_empty());
        assert!(matches!(
            resolution.outcome,
            Outcome::InsufficientFunds { gold: 5, .. }
        ));
        assert_eq!(world, before);
    }

    #[test]
    fn test_purchase_outside_shop_is_rejected() {
        let world = world_with(&[]);
        let err = RulesEngine::new()
            .resolve(
                &world,
                Intent::Purchase {
                    item: CatalogId::HealthPotion,
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::NotSoldHere {
                item: CatalogId::HealthPotion,
                location: Location::Village
            }
        );
    }

    #[test]
    fn test_lethal_retreat_ends_game_in_defeat() {
        let mut world = world_with(&[]);
        world.player.adjust_health(-85);

        resolve_and_apply(&mut world, Intent::Fight { dragon: false });
        assert_eq!(world.player.health(), 0);
        assert_eq!(world.status().ending(), Some(Ending::Defeat));
    }

    #[test]
    fn test_dragon_victory_stands_when_last_blow_is_fatal() {
        let mut world = world_with(&[CatalogId::SteelSword, CatalogId::WoodenShield]);
        world.player.adjust_health(-90);

        // Dragon deals 20 - 5 = 15 against 10 health
        let resolution = resolve_and_apply(&mut world, Intent::Fight { dragon: true });
        assert!(combat_report(&resolution).is_victory());
        assert_eq!(world.player.health(), 0);
        assert_eq!(world.player.gold(), 120);
        assert_eq!(world.status().ending(), Some(Ending::Victory));
    }

    #[test]
    fn test_potion_reports_capped_healing() {
        let mut world = world_with(&[CatalogId::HealthPotion]);
        world.player.adjust_health(-10);

        let resolution = resolve_and_apply(&mut world, Intent::UseItem { index: 0 });
        assert!(matches!(
            resolution.outcome,
            Outcome::ItemUsed {
                result: ItemUse::Healed {
                    amount: 30,
                    restored: 10,
                    new_health: 100
                },
                ..
            }
        ));
    }

    #[test]
    fn test_quit_ends_game() {
        let mut world = world_with(&[]);
        let resolution = resolve_and_apply(&mut world, Intent::Quit);
        assert_eq!(resolution.outcome, Outcome::Quit);
        assert_eq!(world.status().ending(), Some(Ending::Quit));
    }

    #[test]
    fn test_effects_serialize() {
        let effect = Effect::HealthChanged {
            amount: -10,
            new_health: 90,
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["HealthChanged"]["amount"], -10);
        assert_eq!(json["HealthChanged"]["new_health"], 90);
    }
}
