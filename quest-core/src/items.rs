//! The item catalog and what each shop stocks.
//!
//! Every item in the game is a copy of one of the templates here. Templates
//! are looked up by `CatalogId` and cloned on purchase.

use crate::world::{Item, ItemKind, Location};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable key for a catalog template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogId {
    HealthPotion,
    Sword,
    SteelSword,
    WoodenShield,
    IronShield,
}

impl CatalogId {
    pub fn all() -> [CatalogId; 5] {
        [
            CatalogId::HealthPotion,
            CatalogId::Sword,
            CatalogId::SteelSword,
            CatalogId::WoodenShield,
            CatalogId::IronShield,
        ]
    }

    /// The template this id refers to.
    pub fn template(self) -> &'static Item {
        template(self)
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template().name)
    }
}

struct Catalog {
    health_potion: Item,
    sword: Item,
    steel_sword: Item,
    wooden_shield: Item,
    iron_shield: Item,
}

lazy_static::lazy_static! {
    static ref CATALOG: Catalog = Catalog {
        health_potion: Item::new("Health Potion", ItemKind::Potion, 5, 30)
            .with_description("Restores 30 health points"),
        sword: Item::new("Sword", ItemKind::Weapon, 10, 10)
            .with_description("A sturdy blade for combat"),
        steel_sword: Item::new("Steel Sword", ItemKind::Weapon, 20, 15)
            .with_description("A sharp steel blade for combat"),
        wooden_shield: Item::new("Wooden Shield", ItemKind::Armor, 8, 5)
            .with_description("Reduces damage taken in combat"),
        iron_shield: Item::new("Iron Shield", ItemKind::Armor, 15, 10)
            .with_description("Reduces damage taken in combat better than a wooden shield"),
    };
}

/// Get the template for a catalog id.
pub fn template(id: CatalogId) -> &'static Item {
    match id {
        CatalogId::HealthPotion => &CATALOG.health_potion,
        CatalogId::Sword => &CATALOG.sword,
        CatalogId::SteelSword => &CATALOG.steel_sword,
        CatalogId::WoodenShield => &CATALOG.wooden_shield,
        CatalogId::IronShield => &CATALOG.iron_shield,
    }
}

// ============================================================================
// Shops
// ============================================================================

const BLACKSMITH_STOCK: &[CatalogId] = &[
    CatalogId::SteelSword,
    CatalogId::Sword,
    CatalogId::WoodenShield,
    CatalogId::IronShield,
];

const MARKET_STOCK: &[CatalogId] = &[CatalogId::HealthPotion];

/// Errors from picking an item off a shop's menu.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("there is nothing for sale at the {location}")]
    NoShop { location: Location },

    #[error("the {location} has no item #{index} for sale")]
    InvalidSelection { location: Location, index: usize },
}

/// What a location sells, in menu order. Empty where there is no shop.
pub fn stock(location: Location) -> &'static [CatalogId] {
    match location {
        Location::Blacksmith => BLACKSMITH_STOCK,
        Location::Market => MARKET_STOCK,
        Location::Village | Location::Forest | Location::Mountains => &[],
    }
}

pub fn sells(location: Location, id: CatalogId) -> bool {
    stock(location).contains(&id)
}

/// Resolve a zero-based menu choice to the item it names.
pub fn stock_entry(location: Location, index: usize) -> Result<CatalogId, ShopError> {
    let items = stock(location);
    if items.is_empty() {
        return Err(ShopError::NoShop { location });
    }
    items
        .get(index)
        .copied()
        .ok_or(ShopError::InvalidSelection { location, index })
}
