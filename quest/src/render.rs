//! Text rendering for the console front end.
//!
//! Everything here writes to a caller-supplied `Write` so the transcript
//! can be captured in tests.

use crate::menu;
use quest_core::items::{self, CatalogId};
use quest_core::world::MAX_HEALTH;
use quest_core::{
    CombatOutcome, CombatReport, Effect, Ending, ItemKind, ItemUse, Location, Outcome,
    RetreatReason, Response, Snapshot,
};
use std::io::{self, Write};

pub fn banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "=================================")?;
    writeln!(out, "       The Dragon's Quest        ")?;
    writeln!(out, "=================================")?;
    writeln!(out, "\nYour quest: Defeat the dragon in the mountains!")
}

pub fn welcome(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "\nWelcome, {}!", snapshot.name)?;
    writeln!(out, "You start with {} gold.", snapshot.gold)
}

/// Location header, description and numbered menu.
pub fn location(out: &mut impl Write, location: Location) -> io::Result<()> {
    writeln!(out, "\n=== {} ===", location.name().to_uppercase())?;
    writeln!(out, "{}", location.description())?;
    for (i, entry) in menu::menu(location).iter().enumerate() {
        writeln!(out, "{}: {}", i + 1, entry.label)?;
    }
    Ok(())
}

pub fn status(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "\n=== {}'s Status ===", snapshot.name)?;
    writeln!(out, "Health: {}", snapshot.health)?;
    writeln!(out, "Gold: {}", snapshot.gold)?;
    writeln!(out, "Location: {}", snapshot.location)?;
    writeln!(out, "Inventory:")?;
    if snapshot.inventory.is_empty() {
        writeln!(out, "   Nothing in inventory")?;
    }
    for (i, item) in snapshot.inventory.iter().enumerate() {
        writeln!(out, "   {}. {} - {}", i + 1, item.name, item.description)?;
    }
    Ok(())
}

/// Numbered item names for the use-item prompt.
pub fn inventory(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "\n=== Inventory ===")?;
    for (i, item) in snapshot.inventory.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, item.name)?;
    }
    Ok(())
}

/// The goods on offer at a shop, numbered from 0.
pub fn stock(out: &mut impl Write, location: Location) -> io::Result<()> {
    match location {
        Location::Blacksmith => {
            writeln!(out, "Weapons and armor are available:")?;
            for (i, id) in items::stock(location).iter().enumerate() {
                writeln!(out, "{i}: {}", offer(*id))?;
            }
        }
        _ => {
            for id in items::stock(location) {
                writeln!(out, "Available: {}", offer(*id))?;
            }
        }
    }
    Ok(())
}

fn offer(id: CatalogId) -> String {
    let item = id.template();
    let what = match item.kind {
        ItemKind::Potion => format!("restores {} health", item.effect),
        ItemKind::Weapon => format!("deals {} damage", item.effect),
        ItemKind::Armor => format!("reduces damage by {}", item.effect),
    };
    format!("{} - {} gold, {what}", item.name, item.cost)
}

pub fn help(out: &mut impl Write) -> io::Result<()> {
    let potion = CatalogId::HealthPotion.template();
    let sword = CatalogId::Sword.template();

    writeln!(out, "\n=== AVAILABLE COMMANDS ===")?;
    writeln!(out, "\nMovement Commands:")?;
    writeln!(out, "- In the village, choose a destination to travel there")?;
    writeln!(
        out,
        "- In other locations, choose the return option to go back to the village"
    )?;

    writeln!(out, "\nBattle Information:")?;
    writeln!(out, "- You need a weapon to win battles")?;
    writeln!(out, "- Weapons have different damage values")?;
    writeln!(out, "- Monsters appear in the forest")?;
    writeln!(out, "- Without a weapon, you'll lose health when retreating")?;
    writeln!(
        out,
        "- The dragon can only be beaten with a Steel Sword and some armor"
    )?;

    writeln!(out, "\nItem Usage:")?;
    writeln!(
        out,
        "- Health potions restore health based on their effect value"
    )?;
    writeln!(
        out,
        "- You can buy potions at the market for {} gold",
        potion.cost
    )?;
    writeln!(
        out,
        "- You can buy a sword at the blacksmith for {} gold",
        sword.cost
    )?;

    writeln!(out, "\nOther Commands:")?;
    writeln!(out, "- Choose the status option to see your health and gold")?;
    writeln!(out, "- Choose the help option to see this message again")?;
    writeln!(out, "- Choose the quit option to end the game")?;

    writeln!(out, "\nTips:")?;
    writeln!(out, "- Keep healing potions for dangerous areas")?;
    writeln!(out, "- Defeat monsters to earn gold")?;
    writeln!(out, "- Health can't go above {MAX_HEALTH}")
}

/// Narrate a response, then announce the ending if it ended the game.
pub fn response(
    out: &mut impl Write,
    response: &Response,
    snapshot: &Snapshot,
) -> io::Result<()> {
    match &response.outcome {
        Outcome::Moved {
            encounter: Some(report),
            ..
        } => {
            writeln!(out, "\nA {} appears!", report.foe)?;
            combat(out, report, &response.effects)?;
        }
        Outcome::Moved { .. } => {}
        Outcome::Combat(report) => combat(out, report, &response.effects)?,
        Outcome::ItemUsed { item, result } => match result {
            ItemUse::Healed {
                amount,
                restored,
                new_health,
            } => {
                writeln!(out, "\nYou drink the {}.", item.name)?;
                if restored < amount {
                    writeln!(out, "You're at full health!")?;
                }
                health_changes(out, &response.effects)?;
                writeln!(out, "Health restored to: {new_health}")?;
            }
            ItemUse::Readied => writeln!(out, "\nYou ready your {} for battle.", item.name)?,
            ItemUse::NoEffect => writeln!(out, "\nThe {} is of no use right now.", item.name)?,
        },
        Outcome::Purchased { item, gold_left } => {
            writeln!(
                out,
                "You purchased the {} for {} gold. You have {gold_left} gold left.",
                item.name, item.cost
            )?;
        }
        Outcome::InsufficientFunds { .. } => {
            writeln!(out, "Not enough gold to make this purchase!")?;
        }
        Outcome::Status(snapshot) => status(out, snapshot)?,
        Outcome::Quit => writeln!(out, "\nThanks for playing!")?,
    }

    if let Some(ending) = response.ending {
        self::ending(out, ending, snapshot)?;
    }
    Ok(())
}

fn combat(out: &mut impl Write, report: &CombatReport, effects: &[Effect]) -> io::Result<()> {
    match report.outcome {
        CombatOutcome::Retreat(RetreatReason::Unprepared) => {
            writeln!(
                out,
                "The DRAGON ROARS! You do not have good enough equipment to fight."
            )?;
            writeln!(out, "Come back with a Steel Sword and some armor.")?;
            health_changes(out, effects)
        }
        CombatOutcome::Retreat(RetreatReason::Unarmed) => {
            writeln!(out, "Without a weapon, you must retreat!")?;
            health_changes(out, effects)
        }
        CombatOutcome::Victory => {
            writeln!(out, "You have entered the battle!")?;
            if let Some(weapon) = &report.weapon {
                writeln!(
                    out,
                    "Weapon used: {} (Damage: {})",
                    weapon.name, report.damage_dealt
                )?;
            }
            match &report.armor {
                Some(armor) => {
                    writeln!(out, "Armor used: {} (Protection: {})", armor.name, armor.effect)?
                }
                None => writeln!(out, "No armor equipped.")?,
            }
            writeln!(out, "The {} hits you for {}.", report.foe, report.damage_taken)?;
            health_changes(out, effects)?;
            writeln!(
                out,
                "Victory! You defeated the {} and earned {} gold!",
                report.foe, report.gold_reward
            )
        }
    }
}

fn health_changes(out: &mut impl Write, effects: &[Effect]) -> io::Result<()> {
    for effect in effects {
        if let Effect::HealthChanged { new_health, .. } = effect {
            if *new_health == 0 {
                writeln!(out, "You're gravely wounded!")?;
            }
            writeln!(out, "Health is now: {new_health}")?;
        }
    }
    Ok(())
}

fn ending(out: &mut impl Write, ending: Ending, snapshot: &Snapshot) -> io::Result<()> {
    match ending {
        Ending::Victory => {
            writeln!(out, "\nCongratulations! You completed The Dragon's Quest!")?;
            writeln!(
                out,
                "Final stats: Health: {}, Gold: {}",
                snapshot.health, snapshot.gold
            )
        }
        Ending::Defeat => writeln!(out, "\nGame Over! Your health reached 0!"),
        // Already said goodbye
        Ending::Quit => Ok(()),
    }
}
