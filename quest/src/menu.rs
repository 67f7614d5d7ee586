//! Per-location menus and input validation.
//!
//! Menu numbering is fixed per location so players can learn it; the
//! mountains entry sits at the end of the village menu for that reason.

use quest_core::{Action, Location};
use thiserror::Error;

/// What a menu entry does once chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Travel(Action),
    /// Open the local shop's buying prompt.
    Shop,
    Status,
    UseItem,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub choice: Choice,
}

const fn entry(label: &'static str, choice: Choice) -> MenuEntry {
    MenuEntry { label, choice }
}

const STATUS: MenuEntry = entry("Check status", Choice::Status);
const USE_ITEM: MenuEntry = entry("Use item", Choice::UseItem);
const HELP: MenuEntry = entry("Help", Choice::Help);
const QUIT: MenuEntry = entry("Quit game", Choice::Quit);
const RETURN: MenuEntry = entry("Return to village", Choice::Travel(Action::Return));

const VILLAGE: &[MenuEntry] = &[
    entry("Go to blacksmith", Choice::Travel(Action::GoBlacksmith)),
    entry("Go to market", Choice::Travel(Action::GoMarket)),
    entry("Enter forest", Choice::Travel(Action::EnterForest)),
    STATUS,
    USE_ITEM,
    HELP,
    QUIT,
    entry("Enter mountains", Choice::Travel(Action::EnterMountains)),
];

const BLACKSMITH: &[MenuEntry] = &[
    entry("Buy sword or armor", Choice::Shop),
    RETURN,
    STATUS,
    USE_ITEM,
    HELP,
    QUIT,
];

const MARKET: &[MenuEntry] = &[
    entry("Buy potion", Choice::Shop),
    RETURN,
    STATUS,
    USE_ITEM,
    HELP,
    QUIT,
];

const FOREST: &[MenuEntry] = &[RETURN, STATUS, USE_ITEM, HELP, QUIT];

const MOUNTAINS: &[MenuEntry] = &[
    entry("Fight the dragon", Choice::Travel(Action::FightDragon)),
    RETURN,
    STATUS,
    USE_ITEM,
    HELP,
    QUIT,
];

/// The menu shown at a location, numbered from 1.
pub fn menu(location: Location) -> &'static [MenuEntry] {
    match location {
        Location::Village => VILLAGE,
        Location::Blacksmith => BLACKSMITH,
        Location::Market => MARKET,
        Location::Forest => FOREST,
        Location::Mountains => MOUNTAINS,
    }
}

/// Why a typed choice was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("Please enter a number!")]
    Empty,

    #[error("That's not a number! Please enter a number.")]
    NotANumber,

    #[error("Please enter a number between {min} and {max}.")]
    OutOfRange { min: i64, max: i64 },
}

/// Parse a number in `min..=max`.
pub fn parse_number(input: &str, min: i64, max: i64) -> Result<i64, ChoiceError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ChoiceError::Empty);
    }
    let n: i64 = input.parse().map_err(|_| ChoiceError::NotANumber)?;
    if n < min || n > max {
        return Err(ChoiceError::OutOfRange { min, max });
    }
    Ok(n)
}

/// Pick an entry from a location's menu.
pub fn parse_choice(input: &str, location: Location) -> Result<MenuEntry, ChoiceError> {
    let entries = menu(location);
    let n = parse_number(input, 1, entries.len() as i64)?;
    Ok(entries[(n - 1) as usize])
}

fn is_cancel(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("cancel")
}

/// Parse a 1-based inventory position, or `None` for `cancel`.
/// Returns a zero-based index.
pub fn parse_item_choice(input: &str, len: usize) -> Result<Option<usize>, ChoiceError> {
    if is_cancel(input) {
        return Ok(None);
    }
    let n = parse_number(input, 1, len as i64)?;
    Ok(Some((n - 1) as usize))
}

/// Parse a 0-based shop menu position, or `None` for `cancel`.
pub fn parse_stock_choice(input: &str, len: usize) -> Result<Option<usize>, ChoiceError> {
    if is_cancel(input) {
        return Ok(None);
    }
    let n = parse_number(input, 0, len as i64 - 1)?;
    Ok(Some(n as usize))
}

/// Anything other than "yes" is a no.
pub fn parse_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::rules::destination;

    #[test]
    fn test_menu_sizes() {
        assert_eq!(menu(Location::Village).len(), 8);
        assert_eq!(menu(Location::Blacksmith).len(), 6);
        assert_eq!(menu(Location::Market).len(), 6);
        assert_eq!(menu(Location::Forest).len(), 5);
        assert_eq!(menu(Location::Mountains).len(), 6);
    }

    #[test]
    fn test_menus_only_offer_legal_travel() {
        for location in Location::all() {
            for entry in menu(location) {
                if let Choice::Travel(action) = entry.choice {
                    assert!(
                        destination(location, action).is_some(),
                        "{} offered at the {location}",
                        entry.label
                    );
                }
            }
        }
    }

    #[test]
    fn test_village_numbering() {
        let pick = |s| parse_choice(s, Location::Village).unwrap().choice;
        assert_eq!(pick("1"), Choice::Travel(Action::GoBlacksmith));
        assert_eq!(pick("3"), Choice::Travel(Action::EnterForest));
        assert_eq!(pick(" 7 "), Choice::Quit);
        assert_eq!(pick("8"), Choice::Travel(Action::EnterMountains));
    }

    #[test]
    fn test_parse_choice_errors() {
        assert_eq!(
            parse_choice("", Location::Forest),
            Err(ChoiceError::Empty)
        );
        assert_eq!(
            parse_choice("north", Location::Forest),
            Err(ChoiceError::NotANumber)
        );
        assert_eq!(
            parse_choice("6", Location::Forest),
            Err(ChoiceError::OutOfRange { min: 1, max: 5 })
        );
        assert_eq!(
            parse_choice("0", Location::Mountains),
            Err(ChoiceError::OutOfRange { min: 1, max: 6 })
        );
        assert_eq!(
            ChoiceError::OutOfRange { min: 1, max: 8 }.to_string(),
            "Please enter a number between 1 and 8."
        );
    }

    #[test]
    fn test_item_and_stock_choices() {
        assert_eq!(parse_item_choice("2", 3), Ok(Some(1)));
        assert_eq!(parse_item_choice("Cancel", 3), Ok(None));
        assert!(parse_item_choice("1", 0).is_err());

        assert_eq!(parse_stock_choice("0", 4), Ok(Some(0)));
        assert_eq!(parse_stock_choice("cancel", 4), Ok(None));
        assert_eq!(
            parse_stock_choice("4", 4),
            Err(ChoiceError::OutOfRange { min: 0, max: 3 })
        );
    }

    #[test]
    fn test_parse_yes() {
        assert!(parse_yes("YES"));
        assert!(parse_yes(" yes\n"));
        assert!(!parse_yes("y"));
        assert!(!parse_yes(""));
    }
}
