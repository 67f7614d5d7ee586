//! The interactive menu loop.
//!
//! This provides a simple line-oriented protocol: each location prints a
//! numbered menu and the player answers with a number. Sub-prompts handle
//! shopping and item use. End of input is treated as quitting.

use crate::menu::{self, Choice, ChoiceError, MenuEntry};
use crate::render;
use log::debug;
use quest_core::items::{self, CatalogId};
use quest_core::{Ending, GameSession, Intent, Location};
use std::io::{self, BufRead, Write};

/// Print `prompt` and read one trimmed line. `None` at end of input.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub struct Console<R, W> {
    session: GameSession,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(session: GameSession, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    pub fn into_parts(self) -> (GameSession, W) {
        (self.session, self.output)
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        render::welcome(&mut self.output, &self.session.snapshot())
    }

    /// Play until the game ends, returning how it ended.
    pub fn run(&mut self) -> io::Result<Ending> {
        loop {
            if let Some(ending) = self.session.status().ending() {
                return Ok(ending);
            }

            let location = self.session.world().player.location();
            render::location(&mut self.output, location)?;

            match self.read_choice(location)? {
                Some(entry) => {
                    debug!("chose {:?} at the {location}", entry.choice);
                    self.dispatch(entry.choice, location)?;
                }
                None => {
                    debug!("end of input, quitting");
                    self.perform(Intent::Quit)?;
                }
            }
        }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        ask(&mut self.input, &mut self.output, prompt)
    }

    /// Prompt until a valid menu entry is chosen.
    fn read_choice(&mut self, location: Location) -> io::Result<Option<MenuEntry>> {
        loop {
            let Some(line) = self.ask("\nEnter choice (number): ")? else {
                return Ok(None);
            };
            match menu::parse_choice(&line, location) {
                Ok(entry) => return Ok(Some(entry)),
                Err(e) => self.reject(&e)?,
            }
        }
    }

    fn reject(&mut self, error: &ChoiceError) -> io::Result<()> {
        writeln!(self.output, "\nError: {error}")?;
        writeln!(self.output, "Please try again!")
    }

    fn dispatch(&mut self, choice: Choice, location: Location) -> io::Result<()> {
        match choice {
            Choice::Travel(action) => self.perform(Intent::Move(action)),
            Choice::Shop => self.shop(location),
            Choice::Status => self.perform(Intent::CheckStatus),
            Choice::UseItem => self.use_item(),
            Choice::Help => render::help(&mut self.output),
            Choice::Quit => self.perform(Intent::Quit),
        }
    }

    fn perform(&mut self, intent: Intent) -> io::Result<()> {
        match self.session.perform(intent) {
            Ok(response) => {
                render::response(&mut self.output, &response, &self.session.snapshot())
            }
            Err(e) => writeln!(self.output, "\nError: {e}"),
        }
    }

    fn shop(&mut self, location: Location) -> io::Result<()> {
        render::stock(&mut self.output, location)?;

        if location == Location::Market {
            let Some(answer) = self.ask("Buy potion? (yes/no): ")? else {
                return Ok(());
            };
            if menu::parse_yes(&answer) {
                self.perform(Intent::Purchase {
                    item: CatalogId::HealthPotion,
                })?;
            }
            return Ok(());
        }

        let Some(answer) = self.ask("Which one do you want to buy? (number or cancel): ")? else {
            return Ok(());
        };
        let index = match menu::parse_stock_choice(&answer, items::stock(location).len()) {
            Ok(Some(index)) => index,
            Ok(None) => return Ok(()),
            Err(e) => {
                debug!("bad shop choice {answer:?}: {e}");
                return writeln!(self.output, "Invalid choice. Nothing was bought.");
            }
        };
        match items::stock_entry(location, index) {
            Ok(item) => self.perform(Intent::Purchase { item }),
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    fn use_item(&mut self) -> io::Result<()> {
        let snapshot = self.session.snapshot();
        if snapshot.inventory.is_empty() {
            return writeln!(self.output, "\nYou have no items!");
        }
        render::inventory(&mut self.output, &snapshot)?;

        let Some(answer) = self.ask("Use which item? (number or 'cancel'): ")? else {
            return Ok(());
        };
        match menu::parse_item_choice(&answer, snapshot.inventory.len()) {
            Ok(Some(index)) => self.perform(Intent::UseItem { index }),
            Ok(None) => Ok(()),
            Err(_) => writeln!(self.output, "\nInvalid item number!"),
        }
    }
}
