//! Traits command - list predefined debating styles
//!
//! Usage:
//! ```bash
//! agora traits
//! agora traits --show orator
//! ```

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};

use agora_core::persona::find_trait;
use agora_core::{DebaterTrait, PREDEFINED_TRAITS};

/// Arguments for the traits command
#[derive(Args)]
pub struct TraitsArgs {
    /// Print the prompt text a style adds to a debater
    #[arg(long, value_name = "NAME")]
    show: Option<String>,
}

/// Run the traits command
pub fn run(args: TraitsArgs) -> Result<()> {
    match args.show {
        Some(name) => show_trait(&name),
        None => list_traits(),
    }
}

fn list_traits() -> Result<()> {
    println!("{}", "Debating styles".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Cyan),
            Cell::new("Characteristics").fg(Color::Cyan),
        ]);

    for profile in PREDEFINED_TRAITS {
        table.add_row(vec![
            Cell::new(profile.name).fg(Color::Green),
            Cell::new(profile.description),
            Cell::new(profile.characteristics.join(", ")).fg(Color::Yellow),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "Assign styles: {}",
        "agora run --trait orator --trait \"quotes poetry at every turn\"".green()
    );
    Ok(())
}

fn show_trait(name: &str) -> Result<()> {
    let Some(profile) = find_trait(name) else {
        bail!("Unknown style '{}'. Run `agora traits` to list them.", name);
    };
    let text = DebaterTrait::Predefined(profile.name.to_string()).resolve()?;
    println!("{} {}", profile.name.bold().green(), profile.description.dimmed());
    println!();
    println!("{}", text);
    Ok(())
}
