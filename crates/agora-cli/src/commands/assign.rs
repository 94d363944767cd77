//! Assign command - preview a random model assignment
//!
//! Usage:
//! ```bash
//! agora assign
//! agora assign --debaters-per-side 3 --judges 5 --seed 7
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use agora_core::{Assignments, ParticipantId, SessionConfig, Side};
use agora_llm::{random_assignments, LlmConfig};

/// Arguments for the assign command
#[derive(Args)]
pub struct AssignArgs {
    /// Debaters on each team
    #[arg(long, default_value_t = SessionConfig::DEFAULT_DEBATERS_PER_SIDE)]
    debaters_per_side: u32,

    /// Judges on the panel
    #[arg(long, default_value_t = SessionConfig::DEFAULT_JUDGES_COUNT)]
    judges: u32,

    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
}

/// Run the assign command
pub fn run(args: AssignArgs) -> Result<()> {
    // validates the counts; the topic is irrelevant here
    SessionConfig::new("preview", args.debaters_per_side, args.judges, 1)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut assignments = random_assignments(&mut rng, args.debaters_per_side, args.judges);
    assignments.moderator = LlmConfig::from_env().host_model;

    print_assignments(&assignments);
    Ok(())
}

/// Print teams, models and styles as a table
pub fn print_assignments(assignments: &Assignments) {
    println!("{}", "Model assignment".bold().cyan());
    println!(
        "  {} {}   {} {}",
        "Pro team:".dimmed(),
        assignments.pro.company.green(),
        "Con team:".dimmed(),
        assignments.con.company.red()
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Participant").fg(Color::Cyan),
            Cell::new("Model").fg(Color::Cyan),
            Cell::new("Style").fg(Color::Cyan),
        ]);

    table.add_row(vec![
        Cell::new(ParticipantId::Moderator).fg(Color::Yellow),
        Cell::new(&assignments.moderator),
        Cell::new("-"),
    ]);
    for (side, color) in [(Side::Pro, Color::Green), (Side::Con, Color::Red)] {
        for (i, member) in assignments.team(side).members.iter().enumerate() {
            let style = member.persona.as_ref().map(|t| t.label()).unwrap_or("-");
            table.add_row(vec![
                Cell::new(ParticipantId::Debater(side, i as u32 + 1)).fg(color),
                Cell::new(&member.model),
                Cell::new(style),
            ]);
        }
    }
    for (i, model) in assignments.judges.iter().enumerate() {
        table.add_row(vec![
            Cell::new(ParticipantId::Judge(i as u32 + 1)).fg(Color::Magenta),
            Cell::new(model),
            Cell::new("-"),
        ]);
    }

    println!("{table}");
    println!();
}
