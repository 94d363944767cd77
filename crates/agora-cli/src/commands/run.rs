//! Run command - hold a debate and stream it to the terminal
//!
//! Usage:
//! ```bash
//! agora run --mock --topic "Remote work beats the office"
//! agora run --topic "Nuclear power is green" --judges 5 --export debate.md
//! agora run --topic "Cash should be phased out" --trait orator --trait logician
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use agora_core::{random_traits, Assignments, DebaterTrait, SessionConfig, Side};
use agora_debate::{
    build_roster, final_verdict, to_json, to_markdown, ChannelObserver, DebateSession, LlmResponder,
    Notification, RetryPolicy, RunOptions, SessionOutcome,
};
use agora_llm::{
    random_assignments, Extractor, LlmConfig, LlmExtractor, LlmProvider, MockProvider,
    OpenAICompatProvider, ReasoningStripExtractor,
};

use super::assign::print_assignments;
use crate::{print_info, print_success, print_warning};

/// Motion used when none is given
pub const DEFAULT_TOPIC: &str =
    "Artificial intelligence will benefit humanity more than it harms it";

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// The motion under debate
    #[arg(short, long, default_value = "")]
    topic: String,

    /// Debaters on each team
    #[arg(long, default_value_t = SessionConfig::DEFAULT_DEBATERS_PER_SIDE)]
    debaters_per_side: u32,

    /// Judges on the panel
    #[arg(long, default_value_t = SessionConfig::DEFAULT_JUDGES_COUNT)]
    judges: u32,

    /// Debater turns in the free debate
    #[arg(long, default_value_t = SessionConfig::DEFAULT_MAX_FREE_DEBATE_TURNS)]
    free_turns: u32,

    /// Use scripted offline replies instead of a model endpoint
    #[arg(long)]
    mock: bool,

    /// Seed for model assignment and free-debate speaker draws
    #[arg(long)]
    seed: Option<u64>,

    /// Give up on a single model call after this many seconds
    #[arg(long, value_name = "SECS")]
    turn_timeout_secs: Option<u64>,

    /// Extraction attempts per turn before falling back to the raw reply
    #[arg(long, default_value_t = 3)]
    attempts: u32,

    /// Write the transcript here (.json for JSON, anything else for Markdown)
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Debating style per debater, in seat order (Pro 1, Pro 2, ..., Con 1, ...).
    /// A predefined style name or a free-form description.
    #[arg(long = "trait", value_name = "STYLE")]
    traits: Vec<String>,

    /// Give every debater a random predefined style
    #[arg(long, conflicts_with = "traits")]
    random_traits: bool,

    /// Strip reasoning blocks locally instead of calling an extraction model
    #[arg(long)]
    local_extract: bool,

    /// API key for the model endpoint
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat-completion endpoint
    #[arg(long, env = "OPENROUTER_BASE_URL")]
    base_url: Option<String>,
}

/// Run the run command
pub async fn run(args: RunArgs) -> Result<()> {
    let topic = if args.topic.trim().is_empty() {
        print_info(&format!("No topic given, using the default: {}", DEFAULT_TOPIC));
        DEFAULT_TOPIC
    } else {
        args.topic.as_str()
    };
    let config = SessionConfig::new(topic, args.debaters_per_side, args.judges, args.free_turns)?;

    let mut llm_config = LlmConfig::from_env();
    if let Some(key) = &args.api_key {
        llm_config.api_key = Some(key.clone());
    }
    if let Some(url) = &args.base_url {
        llm_config.base_url = url.clone();
    }
    llm_config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut assignments =
        random_assignments(&mut rng, config.debaters_per_side(), config.judges_count());
    assignments.moderator = llm_config.host_model.clone();
    apply_traits(&mut assignments, &args, &mut rng);
    print_assignments(&assignments);

    let options = RunOptions {
        retry: RetryPolicy::new(args.attempts),
        turn_timeout: args.turn_timeout_secs.map(Duration::from_secs),
        ..RunOptions::default()
    };

    let outcome = if args.mock {
        print_warning("Mock mode: replies are scripted, no model is called");
        let provider = Arc::new(MockProvider::smart());
        let extractor = Arc::new(ReasoningStripExtractor);
        drive(provider, extractor, config, &assignments, rng, options).await?
    } else {
        let provider = Arc::new(OpenAICompatProvider::from_config(&llm_config)?);
        let extractor: Arc<dyn Extractor> = if args.local_extract {
            Arc::new(ReasoningStripExtractor)
        } else {
            Arc::new(LlmExtractor::new(provider.clone()).with_model(&llm_config.extractor_model))
        };
        drive(provider, extractor, config, &assignments, rng, options).await?
    };

    print_summary(&outcome);
    if let Some(path) = &args.export {
        export(&outcome, path)?;
        print_success(&format!("Transcript written to {}", path.display()));
    }
    Ok(())
}

/// Hand out styles in seat order, or at random
fn apply_traits(assignments: &mut Assignments, args: &RunArgs, rng: &mut StdRng) {
    let seats = (args.debaters_per_side as usize).saturating_mul(2);
    let styles: Vec<DebaterTrait> = if args.random_traits {
        random_traits(rng, seats)
    } else {
        args.traits.iter().map(|s| DebaterTrait::parse(s)).collect()
    };
    if styles.len() > seats {
        print_warning(&format!(
            "{} styles given for {} debaters; extras ignored",
            styles.len(),
            seats
        ));
    }

    let mut styles = styles.into_iter();
    for side in [Side::Pro, Side::Con] {
        let team = match side {
            Side::Pro => &mut assignments.pro,
            Side::Con => &mut assignments.con,
        };
        for member in team.members.iter_mut() {
            if let Some(style) = styles.next() {
                member.persona = Some(style);
            }
        }
    }
}

async fn drive<P: LlmProvider + 'static>(
    provider: Arc<P>,
    extractor: Arc<dyn Extractor>,
    config: SessionConfig,
    assignments: &Assignments,
    rng: StdRng,
    options: RunOptions,
) -> Result<SessionOutcome> {
    let roster = build_roster(&config, assignments)?;
    let responder = Arc::new(LlmResponder::new(provider, &config));
    let (observer, mut rx) = ChannelObserver::channel();

    println!("{}", format!("Motion: {}", config.topic()).bold());
    println!("{}", "═".repeat(60).cyan());

    let session = DebateSession::new(config, roster, responder, extractor, Arc::new(observer))?
        .with_rng(rng)
        .with_options(options);
    info!(session = ?session, "starting session task");
    let handle = tokio::spawn(session.run());

    while let Some(notification) = rx.recv().await {
        if notification.is_end() {
            debug!("session end received");
            break;
        }
        render(&notification);
    }

    let outcome = handle.await.context("debate task failed")?;
    Ok(outcome)
}

fn render(notification: &Notification) {
    let speaker = notification.speaker.as_str();
    if notification.is_system() {
        print_warning(&notification.text);
        return;
    }
    let label = if speaker.starts_with("Pro") {
        speaker.green().bold()
    } else if speaker.starts_with("Con") {
        speaker.red().bold()
    } else if speaker.starts_with("Judge") {
        speaker.magenta().bold()
    } else {
        speaker.yellow().bold()
    };
    println!();
    println!("{}", label);
    println!("{}", notification.text);
}

fn print_summary(outcome: &SessionOutcome) {
    println!();
    println!("{}", "═".repeat(60).cyan());
    match &outcome.aborted {
        Some(reason) => print_warning(&format!("Debate ended early: {}", reason)),
        None => print_success("Debate finished"),
    }
    if let Some(verdict) = final_verdict(outcome) {
        println!();
        println!("{}", "Final verdict".bold());
        println!("{}", verdict);
    }
    println!();
    println!("  {} {}", "Stats:".dimmed(), outcome.metrics.summary());
}

fn export(outcome: &SessionOutcome, path: &Path) -> Result<()> {
    let body = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => to_json(outcome)?,
        _ => to_markdown(outcome),
    };
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}
