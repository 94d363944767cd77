//! Model catalog and random team assignment
//!
//! Each team draws all of its models from a single company, so a debate is
//! also a contest between model families. Judges are drawn independently.

use agora_core::{Assignments, ParticipantAssignment, TeamAssignment};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Default moderator model
pub const HOST_MODEL: &str = "x-ai/grok-4-fast";

const FALLBACK_MODELS: &[&str] = &[HOST_MODEL];

/// Models judges are drawn from
pub const JUDGE_MODELS: &[&str] = &[
    "qwen/qwen3-235b-a22b-2507",
    "deepseek/deepseek-r1-0528",
    "openai/gpt-4o",
    "anthropic/claude-opus-4.5",
    "qwen/qwen3-vl-235b-a22b-thinking",
    "moonshotai/kimi-k2-thinking",
];

/// Debater models grouped by company
pub const MODELS_BY_COMPANY: &[(&str, &[&str])] = &[
    (
        "Anthropic",
        &[
            "anthropic/claude-opus-4.1",
            "anthropic/claude-opus-4.5",
            "anthropic/claude-haiku-4.5",
            "anthropic/claude-sonnet-4",
            "anthropic/claude-sonnet-4.5",
        ],
    ),
    ("OpenAI", &["openai/gpt-4o", "openai/gpt-4o-2024-08-06"]),
    (
        "Alibaba_Qwen",
        &["qwen/qwen3-235b-a22b-2507", "qwen/qwen3-32b", "qwen/qwen3-235b-a22b"],
    ),
    ("DeepSeek", &["deepseek/deepseek-v3.2", "deepseek/deepseek-chat-v3.1"]),
    ("Moonshot", &["moonshotai/kimi-k2", "moonshotai/kimi-k2-0905"]),
    (
        "xAI",
        &["x-ai/grok-3", "x-ai/grok-4", "x-ai/grok-4-fast", "x-ai/grok-4.1-fast"],
    ),
];

/// Models offered by `company`, if it is in the catalog
pub fn company_models(company: &str) -> Option<&'static [&'static str]> {
    MODELS_BY_COMPANY
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(company))
        .map(|(_, models)| *models)
}

fn random_team<R: Rng + ?Sized>(rng: &mut R, seats: u32) -> TeamAssignment {
    let (company, models) = MODELS_BY_COMPANY
        .choose(rng)
        .copied()
        .unwrap_or(("xAI", FALLBACK_MODELS));
    let members = (0..seats)
        .map(|_| ParticipantAssignment::new(models.choose(rng).copied().unwrap_or(HOST_MODEL)))
        .collect();
    TeamAssignment {
        company: company.to_string(),
        members,
    }
}

/// Draw a company per side, a model per debater seat and a model per judge
pub fn random_assignments<R: Rng + ?Sized>(
    rng: &mut R,
    debaters_per_side: u32,
    judges_count: u32,
) -> Assignments {
    let pro = random_team(rng, debaters_per_side);
    let con = random_team(rng, debaters_per_side);
    let judges = (0..judges_count)
        .filter_map(|_| JUDGE_MODELS.choose(rng).map(|m| m.to_string()))
        .collect();

    tracing::debug!(pro = %pro.company, con = %con.company, "drew model assignments");

    Assignments {
        moderator: HOST_MODEL.to_string(),
        pro,
        con,
        judges,
    }
}
