//! Debater traits (debating styles)
//!
//! A trait is either one of the predefined styles below or a free-form
//! description. Either way it is resolved to prompt text exactly once, when
//! the participant is built.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A predefined debating style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitProfile {
    /// Registry name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Behavioural guidance appended to the debater prompt
    pub guidance: &'static [&'static str],
    /// Short characteristic tags
    pub characteristics: &'static [&'static str],
}

impl TraitProfile {
    fn prompt_addition(&self) -> String {
        let mut text = format!("[Style: {}]\n", self.name);
        for line in self.guidance {
            text.push_str("- ");
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// The built-in trait registry
pub const PREDEFINED_TRAITS: &[TraitProfile] = &[
    TraitProfile {
        name: "data-driven",
        description: "Argues from data and facts with tight, evidence-backed logic",
        guidance: &[
            "Favour rational analysis backed by data and facts",
            "Cite authoritative figures, studies and statistics first",
            "Support points with case analysis",
            "Keep the chain of reasoning explicit and rigorous",
            "Fall back to sound inference when no concrete data exists",
            "Stay calm and objective; avoid emotional language",
        ],
        characteristics: &["data driven", "rigorous", "objective", "evidence based"],
    },
    TraitProfile {
        name: "logician",
        description: "Hunts for logical gaps using reductio and analogy",
        guidance: &[
            "Focus on the weak links in the opponent's argument",
            "Attack premises, assumptions and inference steps",
            "Use reductio ad absurdum, analogy and counterexample",
            "Reduce complex questions to their core contradiction",
            "Dismantle the opposing view before building your own",
            "Prefer indirect pressure over head-on collisions",
        ],
        characteristics: &["sharp logic", "rebuttal", "analogy", "counterexample"],
    },
    TraitProfile {
        name: "psychologist",
        description: "Reads the audience and persuades through framing and emotional appeal",
        guidance: &[
            "Draw on cognitive biases and social proof",
            "Frame scenarios that steer the judges' values",
            "Mind tone, pacing and emotional colour",
            "Make abstract issues concrete and felt",
            "Prefer resonance over dry calculation",
        ],
        characteristics: &["insight", "framing", "emotional appeal", "value steering"],
    },
    TraitProfile {
        name: "orator",
        description: "Delivers stirring, rhetorically rich speeches",
        guidance: &[
            "Use metaphor, parallelism and rhetorical questions",
            "Vary rhythm; give the speech a cadence",
            "Rally the audience behind a firm position",
            "Speak with conviction and a clear stance",
            "Avoid flat, monotone exposition",
        ],
        characteristics: &["rhetoric", "passion", "cadence", "conviction"],
    },
    TraitProfile {
        name: "pragmatist",
        description: "Argues from practical experience and real-world cases",
        guidance: &[
            "Cite real cases from work, daily life and society",
            "Argue from feasibility and practicality",
            "Weigh implementation cost and real effects",
            "Open with lines like \"in practice\" or \"from experience\"",
            "Avoid empty theory",
        ],
        characteristics: &["experience", "real cases", "pragmatism", "feasibility"],
    },
    TraitProfile {
        name: "moralist",
        description: "Argues from ethical principles and value judgements",
        guidance: &[
            "Analyse the issue through justice, fairness and rights",
            "Cite moral philosophers and ethicists",
            "Consider social values and cultural tradition",
            "Take an explicit moral stance",
            "Prefer moral legitimacy over pure utility",
        ],
        characteristics: &["ethics", "values", "justice", "fairness"],
    },
    TraitProfile {
        name: "satirist",
        description: "Lands sharp points through humour and irony",
        guidance: &[
            "Use irony, wordplay and gentle mockery",
            "Defuse attacks lightly while keeping your edge",
            "Illustrate serious points with funny examples",
            "Stay witty without losing rigour",
            "Do not turn the debate into entertainment",
        ],
        characteristics: &["humour", "irony", "levity", "wit"],
    },
    TraitProfile {
        name: "scholar",
        description: "Leans on authorities, quotations and classic theory",
        guidance: &[
            "Quote experts, scholars and leaders",
            "Apply classic theory and philosophy",
            "Tie authoritative views to the current motion",
            "Show breadth of reading",
            "Weave citations in naturally rather than stacking them",
        ],
        characteristics: &["authority", "quotations", "theory", "erudition"],
    },
];

/// Look up a predefined trait by name (case-insensitive)
pub fn find_trait(name: &str) -> Option<&'static TraitProfile> {
    PREDEFINED_TRAITS
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

/// Draw `count` distinct predefined traits (capped at the registry size)
pub fn random_traits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<DebaterTrait> {
    let amount = count.min(PREDEFINED_TRAITS.len());
    rand::seq::index::sample(rng, PREDEFINED_TRAITS.len(), amount)
        .into_iter()
        .map(|i| DebaterTrait::Predefined(PREDEFINED_TRAITS[i].name.to_string()))
        .collect()
}

/// A debater's style: a registry entry or a custom description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebaterTrait {
    Predefined(String),
    Custom(String),
}

impl DebaterTrait {
    /// Parse user input: registry names become `Predefined`, anything else `Custom`
    pub fn parse(input: &str) -> Self {
        match find_trait(input) {
            Some(profile) => Self::Predefined(profile.name.to_string()),
            None => Self::Custom(input.trim().to_string()),
        }
    }

    /// Short label for display
    pub fn label(&self) -> &str {
        match self {
            Self::Predefined(name) => name,
            Self::Custom(_) => "custom",
        }
    }

    /// Resolve to the text appended to a debater's system prompt
    pub fn resolve(&self) -> Result<String, CoreError> {
        match self {
            Self::Predefined(name) => find_trait(name)
                .map(TraitProfile::prompt_addition)
                .ok_or_else(|| CoreError::UnknownTrait(name.clone())),
            Self::Custom(description) => {
                if description.trim().is_empty() {
                    return Err(CoreError::InvalidConfig(
                        "custom trait description is empty".to_string(),
                    ));
                }
                Ok(format!(
                    "[Style: custom]\n\
                     - Your debating style: {}\n\
                     - Let this trait show in every statement\n\
                     - Weave it into both your reasoning and your delivery\n",
                    description.trim()
                ))
            }
        }
    }
}
