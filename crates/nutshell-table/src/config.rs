//! Host configuration read from the environment.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use nutshell_character::domain::aggregates::Character;
use nutshell_character::domain::skills::Skills;
use nutshell_core::participant::ActorRef;
use nutshell_core::rng::{DeterministicRng, SystemRng};

use crate::error::TableError;

const DEFAULT_GMS: &str = "gm";
const DEFAULT_PLAYERS: &str = "alice,bob";
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Settings for one table session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Fixed dice seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Privileged participant names, in connection order.
    pub gms: Vec<String>,
    /// Unprivileged participant names, in connection order.
    pub players: Vec<String>,
    /// JSON file holding an array of character records.
    pub characters_path: Option<PathBuf>,
    /// Buffer size of the broadcast channel.
    pub channel_capacity: usize,
}

impl TableConfig {
    /// Reads `NUTSHELL_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `TableError::Config` if any variable is malformed.
    pub fn from_env() -> Result<Self, TableError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `TableError::Config` if the seed or capacity do not parse,
    /// the capacity is zero, no GM is named, or a name is used twice.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TableError> {
        let seed = lookup("NUTSHELL_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| TableError::Config(format!("NUTSHELL_SEED must be a u64: {e}")))
            })
            .transpose()?;

        let gms = names(&lookup("NUTSHELL_GMS").unwrap_or_else(|| DEFAULT_GMS.to_owned()));
        let players =
            names(&lookup("NUTSHELL_PLAYERS").unwrap_or_else(|| DEFAULT_PLAYERS.to_owned()));
        if gms.is_empty() {
            return Err(TableError::Config(
                "NUTSHELL_GMS must name at least one GM".to_owned(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = gms.iter().chain(&players).find(|n| !seen.insert(n.as_str())) {
            return Err(TableError::Config(format!(
                "participant name {dup} is used more than once"
            )));
        }

        let channel_capacity = match lookup("NUTSHELL_CHANNEL_CAPACITY") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                TableError::Config(format!("NUTSHELL_CHANNEL_CAPACITY must be a usize: {e}"))
            })?,
            None => DEFAULT_CHANNEL_CAPACITY,
        };
        if channel_capacity == 0 {
            return Err(TableError::Config(
                "NUTSHELL_CHANNEL_CAPACITY must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            seed,
            gms,
            players,
            characters_path: lookup("NUTSHELL_CHARACTERS")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            channel_capacity,
        })
    }

    /// The dice source for this session.
    #[must_use]
    pub fn rng(&self) -> Arc<Mutex<dyn DeterministicRng + Send>> {
        let rng = match self.seed {
            Some(seed) => SystemRng::seeded(seed),
            None => SystemRng::from_os(),
        };
        Arc::new(Mutex::new(rng))
    }

    /// Loads the character roster from `characters_path`, or the built-in
    /// roster when no path is configured.
    ///
    /// # Errors
    ///
    /// Returns `TableError::Io` if the file cannot be read and
    /// `TableError::Json` if it does not hold character records.
    pub fn load_characters(&self) -> Result<Vec<Character>, TableError> {
        match &self.characters_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&raw)?)
            }
            None => Ok(default_characters()),
        }
    }
}

fn names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .collect()
}

/// The roster used when no character file is configured.
#[must_use]
pub fn default_characters() -> Vec<Character> {
    vec![
        Character::new(
            ActorRef::new("Actor.vale"),
            "Vale",
            Skills {
                close_combat: 1,
                ranged_combat: 3,
                perception: 2,
                endurance: 2,
                ..Skills::default()
            },
        )
        .with_sheet_text("Storm-touched", "longbow, hooded cloak"),
        Character::new(
            ActorRef::new("Actor.rook"),
            "Rook",
            Skills {
                close_combat: 3,
                endurance: 1,
                fitness: 2,
                survival: 1,
                ..Skills::default()
            },
        ),
        Character::new(
            ActorRef::new("Actor.brin"),
            "Brin",
            Skills {
                persuasion: 2,
                expertise: 3,
                power: 1,
                skulduggery: -1,
                ..Skills::default()
            },
        )
        .with_sheet_text("Whispered bargains", "ledger, signet ring"),
    ]
}
