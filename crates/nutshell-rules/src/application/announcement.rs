//! Result announcement: format a resolved roll as a chat card and publish
//! it to every participant.

use std::fmt;

use chrono::{DateTime, Utc};
use nutshell_character::domain::aggregates::Character;
use nutshell_core::channel::{BroadcastChannel, CHAT_TOPIC, Envelope};
use nutshell_core::clock::Clock;
use nutshell_core::error::DomainError;
use nutshell_core::participant::ActorRef;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::outcome::RollOutcome;

/// One labelled row of a chat card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRow {
    /// Row header, e.g. `TN`.
    pub label: String,
    /// Rendered value, e.g. `+4`.
    pub value: String,
}

/// Human-readable record of a roll, visible to every participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    /// Name of the acting character.
    pub speaker: String,
    /// The character the roll was made for.
    pub actor_ref: ActorRef,
    /// Card title.
    pub title: String,
    /// Rows in display order.
    pub rows: Vec<ChatRow>,
    /// When the resolver posted the card.
    pub posted_at: DateTime<Utc>,
}

impl ChatRecord {
    /// Formats `outcome` for `character`.
    #[must_use]
    pub fn from_outcome(
        outcome: &RollOutcome,
        character: &Character,
        posted_at: DateTime<Utc>,
    ) -> Self {
        let faces: Vec<String> = outcome.dice_results.iter().map(u32::to_string).collect();
        let mut rows = vec![
            row("Dice", format!("[{}]", faces.join(", "))),
            row("Modifier", signed(outcome.modifier)),
            row("Total", outcome.total.to_string()),
            row("TN", outcome.target_number.to_string()),
            row("Result", (if outcome.success { "Success" } else { "Failure" }).to_owned()),
            row("Difference", signed(outcome.difference)),
        ];
        if let Some(strikes) = outcome.strikes {
            rows.push(row("Strikes", strikes.to_string()));
        }

        Self {
            speaker: character.name.clone(),
            actor_ref: character.actor_ref.clone(),
            title: outcome.title.clone(),
            rows,
            posted_at,
        }
    }

    /// Value of the row labelled `label`, if present.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

impl fmt::Display for ChatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | {}", self.speaker, self.title)?;
        let width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        for r in &self.rows {
            writeln!(f, "  {:<width$}  {}", r.label, r.value)?;
        }
        Ok(())
    }
}

fn row(label: &str, value: String) -> ChatRow {
    ChatRow {
        label: label.to_owned(),
        value,
    }
}

/// Renders a value with an explicit sign; zero is `+0`.
#[must_use]
pub fn signed(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// Formats `outcome` and publishes it on the chat topic.
///
/// # Errors
///
/// Returns `DomainError::ChannelUnavailable` if the channel rejects the
/// publish, or `DomainError::Infrastructure` if the record cannot be
/// serialized.
pub async fn announce(
    outcome: &RollOutcome,
    character: &Character,
    channel: &dyn BroadcastChannel,
    clock: &dyn Clock,
) -> Result<ChatRecord, DomainError> {
    let record = ChatRecord::from_outcome(outcome, character, clock.now());
    channel.publish(Envelope::new(CHAT_TOPIC, &record)?).await?;

    info!(
        actor = %character.actor_ref,
        title = %record.title,
        total = outcome.total,
        target_number = outcome.target_number,
        success = outcome.success,
        "roll announced"
    );
    Ok(record)
}
