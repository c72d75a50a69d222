//! Console front end: command parsing and the GM threshold prompt.

use std::fmt::Write as _;
use std::num::IntErrorKind;
use std::sync::Arc;

use async_trait::async_trait;
use nutshell_character::domain::skills::SkillKey;
use nutshell_core::participant::ActorRef;
use nutshell_core::prompt::{ThresholdPrompt, ThresholdRequest};
use nutshell_rules::domain::roll::RollKind;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::Mutex;
use tracing::warn;

/// Console input shared between the command loop and the GM prompt.
pub type SharedLines<R> = Arc<Mutex<Lines<R>>>;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `<who> skill|ranged|opposed <actor> [skillKey]`
    Roll {
        /// Seat triggering the roll.
        who: String,
        /// What to roll.
        kind: RollKind,
        /// Character to roll for.
        actor_ref: ActorRef,
    },
    /// `connect <who>`
    Connect(String),
    /// `disconnect <who>`
    Disconnect(String),
    /// `activate <gm>`
    Activate(String),
    /// `channel up|down`
    Channel(bool),
    /// `sheet` with no argument.
    Characters,
    /// `sheet <actor>`
    Sheet(ActorRef),
    /// `damage <actor> <taken>`
    Damage {
        /// Character that took damage.
        actor_ref: ActorRef,
        /// Total strikes taken.
        taken: i32,
    },
    /// `set <actor> <skillKey> <value>`
    SetSkill {
        /// Character to change.
        actor_ref: ActorRef,
        /// Skill to change.
        skill: SkillKey,
        /// New modifier.
        value: i32,
    },
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  <who> skill <actor> <skillKey>   generic skill roll
  <who> ranged <actor>             ranged attack
  <who> opposed <actor>            close combat opposed
  connect <who> | disconnect <who>
  activate <gm>                    make <gm> the active GM
  channel up|down                  bring the broadcast socket up or down
  sheet [actor]                    list characters or show one
  damage <actor> <taken>           record strikes taken
  set <actor> <skillKey> <value>   change a skill modifier
  help | quit
GM prompts: enter a number, blank for the default, or 'cancel'.";

/// Parses one console line. A blank line is `Ok(None)`.
///
/// # Errors
///
/// Returns a usage message if the line is not a known command.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let command = match tokens.as_slice() {
        [] => return Ok(None),
        ["help"] => ConsoleCommand::Help,
        ["quit" | "exit"] => ConsoleCommand::Quit,
        ["connect", who] => ConsoleCommand::Connect((*who).to_owned()),
        ["disconnect", who] => ConsoleCommand::Disconnect((*who).to_owned()),
        ["activate", who] => ConsoleCommand::Activate((*who).to_owned()),
        ["channel", "up"] => ConsoleCommand::Channel(true),
        ["channel", "down"] => ConsoleCommand::Channel(false),
        ["sheet"] => ConsoleCommand::Characters,
        ["sheet", actor] => ConsoleCommand::Sheet(ActorRef::new(*actor)),
        ["damage", actor, taken] => ConsoleCommand::Damage {
            actor_ref: ActorRef::new(*actor),
            taken: integer(taken)?,
        },
        ["set", actor, skill, value] => ConsoleCommand::SetSkill {
            actor_ref: ActorRef::new(*actor),
            skill: skill.parse()?,
            value: integer(value)?,
        },
        [who, "skill", actor, skill] => roll(who, RollKind::Skill(skill.parse()?), actor),
        [who, "ranged", actor] => roll(who, RollKind::RangedAttack, actor),
        [who, "opposed", actor] => roll(who, RollKind::CloseCombatOpposed, actor),
        _ => return Err(format!("unrecognised command: {}; try 'help'", line.trim())),
    };
    Ok(Some(command))
}

fn roll(who: &str, kind: RollKind, actor: &str) -> ConsoleCommand {
    ConsoleCommand::Roll {
        who: who.to_owned(),
        kind,
        actor_ref: ActorRef::new(actor),
    }
}

fn integer(raw: &str) -> Result<i32, String> {
    raw.parse()
        .map_err(|_| format!("expected an integer, got {raw}"))
}

/// Interprets a GM's answer to `request`.
///
/// `None` (end of input) and `cancel` decline. A blank answer takes the
/// default. A number too large for a target also declines. Any other
/// non-numeric text counts as 0.
#[must_use]
pub fn parse_answer(request: &ThresholdRequest, line: Option<&str>) -> Option<i32> {
    let answer = line?.trim();
    if answer.eq_ignore_ascii_case("cancel") {
        return None;
    }
    if answer.is_empty() {
        return Some(request.default_value());
    }
    match answer.parse::<i32>() {
        Ok(value) => Some(value),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            warn!(answer, "threshold out of range; roll cancelled");
            None
        }
        Err(_) => Some(0),
    }
}

/// The question shown to the GM for `request`.
#[must_use]
pub fn render_request(request: &ThresholdRequest) -> String {
    let mut text = format!("{}: {}", request.title(), request.label());
    if let ThresholdRequest::Choice { options, .. } = request {
        let options: Vec<String> = options.iter().map(ToString::to_string).collect();
        let _ = write!(text, " [{}]", options.join("/"));
    }
    let _ = write!(
        text,
        " (default {}, 'cancel' to cancel)",
        request.default_value()
    );
    text
}

/// GM prompt that reads answers from the shared console input.
pub struct ConsolePrompt<R> {
    input: SharedLines<R>,
}

impl<R> std::fmt::Debug for ConsolePrompt<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsolePrompt").finish_non_exhaustive()
    }
}

impl<R> ConsolePrompt<R> {
    /// Creates a prompt reading from `input`.
    #[must_use]
    pub fn new(input: SharedLines<R>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl<R> ThresholdPrompt for ConsolePrompt<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn request_threshold(&self, request: &ThresholdRequest) -> Option<i32> {
        println!("{}", render_request(request));
        let line = match self.input.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "console read failed; treating as cancel");
                None
            }
        };
        parse_answer(request, line.as_deref())
    }
}
