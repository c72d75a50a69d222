//! Command abstractions shared by roll triggers and character mutations.

use uuid::Uuid;

/// An intent issued by a participant, traced by its correlation id.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted command name used in log fields, e.g. `rules.ranged_attack`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID carried through every log line the command produces.
    fn correlation_id(&self) -> Uuid;
}
