//! Session proposals handed to the notification collaborator.

use serde::Serialize;

use crate::interval::TimeInterval;
use crate::overlap::Resolution;

/// A request to schedule `slot` for two users.
///
/// Transient: the caller turns it into a notification and drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProposal {
    pub user1: String,
    pub user2: String,
    pub slot: TimeInterval,
    pub suggested_game: Option<String>,
}

impl SessionProposal {
    pub fn new(
        user1: impl Into<String>,
        user2: impl Into<String>,
        slot: TimeInterval,
        suggested_game: Option<String>,
    ) -> Self {
        SessionProposal {
            user1: user1.into(),
            user2: user2.into(),
            slot,
            suggested_game,
        }
    }

    /// The chat message announcing this session.
    ///
    /// Display names fall back to the user IDs when absent. The game line is
    /// only present when a game was suggested.
    pub fn notification_message(
        &self,
        user1_name: Option<&str>,
        user2_name: Option<&str>,
    ) -> String {
        let user1 = user1_name.unwrap_or(&self.user1);
        let user2 = user2_name.unwrap_or(&self.user2);

        let mut message = String::from("🎮 **Gaming Session Scheduled!**\n\n");
        message.push_str(&format!(
            "**Time:** {} - {}\n",
            self.slot.start().to_rfc3339(),
            self.slot.end().to_rfc3339()
        ));
        message.push_str(&format!("**Players:** {user1} & {user2}\n"));
        if let Some(game) = &self.suggested_game {
            message.push_str(&format!("**Game:** {game}\n"));
        }
        message
    }
}

impl Resolution {
    /// A proposal for the best match, or `None` when nothing overlaps.
    pub fn propose(&self, user1: &str, user2: &str) -> Option<SessionProposal> {
        self.best_match().map(|best| {
            SessionProposal::new(user1, user2, best.slot(), self.suggested_game.clone())
        })
    }
}
