//! Button payload grammar.
//!
//! ```text
//! payload  := decision ":" id | menu
//! decision := "accept" | "reject"
//! menu     := "contact" | "help" | "list" | "start_fw" | "stop_fw"
//!           | "group_settings" | "set_channel"
//! id       := decimal u64, no sign or leading zeros
//! ```

use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::DecodeError;
use crate::types::ActorId;

/// Owner's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

/// Static menu buttons. None of them touch the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum MenuAction {
    SetChannel,
    GroupSettings,
    List,
    StartFw,
    StopFw,
    Contact,
    Help,
}

/// Decoded button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    ApprovalDecision { decision: Decision, target: ActorId },
    Menu(MenuAction),
}

impl CallbackAction {
    /// Payload to attach to an approval button.
    pub fn decision_payload(decision: Decision, target: ActorId) -> String {
        format!("{}:{}", decision, target)
    }

    /// Payload to attach to a menu button.
    pub fn menu_payload(action: MenuAction) -> &'static str {
        action.into()
    }

    /// Encodes the action back into its payload string.
    pub fn to_payload(&self) -> String {
        match *self {
            CallbackAction::ApprovalDecision { decision, target } => Self::decision_payload(decision, target),
            CallbackAction::Menu(action) => Self::menu_payload(action).to_string(),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = DecodeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some((prefix, target)) = raw.split_once(':') {
            if let Ok(decision) = prefix.parse::<Decision>() {
                // Only the canonical decimal form: no sign, no leading zeros
                let id = target
                    .parse::<ActorId>()
                    .ok()
                    .filter(|id| id.key() == target)
                    .ok_or_else(|| DecodeError::InvalidTarget(target.to_string()))?;
                return Ok(CallbackAction::ApprovalDecision { decision, target: id });
            }
        }

        raw.parse::<MenuAction>()
            .map(CallbackAction::Menu)
            .map_err(|_| DecodeError::UnknownAction(raw.to_string()))
    }
}
