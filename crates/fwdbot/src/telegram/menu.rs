//! Menu layout and user-facing texts

use fwdcore::{ActorId, CallbackAction, Decision, MenuAction, Profile};
use indoc::indoc;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub const WELCOME: &str = "👋 Welcome!\nUse the menu below 👇";
pub const REQUEST_PENDING: &str = "⏳ Your membership request has been sent to the owner";
pub const REQUEST_APPROVED: &str = "✅ Your request was approved and you have been added to the bot 🎉";
pub const REQUEST_REJECTED: &str = "❌ Unfortunately your request was rejected";
pub const DECIDER_REJECTED: &str = "❌ The request was rejected";
pub const TRY_AGAIN_LATER: &str = "⚠️ Something went wrong on our side, please try again later";

const HELP: &str = indoc! {"
    ❓ Help:

    1️⃣ Make the bot an admin of your channel or group
    2️⃣ Send the link starting with @
    3️⃣ Wait for the owner's approval 😎"};

/// Inline button carrying callback data.
pub fn cb(text: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), data.into())
}

fn menu_button(text: &str, action: MenuAction) -> Vec<InlineKeyboardButton> {
    vec![cb(text, CallbackAction::menu_payload(action))]
}

/// Main menu for authorized actors; the owner additionally gets group settings.
pub fn main_menu(owner: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        menu_button("📡 Set source channel", MenuAction::SetChannel),
        menu_button("📋 List", MenuAction::List),
        menu_button("▶️ Start forwarding", MenuAction::StartFw),
        menu_button("⏹ Stop forwarding", MenuAction::StopFw),
        menu_button("📞 Contact admin", MenuAction::Contact),
        menu_button("❓ Help", MenuAction::Help),
    ];
    if owner {
        rows.insert(1, menu_button("⚙️ Group settings", MenuAction::GroupSettings));
    }
    InlineKeyboardMarkup::new(rows)
}

/// Accept / reject buttons bound to `requester`.
pub fn approval_keyboard(requester: ActorId) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        cb("✅ Accept", CallbackAction::decision_payload(Decision::Accept, requester)),
        cb("❌ Reject", CallbackAction::decision_payload(Decision::Reject, requester)),
    ]])
}

/// Text of the approval prompt sent to the owner.
pub fn approval_prompt(requester: ActorId, profile: &Profile) -> String {
    let username = profile
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| format!("@{}", u))
        .unwrap_or_else(|| "—".to_string());
    format!(
        "👤 New membership request\n\n👤 Name: {}\n🔗 Username: {}\n🆔 Numeric ID: {}",
        profile.name, username, requester
    )
}

/// Notice for the requester once the owner decided.
pub fn requester_notice(decision: Decision) -> &'static str {
    match decision {
        Decision::Accept => REQUEST_APPROVED,
        Decision::Reject => REQUEST_REJECTED,
    }
}

/// Confirmation shown to the owner in place of the approval prompt.
pub fn decider_notice(decision: Decision, profile: &Profile) -> String {
    match decision {
        Decision::Accept => format!("✅ User {} was added", profile.handle()),
        Decision::Reject => DECIDER_REJECTED.to_string(),
    }
}

/// Static reply of a menu button.
pub fn menu_reply(action: MenuAction, owner_username: &str) -> String {
    match action {
        MenuAction::Contact => format!("📞 Contact the admin:\n{}", owner_username),
        MenuAction::Help => HELP.to_string(),
        MenuAction::List => "📋 The list is under development…".to_string(),
        MenuAction::StartFw => "▶️ Forwarding has been enabled for you".to_string(),
        MenuAction::StopFw => "⏹ Forwarding has been stopped for you".to_string(),
        MenuAction::GroupSettings => "⚙️ Group settings are under development…".to_string(),
        MenuAction::SetChannel => "📡 Setting a source channel is under development…".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use teloxide::types::InlineKeyboardButtonKind;

    fn payloads(markup: &InlineKeyboardMarkup) -> Vec<Vec<String>> {
        markup
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                        other => panic!("unexpected button kind {:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_member_menu_layout() {
        assert_eq!(
            payloads(&main_menu(false)),
            vec![
                vec!["set_channel"],
                vec!["list"],
                vec!["start_fw"],
                vec!["stop_fw"],
                vec!["contact"],
                vec!["help"],
            ]
        );
    }

    #[test]
    fn test_owner_menu_has_group_settings_second() {
        let rows = payloads(&main_menu(true));
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[1], vec!["group_settings"]);
        assert!(!payloads(&main_menu(false)).concat().contains(&"group_settings".to_string()));
    }

    #[test]
    fn test_approval_keyboard_is_bound_to_requester() {
        assert_eq!(
            payloads(&approval_keyboard(ActorId(111))),
            vec![vec!["accept:111", "reject:111"]]
        );
    }

    #[test]
    fn test_approval_prompt_lists_requester() {
        let text = approval_prompt(ActorId(111), &Profile::new("Ali Rezaei", Some("ali".into())));
        assert!(text.contains("Ali Rezaei"));
        assert!(text.contains("@ali"));
        assert!(text.contains("111"));

        let anonymous = approval_prompt(ActorId(5), &Profile::new("Sara", None));
        assert!(anonymous.contains("Username: —"));
    }

    #[test]
    fn test_contact_names_owner() {
        assert!(menu_reply(MenuAction::Contact, "@boss").ends_with("@boss"));
        assert!(menu_reply(MenuAction::Help, "@boss").starts_with("❓ Help:"));
    }

    #[test]
    fn test_decider_notice_uses_handle() {
        let profile = Profile::new("Ali", Some("ali".into()));
        assert_eq!(decider_notice(Decision::Accept, &profile), "✅ User @ali was added");
        assert_eq!(decider_notice(Decision::Reject, &profile), DECIDER_REJECTED);
    }
}
