//! Update classification and handlers
//!
//! `Dispatcher::process` turns one update into the Bot API calls it requires.
//! It only touches the store (through the `Gatekeeper`); delivery happens
//! afterwards, outside the store lock.

use std::sync::Arc;

use fwdcore::{ActorId, CallbackAction, Decision, Effect, Gatekeeper, MenuAction, Outcome};
use teloxide::types::{CallbackQuery, ChatId, Message, MessageId, Update, UpdateKind, User};

use super::bot::{actor_chat, actor_of, Command};
use super::menu;
use super::messenger::Outgoing;

pub struct Dispatcher {
    gatekeeper: Arc<Gatekeeper>,
    owner_username: String,
    bot_username: Option<String>,
}

impl Dispatcher {
    pub fn new(gatekeeper: Arc<Gatekeeper>, owner_username: impl Into<String>, bot_username: Option<String>) -> Self {
        Self {
            gatekeeper,
            owner_username: owner_username.into(),
            bot_username,
        }
    }

    pub fn gatekeeper(&self) -> &Arc<Gatekeeper> {
        &self.gatekeeper
    }

    /// Handles one update and returns the calls to deliver, in order.
    pub async fn process(&self, update: Update) -> Vec<Outgoing> {
        let update_id = update.id;
        match update.kind {
            UpdateKind::Message(msg) => self.handle_message(&msg).await,
            UpdateKind::CallbackQuery(query) => self.handle_callback(&query).await,
            _ => {
                log::debug!("Ignoring update {:?}: unsupported kind", update_id);
                Vec::new()
            }
        }
    }

    async fn handle_message(&self, msg: &Message) -> Vec<Outgoing> {
        let Some(command) = msg
            .text()
            .and_then(|text| Command::from_text(text, self.bot_username.as_deref()))
        else {
            log::debug!("Ignoring non-command message in chat {}", msg.chat.id);
            return Vec::new();
        };
        let Some(user) = msg.from.as_ref() else {
            return Vec::new();
        };

        log::info!("🎯 Received command: {:?} from chat {}", command, msg.chat.id);
        self.handle_command(command, user, msg.chat.id).await
    }

    /// Replies to a command sent by `user` in `chat`.
    pub async fn handle_command(&self, command: Command, user: &User, chat: ChatId) -> Vec<Outgoing> {
        match command {
            Command::Start => self.handle_start(user, chat).await,
        }
    }

    async fn handle_start(&self, user: &User, chat: ChatId) -> Vec<Outgoing> {
        let (actor, profile) = actor_of(user);

        let authorized = match self.gatekeeper.is_authorized(actor).await {
            Ok(authorized) => authorized,
            Err(e) => {
                log::error!("Failed to check membership of {}: {}", actor, e);
                return vec![Outgoing::text(chat, menu::TRY_AGAIN_LATER)];
            }
        };
        if authorized {
            return vec![self.main_menu(actor, chat)];
        }

        match self.gatekeeper.request_access(actor, profile).await {
            Ok(transition) if transition.outcome == Outcome::AlreadyAuthorized => vec![self.main_menu(actor, chat)],
            Ok(transition) => {
                let mut outgoing = self.render_effects(transition.effects, None);
                outgoing.push(Outgoing::text(chat, menu::REQUEST_PENDING));
                outgoing
            }
            Err(e) => {
                log::error!("Failed to record access request from {}: {}", actor, e);
                vec![Outgoing::text(chat, menu::TRY_AGAIN_LATER)]
            }
        }
    }

    /// Handles a button press. The press is always acknowledged first;
    /// payloads outside the callback grammar get nothing else.
    pub async fn handle_callback(&self, query: &CallbackQuery) -> Vec<Outgoing> {
        let mut outgoing = vec![Outgoing::AnswerCallback(query.id.clone())];

        let Some(data) = query.data.as_deref() else {
            return outgoing;
        };
        let action = match data.parse::<CallbackAction>() {
            Ok(action) => action,
            Err(e) => {
                log::debug!("Ignoring callback from {}: {}", query.from.id, e);
                return outgoing;
            }
        };
        let origin = query.message.as_ref().map(|m| (m.chat().id, m.id()));

        match action {
            CallbackAction::ApprovalDecision { decision, target } => {
                outgoing.extend(self.handle_decision(&query.from, decision, target, origin).await);
            }
            CallbackAction::Menu(action) => {
                let chat = origin
                    .map(|(chat, _)| chat)
                    .unwrap_or_else(|| actor_chat(ActorId(query.from.id.0)));
                outgoing.push(self.menu_action(action, chat));
            }
        }
        outgoing
    }

    async fn handle_decision(
        &self,
        from: &User,
        decision: Decision,
        target: ActorId,
        origin: Option<(ChatId, MessageId)>,
    ) -> Vec<Outgoing> {
        let decider = ActorId(from.id.0);
        if !self.gatekeeper.is_owner(decider) {
            log::warn!("Ignoring {} for {} pressed by non-owner {}", decision, target, decider);
            return Vec::new();
        }

        match self.gatekeeper.decide(target, decision).await {
            Ok(transition) => {
                if transition.outcome == Outcome::NotFound {
                    log::info!("Request from {} was already decided, ignoring {}", target, decision);
                }
                self.render_effects(transition.effects, origin)
            }
            Err(e) => {
                log::error!("Failed to {} request from {}: {}", decision, target, e);
                vec![Outgoing::text(actor_chat(decider), menu::TRY_AGAIN_LATER)]
            }
        }
    }

    fn menu_action(&self, action: MenuAction, chat: ChatId) -> Outgoing {
        Outgoing::text(chat, menu::menu_reply(action, &self.owner_username))
    }

    fn main_menu(&self, actor: ActorId, chat: ChatId) -> Outgoing {
        Outgoing::with_keyboard(chat, menu::WELCOME, menu::main_menu(self.gatekeeper.is_owner(actor)))
    }

    /// Turns state machine effects into Bot API calls.
    ///
    /// `origin` is the owner's prompt message; the decision notice replaces
    /// it when known, otherwise it is sent as a new message.
    fn render_effects(&self, effects: Vec<Effect>, origin: Option<(ChatId, MessageId)>) -> Vec<Outgoing> {
        let owner_chat = actor_chat(self.gatekeeper.owner());
        effects
            .into_iter()
            .map(|effect| match effect {
                Effect::PromptOwner { requester, profile } => Outgoing::with_keyboard(
                    owner_chat,
                    menu::approval_prompt(requester, &profile),
                    menu::approval_keyboard(requester),
                ),
                Effect::NotifyRequester { actor, decision } => {
                    Outgoing::text(actor_chat(actor), menu::requester_notice(decision))
                }
                Effect::NotifyDecider { profile, decision, .. } => {
                    let text = menu::decider_notice(decision, &profile);
                    match origin {
                        Some((chat, message)) => Outgoing::Edit { chat, message, text },
                        None => Outgoing::text(owner_chat, text),
                    }
                }
            })
            .collect()
    }
}
