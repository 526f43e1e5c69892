//! Membership approval state machine.
//!
//! ```text
//! Unseen ──request_access──▶ Pending ──decide(accept)──▶ Approved (in `users`)
//!                               │
//!                               └──decide(reject)──▶ Unseen (no trace kept)
//! ```
//!
//! Every transition is one load → mutate → save under the store lock. Side
//! effects are returned as [`Effect`] values and carried out by the caller
//! after the lock is released, so a slow notification never delays another
//! actor's transition.

use tokio::sync::Mutex;

use crate::callback::Decision;
use crate::error::StoreResult;
use crate::store::{Store, StoreState};
use crate::types::{ActorId, Profile};

/// Result of a state machine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The actor is (now) pending and the owner has been or already was asked
    RequestSent,
    /// The actor is the owner or already a member; nothing changed
    AlreadyAuthorized,
    /// Pending record moved into `users`
    Accepted,
    /// Pending record discarded
    Rejected,
    /// No pending record for the target (typically a decision already processed)
    NotFound,
}

/// Notification requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the owner to accept or reject `requester`
    PromptOwner { requester: ActorId, profile: Profile },
    /// Tell the requester how their request was decided
    NotifyRequester { actor: ActorId, decision: Decision },
    /// Confirm the decision to whoever made it
    NotifyDecider {
        actor: ActorId,
        profile: Profile,
        decision: Decision,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(outcome: Outcome) -> Self {
        Self {
            outcome,
            effects: Vec::new(),
        }
    }
}

/// Owns the store and serializes every read-modify-write on it.
pub struct Gatekeeper {
    owner: ActorId,
    store: Mutex<Box<dyn Store>>,
}

impl Gatekeeper {
    pub fn new(owner: ActorId, store: impl Store + 'static) -> Self {
        Self {
            owner,
            store: Mutex::new(Box::new(store)),
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn is_owner(&self, actor: ActorId) -> bool {
        actor == self.owner
    }

    /// True iff `actor` is the owner or an accepted member.
    pub async fn is_authorized(&self, actor: ActorId) -> StoreResult<bool> {
        if self.is_owner(actor) {
            return Ok(true);
        }
        let store = self.store.lock().await;
        Ok(store.load().await?.is_member(actor))
    }

    /// Consistent copy of the whole store.
    pub async fn snapshot(&self) -> StoreResult<StoreState> {
        let store = self.store.lock().await;
        store.load().await
    }

    /// Records a membership request from `actor`.
    ///
    /// Repeating the request while it is pending changes nothing and does not
    /// prompt the owner again.
    pub async fn request_access(&self, actor: ActorId, profile: Profile) -> StoreResult<Transition> {
        if self.is_owner(actor) {
            return Ok(Transition::quiet(Outcome::AlreadyAuthorized));
        }

        let store = self.store.lock().await;
        let mut state = store.load().await?;

        if state.is_member(actor) {
            return Ok(Transition::quiet(Outcome::AlreadyAuthorized));
        }
        if state.is_pending(actor) {
            log::debug!("Access request from {} is already pending", actor);
            return Ok(Transition::quiet(Outcome::RequestSent));
        }

        state.pending_users.insert(actor.key(), profile.clone());
        store.save(&state).await?;
        log::info!("New access request from {} ({})", actor, profile.handle());

        Ok(Transition {
            outcome: Outcome::RequestSent,
            effects: vec![Effect::PromptOwner {
                requester: actor,
                profile,
            }],
        })
    }

    /// Applies the owner's decision to the pending request of `actor`.
    pub async fn decide(&self, actor: ActorId, decision: Decision) -> StoreResult<Transition> {
        let store = self.store.lock().await;
        let mut state = store.load().await?;

        let Some(profile) = state.pending_users.remove(&actor.key()) else {
            log::debug!("No pending request for {} ({} ignored)", actor, decision);
            return Ok(Transition::quiet(Outcome::NotFound));
        };

        let outcome = match decision {
            Decision::Accept => {
                state.users.insert(actor.key(), profile.clone());
                Outcome::Accepted
            }
            Decision::Reject => Outcome::Rejected,
        };
        store.save(&state).await?;
        log::info!("Access request from {} ({}): {}", actor, profile.handle(), decision);

        Ok(Transition {
            outcome,
            effects: vec![
                Effect::NotifyRequester { actor, decision },
                Effect::NotifyDecider {
                    actor,
                    profile,
                    decision,
                },
            ],
        })
    }
}
