//! Decoding, application, and lifetime tracking of turn actions.
//!
//! [`Actions`] is the live action list of one round. Each turn of a round
//! delta is fed through [`Actions::apply_turn_delta`], which decodes every
//! entry into an [`Action`], applies it to the round being built, and keeps
//! it for drawing until its lifetime runs out.

mod action;
mod draw;

pub use action::{Action, ApplyContext, actor_team, color_to_hex_string};
pub use draw::{DrawCommand, Marker};

use playback_types::{ActionPayload, ActionTag, BodyId, DecodeError, TurnView};
use tracing::trace;

use crate::error::ReplayError;
use crate::round::Round;

/// The live action list of a round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actions {
    /// Actions whose lifetime has not run out. Order is not stable.
    actions: Vec<Action>,
}

impl Actions {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Decode, apply, and retain every action of `turn`.
    ///
    /// Actions are applied in wire order. The first failure aborts the turn.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Decode`] for a `NONE` or unknown tag, a missing
    /// tag or payload, or a payload of another kind than its tag, and any
    /// error of [`Action::apply`].
    pub fn apply_turn_delta<T: TurnView>(
        &mut self,
        ctx: &mut ApplyContext<'_>,
        turn: &T,
        lifetime: u32,
    ) -> Result<(), ReplayError> {
        let robot_id = BodyId(turn.robot_id());

        for index in 0..turn.actions_type_len() {
            let payload = decode_action(turn, index)?;
            let action = Action::new(robot_id, payload, lifetime);
            action.apply(ctx)?;
            self.actions.push(action);
        }

        trace!(
            round = ctx.round_number,
            robot = %robot_id,
            count = turn.actions_type_len(),
            "Turn applied"
        );
        Ok(())
    }

    /// Count every live action down by one round and drop the expired ones.
    ///
    /// An expired action is replaced by the last one, so the surviving order
    /// is not preserved.
    pub fn tick_lifetimes(&mut self) {
        let mut i = 0;
        while let Some(action) = self.actions.get_mut(i) {
            action.lifetime = action.lifetime.saturating_sub(1);
            if action.lifetime == 0 {
                // The swapped-in action is visited at the same index.
                self.actions.swap_remove(i);
            } else {
                i = i.saturating_add(1);
            }
        }
    }

    /// Draw commands of every live action.
    pub fn draw(&self, round: &Round, interpolation: f64) -> Vec<DrawCommand> {
        self.actions
            .iter()
            .flat_map(|action| action.draw(round, interpolation))
            .collect()
    }

    /// Iterate over the live actions.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Number of live actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is live.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Read the tag and payload of one action entry and check they agree.
fn decode_action<T: TurnView>(turn: &T, index: usize) -> Result<ActionPayload, DecodeError> {
    let raw = turn.actions_type(index).ok_or(DecodeError::MissingField {
        field: "actions_type",
        index,
    })?;
    let tag = ActionTag::from_wire(raw)?;
    let payload = turn
        .actions(index, tag)
        .ok_or(DecodeError::MissingField {
            field: "actions",
            index,
        })?;
    if payload.tag() != tag {
        return Err(DecodeError::PayloadMismatch {
            expected: tag,
            found: payload.tag(),
        });
    }
    Ok(payload)
}
