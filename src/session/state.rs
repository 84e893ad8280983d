use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::events::Event;
use super::rounds::{self, Round1, Round2, Round3, RoundContext, RoundError};
use crate::protocol::Message;
use crate::Result;

/// Which message a session is waiting for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Idle, or waiting for the peer's SMP1.
    #[default]
    Expect1,
    /// Sent SMP1, waiting for SMP2.
    Expect2,
    /// Sent SMP2, waiting for SMP3.
    Expect3,
    /// Sent SMP3, waiting for SMP4.
    Expect4,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Expect1 => "EXPECT1",
            StateKind::Expect2 => "EXPECT2",
            StateKind::Expect3 => "EXPECT3",
            StateKind::Expect4 => "EXPECT4",
        };
        f.write_str(name)
    }
}

/// Session state. Each waiting state owns the secrets of the round that led to it,
/// so leaving a state drops them.
pub(crate) enum State {
    Expect1,
    Expect2(Round1),
    Expect3(Round2),
    Expect4(Round3),
}

impl State {
    pub(crate) fn kind(&self) -> StateKind {
        match self {
            State::Expect1 => StateKind::Expect1,
            State::Expect2(_) => StateKind::Expect2,
            State::Expect3(_) => StateKind::Expect3,
            State::Expect4(_) => StateKind::Expect4,
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// Result of feeding one message to a state.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub(crate) next: State,
    pub(crate) reply: Option<Message>,
    pub(crate) event: Option<Event>,
}

impl Outcome {
    fn advance(next: State, reply: Message) -> Self {
        Self {
            next,
            reply: Some(reply),
            event: Some(Event::InProgress),
        }
    }

    fn finish(event: Event, reply: Option<Message>) -> Self {
        Self {
            next: State::Expect1,
            reply,
            event: Some(event),
        }
    }

    fn abort(event: Event) -> Self {
        Self::finish(event, Some(Message::Abort))
    }
}

fn settle<T>(
    result: core::result::Result<T, RoundError>,
    accept: impl FnOnce(T) -> Outcome,
) -> Result<Outcome> {
    match result {
        Ok(value) => Ok(accept(value)),
        Err(RoundError::Rejected(reason)) => {
            warn!(%reason, "peer failed verification, aborting");
            Ok(Outcome::abort(Event::Cheated))
        }
        Err(RoundError::Failed(err)) => Err(err),
    }
}

/// Feeds `message` to `state`.
///
/// The state is only borrowed: on `Err` the caller keeps it unchanged, on `Ok`
/// it is replaced by [`Outcome::next`].
pub(crate) fn transition(
    state: &State,
    message: Message,
    ctx: &mut RoundContext<'_>,
) -> Result<Outcome> {
    match (state, message) {
        (_, Message::Abort) => Ok(Outcome::finish(Event::Abort, None)),

        (State::Expect1, Message::Smp1(msg)) => {
            settle(rounds::answer_smp1(ctx, &msg), |(round, smp2)| {
                Outcome::advance(State::Expect3(round), smp2.into())
            })
        }

        (State::Expect1, Message::Smp1Q(msg)) => {
            settle(rounds::answer_smp1(ctx, msg.body()), |(round, smp2)| {
                Outcome::advance(State::Expect3(round), smp2.into())
            })
        }

        (State::Expect2(round), Message::Smp2(msg)) => {
            settle(rounds::answer_smp2(ctx, round, &msg), |(next, smp3)| {
                Outcome::advance(State::Expect4(next), smp3.into())
            })
        }

        (State::Expect3(round), Message::Smp3(msg)) => {
            settle(rounds::answer_smp3(ctx, round, &msg), |reply| match reply {
                Some(smp4) => {
                    info!("secrets match");
                    Outcome::finish(Event::Success, Some(smp4.into()))
                }
                None => {
                    info!("secrets differ");
                    Outcome::abort(Event::Failure)
                }
            })
        }

        (State::Expect4(round), Message::Smp4(msg)) => {
            settle(rounds::answer_smp4(ctx, round, &msg), |matched| {
                if matched {
                    info!("secrets match");
                    Outcome::finish(Event::Success, None)
                } else {
                    info!("secrets differ");
                    Outcome::abort(Event::Failure)
                }
            })
        }

        (state, message) => {
            warn!(state = %state.kind(), kind = %message.kind(), "unexpected message, aborting");
            Ok(Outcome::abort(Event::Error))
        }
    }
}
