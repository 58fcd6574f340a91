//! Recording pipeline: event bus signals in, `Replay` out
//!
//! The game announces a card play and the decisions that complete it
//! (option, board index, target) as separate, ordered signals. The recorder
//! keeps the latest card in a single pending slot and freezes it into a
//! `Play` or `Summon` action when the next unrelated signal arrives.

use crate::core::{CardDef, CardInstance, Deck, Side};
use crate::events::{handler, Handler};
use crate::game::{
    Agent, Character, Game, GameEvent, GameEventKind, GameLoop, GameResult, TargetRequest, TurnAction,
};
use crate::replay::{Action, CapturingRandom, EntityAddress, LiveEntity, Replay};
use crate::{GameError, Result};
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
struct PendingCard {
    card: EntityAddress,
    minion: bool,
    targetable: bool,
    index: Option<usize>,
    target: Option<EntityAddress>,
}

impl PendingCard {
    fn freeze(self) -> Result<Action> {
        // untargetable cards never carry a target
        let target = if self.targetable { self.target } else { None };
        if !self.minion {
            return Ok(Action::Play {
                card: self.card,
                target,
            });
        }
        let index = self.index.ok_or_else(|| {
            GameError::InvalidAction(format!("minion {} frozen without a board index", self.card))
        })?;
        Ok(Action::Summon {
            card: self.card,
            index,
            target,
        })
    }
}

/// Builds a `Replay` from observed game signals
#[derive(Debug, Default)]
pub struct Recorder {
    replay: Replay,
    pending: Option<PendingCard>,
}

impl Recorder {
    pub fn new(decks: Vec<Deck>) -> Self {
        Recorder {
            replay: Replay {
                decks,
                ..Replay::default()
            },
            pending: None,
        }
    }

    /// The replay recorded so far, without the pending card
    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn random_trace(&self) -> &[i32] {
        &self.replay.random
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn record_random(&mut self, value: i32) {
        self.replay.random.push(value);
    }

    /// Store the kept hand positions of one mulligan
    pub fn record_keep(&mut self, kept: &[bool]) {
        let positions = kept
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(position, _)| position)
            .collect();
        self.replay.keeps.push(positions);
    }

    /// A card left the hand; it becomes the pending card
    pub fn record_card_played(&mut self, hand_index: usize, targetable: bool, minion: bool) -> Result<()> {
        self.flush_pending()?;
        self.pending = Some(PendingCard {
            card: EntityAddress::HandCard(hand_index, None),
            minion,
            targetable,
            index: None,
            target: None,
        });
        Ok(())
    }

    fn pending_mut(&mut self, what: &str) -> Result<&mut PendingCard> {
        self.pending
            .as_mut()
            .ok_or_else(|| GameError::InvalidAction(format!("{} recorded with no card pending", what)))
    }

    pub fn record_option(&mut self, option: usize) -> Result<()> {
        let pending = self.pending_mut("option")?;
        pending.card = pending.card.with_option(option);
        Ok(())
    }

    pub fn record_index(&mut self, index: usize) -> Result<()> {
        self.pending_mut("board index")?.index = Some(index);
        Ok(())
    }

    pub fn record_target(&mut self, target: EntityAddress) -> Result<()> {
        self.pending_mut("card target")?.target = Some(target);
        Ok(())
    }

    pub fn record_attack(&mut self, attacker: EntityAddress, defender: EntityAddress) -> Result<()> {
        self.push(Action::Attack { attacker, defender })
    }

    pub fn record_power(&mut self) -> Result<()> {
        self.push(Action::UsePower { target: None })
    }

    /// Attach a target to the power use that was just recorded
    pub fn record_power_target(&mut self, address: EntityAddress) -> Result<()> {
        match self.replay.actions.last_mut() {
            Some(Action::UsePower { target }) => {
                *target = Some(address);
                Ok(())
            }
            other => Err(GameError::InvalidAction(format!(
                "power target {} recorded after {:?}",
                address, other
            ))),
        }
    }

    pub fn record_turn_end(&mut self) -> Result<()> {
        self.push(Action::EndTurn)
    }

    pub fn record_concede(&mut self) -> Result<()> {
        self.push(Action::Concede)
    }

    /// Append an action after freezing the pending card
    fn push(&mut self, action: Action) -> Result<()> {
        self.flush_pending()?;
        self.replay.actions.push(action);
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            self.replay.actions.push(pending.freeze()?);
        }
        Ok(())
    }

    /// Flush the pending card and hand over the finished replay
    pub fn finish(&mut self) -> Result<Replay> {
        self.flush_pending()?;
        Ok(mem::take(&mut self.replay))
    }

    /// Fold one bus signal into the log
    pub fn on_event(&mut self, event: &GameEvent) -> Result<()> {
        match event {
            GameEvent::KeptCards { kept, .. } => self.record_keep(kept),
            GameEvent::CardPlayed {
                hand_index,
                targetable,
                minion,
                ..
            } => self.record_card_played(*hand_index, *targetable, *minion)?,
            GameEvent::OptionChosen { option, .. } => self.record_option(*option)?,
            GameEvent::Attack {
                attacker, defender, ..
            } => self.record_attack(*attacker, *defender)?,
            GameEvent::UsedPower { .. } => self.record_power()?,
            GameEvent::FoundPowerTarget { target, .. } => self.record_power_target(*target)?,
            GameEvent::TurnEnded { .. } => self.record_turn_end()?,
            GameEvent::Conceded { .. } => self.record_concede()?,
            GameEvent::MinionAdded { .. }
            | GameEvent::MinionDied { .. }
            | GameEvent::GameEnded { .. }
            | GameEvent::TurnStarted { .. }
            | GameEvent::CardDrawn { .. } => {}
        }
        Ok(())
    }
}

const GAME_SIGNALS: [GameEventKind; 1] = [GameEventKind::KeptCards];

const PLAYER_SIGNALS: [GameEventKind; 7] = [
    GameEventKind::CardPlayed,
    GameEventKind::OptionChosen,
    GameEventKind::Attack,
    GameEventKind::UsedPower,
    GameEventKind::FoundPowerTarget,
    GameEventKind::TurnEnded,
    GameEventKind::Conceded,
];

/// Handlers bound by `subscribe`, kept so they can be unbound again
pub struct Subscription {
    game_handler: Handler<GameEvent, ()>,
    player_handler: Handler<GameEvent, Side>,
}

impl Subscription {
    pub fn unsubscribe(&self, game: &Game) {
        for kind in GAME_SIGNALS {
            game.events().unbind(kind, &self.game_handler);
        }
        for side in Side::BOTH {
            for kind in PLAYER_SIGNALS {
                game.player(side).events().unbind(kind, &self.player_handler);
            }
        }
    }
}

/// Bind `recorder` to the game bus and both player buses
pub fn subscribe(recorder: &Rc<RefCell<Recorder>>, game: &Game) -> Subscription {
    let game_recorder = Rc::clone(recorder);
    let game_handler = handler(move |_: &(), event: &GameEvent| game_recorder.borrow_mut().on_event(event));
    let player_recorder = Rc::clone(recorder);
    let player_handler = handler(move |_: &Side, event: &GameEvent| player_recorder.borrow_mut().on_event(event));

    for kind in GAME_SIGNALS {
        game.events().bind(kind, Rc::clone(&game_handler), ());
    }
    for side in Side::BOTH {
        for kind in PLAYER_SIGNALS {
            game.player(side).events().bind(kind, Rc::clone(&player_handler), side);
        }
    }
    Subscription {
        game_handler,
        player_handler,
    }
}

/// Agent decorator reporting the board index and card targets its inner
/// agent picks
pub struct RecordingAgent<A> {
    inner: A,
    recorder: Rc<RefCell<Recorder>>,
}

impl<A: Agent> RecordingAgent<A> {
    pub fn new(inner: A, recorder: Rc<RefCell<Recorder>>) -> Self {
        RecordingAgent { inner, recorder }
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: Agent> Agent for RecordingAgent<A> {
    fn mulligan(&mut self, game: &Game, side: Side, hand: &[CardInstance]) -> Result<Vec<bool>> {
        self.inner.mulligan(game, side, hand)
    }

    fn choose_action(&mut self, game: &Game, available: &[TurnAction]) -> Result<Option<TurnAction>> {
        self.inner.choose_action(game, available)
    }

    fn choose_target(
        &mut self,
        game: &Game,
        request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character> {
        let target = self.inner.choose_target(game, request, targets)?;
        if request == TargetRequest::Card {
            // taken now, before the card's effect changes the board
            let address = EntityAddress::from_live(LiveEntity::Character(target), game)?;
            self.recorder.borrow_mut().record_target(address)?;
        }
        Ok(target)
    }

    fn choose_index(&mut self, game: &Game, card: &'static CardDef) -> Result<usize> {
        let index = self.inner.choose_index(game, card)?;
        self.recorder.borrow_mut().record_index(index)?;
        Ok(index)
    }

    fn choose_option(&mut self, game: &Game, card: &'static CardDef) -> Result<usize> {
        self.inner.choose_option(game, card)
    }

    fn on_game_end(&mut self, game: &Game, won: bool) {
        self.inner.on_game_end(game, won)
    }
}

/// A live game wired for recording
///
/// Randomness comes from a seeded generator whose values land in the
/// recorder's trace, and the recorder listens on every bus.
pub struct RecordingGame {
    game: Game,
    recorder: Rc<RefCell<Recorder>>,
}

impl RecordingGame {
    pub fn new(decks: [Deck; 2], seed: u64) -> Self {
        let recorder = Rc::new(RefCell::new(Recorder::new(decks.to_vec())));
        let random = CapturingRandom::new(seed, Rc::clone(&recorder));
        let game = Game::new(decks, Box::new(random));
        subscribe(&recorder, &game);
        RecordingGame { game, recorder }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn recorder(&self) -> Rc<RefCell<Recorder>> {
        Rc::clone(&self.recorder)
    }

    /// Wrap an agent so its card decisions are recorded
    pub fn wrap<A: Agent>(&self, agent: A) -> RecordingAgent<A> {
        RecordingAgent::new(agent, Rc::clone(&self.recorder))
    }

    /// Play a whole game through the live game loop
    pub fn play(&mut self, agent1: &mut dyn Agent, agent2: &mut dyn Agent, max_turns: u32) -> Result<GameResult> {
        let mut first = self.wrap(agent1);
        let mut second = self.wrap(agent2);
        GameLoop::new(&mut self.game)
            .with_max_turns(max_turns)
            .run_game(&mut first, &mut second)
    }

    /// Stop recording and return the replay
    pub fn finish(self) -> Result<Replay> {
        let replay = self.recorder.borrow_mut().finish();
        replay
    }
}
