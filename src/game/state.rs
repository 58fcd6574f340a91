//! Main game state structure and turn operations

use crate::core::{
    CardDef, CardInstance, Deck, EntityId, MinionId, Player, Side, MAX_BOARD, MAX_HAND, MAX_MANA,
};
use crate::events::EventBus;
use crate::game::{Agent, GameEvent, GameLogger, TargetRequest, TurnAction};
use crate::game_log;
use crate::replay::{EntityAddress, LiveEntity, RandomSource};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Anything that can attack, be attacked or be targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Hero(Side),
    Minion(MinionId),
}

/// Characters on one or both sides; a full table is 16
pub type CharacterList = SmallVec<[Character; 16]>;

/// Complete game state
///
/// Owns both players (each with its own event bus), the game-wide event bus
/// and the source of every random number the game uses.
pub struct Game {
    players: [Player; 2],
    current: Side,
    turn: u32,
    random: Box<dyn RandomSource>,
    events: EventBus<GameEvent>,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,

    over: bool,
    winner: Option<Side>,

    /// Centralized logger for game events
    pub logger: GameLogger,
}

impl Game {
    /// Create a game between two decks; the first deck's owner moves first
    pub fn new(decks: [Deck; 2], random: Box<dyn RandomSource>) -> Self {
        let [first, second] = decks;
        Game {
            players: [
                Player::new(Side::First, first.character_class, &first.cards),
                Player::new(Side::Second, second.character_class, &second.cards),
            ],
            current: Side::First,
            turn: 0,
            random,
            events: EventBus::new(),
            next_entity_id: 0,
            over: false,
            winner: None,
            logger: GameLogger::new(),
        }
    }

    /// Game-wide event bus (mulligans, minions entering and leaving, game end)
    pub fn events(&self) -> &EventBus<GameEvent> {
        &self.events
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn current_side(&self) -> Side {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.current)
    }

    /// Number of turns started so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// `None` while running, or when both heroes died together
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn random_source(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    /// Draw a bounded random integer (inclusive) from the game's source
    pub fn random(&mut self, lower: i32, upper: i32) -> Result<i32> {
        self.random.draw(lower, upper)
    }

    /// Draw a random position into a candidate list of length `len`
    pub(crate) fn random_index(&mut self, len: usize) -> Result<usize> {
        let upper = i32::try_from(len.saturating_sub(1))
            .map_err(|_| GameError::InvalidAction(format!("too many random candidates: {}", len)))?;
        let value = self.random(0, upper)?;
        usize::try_from(value)
            .ok()
            .filter(|&index| index < len)
            .ok_or_else(|| GameError::InvalidAction(format!("random value {} outside 0..{}", value, len)))
    }

    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub(crate) fn emit(&self, side: Side, event: GameEvent) -> Result<()> {
        self.players[side.index()].events().trigger(&event)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.over {
            return Err(GameError::InvalidAction("the game is over".to_string()));
        }
        Ok(())
    }

    /// Deal opening hands and run both mulligans, first side first
    ///
    /// The first side draws three cards, the second four. Rejected cards go
    /// to the bottom of the deck and are replaced from the top, in place.
    pub fn pre_game(&mut self, agents: [&mut dyn Agent; 2]) -> Result<()> {
        for side in Side::BOTH {
            let count = match side {
                Side::First => 3,
                Side::Second => 4,
            };
            for _ in 0..count {
                self.draw_card(side)?;
            }
        }
        for (side, agent) in Side::BOTH.into_iter().zip(agents) {
            self.mulligan(side, agent)?;
        }
        Ok(())
    }

    fn mulligan(&mut self, side: Side, agent: &mut dyn Agent) -> Result<()> {
        let hand = self.player(side).hand.clone();
        let kept = agent.mulligan(self, side, &hand)?;
        if kept.len() != hand.len() {
            return Err(GameError::InvalidAction(format!(
                "mulligan for {} answered {} slots for a hand of {}",
                side,
                kept.len(),
                hand.len()
            )));
        }
        self.events.trigger(&GameEvent::KeptCards {
            side,
            kept: kept.clone(),
        })?;

        let rejected: Vec<usize> = kept
            .iter()
            .enumerate()
            .filter(|(_, keep)| !**keep)
            .map(|(slot, _)| slot)
            .collect();
        for &slot in &rejected {
            let def = hand[slot].def;
            self.player_mut(side).deck.push_back(def);
        }
        for &slot in &rejected {
            let def = self
                .player_mut(side)
                .deck
                .pop_front()
                .ok_or_else(|| GameError::InvalidDeck("deck ran out during mulligan".to_string()))?;
            let id = self.next_id();
            self.player_mut(side).hand[slot] = CardInstance { id, def };
            self.emit(side, GameEvent::CardDrawn { side, card: def.name })?;
        }
        game_log!(
            self.logger,
            Normal,
            "game",
            "{} keeps {} of {} cards",
            side,
            hand.len() - rejected.len(),
            hand.len()
        );
        Ok(())
    }

    /// Begin the current side's turn: mana, wake-ups, then the draw
    pub fn start_turn(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.turn += 1;
        let side = self.current;
        {
            let player = self.player_mut(side);
            player.max_mana = (player.max_mana + 1).min(MAX_MANA);
            player.mana = player.max_mana;
            player.power_used = false;
            player.hero_attacked = false;
            for minion in &mut player.minions {
                minion.sleeping = false;
                minion.attacked_this_turn = false;
            }
        }
        game_log!(self.logger, Minimal, "game", "Turn {} ({})", self.turn, side);
        self.emit(side, GameEvent::TurnStarted { side, turn: self.turn })?;
        self.draw_card(side)?;
        self.process_deaths()
    }

    /// Finish the current side's turn and pass control
    pub fn end_turn(&mut self) -> Result<()> {
        self.ensure_running()?;
        let side = self.current;
        self.emit(side, GameEvent::TurnEnded { side, turn: self.turn })?;
        self.player_mut(side).temp_attack = 0;
        self.current = side.other();
        Ok(())
    }

    /// Draw the top card; an empty deck deals growing fatigue damage and a
    /// full hand burns the card
    pub fn draw_card(&mut self, side: Side) -> Result<()> {
        let Some(def) = self.player_mut(side).deck.pop_front() else {
            let player = self.player_mut(side);
            player.fatigue += 1;
            let damage = player.fatigue;
            player.take_damage(damage);
            game_log!(self.logger, Normal, "game", "{} takes {} fatigue damage", side, damage);
            return Ok(());
        };
        if self.player(side).hand.len() >= MAX_HAND {
            game_log!(self.logger, Normal, "game", "{} burns {}", side, def.name);
            return Ok(());
        }
        let id = self.next_id();
        self.player_mut(side).hand.push(CardInstance { id, def });
        game_log!(self.logger, Verbose, "game", "{} draws {}", side, def.name);
        self.emit(side, GameEvent::CardDrawn { side, card: def.name })
    }

    /// Play the card at `hand_index` for the current side
    ///
    /// The card leaves the hand and `CardPlayed` fires before the agent is
    /// asked for the option, the board index and the target, in that order.
    pub fn play_card(&mut self, agent: &mut dyn Agent, hand_index: usize) -> Result<()> {
        self.ensure_running()?;
        let side = self.current;
        let player = self.player(side);
        let card = *player
            .hand
            .get(hand_index)
            .ok_or_else(|| GameError::InvalidAction(format!("no card at hand slot {}", hand_index)))?;
        let def = card.def;
        if def.mana > player.mana {
            return Err(GameError::InvalidAction(format!(
                "{} costs {} but only {} mana is available",
                def.name, def.mana, player.mana
            )));
        }
        if def.is_minion() && player.minions.len() >= MAX_BOARD {
            return Err(GameError::InvalidAction(format!("board is full, cannot play {}", def.name)));
        }

        let player = self.player_mut(side);
        player.hand.remove(hand_index);
        player.mana -= def.mana;
        game_log!(self.logger, Normal, "game", "{} plays {}", side, def.name);
        self.emit(
            side,
            GameEvent::CardPlayed {
                side,
                hand_index,
                card: def.name,
                targetable: def.targetable,
                minion: def.is_minion(),
            },
        )?;

        let mut effect = def.effect;
        if def.has_choices() {
            let option = agent.choose_option(self, def)?;
            let choice = def.choices.get(option).ok_or_else(|| {
                GameError::InvalidAction(format!("{} has no option {}", def.name, option))
            })?;
            effect = choice.effect;
            self.emit(side, GameEvent::OptionChosen { side, option })?;
        }

        let position = if def.is_minion() {
            let index = agent.choose_index(self, def)?;
            if index > self.player(side).minions.len() {
                return Err(GameError::InvalidAction(format!("board index {} out of range", index)));
            }
            Some(index)
        } else {
            None
        };

        let target = if def.targetable {
            let targets = self.characters();
            if targets.is_empty() {
                None
            } else {
                Some(self.ask_target(agent, TargetRequest::Card, &targets)?)
            }
        } else {
            None
        };

        let source = match position {
            Some(index) => Some(self.summon(side, def, index)?),
            None => None,
        };
        self.resolve_effect(side, effect, target, source)?;
        self.process_deaths()
    }

    fn ask_target(
        &mut self,
        agent: &mut dyn Agent,
        request: TargetRequest,
        targets: &[Character],
    ) -> Result<Character> {
        let target = agent.choose_target(self, request, targets)?;
        if !targets.contains(&target) {
            return Err(GameError::InvalidAction(format!("{:?} is not a valid target", target)));
        }
        Ok(target)
    }

    /// Put a minion for `def` onto `side`'s board at `index` (clamped)
    pub fn summon(&mut self, side: Side, def: &'static CardDef, index: usize) -> Result<MinionId> {
        if self.player(side).minions.len() >= MAX_BOARD {
            return Err(GameError::InvalidAction(format!("board is full, cannot summon {}", def.name)));
        }
        let id = self.next_id();
        let minions = &mut self.player_mut(side).minions;
        let position = index.min(minions.len());
        minions.insert(position, crate::core::Minion::new(id, def));
        self.events.trigger(&GameEvent::MinionAdded {
            side,
            minion: id,
            position,
        })?;
        Ok(id)
    }

    /// Attack with `attacker` against an enemy character chosen by the agent
    pub fn attack(&mut self, agent: &mut dyn Agent, attacker: Character) -> Result<()> {
        self.ensure_running()?;
        let side = self.current;
        let ready = match attacker {
            Character::Hero(owner) => owner == side && self.player(side).can_hero_attack(),
            Character::Minion(id) => self
                .player(side)
                .minions
                .iter()
                .any(|m| m.id == id && m.can_attack()),
        };
        if !ready {
            return Err(GameError::InvalidAction(format!("{:?} cannot attack", attacker)));
        }

        let targets = self.enemy_characters(side);
        let defender = self.ask_target(agent, TargetRequest::Attack, &targets)?;
        let attacker_address = self.address_of(attacker)?;
        let defender_address = self.address_of(defender)?;
        game_log!(
            self.logger,
            Normal,
            "game",
            "{} attacks {}",
            attacker_address,
            defender_address
        );
        self.emit(
            side,
            GameEvent::Attack {
                side,
                attacker: attacker_address,
                defender: defender_address,
            },
        )?;

        let damage = self.attack_value(attacker);
        self.damage(defender, damage);
        // heroes do not strike back
        if let Character::Minion(_) = defender {
            let retaliation = self.attack_value(defender);
            self.damage(attacker, retaliation);
        }
        match attacker {
            Character::Hero(_) => self.player_mut(side).hero_attacked = true,
            Character::Minion(id) => {
                if let Some(minion) = self.minion_mut(id) {
                    minion.attacked_this_turn = true;
                }
            }
        }
        self.process_deaths()
    }

    /// Whether the current side may use its hero power right now
    pub fn power_available(&self) -> bool {
        let player = self.current_player();
        if self.over || !player.can_use_power() {
            return false;
        }
        match player.power.effect {
            crate::core::PowerEffect::Reinforce | crate::core::PowerEffect::TotemicCall => {
                player.minions.len() < MAX_BOARD
            }
            _ => true,
        }
    }

    /// Use the current side's hero power
    ///
    /// `UsedPower` fires once mana is paid; a targeted power then asks for a
    /// target and announces it with `FoundPowerTarget`.
    pub fn use_power(&mut self, agent: &mut dyn Agent) -> Result<()> {
        self.ensure_running()?;
        if !self.power_available() {
            return Err(GameError::InvalidAction("hero power is not available".to_string()));
        }
        let side = self.current;
        let power = self.player(side).power;
        {
            let player = self.player_mut(side);
            player.mana -= power.mana;
            player.power_used = true;
        }
        game_log!(self.logger, Normal, "game", "{} uses {}", side, power.name);
        self.emit(side, GameEvent::UsedPower { side })?;

        let target = if power.targeted {
            let targets = self.characters();
            let target = self.ask_target(agent, TargetRequest::Power, &targets)?;
            let address = self.address_of(target)?;
            self.emit(side, GameEvent::FoundPowerTarget { side, target: address })?;
            Some(target)
        } else {
            None
        };
        self.resolve_power(side, power.effect, target)?;
        self.process_deaths()
    }

    /// The current side gives up
    pub fn concede(&mut self) -> Result<()> {
        self.ensure_running()?;
        let side = self.current;
        game_log!(self.logger, Minimal, "game", "{} concedes", side);
        self.emit(side, GameEvent::Conceded { side })?;
        self.player_mut(side).dead = true;
        self.process_deaths()
    }

    /// Remove dead minions, then end the game if a hero has fallen
    pub fn process_deaths(&mut self) -> Result<()> {
        for side in Side::BOTH {
            let mut died = Vec::new();
            self.player_mut(side).minions.retain(|minion| {
                if minion.is_dead() {
                    died.push((minion.id, minion.def.name));
                    false
                } else {
                    true
                }
            });
            for (minion, name) in died {
                game_log!(self.logger, Verbose, "game", "{} dies ({})", name, side);
                self.events.trigger(&GameEvent::MinionDied { side, minion, name })?;
            }
        }

        if self.over {
            return Ok(());
        }
        let fallen: Vec<Side> = Side::BOTH
            .into_iter()
            .filter(|&side| {
                let player = self.player(side);
                player.dead || player.health <= 0
            })
            .collect();
        if fallen.is_empty() {
            return Ok(());
        }
        for &side in &fallen {
            self.player_mut(side).dead = true;
        }
        let winner = match fallen.as_slice() {
            [side] => Some(side.other()),
            _ => None,
        };
        self.over = true;
        self.winner = winner;
        match winner {
            Some(side) => game_log!(self.logger, Minimal, "game", "{} wins", side),
            None => game_log!(self.logger, Minimal, "game", "Both heroes fell, the game is a draw"),
        }
        self.events.trigger(&GameEvent::GameEnded { winner })
    }

    /// Every living character, first side before second, hero before minions
    pub fn characters(&self) -> CharacterList {
        Side::BOTH
            .into_iter()
            .flat_map(|side| self.side_characters(side))
            .collect()
    }

    pub fn enemy_characters(&self, side: Side) -> CharacterList {
        self.side_characters(side.other())
    }

    fn side_characters(&self, side: Side) -> CharacterList {
        let player = self.player(side);
        let hero = (player.health > 0).then_some(Character::Hero(side));
        hero.into_iter()
            .chain(
                player
                    .minions
                    .iter()
                    .filter(|m| !m.is_dead())
                    .map(|m| Character::Minion(m.id)),
            )
            .collect()
    }

    /// Side and board position of a minion, searching both boards
    pub fn locate_minion(&self, id: MinionId) -> Option<(Side, usize)> {
        Side::BOTH
            .into_iter()
            .find_map(|side| self.player(side).minion_position(id).map(|pos| (side, pos)))
    }

    pub(crate) fn minion_mut(&mut self, id: MinionId) -> Option<&mut crate::core::Minion> {
        let (side, position) = self.locate_minion(id)?;
        self.player_mut(side).minions.get_mut(position)
    }

    fn attack_value(&self, character: Character) -> i32 {
        match character {
            Character::Hero(side) => self.player(side).temp_attack,
            Character::Minion(id) => self
                .locate_minion(id)
                .and_then(|(side, pos)| self.player(side).minions.get(pos))
                .map(|m| m.attack)
                .unwrap_or(0),
        }
    }

    /// Address of a character as it stands right now
    pub fn address_of(&self, character: Character) -> Result<EntityAddress> {
        EntityAddress::from_live(LiveEntity::Character(character), self)
    }

    /// Actions the current side could take now
    pub fn legal_actions(&self) -> Vec<TurnAction> {
        if self.over {
            return Vec::new();
        }
        let player = self.current_player();
        let mut actions: Vec<TurnAction> = player
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| {
                card.def.mana <= player.mana && (!card.def.is_minion() || player.minions.len() < MAX_BOARD)
            })
            .map(|(index, _)| TurnAction::PlayCard(index))
            .collect();
        if player.can_hero_attack() {
            actions.push(TurnAction::Attack(Character::Hero(player.side)));
        }
        actions.extend(
            player
                .minions
                .iter()
                .filter(|m| m.can_attack())
                .map(|m| TurnAction::Attack(Character::Minion(m.id))),
        );
        if self.power_available() {
            actions.push(TurnAction::UsePower);
        }
        actions
    }

    /// Carry out one agent action for the current side
    pub fn apply_action(&mut self, agent: &mut dyn Agent, action: TurnAction) -> Result<()> {
        match action {
            TurnAction::PlayCard(index) => self.play_card(agent, index),
            TurnAction::Attack(attacker) => self.attack(agent, attacker),
            TurnAction::UsePower => self.use_power(agent),
            TurnAction::Concede => self.concede(),
        }
    }

    /// Serializable snapshot of everything that decides the game's future
    pub fn board_state(&self) -> BoardState {
        BoardState {
            turn: self.turn,
            current: self.current,
            over: self.over,
            winner: self.winner,
            players: Side::BOTH.map(|side| {
                let player = self.player(side);
                PlayerState {
                    health: player.health,
                    armor: player.armor,
                    mana: player.mana,
                    max_mana: player.max_mana,
                    fatigue: player.fatigue,
                    power_used: player.power_used,
                    hand: player.hand.iter().map(|c| c.def.name.to_string()).collect(),
                    deck: player.deck.iter().map(|c| c.name.to_string()).collect(),
                    minions: player
                        .minions
                        .iter()
                        .map(|m| MinionState {
                            name: m.def.name.to_string(),
                            attack: m.attack,
                            health: m.health,
                            sleeping: m.sleeping,
                            attacked: m.attacked_this_turn,
                        })
                        .collect(),
                }
            }),
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("turn", &self.turn)
            .field("current", &self.current)
            .field("players", &self.players)
            .field("over", &self.over)
            .field("winner", &self.winner)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinionState {
    pub name: String,
    pub attack: i32,
    pub health: i32,
    pub sleeping: bool,
    pub attacked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub health: i32,
    pub armor: i32,
    pub mana: u8,
    pub max_mana: u8,
    pub fatigue: i32,
    pub power_used: bool,
    pub hand: Vec<String>,
    pub deck: Vec<String>,
    pub minions: Vec<MinionState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub turn: u32,
    pub current: Side,
    pub over: bool,
    pub winner: Option<Side>,
    pub players: [PlayerState; 2],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{card_lookup, CharacterClass, STARTING_HEALTH};
    use crate::game::{ScriptedAgent, ZeroAgent};
    use crate::replay::{NullRandom, ReplayRandom};

    fn game(first: (CharacterClass, &[&str]), second: (CharacterClass, &[&str])) -> Game {
        let decks = [
            Deck::from_names(first.0, first.1).unwrap(),
            Deck::from_names(second.0, second.1).unwrap(),
        ];
        let mut game = Game::new(decks, Box::new(NullRandom));
        game.logger.enable_capture();
        game
    }

    #[test]
    fn test_opening_hands() {
        let mut game = game((CharacterClass::Druid, &["Wisp"]), (CharacterClass::Hunter, &["Wisp"]));
        let (mut a, mut b) = (ZeroAgent, ZeroAgent);
        game.pre_game([&mut a, &mut b]).unwrap();
        assert_eq!(game.player(Side::First).hand.len(), 3);
        assert_eq!(game.player(Side::Second).hand.len(), 4);
        assert_eq!(game.player(Side::First).deck.len(), 27);
    }

    #[test]
    fn test_mulligan_replaces_in_place() {
        let mut game = game(
            (CharacterClass::Druid, &["Wisp", "Moonfire", "Innervate", "Stonetusk Boar"]),
            (CharacterClass::Hunter, &["Wisp"]),
        );
        let mut a = ScriptedAgent::new(vec![]).keep(&[0, 2]);
        let mut b = ZeroAgent;
        game.pre_game([&mut a, &mut b]).unwrap();

        let names: Vec<_> = game.player(Side::First).hand.iter().map(|c| c.def.name).collect();
        // slot 1 (Moonfire) swapped for the fourth card
        assert_eq!(names, vec!["Wisp", "Stonetusk Boar", "Innervate"]);
        assert_eq!(game.player(Side::First).deck.back().unwrap().name, "Moonfire");
    }

    #[test]
    fn test_turn_mana_and_draw() {
        let mut game = game((CharacterClass::Druid, &["Wisp"]), (CharacterClass::Hunter, &["Wisp"]));
        game.start_turn().unwrap();
        assert_eq!(game.current_player().max_mana, 1);
        assert_eq!(game.current_player().hand.len(), 1);
        game.end_turn().unwrap();
        assert_eq!(game.current_side(), Side::Second);
        game.start_turn().unwrap();
        game.end_turn().unwrap();
        game.start_turn().unwrap();
        assert_eq!(game.current_player().max_mana, 2);
        assert_eq!(game.turn(), 3);
    }

    #[test]
    fn test_fatigue_grows() {
        let mut game = game((CharacterClass::Druid, &["Wisp"]), (CharacterClass::Hunter, &["Wisp"]));
        game.player_mut(Side::First).deck.clear();
        game.draw_card(Side::First).unwrap();
        game.draw_card(Side::First).unwrap();
        assert_eq!(game.player(Side::First).health, STARTING_HEALTH - 3);
    }

    #[test]
    fn test_charge_attack_hits_face() {
        let mut game = game(
            (CharacterClass::Hunter, &["Stonetusk Boar"]),
            (CharacterClass::Druid, &["Wisp"]),
        );
        let mut agent = ZeroAgent;
        game.start_turn().unwrap();
        game.play_card(&mut agent, 0).unwrap();
        let boar = game.player(Side::First).minions[0].id;

        assert!(game.legal_actions().contains(&TurnAction::Attack(Character::Minion(boar))));
        game.attack(&mut agent, Character::Minion(boar)).unwrap();
        assert_eq!(game.player(Side::Second).health, STARTING_HEALTH - 1);
        assert!(game.attack(&mut agent, Character::Minion(boar)).is_err());
    }

    #[test]
    fn test_minion_combat_and_death() {
        let mut game = game(
            (CharacterClass::Hunter, &["Bloodfen Raptor"]),
            (CharacterClass::Druid, &["Wisp"]),
        );
        let raptor = card_lookup("Bloodfen Raptor").unwrap();
        let wisp = card_lookup("Wisp").unwrap();
        let attacker = game.summon(Side::First, raptor, 0).unwrap();
        let victim = game.summon(Side::Second, wisp, 0).unwrap();
        game.start_turn().unwrap();

        let mut agent = ScriptedAgent::new(vec![]).targets(vec![Character::Minion(victim)]);
        game.attack(&mut agent, Character::Minion(attacker)).unwrap();
        assert!(game.player(Side::Second).minions.is_empty());
        assert_eq!(game.player(Side::First).minions[0].health, 1);
    }

    #[test]
    fn test_targeted_spell() {
        let mut game = game((CharacterClass::Druid, &["Moonfire"]), (CharacterClass::Hunter, &["Wisp"]));
        game.start_turn().unwrap();
        let mut agent = ScriptedAgent::new(vec![]).targets(vec![Character::Hero(Side::Second)]);
        game.play_card(&mut agent, 0).unwrap();
        assert_eq!(game.player(Side::Second).health, STARTING_HEALTH - 1);

        game.player_mut(Side::First).hand.push(CardInstance {
            id: EntityId::new(999),
            def: card_lookup("Moonfire").unwrap(),
        });
        let wisp = game.summon(Side::First, card_lookup("Wisp").unwrap(), 0).unwrap();
        let mut bad = ScriptedAgent::new(vec![]).targets(vec![Character::Minion(EntityId::new(wisp.as_u32() + 100))]);
        assert!(matches!(game.play_card(&mut bad, 0), Err(GameError::InvalidAction(_))));
    }

    #[test]
    fn test_random_effect_uses_source() {
        let decks = [
            Deck::from_names(CharacterClass::Mage, &["Arcane Missiles"]).unwrap(),
            Deck::from_names(CharacterClass::Warrior, &["Wisp"]).unwrap(),
        ];
        let mut game = Game::new(decks, Box::new(ReplayRandom::new(vec![0, 0, 0])));
        game.start_turn().unwrap();
        game.play_card(&mut ZeroAgent, 0).unwrap();
        assert_eq!(game.player(Side::Second).health, STARTING_HEALTH - 3);
        assert_eq!(game.random_source().drawn(), 3);
    }

    #[test]
    fn test_null_random_fails_fast() {
        let mut game = game((CharacterClass::Mage, &["Arcane Missiles"]), (CharacterClass::Warrior, &["Wisp"]));
        game.start_turn().unwrap();
        assert!(matches!(
            game.play_card(&mut ZeroAgent, 0),
            Err(GameError::ExhaustedRandomTrace { consumed: 0 })
        ));
    }

    #[test]
    fn test_concede_ends_game() {
        let mut game = game((CharacterClass::Druid, &["Wisp"]), (CharacterClass::Hunter, &["Wisp"]));
        game.start_turn().unwrap();
        game.concede().unwrap();
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Side::Second));
        assert!(game.legal_actions().is_empty());
        assert!(game.end_turn().is_err());
    }

    #[test]
    fn test_power_once_per_turn() {
        let mut game = game((CharacterClass::Warrior, &["Wisp"]), (CharacterClass::Hunter, &["Wisp"]));
        game.start_turn().unwrap();
        game.end_turn().unwrap();
        game.start_turn().unwrap();
        game.end_turn().unwrap();
        game.start_turn().unwrap();
        assert!(game.legal_actions().contains(&TurnAction::UsePower));
        game.use_power(&mut ZeroAgent).unwrap();
        assert_eq!(game.player(Side::First).armor, 2);
        assert!(!game.legal_actions().contains(&TurnAction::UsePower));
        assert!(game.use_power(&mut ZeroAgent).is_err());
    }
}
