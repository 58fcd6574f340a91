//! Player (hero side) and minion representation

use crate::core::{CardDef, CardInstance, CardKind, CharacterClass, EntityId, GameEntity, HeroPower, Side};
use crate::events::EventBus;
use crate::game::GameEvent;
use std::collections::VecDeque;

pub const STARTING_HEALTH: i32 = 30;
pub const MAX_MANA: u8 = 10;
pub const MAX_HAND: usize = 10;
pub const MAX_BOARD: usize = 7;

pub type MinionId = EntityId<Minion>;

/// A minion on the board
#[derive(Debug, Clone)]
pub struct Minion {
    pub id: MinionId,
    pub def: &'static CardDef,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub charge: bool,
    /// Summoned this turn (cannot attack unless it has charge)
    pub sleeping: bool,
    pub attacked_this_turn: bool,
}

impl Minion {
    pub fn new(id: MinionId, def: &'static CardDef) -> Self {
        let (attack, health, charge) = match def.kind {
            CardKind::Minion {
                attack,
                health,
                charge,
            } => (attack, health, charge),
            CardKind::Spell => (0, 1, false),
        };
        Minion {
            id,
            def,
            attack,
            health,
            max_health: health,
            charge,
            sleeping: true,
            attacked_this_turn: false,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.attack > 0 && !self.attacked_this_turn && (!self.sleeping || self.charge)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl GameEntity<Minion> for Minion {
    fn id(&self) -> MinionId {
        self.id
    }

    fn name(&self) -> &str {
        self.def.name
    }
}

/// One side of the table: hero, resources and zones
pub struct Player {
    pub side: Side,
    pub character_class: CharacterClass,
    pub power: HeroPower,

    pub health: i32,
    pub armor: i32,
    /// Hero attack granted for the current turn
    pub temp_attack: i32,
    pub hero_attacked: bool,

    pub mana: u8,
    pub max_mana: u8,
    pub power_used: bool,

    /// Cards are drawn from the front
    pub deck: VecDeque<&'static CardDef>,
    pub hand: Vec<CardInstance>,
    pub minions: Vec<Minion>,
    pub fatigue: i32,
    pub dead: bool,

    events: EventBus<GameEvent, Side>,
}

impl Player {
    pub fn new(side: Side, character_class: CharacterClass, deck: &[&'static CardDef]) -> Self {
        Player {
            side,
            character_class,
            power: HeroPower::for_class(character_class),
            health: STARTING_HEALTH,
            armor: 0,
            temp_attack: 0,
            hero_attacked: false,
            mana: 0,
            max_mana: 0,
            power_used: false,
            deck: deck.iter().copied().collect(),
            hand: Vec::new(),
            minions: Vec::new(),
            fatigue: 0,
            dead: false,
            events: EventBus::new(),
        }
    }

    /// This player's event bus (turns, plays, attacks, hero power)
    pub fn events(&self) -> &EventBus<GameEvent, Side> {
        &self.events
    }

    /// Armor soaks damage first
    pub fn take_damage(&mut self, amount: i32) {
        let absorbed = amount.min(self.armor);
        self.armor -= absorbed;
        self.health -= amount - absorbed;
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(STARTING_HEALTH);
    }

    pub fn can_hero_attack(&self) -> bool {
        self.temp_attack > 0 && !self.hero_attacked
    }

    pub fn can_use_power(&self) -> bool {
        !self.power_used && self.mana >= self.power.mana
    }

    pub fn minion_position(&self, id: MinionId) -> Option<usize> {
        self.minions.iter().position(|m| m.id == id)
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("side", &self.side)
            .field("class", &self.character_class)
            .field("health", &self.health)
            .field("armor", &self.armor)
            .field("mana", &self.mana)
            .field("hand", &self.hand.len())
            .field("minions", &self.minions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card_lookup;

    #[test]
    fn test_armor_absorbs_damage() {
        let mut player = Player::new(Side::First, CharacterClass::Warrior, &[]);
        player.armor = 2;
        player.take_damage(5);
        assert_eq!(player.armor, 0);
        assert_eq!(player.health, 27);

        player.heal(10);
        assert_eq!(player.health, STARTING_HEALTH);
    }

    #[test]
    fn test_minion_readiness() {
        let boar = card_lookup("Stonetusk Boar").unwrap();
        let raptor = card_lookup("Bloodfen Raptor").unwrap();

        let charger = Minion::new(EntityId::new(1), boar);
        assert!(charger.can_attack());

        let mut sleeper = Minion::new(EntityId::new(2), raptor);
        assert!(!sleeper.can_attack());
        sleeper.sleeping = false;
        assert!(sleeper.can_attack());
        sleeper.attacked_this_turn = true;
        assert!(!sleeper.can_attack());
    }

    #[test]
    fn test_hero_power_needs_mana() {
        let mut player = Player::new(Side::Second, CharacterClass::Mage, &[]);
        assert!(!player.can_use_power());
        player.mana = 2;
        assert!(player.can_use_power());
        player.power_used = true;
        assert!(!player.can_use_power());
    }
}
