//! Card definitions and the static card catalog

use crate::core::{CharacterClass, EntityId, GameEntity};
use crate::{GameError, Result};
use deunicode::deunicode;

/// What a card becomes when played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Minion { attack: i32, health: i32, charge: bool },
    Spell,
}

/// Effect resolved after a card is played (battlecry for minions)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEffect {
    None,
    /// Damage to the chosen target
    Damage(i32),
    DrawCards(u8),
    /// Temporary mana for this turn
    GainMana(u8),
    /// 1-damage hits, each on a random enemy character
    RandomEnemyHits(u8),
    /// 1-damage hits, each on a random character other than the source
    RandomHits(u8),
    /// +attack/+health to every friendly minion
    BuffFriendlyMinions(i32, i32),
    /// Summon a token by card name
    Summon(&'static str),
}

/// One option of a "choose one" card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardChoice {
    pub label: &'static str,
    pub effect: CardEffect,
}

/// Static card definition
///
/// Many card instances in a game share one definition.
#[derive(Debug, PartialEq, Eq)]
pub struct CardDef {
    pub name: &'static str,
    pub mana: u8,
    pub kind: CardKind,
    /// Playing the card asks for a target
    pub targetable: bool,
    pub effect: CardEffect,
    /// Non-empty for "choose one" cards
    pub choices: &'static [CardChoice],
    pub collectible: bool,
}

impl CardDef {
    pub fn is_minion(&self) -> bool {
        matches!(self.kind, CardKind::Minion { .. })
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}

const fn minion(name: &'static str, mana: u8, attack: i32, health: i32) -> CardDef {
    CardDef {
        name,
        mana,
        kind: CardKind::Minion {
            attack,
            health,
            charge: false,
        },
        targetable: false,
        effect: CardEffect::None,
        choices: &[],
        collectible: true,
    }
}

const fn spell(name: &'static str, mana: u8, effect: CardEffect) -> CardDef {
    CardDef {
        name,
        mana,
        kind: CardKind::Spell,
        targetable: false,
        effect,
        choices: &[],
        collectible: true,
    }
}

const fn token(def: CardDef) -> CardDef {
    CardDef {
        collectible: false,
        ..def
    }
}

pub static CATALOG: &[CardDef] = &[
    minion("Wisp", 0, 1, 1),
    CardDef {
        kind: CardKind::Minion {
            attack: 1,
            health: 1,
            charge: true,
        },
        ..minion("Stonetusk Boar", 1, 1, 1)
    },
    minion("Bloodfen Raptor", 2, 3, 2),
    CardDef {
        effect: CardEffect::DrawCards(1),
        ..minion("Novice Engineer", 2, 1, 1)
    },
    CardDef {
        targetable: true,
        effect: CardEffect::Damage(1),
        ..minion("Elven Archer", 1, 1, 1)
    },
    CardDef {
        effect: CardEffect::RandomHits(3),
        ..minion("Mad Bomber", 2, 3, 2)
    },
    CardDef {
        targetable: true,
        ..spell("Moonfire", 0, CardEffect::Damage(1))
    },
    spell("Innervate", 0, CardEffect::GainMana(2)),
    spell("Arcane Missiles", 1, CardEffect::RandomEnemyHits(3)),
    spell("Arcane Intellect", 3, CardEffect::DrawCards(2)),
    CardDef {
        choices: &[
            CardChoice {
                label: "Leader of the Pack",
                effect: CardEffect::BuffFriendlyMinions(1, 1),
            },
            CardChoice {
                label: "Summon a Panther",
                effect: CardEffect::Summon("Panther"),
            },
        ],
        ..spell("Power of the Wild", 2, CardEffect::None)
    },
    token(minion("Panther", 2, 3, 2)),
    token(minion("Silver Hand Recruit", 1, 1, 1)),
    token(minion("Healing Totem", 1, 0, 2)),
    token(minion("Searing Totem", 1, 1, 1)),
    token(minion("Stoneclaw Totem", 1, 0, 2)),
    token(minion("Wrath of Air Totem", 1, 0, 2)),
];

/// Totems Totemic Call picks from, in draw order
pub const BASIC_TOTEMS: [&str; 4] = [
    "Healing Totem",
    "Searing Totem",
    "Stoneclaw Totem",
    "Wrath of Air Totem",
];

fn normalize_name(name: &str) -> String {
    deunicode(name.trim()).to_lowercase()
}

/// Look a card up by name (unicode and case insensitive)
pub fn card_lookup(name: &str) -> Result<&'static CardDef> {
    let wanted = normalize_name(name);
    CATALOG
        .iter()
        .find(|def| normalize_name(def.name) == wanted)
        .ok_or_else(|| GameError::UnknownCard(name.trim().to_string()))
}

/// A card in a player's hand
#[derive(Debug, Clone, Copy)]
pub struct CardInstance {
    pub id: CardInstanceId,
    pub def: &'static CardDef,
}

pub type CardInstanceId = EntityId<CardInstance>;

impl GameEntity<CardInstance> for CardInstance {
    fn id(&self) -> CardInstanceId {
        self.id
    }

    fn name(&self) -> &str {
        self.def.name
    }
}

/// Hero power effects, one per class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEffect {
    Shapeshift,
    SteadyShot,
    Fireblast,
    Reinforce,
    LesserHeal,
    DaggerMastery,
    TotemicCall,
    LifeTap,
    ArmorUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroPower {
    pub name: &'static str,
    pub mana: u8,
    pub targeted: bool,
    pub effect: PowerEffect,
}

impl HeroPower {
    pub fn for_class(class: CharacterClass) -> HeroPower {
        let (name, targeted, effect) = match class {
            CharacterClass::Druid => ("Shapeshift", false, PowerEffect::Shapeshift),
            CharacterClass::Hunter => ("Steady Shot", false, PowerEffect::SteadyShot),
            CharacterClass::Mage => ("Fireblast", true, PowerEffect::Fireblast),
            CharacterClass::Paladin => ("Reinforce", false, PowerEffect::Reinforce),
            CharacterClass::Priest => ("Lesser Heal", true, PowerEffect::LesserHeal),
            CharacterClass::Rogue => ("Dagger Mastery", false, PowerEffect::DaggerMastery),
            CharacterClass::Shaman => ("Totemic Call", false, PowerEffect::TotemicCall),
            CharacterClass::Warlock => ("Life Tap", false, PowerEffect::LifeTap),
            CharacterClass::Warrior => ("Armor Up!", false, PowerEffect::ArmorUp),
        };
        HeroPower {
            name,
            mana: 2,
            targeted,
            effect,
        }
    }
}
