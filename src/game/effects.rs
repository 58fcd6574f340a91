//! Card and hero power effect resolution

use crate::core::{card_lookup, CardEffect, MinionId, PowerEffect, Side, BASIC_TOTEMS, MAX_BOARD, MAX_MANA};
use crate::game::{Character, CharacterList, Game};
use crate::game_log;
use crate::Result;

impl Game {
    /// Resolve a card effect for `side`
    ///
    /// `target` is the character chosen while the card was played and
    /// `source` the minion the card just summoned, if any.
    pub(crate) fn resolve_effect(
        &mut self,
        side: Side,
        effect: CardEffect,
        target: Option<Character>,
        source: Option<MinionId>,
    ) -> Result<()> {
        match effect {
            CardEffect::None => Ok(()),
            CardEffect::Damage(amount) => {
                if let Some(target) = target {
                    self.damage(target, amount);
                }
                Ok(())
            }
            CardEffect::DrawCards(count) => {
                for _ in 0..count {
                    self.draw_card(side)?;
                }
                Ok(())
            }
            CardEffect::GainMana(amount) => {
                let player = self.player_mut(side);
                player.mana = (player.mana + amount).min(MAX_MANA);
                Ok(())
            }
            CardEffect::RandomEnemyHits(hits) => {
                for _ in 0..hits {
                    let candidates = self.enemy_characters(side);
                    if !self.random_hit(&candidates)? {
                        break;
                    }
                }
                Ok(())
            }
            CardEffect::RandomHits(hits) => {
                for _ in 0..hits {
                    let candidates: CharacterList = self
                        .characters()
                        .into_iter()
                        .filter(|c| source.map_or(true, |id| *c != Character::Minion(id)))
                        .collect();
                    if !self.random_hit(&candidates)? {
                        break;
                    }
                }
                Ok(())
            }
            CardEffect::BuffFriendlyMinions(attack, health) => {
                for minion in &mut self.player_mut(side).minions {
                    minion.attack += attack;
                    minion.health += health;
                    minion.max_health += health;
                }
                Ok(())
            }
            CardEffect::Summon(name) => {
                let def = card_lookup(name)?;
                let len = self.player(side).minions.len();
                if len < MAX_BOARD {
                    self.summon(side, def, len)?;
                }
                Ok(())
            }
        }
    }

    /// One damage to a random candidate; false when there was none to hit
    fn random_hit(&mut self, candidates: &[Character]) -> Result<bool> {
        if candidates.is_empty() {
            return Ok(false);
        }
        let index = self.random_index(candidates.len())?;
        self.damage(candidates[index], 1);
        Ok(true)
    }

    pub(crate) fn resolve_power(&mut self, side: Side, effect: PowerEffect, target: Option<Character>) -> Result<()> {
        match effect {
            PowerEffect::Shapeshift => {
                let player = self.player_mut(side);
                player.temp_attack += 1;
                player.armor += 1;
            }
            PowerEffect::SteadyShot => self.damage(Character::Hero(side.other()), 2),
            PowerEffect::Fireblast => {
                if let Some(target) = target {
                    self.damage(target, 1);
                }
            }
            PowerEffect::Reinforce => {
                let recruit = card_lookup("Silver Hand Recruit")?;
                let len = self.player(side).minions.len();
                self.summon(side, recruit, len)?;
            }
            PowerEffect::LesserHeal => {
                if let Some(target) = target {
                    self.heal(target, 2);
                }
            }
            PowerEffect::DaggerMastery => self.player_mut(side).temp_attack += 1,
            PowerEffect::TotemicCall => {
                let missing: Vec<&str> = BASIC_TOTEMS
                    .into_iter()
                    .filter(|name| !self.player(side).minions.iter().any(|m| m.def.name == *name))
                    .collect();
                if !missing.is_empty() {
                    let index = self.random_index(missing.len())?;
                    let totem = card_lookup(missing[index])?;
                    let len = self.player(side).minions.len();
                    self.summon(side, totem, len)?;
                }
            }
            PowerEffect::LifeTap => {
                self.draw_card(side)?;
                self.damage(Character::Hero(side), 2);
            }
            PowerEffect::ArmorUp => self.player_mut(side).armor += 2,
        }
        Ok(())
    }

    /// Deal damage; deaths are processed separately
    pub fn damage(&mut self, target: Character, amount: i32) {
        match target {
            Character::Hero(side) => self.player_mut(side).take_damage(amount),
            Character::Minion(id) => {
                if let Some(minion) = self.minion_mut(id) {
                    minion.health -= amount;
                }
            }
        }
        game_log!(self.logger, Verbose, "game", "{:?} takes {} damage", target, amount);
    }

    pub fn heal(&mut self, target: Character, amount: i32) {
        match target {
            Character::Hero(side) => self.player_mut(side).heal(amount),
            Character::Minion(id) => {
                if let Some(minion) = self.minion_mut(id) {
                    minion.health = (minion.health + amount).min(minion.max_health);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{card_lookup, CharacterClass, Deck, Side, STARTING_HEALTH};
    use crate::game::{Character, Game, ScriptedAgent, ZeroAgent};
    use crate::replay::{NullRandom, ReplayRandom};

    fn game_with(first: CharacterClass, cards: &[&str], trace: Vec<i32>) -> Game {
        let decks = [
            Deck::from_names(first, cards).unwrap(),
            Deck::from_names(CharacterClass::Warrior, &["Wisp"]).unwrap(),
        ];
        let random: Box<dyn crate::replay::RandomSource> = if trace.is_empty() {
            Box::new(NullRandom)
        } else {
            Box::new(ReplayRandom::new(trace))
        };
        let mut game = Game::new(decks, random);
        game.logger.enable_capture();
        game
    }

    #[test]
    fn test_innervate_adds_mana() {
        let mut game = game_with(CharacterClass::Druid, &["Innervate"], vec![]);
        game.start_turn().unwrap();
        game.play_card(&mut ZeroAgent, 0).unwrap();
        assert_eq!(game.current_player().mana, 3);
    }

    #[test]
    fn test_power_of_the_wild_options() {
        let mut game = game_with(CharacterClass::Druid, &["Power of the Wild"], vec![]);
        game.player_mut(Side::First).max_mana = 3;
        game.summon(Side::First, card_lookup("Wisp").unwrap(), 0).unwrap();
        game.start_turn().unwrap();

        game.play_card(&mut ScriptedAgent::new(vec![]).options(vec![0]), 0).unwrap();
        assert_eq!(game.player(Side::First).minions[0].attack, 2);

        game.player_mut(Side::First).mana = 2;
        game.draw_card(Side::First).unwrap();
        game.play_card(&mut ScriptedAgent::new(vec![]).options(vec![1]), 0).unwrap();
        let names: Vec<_> = game.player(Side::First).minions.iter().map(|m| m.def.name).collect();
        assert_eq!(names, vec!["Wisp", "Panther"]);
    }

    #[test]
    fn test_mad_bomber_skips_itself() {
        let mut game = game_with(CharacterClass::Hunter, &["Mad Bomber"], vec![0, 0, 0]);
        game.player_mut(Side::First).max_mana = 1;
        game.start_turn().unwrap();
        game.play_card(&mut ZeroAgent, 0).unwrap();
        // only heroes besides the bomber: index 0 is the first hero
        assert_eq!(game.player(Side::First).health, STARTING_HEALTH - 3);
        assert_eq!(game.player(Side::First).minions[0].health, 2);
    }

    #[test]
    fn test_totemic_call_draws_from_missing_totems() {
        let mut game = game_with(CharacterClass::Shaman, &["Wisp"], vec![1, 1]);
        game.player_mut(Side::First).max_mana = 9;
        game.start_turn().unwrap();
        game.use_power(&mut ZeroAgent).unwrap();
        assert_eq!(game.player(Side::First).minions[0].def.name, "Searing Totem");

        game.player_mut(Side::First).power_used = false;
        game.use_power(&mut ZeroAgent).unwrap();
        // Searing is on the board, so index 1 now picks Stoneclaw
        assert_eq!(game.player(Side::First).minions[1].def.name, "Stoneclaw Totem");
    }

    #[test]
    fn test_fireblast_and_lesser_heal() {
        let mut game = game_with(CharacterClass::Mage, &["Wisp"], vec![]);
        game.player_mut(Side::First).max_mana = 1;
        game.start_turn().unwrap();
        let mut agent = ScriptedAgent::new(vec![]).targets(vec![Character::Hero(Side::Second)]);
        game.use_power(&mut agent).unwrap();
        assert_eq!(game.player(Side::Second).health, STARTING_HEALTH - 1);

        game.heal(Character::Hero(Side::Second), 5);
        assert_eq!(game.player(Side::Second).health, STARTING_HEALTH);
    }

    #[test]
    fn test_life_tap() {
        let mut game = game_with(CharacterClass::Warlock, &["Wisp"], vec![]);
        game.player_mut(Side::First).max_mana = 1;
        game.start_turn().unwrap();
        game.use_power(&mut ZeroAgent).unwrap();
        assert_eq!(game.current_player().hand.len(), 2);
        assert_eq!(game.current_player().health, STARTING_HEALTH - 2);
    }
}
