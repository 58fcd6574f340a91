//! Line-oriented text format for replays
//!
//! ```text
//! deck(Druid,Innervate)
//! deck(Hunter,Stonetusk Boar)
//! random()
//! keep(0,2)
//! keep(0,1,2,3)
//! play(0)            ; comments run to the end of the line
//! end()
//! summon(0,0)
//! attack(p2:0,p1)
//! end()
//! ```
//!
//! Decks, the random trace and keep-sets come first, then one line per
//! action. Unknown directive names are skipped when reading.

use crate::core::{card_lookup, CharacterClass, Deck, DECK_SIZE};
use crate::replay::{Action, EntityAddress, Replay};
use crate::{GameError, Result};
use nom::{
    bytes::complete::take_while,
    character::complete::{char, space0},
    combinator::{all_consuming, opt, rest},
    sequence::{delimited, preceded, tuple},
    IResult,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Deck,
    Random,
    Keep,
    Play,
    Summon,
    Attack,
    Power,
    End,
    Concede,
}

impl Directive {
    fn from_name(name: &str) -> Option<Directive> {
        Some(match name {
            "deck" => Directive::Deck,
            "random" => Directive::Random,
            "keep" => Directive::Keep,
            "play" => Directive::Play,
            "summon" => Directive::Summon,
            "attack" => Directive::Attack,
            "power" => Directive::Power,
            "end" => Directive::End,
            "concede" => Directive::Concede,
            _ => return None,
        })
    }
}

/// `name(args) [; comment]` with optional blanks between the parts
fn directive_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, (_, name, _, args, _, _)) = all_consuming(tuple((
        space0,
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
        space0,
        delimited(char('('), take_while(|c: char| c != ')'), char(')')),
        space0,
        opt(preceded(char(';'), rest)),
    )))(input)?;
    Ok((input, (name, args)))
}

fn split_args(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        Vec::new()
    } else {
        args.split(',').map(str::trim).collect()
    }
}

fn malformed(message: impl Into<String>) -> GameError {
    GameError::MalformedReplay(message.into())
}

fn card_address(token: &str) -> Result<EntityAddress> {
    match token.parse::<EntityAddress>()? {
        address @ EntityAddress::HandCard(..) => Ok(address),
        other => Err(malformed(format!("expected a hand card, got {}", other))),
    }
}

fn character_address(token: &str) -> Result<EntityAddress> {
    let address: EntityAddress = token.parse()?;
    if address.is_character() {
        Ok(address)
    } else {
        Err(malformed(format!("expected a character, got {}", address)))
    }
}

fn number<T: std::str::FromStr>(token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| malformed(format!("'{}' is not a valid number", token)))
}

fn arity(name: &str, args: &[&str], allowed: std::ops::RangeInclusive<usize>) -> Result<()> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(malformed(format!(
            "{}() takes {} to {} arguments, got {}",
            name,
            allowed.start(),
            allowed.end(),
            args.len()
        )))
    }
}

fn parse_deck(args: &[&str]) -> Result<Deck> {
    arity("deck", args, 2..=DECK_SIZE + 1)?;
    let class: CharacterClass = args[0].parse()?;
    let pattern = args[1..]
        .iter()
        .map(|name| card_lookup(name))
        .collect::<Result<Vec<_>>>()?;
    Deck::cycled(class, &pattern)
}

fn parse_action(directive: Directive, args: &[&str]) -> Result<Option<Action>> {
    let action = match directive {
        Directive::Play => {
            arity("play", args, 1..=2)?;
            Action::Play {
                card: card_address(args[0])?,
                target: args.get(1).map(|t| character_address(t)).transpose()?,
            }
        }
        Directive::Summon => {
            arity("summon", args, 2..=3)?;
            Action::Summon {
                card: card_address(args[0])?,
                index: number(args[1])?,
                target: args.get(2).map(|t| character_address(t)).transpose()?,
            }
        }
        Directive::Attack => {
            arity("attack", args, 2..=2)?;
            Action::Attack {
                attacker: character_address(args[0])?,
                defender: character_address(args[1])?,
            }
        }
        Directive::Power => {
            arity("power", args, 0..=1)?;
            Action::UsePower {
                target: args.first().map(|t| character_address(t)).transpose()?,
            }
        }
        Directive::End => {
            arity("end", args, 0..=0)?;
            Action::EndTurn
        }
        Directive::Concede => {
            arity("concede", args, 0..=0)?;
            Action::Concede
        }
        Directive::Deck | Directive::Random | Directive::Keep => return Ok(None),
    };
    Ok(Some(action))
}

/// Read a replay from text
pub fn decode(text: &str) -> Result<Replay> {
    let mut replay = Replay::default();
    let mut random: Option<Vec<i32>> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let (_, (name, args)) = directive_line(line)
            .map_err(|_| malformed(format!("line {}: cannot parse '{}'", line_no, line)))?;
        let Some(directive) = Directive::from_name(name) else {
            continue;
        };
        let args = split_args(args);

        let at_line = |err: GameError| match err {
            GameError::MalformedReplay(message) => malformed(format!("line {}: {}", line_no, message)),
            other => malformed(format!("line {}: {}", line_no, other)),
        };

        match directive {
            Directive::Deck => {
                if replay.decks.len() == 2 {
                    return Err(malformed(format!("line {}: more than two deck lines", line_no)));
                }
                replay.decks.push(parse_deck(&args).map_err(at_line)?);
            }
            Directive::Random => {
                if random.is_some() {
                    return Err(malformed(format!("line {}: more than one random line", line_no)));
                }
                let values = args
                    .iter()
                    .map(|arg| number::<i32>(arg))
                    .collect::<Result<Vec<_>>>()
                    .map_err(at_line)?;
                random = Some(values);
            }
            Directive::Keep => {
                if replay.keeps.len() == 2 {
                    return Err(malformed(format!("line {}: more than two keep lines", line_no)));
                }
                let positions = args
                    .iter()
                    .map(|arg| number::<usize>(arg))
                    .collect::<Result<Vec<_>>>()
                    .map_err(at_line)?;
                replay.keeps.push(positions);
            }
            _ => {
                if let Some(action) = parse_action(directive, &args).map_err(at_line)? {
                    replay.actions.push(action);
                }
            }
        }
    }

    replay.random = random.unwrap_or_default();
    if replay.keeps.is_empty() {
        replay.keeps = Replay::default_keeps();
    }
    Ok(replay)
}

/// Write a replay as text
pub fn encode<W: Write>(replay: &Replay, mut writer: W) -> Result<()> {
    for deck in &replay.decks {
        let names: Vec<&str> = deck.repeating_prefix().iter().map(|card| card.name).collect();
        writeln!(writer, "deck({},{})", deck.character_class, names.join(","))?;
    }
    writeln!(writer, "random({})", join(&replay.random))?;
    for keep in &replay.keeps {
        writeln!(writer, "keep({})", join(keep))?;
    }
    for action in &replay.actions {
        writeln!(writer, "{}", action)?;
    }
    writer.flush()?;
    Ok(())
}

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

impl Replay {
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        encode(self, writer)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        encode(self, BufWriter::new(file))
    }

    pub fn to_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        encode(self, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| malformed(format!("replay text is not UTF-8: {}", e)))
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Replay> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        decode(&text)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Replay> {
        let file = File::open(path)?;
        Replay::read_from(BufReader::new(file))
    }

    pub fn from_text(text: &str) -> Result<Replay> {
        decode(text)
    }
}
