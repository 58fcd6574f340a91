//! hsgame - Main Binary
//!
//! Records live games to replay files, replays them and inspects them

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use hsgame_rs::{
    core::Side,
    game::{
        format_hash, Agent, GameLogger, OutputFormat, OutputMode, RandomAgent, VerbosityLevel, ZeroAgent,
        DEFAULT_MAX_TURNS,
    },
    loader::DeckLoader,
    replay::{RecordingGame, Replay, ReplayPlayer},
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Agent type for the two seats
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AgentType {
    /// Makes random choices
    Random,
    /// Always takes the first choice and ends turns at once (for testing)
    Zero,
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl From<LogFormat> for OutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => OutputFormat::Text,
            LogFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "hsgame")]
#[command(about = "Deterministic record and replay for a two-player card game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a live game and write its replay
    Record {
        /// Deck file (.dck) for player 1
        #[arg(value_name = "PLAYER1_DECK")]
        deck1: PathBuf,

        /// Deck file (.dck) for player 2
        #[arg(value_name = "PLAYER2_DECK")]
        deck2: PathBuf,

        /// Random seed for the game and the random agents
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Player 1 agent type
        #[arg(long, value_enum, default_value = "random")]
        p1: AgentType,

        /// Player 2 agent type
        #[arg(long, value_enum, default_value = "random")]
        p2: AgentType,

        /// Turn limit for the live game
        #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
        max_turns: u32,

        /// Replay file to write (stdout when omitted)
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "minimal", short = 'v')]
        verbosity: VerbosityArg,

        #[arg(long, value_enum, default_value = "text")]
        log_format: LogFormat,
    },

    /// Replay a recorded game and print the outcome
    Replay {
        /// Replay file (.hsreplay)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Turn limit the game was recorded under
        #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
        max_turns: u32,

        /// Print the state hash after every turn
        #[arg(long)]
        hashes: bool,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "minimal", short = 'v')]
        verbosity: VerbosityArg,

        #[arg(long, value_enum, default_value = "text")]
        log_format: LogFormat,
    },

    /// Print a summary of a replay file
    Inspect {
        /// Replay file (.hsreplay)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Record {
            deck1,
            deck2,
            seed,
            p1,
            p2,
            max_turns,
            output,
            verbosity,
            log_format,
        } => run_record(
            &deck1,
            &deck2,
            seed,
            [p1, p2],
            max_turns,
            output.as_deref(),
            verbosity.into(),
            log_format.into(),
        )?,
        Commands::Replay {
            file,
            max_turns,
            hashes,
            verbosity,
            log_format,
        } => run_replay(&file, max_turns, hashes, verbosity.into(), log_format.into())?,
        Commands::Inspect { file } => run_inspect(&file)?,
    }

    Ok(())
}

fn make_agent(kind: AgentType, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentType::Random => Box::new(RandomAgent::with_seed(seed)),
        AgentType::Zero => Box::new(ZeroAgent::new()),
    }
}

fn configure_logger(logger: &mut GameLogger, verbosity: VerbosityLevel, format: OutputFormat) {
    logger.set_verbosity(verbosity);
    logger.set_output_format(format);
}

#[allow(clippy::too_many_arguments)]
fn run_record(
    deck1: &Path,
    deck2: &Path,
    seed: u64,
    agent_types: [AgentType; 2],
    max_turns: u32,
    output: Option<&Path>,
    verbosity: VerbosityLevel,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let decks = [
        DeckLoader::load_deck(deck1).with_context(|| format!("loading {}", deck1.display()))?,
        DeckLoader::load_deck(deck2).with_context(|| format!("loading {}", deck2.display()))?,
    ];

    let mut session = RecordingGame::new(decks, seed);
    let logger = &mut session.game_mut().logger;
    configure_logger(logger, verbosity, format);
    // The replay owns stdout; hold log lines back and send them to stderr
    if output.is_none() {
        logger.set_output_mode(OutputMode::Memory);
    }

    // Use seed + 1 for player 2 so they have different random sequences
    let mut agent1 = make_agent(agent_types[0], seed);
    let mut agent2 = make_agent(agent_types[1], seed.wrapping_add(1));
    let result = session.play(agent1.as_mut(), agent2.as_mut(), max_turns)?;

    if output.is_none() {
        for entry in session.game().logger.logs().iter() {
            if entry.level <= verbosity {
                eprintln!("{}", entry.message);
            }
        }
    }

    let replay = session.finish()?;
    match output {
        Some(path) => {
            replay.save(path).with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "Recorded {} actions over {} turns ({:?}) to {}",
                replay.actions.len(),
                result.turns_played,
                result.end_reason,
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            replay.write_to(&mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn run_replay(
    file: &Path,
    max_turns: u32,
    hashes: bool,
    verbosity: VerbosityLevel,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let replay = Replay::load(file).with_context(|| format!("reading {}", file.display()))?;

    let mut player = ReplayPlayer::new(replay)?.with_turn_limit(max_turns);
    configure_logger(&mut player.game_mut().logger, verbosity, format);

    let outcome = player.run().with_context(|| format!("replaying {}", file.display()))?;

    println!("Turns played: {}", outcome.turns);
    match outcome.winner {
        Some(side) => println!("Winner: {}", side),
        None if outcome.game_over => println!("Winner: none (draw)"),
        None => println!("Winner: none (game still running)"),
    }
    println!(
        "Actions applied: {}/{}",
        outcome.actions_applied, outcome.actions_recorded
    );
    println!(
        "Random values used: {}/{}",
        outcome.random_drawn, outcome.random_recorded
    );
    for side in Side::BOTH {
        let player_state = player.game().player(side);
        println!(
            "  {}: {} health, {} armor, {} minions",
            side,
            player_state.health,
            player_state.armor,
            player_state.minions.len()
        );
    }
    if hashes {
        for (turn, hash) in outcome.state_hashes.iter().enumerate() {
            println!("  turn {:>3}: {}", turn + 1, format_hash(*hash));
        }
    }

    if !outcome.fully_consumed() {
        bail!("replay stopped before using its whole log");
    }
    Ok(())
}

fn run_inspect(file: &Path) -> anyhow::Result<()> {
    let replay = Replay::load(file).with_context(|| format!("reading {}", file.display()))?;

    for (side, deck) in Side::BOTH.into_iter().zip(&replay.decks) {
        let pattern: Vec<&str> = deck.repeating_prefix().iter().map(|def| def.name).collect();
        println!("{} deck: {} [{}]", side, deck.character_class, pattern.join(", "));
    }
    for (side, keep) in Side::BOTH.into_iter().zip(&replay.keeps) {
        println!("{} keeps positions {:?}", side, keep);
    }
    println!("Random values: {}", replay.random.len());
    println!("Actions: {} over {} turns", replay.actions.len(), replay.turn_count());
    for (index, action) in replay.actions.iter().enumerate() {
        println!("  {:>4}: {}", index, action);
    }
    Ok(())
}
