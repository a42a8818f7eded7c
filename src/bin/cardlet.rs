use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardlet::emulator::{build_select_apdu, CardEmulator, DeactivationReason, DEMO_AID};
use cardlet::store::{AccountStore, FileStore};
use cardlet::{codec, SELECT_APDU_HEADER};
use clap::Parser as _;
use owo_colors::{colors, OwoColorize};
use tap::TapFallible;
use tracing::{trace, warn};

#[derive(clap::Parser, Debug)]
struct Args {
    /// Increase log level.
    #[arg(short, long, action=clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease log level.
    #[arg(short, long, action=clap::ArgAction::Count)]
    quiet: u8,

    /// Keep the account number in FILE.
    #[arg(short, long, default_value = "cardlet.json")]
    store: PathBuf,

    /// Application ID to answer for, as hex.
    #[arg(long, default_value = DEMO_AID)]
    aid: String,

    /// Command.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Answer reader commands, one hex APDU per stdin line.
    Respond,

    /// Print the stored account number.
    Account,

    /// Store a new account number.
    SetAccount { value: String },

    /// Print the SELECT frame a reader would address us with.
    SelectApdu,
}

impl Command {
    pub fn run(&self, args: &Args) -> Result<()> {
        match self {
            Self::Respond => respond(args),
            Self::Account => account(args),
            Self::SetAccount { value } => set_account(args, value),
            Self::SelectApdu => select_apdu(args),
        }
    }
}

fn respond(args: &Args) -> Result<()> {
    let store = FileStore::new(&args.store);
    let card = CardEmulator::new(&args.aid, store).context("couldn't build the card")?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // A line that isn't hex never came out of a reader; skip it rather
        // than answer a frame nobody sent.
        let Ok(apdu) =
            codec::from_hex(line).tap_err(|err| warn!(?err, line, "Ignoring garbled input line"))
        else {
            continue;
        };
        let rsp = card.process_command(&apdu)?;
        println!("{}", codec::to_hex(&rsp));
    }

    // EOF: whoever was feeding us is gone, same as a reader leaving the field.
    card.on_deactivated(DeactivationReason::LinkLoss);
    Ok(())
}

fn account(args: &Args) -> Result<()> {
    let store = FileStore::new(&args.store);
    println!("{}", store.account()?);
    Ok(())
}

fn set_account(args: &Args, value: &str) -> Result<()> {
    let store = FileStore::new(&args.store);
    store.set_account(value)?;
    Ok(())
}

type FrameColorHeader = colors::Yellow;
type FrameColorLen = colors::Cyan;
type FrameColorAid = colors::Green;

fn select_apdu(args: &Args) -> Result<()> {
    let frame = build_select_apdu(&args.aid)?;
    let (header, rest) = frame.split_at(SELECT_APDU_HEADER.len());
    let (len, aid) = rest.split_at(1);
    println!(
        "{}{}{}",
        codec::to_hex(header).fg::<FrameColorHeader>(),
        codec::to_hex(len).fg::<FrameColorLen>(),
        codec::to_hex(aid).fg::<FrameColorAid>(),
    );
    Ok(())
}

fn init_logging(args: &Args) {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        // Stdout is the reply channel in `respond`; keep logs off it.
        .with_writer(io::stderr)
        .with_max_level(match 2 + args.verbose - args.quiet {
            0 => tracing::Level::ERROR,
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            3 => tracing::Level::DEBUG,
            4.. => tracing::Level::TRACE,
        })
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);
    trace!(?args, "Starting up");
    args.command.run(&args)
}
