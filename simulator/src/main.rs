use anyhow::Context;
use clap::{Parser, Subcommand};
use clave_execution::mines::{estimate, Strategy};
use clave_execution::{GameRng, Session};
use clave_simulator::{autoplay, render_board, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Variant preset (classic, even, cushioned)
    #[arg(short, long)]
    variant: Option<String>,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the house edge of a cash-out strategy
    Simulate {
        #[arg(long, default_value_t = 50_000)]
        trials: u64,
        #[arg(long, default_value_t = 5)]
        cash_out_after: usize,
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
    },
    /// Deal one board and print it
    Board {
        #[arg(long)]
        json: bool,
    },
    /// Play rounds through the session with the presentation delay
    Autoplay {
        #[arg(long, default_value_t = 3)]
        rounds: u32,
        #[arg(long, default_value_t = 5)]
        cash_out_after: usize,
        #[arg(long, default_value_t = 10.0)]
        bet: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => Config::load(path).context("could not load config")?,
        None => Config::default(),
    };
    if let Some(variant) = args.variant {
        config.variant = variant;
        config.custom = None;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }
    let config = config.validate().context("invalid config")?;

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let mut session = Session::new(config.session).context("invalid variant")?;
    info!(
        variant = %session.config().variant.name,
        seed = session.seed(),
        "session ready"
    );

    match args.command {
        Command::Simulate {
            trials,
            cash_out_after,
            bet,
        } => {
            let variant = session.config().variant.clone();
            let result = estimate(
                &variant,
                Strategy { cash_out_after },
                trials,
                bet,
                session.seed(),
            )
            .context("estimate failed")?;
            println!("variant          {}", variant.name);
            println!("trials           {}", result.rounds);
            println!("cash out after   {cash_out_after}");
            println!("avg wagered      {:.4}", result.mean_wager());
            println!("avg net          {:.4}", result.mean_net());
            println!(
                "house edge       {:.3}% (± {:.3}%)",
                result.house_edge() * 100.0,
                result.edge_error() * 100.0
            );
            match result.lowest_multiplier {
                Some(lowest) => println!("lowest total     {lowest:.2}x"),
                None => println!("lowest total     n/a"),
            }
            println!(
                "below 1.0x       {:.2}% of boards",
                result.below_floor_share() * 100.0
            );
        }
        Command::Board { json } => {
            let round = session.start_or_restart_round();
            if json {
                let out = serde_json::to_string_pretty(round).context("failed to encode board")?;
                println!("{out}");
            } else {
                print!("{}", render_board(round));
            }
        }
        Command::Autoplay {
            rounds,
            cash_out_after,
            bet,
        } => {
            session
                .set_bet_amount(Some(bet))
                .context("invalid bet amount")?;
            let mut player = GameRng::from_entropy();
            let tally = autoplay(&mut session, rounds, cash_out_after, &mut player)
                .await
                .context("autoplay failed")?;
            println!(
                "won {:.2}  lost {:.2}  net {:.2}",
                tally.total_won,
                tally.total_lost,
                tally.net()
            );
        }
    }

    Ok(())
}
