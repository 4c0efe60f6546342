//! fitness-buddy - Goal-based workouts with a set timer and cooldowns

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use fitness_buddy::exercises::Goal;
use fitness_buddy::session::{DEFAULT_COOLDOWN_SECS, DEFAULT_COOLDOWN_TRIGGER_SET, SessionConfig};
use fitness_buddy::tui::App;
use fitness_buddy::workout::{self, DEFAULT_PLAN_SIZE, WorkoutTable};

#[derive(Parser)]
#[command(name = "fitness-buddy")]
#[command(author, version, about = "Fitness Buddy - goal-based workouts with a set timer")]
struct Cli {
    /// Seconds per set
    #[arg(long, global = true, env = "FITNESS_BUDDY_SET_DURATION", default_value = "30")]
    set_duration: u32,

    /// Cooldown length in seconds
    #[arg(long, global = true, env = "FITNESS_BUDDY_COOLDOWN", default_value_t = DEFAULT_COOLDOWN_SECS)]
    cooldown: u32,

    /// Set number that starts the cooldown
    #[arg(long, global = true, env = "FITNESS_BUDDY_COOLDOWN_TRIGGER_SET", default_value_t = DEFAULT_COOLDOWN_TRIGGER_SET)]
    cooldown_trigger_set: u32,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file (the TUI otherwise only logs errors)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive app
    Tui {
        /// Seed for workout generation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a random workout for a goal
    Plan {
        /// Goal key: weightLoss or muscleGain
        #[arg(short, long)]
        goal: String,

        /// Number of exercises
        #[arg(short, long, default_value_t = DEFAULT_PLAN_SIZE)]
        count: usize,

        /// Seed for reproducible plans
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.set_duration)
            .with_cooldown_time(self.cooldown)
            .with_cooldown_trigger_set(self.cooldown_trigger_set)
    }

    fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui { .. }))
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.is_tui() && cli.log_file.is_none() {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = cli.session_config();

    match cli.command {
        Some(Commands::Plan { goal, count, seed }) => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let table = WorkoutTable::builtin();
            let plan = workout::sample(&goal, &table, count, &mut rng)?;

            let title = goal.parse::<Goal>().map(|g| g.title()).unwrap_or("Workout");
            println!("{} - {}", title, Local::now().format("%Y-%m-%d %H:%M"));
            println!("{:-<60}", "");
            for (i, e) in plan.iter().enumerate() {
                println!("{}. {:20} | {} sets of {} reps", i + 1, e.name, e.sets, e.reps);
                println!("   {}", e.description);
            }
        }

        Some(Commands::Tui { seed }) => {
            let mut app = App::new(config, seed);
            app.run()?;
        }

        None => {
            // Default: show TUI
            let mut app = App::new(config, None);
            app.run()?;
        }
    }

    Ok(())
}
