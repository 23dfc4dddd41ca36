use gainz_core::ledger::{CSV_FILE, WAL_FILE};
use gainz_core::state::exp_needed_for_level;
use gainz_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Attempts per submission while the ledger reports retryable failures
const MAX_SUBMIT_ATTEMPTS: u32 = 3;

#[derive(Parser)]
#[command(name = "gainz")]
#[command(about = "Gamified workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout, reading set entries from stdin
    Workout {
        /// Routine name recorded with the workout
        #[arg(long)]
        routine: Option<String>,

        /// Exercise id from the library (repeatable, in routine order)
        #[arg(long = "exercise")]
        exercises: Vec<String>,

        /// Exercise list as JSON (array of objects with `id`, or of names)
        #[arg(long, conflicts_with = "exercises")]
        exercises_json: Option<String>,

        /// Workout length in minutes
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Show level, coins, stats and quests (default)
    Status,

    /// Create a quest
    Quest {
        /// easy, medium or hard
        #[arg(long, default_value = "easy")]
        difficulty: String,
    },

    /// Show workout history by month
    History,

    /// Roll up the workout log to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    gainz_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Workout {
            routine,
            exercises,
            exercises_json,
            duration,
        }) => {
            cmd_workout(
                &data_dir,
                &config,
                routine,
                exercises,
                exercises_json,
                duration,
            )
            .await
        }
        Some(Commands::Quest { difficulty }) => cmd_quest(&data_dir, &config, &difficulty),
        Some(Commands::History) => cmd_history(&data_dir),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&data_dir, cleanup),
        Some(Commands::Status) | None => cmd_status(&data_dir, &config),
    }
}

async fn cmd_workout(
    data_dir: &Path,
    config: &Config,
    routine: Option<String>,
    exercise_ids: Vec<String>,
    exercises_json: Option<String>,
    duration: Option<u32>,
) -> Result<()> {
    let library = config.exercise_library()?;

    let exercises = match exercises_json {
        Some(raw) => parse_exercise_list(&raw, &library),
        None => exercise_ids
            .iter()
            .map(|id| {
                library
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| ExerciseRef::bare(id.as_str(), id.as_str()))
            })
            .collect(),
    };

    let name = routine.unwrap_or_else(|| config.workout.default_name.clone());
    let duration = duration.unwrap_or(config.workout.default_duration_minutes);

    let mut active = ActiveRoutine::new(name, exercises, 0);
    println!("Workout: {} ({} exercises)", active.name(), active.len());
    show_current(&active);

    let records = match run_routine(&mut active)? {
        Some(records) => records,
        None => {
            println!("Workout cancelled - nothing recorded.");
            return Ok(());
        }
    };

    let ledger = LocalLedger::open(data_dir, library);
    let profile = ledger.fetch_profile().await?;
    let quests = ledger.fetch_quests().await?;

    let request = SubmissionRequest {
        name: active.name(),
        records,
        duration_minutes: duration,
        date: chrono::Local::now().date_naive(),
        profile: &profile,
        quests: &quests,
    };

    let mut submission =
        match prepare(request, ledger.library(), &RewardCalculator::from_config(&config.rewards)) {
            Ok(submission) => submission,
            Err(Error::Validation(msg)) => {
                eprintln!("{}", msg);
                return Err(Error::Validation(msg));
            }
            Err(e) => return Err(e),
        };

    let mut attempt = 1;
    let report = loop {
        match submission.submit(&ledger).await {
            Ok(report) => break report,
            Err(e) if e.is_retryable() && attempt < MAX_SUBMIT_ATTEMPTS => {
                tracing::warn!("Submission attempt {} failed: {}", attempt, e);
                attempt += 1;
            }
            Err(e) => {
                eprintln!("Could not save workout: {}", e);
                return Err(e);
            }
        }
    };

    display_outcome(&report.outcome);
    let reward = submission.reward();
    println!(
        "  +{} points, +{} coins ({:?})",
        reward.points, reward.coins, reward.stat
    );

    Ok(())
}

/// Read commands until the workout ends. `None` means it was cancelled.
fn run_routine(active: &mut ActiveRoutine) -> Result<Option<Vec<CompletedExercise>>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                println!();
                return Ok(Some(active.end()));
            }
        };

        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match command.to_lowercase().as_str() {
            "next" | "n" => match active.next() {
                Step::At(_) => show_current(active),
                Step::Finished(records) => return Ok(Some(records)),
            },
            "prev" | "p" => {
                active.prev();
                show_current(active);
            }
            "end" | "done" => return Ok(Some(active.end())),
            "cancel" => {
                active.cancel();
                return Ok(None);
            }
            "show" | "s" => show_current(active),
            "add" => {
                let position = active.position();
                active.store_mut().add_set(position);
                show_current(active);
            }
            "remove" => match args.first().and_then(|a| parse_set_number(a)) {
                Some(index) => {
                    let position = active.position();
                    active.store_mut().remove_set(position, index);
                    show_current(active);
                }
                None => println!("Usage: remove <set>"),
            },
            "help" | "?" => print_help(),
            other => match other.parse::<SetField>() {
                Ok(field) => {
                    let index = args.first().and_then(|a| parse_set_number(a));
                    match index {
                        Some(index) => {
                            let value = args.get(1).copied().unwrap_or("");
                            let position = active.position();
                            active.store_mut().update_set(position, index, field, value);
                        }
                        None => println!("Usage: {} <set> <value>", other),
                    }
                }
                Err(_) => println!("Unknown command: {} (type 'help')", other),
            },
        }
    }
}

/// Sets are numbered from 1 on the command line
fn parse_set_number(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

fn show_current(active: &ActiveRoutine) {
    let Some(exercise) = active.current() else {
        println!("No exercises in this routine.");
        return;
    };

    println!(
        "\n[{}/{}] {} ({})",
        active.position() + 1,
        active.len(),
        exercise.name,
        classify(exercise)
    );
    for (i, set) in active.store().get_sets(active.position()).iter().enumerate() {
        println!(
            "  Set {}: reps={} weight={} distance={}",
            i + 1,
            set.reps,
            set.weight,
            set.distance
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  reps <set> <value>      weight <set> <value>      distance <set> <value>");
    println!("  add | remove <set> | show | next | prev | end | cancel");
}

fn display_outcome(outcome: &Outcome) {
    println!("\n─────────────────────────────────────────");
    match outcome {
        Outcome::LevelUp {
            old_level,
            new_level,
            levels_gained,
        } => {
            println!("LEVEL UP! Level {} -> {}", old_level, new_level);
            if *levels_gained > 1 {
                println!("  {} levels gained", levels_gained);
            }
        }
        Outcome::QuestComplete { quests } => {
            println!("QUEST COMPLETE!");
            for quest in quests {
                println!("  ✓ {}", quest.name);
            }
        }
        Outcome::PlainComplete => println!("WORKOUT COMPLETE!"),
    }
}

fn cmd_status(data_dir: &Path, config: &Config) -> Result<()> {
    let ledger = LocalLedger::open(data_dir, config.exercise_library()?);
    let state = ledger.state()?;

    println!("Level: {}", state.level);
    println!("  Exp: {}/{}", state.exp, exp_needed_for_level(state.level));
    println!("Coins: {}", state.coins);
    println!(
        "Stats: strength {}, endurance {}, flexibility {}",
        state.stats.strength, state.stats.endurance, state.stats.flexibility
    );

    if state.quests.is_empty() {
        println!("No quests. Create one with `gainz quest --difficulty easy`.");
        return Ok(());
    }

    println!("Quests:");
    for quest in &state.quests {
        let mark = if quest.status.is_complete() { "✓" } else { " " };
        println!(
            "  [{}] #{} {} ({}/{})",
            mark,
            quest.id,
            quest.name,
            quest.number_of_workouts_completed,
            quest.number_of_workouts_needed
        );
    }

    Ok(())
}

fn cmd_quest(data_dir: &Path, config: &Config, difficulty: &str) -> Result<()> {
    let difficulty: QuestDifficulty = difficulty.parse()?;
    let ledger = LocalLedger::open(data_dir, config.exercise_library()?);
    let quest = ledger.create_quest(difficulty)?;

    println!("✓ Created quest #{}: {}", quest.id, quest.name);
    Ok(())
}

fn cmd_history(data_dir: &Path) -> Result<()> {
    let workouts = load_workouts(&data_dir.join(WAL_FILE), &data_dir.join(CSV_FILE))?;

    if workouts.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for group in group_by_month(&workouts) {
        let plural = if group.total_sessions == 1 { "" } else { "s" };
        println!(
            "\n{} - {} session{}, {} points",
            group.display_month, group.total_sessions, plural, group.total_points
        );
        for workout in &group.workouts {
            let session = &workout.session;
            println!(
                "  {}  {} ({} min, {} points, {} coins)",
                session.date.format("%Y-%m-%d"),
                session.name,
                session.duration,
                session.points,
                session.coins
            );
        }
    }

    Ok(())
}

fn cmd_rollup(data_dir: &Path, cleanup: bool) -> Result<()> {
    let wal_path = data_dir.join(WAL_FILE);
    let csv_path = data_dir.join(CSV_FILE);

    if !wal_path.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = gainz_core::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path)?;

    println!("✓ Rolled up {} workouts to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = gainz_core::csv_rollup::cleanup_processed_wals(data_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}
