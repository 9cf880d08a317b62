use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::fmt::Display;
use std::path::PathBuf;

use vega_score::achievements::newly_unlocked;
use vega_score::scoring::{
    build_leaderboard, rank_of, AwardPick, LeaguePicks, MatchScore, Outcome, PredictableKind,
    ScoringError,
};
use vega_score::standings::SortKey;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct DeadlineArgs {
    /// Stop accepting predictions after this long (e.g. "2h", "3days")
    #[arg(long, conflicts_with = "deadline")]
    closes_in: Option<String>,

    /// Stop accepting predictions at this RFC 3339 time
    #[arg(long)]
    deadline: Option<String>,
}

impl DeadlineArgs {
    fn resolve(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        if let Some(ref closes_in) = self.closes_in {
            let duration = humantime::parse_duration(closes_in)
                .with_context(|| format!("Invalid duration '{}'", closes_in))?;
            let duration = chrono::Duration::from_std(duration)
                .with_context(|| format!("Duration '{}' is too large", closes_in))?;
            return Ok(Some(now + duration));
        }
        if let Some(ref deadline) = self.deadline {
            let parsed = DateTime::parse_from_rfc3339(deadline)
                .with_context(|| format!("Invalid deadline '{}'", deadline))?;
            return Ok(Some(parsed.with_timezone(&Utc)));
        }
        Ok(None)
    }
}

#[derive(Subcommand, Debug)]
enum AddTarget {
    /// A single match between two teams
    Match {
        id: String,
        home_team: String,
        away_team: String,
        #[command(flatten)]
        deadline: DeadlineArgs,
    },
    /// A league: champion, top scorer, top assist and MVP
    League {
        id: String,
        name: String,
        #[command(flatten)]
        deadline: DeadlineArgs,
    },
    /// An individual award with a single winner
    Award {
        id: String,
        name: String,
        #[command(flatten)]
        deadline: DeadlineArgs,
    },
}

#[derive(Subcommand, Debug)]
enum PickArgs {
    /// Final score of a match
    Match {
        id: String,
        home: String,
        away: String,
    },
    /// Champion, top scorer, top assist and MVP of a league
    League {
        id: String,
        champion: String,
        top_scorer: String,
        top_assist: String,
        mvp: String,
    },
    /// Winner of an award
    Award { id: String, winner: String },
}

impl PickArgs {
    fn id(&self) -> &str {
        match self {
            PickArgs::Match { id, .. } | PickArgs::League { id, .. } | PickArgs::Award { id, .. } => id,
        }
    }

    fn to_outcome(&self) -> Result<Outcome, ScoringError> {
        Ok(match self {
            PickArgs::Match { home, away, .. } => Outcome::Match(MatchScore::parse(home, away)?),
            PickArgs::League {
                champion,
                top_scorer,
                top_assist,
                mvp,
                ..
            } => Outcome::League(LeaguePicks::parse(champion, top_scorer, top_assist, mvp)?),
            PickArgs::Award { winner, .. } => Outcome::Award(AwardPick::parse(winner)?),
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Fetch a participant, creating the profile on first login
    Login {
        id: String,
        /// Display name for a new profile (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },
    /// Register a new participant
    Register {
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Add something to predict
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },
    /// Submit or replace a participant's prediction
    Predict {
        /// Participant making the prediction
        #[arg(long, short = 'p')]
        participant: String,
        #[command(subcommand)]
        pick: PickArgs,
    },
    /// Record the final result and award points
    Finalize {
        #[command(subcommand)]
        result: PickArgs,
    },
    /// Show the standings (default if no subcommand)
    Leaderboard {
        #[arg(long, value_enum, default_value_t = SortKey::Points)]
        sort: SortKey,
        /// Only show the first N rows
        #[arg(long)]
        top: Option<usize>,
        /// Filter by participant name
        #[arg(long)]
        search: Option<String>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show one participant's rank, totals, achievements and predictions
    Show { id: String },
    /// Season-wide statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// List matches, leagues and awards with their status
    List,
}

#[derive(Parser, Debug)]
#[command(name = "vega-score")]
#[command(about = "Sports prediction scoring and leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/vega-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_with(code: i32, prefix: &str, err: impl Display) -> ! {
    eprintln!("{}: {:#}", prefix, err);
    std::process::exit(code);
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.map(PathBuf::from);
    let command = cli.command.unwrap_or(Commands::Leaderboard {
        sort: SortKey::Points,
        top: None,
        search: None,
        tsv: false,
    });

    if let Commands::Init { force } = command {
        match vega_score::config::write_default_config(config_path, force) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                println!("Run `vega-score login <id>` to get started.");
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
        }
    }

    // Load config
    let config = match vega_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
    };

    // Validate scoring rules at startup
    let rules = config.rules();
    if let Err(errors) = vega_score::scoring::validate_rules(&rules) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let achievements = config.achievements();

    let season_path = match config.season_file.clone() {
        Some(p) => p,
        None => match vega_score::season::get_season_path() {
            Ok(p) => p,
            Err(e) => exit_with(EXIT_STORAGE, "Season error", e),
        },
    };

    let mut season = match vega_score::season::load_season(&season_path) {
        Ok(s) => s,
        Err(e) => exit_with(EXIT_STORAGE, "Season error", e),
    };

    if cli.verbose {
        eprintln!(
            "Scoring: exact {} / result {} / league pick {} / award {}",
            rules.exact_score, rules.correct_result, rules.league_pick, rules.award_winner
        );
        eprintln!(
            "Loaded season from {}: {} participants, {} predictables, {} predictions",
            season_path.display(),
            season.participants.len(),
            season.predictables.len(),
            season.predictions.len()
        );
    }

    let use_colors = vega_score::output::should_use_colors();
    let now = Utc::now();

    let changed = match command {
        Commands::Init { .. } => unreachable!("handled before loading config"),
        Commands::Login { id, name } => {
            let (profile, created) = season.login(&id, name.as_deref());
            if created {
                println!("Welcome, {}! Your profile has been created.", profile.name);
            } else {
                println!(
                    "Welcome back, {}. You have {} points.",
                    profile.name, profile.points
                );
            }
            created
        }
        Commands::Register { id, name } => {
            if let Err(e) = season.register(&id, &name) {
                exit_with(EXIT_INVALID, "Register failed", e);
            }
            println!("Registered {} ({})", name, id);
            true
        }
        Commands::Add { target } => {
            let (id, title, kind, deadline) = match &target {
                AddTarget::Match {
                    id,
                    home_team,
                    away_team,
                    deadline,
                } => (
                    id,
                    format!("{} vs {}", home_team, away_team),
                    PredictableKind::Match,
                    deadline,
                ),
                AddTarget::League { id, name, deadline } => {
                    (id, name.clone(), PredictableKind::League, deadline)
                }
                AddTarget::Award { id, name, deadline } => {
                    (id, name.clone(), PredictableKind::Award, deadline)
                }
            };
            let deadline = match deadline.resolve(now) {
                Ok(d) => d,
                Err(e) => exit_with(EXIT_INVALID, "Invalid deadline", e),
            };
            if let Err(e) = season.add_predictable(id, &title, kind, deadline) {
                exit_with(EXIT_INVALID, "Add failed", e);
            }
            println!("Added {} '{}' ({})", kind, title, id);
            true
        }
        Commands::Predict { participant, pick } => {
            let forecast = match pick.to_outcome() {
                Ok(f) => f,
                Err(e) => exit_with(EXIT_INVALID, "Invalid prediction", e),
            };
            let summary = forecast.summary();
            match season.submit_prediction(&participant, pick.id(), forecast, now) {
                Ok(true) => println!("Prediction updated for {}: {}", pick.id(), summary),
                Ok(false) => println!("Prediction saved for {}: {}", pick.id(), summary),
                Err(e) => exit_with(EXIT_INVALID, "Prediction rejected", e),
            }
            true
        }
        Commands::Finalize { result } => {
            let outcome = match result.to_outcome() {
                Ok(o) => o,
                Err(e) => exit_with(EXIT_INVALID, "Invalid result", e),
            };
            let before = season.participants.clone();

            let sheet = match season.finalize(result.id(), outcome.clone(), &rules) {
                Ok(s) => s,
                Err(e) => exit_with(EXIT_INVALID, "Finalize failed", e),
            };

            println!(
                "{}",
                vega_score::output::format_finalize_summary(
                    result.id(),
                    &outcome,
                    &season.predictions_for(result.id()),
                    &sheet
                )
            );
            println!(
                "{}",
                vega_score::output::format_score_sheet(&sheet, &season.participants, use_colors)
            );

            for participant in season.participants.iter().filter(|p| sheet.contains_key(&p.id)) {
                let already: Vec<String> = before
                    .iter()
                    .find(|b| b.id == participant.id)
                    .map(|b| {
                        achievements
                            .iter()
                            .filter(|a| a.is_unlocked(b))
                            .map(|a| a.id.clone())
                            .collect()
                    })
                    .unwrap_or_default();
                for achievement in newly_unlocked(&achievements, participant, &already) {
                    println!("{} unlocked '{}'", participant.name, achievement.name);
                }
            }
            true
        }
        Commands::Leaderboard {
            sort,
            top,
            search,
            tsv,
        } => {
            let rows = vega_score::standings::standings(
                &season.participants,
                sort,
                search.as_deref(),
                top,
            );
            if tsv {
                println!("{}", vega_score::output::format_tsv(&rows));
            } else {
                println!(
                    "{}",
                    vega_score::output::format_leaderboard(&rows, use_colors)
                );
            }
            false
        }
        Commands::Show { id } => {
            let board = build_leaderboard(&season.participants);
            let Some(rank) = rank_of(&board, &id) else {
                exit_with(EXIT_INVALID, "Show failed", format!("Unknown participant '{}'", id));
            };
            let participant = &board[rank - 1];
            println!(
                "{}",
                vega_score::output::format_participant_detail(
                    participant,
                    rank,
                    board.len(),
                    &achievements,
                    use_colors
                )
            );
            println!(
                "{}",
                vega_score::output::format_prediction_history(
                    &season.predictions_by(&participant.id),
                    use_colors
                )
            );
            false
        }
        Commands::Stats { json } => {
            let stats = vega_score::standings::global_stats(&season.participants);
            if json {
                match serde_json::to_string_pretty(&stats) {
                    Ok(s) => println!("{}", s),
                    Err(e) => exit_with(EXIT_INVALID, "Stats failed", e),
                }
            } else {
                println!("{}", vega_score::output::format_global_stats(&stats));
            }
            false
        }
        Commands::List => {
            println!(
                "{}",
                vega_score::output::format_predictables(&season.predictables, now, use_colors)
            );
            false
        }
    };

    if changed {
        if let Err(e) = vega_score::season::save_season(&season_path, &season) {
            exit_with(EXIT_STORAGE, "Season error", e);
        }
        if cli.verbose {
            eprintln!("Saved season to {}", season_path.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
