// War room entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, keep the terminal for output)
// 2. Load config
// 3. Open database
// 4. Load the player dataset and value it, restoring any saved squad
// 5. Run the requested command

mod cli;

use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use warroom_core::config;
use warroom_core::dataset;
use warroom_core::db::{Database, KeyValueStore};
use warroom_core::player::{PlayerStatRecord, Role};
use warroom_core::squad::Lineup;
use warroom_core::valuation::ValuedPlayer;
use warroom_core::{format_crores, ActionResult, WarRoom};

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing()?;
    info!("War room starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: purse {}, {} slots, {} overseas",
        format_crores(config.squad.total_purse),
        config.squad.max_squad_size,
        config.squad.max_overseas
    );

    // 3. Open database
    let db = Database::open(&config.database.path).context("failed to open database")?;
    info!("Database opened at {}", config.database.path);

    // 4. Load and value players
    let records = dataset::load_players(Path::new(&config.data_paths.players))
        .context("failed to load player dataset")?;
    let mut room = WarRoom::new(config, &records, db)?;

    // 5. Run command
    match cli.command {
        Command::Players { role, limit, by_war } => {
            print_players(&room, role.map(Role::from), limit, by_war)
        }
        Command::Show { id } => print_player(&room, &id)?,
        Command::Add { id } => report(room.add_player(&id))?,
        Command::Remove { id } => report(room.remove_player(&id))?,
        Command::Clear => report(room.clear_roster())?,
        Command::Squad => print_squad(&room)?,
    }

    info!("War room shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for command output).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("warroom.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warroom=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn report(result: ActionResult) -> anyhow::Result<()> {
    if result.success {
        println!("{}", result.message);
        Ok(())
    } else {
        bail!("{}", result.message)
    }
}

fn player_row(p: &ValuedPlayer, in_squad: bool) -> String {
    let v = p.valuation.rounded();
    format!(
        "{:<6} {:<24} {:<5} {:<12} {:<9} {:>3}  WAR {:>5.2}  {:>12}{}",
        p.record.id,
        p.record.name,
        p.record.team,
        p.record.role.label(),
        p.record.nationality.label(),
        p.record.age,
        v.war,
        format_crores(v.final_value),
        if in_squad { "  *" } else { "" }
    )
}

fn print_players<S: KeyValueStore>(room: &WarRoom<S>, role: Option<Role>, limit: usize, by_war: bool) {
    let mut players: Vec<&ValuedPlayer> = room
        .valued_players()
        .iter()
        .filter(|p| role.map_or(true, |r| p.record.role == r))
        .collect();
    if by_war {
        players.sort_by(|a, b| b.valuation.war.total_cmp(&a.valuation.war));
    } else {
        players.sort_by(|a, b| b.price().total_cmp(&a.price()));
    }

    for p in players.iter().take(limit) {
        println!("{}", player_row(p, room.in_squad(p.id())));
    }
    println!(
        "\n{} of {} players shown, pool total {}",
        players.len().min(limit),
        players.len(),
        format_crores(room.pool_total())
    );
}

fn print_player<S: KeyValueStore>(room: &WarRoom<S>, id: &str) -> anyhow::Result<()> {
    let Some(p) = room.player(id) else {
        bail!("Player {id} not found");
    };
    let v = p.valuation.rounded();

    println!("{} ({}, {}, age {})", p.record.name, p.record.team, p.record.nationality, p.record.age);
    println!("Role:                {}", p.record.role);
    println!("WAR:                 {:.2} ({})", v.war, v.grade());
    if let Some(bat) = v.batting_war {
        println!("  batting WAR:       {bat:.2}");
    }
    if let Some(bowl) = v.bowling_war {
        println!("  bowling WAR:       {bowl:.2}");
    }
    println!("Base value:          {}", format_crores(v.base_value));
    println!("Confidence:          {:.2}", v.confidence);
    println!("Confidence adjusted: {}", format_crores(v.adjusted_base));
    println!("Age multiplier:      {:.2}x", v.age_multiplier);
    println!("Scarcity multiplier: {:.2}x", v.scarcity_multiplier);
    println!("Form multiplier:     {:.2}x", v.form_multiplier);
    println!("Final value:         {}", format_crores(v.final_value));
    if room.in_squad(id) {
        println!("\nIn squad");
    }
    Ok(())
}

fn print_squad(room: &WarRoom<Database>) -> anyhow::Result<()> {
    let rules = &room.config().squad;
    let budget = room.budget_summary();
    let comp = room.composition();

    println!(
        "Purse {}  Spent {}  Remaining {}",
        format_crores(budget.total_purse),
        format_crores(budget.spent),
        format_crores(budget.remaining)
    );
    println!(
        "Players {}/{}  Overseas {}/{}  Reserve {} for {} open slots  Available {}",
        comp.total,
        rules.max_squad_size,
        comp.overseas,
        rules.max_overseas,
        format_crores(budget.min_reserve),
        budget.slots_remaining,
        format_crores(budget.available)
    );

    println!("\nSquad");
    if room.squad().is_empty() {
        println!("  (empty)");
    }
    for p in room.squad() {
        println!("  {}", player_row(p, false));
    }

    println!(
        "\nComposition: {} batsmen, {} bowlers, {} all-rounders ({} domestic, {} overseas)",
        comp.batsmen, comp.bowlers, comp.all_rounders, comp.domestic, comp.overseas
    );

    println!("\nGaps");
    let gaps = room.gaps();
    if gaps.is_empty() {
        println!("  none");
    }
    for g in &gaps {
        println!(
            "  [{:<8}] {:<16} {}/{}  {}",
            g.priority.label(),
            g.category,
            g.current,
            g.needed,
            g.description
        );
    }

    println!("\nBest XI");
    match room.best_lineup() {
        Some(xi) => print_lineup(&xi),
        None => println!("  needs at least 11 players"),
    }

    let saved = room
        .store()
        .updated_at(&room.config().database.squad_key)
        .context("failed to read save time")?;
    println!("\nLast saved: {}", saved.as_deref().unwrap_or("never"));
    Ok(())
}

fn print_lineup(xi: &Lineup<'_>) {
    let names = |slot: &[&PlayerStatRecord]| -> String {
        slot.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    };
    println!("  Keeper:       {}", xi.keeper.map_or("-", |p| p.name.as_str()));
    println!("  Openers:      {}", names(&xi.openers));
    println!("  Middle order: {}", names(&xi.middle_order));
    println!("  All-rounders: {}", names(&xi.all_rounders));
    println!("  Bowlers:      {}", names(&xi.bowlers));
    println!(
        "  {} players, {} overseas{}",
        xi.total_players,
        xi.overseas_count,
        if xi.is_valid { "" } else { " (over the overseas limit)" }
    );
}
