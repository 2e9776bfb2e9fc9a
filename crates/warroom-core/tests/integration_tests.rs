// End-to-end tests: dataset fixtures through valuation, squad building,
// diagnostics and persistence.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use warroom_core::config::{self, Config};
use warroom_core::dataset;
use warroom_core::db::{Database, KeyValueStore};
use warroom_core::player::{PlayerStatRecord, Role};
use warroom_core::squad::{GapPriority, SavedSquad};
use warroom_core::WarRoom;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn fixture_players() -> Vec<PlayerStatRecord> {
    dataset::load_players(&fixture("players.json")).expect("fixture dataset should load")
}

/// Default rules with a purse large enough to take the whole fixture pool.
fn roomy_config() -> Config {
    let mut config = Config::default();
    config.squad.total_purse = 1000.0;
    config
}

fn ids<S: KeyValueStore>(room: &WarRoom<S>) -> Vec<String> {
    room.squad().iter().map(|p| p.id().to_string()).collect()
}

// ---------------------------------------------------------------------------
// Dataset + valuation
// ---------------------------------------------------------------------------

#[test]
fn fixture_pool_values_every_player() {
    let records = fixture_players();
    let room = WarRoom::new(Config::default(), &records, Database::open(":memory:").unwrap()).unwrap();

    assert_eq!(room.valued_players().len(), 16);
    let order: Vec<&str> = room.valued_players().iter().map(|p| p.id()).collect();
    let expected: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, expected, "valuation keeps dataset order");

    for p in room.valued_players() {
        assert!(p.price().is_finite() && p.price() >= 0.0, "{} priced {}", p.id(), p.price());
    }
    let total: f64 = room.valued_players().iter().map(|p| p.price()).sum();
    assert!((room.pool_total() - total).abs() < 1e-9);
}

#[test]
fn csv_and_json_fixtures_describe_the_same_players() {
    let json = fixture_players();
    let csv = dataset::load_players(&fixture("players.csv")).unwrap();
    assert_eq!(csv.len(), 4);
    for record in &csv {
        let twin = json.iter().find(|r| r.id == record.id).unwrap();
        assert_eq!(record, twin);
    }
}

#[test]
fn valuation_is_repeatable_across_rooms() {
    let records = fixture_players();
    let a = WarRoom::new(Config::default(), &records, Database::open(":memory:").unwrap()).unwrap();
    let b = WarRoom::new(Config::default(), &records, Database::open(":memory:").unwrap()).unwrap();
    for (x, y) in a.valued_players().iter().zip(b.valued_players()) {
        assert_eq!(x.valuation, y.valuation);
    }
}

// ---------------------------------------------------------------------------
// Squad building
// ---------------------------------------------------------------------------

#[test]
fn small_squad_reports_gaps_in_severity_order() {
    let records = fixture_players();
    let mut room = WarRoom::new(Config::default(), &records, Database::open(":memory:").unwrap()).unwrap();

    // Death specialist and a hinted keeper who also opens.
    assert!(room.add_player("10").success);
    assert!(room.add_player("1").success);

    let gaps = room.gaps();
    let categories: Vec<&str> = gaps.iter().map(|g| g.category).collect();
    assert_eq!(
        categories,
        vec!["Death Bowling", "Opening Batsmen", "Spin Bowling", "All-Rounders"]
    );
    assert_eq!(gaps[0].priority, GapPriority::Critical);
    assert_eq!((gaps[0].current, gaps[0].needed), (1, 2));
    assert!(room.best_lineup().is_none());
}

#[test]
fn full_pool_picks_a_valid_eleven() {
    let records = fixture_players();
    let mut room = WarRoom::new(roomy_config(), &records, Database::open(":memory:").unwrap()).unwrap();
    for r in &records {
        let result = room.add_player(&r.id);
        assert!(result.success, "{}: {}", r.id, result.message);
    }
    assert_eq!(room.composition().overseas, 6);

    let xi = room.best_lineup().unwrap();
    assert_eq!(xi.total_players, 11);
    assert_eq!(xi.keeper.map(|k| k.name.as_str()), Some("Arjun Pantwal"));
    assert_eq!(xi.openers.len(), 2);
    assert_eq!(xi.middle_order.len(), 3);
    assert_eq!(xi.all_rounders.len(), 2);
    assert_eq!(xi.bowlers.len(), 3);
    assert!(xi.players().filter(|p| p.id == "1").count() == 1);
    assert_eq!(xi.is_valid, xi.overseas_count <= 4);
    assert!(xi.bowlers.iter().all(|p| p.role == Role::Bowler));
}

#[test]
fn overseas_cap_blocks_the_third_import() {
    let records = fixture_players();
    let mut config = roomy_config();
    config.squad.max_overseas = 2;
    let mut room = WarRoom::new(config, &records, Database::open(":memory:").unwrap()).unwrap();

    assert!(room.add_player("3").success);
    assert!(room.add_player("5").success);
    let third = room.add_player("7");
    assert!(!third.success);
    assert!(third.message.contains("overseas"), "{}", third.message);
    assert!(room.add_player("2").success, "domestic players still fit");
}

#[test]
fn purse_reserve_blocks_overspending() {
    let records = fixture_players();
    let mut config = Config::default();
    config.squad.total_purse = 1.0;
    config.squad.max_squad_size = 5;
    let mut room = WarRoom::new(config, &records, Database::open(":memory:").unwrap()).unwrap();

    let result = room.add_player("2");
    assert!(!result.success);
    assert!(result.message.contains("Cr available"), "{}", result.message);
    assert!(room.squad().is_empty());
    assert_eq!(room.spent(), 0.0);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn squad_survives_restart_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("warroom.db");
    let db_path = db_path.to_str().unwrap();
    let records = fixture_players();

    let before = {
        let mut room = WarRoom::new(Config::default(), &records, Database::open(db_path).unwrap()).unwrap();
        for id in ["12", "1", "8"] {
            assert!(room.add_player(id).success);
        }
        room.remove_player("1");
        room.add_player("6");
        ids(&room)
    };
    assert_eq!(before, vec!["12", "8", "6"]);

    let room = WarRoom::new(Config::default(), &records, Database::open(db_path).unwrap()).unwrap();
    assert_eq!(ids(&room), before);
}

#[test]
fn saved_players_missing_from_the_dataset_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("warroom.db");
    let db_path = db_path.to_str().unwrap();
    let records = fixture_players();

    {
        let mut room = WarRoom::new(Config::default(), &records, Database::open(db_path).unwrap()).unwrap();
        room.add_player("4");
        room.add_player("13");
    }

    let trimmed: Vec<PlayerStatRecord> = records.into_iter().filter(|r| r.id != "4").collect();
    let room = WarRoom::new(Config::default(), &trimmed, Database::open(db_path).unwrap()).unwrap();
    assert_eq!(ids(&room), vec!["13"]);

    let json = room.store().load("iplSquad").unwrap().unwrap();
    let saved: SavedSquad = serde_json::from_str(&json).unwrap();
    assert_eq!(saved.ids(), vec!["4", "13"], "restore alone does not rewrite the store");
}

/// Store that has nothing saved and refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

#[test]
fn failed_save_keeps_the_in_memory_squad() {
    let records = fixture_players();
    let mut room = WarRoom::new(Config::default(), &records, ReadOnlyStore).unwrap();

    assert!(room.add_player("11").success);
    assert!(room.add_player("9").success);
    assert_eq!(ids(&room), vec!["11", "9"]);
    assert!(room.remove_player("11").success);
    assert_eq!(ids(&room), vec!["9"]);
}

/// Store whose reads always fail.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("io error"))
    }

    fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn unreadable_store_fails_construction() {
    assert!(WarRoom::new(Config::default(), &fixture_players(), BrokenStore).is_err());
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn seeded_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let defaults = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../defaults");
    let target = dir.path().join("defaults");
    std::fs::create_dir_all(&target).unwrap();
    for name in ["squad.toml", "valuation.toml"] {
        std::fs::copy(defaults.join(name), target.join(name)).unwrap();
    }
    dir
}

#[test]
fn shipped_defaults_load_and_match_builtin_rules() {
    let dir = seeded_project();
    let copied = config::ensure_config_files(dir.path()).unwrap();
    assert_eq!(copied.len(), 2);

    let loaded = config::load_config_from(dir.path()).unwrap();
    let builtin = Config::default();
    assert_eq!(loaded.squad.total_purse, builtin.squad.total_purse);
    assert_eq!(loaded.squad.max_squad_size, builtin.squad.max_squad_size);
    assert_eq!(loaded.squad.max_overseas, builtin.squad.max_overseas);
    assert_eq!(loaded.squad.keeper_name_hints, builtin.squad.keeper_name_hints);
    assert_eq!(loaded.database.squad_key, "iplSquad");

    // Same rules price the pool the same way.
    let records = fixture_players();
    let a = WarRoom::new(loaded, &records, Database::open(":memory:").unwrap()).unwrap();
    let b = WarRoom::new(builtin, &records, Database::open(":memory:").unwrap()).unwrap();
    for (x, y) in a.valued_players().iter().zip(b.valued_players()) {
        assert!((x.price() - y.price()).abs() < 1e-9, "{}", x.id());
    }
}

#[test]
fn edited_config_is_not_overwritten() {
    let dir = seeded_project();
    config::ensure_config_files(dir.path()).unwrap();

    let squad_path = dir.path().join("config/squad.toml");
    let edited = std::fs::read_to_string(&squad_path)
        .unwrap()
        .replace("total_purse = 120.0", "total_purse = 90.0");
    std::fs::write(&squad_path, edited).unwrap();

    assert!(config::ensure_config_files(dir.path()).unwrap().is_empty());
    let loaded = config::load_config_from(dir.path()).unwrap();
    assert_eq!(loaded.squad.total_purse, 90.0);
}
