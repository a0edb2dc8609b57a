//! End to end use of a cinema database on disk: initialize, fill, query, persist, reload.
use anyhow::Result;
use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;

use cinema_cdb::*;

fn temp_root(tdir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tdir.path().join("sphere.cdb")).expect("temp dirs should be utf8")
}

/// The two-image database most of these tests start from.
fn sphere(root: &Utf8PathBuf) -> Result<(CinemaDatabase, RowId, RowId)> {
    let mut db = CinemaDatabase::new(root.clone())?;
    let first = db.add_entry([("phi", "0"), ("theta", "90"), ("image", "out/0_90.png")])?;
    let second = db.add_entry([("phi", "0"), ("theta", "45"), ("image", "out/0_45.png")])?;
    db.set_extract_parameter_names(&["image"])?;
    Ok((db, first, second))
}

#[test]
fn initialize_scenario() -> Result<()> {
    cinema_logging::log_for_tests();
    let tdir = tempfile::TempDir::new()?;
    let root = temp_root(&tdir);

    let db = CinemaDatabase::new(root.clone())?;
    assert!(!db.exists());
    db.initialize()?;
    assert!(root.is_dir());
    assert!(matches!(db.initialize(), Err(Error::AlreadyExists(p)) if p == root));
    Ok(())
}

#[test]
fn extracts_scenario() -> Result<()> {
    cinema_logging::log_for_tests();
    let root = Utf8PathBuf::from("/data/sphere.cdb");
    let (mut db, _, _) = sphere(&root)?;

    assert_eq!(
        db.get_extracts([("phi", "0")])?,
        vec![root.join("out/0_90.png"), root.join("out/0_45.png")]
    );
    assert_eq!(
        db.get_extracts([("phi", "0"), ("theta", "90")])?,
        vec![root.join("out/0_90.png")]
    );
    assert!(db.get_extracts([("phi", "10")])?.is_empty());
    Ok(())
}

#[test]
fn get_extracts_is_idempotent() -> Result<()> {
    let root = Utf8PathBuf::from("root");
    let (mut db, _, _) = sphere(&root)?;

    let first = db.get_extracts([("theta", "45")])?;
    let second = db.get_extracts([("theta", "45")])?;
    assert_eq!(first, second);
    assert_eq!(db.cached_extracts("/*/45"), Some(&first[..]));
    Ok(())
}

#[test]
fn deleted_rows_stop_matching() -> Result<()> {
    let root = Utf8PathBuf::from("root");
    let (mut db, first, second) = sphere(&root)?;

    db.delete_entry(first)?;
    assert!(db.get_extracts([("phi", "0"), ("theta", "90")])?.is_empty());
    assert_eq!(
        db.get_extracts([("phi", "0")])?,
        vec![root.join("out/0_45.png")]
    );

    // The survivor keeps its id.
    let rows = db.rows()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, second);
    db.delete_entry(second)?;
    assert_eq!(db.row_count()?, 0);
    Ok(())
}

#[test]
fn persist_then_load_round_trips() -> Result<()> {
    cinema_logging::log_for_tests();
    let tdir = tempfile::TempDir::new()?;
    let root = temp_root(&tdir);
    let (mut db, _, _) = sphere(&root)?;
    db.initialize()?;
    db.add_entry([("phi", "10"), ("note", "has, a comma and \"quotes\"")])?;

    let before = db.rows()?;
    db.persist()?;
    assert!(db.exists());
    db.load()?;

    assert_eq!(db.rows()?, before);
    assert_eq!(
        db.iter_column_names().collect::<Vec<_>>(),
        vec!["phi", "theta", "image", "note"]
    );
    // Roles aren't stored.
    assert_eq!(
        db.iter_parameter_names().collect::<Vec<_>>(),
        vec!["phi", "theta", "image", "note"]
    );
    assert!(!db.extract_exists("image"));

    let text = std::fs::read_to_string(db.get_data_path())?;
    assert_eq!(
        text,
        "phi,theta,image,note\n\
         0,90,out/0_90.png,\n\
         0,45,out/0_45.png,\n\
         10,,,\"has, a comma and \"\"quotes\"\"\"\n"
    );
    Ok(())
}

#[test]
fn reopen_existing_database() -> Result<()> {
    let tdir = tempfile::TempDir::new()?;
    let root = temp_root(&tdir);
    {
        let (db, _, _) = sphere(&root)?;
        db.initialize()?;
        db.persist()?;
    }

    let mut db = CinemaConfigBuilder::default()
        .root(root.clone())
        .build()
        .map_err(Error::from)
        .and_then(CinemaDatabase::with_config)?;
    assert!(db.exists());
    db.load()?;
    db.set_extract_parameter_names(&["image"])?;
    assert!(db.parameter_exists("phi"));
    assert!(!db.parameter_exists("image"));
    assert_eq!(db.extract_path([("phi", "0"), ("theta", "45")]), "/0/45");
    assert_eq!(
        db.get_extracts([("theta", "45")])?,
        vec![root.join("out/0_45.png")]
    );

    // New rows land after the loaded ones, and the file only changes on persist.
    db.add_entry([("phi", "90"), ("theta", "0"), ("image", "out/90_0.png")])?;
    let on_disk = std::fs::read_to_string(db.get_data_path())?;
    assert_eq!(on_disk.lines().count(), 3);
    db.persist()?;
    let on_disk = std::fs::read_to_string(db.get_data_path())?;
    assert_eq!(on_disk.lines().count(), 4);
    Ok(())
}

#[test]
fn factory_builds_a_working_database() -> Result<()> {
    let args = [("path".to_string(), "root".to_string())]
        .into_iter()
        .collect();
    let mut db = cinema_cdb::new(CDB_KIND, &args)?.expect("A path was given");
    db.add_entry([("t", "0"), ("image", "a.png")])?;
    db.set_extract_parameter_names(&["image"])?;
    assert_eq!(
        db.get_extracts([("t", "0")])?,
        vec![Utf8PathBuf::from("root/a.png")]
    );
    Ok(())
}
