//! Statistics migration between an old parsed database and a fresh build.

use tagcache::schema::TagId;
use tagcache::{migrate_stats, parse_database, write_database, Database, Entry};
use tempfile::TempDir;

fn entry_with_filename(db: &mut Database, name: &str) -> usize {
    let mut e = Entry::new();
    e.strings[TagId::Filename.index()] = db.intern(TagId::Filename, name.as_bytes());
    db.push_entry(e)
}

#[test]
fn stats_survive_a_rebuild_through_disk() {
    // Old database with runtime counters, persisted and parsed back the
    // way a real migration sees it.
    let mut old = Database::new();
    let i = entry_with_filename(&mut old, "/Music/A.mp3");
    old.set_numeric(i, TagId::PlayCount, 12);
    old.set_numeric(i, TagId::Rating, 8);
    old.set_numeric(i, TagId::PlayTime, 3_600);
    old.set_numeric(i, TagId::LastPlayed, 1_700_000_000);
    old.set_numeric(i, TagId::CommitId, 3);
    entry_with_filename(&mut old, "/Music/Gone.mp3");

    let dir = TempDir::new().unwrap();
    write_database(&old, dir.path()).unwrap();
    let old = parse_database(dir.path()).unwrap();

    // The fresh build found A again plus a brand-new track.
    let mut new = Database::new();
    entry_with_filename(&mut new, "/Music/A.mp3");
    entry_with_filename(&mut new, "/Music/New.mp3");

    let report = migrate_stats(&old, &mut new);

    assert_eq!(report.matched, 1);
    assert_eq!(report.missed, 1);
    assert_eq!(new.numeric(0, TagId::PlayCount), Some(12));
    assert_eq!(new.numeric(0, TagId::Rating), Some(8));
    assert_eq!(new.numeric(0, TagId::PlayTime), Some(3_600));
    assert_eq!(new.numeric(0, TagId::LastPlayed), Some(1_700_000_000));
    assert_eq!(new.numeric(0, TagId::CommitId), Some(3));
    // Unmatched entries keep default zeros.
    assert_eq!(new.numeric(1, TagId::PlayCount), Some(0));
    assert_eq!(new.numeric(1, TagId::LastPlayed), Some(0));
    // Non-stat fields are untouched by migration.
    assert_eq!(new.numeric(0, TagId::Year), Some(0));
}

#[test]
fn migrated_database_serialises_cleanly() {
    let mut old = Database::new();
    let i = entry_with_filename(&mut old, "/Music/A.mp3");
    old.set_numeric(i, TagId::PlayCount, 2);

    let mut new = Database::new();
    entry_with_filename(&mut new, "/Music/A.mp3");
    migrate_stats(&old, &mut new);

    let dir = TempDir::new().unwrap();
    write_database(&new, dir.path()).unwrap();
    let parsed = parse_database(dir.path()).unwrap();
    assert_eq!(parsed.numeric(0, TagId::PlayCount), Some(2));
}
