//! Round-trip and corruption tests for the on-disk codec.

use std::fs;

use tagcache::binary::ByteOrder;
use tagcache::codec::{master, tag_file};
use tagcache::schema::{self, TagId};
use tagcache::{parse_database, write_database, Database, Entry, ErrorKind};
use tempfile::TempDir;

/// Three tracks: two share an artist, one has no genre, and the comment
/// carries the kind of replay-gain noise real files ship.
fn sample_db() -> Database {
    let mut db = Database::new();
    db.serial = 11;

    let tracks: [(&str, &str, &str, &str, u32); 3] = [
        ("Band", "First", "Opener", "/Music/Band/First/01 Opener.mp3", 2019),
        ("Band", "First", "Closer", "/Music/Band/First/02 Closer.mp3", 2019),
        ("Other", "Solo", "Untitled", "/Music/Other/Solo/01 Untitled.mp3", 2021),
    ];
    for (i, (artist, album, title, path, year)) in tracks.iter().enumerate() {
        let mut e = Entry::new();
        e.strings[TagId::Artist.index()] = db.intern(TagId::Artist, artist.as_bytes());
        e.strings[TagId::Album.index()] = db.intern(TagId::Album, album.as_bytes());
        e.strings[TagId::Title.index()] = db.intern(TagId::Title, title.as_bytes());
        e.strings[TagId::Filename.index()] = db.intern(TagId::Filename, path.as_bytes());
        if i == 0 {
            e.strings[TagId::Genre.index()] = db.intern(TagId::Genre, b"Rock");
            e.strings[TagId::Comment.index()] =
                db.intern(TagId::Comment, b" 0000167A 0000167A 00003832");
        }
        e.set_numeric(TagId::Year, *year);
        e.set_numeric(TagId::TrackNumber, i as u32 + 1);
        e.set_numeric(TagId::Length, 180_000);
        db.push_entry(e);
    }
    db
}

#[test]
fn write_then_parse_is_identity() {
    let dir = TempDir::new().unwrap();
    let db = sample_db();
    write_database(&db, dir.path()).unwrap();
    let parsed = parse_database(dir.path()).unwrap();
    assert_eq!(parsed, db);
}

#[test]
fn shared_strings_share_one_tag_string_and_one_ref() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let artist_bytes = fs::read(dir.path().join("database_0.tcd")).unwrap();
    let records = tag_file::decode(&artist_bytes, ByteOrder::Little).unwrap();
    assert_eq!(records.len(), 2); // "Band" interned once, plus "Other"

    let master_bytes = fs::read(dir.path().join("database_idx.tcd")).unwrap();
    let (_, raws) = master::decode(&master_bytes, ByteOrder::Little).unwrap();
    let artist_pos = TagId::Artist.index();
    assert_eq!(raws[0].refs[artist_pos], raws[1].refs[artist_pos]);
    assert_ne!(raws[0].refs[artist_pos], raws[2].refs[artist_pos]);
}

#[test]
fn back_reference_points_at_the_first_referring_entry() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let artist_bytes = fs::read(dir.path().join("database_0.tcd")).unwrap();
    let records = tag_file::decode(&artist_bytes, ByteOrder::Little).unwrap();
    // "Band" is first referenced by entry 0, "Other" by entry 2.
    assert_eq!(records[0].back_ref as usize, schema::HEADER_SIZE);
    assert_eq!(
        records[1].back_ref as usize,
        schema::HEADER_SIZE + 2 * schema::ENTRY_SIZE
    );
}

#[test]
fn absent_tags_are_the_sentinel_and_never_a_tag_string() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let master_bytes = fs::read(dir.path().join("database_idx.tcd")).unwrap();
    let (_, raws) = master::decode(&master_bytes, ByteOrder::Little).unwrap();
    let genre_pos = TagId::Genre.index();
    assert_ne!(raws[0].refs[genre_pos], schema::NO_REF);
    assert_eq!(raws[1].refs[genre_pos], schema::NO_REF);

    let genre_bytes = fs::read(dir.path().join("database_2.tcd")).unwrap();
    let records = tag_file::decode(&genre_bytes, ByteOrder::Little).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| !r.bytes.is_empty()));
}

#[test]
fn recorded_sizes_match_bytes_written() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    for tag in TagId::STRING {
        let path = dir.path().join(format!("database_{}.tcd", tag.index()));
        let bytes = fs::read(&path).unwrap();
        let records = tag_file::decode(&bytes, ByteOrder::Little).unwrap();
        let body: usize = records
            .iter()
            .map(|r| {
                let padded = (r.bytes.len() + 1).div_ceil(schema::ALIGN) * schema::ALIGN;
                8 + padded
            })
            .sum();
        assert_eq!(schema::HEADER_SIZE + body, bytes.len(), "{}", path.display());
        assert!(records.iter().all(|r| {
            let padded = (r.bytes.len() + 1).div_ceil(schema::ALIGN) * schema::ALIGN;
            padded % 4 == 0 && padded > 0
        }));
    }
}

#[test]
fn empty_database_round_trips_with_valid_headers() {
    let dir = TempDir::new().unwrap();
    let db = Database::new();
    write_database(&db, dir.path()).unwrap();

    for tag in TagId::STRING {
        let bytes = fs::read(dir.path().join(format!("database_{}.tcd", tag.index()))).unwrap();
        assert_eq!(bytes.len(), schema::HEADER_SIZE);
        assert!(tag_file::decode(&bytes, ByteOrder::Little).unwrap().is_empty());
    }

    let parsed = parse_database(dir.path()).unwrap();
    assert!(parsed.is_empty());
}

#[test]
fn schema_version_three_fails_to_parse() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let master = dir.path().join("database_idx.tcd");
    let mut bytes = fs::read(&master).unwrap();
    bytes[4..8].copy_from_slice(&3u32.to_le_bytes());
    fs::write(&master, bytes).unwrap();

    let err = parse_database(dir.path()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedVersion);
}

#[test]
fn wrong_magic_fails_to_parse() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let artist = dir.path().join("database_0.tcd");
    let mut bytes = fs::read(&artist).unwrap();
    bytes[..4].copy_from_slice(b"NOPE");
    fs::write(&artist, bytes).unwrap();

    let err = parse_database(dir.path()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadMagic);
}

#[test]
fn ref_past_end_of_tag_file_is_broken() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let master = dir.path().join("database_idx.tcd");
    let mut bytes = fs::read(&master).unwrap();
    // First entry's title ref points far past the title tag file.
    let at = schema::HEADER_SIZE + TagId::Title.index() * 4;
    bytes[at..at + 4].copy_from_slice(&0x00ff_ffffu32.to_le_bytes());
    fs::write(&master, bytes).unwrap();

    let err = parse_database(dir.path()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::BrokenRef);
}

#[test]
fn truncated_tag_file_fails() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();

    let title = dir.path().join("database_3.tcd");
    let bytes = fs::read(&title).unwrap();
    fs::write(&title, &bytes[..bytes.len() - 2]).unwrap();

    let err = parse_database(dir.path()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Truncated);
}

#[test]
fn missing_tag_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    write_database(&sample_db(), dir.path()).unwrap();
    fs::remove_file(dir.path().join("database_7.tcd")).unwrap();

    let err = parse_database(dir.path()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);
}

#[test]
fn one_byte_title_pads_to_four() {
    let dir = TempDir::new().unwrap();
    let mut db = Database::new();
    let mut e = Entry::new();
    e.strings[TagId::Title.index()] = db.intern(TagId::Title, b"x");
    db.push_entry(e);
    write_database(&db, dir.path()).unwrap();

    let bytes = fs::read(dir.path().join("database_3.tcd")).unwrap();
    assert_eq!(
        &bytes[schema::HEADER_SIZE..schema::HEADER_SIZE + 4],
        &4u32.to_le_bytes()
    );
    assert_eq!(&bytes[schema::HEADER_SIZE + 8..], b"x\0\0\0");
}

#[test]
fn comment_bytes_round_trip_uninterpreted() {
    let dir = TempDir::new().unwrap();
    let db = sample_db();
    write_database(&db, dir.path()).unwrap();
    let parsed = parse_database(dir.path()).unwrap();
    assert_eq!(
        parsed.tag_str(0, TagId::Comment),
        Some(&b" 0000167A 0000167A 00003832"[..])
    );
}

#[test]
fn rewrite_and_prune_then_reserialise() {
    let dir = TempDir::new().unwrap();
    let mut db = sample_db();
    db.rewrite_tag(TagId::Artist, b"Other", b"Band");
    db.prune_all();
    write_database(&db, dir.path()).unwrap();

    let artist_bytes = fs::read(dir.path().join("database_0.tcd")).unwrap();
    let records = tag_file::decode(&artist_bytes, ByteOrder::Little).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].bytes, b"Band");

    let parsed = parse_database(dir.path()).unwrap();
    for i in 0..parsed.len() {
        assert_eq!(parsed.tag_str(i, TagId::Artist), Some(&b"Band"[..]));
    }
}
