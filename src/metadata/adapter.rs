use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind, Result};
use crate::metadata::RawMetadata;
use crate::schema::{TagId, NUMERIC_TAG_COUNT, STRING_TAG_COUNT};

/// A partially-populated entry as it leaves a worker: string tags as raw
/// byte strings (empty means absent), numeric tags already final.
#[derive(Debug, Clone, Default)]
pub struct TrackRecord {
    pub strings: [Vec<u8>; STRING_TAG_COUNT],
    pub numerics: [u32; NUMERIC_TAG_COUNT],
    pub flags: u32,
}

/// Maps a host-local path to the device-visible one: strip the host
/// prefix, prepend the device prefix, forward slashes only.
#[derive(Debug, Clone)]
pub struct PathRewrite {
    pub host_prefix: PathBuf,
    pub device_prefix: String,
}

impl PathRewrite {
    pub fn new(host_prefix: impl Into<PathBuf>, device_prefix: impl Into<String>) -> Self {
        PathRewrite {
            host_prefix: host_prefix.into(),
            device_prefix: device_prefix.into(),
        }
    }

    pub fn rewrite(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.host_prefix).unwrap_or(path);
        let rel = rel.to_string_lossy().replace('\\', "/");
        let prefix = self.device_prefix.trim_end_matches('/');
        format!("{}/{}", prefix, rel.trim_start_matches('/'))
    }
}

/// Genre canonicalisation map: exact, case-sensitive key match; unmapped
/// genres pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreMap {
    map: HashMap<String, String>,
}

impl GenreMap {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        GenreMap {
            map: pairs.into_iter().collect(),
        }
    }

    /// Loads a flat JSON object, e.g. `{"Alt-Rock": "Rock"}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let map: HashMap<String, String> = serde_json::from_reader(file)
            .map_err(|e| Error::new(ErrorKind::Metadata, format!("{}: {}", path.display(), e)))?;
        Ok(GenreMap { map })
    }

    pub fn apply<'a>(&'a self, genre: &'a str) -> &'a str {
        self.map.get(genre).map(String::as_str).unwrap_or(genre)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Takes the leading decimal digits, so "3/12" reads as 3 and a stray
/// "2020-05-01" date reads as 2020.
fn leading_digits(s: &str) -> u32 {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn tag<'a>(raw: &'a RawMetadata, keys: &[&str]) -> &'a str {
    for key in keys {
        if let Some(v) = raw.tags.get(*key) {
            if !v.is_empty() {
                return v;
            }
        }
    }
    ""
}

/// Normalises one file's raw tag readings into the internal record
/// shape. `mtime` is the walker's stat of the file in Unix seconds.
pub fn adapt(
    host_path: &Path,
    mtime: u32,
    raw: &RawMetadata,
    rewrite: &PathRewrite,
    genre_map: Option<&GenreMap>,
) -> TrackRecord {
    let mut rec = TrackRecord::default();

    let genre = tag(raw, &["genre"]);
    let genre = match genre_map {
        Some(map) => map.apply(genre),
        None => genre,
    };

    rec.strings[TagId::Artist.index()] = tag(raw, &["artist"]).as_bytes().to_vec();
    rec.strings[TagId::Album.index()] = tag(raw, &["album"]).as_bytes().to_vec();
    rec.strings[TagId::Genre.index()] = genre.as_bytes().to_vec();
    rec.strings[TagId::Title.index()] = tag(raw, &["title"]).as_bytes().to_vec();
    rec.strings[TagId::Filename.index()] = rewrite.rewrite(host_path).into_bytes();
    rec.strings[TagId::Composer.index()] = tag(raw, &["composer"]).as_bytes().to_vec();
    rec.strings[TagId::Comment.index()] = tag(raw, &["comment"]).as_bytes().to_vec();
    rec.strings[TagId::AlbumArtist.index()] = tag(raw, &["albumartist"]).as_bytes().to_vec();
    rec.strings[TagId::Grouping.index()] = tag(raw, &["grouping"]).as_bytes().to_vec();

    let year = {
        let y = leading_digits(tag(raw, &["year"]));
        if y != 0 {
            y
        } else {
            leading_digits(tag(raw, &["date"]))
        }
    };

    let set = |rec: &mut TrackRecord, id: TagId, v: u32| {
        rec.numerics[id.numeric_pos().unwrap_or(0)] = v;
    };
    set(&mut rec, TagId::Year, year);
    set(&mut rec, TagId::DiscNumber, leading_digits(tag(raw, &["discnumber", "disc"])));
    set(&mut rec, TagId::TrackNumber, leading_digits(tag(raw, &["tracknumber", "track"])));
    set(&mut rec, TagId::Bitrate, raw.bitrate);
    set(&mut rec, TagId::Length, raw.length);
    set(&mut rec, TagId::Mtime, mtime);
    // playcount, rating, playtime, lastplayed and commitid start at zero;
    // statistics migration fills them from an old database.

    rec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawMetadata {
        RawMetadata {
            tags: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            bitrate: 192,
            length: 215_000,
        }
    }

    #[test]
    fn rewrites_host_path_to_device_path() {
        let rw = PathRewrite::new("root", "/Music/");
        let s = rw.rewrite(Path::new("root/Band/Album/01 Song.mp3"));
        assert_eq!(s, "/Music/Band/Album/01 Song.mp3");
    }

    #[test]
    fn rewrite_normalises_backslashes() {
        let rw = PathRewrite::new("C:\\tunes", "/Music");
        let s = rw.rewrite(Path::new("C:\\tunes\\Band\\song.mp3"));
        // strip_prefix cannot split a single backslashed component, so the
        // whole string falls through and only the separators are fixed.
        assert!(s.ends_with("Band/song.mp3"));
        assert!(!s.contains('\\'));
    }

    #[test]
    fn genre_map_is_exact_and_case_sensitive() {
        let map = GenreMap::from_pairs([("Alt-Rock".to_string(), "Rock".to_string())]);
        assert_eq!(map.apply("Alt-Rock"), "Rock");
        assert_eq!(map.apply("alt-rock"), "alt-rock");
        assert_eq!(map.apply("Jazz"), "Jazz");
    }

    #[test]
    fn numeric_tags_take_leading_digits() {
        let rw = PathRewrite::new("root", "/Music");
        let rec = adapt(
            Path::new("root/a.mp3"),
            1_600_000_000,
            &raw(&[("tracknumber", "3/12"), ("date", "2020-05-01")]),
            &rw,
            None,
        );
        assert_eq!(rec.numerics[TagId::TrackNumber.numeric_pos().unwrap()], 3);
        assert_eq!(rec.numerics[TagId::Year.numeric_pos().unwrap()], 2020);
        assert_eq!(rec.numerics[TagId::Bitrate.numeric_pos().unwrap()], 192);
        assert_eq!(rec.numerics[TagId::Length.numeric_pos().unwrap()], 215_000);
        assert_eq!(rec.numerics[TagId::Mtime.numeric_pos().unwrap()], 1_600_000_000);
    }

    #[test]
    fn absent_tags_are_empty_strings() {
        let rw = PathRewrite::new("root", "/Music");
        let rec = adapt(Path::new("root/a.mp3"), 0, &raw(&[("title", "Song")]), &rw, None);
        assert_eq!(rec.strings[TagId::Title.index()], b"Song");
        assert!(rec.strings[TagId::Artist.index()].is_empty());
        assert!(rec.strings[TagId::Comment.index()].is_empty());
    }
}
