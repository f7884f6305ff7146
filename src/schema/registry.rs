use serde::{Deserialize, Serialize};

/// File signature shared by the master index and every tag file.
pub const MAGIC: [u8; 4] = *b"TCDB";
/// The only schema this crate reads or writes.
pub const SCHEMA_VERSION: u32 = 4;
/// magic + version + entry_count + data_size + serial.
pub const HEADER_SIZE: usize = 20;
/// Tag strings are NUL-padded to a multiple of this.
pub const ALIGN: usize = 4;
/// TagRef sentinel meaning "no value". 0 is never valid (it would point
/// inside the header), so absent tags always carry this.
pub const NO_REF: u32 = 0xFFFF_FFFF;

pub const STRING_TAG_COUNT: usize = 9;
pub const NUMERIC_TAG_COUNT: usize = 11;
pub const TAG_COUNT: usize = STRING_TAG_COUNT + NUMERIC_TAG_COUNT;
/// One u32 per tag plus the flags word.
pub const ENTRY_SIZE: usize = (TAG_COUNT + 1) * 4;

// Flag definitions from tagcache.c
pub const FLAG_DELETED: u32 = 0x0001;
pub const FLAG_DIRCACHE: u32 = 0x0002;
pub const FLAG_DIRTYNUM: u32 = 0x0004;
pub const FLAG_TRKNUMGEN: u32 = 0x0008;
pub const FLAG_RESURRECTED: u32 = 0x0010;

/// Every column the database knows about, in canonical field order.
/// The discriminant is the stable on-disk tag id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum TagId {
    Artist = 0,
    Album = 1,
    Genre = 2,
    Title = 3,
    Filename = 4,
    Composer = 5,
    Comment = 6,
    AlbumArtist = 7,
    Grouping = 8,
    Year = 9,
    DiscNumber = 10,
    TrackNumber = 11,
    Bitrate = 12,
    Length = 13,
    PlayCount = 14,
    Rating = 15,
    PlayTime = 16,
    LastPlayed = 17,
    CommitId = 18,
    Mtime = 19,
}

impl TagId {
    pub const ALL: [TagId; TAG_COUNT] = [
        TagId::Artist,
        TagId::Album,
        TagId::Genre,
        TagId::Title,
        TagId::Filename,
        TagId::Composer,
        TagId::Comment,
        TagId::AlbumArtist,
        TagId::Grouping,
        TagId::Year,
        TagId::DiscNumber,
        TagId::TrackNumber,
        TagId::Bitrate,
        TagId::Length,
        TagId::PlayCount,
        TagId::Rating,
        TagId::PlayTime,
        TagId::LastPlayed,
        TagId::CommitId,
        TagId::Mtime,
    ];

    /// The string-valued tags, each backed by its own tag file.
    pub const STRING: [TagId; STRING_TAG_COUNT] = [
        TagId::Artist,
        TagId::Album,
        TagId::Genre,
        TagId::Title,
        TagId::Filename,
        TagId::Composer,
        TagId::Comment,
        TagId::AlbumArtist,
        TagId::Grouping,
    ];

    /// The numeric tags embedded in master-index entries.
    pub const NUMERIC: [TagId; NUMERIC_TAG_COUNT] = [
        TagId::Year,
        TagId::DiscNumber,
        TagId::TrackNumber,
        TagId::Bitrate,
        TagId::Length,
        TagId::PlayCount,
        TagId::Rating,
        TagId::PlayTime,
        TagId::LastPlayed,
        TagId::CommitId,
        TagId::Mtime,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<TagId> {
        TagId::ALL.get(index).copied()
    }

    pub fn is_string(self) -> bool {
        self.index() < STRING_TAG_COUNT
    }

    /// Slot of a string tag within an entry's string array.
    pub fn string_pos(self) -> Option<usize> {
        if self.is_string() {
            Some(self.index())
        } else {
            None
        }
    }

    /// Slot of a numeric tag within an entry's numeric array.
    pub fn numeric_pos(self) -> Option<usize> {
        if self.is_string() {
            None
        } else {
            Some(self.index() - STRING_TAG_COUNT)
        }
    }

    /// Width in bytes of a numeric tag as stored on disk.
    pub fn numeric_width(self) -> Option<usize> {
        if self.is_string() {
            None
        } else {
            Some(4)
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TagId::Artist => "artist",
            TagId::Album => "album",
            TagId::Genre => "genre",
            TagId::Title => "title",
            TagId::Filename => "filename",
            TagId::Composer => "composer",
            TagId::Comment => "comment",
            TagId::AlbumArtist => "albumartist",
            TagId::Grouping => "grouping",
            TagId::Year => "year",
            TagId::DiscNumber => "discnumber",
            TagId::TrackNumber => "tracknumber",
            TagId::Bitrate => "bitrate",
            TagId::Length => "length",
            TagId::PlayCount => "playcount",
            TagId::Rating => "rating",
            TagId::PlayTime => "playtime",
            TagId::LastPlayed => "lastplayed",
            TagId::CommitId => "commitid",
            TagId::Mtime => "mtime",
        }
    }
}
