use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The file type declared in the header chunk.

The type governs how the file's tracks relate to each other:

- Format 0 holds everything in one multi-channel track.
- Format 1 holds tracks that play simultaneously; by convention the
  first carries tempo and other song-wide metadata.
- Format 2 holds independent tracks, each a pattern of its own.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FileType {
    /// Format 0: a single multi-channel track.
    SingleTrack = 0,
    /// Format 1: simultaneous tracks of one song.
    SyncTracks = 1,
    /// Format 2: sequentially independent tracks.
    AsyncTracks = 2,
}
