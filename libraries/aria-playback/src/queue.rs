//! Play queue
//!
//! An ordered list of tracks plus a cursor on the active entry.
//!
//! ```text
//! tracks:  [ A ][ B ][ C ][ D ]
//! cursor:         ^ Some(1)
//! ```
//!
//! Invariant: a `Some(i)` cursor is always a valid offset into `tracks`.

use crate::types::Track;

/// Ordered queue with a cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    /// Tracks eligible for playback
    tracks: Vec<Track>,

    /// Active entry, if any
    cursor: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue and put the cursor on `start`
    ///
    /// An out-of-range `start` is clamped to the last entry. Returns the
    /// effective cursor, or `None` (leaving the queue untouched) when
    /// `tracks` is empty.
    pub fn replace(&mut self, tracks: Vec<Track>, start: usize) -> Option<usize> {
        if tracks.is_empty() {
            return None;
        }

        let start = start.min(tracks.len() - 1);
        self.tracks = tracks;
        self.cursor = Some(start);
        self.cursor
    }

    /// Replace the queue with a single track
    pub fn replace_single(&mut self, track: Track) {
        self.tracks = vec![track];
        self.cursor = Some(0);
    }

    /// Append a track without moving the cursor
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove a non-active entry
    ///
    /// The cursor keeps pointing at the same track. Removing the active
    /// entry or an out-of-range index does nothing and returns `None`.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() || self.cursor == Some(index) {
            return None;
        }

        let track = self.tracks.remove(index);
        if let Some(cursor) = self.cursor {
            if index < cursor {
                self.cursor = Some(cursor - 1);
            }
        }
        Some(track)
    }

    /// Move the cursor to `index` if it is valid
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    /// Active entry index
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Active track
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackProvenance;

    fn create_test_track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist_id: "artist".to_string(),
            artist_name: "Test Artist".to_string(),
            album_id: None,
            album_name: None,
            cover_url: String::new(),
            audio_url: format!("https://cdn.example.com/{}.mp3", id),
            provenance: TrackProvenance::Upload,
            duration: 180,
            play_count: 0,
            genre: "test".to_string(),
        }
    }

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| create_test_track(id)).collect()
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn replace_sets_cursor() {
        let mut queue = Queue::new();
        assert_eq!(queue.replace(tracks(&["1", "2", "3"]), 1), Some(1));
        assert_eq!(queue.current().unwrap().id, "2");
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn replace_clamps_out_of_range_start() {
        let mut queue = Queue::new();
        assert_eq!(queue.replace(tracks(&["1", "2", "3"]), 99), Some(2));
        assert_eq!(queue.current().unwrap().id, "3");
    }

    #[test]
    fn replace_with_empty_list_keeps_previous_queue() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["1", "2"]), 0);

        assert_eq!(queue.replace(Vec::new(), 0), None);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.cursor(), Some(0));
    }

    #[test]
    fn replace_single_builds_one_entry_queue() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["1", "2"]), 1);
        queue.replace_single(create_test_track("9"));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.cursor(), Some(0));
        assert_eq!(queue.current().unwrap().id, "9");
    }

    #[test]
    fn remove_before_cursor_shifts_cursor() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["1", "2", "3"]), 2);

        let removed = queue.remove(0).unwrap();
        assert_eq!(removed.id, "1");
        assert_eq!(queue.cursor(), Some(1));
        assert_eq!(queue.current().unwrap().id, "3");
    }

    #[test]
    fn remove_after_cursor_keeps_cursor() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["1", "2", "3"]), 0);

        queue.remove(2).unwrap();
        assert_eq!(queue.cursor(), Some(0));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn remove_active_or_missing_entry_is_refused() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["1", "2"]), 1);

        assert!(queue.remove(1).is_none());
        assert!(queue.remove(7).is_none());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn push_does_not_move_cursor() {
        let mut queue = Queue::new();
        queue.push(create_test_track("1"));
        assert_eq!(queue.cursor(), None);

        queue.set_cursor(0);
        queue.push(create_test_track("2"));
        assert_eq!(queue.cursor(), Some(0));
    }

    #[test]
    fn set_cursor_rejects_invalid_index() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["1", "2"]), 0);
        assert!(!queue.set_cursor(2));
        assert_eq!(queue.cursor(), Some(0));
        assert!(queue.set_cursor(1));
        assert_eq!(queue.cursor(), Some(1));
    }
}
