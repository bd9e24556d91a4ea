//! Shuffle selection
//!
//! Shuffle does not reorder the queue. Each advance picks a uniformly random
//! entry, so the current track can come up again and a shuffled queue never
//! runs off its end.

use rand::Rng;

/// Pick the next entry for shuffled playback
///
/// Returns `None` for an empty queue.
pub fn pick_shuffled_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}
