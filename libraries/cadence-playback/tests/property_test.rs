//! Property-based tests for the playlist state machine
//!
//! Uses proptest to check navigation, shuffle and clear invariants across
//! many playlist sizes and operation sequences.

mod common;

use cadence_core::{LocalTrack, RemoteCandidate};
use cadence_playback::{Playlist, PlaybackStatus};
use common::harness;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

// ===== Helpers =====

fn track_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}\\.mp3", 1..30)
}

fn multiset(tracks: &[LocalTrack]) -> HashMap<LocalTrack, usize> {
    let mut counts = HashMap::new();
    for track in tracks {
        *counts.entry(track.clone()).or_insert(0) += 1;
    }
    counts
}

// ===== Property Tests =====

proptest! {
    /// Property: next then previous returns to the starting index
    #[test]
    fn next_then_previous_round_trips(names in track_names(), start in 0usize..30) {
        let mut h = harness();
        h.manager.add_local(names.iter().map(String::as_str)).unwrap();
        let start = start % names.len();
        h.manager.play_at(start).unwrap();

        h.manager.next().unwrap();
        h.manager.previous().unwrap();
        prop_assert_eq!(h.manager.current_index(), Some(start));

        h.manager.previous().unwrap();
        h.manager.next().unwrap();
        prop_assert_eq!(h.manager.current_index(), Some(start));
    }

    /// Property: the cursor always stays in bounds under random navigation
    #[test]
    fn cursor_stays_in_bounds(
        names in track_names(),
        ops in prop::collection::vec(0u8..4, 1..40)
    ) {
        let mut h = harness();
        h.manager.add_local(names.iter().map(String::as_str)).unwrap();

        for op in ops {
            match op {
                0 => h.manager.next().unwrap(),
                1 => h.manager.previous().unwrap(),
                2 => h.manager.shuffle().unwrap(),
                _ => h.manager.add_local(["extra.mp3"]).unwrap(),
            }
            let len = h.manager.playlist().len();
            let current = h.manager.current_index();
            prop_assert!(matches!(current, Some(i) if i < len));
        }
    }

    /// Property: shuffle keeps exactly the same tracks and selects index 0
    #[test]
    fn shuffle_preserves_tracks_and_resets_cursor(names in track_names(), seed in any::<u64>()) {
        let mut h = harness();
        h.manager.add_local(names.iter().map(String::as_str)).unwrap();
        let before = multiset(h.manager.playlist().tracks());

        h.manager.shuffle_with(&mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(h.manager.current_index(), Some(0));
        prop_assert_eq!(multiset(h.manager.playlist().tracks()), before);
        prop_assert_eq!(h.manager.status(), PlaybackStatus::Playing);
    }

    /// Property: clear is idempotent regardless of prior state
    #[test]
    fn clear_is_idempotent(names in track_names(), queued in 0usize..5) {
        let mut h = harness();
        h.manager.add_local(names.iter().map(String::as_str)).unwrap();
        for i in 0..queued {
            h.manager.enqueue_remote(RemoteCandidate::new("Queued", format!("q{i}")));
        }

        h.manager.clear();
        h.manager.clear();

        prop_assert!(h.manager.playlist().is_empty());
        prop_assert!(h.manager.queue().is_empty());
        prop_assert_eq!(h.manager.current_index(), None);
        prop_assert_eq!(h.manager.status(), PlaybackStatus::Stopped);
    }
}

// ===== Statistical =====

#[test]
fn repeated_shuffles_reach_every_permutation() {
    let mut playlist = Playlist::new();
    playlist.extend(["a", "b", "c"].into_iter().map(LocalTrack::new));
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut seen = HashSet::new();

    for _ in 0..1000 {
        playlist.shuffle(&mut rng);
        seen.insert(playlist.tracks().to_vec());
    }

    assert_eq!(seen.len(), 6, "shuffle must be able to produce every order");
}

#[test]
fn shuffle_positions_are_roughly_uniform() {
    let tracks: Vec<LocalTrack> = (0..4).map(|i| LocalTrack::new(format!("{i}.mp3"))).collect();
    let mut rng = StdRng::seed_from_u64(99);
    let mut first_counts: HashMap<LocalTrack, usize> = HashMap::new();
    let trials = 8000;

    for _ in 0..trials {
        let mut playlist = Playlist::new();
        playlist.extend(tracks.clone());
        playlist.shuffle(&mut rng);
        *first_counts
            .entry(playlist.get(0).cloned().unwrap())
            .or_insert(0) += 1;
    }

    // Expected 2000 each; allow a wide margin
    for track in &tracks {
        let count = first_counts.get(track).copied().unwrap_or(0);
        assert!((1600..2400).contains(&count), "{track} led {count} times");
    }
}
