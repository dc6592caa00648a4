//! Playlist randomization

use cadence_core::LocalTrack;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform Fisher-Yates shuffle
///
/// Every permutation is equally likely; the multiset of tracks is preserved.
pub fn shuffle_tracks<R: Rng + ?Sized>(tracks: &mut [LocalTrack], rng: &mut R) {
    tracks.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn tracks(count: usize) -> Vec<LocalTrack> {
        (0..count)
            .map(|i| LocalTrack::new(format!("/music/{i}.mp3")))
            .collect()
    }

    #[test]
    fn preserves_all_tracks() {
        let original = tracks(20);
        let mut shuffled = original.clone();
        shuffle_tracks(&mut shuffled, &mut StdRng::seed_from_u64(42));

        let before: HashSet<_> = original.iter().collect();
        let after: HashSet<_> = shuffled.iter().collect();
        assert_eq!(before, after);
        assert_eq!(shuffled.len(), 20);
    }

    #[test]
    fn every_permutation_of_three_appears() {
        let original = tracks(3);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();

        for _ in 0..600 {
            let mut shuffled = original.clone();
            shuffle_tracks(&mut shuffled, &mut rng);
            seen.insert(shuffled);
        }

        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn empty_and_single_are_fine() {
        let mut empty: Vec<LocalTrack> = Vec::new();
        shuffle_tracks(&mut empty, &mut StdRng::seed_from_u64(0));
        assert!(empty.is_empty());

        let mut one = tracks(1);
        shuffle_tracks(&mut one, &mut StdRng::seed_from_u64(0));
        assert_eq!(one, tracks(1));
    }
}
