//! Tier selection
//!
//! Maps a score onto the difficulty tiers currently in play and picks an
//! unseen still from them, rotating through the pool before repeating.

use crate::models::{FilmImage, Tier};
use crate::random::RandomSource;
use crate::rotation::RotationSet;

/// Tiers eligible for the given score
pub fn eligible_tiers(score: u32) -> &'static [Tier] {
    match score {
        0..=9 => &[Tier::Easy],
        10..=19 => &[Tier::Easy, Tier::Medium],
        20..=29 => &[Tier::Medium],
        30..=39 => &[Tier::Medium, Tier::Hard],
        _ => &[Tier::Hard],
    }
}

/// Choose the next still from `remaining`.
///
/// `remaining` holds the session's unanswered stills. `current_image` is
/// never returned so the same still is not shown twice in a row. The
/// rotation set is updated in place; the caller persists it.
///
/// Returns `None` when no still in the eligible tiers is left, which ends
/// the game.
pub fn select_next<'a>(
    score: u32,
    remaining: &'a [FilmImage],
    rotation: &mut RotationSet,
    current_image: Option<i64>,
    random: &dyn RandomSource,
) -> Option<&'a FilmImage> {
    let tiers = eligible_tiers(score);

    let mut pool: Vec<&FilmImage> = remaining
        .iter()
        .filter(|image| tiers.contains(&image.tier))
        .filter(|image| Some(image.id) != current_image)
        .collect();
    pool.sort_by_key(|image| image.id);

    let unseen: Vec<&FilmImage> = pool
        .iter()
        .copied()
        .filter(|image| !rotation.contains(image.id))
        .collect();

    if !unseen.is_empty() {
        let chosen = unseen[random.pick_index(unseen.len())];
        rotation.insert(chosen.id);
        tracing::debug!("Picked image {} from {} unseen in tiers {:?}", chosen.id, unseen.len(), tiers);
        return Some(chosen);
    }

    // Window exhausted, start over with everything eligible
    rotation.reset();
    if pool.is_empty() {
        tracing::debug!("No eligible images left in tiers {:?}", tiers);
        return None;
    }

    let chosen = pool[random.pick_index(pool.len())];
    rotation.reset_to(chosen.id);
    tracing::debug!("Rotation reset, picked image {} from {} eligible", chosen.id, pool.len());
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrameMode, NewFilmImage};
    use crate::random::{FixedRandom, ThreadRandom};

    fn image(id: i64, tier: Tier) -> FilmImage {
        NewFilmImage::new(format!("Film {}", id), format!("film_images/{}.jpg", id), tier, FrameMode::First)
            .into_image(id)
    }

    fn mixed_pool() -> Vec<FilmImage> {
        vec![
            image(1, Tier::Easy),
            image(2, Tier::Easy),
            image(3, Tier::Medium),
            image(4, Tier::Medium),
            image(5, Tier::Hard),
            image(6, Tier::Hard),
        ]
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(eligible_tiers(0), &[Tier::Easy]);
        assert_eq!(eligible_tiers(9), &[Tier::Easy]);
        assert_eq!(eligible_tiers(10), &[Tier::Easy, Tier::Medium]);
        assert_eq!(eligible_tiers(19), &[Tier::Easy, Tier::Medium]);
        assert_eq!(eligible_tiers(20), &[Tier::Medium]);
        assert_eq!(eligible_tiers(30), &[Tier::Medium, Tier::Hard]);
        assert_eq!(eligible_tiers(39), &[Tier::Medium, Tier::Hard]);
        assert_eq!(eligible_tiers(40), &[Tier::Hard]);
        assert_eq!(eligible_tiers(1_000), &[Tier::Hard]);
    }

    #[test]
    fn test_low_scores_only_get_easy() {
        let pool = mixed_pool();
        for score in 0..10 {
            for _ in 0..20 {
                let mut rotation = RotationSet::new();
                let chosen = select_next(score, &pool, &mut rotation, None, &ThreadRandom).unwrap();
                assert_eq!(chosen.tier, Tier::Easy);
            }
        }
    }

    #[test]
    fn test_high_scores_only_get_hard() {
        let pool = mixed_pool();
        for score in [40, 41, 49, 75] {
            for _ in 0..20 {
                let mut rotation = RotationSet::new();
                let chosen = select_next(score, &pool, &mut rotation, None, &ThreadRandom).unwrap();
                assert_eq!(chosen.tier, Tier::Hard);
            }
        }
    }

    #[test]
    fn test_mixed_band_covers_both_tiers() {
        let pool = mixed_pool();
        let mut rotation = RotationSet::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let chosen = select_next(15, &pool, &mut rotation, None, &ThreadRandom).unwrap();
            assert!(matches!(chosen.tier, Tier::Easy | Tier::Medium));
            seen.push(chosen.id);
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4], "one rotation shows each eligible still once");
    }

    #[test]
    fn test_rotation_reset_allows_repeat_except_current() {
        let pool = vec![image(1, Tier::Easy), image(2, Tier::Easy)];
        let mut rotation: RotationSet = [1, 2].into_iter().collect();

        let chosen = select_next(0, &pool, &mut rotation, Some(2), &ThreadRandom).unwrap();
        assert_eq!(chosen.id, 1);
        assert_eq!(rotation.ids().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_singleton_pool_with_current_excluded_is_none() {
        let pool = vec![image(1, Tier::Easy)];
        let mut rotation: RotationSet = [1].into_iter().collect();
        assert!(select_next(0, &pool, &mut rotation, Some(1), &ThreadRandom).is_none());
        assert!(rotation.is_empty());
    }

    #[test]
    fn test_fixed_source_picks_by_sorted_id() {
        let pool = vec![image(8, Tier::Easy), image(3, Tier::Easy), image(5, Tier::Easy)];
        let mut rotation = RotationSet::new();
        let chosen = select_next(0, &pool, &mut rotation, None, &FixedRandom::new(1)).unwrap();
        assert_eq!(chosen.id, 5);
        assert!(rotation.contains(5));
    }

    #[test]
    fn test_empty_pool_is_none() {
        let mut rotation = RotationSet::new();
        assert!(select_next(0, &[], &mut rotation, None, &ThreadRandom).is_none());

        let hard_only = vec![image(5, Tier::Hard)];
        assert!(select_next(3, &hard_only, &mut rotation, None, &ThreadRandom).is_none());
    }
}
