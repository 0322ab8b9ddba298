use std::collections::HashSet;

use crate::core::distance::compute_distance_km;
use crate::models::{Geolocated, Location, RankedEntity};

/// Keep the items within `radius_km` of `center`, in their original order
///
/// The input slice is left untouched; matching items are cloned into the
/// returned vector.
pub fn filter_within_radius<T>(center: &Location, items: &[T], radius_km: f64) -> Vec<T>
where
    T: Geolocated + Clone,
{
    items
        .iter()
        .filter(|item| is_within_radius(center, *item, radius_km))
        .cloned()
        .collect()
}

/// Stable sort of `items` by ascending distance from `center`
///
/// Items at equal distance keep their relative input order.
pub fn sort_by_distance<T>(center: &Location, items: &[T]) -> Vec<T>
where
    T: Geolocated + Clone,
{
    let mut keyed: Vec<(f64, &T)> = items
        .iter()
        .map(|item| (compute_distance_km(center, item.location()), item))
        .collect();

    // NaN distances sort last
    keyed.sort_by(|(a, _), (b, _)| a.is_nan().cmp(&b.is_nan()).then_with(|| a.total_cmp(b)));

    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Stage 1: distance check against the rounded distance
#[inline]
pub fn is_within_radius<T: Geolocated>(center: &Location, item: &T, radius_km: f64) -> bool {
    compute_distance_km(center, item.location()) <= radius_km
}

/// Stage 2: tag preference check
///
/// An empty or missing preference set keeps everyone.
#[inline]
pub fn matches_preferred_tags(entity: &RankedEntity, preferred: Option<&HashSet<String>>) -> bool {
    match preferred {
        Some(tags) if !tags.is_empty() => entity.shares_tag_with(tags),
        _ => true,
    }
}

/// Stage 3: availability check
#[inline]
pub fn is_available(entity: &RankedEntity) -> bool {
    entity.availability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_entity(id: &str, lat: f64, lon: f64, tags: &[&str]) -> RankedEntity {
        RankedEntity {
            id: id.to_string(),
            display_name: format!("Tutor {}", id),
            location: Location::new(lat, lon),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            quality_score: 4.5,
            availability: true,
        }
    }

    fn dhaka_center() -> Location {
        Location::new(23.8103, 90.4125)
    }

    #[test]
    fn test_filter_keeps_order_and_drops_far_items() {
        let items = vec![
            create_entity("near", 23.81, 90.41, &[]),
            create_entity("chattogram", 22.3569, 91.7832, &[]),
            create_entity("also_near", 23.79, 90.40, &[]),
        ];

        let within = filter_within_radius(&dhaka_center(), &items, 10.0);

        let ids: Vec<&str> = within.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "also_near"]);
        assert_eq!(items.len(), 3, "input must not be mutated");
    }

    #[test]
    fn test_filter_zero_radius_keeps_only_center() {
        let items = vec![
            Location::new(23.8103, 90.4125),
            Location::new(23.8203, 90.4125),
        ];

        let within = filter_within_radius(&dhaka_center(), &items, 0.0);

        assert_eq!(within, vec![Location::new(23.8103, 90.4125)]);
    }

    #[test]
    fn test_sort_by_distance_ascending() {
        let items = vec![
            create_entity("far", 23.70, 90.35, &[]),
            create_entity("center", 23.8103, 90.4125, &[]),
            create_entity("mid", 23.78, 90.40, &[]),
        ];

        let sorted = sort_by_distance(&dhaka_center(), &items);

        let ids: Vec<&str> = sorted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["center", "mid", "far"]);
    }

    #[test]
    fn test_sort_by_distance_is_stable() {
        let items = vec![
            create_entity("first", 23.82, 90.4125, &[]),
            create_entity("second", 23.82, 90.4125, &[]),
            create_entity("closest", 23.8103, 90.4125, &[]),
            create_entity("third", 23.82, 90.4125, &[]),
        ];

        let sorted = sort_by_distance(&dhaka_center(), &items);

        let ids: Vec<&str> = sorted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["closest", "first", "second", "third"]);
    }

    #[test]
    fn test_sort_by_distance_puts_nan_locations_last() {
        let items: Vec<Location> = (0..200)
            .map(|i| {
                let lat = if i % 3 == 0 { f64::NAN } else { 23.8103 + (i % 37) as f64 * 0.01 };
                Location::new(lat, 90.4125)
            })
            .collect();

        let sorted = sort_by_distance(&dhaka_center(), &items);

        assert_eq!(sorted.len(), 200);
        let valid = sorted.iter().take_while(|l| !l.latitude.is_nan()).count();
        assert_eq!(valid, 200 - 67);
        assert!(sorted[valid..].iter().all(|l| l.latitude.is_nan()));
        for pair in sorted[..valid].windows(2) {
            assert!(
                compute_distance_km(&dhaka_center(), &pair[0])
                    <= compute_distance_km(&dhaka_center(), &pair[1])
            );
        }
    }

    #[test]
    fn test_preferred_tags() {
        let entity = create_entity("1", 23.81, 90.41, &["গণিত"]);

        let math: HashSet<String> = ["গণিত".to_string()].into_iter().collect();
        let english: HashSet<String> = ["ইংরেজি".to_string()].into_iter().collect();
        let empty = HashSet::new();

        assert!(matches_preferred_tags(&entity, Some(&math)));
        assert!(!matches_preferred_tags(&entity, Some(&english)));
        assert!(matches_preferred_tags(&entity, Some(&empty)));
        assert!(matches_preferred_tags(&entity, None));
    }

    #[test]
    fn test_unavailable_filtered() {
        let mut entity = create_entity("1", 23.81, 90.41, &[]);
        assert!(is_available(&entity));

        entity.availability = false;
        assert!(!is_available(&entity));
    }
}
