// Unit tests for the tutor matching engine

use std::collections::HashSet;
use tutor_match::core::{
    compute_distance_km, filter_within_radius, rank_matches, sort_by_distance,
};
use tutor_match::models::{Location, RankedEntity};

fn sample_points() -> Vec<Location> {
    vec![
        Location::new(23.7465, 90.3763),  // Dhanmondi
        Location::new(23.7925, 90.4078),  // Gulshan
        Location::new(23.8103, 90.4125),  // Dhaka center
        Location::new(23.8759, 90.3795),  // Uttara
        Location::new(22.3569, 91.7832),  // Chattogram
        Location::new(24.8949, 91.8687),  // Sylhet
        Location::new(51.5074, -0.1278),  // London
        Location::new(-33.8688, 151.2093), // Sydney
    ]
}

fn create_tutor(id: &str, lat: f64, lon: f64, rating: f64, subjects: &[&str], available: bool) -> RankedEntity {
    RankedEntity {
        id: id.to_string(),
        display_name: format!("Tutor {}", id),
        location: Location::new(lat, lon),
        tags: subjects.iter().map(|s| s.to_string()).collect(),
        quality_score: rating,
        availability: available,
    }
}

fn mixed_tutors() -> Vec<RankedEntity> {
    vec![
        create_tutor("a", 23.7465, 90.3763, 4.8, &["গণিত", "পদার্থবিজ্ঞান"], true),
        create_tutor("b", 23.7925, 90.4078, 4.9, &["ইংরেজি"], true),
        create_tutor("c", 23.8103, 90.4125, 4.7, &["রসায়ন"], false),
        create_tutor("d", 23.7806, 90.4193, 4.6, &["গণিত", "ইংরেজি"], true),
        create_tutor("e", 23.8759, 90.3795, 4.5, &["গণিত"], true),
        create_tutor("f", 22.3569, 91.7832, 5.0, &["গণিত"], true),
        create_tutor("g", 23.90, 90.45, 3.2, &[], true),
    ]
}

#[test]
fn test_distance_symmetry() {
    let points = sample_points();
    for a in &points {
        for b in &points {
            assert_eq!(compute_distance_km(a, b), compute_distance_km(b, a));
        }
    }
}

#[test]
fn test_distance_identity() {
    for a in &sample_points() {
        assert_eq!(compute_distance_km(a, a), 0.0);
    }
}

#[test]
fn test_triangle_inequality() {
    let points = sample_points();
    // Each rounded leg can be off by 0.05km
    let epsilon = 0.2;

    for a in &points {
        for b in &points {
            for c in &points {
                let direct = compute_distance_km(a, c);
                let via = compute_distance_km(a, b) + compute_distance_km(b, c);
                assert!(direct <= via + epsilon, "{} > {} + eps", direct, via);
            }
        }
    }
}

#[test]
fn test_radius_filter_partitions_items() {
    let center = Location::new(23.8103, 90.4125);
    let tutors = mixed_tutors();

    for radius in [0.0, 2.0, 5.0, 8.0, 10.0, 300.0] {
        let within = filter_within_radius(&center, &tutors, radius);
        let kept: HashSet<&str> = within.iter().map(|t| t.id.as_str()).collect();

        for tutor in &tutors {
            let distance = compute_distance_km(&center, &tutor.location);
            if kept.contains(tutor.id.as_str()) {
                assert!(distance <= radius);
            } else {
                assert!(distance > radius);
            }
        }
    }
}

#[test]
fn test_sort_is_non_decreasing() {
    let center = Location::new(23.8103, 90.4125);
    let sorted = sort_by_distance(&center, &mixed_tutors());

    assert_eq!(sorted.len(), mixed_tutors().len());
    for pair in sorted.windows(2) {
        assert!(
            compute_distance_km(&center, &pair[0].location)
                <= compute_distance_km(&center, &pair[1].location)
        );
    }
}

#[test]
fn test_sort_works_on_bare_locations() {
    let center = Location::new(23.8103, 90.4125);
    let sorted = sort_by_distance(&center, &sample_points());

    assert_eq!(sorted[0], center);
    assert_eq!(sorted.last(), Some(&Location::new(-33.8688, 151.2093)));
}

#[test]
fn test_ranking_exclusions() {
    let center = Location::new(23.8103, 90.4125);
    let tutors = mixed_tutors();
    let math: HashSet<String> = ["গণিত".to_string()].into_iter().collect();

    for preferred in [None, Some(&math)] {
        for max_distance in [1.0, 5.0, 10.0, 500.0] {
            let ranked = rank_matches(&center, &tutors, preferred, max_distance);

            for tutor in &ranked {
                assert!(tutor.availability);
                assert!(compute_distance_km(&center, &tutor.location) <= max_distance);
                if let Some(tags) = preferred {
                    assert!(tutor.tags.iter().any(|t| tags.contains(t)));
                }
            }
        }
    }
}

#[test]
fn test_ranking_returns_each_candidate_once() {
    let center = Location::new(23.8103, 90.4125);
    let tutors = vec![
        create_tutor("x", 23.80, 90.41, 4.0, &[], true),
        create_tutor("y", 23.80, 90.41, 4.0, &[], true),
        create_tutor("z", 23.80, 90.41, 4.0, &[], true),
    ];

    let ranked = rank_matches(&center, &tutors, None, 10.0);
    let mut ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
    ids.sort();

    assert_eq!(ids, vec!["x", "y", "z"]);
}

#[test]
fn test_functions_are_idempotent() {
    let center = Location::new(23.8103, 90.4125);
    let tutors = mixed_tutors();

    assert_eq!(
        filter_within_radius(&center, &tutors, 8.0),
        filter_within_radius(&center, &tutors, 8.0)
    );
    assert_eq!(sort_by_distance(&center, &tutors), sort_by_distance(&center, &tutors));
    assert_eq!(
        rank_matches(&center, &tutors, None, 10.0),
        rank_matches(&center, &tutors, None, 10.0)
    );
    assert_eq!(tutors, mixed_tutors(), "inputs must not be mutated");
}
