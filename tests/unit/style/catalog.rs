use std::collections::BTreeSet;

use super::*;

#[test]
fn all_lists_every_variant_once() {
    let unique: BTreeSet<_> = ArtifactStyle::ALL.iter().copied().collect();
    assert_eq!(unique.len(), ArtifactStyle::ALL.len());

    let names: BTreeSet<_> = ArtifactStyle::ALL.iter().map(|s| s.name()).collect();
    assert_eq!(names.len(), ArtifactStyle::ALL.len());
}

#[test]
fn names_parse_back_and_match_serde() {
    for style in ArtifactStyle::ALL {
        let parsed: ArtifactStyle = style.name().parse().unwrap();
        assert_eq!(parsed, style);

        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, format!("\"{}\"", style.name()));
    }
    assert_eq!(
        "Boarding_Pass".parse::<ArtifactStyle>().unwrap(),
        ArtifactStyle::BoardingPass
    );
    assert!("scroll".parse::<ArtifactStyle>().is_err());
}

#[test]
fn collections_partition_the_catalog() {
    let total: usize = [
        Collection::Correspondence,
        Collection::Tickets,
        Collection::Keepsakes,
        Collection::Music,
        Collection::Desk,
    ]
    .into_iter()
    .map(|c| ArtifactStyle::in_collection(c).count())
    .sum();
    assert_eq!(total, ArtifactStyle::ALL.len());
    assert_eq!(
        ArtifactStyle::Receipt.collection().title(),
        "Tickets & Receipts"
    );
}
