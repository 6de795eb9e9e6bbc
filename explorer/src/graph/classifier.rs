use std::{collections::HashMap, sync::LazyLock};

use super::types::LinkCategory;

/// Relationship labels as the data API spells them. Matching is exact.
pub const KNOWN_RELATIONSHIPS: [(&str, LinkCategory); 39] = [
    ("owner", LinkCategory::Owner),
    ("власник", LinkCategory::Owner),
    ("власність", LinkCategory::Owner),
    ("співвласник", LinkCategory::Owner),
    ("спільна власність", LinkCategory::Owner),
    ("спільна сумісна власність", LinkCategory::Owner),
    ("бенефіціарний власник", LinkCategory::Beneficiary),
    ("керівник", LinkCategory::Head),
    ("директор", LinkCategory::Head),
    ("ділові зв'язки", LinkCategory::Business),
    ("особисті зв'язки", LinkCategory::Personal),
    ("особи, які спільно проживають", LinkCategory::Personal),
    (
        "пов'язані спільним побутом і мають взаємні права та обов'язки",
        LinkCategory::Personal,
    ),
    ("усиновлювач", LinkCategory::Family),
    ("падчерка", LinkCategory::Family),
    ("дід", LinkCategory::Family),
    ("рідний брат", LinkCategory::Family),
    ("мати", LinkCategory::Family),
    ("син", LinkCategory::Family),
    ("невістка", LinkCategory::Family),
    ("внук", LinkCategory::Family),
    ("мачуха", LinkCategory::Family),
    (
        "особа, яка перебуває під опікою або піклуванням",
        LinkCategory::Family,
    ),
    ("усиновлений", LinkCategory::Family),
    ("внучка", LinkCategory::Family),
    ("батько", LinkCategory::Family),
    ("рідна сестра", LinkCategory::Family),
    ("зять", LinkCategory::Family),
    ("чоловік", LinkCategory::Family),
    ("опікун чи піклувальник", LinkCategory::Family),
    ("дочка", LinkCategory::Family),
    ("свекор", LinkCategory::Family),
    ("тесть", LinkCategory::Family),
    ("теща", LinkCategory::Family),
    ("баба", LinkCategory::Family),
    ("пасинок", LinkCategory::Family),
    ("вітчим", LinkCategory::Family),
    ("дружина", LinkCategory::Family),
    ("свекруха", LinkCategory::Family),
];

static CATEGORY_BY_LABEL: LazyLock<HashMap<&'static str, LinkCategory>> =
    LazyLock::new(|| KNOWN_RELATIONSHIPS.iter().copied().collect());

pub fn classify(label: &str) -> LinkCategory {
    CATEGORY_BY_LABEL
        .get(label)
        .copied()
        .unwrap_or(LinkCategory::Unknown)
}
