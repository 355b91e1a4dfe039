use rankguess_core::Item;

const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";

/// Known showcase videos, keyed by level name.
const VIDEO_LINKS: &[(&str, &str)] = &[
    ("Acheron", "sBKR6aUorzA"),
    ("Silent clubstep", "GR4OMkS3SN8"),
    ("Slaughterhouse", "kpcF1-QAHQc"),
    ("Abyss of Darkness", "ejJkpqcMMCY"),
    ("Kyouki", "KDa5c0CJTHs"),
    ("Tartarus", "8CQeHhF1MQQ"),
    ("Bloodbath", "al5sOhKj9R8"),
    ("The Golden", "zyFvO5c8-5E"),
    ("Codependence", "9dT2o6L6k2c"),
    ("The Lightning Rod", "QoZhE8WqKcM"),
];

const FALLBACK_LEVELS: &[(u64, &str, i64)] = &[
    (73667628, "Acheron", 1),
    (4125776, "Silent clubstep", 2),
    (64429030, "Slaughterhouse", 3),
    (76687917, "Abyss of Darkness", 4),
    (73801713, "Kyouki", 5),
    (75364906, "Codependence", 6),
    (54042744, "Tartarus", 7),
    (70407397, "The Golden", 8),
    (10565740, "Bloodbath", 9),
    (78492218, "The Lightning Rod", 10),
];

pub fn watch_url(video_id: &str) -> String {
    format!("{YOUTUBE_WATCH}{video_id}")
}

pub fn video_for_name(name: &str) -> Option<String> {
    VIDEO_LINKS
        .iter()
        .find(|(level, _)| *level == name)
        .map(|(_, id)| watch_url(id))
}

/// Built-in list used whenever the remote list is unusable. Already sorted by rank.
pub fn fallback_items() -> Vec<Item> {
    FALLBACK_LEVELS
        .iter()
        .map(|(id, name, rank)| {
            let item = Item::new(*id, *name, *rank);
            match video_for_name(name) {
                Some(video) => item.with_video(video),
                None => item,
            }
        })
        .collect()
}
