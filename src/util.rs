use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn humanize_id(id: &str) -> String {
    let mut title = String::with_capacity(id.len());
    let mut at_word_start = true;

    for ch in id.chars() {
        if ch == '-' || ch == '_' || ch == ' ' {
            if !title.ends_with(' ') && !title.is_empty() {
                title.push(' ');
            }
            at_word_start = true;
        } else if at_word_start {
            title.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            title.push(ch);
        }
    }

    while title.ends_with(' ') {
        title.pop();
    }
    title
}

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_replaces_separators_and_capitalizes() {
        assert_eq!(humanize_id("basic-statistics"), "Basic Statistics");
        assert_eq!(humanize_id("linear_algebra"), "Linear Algebra");
        assert_eq!(humanize_id("raft"), "Raft");
    }

    #[test]
    fn humanize_collapses_repeated_separators() {
        assert_eq!(humanize_id("a--b"), "A B");
        assert_eq!(humanize_id("-leading-trailing-"), "Leading Trailing");
    }

    #[test]
    fn truncate_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate_label("short", 20), "short");
        assert_eq!(truncate_label("a very long post title", 10), "a very lon...");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (ax, ay) = stable_pair("consensus-basics");
        let (bx, by) = stable_pair("consensus-basics");
        assert_eq!((ax, ay), (bx, by));
        assert!((-1.0..=1.0).contains(&ax));
        assert!((-1.0..=1.0).contains(&ay));
        assert_ne!(stable_pair("one"), stable_pair("two"));
    }
}
