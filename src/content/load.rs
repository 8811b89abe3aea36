use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use super::model::Post;
use super::store::PostStore;

pub fn load_post_store(path: &Path) -> Result<PostStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read posts file {}", path.display()))?;
    let posts = parse_posts(&raw)
        .with_context(|| format!("failed to parse posts file {}", path.display()))?;

    debug!(count = posts.len(), "loaded post collection");
    Ok(PostStore::new(posts))
}

pub(super) fn parse_posts(raw: &str) -> Result<Vec<Post>> {
    let parsed: Vec<Post> = serde_json::from_str(raw).context("invalid JSON in posts file")?;
    if parsed.is_empty() {
        return Err(anyhow!("posts file contains no posts"));
    }

    let mut seen = HashSet::with_capacity(parsed.len());
    let mut posts = Vec::with_capacity(parsed.len());
    for post in parsed {
        if post.id.trim().is_empty() {
            warn!(title = %post.title, "dropping post with empty id");
            continue;
        }

        if !seen.insert(post.id.clone()) {
            warn!(id = %post.id, "duplicate post id, keeping first occurrence");
            continue;
        }

        posts.push(post);
    }

    if posts.is_empty() {
        Err(anyhow!("no usable posts after validation"))
    } else {
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_posts() {
        let posts = parse_posts(
            r#"[
                {"id": "a", "title": "A", "difficulty_level": "advanced"},
                {"id": "b", "title": "B", "prerequisites": ["a"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "a");
        assert_eq!(posts[1].prerequisites, vec!["a".to_string()]);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let posts = parse_posts(
            r#"[
                {"id": "a", "title": "first"},
                {"id": "a", "title": "second"}
            ]"#,
        )
        .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "first");
    }

    #[test]
    fn empty_id_posts_are_dropped() {
        let posts = parse_posts(
            r#"[
                {"id": "  ", "title": "blank"},
                {"id": "ok", "title": "kept"}
            ]"#,
        )
        .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "ok");
    }

    #[test]
    fn empty_collection_is_an_error() {
        assert!(parse_posts("[]").is_err());
        assert!(parse_posts(r#"[{"id": "", "title": "x"}]"#).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_posts("{not json").is_err());
        assert!(parse_posts(r#"{"id": "a"}"#).is_err());
    }
}
