use std::path::Path;

use knowledge_atlas::content::load_post_store;
use knowledge_atlas::knowledge::{NodeKind, build_graph};

#[test]
fn bundled_posts_load_and_build_a_graph() {
    let store = load_post_store(Path::new("data/posts.json")).unwrap();
    assert!(store.len() >= 5);

    let graph = build_graph(store.posts(), "intro-distributed-systems");
    assert!(!graph.is_empty());
    assert_eq!(graph.nodes[0].id, "intro-distributed-systems");

    // The bundled data references a prerequisite no post covers; it must
    // surface as a synthesized concept node.
    let concept = graph
        .nodes
        .iter()
        .find(|node| node.id == "networking-fundamentals")
        .unwrap();
    assert_eq!(concept.kind, NodeKind::Concept);

    for link in &graph.links {
        assert!(graph.nodes.iter().any(|node| node.id == link.source));
        assert!(graph.nodes.iter().any(|node| node.id == link.target));
    }
}

#[test]
fn every_bundled_post_produces_a_nonempty_graph() {
    let store = load_post_store(Path::new("data/posts.json")).unwrap();

    for post in store.posts() {
        let graph = build_graph(store.posts(), &post.id);
        assert_eq!(graph.nodes[0].id, post.id);
    }
}

#[test]
fn loads_posts_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posts.json");
    std::fs::write(&path, r#"[{"id": "solo", "title": "Solo"}]"#).unwrap();

    let store = load_post_store(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.find("solo").unwrap().title, "Solo");
}

#[test]
fn missing_posts_file_is_an_error() {
    assert!(load_post_store(Path::new("data/does-not-exist.json")).is_err());
}
