use std::collections::HashSet;

use tracing::debug;

use crate::content::{DifficultyLevel, Post};
use crate::util::humanize_id;

use super::{KnowledgeGraph, KnowledgeLink, KnowledgeNode, NodeKind, Relationship};

const FOCAL_SIZE: u32 = 40;
const NEIGHBOR_SIZE: u32 = 30;
const PREREQUISITE_SIZE: u32 = 25;
const CONCEPT_SIZE: u32 = 20;

const RESOLVED_PREREQUISITE_STRENGTH: f32 = 0.8;
const SYNTHESIZED_PREREQUISITE_STRENGTH: f32 = 0.6;
const RELATED_STRENGTH: f32 = 0.7;
const FOLLOW_UP_STRENGTH: f32 = 0.8;

pub fn build_graph(posts: &[Post], focal_id: &str) -> KnowledgeGraph {
    let Some(focal) = find_post(posts, focal_id) else {
        return KnowledgeGraph::default();
    };

    let mut graph = KnowledgeGraph::default();
    let mut present = HashSet::new();

    push_node(
        &mut graph,
        &mut present,
        node_from_post(focal, NodeKind::Post, FOCAL_SIZE),
    );

    for prereq_id in &focal.prerequisites {
        let (node, strength) = match find_post(posts, prereq_id) {
            Some(prereq) => (
                node_from_post(prereq, NodeKind::Prerequisite, PREREQUISITE_SIZE),
                RESOLVED_PREREQUISITE_STRENGTH,
            ),
            None => (concept_placeholder(prereq_id), SYNTHESIZED_PREREQUISITE_STRENGTH),
        };

        if push_node(&mut graph, &mut present, node) {
            graph.links.push(KnowledgeLink {
                source: prereq_id.clone(),
                target: focal.id.clone(),
                relationship: Relationship::Prerequisite,
                strength,
            });
        }
    }

    for related_id in &focal.related_topics {
        let Some(related) = find_post(posts, related_id) else {
            continue;
        };

        if push_node(
            &mut graph,
            &mut present,
            node_from_post(related, NodeKind::Post, NEIGHBOR_SIZE),
        ) {
            graph.links.push(KnowledgeLink {
                source: focal.id.clone(),
                target: related_id.clone(),
                relationship: Relationship::Related,
                strength: RELATED_STRENGTH,
            });
        }
    }

    for follow_up_id in &focal.follow_ups {
        let Some(follow_up) = find_post(posts, follow_up_id) else {
            continue;
        };

        if push_node(
            &mut graph,
            &mut present,
            node_from_post(follow_up, NodeKind::FollowUp, NEIGHBOR_SIZE),
        ) {
            graph.links.push(KnowledgeLink {
                source: focal.id.clone(),
                target: follow_up_id.clone(),
                relationship: Relationship::FollowUp,
                strength: FOLLOW_UP_STRENGTH,
            });
        }
    }

    debug!(
        focal = focal_id,
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "built knowledge graph"
    );
    graph
}

fn find_post<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    posts.iter().find(|post| post.id == id)
}

// Existence-only de-duplication: the first writer wins, across all steps and
// within a single reference list. A link is only recorded together with the
// node that introduced it.
fn push_node(graph: &mut KnowledgeGraph, present: &mut HashSet<String>, node: KnowledgeNode) -> bool {
    if !present.insert(node.id.clone()) {
        return false;
    }

    graph.nodes.push(node);
    true
}

fn node_from_post(post: &Post, kind: NodeKind, size: u32) -> KnowledgeNode {
    KnowledgeNode {
        id: post.id.clone(),
        title: post.title.clone(),
        snippet: post.description.clone(),
        kind,
        difficulty_level: post.difficulty_level,
        size,
        category: post.category.clone(),
    }
}

fn concept_placeholder(id: &str) -> KnowledgeNode {
    KnowledgeNode {
        id: id.to_string(),
        title: humanize_id(id),
        snippet: format!("Prerequisite concept: {id}"),
        kind: NodeKind::Concept,
        difficulty_level: DifficultyLevel::Beginner,
        size: CONCEPT_SIZE,
        category: "Concept".to_string(),
    }
}
