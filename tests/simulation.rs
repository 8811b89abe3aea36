use eframe::egui::vec2;

use knowledge_atlas::content::{DifficultyLevel, Post};
use knowledge_atlas::knowledge::build_graph;
use knowledge_atlas::sim::{LayoutParams, Simulation};

const DT: f32 = 1.0 / 60.0;

fn post(id: &str, prerequisites: &[&str], related: &[&str], follow_ups: &[&str]) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        description: String::new(),
        difficulty_level: DifficultyLevel::Beginner,
        category: "Testing".to_string(),
        prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        related_topics: related.iter().map(|s| s.to_string()).collect(),
        follow_ups: follow_ups.iter().map(|s| s.to_string()).collect(),
        author: None,
        tags: Vec::new(),
        estimated_read_time: None,
    }
}

fn star_simulation() -> Simulation {
    let posts = vec![
        post("hub", &["a"], &["b"], &["c"]),
        post("a", &[], &[], &[]),
        post("b", &[], &[], &[]),
        post("c", &[], &[], &[]),
    ];
    let graph = build_graph(&posts, "hub");
    Simulation::new(&graph, 1024.0, 768.0)
}

#[test]
fn alpha_cools_monotonically_until_halt() {
    let mut sim = star_simulation();
    let mut previous = sim.alpha();
    let mut steps = 0;

    while sim.step(DT) {
        assert!(sim.alpha() < previous, "alpha rose without perturbation");
        previous = sim.alpha();
        steps += 1;
        assert!(steps < 1000, "simulation never cooled");
    }

    assert!((250..=350).contains(&steps), "cooled after {steps} steps");
    assert!(sim.alpha() < 0.002);
    assert!(!sim.step(DT));
}

#[test]
fn dragged_node_tracks_pointer_exactly() {
    let mut sim = star_simulation();
    let pointer = vec2(432.0, 217.0);

    sim.drag_start(1, pointer);
    for _ in 0..30 {
        sim.step(DT);
        assert_eq!(sim.position(1), pointer);
    }

    let moved = vec2(500.0, 300.0);
    sim.drag_move(1, moved);
    sim.step(DT);
    assert_eq!(sim.position(1), moved);
}

#[test]
fn released_node_resumes_free_movement() {
    let mut sim = star_simulation();
    let pointer = vec2(432.0, 217.0);

    sim.drag_start(1, pointer);
    for _ in 0..10 {
        sim.step(DT);
    }

    sim.drag_end(1);
    for _ in 0..30 {
        sim.step(DT);
    }
    assert_ne!(sim.position(1), pointer);
}

#[test]
fn drag_sustains_a_cooled_simulation() {
    let mut sim = star_simulation();
    while sim.step(DT) {}
    let cooled_alpha = sim.alpha();

    sim.drag_start(2, vec2(100.0, 100.0));
    assert!(sim.step(DT));
    assert!(sim.alpha() > cooled_alpha);

    for _ in 0..500 {
        sim.step(DT);
    }
    assert!(
        (0.25..=0.31).contains(&sim.alpha()),
        "alpha did not settle at the drag sustain level: {}",
        sim.alpha()
    );

    sim.drag_end(2);
    let mut steps = 0;
    while sim.step(DT) {
        steps += 1;
        assert!(steps < 2000, "simulation never cooled after drag end");
    }
    assert!(sim.alpha() < 0.002);
}

#[test]
fn focal_is_pinned_to_center_during_warm_up() {
    let mut sim = star_simulation();
    let center = vec2(512.0, 384.0);

    assert_eq!(sim.position(0), center);
    for _ in 0..55 {
        sim.step(DT);
        assert_eq!(sim.position(0), center);
    }

    for _ in 0..60 {
        sim.step(DT);
    }
    assert_ne!(sim.position(0), center, "focal was never released");
}

#[test]
fn viewport_resize_swaps_params_without_resetting_alpha() {
    let mut sim = star_simulation();
    assert_eq!(sim.params(), LayoutParams::REGULAR);
    assert!(!sim.is_compact());

    sim.step(DT);
    let alpha_before = sim.alpha();

    sim.set_viewport(600.0, 900.0);
    assert_eq!(sim.params(), LayoutParams::COMPACT);
    assert!(sim.is_compact());
    assert_eq!(sim.alpha(), alpha_before);

    // Still inside the warm-up window: the focal pin follows the center.
    sim.step(DT);
    assert_eq!(sim.position(0), vec2(300.0, 450.0));
}

#[test]
fn empty_graph_never_steps() {
    let posts = vec![post("a", &[], &[], &[])];
    let graph = build_graph(&posts, "unknown");
    let mut sim = Simulation::new(&graph, 1024.0, 768.0);

    assert_eq!(sim.node_count(), 0);
    assert!(!sim.step(DT));
}

#[test]
fn reheat_restarts_a_cooled_simulation() {
    let mut sim = star_simulation();
    while sim.step(DT) {}

    sim.reheat(0.3);
    assert!(sim.step(DT));
}

#[test]
fn link_segments_resolve_to_node_positions() {
    let sim = star_simulation();

    // hub has one prerequisite, one related, one follow-up link; every
    // segment endpoint must be an actual node position.
    for link_index in 0..3 {
        let (source, target) = sim.segment(link_index);
        let positions = (0..sim.node_count()).map(|i| sim.position(i)).collect::<Vec<_>>();
        assert!(positions.contains(&source));
        assert!(positions.contains(&target));
    }
}
