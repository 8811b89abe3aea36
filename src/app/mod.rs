use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::content::{PostStore, load_post_store};
use crate::knowledge::KnowledgeGraph;
use crate::sim::Simulation;

mod interaction;
mod panels;
mod render_utils;
mod view;

pub struct AtlasApp {
    posts_path: PathBuf,
    state: AppState,
    reload_rx: Option<Receiver<Result<PostStore, String>>>,
    initial_focal: Option<String>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<PostStore, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    store: PostStore,
    search: String,
    breadcrumb: Vec<String>,
    requested_focal: Option<String>,
    graph_view: Option<GraphView>,
    pan: Vec2,
    zoom: f32,
    hovered: Option<usize>,
    dragged: Option<usize>,
    show_legend: bool,
    pending_zoom: Option<f32>,
    pending_reset: bool,
}

// Per-focal state: graph and simulation are rebuilt from scratch on every
// focal change; dropping the old pair is what cancels stale stepping.
struct GraphView {
    focal_id: String,
    graph: KnowledgeGraph,
    index_by_id: HashMap<String, usize>,
    sim: Simulation,
    viewport: Vec2,
}

impl AtlasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        posts_path: PathBuf,
        initial_focal: Option<String>,
    ) -> Self {
        let state = Self::start_load(posts_path.clone());
        Self {
            posts_path,
            state,
            reload_rx: None,
            initial_focal,
        }
    }

    fn spawn_load(posts_path: PathBuf) -> Receiver<Result<PostStore, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_post_store(&posts_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(posts_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(posts_path),
        }
    }

    fn draw_loading_screen(ctx: &Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("Loading posts...");
                ui.add_space(8.0);
                ui.spinner();
            });
        });
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let posts_path: &Path = &self.posts_path;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(store) => AppState::Ready(Box::new(ViewModel::new(
                            store,
                            self.initial_focal.take(),
                        ))),
                        Err(error) => AppState::Error(error),
                    });
                }

                Self::draw_loading_screen(ctx);
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load posts");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.posts_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, posts_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.posts_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(store) => AppState::Ready(Box::new(ViewModel::new(store, None))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
