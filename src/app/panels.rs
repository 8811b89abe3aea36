use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, RichText, Vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::content::PostStore;
use crate::util::truncate_label;

use super::ViewModel;
use super::render_utils::difficulty_color;

const ZOOM_STEP: f32 = 1.5;
const BREADCRUMB_MAX_CHARS: usize = 20;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn new(store: PostStore, initial_focal: Option<String>) -> Self {
        let mut model = Self {
            store,
            search: String::new(),
            breadcrumb: Vec::new(),
            requested_focal: None,
            graph_view: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            hovered: None,
            dragged: None,
            show_legend: true,
            pending_zoom: None,
            pending_reset: false,
        };

        if let Some(focal_id) = initial_focal {
            let crumb = model
                .store
                .find(&focal_id)
                .map(|post| post.title.clone())
                .unwrap_or_else(|| focal_id.clone());
            model.breadcrumb.push(crumb);
            model.requested_focal = Some(focal_id);
        }

        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        posts_path: &Path,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("knowledge-atlas");
                    ui.separator();

                    if self.requested_focal.is_some() {
                        if ui.button("Back to posts").clicked() {
                            self.back_to_posts();
                        }

                        for (index, crumb) in self.breadcrumb.iter().enumerate() {
                            ui.label("/");
                            let text = truncate_label(crumb, BREADCRUMB_MAX_CHARS);
                            if index == self.breadcrumb.len() - 1 {
                                ui.label(RichText::new(text).strong());
                            } else {
                                ui.label(text);
                            }
                        }

                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.selectable_label(self.show_legend, "Legend").clicked() {
                                self.show_legend = !self.show_legend;
                            }
                            if ui.button("Reset view").clicked() {
                                self.pending_reset = true;
                            }
                            if ui.button("-").clicked() {
                                self.pending_zoom = Some(1.0 / ZOOM_STEP);
                            }
                            if ui.button("+").clicked() {
                                self.pending_zoom = Some(ZOOM_STEP);
                            }
                            ui.label(format!("{}%", (self.zoom * 100.0).round() as i32));
                        });
                    } else {
                        ui.label(format!("{} posts", self.store.len()));
                        ui.label(format!("source: {}", posts_path.display()));
                        let reload_button =
                            ui.add_enabled(!is_reloading, egui::Button::new("Reload posts"));
                        if reload_button.clicked() {
                            *reload_requested = true;
                        }
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.requested_focal.is_some() {
                self.draw_graph(ui);
            } else {
                self.draw_posts_list(ui);
            }
        });
    }

    fn draw_posts_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
            if !self.search.is_empty() && ui.button("Clear").clicked() {
                self.search.clear();
            }
        });
        ui.add_space(4.0);

        let filtered = self.filtered_posts();
        if filtered.is_empty() {
            ui.add_space(30.0);
            ui.vertical_centered(|ui| {
                ui.label("No posts match the current search.");
            });
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for index in filtered {
                let post = &self.store.posts()[index];
                let response = egui::Frame::group(ui.style())
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(&post.title).strong().size(16.0));
                        if !post.description.is_empty() {
                            ui.label(post.description.as_str());
                        }

                        ui.horizontal(|ui| {
                            if !post.category.is_empty() {
                                ui.small(post.category.as_str());
                                ui.small("|");
                            }
                            ui.small(
                                RichText::new(post.difficulty_level.label())
                                    .color(difficulty_color(post.difficulty_level)),
                            );
                            if let Some(minutes) = post.estimated_read_time {
                                ui.small("|");
                                ui.small(format!("{minutes} min read"));
                            }
                            if let Some(author) = &post.author {
                                ui.small("|");
                                ui.small(author.as_str());
                            }
                        });
                    })
                    .response;

                if response.interact(egui::Sense::click()).clicked() {
                    clicked = Some((post.id.clone(), post.title.clone()));
                }
                ui.add_space(4.0);
            }
        });

        if let Some((id, title)) = clicked {
            self.open_post(id, title);
        }
    }

    fn filtered_posts(&self) -> Vec<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return (0..self.store.len()).collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut ranked = self
            .store
            .posts()
            .iter()
            .enumerate()
            .filter_map(|(index, post)| {
                let haystack =
                    format!("{} {} {}", post.title, post.category, post.tags.join(" "));
                fuzzy_match_score(&matcher, &haystack, query).map(|score| (score, index))
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().map(|(_score, index)| index).collect()
    }

    fn open_post(&mut self, id: String, title: String) {
        self.breadcrumb = vec![title];
        self.requested_focal = Some(id);
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
        self.pending_zoom = None;
        self.pending_reset = false;
    }

    pub(in crate::app) fn back_to_posts(&mut self) {
        self.requested_focal = None;
        self.graph_view = None;
        self.breadcrumb.clear();
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
        self.hovered = None;
        self.dragged = None;
        self.pending_zoom = None;
        self.pending_reset = false;
    }
}
