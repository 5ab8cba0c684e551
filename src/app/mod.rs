use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::scaffold::{AssemblyModel, ChainBuilder, ChainTree, LatticeGraph, load_chain_tree};

mod panel;
mod render_utils;

pub struct ScaffoldApp {
    tree_path: Option<String>,
    state: AppState,
    reload_rx: Option<Receiver<Result<ChainTree, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ChainTree, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    lattice: Arc<LatticeGraph>,
    builder: ChainBuilder,
    /// Frozen layout of the externally supplied chain tree, if one was
    /// loaded. Recomputed only when a new tree arrives.
    simulated: Option<AssemblyModel>,
    export_notice: Option<String>,
}

impl ScaffoldApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, tree_path: Option<String>) -> Self {
        let state = match &tree_path {
            Some(path) => Self::start_load(path.clone()),
            None => AppState::Ready(Box::new(ViewModel::new(None))),
        };
        Self {
            tree_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: String) -> Receiver<Result<ChainTree, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_chain_tree(path.as_ref()).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }
}

impl eframe::App for ScaffoldApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(tree) => AppState::Ready(Box::new(ViewModel::new(Some(tree)))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading chain tree...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load chain tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked()
                        && let Some(path) = &self.tree_path
                    {
                        transition = Some(Self::start_load(path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(
                    ctx,
                    self.tree_path.as_deref(),
                    &mut reload_requested,
                    is_reloading,
                );

                if reload_requested
                    && self.reload_rx.is_none()
                    && let Some(path) = &self.tree_path
                {
                    self.reload_rx = Some(Self::spawn_load(path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(tree)) => model.replace_tree(tree),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
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
