//! Dashboard Main Application
//! Sidebar navigation on the left, the routed page in the centre.

use crate::config::DashboardConfig;
use crate::data::{load_observations, ObservationTable};
use crate::export::Exporter;
use crate::gui::assets::AssetCache;
use crate::gui::nav_panel::{self, BRAND};
use crate::gui::page_view::{self, FigureFormat, PageAction};
use crate::views::{
    dispatch, page_layout, CollapseState, DataState, Fragment, PageLayout, Route, Tab, TabGroup, TabSelections,
    NOT_FOUND_MESSAGE,
};
use egui::{Color32, RichText, ScrollArea, SidePanel};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

const LOGO_ASSET: &str = "images.png";

/// Spreadsheet loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(ObservationTable),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    period: usize,
    route: Route,
    selections: TabSelections,
    collapse: CollapseState,
    table: Option<ObservationTable>,
    load_error: Option<String>,
    /// Built fragments; EDA tabs are only cached once the data is loaded.
    fragments: HashMap<Tab, Fragment>,
    assets: AssetCache,

    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    status: String,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            period: config.period,
            route: Route::from_path(&config.route),
            selections: TabSelections::default(),
            collapse: CollapseState::default(),
            table: None,
            load_error: None,
            fragments: HashMap::new(),
            assets: AssetCache::new(config.assets),
            load_rx: None,
            is_loading: false,
            status: "Listo".to_string(),
        };
        app.start_loading(config.data);
        app
    }

    /// Load the dataset in a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.status = format!("Cargando {}...", path.display());

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!("Leyendo {}...", path.display())));
            match load_observations(&path) {
                Ok(table) => {
                    let _ = tx.send(LoadResult::Complete(table));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(format!("{:#}", e)));
                }
            }
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.status = status;
                    }
                    LoadResult::Complete(table) => {
                        log::info!("Dataset loaded: {} rows", table.height());
                        self.status = format!("{} registros cargados", table.height());
                        self.table = Some(table);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("Failed to load dataset: {}", error);
                        self.status = format!("Error: {}", error);
                        self.load_error = Some(error);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn navigate(&mut self, path: &str) {
        log::info!("Route changed: {} -> {}", self.route.path(), path);
        self.route = Route::from_path(path);
    }

    fn select_tab(&mut self, tab: Tab) {
        if self.selections.get(tab.group()) != Some(tab) {
            if tab.group() == TabGroup::Intro {
                self.collapse = CollapseState::default();
            }
            self.selections.select(tab);
        }
    }

    /// Build and cache a tab's fragment on first use. EDA tabs are not
    /// cached until the dataset has arrived.
    fn ensure_fragment(&mut self, tab: Tab) {
        let data = match &self.table {
            Some(table) => DataState::Ready(table),
            None if tab.needs_data() => return,
            None => DataState::Loading,
        };
        let period = self.period;
        self.fragments.entry(tab).or_insert_with(|| {
            let fragment = dispatch(tab.group(), tab.tag(), data, period);
            log::debug!(
                "Built {}: {} tables, {} charts, {} errors",
                tab.tag(),
                fragment.tables().count(),
                fragment.figures().count(),
                fragment.errors().count()
            );
            fragment
        });
    }

    fn show_page(&mut self, ui: &mut egui::Ui, layout: &PageLayout) -> PageAction {
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.label(RichText::new(layout.title).size(40.0).strong().color(BRAND));
            if let Some(subtitle) = layout.subtitle {
                ui.label(RichText::new(subtitle).size(16.0));
            }
        });
        ui.add_space(15.0);

        let selected = self.selections.get(layout.group);
        let mut clicked = None;
        ui.horizontal(|ui| {
            for entry in &layout.tabs {
                let Some(tab) = Tab::parse(layout.group, entry.tag) else {
                    continue;
                };
                let text = RichText::new(entry.label).strong().color(BRAND);
                if ui.selectable_label(selected == Some(tab), text).clicked() {
                    clicked = Some(tab);
                }
            }
        });
        ui.separator();
        if let Some(tab) = clicked {
            self.select_tab(tab);
        }

        match self.selections.get(layout.group) {
            Some(tab) => {
                self.ensure_fragment(tab);
                let pending;
                let fragment = match self.fragments.get(&tab) {
                    Some(fragment) => fragment,
                    None => {
                        let data = match &self.load_error {
                            Some(error) => DataState::Failed(error),
                            None => DataState::Loading,
                        };
                        pending = dispatch(tab.group(), tab.tag(), data, self.period);
                        &pending
                    }
                };
                page_view::show(ui, fragment, &mut self.collapse, &mut self.assets)
            }
            None => PageAction::None,
        }
    }

    fn handle_action(&mut self, action: PageAction) {
        match action {
            PageAction::None => {}
            PageAction::ExportTable(table) => {
                let Some(path) = save_dialog("CSV", "csv", "tabla.csv") else {
                    return;
                };
                let result = Exporter::table_csv(&table, &path);
                self.report_export(result, &path);
            }
            PageAction::ExportFigure(fig, format) => {
                let (name, ext) = match format {
                    FigureFormat::Png => ("PNG Image", "png"),
                    FigureFormat::Json => ("JSON", "json"),
                };
                let Some(path) = save_dialog(name, ext, &format!("{}.{}", fig.id, ext)) else {
                    return;
                };
                let result = match format {
                    FigureFormat::Png => Exporter::figure_png(&fig, &path),
                    FigureFormat::Json => Exporter::figure_json(&fig, &path),
                };
                self.report_export(result, &path);
            }
        }
    }

    fn report_export(&mut self, result: Result<(), crate::export::ExportError>, path: &Path) {
        match result {
            Ok(()) => {
                self.status = format!("Guardado: {}", path.display());
                if let Err(e) = open::that(path) {
                    log::warn!("Could not open {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.status = format!("Error: {}", e);
            }
        }
    }
}

fn save_dialog(name: &str, ext: &str, file_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(name, &[ext])
        .set_file_name(file_name)
        .save_file()
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("nav_panel")
            .exact_width(240.0)
            .resizable(false)
            .frame(egui::Frame::none().fill(BRAND).inner_margin(20.0))
            .show(ctx, |ui| {
                let logo = self.assets.texture(ctx, LOGO_ASSET).cloned();
                if let Some(path) = nav_panel::show(ui, logo.as_ref(), self.route.path(), &self.status) {
                    self.navigate(path);
                }
            });

        let mut action = PageAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                match page_layout(&self.route) {
                    Some(layout) => action = self.show_page(ui, &layout),
                    None => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.label(RichText::new(NOT_FOUND_MESSAGE).size(24.0).color(Color32::GRAY));
                        });
                    }
                }
            });
        });
        self.handle_action(action);
    }
}
