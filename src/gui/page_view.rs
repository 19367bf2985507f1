//! Page View
//! Renders a content fragment: text, images, tables, charts and the
//! collapse section.

use super::assets::AssetCache;
use super::nav_panel::BRAND;
use crate::charts::{ChartPlotter, Figure};
use crate::views::{Block, CollapseSection, CollapseState, Fragment, ImageRef, Span, TableData};
use egui::{Color32, RichText, ScrollArea};

const PANEL_FILL: Color32 = Color32::from_rgb(0xF0, 0xF0, 0xF0);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const CHART_SPACING: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Png,
    Json,
}

/// Actions requested from the page
#[derive(Debug, Clone)]
pub enum PageAction {
    None,
    ExportTable(TableData),
    ExportFigure(Box<Figure>, FigureFormat),
}

pub fn show(
    ui: &mut egui::Ui,
    fragment: &Fragment,
    collapse: &mut CollapseState,
    assets: &mut AssetCache,
) -> PageAction {
    let mut action = PageAction::None;

    for (idx, block) in fragment.blocks.iter().enumerate() {
        match block {
            Block::Heading(text) => {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(text).size(22.0).strong().color(BRAND));
                });
            }
            Block::Subheading(text) => {
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(text).size(16.0));
                });
            }
            Block::Paragraph(spans) => {
                ui.add_space(20.0);
                paragraph(ui, spans);
            }
            Block::Images(images) => {
                ui.add_space(10.0);
                ui.horizontal_wrapped(|ui| {
                    for image in images {
                        image_widget(ui, assets, image);
                        ui.add_space(CHART_SPACING);
                    }
                });
            }
            Block::Table(table) => {
                if table_widget(ui, idx, table) {
                    action = PageAction::ExportTable(table.clone());
                }
            }
            Block::Chart(fig) => {
                ui.add_space(10.0);
                if let Some(format) = chart_toolbar(ui) {
                    action = PageAction::ExportFigure(fig.clone(), format);
                }
                ChartPlotter::draw_figure(ui, fig);
            }
            Block::Collapse(section) => collapse_widget(ui, assets, section, collapse),
            Block::Error(message) => {
                ui.add_space(10.0);
                ui.label(RichText::new(format!("⚠ {}", message)).color(ERROR_COLOR));
            }
        }
    }

    action
}

fn paragraph(ui: &mut egui::Ui, spans: &[Span]) {
    let mut job = egui::text::LayoutJob::default();
    let body = egui::TextStyle::Body.resolve(ui.style());
    let color = ui.visuals().text_color();
    for span in spans {
        let format = egui::TextFormat {
            font_id: body.clone(),
            color: if span.bold { ui.visuals().strong_text_color() } else { color },
            ..Default::default()
        };
        job.append(&span.text, 0.0, format);
    }
    job.wrap.max_width = ui.available_width();
    ui.label(job);
}

fn image_widget(ui: &mut egui::Ui, assets: &mut AssetCache, image: &ImageRef) {
    let width = image.width.min(ui.available_width());
    match assets.texture(ui.ctx(), &image.asset) {
        Some(texture) => {
            let size = texture.size_vec2();
            let height = image.height.unwrap_or(width * size.y / size.x);
            ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(width, height)));
        }
        None => {
            let height = image.height.unwrap_or(width * 0.6);
            let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
            ui.painter().rect_filled(rect, 4.0, PANEL_FILL);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &image.asset,
                egui::FontId::proportional(12.0),
                Color32::GRAY,
            );
        }
    }
}

/// Returns true when the export button was clicked.
fn table_widget(ui: &mut egui::Ui, idx: usize, table: &TableData) -> bool {
    let mut export = false;
    ui.add_space(10.0);
    if table.exportable {
        ui.horizontal(|ui| {
            export = ui.small_button("Export CSV").clicked();
        });
    }

    ScrollArea::horizontal()
        .id_salt(("table_scroll", idx))
        .show(ui, |ui| {
            egui::Grid::new(("table", idx))
                .striped(true)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for column in &table.columns {
                        ui.label(RichText::new(column).strong().color(BRAND));
                    }
                    ui.end_row();

                    for (r, row) in table.rows.iter().enumerate() {
                        for cell in row {
                            let text = RichText::new(cell).size(12.0);
                            if r == 0 && table.highlight_first_row {
                                ui.label(text.strong().background_color(PANEL_FILL).color(Color32::BLACK));
                            } else {
                                ui.label(text);
                            }
                        }
                        ui.end_row();
                    }
                });
        });
    export
}

fn chart_toolbar(ui: &mut egui::Ui) -> Option<FigureFormat> {
    let mut format = None;
    ui.horizontal(|ui| {
        if ui.small_button("Save PNG").clicked() {
            format = Some(FigureFormat::Png);
        }
        if ui.small_button("Save JSON").clicked() {
            format = Some(FigureFormat::Json);
        }
    });
    format
}

fn collapse_widget(
    ui: &mut egui::Ui,
    assets: &mut AssetCache,
    section: &CollapseSection,
    collapse: &mut CollapseState,
) {
    ui.add_space(40.0);
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            for image in &section.left_images {
                image_widget(ui, assets, image);
                ui.add_space(20.0);
            }
        });
        ui.add_space(20.0);
        ui.vertical(|ui| {
            for (i, label) in section.buttons.iter().enumerate() {
                let fill = if collapse.is_open(i) { BRAND.gamma_multiply(0.75) } else { BRAND };
                let button = egui::Button::new(RichText::new(label).size(16.0).color(Color32::WHITE))
                    .fill(fill)
                    .min_size(egui::vec2(250.0, 36.0));
                if ui.add(button).clicked() {
                    *collapse = collapse.toggle(i);
                }
                ui.add_space(12.0);
            }
        });
        ui.add_space(20.0);
        ui.vertical(|ui| {
            for image in &section.right_images {
                image_widget(ui, assets, image);
                ui.add_space(10.0);
            }
        });
    });

    if let Some(open) = collapse.open_panel() {
        ui.add_space(20.0);
        egui::Frame::none()
            .fill(PANEL_FILL)
            .rounding(15.0)
            .inner_margin(15.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width() * 0.6);
                ui.label(RichText::new(&section.panels[open]).color(Color32::BLACK));
            });
    }
}
