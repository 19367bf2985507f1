//! Navigation Panel
//! Left sidebar with the logo and the three page links.

use crate::views::NAV_LINKS;
use egui::{Color32, RichText};

pub const BRAND: Color32 = Color32::from_rgb(0x00, 0x4F, 0x6D);
const ACCENT: Color32 = Color32::from_rgb(0xA7, 0xC6, 0xED);

/// Draw the sidebar. Returns the path of a clicked link.
pub fn show(
    ui: &mut egui::Ui,
    logo: Option<&egui::TextureHandle>,
    active_path: &str,
    status: &str,
) -> Option<&'static str> {
    let mut clicked = None;

    ui.vertical_centered(|ui| {
        ui.add_space(10.0);
        match logo {
            Some(texture) => {
                let size = texture.size_vec2();
                let width = 195.0_f32.min(ui.available_width());
                let height = width * size.y / size.x;
                ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(width, height)));
            }
            None => {
                ui.label(RichText::new("De vientos y datos").size(18.0).strong().color(Color32::WHITE));
            }
        }
        ui.add_space(8.0);
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), 2.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, ACCENT);
        ui.add_space(12.0);

        for (label, path) in NAV_LINKS {
            // Exact match only, like the router.
            let active = active_path == path;
            let text = RichText::new(label).size(15.0).color(Color32::WHITE);
            let button = egui::Button::new(if active { text.strong() } else { text })
                .fill(if active { ACCENT.gamma_multiply(0.35) } else { Color32::TRANSPARENT })
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() && !active {
                clicked = Some(path);
            }
            ui.add_space(4.0);
        }
    });

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
        ui.add_space(8.0);
        ui.label(RichText::new(status).size(11.0).color(ACCENT));
    });

    clicked
}
