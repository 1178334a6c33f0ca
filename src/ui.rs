use egui::Context;

use crate::controller::Session;
use crate::view::UiFrame;

/// Build the HUD and return egui output
pub fn build_ui(egui_ctx: &Context, raw_input: egui::RawInput, session: &Session, dt: f32) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_crosshair(ctx);
        draw_debug_window(ctx, session, dt);
        if !session.is_locked() {
            draw_lock_hint(ctx);
        }
    })
}

/// Tessellate egui output for the renderer
pub fn into_ui_frame(egui_ctx: &Context, output: egui::FullOutput, width: u32, height: u32) -> UiFrame {
    let primitives = egui_ctx.tessellate(output.shapes, output.pixels_per_point);
    UiFrame {
        primitives,
        textures_delta: output.textures_delta,
        screen: egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: output.pixels_per_point,
        },
    }
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    let size = 10.0;
    let stroke = egui::Stroke::new(1.5, egui::Color32::WHITE);
    painter.line_segment(
        [egui::pos2(center.x - size, center.y), egui::pos2(center.x + size, center.y)],
        stroke,
    );
    painter.line_segment(
        [egui::pos2(center.x, center.y - size), egui::pos2(center.x, center.y + size)],
        stroke,
    );
}

fn draw_debug_window(ctx: &Context, session: &Session, dt: f32) {
    let pos = session.player.position;
    let target = session
        .target_block()
        .map(|b| format!("{}, {}, {}", b.0, b.1, b.2))
        .unwrap_or_else(|| "-".to_string());

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("FPS: {:.0}", if dt > 0.0 { 1.0 / dt } else { 0.0 }))
                    .small(),
            );
            ui.label(egui::RichText::new(format!("Pos: {:.1}, {:.1}, {:.1}", pos.x, pos.y, pos.z)).small());
            ui.label(egui::RichText::new(format!("Grounded: {}", session.player.grounded)).small());
            ui.label(egui::RichText::new(format!("Blocks: {}", session.world.len())).small());
            ui.label(egui::RichText::new(format!("Target: {target}")).small());
            ui.separator();
            ui.label(egui::RichText::new("WASD - Move").small());
            ui.label(egui::RichText::new("Space - Jump").small());
            ui.label(egui::RichText::new("LMB - Break / RMB - Place").small());
            ui.label(egui::RichText::new("Esc - Release mouse").small());
        });
}

fn draw_lock_hint(ctx: &Context) {
    egui::Area::new(egui::Id::new("lock_hint"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 40.0])
        .show(ctx, |ui| {
            egui::Frame::NONE
                .fill(egui::Color32::from_black_alpha(160))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("Click to play").color(egui::Color32::WHITE));
                });
        });
}
