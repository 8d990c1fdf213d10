use super::{
    drop_position_at, FogFields, FogForm, Outliner, PanelActions, ScenePanel, DENSITY_DECIMALS, DENSITY_RANGE,
    DISTANCE_RANGE,
};
use crate::app::App;
use crate::scene::{Color, FogType, NodeId};

const FORM_LABEL_WIDTH: f32 = 90.0;
const OUTLINER_MAX_HEIGHT: f32 = 240.0;
const NUMBER_WIDTH: f32 = 40.0;

impl ScenePanel {
    /// Draws the panel and applies whatever the user changed this frame.
    pub fn show(&self, ui: &mut egui::Ui, app: &mut App) {
        let mut actions = PanelActions::default();
        {
            let state = self.state.borrow();
            draw_outliner(ui, &state.outliner, &mut actions);
            ui.separator();
            draw_background(ui, state.background, &mut actions);
            draw_fog(ui, &state.fog, &mut actions);
        }
        if !actions.is_empty() {
            self.apply_actions(app, actions);
        }
    }
}

fn draw_outliner(ui: &mut egui::Ui, outliner: &Outliner, actions: &mut PanelActions) {
    egui::ScrollArea::vertical().id_salt("scene_outliner").max_height(OUTLINER_MAX_HEIGHT).show(ui, |ui| {
        for row in outliner.rows() {
            ui.push_id(row.id, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(row.padding());
                    let selected = outliner.value() == Some(row.id);
                    let label = ui.selectable_label(selected, row.label.as_str());
                    let response = if row.draggable {
                        let drag_id = ui.make_persistent_id(("outliner_drag", row.id));
                        let response = ui.interact(label.rect, drag_id, egui::Sense::click_and_drag());
                        response.dnd_set_drag_payload(row.id);
                        response
                    } else {
                        label
                    };
                    if response.double_clicked() {
                        actions.focus = Some(row.id);
                    } else if response.clicked() {
                        actions.select = Some(row.id);
                    }
                    if let Some(dragged) = response.dnd_release_payload::<NodeId>() {
                        let offset = ui
                            .ctx()
                            .pointer_interact_pos()
                            .map(|pos| pos.y - response.rect.top())
                            .unwrap_or(response.rect.height() * 0.5);
                        actions.drop = Some((*dragged, row.id, drop_position_at(offset, response.rect.height())));
                    }
                });
            });
        }
    });
}

fn draw_background(ui: &mut egui::Ui, background: Color, actions: &mut PanelActions) {
    ui.horizontal(|ui| {
        ui.add_sized([FORM_LABEL_WIDTH, 18.0], egui::Label::new("Background"));
        let mut rgb = background.to_rgb();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            actions.background = Some(Color::from_rgb(rgb[0], rgb[1], rgb[2]));
        }
    });
}

fn draw_fog(ui: &mut egui::Ui, fog: &FogForm, actions: &mut PanelActions) {
    ui.horizontal(|ui| {
        ui.add_sized([FORM_LABEL_WIDTH, 18.0], egui::Label::new("Fog"));
        let mut fog_type = fog.fog_type();
        egui::ComboBox::from_id_salt("scene_fog_type")
            .width(150.0)
            .selected_text(fog_type.label())
            .show_ui(ui, |ui| {
                for option in FogType::ALL {
                    ui.selectable_value(&mut fog_type, option, option.label());
                }
            });
        if fog_type != fog.fog_type() {
            actions.fog_type = Some(fog_type);
        }
    });

    let visible = fog.visible();
    if visible.is_empty() {
        return;
    }
    ui.horizontal(|ui| {
        ui.add_space(FORM_LABEL_WIDTH);
        if visible.contains(FogFields::COLOR) {
            let mut rgb = fog.color().to_rgb();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                actions.fog_color = Some(Color::from_rgb(rgb[0], rgb[1], rgb[2]));
            }
        }
        if visible.contains(FogFields::NEAR) {
            let mut near = fog.near();
            if number(ui, &mut near, DISTANCE_RANGE, 0.1, 2).changed() {
                actions.fog_near = Some(near);
            }
        }
        if visible.contains(FogFields::FAR) {
            let mut far = fog.far();
            if number(ui, &mut far, DISTANCE_RANGE, 0.1, 2).changed() {
                actions.fog_far = Some(far);
            }
        }
        if visible.contains(FogFields::DENSITY) {
            let mut density = fog.density();
            if number(ui, &mut density, DENSITY_RANGE, 0.001, DENSITY_DECIMALS).changed() {
                actions.fog_density = Some(density);
            }
        }
    });
}

fn number(
    ui: &mut egui::Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    speed: f64,
    decimals: usize,
) -> egui::Response {
    ui.add_sized(
        [NUMBER_WIDTH, 18.0],
        egui::DragValue::new(value).range(range).speed(speed).fixed_decimals(decimals),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn run_frame(panel: &ScenePanel, app: &mut App) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel.show(ui, app));
        });
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut app = App::new(Options::default());
        let panel = ScenePanel::new(&mut app);
        let revision = panel.outliner().revision();
        run_frame(&panel, &mut app);
        run_frame(&panel, &mut app);
        assert_eq!(panel.outliner().revision(), revision);
        assert_eq!(app.editor.scene.background, None);
        assert_eq!(app.editor.scene.fog, None);
    }
}
