use crate::events::EditorEvent;
use crate::scene::{Color, Fog, FogType};
use bitflags::bitflags;
use std::ops::RangeInclusive;

pub const DEFAULT_FOG_COLOR: Color = Color(0xaaaaaa);
pub const DEFAULT_FOG_NEAR: f32 = 0.1;
pub const DEFAULT_FOG_FAR: f32 = 50.0;
pub const DEFAULT_FOG_DENSITY: f32 = 0.05;
pub const DISTANCE_RANGE: RangeInclusive<f32> = 0.0..=f32::INFINITY;
pub const DENSITY_RANGE: RangeInclusive<f32> = 0.0..=0.1;
pub const DENSITY_DECIMALS: usize = 3;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FogFields: u8 {
        const COLOR = 1 << 0;
        const NEAR = 1 << 1;
        const FAR = 1 << 2;
        const DENSITY = 1 << 3;
    }
}

pub fn visible_fields(fog_type: FogType) -> FogFields {
    match fog_type {
        FogType::None => FogFields::empty(),
        FogType::Fog => FogFields::COLOR | FogFields::NEAR | FogFields::FAR,
        FogType::FogExp2 => FogFields::COLOR | FogFields::DENSITY,
    }
}

/// Editable fog values. Fields irrelevant to the selected type keep their
/// last value so switching types back and forth does not lose input.
#[derive(Debug, Clone, PartialEq)]
pub struct FogForm {
    fog_type: FogType,
    color: Color,
    near: f32,
    far: f32,
    density: f32,
}

impl Default for FogForm {
    fn default() -> Self {
        Self {
            fog_type: FogType::None,
            color: DEFAULT_FOG_COLOR,
            near: DEFAULT_FOG_NEAR,
            far: DEFAULT_FOG_FAR,
            density: DEFAULT_FOG_DENSITY,
        }
    }
}

impl FogForm {
    pub fn fog_type(&self) -> FogType {
        self.fog_type
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn visible(&self) -> FogFields {
        visible_fields(self.fog_type)
    }

    pub fn set_type(&mut self, fog_type: FogType) {
        self.fog_type = fog_type;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = clamp_to(near, &DISTANCE_RANGE, self.near);
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = clamp_to(far, &DISTANCE_RANGE, self.far);
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = clamp_to(density, &DENSITY_RANGE, self.density);
    }

    /// Mirrors the scene's fog into the form.
    pub fn sync(&mut self, fog: Option<&Fog>) {
        let Some(fog) = fog else {
            self.fog_type = FogType::None;
            return;
        };
        self.color = fog.color();
        self.fog_type = fog.fog_type();
        match *fog {
            Fog::Linear { near, far, .. } => {
                self.set_near(near);
                self.set_far(far);
            }
            Fog::Exponential { density, .. } => self.set_density(density),
        }
    }

    pub fn to_event(&self, source: &'static str) -> EditorEvent {
        EditorEvent::SceneFogChanged {
            source,
            fog_type: self.fog_type,
            color: self.color,
            near: self.near,
            far: self.far,
            density: self.density,
        }
    }
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_is_exclusive_per_type() {
        assert!(visible_fields(FogType::None).is_empty());
        let linear = visible_fields(FogType::Fog);
        assert!(linear.contains(FogFields::COLOR | FogFields::NEAR | FogFields::FAR));
        assert!(!linear.contains(FogFields::DENSITY));
        let exp = visible_fields(FogType::FogExp2);
        assert_eq!(exp, FogFields::COLOR | FogFields::DENSITY);
    }

    #[test]
    fn values_are_clamped_to_ranges() {
        let mut form = FogForm::default();
        form.set_density(0.5);
        assert_eq!(form.density(), 0.1);
        form.set_near(-3.0);
        assert_eq!(form.near(), 0.0);
        form.set_far(f32::NAN);
        assert_eq!(form.far(), DEFAULT_FOG_FAR);
    }

    #[test]
    fn sync_keeps_fields_of_other_variant() {
        let mut form = FogForm::default();
        form.sync(Some(&Fog::Linear { color: Color(0x010203), near: 2.0, far: 30.0 }));
        form.sync(Some(&Fog::Exponential { color: Color(0x040506), density: 0.02 }));
        assert_eq!(form.fog_type(), FogType::FogExp2);
        assert_eq!(form.color(), Color(0x040506));
        assert_eq!((form.near(), form.far(), form.density()), (2.0, 30.0, 0.02));

        form.sync(None);
        assert_eq!(form.fog_type(), FogType::None);
        assert_eq!(form.color(), Color(0x040506));
    }

    #[test]
    fn event_carries_all_five_values() {
        let form = FogForm::default();
        let event = form.to_event("ScenePanel");
        assert_eq!(
            event,
            EditorEvent::SceneFogChanged {
                source: "ScenePanel",
                fog_type: FogType::None,
                color: DEFAULT_FOG_COLOR,
                near: DEFAULT_FOG_NEAR,
                far: DEFAULT_FOG_FAR,
                density: DEFAULT_FOG_DENSITY,
            }
        );
    }
}
