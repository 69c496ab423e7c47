/// Colours for DropSleuth.
///
/// egui's stock dark and light visuals do most of the work; the palette
/// only adds the drop zone fills and the status tones on top of them.
use crate::state::StatusTone;
use egui::{Color32, Stroke, Visuals};

/// Which theme is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    /// Toggle between dark and light.
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        };
    }
}

pub struct DropSleuthTheme {
    mode: ThemeMode,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub separator: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub zone_idle: Color32,
    pub zone_active: Color32,
    pub zone_detached: Color32,
}

/// `0xRRGGBB` to an opaque colour.
const fn hex(rgb: u32) -> Color32 {
    Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl DropSleuthTheme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                mode,
                text_primary: hex(0xe6e6ea),
                text_secondary: hex(0xb4b6c2),
                text_muted: hex(0x71748a),
                accent: hex(0x7fb2f0),
                separator: hex(0x3b3d52),
                success: hex(0x9fd89a),
                warning: hex(0xf0b07a),
                error: hex(0xec8a9e),
                zone_idle: hex(0x23243a),
                zone_active: hex(0x2b4268),
                zone_detached: hex(0x2c2228),
            },
            ThemeMode::Light => Self {
                mode,
                text_primary: hex(0x1f2030),
                text_secondary: hex(0x4b4d5e),
                text_muted: hex(0x8b8d9c),
                accent: hex(0x2f6bd4),
                separator: hex(0xcfd0d9),
                success: hex(0x2e8f3a),
                warning: hex(0xc77a1c),
                error: hex(0xc8424f),
                zone_idle: hex(0xeeeff5),
                zone_active: hex(0xd3e2fa),
                zone_detached: hex(0xf3e5e8),
            },
        }
    }

    /// Install egui's visuals for this mode, tinted with the accent.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = match self.mode {
            ThemeMode::Dark => Visuals::dark(),
            ThemeMode::Light => Visuals::light(),
        };
        visuals.hyperlink_color = self.accent;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.accent);
        ctx.set_visuals(visuals);
    }

    pub fn tone_color(&self, tone: StatusTone) -> Color32 {
        match tone {
            StatusTone::Info => self.text_secondary,
            StatusTone::Success => self.success,
            StatusTone::Warning => self.warning,
            StatusTone::Error => self.error,
        }
    }
}
