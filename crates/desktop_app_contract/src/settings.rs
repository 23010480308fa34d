//! Cosmetic shell settings read by the window manager and the rendering layer.

use serde::{Deserialize, Serialize};

/// Reserved strip at the bottom of the viewport occupied by the taskbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskbarHeight {
    /// 44 px band.
    Compact,
    /// 56 px band.
    #[default]
    Normal,
    /// 72 px band.
    Tall,
}

impl TaskbarHeight {
    /// Pixel height of the reserved band.
    pub const fn band_px(self) -> i32 {
        match self {
            Self::Compact => 44,
            Self::Normal => 56,
            Self::Tall => 72,
        }
    }
}

/// Glow intensity painted around window borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowBorderGlow {
    /// No glow.
    None,
    /// Faint glow.
    #[default]
    Subtle,
    /// Strong glow.
    Intense,
}

/// Background translucency of window and panel surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UiTransparency {
    /// Opaque surfaces.
    None,
    /// Slightly translucent.
    Low,
    /// Medium translucency.
    #[default]
    Medium,
    /// Mostly transparent.
    High,
}

impl UiTransparency {
    /// Backdrop blur radius in px used behind translucent surfaces.
    pub const fn backdrop_blur_px(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 4,
            Self::Medium => 12,
            Self::High => 24,
        }
    }

    /// Surface background alpha in percent.
    pub const fn surface_alpha_pct(self) -> u8 {
        match self {
            Self::None => 98,
            Self::Low => 88,
            Self::Medium => 75,
            Self::High => 55,
        }
    }
}

/// Taskbar clock format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockFormat {
    /// 12-hour clock with AM/PM.
    Hour12,
    /// 24-hour clock.
    #[default]
    Hour24,
}

/// Density of the decorative particle layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticleIntensity {
    /// Particle layer disabled.
    Off,
    /// Sparse particles.
    Low,
    /// Default density.
    #[default]
    Medium,
    /// Dense particles.
    High,
}

/// Accent color of shell chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    /// Cyan accent.
    #[default]
    Cyan,
    /// Magenta accent.
    Magenta,
    /// Green accent.
    Green,
}

/// Desktop icon size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconSize {
    /// Small icons.
    Small,
    /// Medium icons.
    #[default]
    Medium,
    /// Large icons.
    Large,
}

/// Shell font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// Small text.
    Small,
    /// Medium text.
    #[default]
    Medium,
    /// Large text.
    Large,
}

/// Persisted cosmetic configuration of the desktop shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellSettings {
    /// Taskbar clock format.
    pub clock_format: ClockFormat,
    /// Particle layer density.
    pub particle_intensity: ParticleIntensity,
    /// Chrome accent color.
    pub accent_color: AccentColor,
    /// Desktop icon size.
    pub icon_size: IconSize,
    /// Wallpaper source; empty uses the built-in gradient.
    pub wallpaper_url: String,
    /// Surface translucency.
    pub ui_transparency: UiTransparency,
    /// Whether the grid overlay is painted.
    pub grid_overlay: bool,
    /// Shell font size.
    pub font_size: FontSize,
    /// Label painted above the icon grid.
    pub desktop_label: String,
    /// Whether the scanline overlay is painted.
    pub scanline_effect: bool,
    /// Reserved taskbar band.
    pub taskbar_height: TaskbarHeight,
    /// Window border glow.
    pub window_border_glow: WindowBorderGlow,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            clock_format: ClockFormat::default(),
            particle_intensity: ParticleIntensity::default(),
            accent_color: AccentColor::default(),
            icon_size: IconSize::default(),
            wallpaper_url: String::new(),
            ui_transparency: UiTransparency::default(),
            grid_overlay: true,
            font_size: FontSize::default(),
            desktop_label: "My DFINITY Desktop".to_string(),
            scanline_effect: true,
            taskbar_height: TaskbarHeight::default(),
            window_border_glow: WindowBorderGlow::default(),
        }
    }
}

/// Read-only access to the current shell settings.
pub trait SettingsSource {
    /// Returns the settings currently in effect.
    fn current_settings(&self) -> ShellSettings;
}

impl SettingsSource for ShellSettings {
    fn current_settings(&self) -> ShellSettings {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn taskbar_bands_match_fixed_pixel_heights() {
        assert_eq!(TaskbarHeight::Compact.band_px(), 44);
        assert_eq!(TaskbarHeight::Normal.band_px(), 56);
        assert_eq!(TaskbarHeight::Tall.band_px(), 72);
    }

    #[test]
    fn partial_settings_payload_fills_defaults() {
        let settings: ShellSettings =
            serde_json::from_str(r#"{"taskbarHeight":"tall","clockFormat":"hour12"}"#)
                .expect("decode");
        assert_eq!(settings.taskbar_height, TaskbarHeight::Tall);
        assert_eq!(settings.clock_format, ClockFormat::Hour12);
        assert_eq!(settings.window_border_glow, WindowBorderGlow::Subtle);
        assert_eq!(settings.desktop_label, "My DFINITY Desktop");
        assert!(settings.scanline_effect);
    }
}
