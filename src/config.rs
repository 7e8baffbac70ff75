use std::path::PathBuf;

use bon::Builder;

use crate::color::Color;
use crate::painter::Pen;
use crate::size::SizeContext;

/// Colors, pens and font sizes for the attitude indicator
#[derive(Debug, Clone)]
pub struct AttitudeStyle {
    pub sky: Color,
    pub ground: Color,
    pub outline: Pen,
    pub ladder: Pen,
    pub horizon: Pen,
    pub label_color: Color,
    pub roll_scale: Pen,
    pub aircraft_marker: Color,
    pub roll_marker: Color,
    pub font_size: f32,
}

impl Default for AttitudeStyle {
    fn default() -> Self {
        Self {
            sky: Color::SKY,
            ground: Color::GROUND,
            outline: Pen::new(Color::BLACK, 2.0),
            ladder: Pen::new(Color::WHITE, 2.0),
            horizon: Pen::new(Color::GREEN, 3.0),
            label_color: Color::WHITE,
            roll_scale: Pen::new(Color::BLACK, 2.0),
            aircraft_marker: Color::RED,
            roll_marker: Color::BLACK,
            font_size: 8.0,
        }
    }
}

/// Colors, pens and font sizes for the compass
#[derive(Debug, Clone)]
pub struct CompassStyle {
    pub background: Color,
    pub outline: Pen,
    pub tick_width: f64,
    pub north: Color,
    pub south: Color,
    pub east_west: Color,
    pub tick: Color,
    pub small_font_size: f32,
    pub big_font_size: f32,
    pub front_arrow: Color,
    pub back_arrow: Color,
    /// Gap between the long tick ends and the cardinal arrow tips.
    pub arrow_margin: f64,
    pub heading_marker: Color,
    pub panel_fill: Color,
    pub panel_outline: Pen,
    pub panel_text: Color,
    pub panel_font_size: f32,
    pub panel_width: f64,
    pub panel_height: f64,
    pub panel_radius: f64,
}

impl Default for CompassStyle {
    fn default() -> Self {
        Self {
            background: Color::SKY,
            outline: Pen::new(Color::BLACK, 1.0),
            tick_width: 1.0,
            north: Color::BLUE,
            south: Color::RED,
            east_west: Color::BLACK,
            tick: Color::BLACK,
            small_font_size: 8.0,
            big_font_size: 12.0,
            front_arrow: Color::BLUE.with_alpha(0xa0),
            back_arrow: Color::RED.with_alpha(0xa0),
            arrow_margin: 15.0,
            heading_marker: Color::RED.with_alpha(0xe0),
            panel_fill: Color::new(128, 128, 128).with_alpha(240),
            panel_outline: Pen::new(Color::BLACK, 2.0),
            panel_text: Color::GREEN,
            panel_font_size: 14.0,
            panel_width: 130.0,
            panel_height: 42.0,
            panel_radius: 6.0,
        }
    }
}

/// Colors and metrics for the key/value list
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub name_color: Color,
    pub value_color: Color,
    pub even_background: Color,
    pub odd_background: Color,
    pub header_background: Color,
    pub header_color: Color,
    pub row_height: f64,
    pub name_column_width: f64,
    pub font_size: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            name_color: Color::BLUE,
            value_color: Color::BLACK,
            even_background: Color::new(0xf0, 0xf0, 0xf0),
            odd_background: Color::new(0xe0, 0xe0, 0xe0),
            header_background: Color::new(0xc8, 0xc8, 0xc8),
            header_color: Color::BLACK,
            row_height: 14.0,
            name_column_width: 80.0,
            font_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct InstrumentConfig {
    #[builder(into, default = "Flight Instruments".to_string())]
    pub title: String,

    // Widget sizing
    #[builder(default = 200.0)]
    pub size_min: f64,
    #[builder(default = 600.0)]
    pub size_max: f64,
    #[builder(default = 2.0)]
    pub offset: f64,

    // Window configuration
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = 220.0)]
    pub table_width: f64,
    #[builder(default = Color::WHITE)]
    pub background_color: Color,

    #[builder(default = true)]
    pub show_altitude_panel: bool,

    /// Font used for every label; system fonts are tried when unset.
    #[builder(into)]
    pub font_path: Option<PathBuf>,

    #[builder(default)]
    pub attitude_style: AttitudeStyle,
    #[builder(default)]
    pub compass_style: CompassStyle,
    #[builder(default)]
    pub table_style: TableStyle,
}

impl InstrumentConfig {
    pub fn size_context(&self) -> SizeContext {
        SizeContext::new(self.size_min, self.size_max, self.offset)
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_reference_widget() {
        let config = InstrumentConfig::default();
        assert_eq!(config.size_min, 200.0);
        assert_eq!(config.size_max, 600.0);
        assert!(config.show_altitude_panel);
        assert_eq!(config.size_context().current_size(), 196.0);
    }

    #[test]
    fn builder_overrides() {
        let config = InstrumentConfig::builder()
            .title("ADI")
            .show_altitude_panel(false)
            .size_min(300.0)
            .build();
        assert_eq!(config.title, "ADI");
        assert!(!config.show_altitude_panel);
        assert_eq!(config.size_context().current_size(), 296.0);
    }
}
