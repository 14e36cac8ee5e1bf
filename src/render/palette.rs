// src/render/palette.rs
use plotters::style::RGBColor;

pub const YELLOW_GREEN: RGBColor = RGBColor(154, 205, 50);
pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub const GREY: RGBColor = RGBColor(128, 128, 128);
pub const LIGHT_GREY: RGBColor = RGBColor(211, 211, 211);
pub const GOLD: RGBColor = RGBColor(255, 215, 0);
pub const SALMON: RGBColor = RGBColor(250, 128, 114);
pub const CORAL: RGBColor = RGBColor(255, 127, 80);
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);
pub const GREEN: RGBColor = RGBColor(0, 128, 0);
pub const WHITE: RGBColor = RGBColor(255, 255, 255);
