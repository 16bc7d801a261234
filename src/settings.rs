//! Display, input and theme settings read from a `settings.xml` style file.

use std::path::Path;

use crate::error::LoadError;
use crate::fields::{self, Colour, FieldError};
use crate::loader::{self, Setter};
use crate::tokens::View;
use crate::Options;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub font_size: i32,
    pub font_spacing: f32,
    pub font_colour: Colour,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            font_size: 20,
            font_spacing: 1.0,
            font_colour: Colour::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub width: i32,
    pub height: i32,
    pub sensitivity: f32,
    pub desired_fps: i32,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 800,
            height: 600,
            sensitivity: 1.0,
            desired_fps: 60,
            theme: Theme::default(),
        }
    }
}

const TAGS: &[(&str, Setter<Settings>)] = &[
    ("resolution", set_resolution),
    ("sensitivity", set_sensitivity),
    ("targetFPS", set_desired_fps),
    ("fontSize", set_font_size),
    ("fontSpacing", set_font_spacing),
    ("colour", set_font_colour),
];

impl Settings {
    /// Fields missing from the document keep their default value.
    pub fn from_bytes(buffer: &[u8]) -> Result<Settings, LoadError> {
        Settings::from_bytes_with(buffer, &Options::default())
    }

    pub fn from_bytes_with(buffer: &[u8], options: &Options) -> Result<Settings, LoadError> {
        loader::run(buffer, options, Settings::default(), TAGS)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Settings, LoadError> {
        Settings::from_bytes(&loader::read(path.as_ref())?)
    }
}

fn set_resolution(settings: &mut Settings, content: View<'_>) -> Result<(), FieldError> {
    let (width, height) = fields::int_pair(content)?;
    settings.width = width;
    settings.height = height;
    Ok(())
}

fn set_sensitivity(settings: &mut Settings, content: View<'_>) -> Result<(), FieldError> {
    settings.sensitivity = fields::float(content)?;
    Ok(())
}

fn set_desired_fps(settings: &mut Settings, content: View<'_>) -> Result<(), FieldError> {
    settings.desired_fps = fields::integer(content)?;
    Ok(())
}

fn set_font_size(settings: &mut Settings, content: View<'_>) -> Result<(), FieldError> {
    settings.theme.font_size = fields::integer(content)?;
    Ok(())
}

fn set_font_spacing(settings: &mut Settings, content: View<'_>) -> Result<(), FieldError> {
    settings.theme.font_spacing = fields::float(content)?;
    Ok(())
}

fn set_font_colour(settings: &mut Settings, content: View<'_>) -> Result<(), FieldError> {
    settings.theme.font_colour = fields::colour(content)?;
    Ok(())
}
