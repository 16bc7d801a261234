//! Conversions handlers typically apply to element content.
//!
//! Every parser trims ASCII whitespace first and requires the whole remaining text
//! to be consumed.

use std::str::FromStr;

use thiserror::Error;

use crate::tokens::View;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("field is not valid UTF-8")]
    Utf8,

    #[error("invalid integer {0:?}")]
    Integer(String),

    #[error("invalid number {0:?}")]
    Float(String),

    #[error("colour must have format #RRGGBB, got {0:?}")]
    Colour(String),

    #[error("expected {expected} comma separated values, got {found}")]
    ListLength { expected: usize, found: usize },

    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: f32, min: f32, max: f32 },

    #[error("unknown target type {0:?}, only Cube is supported")]
    TargetType(String),

    #[error("duplicate scenario name {0:?}")]
    DuplicateScenario(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b, a: 0xFF }
    }
}

pub fn text<'a>(content: View<'a>) -> Result<&'a str, FieldError> {
    content.trim().to_str().map_err(|_| FieldError::Utf8)
}

pub fn integer<T: FromStr>(content: View<'_>) -> Result<T, FieldError> {
    let text = text(content)?;
    text.parse()
        .map_err(|_| FieldError::Integer(text.to_string()))
}

pub fn float(content: View<'_>) -> Result<f32, FieldError> {
    parse_float(text(content)?)
}

fn parse_float(text: &str) -> Result<f32, FieldError> {
    let text = text.trim();
    text.parse()
        .map_err(|_| FieldError::Float(text.to_string()))
}

/// `#RRGGBB`, fully opaque.
pub fn colour(content: View<'_>) -> Result<Colour, FieldError> {
    let text = text(content)?;
    let invalid = || FieldError::Colour(text.to_string());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    Ok(Colour::rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

/// Exactly `N` comma separated floats.
pub fn float_list<const N: usize>(content: View<'_>) -> Result<[f32; N], FieldError> {
    let text = text(content)?;
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != N {
        return Err(FieldError::ListLength {
            expected: N,
            found: parts.len(),
        });
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = parse_float(part)?;
    }
    Ok(values)
}

/// `width,height`
pub fn int_pair(content: View<'_>) -> Result<(i32, i32), FieldError> {
    let text = text(content)?;
    let Some((first, second)) = text.split_once(',') else {
        return Err(FieldError::ListLength {
            expected: 2,
            found: 1,
        });
    };
    let parse = |part: &str| {
        let part = part.trim();
        part.parse::<i32>()
            .map_err(|_| FieldError::Integer(part.to_string()))
    };
    Ok((parse(first)?, parse(second)?))
}

pub fn in_range(value: f32, min: f32, max: f32) -> Result<f32, FieldError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(FieldError::OutOfRange { value, min, max })
    }
}
