use std::collections::TryReserveError;
use std::fs;
use std::path::Path;

use glam::vec2;
use thiserror::Error;

use crate::geometry::{Color, Point2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub p0: Point2, // world space
    pub p1: Point2,
    pub height: f32,
    pub color: Color,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read scene file")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("line {line}: wall endpoints coincide")]
    Degenerate { line: usize },
    #[error("failure creating wall list")]
    Alloc(#[from] TryReserveError),
}

/// Ordered walls, built once at scene load and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct WallList {
    walls: Vec<Wall>,
}

impl WallList {
    /// Takes ownership of `walls`, storing them in exactly-sized storage.
    pub fn new(walls: impl ExactSizeIterator<Item = Wall>) -> Result<Self, SceneError> {
        let mut storage = Vec::new();
        storage.try_reserve_exact(walls.len())?;
        storage.extend(walls);
        Ok(Self { walls: storage })
    }

    /// Single blue wall ahead and to the left of an observer at the origin facing +X.
    pub fn builtin() -> Result<Self, SceneError> {
        Self::new(
            [Wall {
                p0: vec2(30.0, 50.0),
                p1: vec2(50.0, 60.0),
                height: 5.0,
                color: Color::rgba(0, 0, 200, 255),
            }]
            .into_iter(),
        )
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// One wall per line: `x0 y0 x1 y1 height r g b [a]`. `#` starts a comment line.
    pub fn parse(text: &str) -> Result<Self, SceneError> {
        let mut parsed = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parsed.push(parse_wall(line, idx + 1)?);
        }
        Self::new(parsed.into_iter())
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Wall> {
        self.walls.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

impl<'a> IntoIterator for &'a WallList {
    type Item = &'a Wall;
    type IntoIter = std::slice::Iter<'a, Wall>;

    fn into_iter(self) -> Self::IntoIter {
        self.walls.iter()
    }
}

fn parse_wall(line: &str, line_no: usize) -> Result<Wall, SceneError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 8 && fields.len() != 9 {
        return Err(SceneError::Parse {
            line: line_no,
            reason: format!("expected 8 or 9 fields, found {}", fields.len()),
        });
    }

    let num = |i: usize| -> Result<f32, SceneError> {
        let v: f32 = fields[i].parse().map_err(|_| SceneError::Parse {
            line: line_no,
            reason: format!("`{}` is not a number", fields[i]),
        })?;
        if !v.is_finite() {
            return Err(SceneError::Parse {
                line: line_no,
                reason: format!("`{}` is not finite", fields[i]),
            });
        }
        Ok(v)
    };
    let channel = |i: usize| -> Result<u8, SceneError> {
        fields[i].parse().map_err(|_| SceneError::Parse {
            line: line_no,
            reason: format!("`{}` is not a color channel (0-255)", fields[i]),
        })
    };

    let p0 = vec2(num(0)?, num(1)?);
    let p1 = vec2(num(2)?, num(3)?);
    if p0 == p1 {
        return Err(SceneError::Degenerate { line: line_no });
    }
    let height = num(4)?;
    let alpha = if fields.len() == 9 { channel(8)? } else { 255 };

    Ok(Wall {
        p0,
        p1,
        height,
        color: Color::rgba(channel(5)?, channel(6)?, channel(7)?, alpha),
    })
}
