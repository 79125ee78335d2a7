use super::Position;

/// Axis-aligned rectangular obstruction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub min: Position,
    pub max: Position,
}

impl Obstacle {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min: Position::new(x0.min(x1), y0.min(y1)),
            max: Position::new(x0.max(x1), y0.max(y1)),
        }
    }

    pub fn contains(&self, point: Position) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }
}

/// Battlefield bounds. Positions are kept inside `[0, width] x [0, height]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<Obstacle>,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
