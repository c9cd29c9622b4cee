//! Static level layouts
//!
//! A layout is plain data: target rectangles (bottom-left corner, size and an
//! optional stack parent), the projectile queue and the per-level constants.
//! One generic [`Simulation`](crate::Simulation) runs every level; levels only
//! differ in this description.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_DRAG_RADIUS, SLINGSHOT_ANCHOR};
use crate::error::LayoutError;
use crate::sim::{ProjectileKind, Rect};

/// Kinds a layout may place (projectiles come from the queue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Pig,
    Crate,
    Glass,
}

/// One target in a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub kind: TargetKind,
    /// Left edge
    pub x: f32,
    /// Bottom edge; replaced by the parent's top when stacked
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Index of an earlier entity this one rests on
    #[serde(default)]
    pub stack_parent: Option<usize>,
}

impl EntitySpec {
    pub fn new(kind: TargetKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            stack_parent: None,
        }
    }

    /// Entity placed on top of `parent`
    pub fn stacked(kind: TargetKind, x: f32, width: f32, height: f32, parent: usize) -> Self {
        Self {
            stack_parent: Some(parent),
            ..Self::new(kind, x, 0.0, width, height)
        }
    }
}

/// Slingshot placement for a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlingshotSpec {
    pub anchor: Vec2,
    pub max_drag_radius: f32,
    #[serde(default)]
    pub rest_offset: Vec2,
}

impl Default for SlingshotSpec {
    fn default() -> Self {
        Self {
            anchor: Vec2::new(SLINGSHOT_ANCHOR.0, SLINGSHOT_ANCHOR.1),
            max_drag_radius: MAX_DRAG_RADIUS,
            rest_offset: Vec2::ZERO,
        }
    }
}

/// When a level counts as won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WinCondition {
    /// Every pig hurt or removed
    #[default]
    AllPigsDown,
    /// Every pig removed
    AllPigsRemoved,
    /// Any pig hit ends the level
    FirstPigHit,
}

fn default_gravity_scale() -> f32 {
    1.0
}

/// Complete description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub entities: Vec<EntitySpec>,
    pub max_attempts: u32,
    pub projectiles: Vec<ProjectileKind>,
    #[serde(default)]
    pub win_condition: WinCondition,
    #[serde(default = "default_gravity_scale")]
    pub gravity_scale: f32,
    #[serde(default)]
    pub slingshot: SlingshotSpec,
    /// Seed for the level's RNG (glass tilt)
    #[serde(default)]
    pub seed: u64,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        log::debug!("Parsed layout '{}' with {} entities", layout.name, layout.entities.len());
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate and compute world bounds for every target, in layout order
    pub fn resolve(&self, ground_y: f32) -> Result<Vec<(TargetKind, Rect)>, LayoutError> {
        if self.projectiles.is_empty() {
            return Err(LayoutError::EmptyProjectileQueue);
        }
        if self.max_attempts == 0 {
            return Err(LayoutError::ZeroAttempts);
        }
        let radius = self.slingshot.max_drag_radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(LayoutError::BadDragRadius(radius));
        }
        if !self.gravity_scale.is_finite() || self.gravity_scale < 0.0 {
            return Err(LayoutError::BadGravityScale(self.gravity_scale));
        }
        if !self.entities.iter().any(|e| e.kind == TargetKind::Pig) {
            return Err(LayoutError::NoPigs);
        }

        let mut resolved: Vec<(TargetKind, Rect)> = Vec::with_capacity(self.entities.len());
        for (index, spec) in self.entities.iter().enumerate() {
            let (width, height) = (spec.width, spec.height);
            if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                return Err(LayoutError::BadDimensions { index, width, height });
            }
            let y = match spec.stack_parent {
                Some(parent) if parent < index => resolved[parent].1.top(),
                Some(parent) => return Err(LayoutError::BadStackParent { index, parent }),
                None => spec.y,
            };
            if !(spec.x.is_finite() && y.is_finite()) {
                return Err(LayoutError::NonFinitePosition { index });
            }
            if y < ground_y {
                return Err(LayoutError::BelowGround {
                    index,
                    bottom: y,
                    ground_y,
                });
            }
            resolved.push((spec.kind, Rect::from_bottom_left(spec.x, y, width, height)));
        }
        Ok(resolved)
    }

    /// Number of levels shipped with the crate
    pub fn builtin_count() -> usize {
        3
    }

    /// Built-in level by zero-based index
    pub fn builtin(index: usize) -> Option<LevelLayout> {
        use TargetKind::*;
        let ground = crate::consts::GROUND_Y;

        let layout = match index {
            // Pigs on a row of crates
            0 => LevelLayout {
                name: "Level 1".into(),
                entities: vec![
                    EntitySpec::new(Crate, 800.0, ground, 50.0, 50.0),
                    EntitySpec::new(Crate, 900.0, ground, 50.0, 50.0),
                    EntitySpec::new(Crate, 1000.0, ground, 50.0, 50.0),
                    EntitySpec::stacked(Pig, 805.0, 40.0, 40.0, 0),
                    EntitySpec::stacked(Pig, 905.0, 40.0, 40.0, 1),
                    EntitySpec::stacked(Pig, 1005.0, 40.0, 40.0, 2),
                ],
                max_attempts: 3,
                projectiles: vec![ProjectileKind::Red; 3],
                win_condition: WinCondition::AllPigsDown,
                gravity_scale: 1.0,
                slingshot: SlingshotSpec::default(),
                seed: 1,
            },
            // Glass columns under a plank, and a glass-topped crate
            1 => LevelLayout {
                name: "Level 2".into(),
                entities: vec![
                    EntitySpec::new(Glass, 800.0, ground, 20.0, 80.0),
                    EntitySpec::new(Glass, 880.0, ground, 20.0, 80.0),
                    EntitySpec::stacked(Crate, 790.0, 120.0, 20.0, 0),
                    EntitySpec::stacked(Pig, 830.0, 40.0, 40.0, 2),
                    EntitySpec::new(Crate, 1000.0, ground, 50.0, 50.0),
                    EntitySpec::stacked(Glass, 1000.0, 50.0, 30.0, 4),
                    EntitySpec::stacked(Pig, 1005.0, 40.0, 40.0, 5),
                ],
                max_attempts: 3,
                projectiles: vec![ProjectileKind::Red, ProjectileKind::Yellow, ProjectileKind::Red],
                win_condition: WinCondition::AllPigsDown,
                gravity_scale: 1.0,
                slingshot: SlingshotSpec::default(),
                seed: 2,
            },
            // Crate pyramid, best opened with the explosive bird
            2 => LevelLayout {
                name: "Level 3".into(),
                entities: vec![
                    EntitySpec::new(Glass, 880.0, ground, 20.0, 60.0),
                    EntitySpec::new(Crate, 950.0, ground, 50.0, 50.0),
                    EntitySpec::new(Crate, 1000.0, ground, 50.0, 50.0),
                    EntitySpec::stacked(Crate, 975.0, 50.0, 50.0, 1),
                    EntitySpec::stacked(Pig, 980.0, 40.0, 40.0, 3),
                    EntitySpec::new(Pig, 1070.0, ground, 40.0, 40.0),
                ],
                max_attempts: 3,
                projectiles: vec![ProjectileKind::Black, ProjectileKind::Red, ProjectileKind::Yellow],
                win_condition: WinCondition::AllPigsDown,
                gravity_scale: 1.0,
                slingshot: SlingshotSpec::default(),
                seed: 3,
            },
            _ => return None,
        };
        Some(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROUND_Y;

    fn minimal() -> LevelLayout {
        LevelLayout {
            name: "t".into(),
            entities: vec![EntitySpec::new(TargetKind::Pig, 500.0, GROUND_Y, 40.0, 40.0)],
            max_attempts: 1,
            projectiles: vec![ProjectileKind::Red],
            win_condition: WinCondition::default(),
            gravity_scale: 1.0,
            slingshot: SlingshotSpec::default(),
            seed: 0,
        }
    }

    #[test]
    fn test_builtins_are_valid() {
        assert!(LevelLayout::builtin(LevelLayout::builtin_count()).is_none());
        for i in 0..LevelLayout::builtin_count() {
            let layout = LevelLayout::builtin(i).unwrap();
            let resolved = layout.resolve(GROUND_Y).unwrap();
            assert_eq!(resolved.len(), layout.entities.len());
            assert!(resolved.iter().filter(|(k, _)| *k == TargetKind::Pig).count() > 1);
        }
    }

    #[test]
    fn test_stacking_uses_parent_top() {
        let mut layout = minimal();
        layout.entities = vec![
            EntitySpec::new(TargetKind::Crate, 100.0, GROUND_Y, 50.0, 50.0),
            EntitySpec::stacked(TargetKind::Glass, 100.0, 50.0, 30.0, 0),
            EntitySpec::stacked(TargetKind::Pig, 105.0, 40.0, 40.0, 1),
        ];
        let resolved = layout.resolve(GROUND_Y).unwrap();
        assert_eq!(resolved[1].1.bottom(), resolved[0].1.top());
        assert_eq!(resolved[2].1.bottom(), GROUND_Y + 80.0);
    }

    #[test]
    fn test_invalid_layouts() {
        let mut l = minimal();
        l.entities[0].kind = TargetKind::Crate;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::NoPigs)));

        let mut l = minimal();
        l.entities[0].width = -1.0;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::BadDimensions { index: 0, .. })));

        let mut l = minimal();
        l.entities[0].height = f32::NAN;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::BadDimensions { .. })));

        let mut l = minimal();
        l.entities[0].x = f32::INFINITY;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::NonFinitePosition { index: 0 })));

        let mut l = minimal();
        l.entities[0].y = GROUND_Y - 5.0;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::BelowGround { .. })));

        let mut l = minimal();
        l.entities[0].stack_parent = Some(0);
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::BadStackParent { index: 0, parent: 0 })));

        let mut l = minimal();
        l.max_attempts = 0;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::ZeroAttempts)));

        let mut l = minimal();
        l.slingshot.max_drag_radius = 0.0;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::BadDragRadius(_))));

        let mut l = minimal();
        l.gravity_scale = -1.0;
        assert!(matches!(l.resolve(GROUND_Y), Err(LayoutError::BadGravityScale(_))));
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "name": "custom",
            "entities": [
                { "kind": "Crate", "x": 600.0, "y": 50.0, "width": 50.0, "height": 50.0 },
                { "kind": "Pig", "x": 605.0, "y": 0.0, "width": 40.0, "height": 40.0, "stack_parent": 0 }
            ],
            "max_attempts": 2,
            "projectiles": ["Red", "Black"]
        }"#;
        let layout = LevelLayout::from_json(json).unwrap();
        assert_eq!(layout.gravity_scale, 1.0);
        assert_eq!(layout.win_condition, WinCondition::AllPigsDown);
        assert_eq!(layout.slingshot, SlingshotSpec::default());
        assert_eq!(layout.entities[1].stack_parent, Some(0));

        let back = LevelLayout::from_json(&layout.to_json().unwrap()).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(LevelLayout::from_json("{ not json"), Err(LayoutError::Json(_))));
    }
}
