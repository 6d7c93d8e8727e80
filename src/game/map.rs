//! Static obstacle layouts
//!
//! Walls are immutable for the duration of a round and come from a fixed
//! catalog; the layout rotates with the round number.

/// Axis-aligned obstacle rectangle with a cosmetic base color (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: u32,
}

impl Wall {
    const fn new(x: f32, y: f32, w: f32, h: f32, color: u32) -> Self {
        Self { x, y, w, h, color }
    }

    /// Point-containment test used for bullet impacts
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x > self.x && x < self.x + self.w && y > self.y && y < self.y + self.h
    }
}

const SLATE: u32 = 0x334155;
const STEEL: u32 = 0x475569;
const DARK: u32 = 0x1e293b;
const AMBER: u32 = 0xf59e0b;

// CQC killhouse
const KILLHOUSE: [Wall; 7] = [
    Wall::new(250.0, 150.0, 40.0, 500.0, SLATE),
    Wall::new(910.0, 150.0, 40.0, 500.0, SLATE),
    Wall::new(500.0, 350.0, 200.0, 100.0, STEEL),
    Wall::new(550.0, 60.0, 100.0, 60.0, SLATE),
    Wall::new(550.0, 680.0, 100.0, 60.0, SLATE),
    Wall::new(400.0, 100.0, 20.0, 120.0, DARK),
    Wall::new(780.0, 580.0, 20.0, 120.0, DARK),
];

// Industrial corridor
const CORRIDOR: [Wall; 5] = [
    Wall::new(0.0, 200.0, 400.0, 40.0, SLATE),
    Wall::new(800.0, 560.0, 400.0, 40.0, SLATE),
    Wall::new(580.0, 100.0, 40.0, 600.0, STEEL),
    Wall::new(200.0, 400.0, 100.0, 100.0, DARK),
    Wall::new(900.0, 300.0, 100.0, 100.0, DARK),
];

// The lab
const LAB: [Wall; 6] = [
    Wall::new(200.0, 200.0, 800.0, 20.0, STEEL),
    Wall::new(200.0, 580.0, 800.0, 20.0, STEEL),
    Wall::new(590.0, 0.0, 20.0, 250.0, SLATE),
    Wall::new(590.0, 550.0, 20.0, 250.0, SLATE),
    Wall::new(350.0, 380.0, 100.0, 40.0, DARK),
    Wall::new(750.0, 380.0, 100.0, 40.0, DARK),
];

// Central command, the amber block is the power core
const COMMAND: [Wall; 5] = [
    Wall::new(500.0, 0.0, 200.0, 150.0, SLATE),
    Wall::new(500.0, 650.0, 200.0, 150.0, SLATE),
    Wall::new(0.0, 350.0, 300.0, 100.0, STEEL),
    Wall::new(900.0, 350.0, 300.0, 100.0, STEEL),
    Wall::new(580.0, 380.0, 40.0, 40.0, AMBER),
];

// Bridge crossing
const BRIDGE: [Wall; 5] = [
    Wall::new(0.0, 0.0, 1200.0, 250.0, DARK),
    Wall::new(0.0, 550.0, 1200.0, 250.0, DARK),
    Wall::new(200.0, 250.0, 40.0, 300.0, STEEL),
    Wall::new(960.0, 250.0, 40.0, 300.0, STEEL),
    Wall::new(550.0, 380.0, 100.0, 40.0, SLATE),
];

pub const LAYOUT_COUNT: usize = 5;

static LAYOUTS: [&[Wall]; LAYOUT_COUNT] = [&KILLHOUSE, &CORRIDOR, &LAB, &COMMAND, &BRIDGE];

/// Layout for a 1-based round number; rotates through the catalog
pub fn layout_for_round(round: u32) -> &'static [Wall] {
    LAYOUTS[(round.saturating_sub(1) as usize) % LAYOUT_COUNT]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{WORLD_HEIGHT, WORLD_WIDTH};

    #[test]
    fn catalog_rects_are_well_formed() {
        for layout in LAYOUTS {
            for wall in &*layout {
                assert!(wall.w > 0.0 && wall.h > 0.0);
                assert!(wall.x >= 0.0 && wall.y >= 0.0);
                assert!(wall.x + wall.w <= WORLD_WIDTH);
                assert!(wall.y + wall.h <= WORLD_HEIGHT);
            }
        }
    }

    #[test]
    fn layout_selection_rotates() {
        assert_eq!(layout_for_round(1), LAYOUTS[0]);
        assert_eq!(layout_for_round(5), LAYOUTS[4]);
        assert_eq!(layout_for_round(6), LAYOUTS[0]);
        // round 0 is not a real round but must not panic
        assert_eq!(layout_for_round(0), LAYOUTS[0]);
    }

    #[test]
    fn contains_is_exclusive_of_edges() {
        let wall = Wall::new(100.0, 100.0, 50.0, 50.0, SLATE);
        assert!(wall.contains(125.0, 125.0));
        assert!(!wall.contains(100.0, 125.0));
        assert!(!wall.contains(150.0, 125.0));
        assert!(!wall.contains(125.0, 99.0));
    }
}
