//! Procedurally drawn sprite sheet. One 40 px row per sheet, frames laid out
//! left to right, transparent background.

/// Edge length of one frame cell in pixels.
pub const CELL: u32 = 40;
/// Frames per row (widest sheet is the plumber).
const COLUMNS: u32 = 12;
/// Visible part of a cell; the last pixel column/row is left as a gutter.
pub const SOURCE_EXTENT: f32 = 39.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sheet {
    Plumber,
    Enemy,
    Brick,
    Bee,
}

impl Sheet {
    pub const ALL: [Sheet; 4] = [Sheet::Plumber, Sheet::Enemy, Sheet::Brick, Sheet::Bee];

    pub fn row(self) -> u32 {
        self as u32
    }

    pub fn frames(self) -> u32 {
        match self {
            Sheet::Plumber => 12,
            Sheet::Enemy => 2,
            Sheet::Brick | Sheet::Bee => 1,
        }
    }
}

type Rgba = [u8; 4];

const HAT: Rgba = [206, 40, 40, 255];
const SKIN: Rgba = [250, 200, 150, 255];
const OVERALLS: Rgba = [40, 70, 200, 255];
const SHOE: Rgba = [110, 60, 20, 255];
const EYE: Rgba = [20, 20, 20, 255];
const CAP: Rgba = [150, 80, 30, 255];
const STEM: Rgba = [240, 215, 170, 255];
const BRICK: Rgba = [190, 90, 40, 255];
const MORTAR: Rgba = [90, 40, 20, 255];
const BEE_BODY: Rgba = [250, 200, 30, 255];
const BEE_STRIPE: Rgba = [30, 25, 10, 255];
const WING: Rgba = [225, 240, 255, 200];

/// RGBA8 pixels for the whole sheet, row-major.
pub struct SpriteAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SpriteAtlas {
    pub fn generate() -> Self {
        let width = COLUMNS * CELL;
        let height = Sheet::ALL.len() as u32 * CELL;
        let mut atlas = Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        };

        for sheet in Sheet::ALL {
            for frame in 0..sheet.frames() {
                match sheet {
                    Sheet::Plumber => atlas.draw_plumber(frame),
                    Sheet::Enemy => atlas.draw_enemy(frame),
                    Sheet::Brick => atlas.draw_brick(),
                    Sheet::Bee => atlas.draw_bee(),
                }
            }
        }
        atlas
    }

    /// Source rectangle `[x, y, w, h]` in atlas pixels for a frame whose
    /// left edge sits `x_offset` pixels into the sheet's row.
    pub fn source_rect(&self, sheet: Sheet, x_offset: f32) -> [f32; 4] {
        [
            x_offset,
            (sheet.row() * CELL) as f32,
            SOURCE_EXTENT,
            SOURCE_EXTENT,
        ]
    }

    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    fn cell_origin(sheet: Sheet, frame: u32) -> (i32, i32) {
        ((frame * CELL) as i32, (sheet.row() * CELL) as i32)
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    /// Fill a rect given in cell-local coordinates, clipped to the cell.
    fn fill(&mut self, origin: (i32, i32), x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let edge = CELL as i32 - 1;
        for py in y.max(0)..(y + h).min(edge) {
            for px in x.max(0)..(x + w).min(edge) {
                self.put(origin.0 + px, origin.1 + py, color);
            }
        }
    }

    fn fill_ellipse(&mut self, origin: (i32, i32), cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba) {
        let edge = CELL as i32 - 1;
        for py in 0..edge {
            for px in 0..edge {
                let dx = (px as f32 + 0.5 - cx) / rx;
                let dy = (py as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.put(origin.0 + px, origin.1 + py, color);
                }
            }
        }
    }

    fn draw_plumber(&mut self, frame: u32) {
        let o = Self::cell_origin(Sheet::Plumber, frame);
        let faces_left = (1..=5).contains(&frame) || frame >= 10;
        let airborne = frame == 0 || frame == 11;
        // -1 facing left, +1 facing right.
        let dir = if faces_left { -1 } else { 1 };

        // Hat with a brim on the facing side.
        self.fill(o, 12, 3, 16, 6, HAT);
        self.fill(o, if faces_left { 7 } else { 24 }, 7, 9, 2, HAT);

        // Head, eye toward the facing side.
        self.fill(o, 13, 9, 14, 9, SKIN);
        self.fill(o, 20 + dir * 3, 11, 2, 3, EYE);

        // Shirt and overalls.
        self.fill(o, 11, 18, 18, 7, HAT);
        self.fill(o, 13, 22, 14, 8, OVERALLS);

        if airborne {
            // Arms up, legs tucked.
            self.fill(o, 7, 12, 4, 8, SKIN);
            self.fill(o, 29, 12, 4, 8, SKIN);
            self.fill(o, 12, 30, 7, 4, OVERALLS);
            self.fill(o, 21, 30, 7, 4, OVERALLS);
            self.fill(o, 11, 34, 8, 3, SHOE);
            self.fill(o, 21, 34, 8, 3, SHOE);
            return;
        }

        // Four-phase stride: legs swing apart and back.
        let stride = match frame % 4 {
            0 => 0,
            1 => 3,
            2 => 5,
            _ => 2,
        };
        self.fill(o, 14 - stride, 30, 5, 6, OVERALLS);
        self.fill(o, 21 + stride, 30, 5, 6, OVERALLS);
        self.fill(o, 13 - stride + dir, 36, 7, 3, SHOE);
        self.fill(o, 20 + stride + dir, 36, 7, 3, SHOE);
    }

    fn draw_enemy(&mut self, frame: u32) {
        let o = Self::cell_origin(Sheet::Enemy, frame);
        self.fill_ellipse(o, 19.5, 15.0, 16.0, 11.0, CAP);
        self.fill(o, 12, 20, 16, 10, STEM);
        self.fill(o, 14, 14, 3, 5, EYE);
        self.fill(o, 23, 14, 3, 5, EYE);

        // Feet alternate between the two frames.
        let (left, right) = if frame == 0 { (8, 22) } else { (10, 20) };
        self.fill(o, left, 30, 9, 6, SHOE);
        self.fill(o, right, 30 + (frame as i32 * 2), 9, 6 - (frame as i32 * 2), SHOE);
    }

    fn draw_brick(&mut self) {
        let o = Self::cell_origin(Sheet::Brick, 0);
        self.fill(o, 0, 0, CELL as i32, CELL as i32, MORTAR);
        for (row, y) in [0, 10, 20, 30].into_iter().enumerate() {
            let shift = if row % 2 == 0 { 0 } else { 10 };
            for x in [-10, 10, 30] {
                self.fill(o, x + shift + 1, y + 1, 18, 8, BRICK);
            }
        }
    }

    fn draw_bee(&mut self) {
        let o = Self::cell_origin(Sheet::Bee, 0);
        // Wings first so the body overlaps them. Head points up.
        self.fill_ellipse(o, 11.0, 17.0, 7.0, 5.0, WING);
        self.fill_ellipse(o, 28.0, 17.0, 7.0, 5.0, WING);
        self.fill_ellipse(o, 19.5, 21.0, 7.0, 13.0, BEE_BODY);
        for y in [17, 23, 29] {
            self.fill(o, 13, y, 14, 3, BEE_STRIPE);
        }
        self.fill_ellipse(o, 19.5, 8.0, 4.0, 4.0, BEE_STRIPE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_has_one_row_per_sheet() {
        let atlas = SpriteAtlas::generate();
        assert_eq!(atlas.width, 480);
        assert_eq!(atlas.height, 160);
        assert_eq!(atlas.pixels.len(), 480 * 160 * 4);
    }

    #[test]
    fn gutters_stay_transparent() {
        let atlas = SpriteAtlas::generate();
        for sheet in Sheet::ALL {
            let y = sheet.row() * CELL + CELL - 1;
            for x in 0..atlas.width {
                assert_eq!(atlas.pixel(x, y)[3], 0, "{sheet:?} gutter at x={x}");
            }
        }
    }

    #[test]
    fn every_frame_has_ink() {
        let atlas = SpriteAtlas::generate();
        for sheet in Sheet::ALL {
            for frame in 0..sheet.frames() {
                let (ox, oy) = SpriteAtlas::cell_origin(sheet, frame);
                let inked = (0..CELL).any(|y| {
                    (0..CELL).any(|x| atlas.pixel(ox as u32 + x, oy as u32 + y)[3] > 0)
                });
                assert!(inked, "{sheet:?} frame {frame} is blank");
            }
        }
    }

    #[test]
    fn source_rect_uses_sheet_row() {
        let atlas = SpriteAtlas::generate();
        assert_eq!(
            atlas.source_rect(Sheet::Enemy, 40.0),
            [40.0, 40.0, SOURCE_EXTENT, SOURCE_EXTENT]
        );
        assert_eq!(atlas.source_rect(Sheet::Bee, 0.0)[1], 120.0);
    }
}
