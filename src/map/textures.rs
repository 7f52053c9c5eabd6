//! Procedural texture tables
//!
//! All textures are generated once at startup from a deterministic-seeded
//! LCG and are immutable afterwards. There is no asset pipeline: every
//! wall material, the floor, and the ceiling are noise-plus-pattern
//! tables keyed by material id.

/// Square texture side length.
pub const TEX_SIZE: usize = 64;

/// Number of wall texture tables (ids 0..=6 for wall codes 1..=7, id 7
/// for door faces).
pub const WALL_TEXTURES: usize = 8;

/// An RGB color. Output buffers are BGRA; `to_bgra` does the swizzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as BGRA bytes with full alpha.
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, 255]
    }

    /// Scale brightness by a factor in [0, 1].
    pub fn scale(self, f: f32) -> Color {
        let f = f.clamp(0.0, 1.0);
        Color {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
        }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (self.r as f32 + (other.r as f32 - self.r as f32) * t) as u8,
            g: (self.g as f32 + (other.g as f32 - self.g as f32) * t) as u8,
            b: (self.b as f32 + (other.b as f32 - self.b as f32) * t) as u8,
        }
    }
}

/// Simple LCG for deterministic pseudo-random texture noise.
#[derive(Debug, Clone)]
pub struct Lcg {
    seed: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Next value in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(1103515245).wrapping_add(12345);
        ((self.seed >> 16) & 0xffff) as f32 / 65536.0
    }

    /// Next value in [0, n).
    pub fn next_range(&mut self, n: usize) -> usize {
        (self.next_f32() * n as f32) as usize % n.max(1)
    }
}

/// A fixed-size square pixel table.
pub struct Texture {
    pixels: Vec<Color>,
}

impl Texture {
    fn from_fn(mut f: impl FnMut(usize, usize) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(TEX_SIZE * TEX_SIZE);
        for y in 0..TEX_SIZE {
            for x in 0..TEX_SIZE {
                pixels.push(f(x, y));
            }
        }
        Self { pixels }
    }

    /// Sample by texel coordinate, wrapping out-of-range addresses.
    pub fn sample(&self, x: usize, y: usize) -> Color {
        self.pixels[(y % TEX_SIZE) * TEX_SIZE + (x % TEX_SIZE)]
    }
}

/// The full set of tables a level renders with.
pub struct TextureSet {
    pub walls: [Texture; WALL_TEXTURES],
    pub floor: Texture,
    pub ceiling: Texture,
}

impl TextureSet {
    /// Generate every table from one seed. Same seed, same pixels.
    pub fn generate(seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        let rivet = Color::new(180, 188, 196);
        let lamp = Color::new(235, 230, 190);
        let walls = [
            // brick
            masonry(&mut rng, Color::new(142, 58, 44), Color::new(60, 56, 52), 8, 16, 4, 0.12),
            // stone blocks
            masonry(&mut rng, Color::new(110, 110, 118), Color::new(70, 70, 76), 16, 21, 7, 0.15),
            // riveted metal plate
            grid_panels(&mut rng, 16, 0.08, |_, _| Color::new(96, 104, 112), move |cx, cy| {
                ((2..4).contains(&cx) && (2..4).contains(&cy)).then_some(rivet)
            }),
            tech_panel(&mut rng),
            hedge(&mut rng),
            rust(&mut rng),
            marble(&mut rng),
            door_face(&mut rng),
        ];
        // checkered floor slabs
        let floor = grid_panels(
            &mut rng,
            16,
            0.1,
            |x, y| {
                if (x / 16 + y / 16) % 2 == 0 {
                    Color::new(88, 84, 78)
                } else {
                    Color::new(62, 60, 58)
                }
            },
            |_, _| None,
        );
        // ceiling with inset lamps
        let ceiling = grid_panels(&mut rng, 32, 0.08, |_, _| Color::new(46, 48, 54), move |cx, cy| {
            ((12..20).contains(&cx) && (12..20).contains(&cy)).then_some(lamp)
        });
        Self {
            walls,
            floor,
            ceiling,
        }
    }

    /// Wall table for a texture id, clamped into range so a bad material
    /// id can never panic the renderer.
    pub fn wall(&self, material: u8) -> &Texture {
        &self.walls[(material as usize).min(WALL_TEXTURES - 1)]
    }
}

fn noise_jitter(rng: &mut Lcg, amount: f32) -> f32 {
    1.0 - amount + rng.next_f32() * amount * 2.0
}

/// Masonry-style table: courses of blocks separated by seams, each
/// course shifted sideways by a running offset.
fn masonry(
    rng: &mut Lcg,
    base: Color,
    seam: Color,
    course: usize,
    run: usize,
    row_shift: usize,
    jitter: f32,
) -> Texture {
    Texture::from_fn(|x, y| {
        if y % course >= course - 1 || (x + y / course * row_shift) % run >= run - 1 {
            seam.scale(noise_jitter(rng, 0.1))
        } else {
            base.scale(noise_jitter(rng, jitter))
        }
    })
}

/// Cell grid with darkened cell edges and an optional fixed feature
/// (rivets, lamps) keyed on cell-local coordinates.
fn grid_panels(
    rng: &mut Lcg,
    cell: usize,
    jitter: f32,
    base: impl Fn(usize, usize) -> Color,
    feature: impl Fn(usize, usize) -> Option<Color>,
) -> Texture {
    Texture::from_fn(|x, y| {
        if let Some(c) = feature(x % cell, y % cell) {
            return c;
        }
        let base = base(x, y);
        if x % cell == 0 || y % cell == 0 {
            base.scale(0.55)
        } else {
            base.scale(noise_jitter(rng, jitter))
        }
    })
}

fn tech_panel(rng: &mut Lcg) -> Texture {
    let base = Color::new(52, 64, 72);
    let light = Color::new(80, 220, 140);
    Texture::from_fn(|x, y| {
        // Blinken-light strip across the middle band
        if (28..36).contains(&y) && x % 8 < 3 {
            let on = rng.next_f32() > 0.4;
            if on {
                light
            } else {
                light.scale(0.25)
            }
        } else if y % 32 < 2 || x % 32 < 2 {
            base.scale(0.55)
        } else {
            base.scale(noise_jitter(rng, 0.1))
        }
    })
}

fn hedge(rng: &mut Lcg) -> Texture {
    let dark = Color::new(24, 66, 28);
    let leaf = Color::new(48, 118, 48);
    Texture::from_fn(|_, _| {
        let t = rng.next_f32();
        dark.lerp(leaf, t * t)
    })
}

fn rust(rng: &mut Lcg) -> Texture {
    let base = Color::new(120, 72, 40);
    let patch = Color::new(70, 44, 30);
    Texture::from_fn(|x, y| {
        let streak = ((x * 13 + y * 5) % 23) as f32 / 23.0;
        let c = base.lerp(patch, streak);
        c.scale(noise_jitter(rng, 0.18))
    })
}

fn marble(rng: &mut Lcg) -> Texture {
    let base = Color::new(208, 204, 196);
    let vein = Color::new(140, 136, 150);
    Texture::from_fn(|x, y| {
        let wave = ((x as f32 * 0.22 + (y as f32 * 0.11).sin() * 4.0).sin() * 0.5 + 0.5).powi(3);
        base.lerp(vein, wave).scale(noise_jitter(rng, 0.04))
    })
}

fn door_face(rng: &mut Lcg) -> Texture {
    let base = Color::new(70, 86, 96);
    let trim = Color::new(190, 160, 60);
    Texture::from_fn(|x, y| {
        // Hazard trim on both edges, brushed panel in between
        if x < 6 || x >= TEX_SIZE - 6 {
            if (x + y) % 12 < 6 {
                trim
            } else {
                Color::new(40, 40, 44)
            }
        } else if y % 21 >= 20 {
            base.scale(0.5)
        } else {
            base.scale(noise_jitter(rng, 0.07))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_generation() {
        let a = TextureSet::generate(0xB0BB1E);
        let b = TextureSet::generate(0xB0BB1E);
        for i in 0..WALL_TEXTURES {
            for y in (0..TEX_SIZE).step_by(7) {
                for x in (0..TEX_SIZE).step_by(7) {
                    assert_eq!(a.walls[i].sample(x, y), b.walls[i].sample(x, y));
                }
            }
        }
        assert_eq!(a.floor.sample(33, 9), b.floor.sample(33, 9));
        assert_eq!(a.ceiling.sample(3, 61), b.ceiling.sample(3, 61));
    }

    #[test]
    fn test_sample_wraps() {
        let set = TextureSet::generate(1);
        let t = &set.floor;
        assert_eq!(t.sample(5, 9), t.sample(5 + TEX_SIZE, 9 + TEX_SIZE * 3));
    }

    #[test]
    fn test_wall_lookup_clamps() {
        let set = TextureSet::generate(1);
        // A bogus material id falls back to the last table instead of panicking
        let _ = set.wall(200).sample(0, 0);
    }

    #[test]
    fn test_lcg_deterministic() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
        let v = a.next_range(10);
        assert!(v < 10);
    }
}
