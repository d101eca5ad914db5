use serde::{Deserialize, Serialize};

/// Texture units a backend binds. All three come from one source image,
/// tinted per slot at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    Stone,
    Grass,
    Slate,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [Self::Stone, Self::Grass, Self::Slate];

    /// Sampler unit index.
    pub fn unit(self) -> u32 {
        match self {
            Self::Stone => 0,
            Self::Grass => 1,
            Self::Slate => 2,
        }
    }

    /// RGB multipliers applied to the source image for this slot.
    pub fn tint(self) -> [f32; 3] {
        match self {
            Self::Stone => [1.0, 1.0, 1.0],
            Self::Grass => [0.7, 1.2, 0.7],
            Self::Slate => [0.9, 0.9, 0.9],
        }
    }
}

/// How a volume is shaded: `mix(base_color, texture, texture_weight)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub texture: TextureSlot,
    pub base_color: [f32; 4],
    pub texture_weight: f32,
}

impl Surface {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Fully textured.
    pub fn textured(texture: TextureSlot) -> Self {
        Self {
            texture,
            base_color: Self::WHITE,
            texture_weight: 1.0,
        }
    }

    /// Flat color, texture ignored.
    pub fn solid(base_color: [f32; 4]) -> Self {
        Self {
            texture: TextureSlot::Stone,
            base_color,
            texture_weight: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_distinct() {
        let mut units: Vec<u32> = TextureSlot::ALL.iter().map(|t| t.unit()).collect();
        units.dedup();
        assert_eq!(units, vec![0, 1, 2]);
    }

    #[test]
    fn grass_tint_boosts_green_only() {
        let [r, g, b] = TextureSlot::Grass.tint();
        assert!(g > 1.0 && r < 1.0 && b < 1.0);
        assert_eq!(TextureSlot::Stone.tint(), [1.0; 3]);
        assert!(TextureSlot::Slate.tint().iter().all(|&c| c < 1.0));
    }

    #[test]
    fn solid_surface_ignores_texture() {
        let s = Surface::solid([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(s.texture_weight, 0.0);
        assert_eq!(Surface::textured(TextureSlot::Grass).texture_weight, 1.0);
    }
}
