//! Static cosmetic catalog
//!
//! Looked up by the renderer for the locally-equipped skin. Purchases and
//! inventory live behind the stats backend; the catalog itself ships with
//! the client.

/// One purchasable character skin
#[derive(Debug, Clone, Copy)]
pub struct CharacterSkin {
    pub id: &'static str,
    pub name: &'static str,
    /// Armor tint, 0xRRGGBB
    pub color: u32,
    pub cost_coins: u32,
    pub cost_diamonds: u32,
}

pub const SKINS: &[CharacterSkin] = &[
    CharacterSkin {
        id: "default",
        name: "Standard Issue",
        color: 0x991b1b,
        cost_coins: 0,
        cost_diamonds: 0,
    },
    CharacterSkin {
        id: "arctic",
        name: "Arctic Recon",
        color: 0xcbd5e1,
        cost_coins: 400,
        cost_diamonds: 0,
    },
    CharacterSkin {
        id: "jungle",
        name: "Jungle Fang",
        color: 0x166534,
        cost_coins: 400,
        cost_diamonds: 0,
    },
    CharacterSkin {
        id: "phantom",
        name: "Phantom Ops",
        color: 0x18181b,
        cost_coins: 1_200,
        cost_diamonds: 0,
    },
    CharacterSkin {
        id: "royal",
        name: "Royal Guard",
        color: 0x6d28d9,
        cost_coins: 0,
        cost_diamonds: 20,
    },
    CharacterSkin {
        id: "goldplate",
        name: "Gold Plate",
        color: 0xca8a04,
        cost_coins: 0,
        cost_diamonds: 50,
    },
];

pub fn skin_by_id(id: &str) -> Option<&'static CharacterSkin> {
    SKINS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_resolvable() {
        for skin in SKINS {
            assert_eq!(skin_by_id(skin.id).map(|s| s.name), Some(skin.name));
        }
        let mut ids: Vec<&str> = SKINS.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), SKINS.len());
    }

    #[test]
    fn unknown_skin_is_none() {
        assert!(skin_by_id("no_such_skin").is_none());
    }
}
