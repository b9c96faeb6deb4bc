//! Built-in menu (dimsum packs, party boxes, bouquet) and add-ons

use shared::models::{AdditionalItem, Ingredient, MenuItem, Variant};
use std::collections::BTreeMap;

pub const AYAM: &str = "ayam";
pub const JAMUR: &str = "jamur";

fn pack(
    id: &str,
    name: &str,
    pack_size: u32,
    variant: Variant,
    (ayam, jamur): (u64, u64),
    price: i64,
    prep_time: u32,
) -> MenuItem {
    let composition = BTreeMap::from([(Ingredient::from(AYAM), ayam), (Ingredient::from(JAMUR), jamur)]);
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        pack_size,
        variant,
        composition,
        price,
        prep_time,
        available: true,
    }
}

pub fn menu_items() -> Vec<MenuItem> {
    vec![
        // Pack 4 & 6
        pack("pack_4_ayam", "Pack 4 - Demen Ayam", 4, Variant::Ayam, (4, 0), 14000, 10),
        pack("pack_4_jamur", "Pack 4 - Demen Jamur", 4, Variant::Jamur, (0, 4), 16000, 10),
        pack("pack_4_mix", "Pack 4 - Mix", 4, Variant::Mix, (2, 2), 15000, 10),
        pack("pack_6_ayam", "Pack 6 - Demen Ayam", 6, Variant::Ayam, (6, 0), 22000, 12),
        pack("pack_6_jamur", "Pack 6 - Demen Jamur", 6, Variant::Jamur, (0, 6), 24000, 12),
        pack("pack_6_mix", "Pack 6 - Mix", 6, Variant::Mix, (3, 3), 23000, 12),
        // Dimsum Party (isi 16)
        pack("party_16_ayam", "Dimsum Party (16) - Ayam", 16, Variant::Ayam, (16, 0), 62000, 20),
        pack("party_16_jamur", "Dimsum Party (16) - Jamur", 16, Variant::Jamur, (0, 16), 65000, 20),
        pack("party_16_mix", "Dimsum Party (16) - Mix", 16, Variant::Mix, (8, 8), 63000, 20),
        // Bouquet (isi 14)
        pack("bouquet_14", "Dimsum Bouquet (14)", 14, Variant::Mix, (7, 7), 100000, 30),
    ]
}

pub fn additional_items() -> Vec<AdditionalItem> {
    let add = |id: &str, name: &str, price: i64| AdditionalItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
    };
    vec![
        add("potato_crunch", "Potato Crunch", 2500),
        add("chili_oil_25ml", "Chili Oil 25 ml", 2500),
        add("chili_oil_5ml", "Chili Oil 5 ml", 500),
    ]
}
