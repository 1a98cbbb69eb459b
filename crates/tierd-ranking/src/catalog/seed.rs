//! Built-in seed catalog used before (or instead of) a fetched catalog.

use crate::catalog::{Category, Product};
use crate::money::Money;

/// 2024-01-01T00:00:00Z, the listing date of the seed entries.
const SEED_EPOCH: i64 = 1_704_067_200;
const DAY: i64 = 86_400;

struct SeedEntry {
    id: &'static str,
    name: &'static str,
    category: Category,
    price_cents: i64,
    upvotes: u64,
    downvotes: u64,
    listed_day: i64,
    description: &'static str,
}

const SEED: &[SeedEntry] = &[
    SeedEntry {
        id: "logitech-g-pro-x-superlight-2",
        name: "Logitech G Pro X Superlight 2",
        category: Category::Mouse,
        price_cents: 15999,
        upvotes: 412,
        downvotes: 38,
        listed_day: 0,
        description: "60g wireless esports mouse with HERO 2 sensor",
    },
    SeedEntry {
        id: "razer-viper-v3-pro",
        name: "Razer Viper V3 Pro",
        category: Category::Mouse,
        price_cents: 15999,
        upvotes: 287,
        downvotes: 31,
        listed_day: 120,
        description: "Symmetrical 54g wireless mouse with 8K polling",
    },
    SeedEntry {
        id: "zowie-ec2-cw",
        name: "Zowie EC2-CW",
        category: Category::Mouse,
        price_cents: 14999,
        upvotes: 96,
        downvotes: 22,
        listed_day: 30,
        description: "Ergonomic wireless mouse with receiver dock",
    },
    SeedEntry {
        id: "wooting-60he",
        name: "Wooting 60HE+",
        category: Category::Keyboard,
        price_cents: 17499,
        upvotes: 355,
        downvotes: 19,
        listed_day: 10,
        description: "60% analog keyboard with Lekker Hall-effect switches",
    },
    SeedEntry {
        id: "keychron-q1-pro",
        name: "Keychron Q1 Pro",
        category: Category::Keyboard,
        price_cents: 19900,
        upvotes: 141,
        downvotes: 27,
        listed_day: 45,
        description: "75% aluminium wireless mechanical keyboard",
    },
    SeedEntry {
        id: "steelseries-apex-pro-tkl",
        name: "SteelSeries Apex Pro TKL",
        category: Category::Keyboard,
        price_cents: 18999,
        upvotes: 88,
        downvotes: 34,
        listed_day: 60,
        description: "Tenkeyless keyboard with adjustable OmniPoint switches",
    },
    SeedEntry {
        id: "hyperx-cloud-ii",
        name: "HyperX Cloud II",
        category: Category::Headset,
        price_cents: 9999,
        upvotes: 203,
        downvotes: 41,
        listed_day: 5,
        description: "Wired headset with virtual 7.1 surround",
    },
    SeedEntry {
        id: "audeze-maxwell",
        name: "Audeze Maxwell",
        category: Category::Headset,
        price_cents: 29900,
        upvotes: 77,
        downvotes: 6,
        listed_day: 150,
        description: "Planar magnetic wireless gaming headset",
    },
    SeedEntry {
        id: "asus-rog-swift-pg27aqdm",
        name: "ASUS ROG Swift PG27AQDM",
        category: Category::Monitor,
        price_cents: 89999,
        upvotes: 64,
        downvotes: 12,
        listed_day: 90,
        description: "27-inch 1440p 240Hz OLED monitor",
    },
    SeedEntry {
        id: "artisan-zero-soft",
        name: "Artisan Ninja FX Zero Soft",
        category: Category::Mousepad,
        price_cents: 5500,
        upvotes: 118,
        downvotes: 9,
        listed_day: 20,
        description: "Balanced control/speed cloth mousepad",
    },
    SeedEntry {
        id: "xbox-elite-series-2",
        name: "Xbox Elite Series 2",
        category: Category::Controller,
        price_cents: 17999,
        upvotes: 52,
        downvotes: 47,
        listed_day: 15,
        description: "Pro controller with adjustable tension thumbsticks",
    },
    SeedEntry {
        id: "shure-mv7-plus",
        name: "Shure MV7+",
        category: Category::Microphone,
        price_cents: 27900,
        upvotes: 0,
        downvotes: 0,
        listed_day: 200,
        description: "Hybrid XLR/USB podcast microphone",
    },
];

/// The built-in catalog, unranked and with no session votes.
///
/// Identifiers and listing dates are fixed so rankings over the seed list
/// are reproducible.
pub fn seed_catalog() -> Vec<Product> {
    SEED.iter()
        .map(|entry| {
            Product::new(entry.name, entry.id, entry.category)
                .with_id(entry.id)
                .with_description(entry.description)
                .with_price(Money::usd(entry.price_cents))
                .with_image_url(format!("/images/products/{}.webp", entry.id))
                .with_votes(entry.upvotes, entry.downvotes)
                .with_created_at(SEED_EPOCH + entry.listed_day * DAY)
        })
        .collect()
}
