#![allow(dead_code)]

use trussbridge::{point, Bridge, DesignConditions};

/// Five panel site, standard truck, medium-strength deck.
pub const STANDARD_SITE: u64 = 1_050_800_000;
/// Five panel site, heavy truck, medium-strength deck.
pub const HEAVY_SITE: u64 = 2_050_800_000;

/// Stock used for every member of a truss.
#[derive(Clone, Copy, Debug)]
pub struct Stock {
    pub material: usize,
    pub section: usize,
    pub size: usize,
}

/// High-strength 240 mm tubes.
pub const STRONG: Stock = Stock {
    material: 1,
    section: 1,
    size: 24,
};

/// Carbon steel 70 mm tubes, slender enough to pass but far too weak.
pub const WEAK: Stock = Stock {
    material: 0,
    section: 1,
    size: 8,
};

/// A five panel Warren truss with top joints 4 m above the deck.
///
/// 11 joints and 19 members over 3 restraints, so it is just determinate.
pub fn warren(code: u64, stock: Stock) -> Bridge {
    let conditions = DesignConditions::from_key_code(code).expect("valid site");
    let mut bridge = Bridge::new(conditions);
    let top: Vec<usize> = (0..5)
        .map(|i| bridge.add_joint(point(4.0 * i as f64 + 2.0, 4.0)))
        .collect();
    let mut add = |a: usize, b: usize| {
        bridge
            .add_member(a, b, stock.material, stock.section, stock.size)
            .expect("valid member");
    };
    for i in 0..5 {
        add(i, i + 1);
        add(i, top[i]);
        add(top[i], i + 1);
    }
    for pair in top.windows(2) {
        add(pair[0], pair[1]);
    }
    bridge
}
