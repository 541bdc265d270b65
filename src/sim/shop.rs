//! Item shop: catalog, purchases and the modal overlay's click regions

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::rect::Rect;
use crate::rules::Ruleset;

/// Overlay panel
pub const SHOP_PANEL: Rect = Rect::new(150.0, 50.0, 500.0, 500.0);
/// Close button in the panel's top-right corner
pub const SHOP_CLOSE_BUTTON: Rect = Rect::new(600.0, 60.0, 40.0, 40.0);
pub const SHOP_ITEM_WIDTH: f32 = 400.0;
pub const SHOP_ITEM_HEIGHT: f32 = 70.0;

/// Purchasable upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// +2 horizontal speed
    Speed,
    /// Jump strength -3 (higher jumps)
    Jump,
    /// +1 shield charge
    Shield,
    /// Unlocks the block stance
    BlockSkill,
    /// Unlocks the flash step
    FlashStep,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Speed => "Speed Up",
            ItemKind::Jump => "High Jump",
            ItemKind::Shield => "Shield x1 [X]",
            ItemKind::BlockSkill => "BLOCK [F]",
            ItemKind::FlashStep => "Flash Step [B]",
        }
    }

    pub fn cost(&self) -> i64 {
        match self {
            ItemKind::Speed => 500,
            ItemKind::Jump => 800,
            ItemKind::Shield => 1000,
            ItemKind::BlockSkill => 1200,
            ItemKind::FlashStep => 3567,
        }
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    /// Not enough credits
    InsufficientFunds { cost: i64, score: i64 },
    /// One-time item already bought
    AlreadyOwned(ItemKind),
    /// Index past the end of the catalog
    NoSuchItem(usize),
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientFunds { cost, score } => {
                write!(f, "costs {cost} credits, only {score} available")
            }
            PurchaseError::AlreadyOwned(item) => write!(f, "{} already owned", item.name()),
            PurchaseError::NoSuchItem(index) => write!(f, "no shop item at slot {index}"),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Result of a click while the shop is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopClick {
    /// Shop closed, or the click missed every control
    Ignored,
    /// Close button pressed
    Closed,
    Purchased(ItemKind),
    Rejected(PurchaseError),
}

/// Vertical placement of the item rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShopLayout {
    /// Offset of the first row below the panel top
    pub first_row: f32,
    /// Distance between row tops
    pub row_pitch: f32,
}

impl ShopLayout {
    pub fn from_rules(rules: &Ruleset) -> Self {
        Self {
            first_row: rules.shop_first_row,
            row_pitch: rules.shop_row_pitch,
        }
    }
}

/// Shop inventory and the abilities it has granted this session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub items: Vec<ItemKind>,
    pub layout: ShopLayout,
    pub is_open: bool,
    pub shield_count: u32,
    pub has_block_skill: bool,
    pub has_flash_step: bool,
    /// Doubles positive coin rewards; no catalog item grants it yet
    pub double_score_active: bool,
    block_skill_once: bool,
}

impl Shop {
    pub fn new(rules: &Ruleset) -> Self {
        let mut items = vec![
            ItemKind::Speed,
            ItemKind::Jump,
            ItemKind::Shield,
            ItemKind::BlockSkill,
        ];
        if rules.flash_step_in_shop {
            items.push(ItemKind::FlashStep);
        }
        Self {
            items,
            layout: ShopLayout::from_rules(rules),
            is_open: false,
            shield_count: 0,
            has_block_skill: false,
            has_flash_step: false,
            double_score_active: false,
            block_skill_once: rules.block_skill_once,
        }
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
        log::debug!("Shop {}", if self.is_open { "opened" } else { "closed" });
    }

    /// Forget every granted ability; the catalog and open state stay
    pub fn reset(&mut self) {
        self.shield_count = 0;
        self.has_block_skill = false;
        self.has_flash_step = false;
        self.double_score_active = false;
    }

    /// Row rect for catalog slot `index`
    pub fn item_rect(&self, index: usize) -> Rect {
        Rect::new(
            SHOP_PANEL.x + 50.0,
            SHOP_PANEL.y + self.layout.first_row + index as f32 * self.layout.row_pitch,
            SHOP_ITEM_WIDTH,
            SHOP_ITEM_HEIGHT,
        )
    }

    /// Whether a one-time item shows as owned
    pub fn is_owned(&self, item: ItemKind) -> bool {
        item == ItemKind::BlockSkill && self.block_skill_once && self.has_block_skill
    }

    /// Buy slot `index`, deducting its cost from `score`
    pub fn purchase(
        &mut self,
        index: usize,
        score: &mut i64,
        player: &mut Player,
    ) -> Result<ItemKind, PurchaseError> {
        let item = *self.items.get(index).ok_or(PurchaseError::NoSuchItem(index))?;
        let cost = item.cost();
        if *score < cost {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                score: *score,
            });
        }
        if self.is_owned(item) {
            return Err(PurchaseError::AlreadyOwned(item));
        }

        *score -= cost;
        match item {
            ItemKind::Speed => player.speed += 2.0,
            ItemKind::Jump => player.jump_strength -= 3.0,
            ItemKind::Shield => self.shield_count += 1,
            ItemKind::BlockSkill => self.has_block_skill = true,
            ItemKind::FlashStep => self.has_flash_step = true,
        }
        log::info!("Bought {} for {cost} ({} left)", item.name(), *score);
        Ok(item)
    }

    /// Route a click on the open overlay
    pub fn handle_click(&mut self, pos: Vec2, score: &mut i64, player: &mut Player) -> ShopClick {
        if !self.is_open {
            return ShopClick::Ignored;
        }
        if SHOP_CLOSE_BUTTON.contains_point(pos) {
            self.is_open = false;
            return ShopClick::Closed;
        }
        let Some(index) = (0..self.items.len()).find(|&i| self.item_rect(i).contains_point(pos))
        else {
            return ShopClick::Ignored;
        };
        match self.purchase(index, score, player) {
            Ok(item) => ShopClick::Purchased(item),
            Err(err) => {
                log::debug!("Purchase rejected: {err}");
                ShopClick::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open_shop(rules: &Ruleset) -> Shop {
        let mut shop = Shop::new(rules);
        shop.toggle();
        shop
    }

    #[test]
    fn test_catalog_per_variant() {
        let classic = Shop::new(&Ruleset::classic());
        assert_eq!(classic.items.len(), 5);
        assert_eq!(classic.items[4], ItemKind::FlashStep);

        let evolution = Shop::new(&Ruleset::evolution());
        assert_eq!(evolution.items.len(), 4);
        assert!(!evolution.items.contains(&ItemKind::FlashStep));
    }

    #[test]
    fn test_purchase_applies_effects() {
        let mut shop = Shop::new(&Ruleset::classic());
        let mut player = Player::new("player");
        let mut score = 10_000;

        assert_eq!(shop.purchase(0, &mut score, &mut player), Ok(ItemKind::Speed));
        assert_eq!(player.speed, 9.0);
        assert_eq!(shop.purchase(1, &mut score, &mut player), Ok(ItemKind::Jump));
        assert_eq!(player.jump_strength, -18.0);
        assert_eq!(shop.purchase(2, &mut score, &mut player), Ok(ItemKind::Shield));
        assert_eq!(shop.shield_count, 1);
        assert_eq!(shop.purchase(3, &mut score, &mut player), Ok(ItemKind::BlockSkill));
        assert!(shop.has_block_skill);
        assert_eq!(shop.purchase(4, &mut score, &mut player), Ok(ItemKind::FlashStep));
        assert!(shop.has_flash_step);
        assert_eq!(score, 10_000 - 500 - 800 - 1000 - 1200 - 3567);
    }

    #[test]
    fn test_block_skill_once() {
        let mut player = Player::new("player");
        let mut score = 5000;

        let mut evolution = Shop::new(&Ruleset::evolution());
        evolution.purchase(3, &mut score, &mut player).unwrap();
        assert_eq!(
            evolution.purchase(3, &mut score, &mut player),
            Err(PurchaseError::AlreadyOwned(ItemKind::BlockSkill))
        );
        assert_eq!(score, 3800);

        // Classic lets you pay twice
        let mut classic = Shop::new(&Ruleset::classic());
        classic.purchase(3, &mut score, &mut player).unwrap();
        classic.purchase(3, &mut score, &mut player).unwrap();
        assert_eq!(score, 1400);
    }

    #[test]
    fn test_no_such_item() {
        let mut shop = Shop::new(&Ruleset::evolution());
        let mut player = Player::new("player");
        let mut score = 10_000;
        assert_eq!(
            shop.purchase(4, &mut score, &mut player),
            Err(PurchaseError::NoSuchItem(4))
        );
        assert_eq!(score, 10_000);
    }

    #[test]
    fn test_clicks() {
        let rules = Ruleset::classic();
        let mut shop = Shop::new(&rules);
        let mut player = Player::new("player");
        let mut score = 1000;

        // Closed shop ignores everything
        let shield_row = shop.item_rect(2).center();
        assert_eq!(
            shop.handle_click(shield_row, &mut score, &mut player),
            ShopClick::Ignored
        );

        shop.toggle();
        assert_eq!(
            shop.handle_click(shield_row, &mut score, &mut player),
            ShopClick::Purchased(ItemKind::Shield)
        );
        assert_eq!(score, 0);
        assert!(matches!(
            shop.handle_click(shield_row, &mut score, &mut player),
            ShopClick::Rejected(PurchaseError::InsufficientFunds { .. })
        ));
        assert_eq!(
            shop.handle_click(Vec2::new(5.0, 5.0), &mut score, &mut player),
            ShopClick::Ignored
        );
        assert_eq!(
            shop.handle_click(SHOP_CLOSE_BUTTON.center(), &mut score, &mut player),
            ShopClick::Closed
        );
        assert!(!shop.is_open);
    }

    #[test]
    fn test_rows_follow_layout() {
        let classic = Shop::new(&Ruleset::classic());
        assert_eq!(classic.item_rect(1), Rect::new(200.0, 210.0, 400.0, 70.0));
        let evolution = Shop::new(&Ruleset::evolution());
        assert_eq!(evolution.item_rect(1), Rect::new(200.0, 235.0, 400.0, 70.0));

        // Layout comes from the rule fields, not the variant tag
        let mut rules = Ruleset::evolution();
        rules.shop_first_row = 80.0;
        rules.shop_row_pitch = 80.0;
        let custom = Shop::new(&rules);
        assert_eq!(custom.item_rect(1), Rect::new(200.0, 210.0, 400.0, 70.0));
    }

    #[test]
    fn test_reset_keeps_catalog() {
        let mut shop = open_shop(&Ruleset::classic());
        shop.shield_count = 3;
        shop.has_flash_step = true;
        shop.reset();
        assert_eq!(shop.shield_count, 0);
        assert!(!shop.has_flash_step);
        assert_eq!(shop.items.len(), 5);
    }

    #[test]
    fn test_error_messages() {
        let err = PurchaseError::InsufficientFunds {
            cost: 800,
            score: 300,
        };
        assert_eq!(err.to_string(), "costs 800 credits, only 300 available");
        assert_eq!(
            PurchaseError::AlreadyOwned(ItemKind::BlockSkill).to_string(),
            "BLOCK [F] already owned"
        );
    }

    proptest! {
        #[test]
        fn prop_unaffordable_purchase_rejected(index in 0usize..5, score in -5000i64..5000) {
            let mut shop = Shop::new(&Ruleset::classic());
            let mut player = Player::new("player");
            let cost = shop.items[index].cost();
            let mut balance = score;
            let result = shop.purchase(index, &mut balance, &mut player);
            if score < cost {
                prop_assert_eq!(result, Err(PurchaseError::InsufficientFunds { cost, score }));
                prop_assert_eq!(balance, score);
                prop_assert_eq!(shop.shield_count, 0);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(balance, score - cost);
            }
        }
    }
}
