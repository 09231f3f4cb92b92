//! Store selection contract
//!
//! The mediator only ever sees the outcome; pricing and deduction live
//! behind the catalog seam.

use std::cell::Cell;

use super::model::{BallKind, Model};

/// Result of the store's select action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased,
    InsufficientFunds,
    AlreadyOwned,
}

impl PurchaseOutcome {
    /// User-facing message for the non-navigating outcomes.
    pub fn notice(&self) -> &'static str {
        match self {
            PurchaseOutcome::Purchased => "Selected!",
            PurchaseOutcome::InsufficientFunds => "Not enough stars",
            PurchaseOutcome::AlreadyOwned => "Already owned",
        }
    }
}

/// Pricing/ownership policy behind the select action.
pub trait StoreCatalog {
    /// The variant currently on offer. Paging through offers is not wired
    /// up; the offer is whatever the catalog was configured with.
    fn current_offer(&self) -> BallKind;

    /// Attempt to buy and select the current offer, mutating the model on
    /// success only.
    fn try_select(&self, model: &Model) -> PurchaseOutcome;
}

/// Catalog priced in lifetime stars.
pub struct StarCatalog {
    offer: Cell<BallKind>,
}

impl StarCatalog {
    pub fn new(offer: BallKind) -> Self {
        Self {
            offer: Cell::new(offer),
        }
    }

    pub fn set_offer(&self, kind: BallKind) {
        self.offer.set(kind);
    }

    pub fn price_of(kind: BallKind) -> u64 {
        match kind {
            BallKind::Comet => 0,
            BallKind::Pulsar => 25,
            BallKind::Nova => 60,
        }
    }
}

impl StoreCatalog for StarCatalog {
    fn current_offer(&self) -> BallKind {
        self.offer.get()
    }

    fn try_select(&self, model: &Model) -> PurchaseOutcome {
        let kind = self.offer.get();
        if model.owns_ball(kind) {
            return PurchaseOutcome::AlreadyOwned;
        }
        if !model.spend_stars(Self::price_of(kind)) {
            return PurchaseOutcome::InsufficientFunds;
        }
        model.grant_ball(kind);
        model.select_ball(kind);
        log::info!("purchased {} ball", kind.as_str());
        PurchaseOutcome::Purchased
    }
}
