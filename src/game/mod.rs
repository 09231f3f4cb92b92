//! Engine-free event-driven core
//!
//! Everything here is deterministic and platform-independent:
//! - Single-threaded dispatch; handlers fire in subscription order
//! - Model change notifications fire synchronously inside the mutating call
//! - Teardown releases every subscription in one scoped collection
//! - No rendering, physics or platform dependencies

pub mod effects;
pub mod event;
pub mod model;
pub mod play;
pub mod presenter;
pub mod store;
pub mod view;

pub use effects::{EffectDirector, EffectInstance, EffectKind, RandomDirector};
pub use event::{Event, Subscription, SubscriptionSet};
pub use model::{BallKind, Model, ModelInit, Screen};
pub use play::PlayController;
pub use presenter::{Links, Presenter};
pub use store::{PurchaseOutcome, StarCatalog, StoreCatalog};
pub use view::{View, ViewEvent};
