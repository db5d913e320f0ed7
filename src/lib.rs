pub mod amount;
pub mod catalog;
pub mod checkout;
pub mod csv;
pub mod engine;
pub mod model;
pub mod notice;
pub mod pricing;
pub mod store;

pub use amount::Amount;
pub use engine::{Cart, CartEngine, EngineError, Outcome};
pub use model::{CartLine, LineId, LineRef, NewLine, Operation};
pub use pricing::PricingConfig;
pub use store::{CartStore, FileStore, MemoryStore};
