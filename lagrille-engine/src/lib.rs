pub mod config;
pub mod dormeur;
pub mod generate;
pub mod pools;
pub mod resolver;
pub mod scorer;
pub mod selector;

pub use config::{Category, PoolLimits, SelectionRequest};
pub use generate::{Grille, GrilleEngine};
pub use selector::SelectionResult;
