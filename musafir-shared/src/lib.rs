pub mod events;
pub mod money;

pub use money::{Amount, Money, DEFAULT_CURRENCY};
