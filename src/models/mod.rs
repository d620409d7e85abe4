mod indicator;
mod order;
mod product;
mod production;
mod support;
mod transaction;
mod user;

pub use indicator::*;
pub use order::*;
pub use product::*;
pub use production::*;
pub use support::*;
pub use transaction::*;
pub use user::*;
