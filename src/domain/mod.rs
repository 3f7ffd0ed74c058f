mod clock;
mod customer;
mod money;
mod statement;

pub use clock::*;
pub use customer::*;
pub use money::*;
pub use statement::*;
