mod branch;
mod fault;
mod join;
mod logic;
mod race;
mod repeat;
mod then;

pub use branch::*;
pub use fault::*;
pub use join::*;
pub use logic::*;
pub use race::*;
pub use repeat::*;
pub use then::*;
