pub mod activity;
pub mod kid;
pub mod stage;

pub use activity::*;
pub use kid::*;
pub use stage::*;
