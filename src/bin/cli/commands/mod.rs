pub mod cards;
pub mod list;
pub mod lookup;
pub mod review;
pub mod transfer;
