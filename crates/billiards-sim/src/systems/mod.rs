pub mod friction;
pub mod rack;
pub mod shot;
