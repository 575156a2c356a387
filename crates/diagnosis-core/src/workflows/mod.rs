pub mod diagnosis;
pub mod replay;
