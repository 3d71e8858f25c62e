pub mod projection;
pub mod returns;
