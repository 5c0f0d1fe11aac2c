pub mod deviation;
pub mod reference_line;
pub mod vessel;
