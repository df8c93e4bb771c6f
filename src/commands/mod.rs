pub mod archive;
pub mod generate;
pub mod serve;
pub mod status;
