pub(crate) mod frame;
pub(crate) mod label;
pub(crate) mod sector;
