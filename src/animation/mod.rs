pub(crate) mod controller;
pub(crate) mod opts;
pub(crate) mod scheduler;
pub(crate) mod surface;
