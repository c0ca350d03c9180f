pub(crate) mod color;
pub(crate) mod dataset;
pub(crate) mod ledger;
pub(crate) mod money;
pub(crate) mod record;
