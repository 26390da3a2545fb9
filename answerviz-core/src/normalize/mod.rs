pub(crate) mod coerce;
pub(crate) mod report;
pub(crate) mod sanitize;
