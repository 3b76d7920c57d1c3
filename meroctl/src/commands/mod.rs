pub(crate) mod samples;
pub(crate) mod session;
