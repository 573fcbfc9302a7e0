pub(crate) mod files;
pub(crate) mod handlers;
pub(crate) mod request_tracing;
pub(crate) mod response_contract;
pub(crate) mod tracks;
