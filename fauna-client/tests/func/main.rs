mod mock;

mod client;
mod query_result;
