//! Integration tests driving the warehouse router in-process.

mod helpers;

mod api_test;
mod auth_test;
mod media_test;
mod warehouse_test;
