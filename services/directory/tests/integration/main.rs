mod claims_test;
mod helpers;
mod http_test;
mod outbox_test;
mod sync_test;
