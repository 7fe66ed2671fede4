#[allow(unused_imports)]
pub use ciwrap_test_utils::{init_tracing, with_timeout};
