pub mod adaptors;
pub mod ai;
pub mod dispatch;
pub mod extract;
pub mod store;
pub mod worker;

#[cfg(test)]
pub mod testing;
