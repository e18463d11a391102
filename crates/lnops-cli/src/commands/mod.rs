pub mod audit;
pub mod init;
pub mod rebalance;
