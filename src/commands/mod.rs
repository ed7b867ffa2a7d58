pub mod balance;
pub mod mint;
