pub mod induction;
pub mod lsm_engine;
pub mod paths;
pub mod payoffs;
pub mod regression;
