pub mod postal;
pub mod storage;
