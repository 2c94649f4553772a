pub mod frozen_lake;
#[cfg(test)]
pub mod simple_golf;
