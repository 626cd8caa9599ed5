pub mod literal;
pub mod sort;

#[cfg(test)]
pub(crate) mod testing;
