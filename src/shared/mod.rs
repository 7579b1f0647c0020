pub mod constants;
pub mod nullable;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod validation;
