pub mod constants;
pub mod deadline;
pub mod geo;
pub mod types;
pub mod validation;

#[cfg(test)]
#[allow(dead_code)]
pub mod test_helpers;
