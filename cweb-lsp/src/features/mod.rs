pub mod semantic_tokens;

#[cfg(test)]
pub(crate) mod test_support;
