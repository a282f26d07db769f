/// Environment variable holding the model endpoint credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model endpoint base URL
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Reads an environment variable, treating an empty value as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        std::env::set_var("LLAMADOCGEN_TEST_EMPTY", "");
        assert_eq!(get_env_value("LLAMADOCGEN_TEST_EMPTY"), None);

        std::env::set_var("LLAMADOCGEN_TEST_SET", "value");
        assert_eq!(get_env_value("LLAMADOCGEN_TEST_SET").as_deref(), Some("value"));
    }
}
