//! Small helpers.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of generated container names.
const RAND_NAME_LEN: usize = 32;

/// A random container name, unlikely to collide with any running container.
pub fn rand_name() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RAND_NAME_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand_name_shape() {
        let name = rand_name();
        assert_eq!(name.len(), RAND_NAME_LEN);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_rand_names_differ() {
        assert_ne!(rand_name(), rand_name());
    }
}
