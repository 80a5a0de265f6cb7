//! Macros for defining typed reference types.

/// Length of the short display form.
pub const SHORT_LEN: usize = 12;

/// Macro to define a typed, runtime-assigned reference.
///
/// This generates a newtype wrapper around `String` with:
/// - `parse()` with validation
/// - `as_str()` and `short()` accessors
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_ref!(ContainerId);
///
/// let id: ContainerId = "4f1c0b8e9a7d".parse()?;
/// ```
#[macro_export]
macro_rules! define_ref {
    ($name:ident) => {
        /// A typed runtime reference.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Parses a reference from a string.
            ///
            /// The string must be non-empty and free of whitespace and
            /// control characters. An `algorithm:` prefix must be followed
            /// by a digest.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                if let Some((position, found)) = s
                    .char_indices()
                    .find(|(_, c)| c.is_whitespace() || c.is_control())
                {
                    return Err($crate::IdError::InvalidCharacter { found, position });
                }

                if let Some((algorithm, digest)) = s.split_once(':') {
                    if digest.is_empty() {
                        return Err($crate::IdError::MissingDigest {
                            algorithm: algorithm.to_string(),
                        });
                    }
                }

                Ok(Self(s.to_string()))
            }

            /// Returns the full reference.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the short display form.
            #[must_use]
            pub fn short(&self) -> &str {
                let digest = self
                    .0
                    .split_once(':')
                    .map(|(_, digest)| digest)
                    .unwrap_or(&self.0);
                match digest.char_indices().nth($crate::SHORT_LEN) {
                    Some((end, _)) => &digest[..end],
                    None => digest,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
