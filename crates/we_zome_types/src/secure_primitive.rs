//! Macros for fixed size byte array newtypes.

/// A fixed length byte array was built from a slice of the wrong length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecurePrimitiveError {
    /// The input had the wrong number of bytes.
    #[error("expected {expected} bytes, found {found}")]
    BadSize {
        /// required length
        expected: usize,
        /// actual length
        found: usize,
    },
}

#[macro_export]
/// Serialization for fixed arrays is generally not available in a way that can be derived.
/// This serializes the wrapped array as bytes and checks the length on the way back in.
macro_rules! fixed_array_serialization {
    ($t:ty, $len:expr) => {
        $crate::paste::paste! {
            impl $crate::serde::ser::Serialize for $t {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: $crate::serde::ser::Serializer,
                {
                    serializer.serialize_bytes(&self.0)
                }
            }

            struct [<Visitor $t>];

            impl<'de> $crate::serde::de::Visitor<'de> for [<Visitor $t>] {
                type Value = [u8; $len];

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str(format!("a byte array of length {}", $len).as_str())
                }

                fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
                where
                    E: $crate::serde::de::Error,
                {
                    if value.len() == $len {
                        let mut bytes = [0_u8; $len];
                        bytes.clone_from_slice(value);
                        Ok(bytes)
                    } else {
                        let error_message = format!("{} bytes, got {} bytes", $len, value.len());
                        Err(E::invalid_value(
                            $crate::serde::de::Unexpected::Bytes(value),
                            &error_message.as_str(),
                        ))
                    }
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where
                    A: $crate::serde::de::SeqAccess<'de>,
                {
                    let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));

                    while let Some(b) = seq.next_element()? {
                        vec.push(b);
                    }

                    self.visit_bytes(&vec)
                }
            }

            impl<'de> $crate::serde::de::Deserialize<'de> for $t {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: $crate::serde::de::Deserializer<'de>,
                {
                    let bytes = deserializer.deserialize_bytes([<Visitor $t>])?;
                    Ok(Self(bytes))
                }
            }

            impl From<[u8; $len]> for $t {
                fn from(b: [u8; $len]) -> Self {
                    Self(b)
                }
            }

            impl core::convert::TryFrom<&[u8]> for $t {
                type Error = $crate::SecurePrimitiveError;
                fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
                    if slice.len() == $len {
                        let mut inner = [0; $len];
                        inner.copy_from_slice(slice);
                        Ok(inner.into())
                    } else {
                        Err($crate::SecurePrimitiveError::BadSize {
                            expected: $len,
                            found: slice.len(),
                        })
                    }
                }
            }

            impl core::convert::TryFrom<Vec<u8>> for $t {
                type Error = $crate::SecurePrimitiveError;
                fn try_from(v: Vec<u8>) -> Result<Self, Self::Error> {
                    Self::try_from(v.as_ref())
                }
            }

            impl AsRef<[u8]> for $t {
                fn as_ref(&self) -> &[u8] {
                    &self.0
                }
            }
        }
    };
}

#[macro_export]
/// A fixed length secret that must not leak through timing or debug output.
///
/// Equality is constant time, so a remote caller cannot learn the secret
/// byte by byte from response latency. Debug output never shows the bytes.
macro_rules! secure_primitive {
    ($t:ty, $len:expr) => {
        $crate::fixed_array_serialization!($t, $len);

        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                use $crate::subtle::ConstantTimeEq;
                self.0.ct_eq(&other.0).into()
            }
        }

        impl Eq for $t {}

        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_fmt(format_args!("{}(<{} bytes hidden>)", stringify!($t), $len))
            }
        }
    };
}
