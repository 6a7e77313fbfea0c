use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(DocumentKind {
    Cpf => "CPF",
    Cnh => "CNH",
    Rg => "RG",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_kind_round_trip() {
        for (variant, s) in [
            (DocumentKind::Cpf, "CPF"),
            (DocumentKind::Cnh, "CNH"),
            (DocumentKind::Rg, "RG"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentKind::from_str(s).unwrap(), variant);
            assert_eq!(serde_json::to_value(variant).unwrap(), s);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(DocumentKind::from_str("cpf").is_err());
        assert!(DocumentKind::from_str("").is_err());
    }
}
