//! Symbol tables for enumerations stored by name.

/// Name of an enumeration plus its symbolic variant names, in declaration order.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumSymbols {
    pub name: &'static str,
    pub symbols: &'static [&'static str],
}

impl EnumSymbols {
    /// Exact (case-sensitive) membership test.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| *s == symbol)
    }
}

/// An enumeration whose values are written to disk as their symbolic names.
pub trait SymbolicEnum: Copy + Sized + Send + Sync + 'static {
    const SYMBOLS: &'static EnumSymbols;

    fn symbol(self) -> &'static str;

    fn from_symbol(symbol: &str) -> Option<Self>;
}

/// Declare a fieldless enum together with its [`SymbolicEnum`] impl. The
/// variant identifier is the stored symbol.
macro_rules! symbolic_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::symbols::SymbolicEnum for $name {
            const SYMBOLS: &'static $crate::symbols::EnumSymbols = &$crate::symbols::EnumSymbols {
                name: stringify!($name),
                symbols: &[$( stringify!($variant) ),+],
            };

            fn symbol(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }

            fn from_symbol(symbol: &str) -> Option<Self> {
                match symbol {
                    $( stringify!($variant) => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::symbols::SymbolicEnum::symbol(*self))
            }
        }
    };
}

pub(crate) use symbolic_enum;
