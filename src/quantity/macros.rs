/// Implement `Display` (`1.5 t`) and `Debug` (`1.5t`) for a quantity alias.
macro_rules! unit {
    ($name:ty, $suffix:literal, precision: $precision:literal) => {
        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if self.0.0.is_infinite() {
                    write!(formatter, "∞ {}", $suffix)
                } else {
                    write!(formatter, "{:.*} {}", $precision, self.0.0, $suffix)
                }
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(formatter, "{:?}{}", self.0.0, $suffix)
            }
        }
    };
}
