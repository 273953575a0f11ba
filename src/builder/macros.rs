//! Macros for ergonomic schema definition.

/// Generate a [`StateId`](crate::engine::StateId) implementation for a
/// plain enum.
///
/// # Example
///
/// ```
/// use persona::state_id;
///
/// state_id! {
///     pub enum Light {
///         Proceed,
///         Caution,
///         Stop,
///     }
/// }
/// ```
#[macro_export]
macro_rules! state_id {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::engine::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
