#![allow(non_snake_case)]

use anyhow::Result;
use ultraviolet::UVec2;

use super::{UserContext, Window, WindowContext, WindowSetup};

/// A boxed [WindowSetup], callable on stable Rust.
pub type BoxedWindowSetup<UC> =
    Box<dyn FnOnce(&WindowContext<UC>, UVec2) -> Result<Box<dyn Window<UC>>>>;

pub struct WindowSequence<UC: UserContext + 'static> {
    pub sequence: Vec<BoxedWindowSetup<UC>>,
}

// Macro to implement From for tuples of size 1 to 5, so callers can pass
// their windows as a plain tuple.
macro_rules! impl_from_tuples {
    ($( $Tuple:ident { $($T:ident),+ } ),+ $(,)?) => {
        $(
            impl<UC: UserContext, $($T),+> From<($($T,)+)> for WindowSequence<UC>
            where
                $($T: WindowSetup<UC> + 'static),+
            {
                fn from(tuple: ($($T,)+)) -> Self {
                    // Unpack the tuple into individual variables
                    let ($($T,)+) = tuple;

                    let sequence: Vec<BoxedWindowSetup<UC>> = vec![
                        $(
                            Box::new($T),
                        )+
                    ];

                    WindowSequence { sequence }
                }
            }
        )+
    };
}

impl_from_tuples!(
    Tuple1 { T1 },
    Tuple2 { T1, T2 },
    Tuple3 { T1, T2, T3 },
    Tuple4 { T1, T2, T3, T4 },
    Tuple5 { T1, T2, T3, T4, T5 }
);
