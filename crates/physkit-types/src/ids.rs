//! Strongly-typed identifiers for mesh entities.
//!
//! Newtype wrappers prevent accidental mixing of position indices
//! with normal or texture-coordinate indices. All ids are 0-based;
//! the OBJ wire format adds 1 on the way out.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw index as `usize` for array indexing.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(val: u32) -> Self {
                Self(val)
            }
        }
    };
}

define_id!(
    /// Index into the vertex position pool.
    PositionId
);
define_id!(
    /// Index into the vertex normal pool.
    NormalId
);
define_id!(
    /// Index into the texture coordinate pool.
    TexCoordId
);
define_id!(
    /// Index into the mesh's group list.
    GroupId
);
define_id!(
    /// Index into the mesh's material list.
    MaterialId
);
