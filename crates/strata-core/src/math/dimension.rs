// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the two-dimensional [`Size`] used for textures and output surfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A two-dimensional size, typically describing a texture or an output surface.
///
/// A size is only meaningful when both components are strictly positive; see
/// [`Size::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// The width component of the size.
    pub width: i32,
    /// The height component of the size.
    pub height: i32,
}

impl Size {
    /// Creates a new size. No validation is performed.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both components are strictly positive.
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns `Some(self)` if the size is valid.
    pub fn validated(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
