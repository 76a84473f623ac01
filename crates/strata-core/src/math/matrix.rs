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

//! Defines the `Vec2` and `Mat4` types used for texture transforms.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A two-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Vec2 {
    /// The x component.
    pub x: f32,
    /// The y component.
    pub y: f32,
}

impl Vec2 {
    /// A vector with both components set to 0.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// A vector with both components set to 1.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Creates a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 4x4 column-major matrix, as delivered by camera drivers for texture
/// coordinate transforms.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a 2D scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec2) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = scale.x;
        m.cols[1][1] = scale.y;
        m
    }

    /// Returns the matrix as raw bytes, ready for a uniform upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_sets_the_diagonal() {
        let m = Mat4::from_scale(Vec2::new(2.0, -3.0));
        assert_eq!(m.cols[0][0], 2.0);
        assert_eq!(m.cols[1][1], -3.0);
        assert_eq!(m.cols[2], Mat4::IDENTITY.cols[2]);
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
    }

    #[test]
    fn bytes_cover_sixteen_floats() {
        assert_eq!(Mat4::IDENTITY.as_bytes().len(), 16 * 4);
    }
}
