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

//! Small math primitives used by the compositing core.
//!
//! Sizes are signed on purpose: they arrive from messages and importers
//! unvalidated, and consumers reject non-positive values instead of
//! propagating them.

pub mod dimension;
pub mod matrix;

pub use self::dimension::Size;
pub use self::matrix::{Mat4, Vec2};

/// Computes the uniform cover-fit scale that makes `source` fully cover `target`.
///
/// Returns `None` when either size is invalid.
///
/// # Examples
///
/// ```
/// use strata_core::math::{cover_scale, Size};
/// let scale = cover_scale(Size::new(100, 50), Size::new(400, 100)).unwrap();
/// assert_eq!(scale, 4.0);
/// ```
pub fn cover_scale(source: Size, target: Size) -> Option<f32> {
    if !source.is_valid() || !target.is_valid() {
        return None;
    }
    let scale_x = target.width as f32 / source.width as f32;
    let scale_y = target.height as f32 / source.height as f32;
    Some(scale_x.max(scale_y))
}
