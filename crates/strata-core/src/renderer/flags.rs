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

//! Per-draw render flags carried in the `arg1` of render messages.

/// Flags controlling how a single draw of the compositing pass behaves.
///
/// The default value has only [`RenderFlags::RENDER_SCREEN`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderFlags {
    bits: i32,
}

impl RenderFlags {
    /// No flags.
    pub const NONE: Self = Self { bits: 0 };
    /// Present the result to the screen after this draw.
    pub const RENDER_SCREEN: Self = Self { bits: 1 << 0 };
    /// The background is transparent.
    pub const TRANSPARENT: Self = Self { bits: 1 << 1 };
    /// Clear the destination before drawing.
    pub const REQ_CLEAR: Self = Self { bits: 1 << 2 };

    /// Creates flags from raw bits, as read from a message argument.
    pub const fn from_bits(bits: i32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> i32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Removes `other` from these flags.
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Checks if every flag of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Sets or clears `flag`.
    pub fn set(&mut self, flag: Self, value: bool) {
        *self = if value {
            self.union(flag)
        } else {
            self.difference(flag)
        };
    }

    /// Returns a copy with [`RenderFlags::RENDER_SCREEN`] set to `value`.
    pub fn with_render_screen(mut self, value: bool) -> Self {
        self.set(Self::RENDER_SCREEN, value);
        self
    }

    /// Returns a copy with [`RenderFlags::TRANSPARENT`] set to `value`.
    pub fn with_transparent(mut self, value: bool) -> Self {
        self.set(Self::TRANSPARENT, value);
        self
    }

    /// Returns a copy with [`RenderFlags::REQ_CLEAR`] set to `value`.
    pub fn with_req_clear(mut self, value: bool) -> Self {
        self.set(Self::REQ_CLEAR, value);
        self
    }

    /// Whether the draw presents to the screen.
    pub const fn render_screen(&self) -> bool {
        self.contains(Self::RENDER_SCREEN)
    }

    /// Whether the background is transparent.
    pub const fn transparent(&self) -> bool {
        self.contains(Self::TRANSPARENT)
    }

    /// Whether the destination is cleared first.
    pub const fn req_clear(&self) -> bool {
        self.contains(Self::REQ_CLEAR)
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::RENDER_SCREEN
    }
}

impl std::ops::BitOr for RenderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for RenderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_presents_to_screen() {
        let flags = RenderFlags::default();
        assert!(flags.render_screen());
        assert!(!flags.transparent());
        assert!(!flags.req_clear());
    }

    #[test]
    fn setters_toggle_single_bits() {
        let flags = RenderFlags::default()
            .with_render_screen(false)
            .with_req_clear(true);
        assert!(!flags.render_screen());
        assert!(flags.req_clear());
        assert_eq!(flags, RenderFlags::REQ_CLEAR);
    }

    #[test]
    fn bits_round_trip_through_message_argument() {
        let flags = RenderFlags::default().with_transparent(true);
        assert_eq!(RenderFlags::from_bits(flags.bits()), flags);
        assert_eq!(flags, RenderFlags::RENDER_SCREEN | RenderFlags::TRANSPARENT);
    }
}
