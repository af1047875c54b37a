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

//! A small macro for the API's flag sets.
#[macro_export]
#[doc(hidden)]
macro_rules! lumen_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// No flags set.
            pub const EMPTY: Self = Self { bits: 0 };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Builds a set from raw bits, keeping unknown bits.
            pub const fn from_bits_retain(bits: $ty) -> Self {
                Self { bits }
            }

            /// The raw bits.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// `true` when every flag of `other` is set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` when no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                // A set equal to one named flag, composite or not, prints as that name.
                $(
                    if self.bits != 0 && self.bits == $flag_value {
                        return f
                            .debug_set()
                            .entry(&format_args!("{}", stringify!($flag_name)))
                            .finish();
                    }
                )*
                let mut rest = self.bits;
                let mut names = f.debug_set();
                $(
                    if $flag_value != 0 && (rest & $flag_value) == $flag_value {
                        names.entry(&format_args!("{}", stringify!($flag_name)));
                        rest &= !$flag_value;
                    }
                )*
                if rest != 0 {
                    names.entry(&format_args!("{:#x}", rest));
                }
                names.finish()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    lumen_bitflags! {
        /// Flags used only by these tests.
        pub struct TestFlags: u32 {
            const A = 1 << 0;
            const B = 1 << 3;
            const AB = Self::A.bits() | Self::B.bits();
        }
    }

    #[test]
    fn union_and_contains() {
        let mut flags = TestFlags::A;
        assert!(!flags.contains(TestFlags::B));
        flags |= TestFlags::B;
        assert_eq!(flags, TestFlags::AB);
        assert!(flags.contains(TestFlags::A | TestFlags::B));
        assert!(TestFlags::EMPTY.is_empty());
    }

    #[test]
    fn debug_lists_set_flags_and_unknown_bits() {
        assert_eq!(format!("{:?}", TestFlags::AB), "{AB}");
        assert_eq!(format!("{:?}", TestFlags::from_bits_retain(0b1_0001)), "{A, 0x10}");
        assert_eq!(format!("{:?}", TestFlags::EMPTY), "{}");
    }

    #[test]
    fn debug_prefers_the_composite_name_only_on_an_exact_match() {
        assert_eq!(format!("{:?}", TestFlags::A | TestFlags::B), "{AB}");
        assert_eq!(format!("{:?}", TestFlags::B), "{B}");
        assert_eq!(
            format!("{:?}", TestFlags::from_bits_retain(0b1_1001)),
            "{A, B, 0x10}"
        );
    }
}
