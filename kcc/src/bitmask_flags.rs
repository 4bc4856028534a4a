use num_traits::{One, PrimInt};

/// Trait implemented by flag enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// You choose the backing integer type via the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // Equivalent to: 1 << index
        // NOTE: Ensure your `bit_index()` is < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over a primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// No flags set.
    pub fn none() -> Self {
        Self::new(T::zero())
    }

    /// Every bit set, including bits no flag enum names yet.
    pub fn all() -> Self {
        Self::new(T::max_value())
    }

    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(tags: &[U]) -> Self {
        let mut flags = Self::none();
        flags.add_many(tags);
        flags
    }

    // --- Single Tag Operations ---
    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    /// Copy of `self` with `tag` cleared.
    pub fn without<U: FlagBitmask<Storage = T>>(mut self, tag: U) -> Self {
        self.remove(tag);
        self
    }

    // --- Bulk Operations ---
    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    // --- Logic Gates ---
    /// True if the two masks share at least one bit.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```rust
/// kcc::define_bitmask_flags!(SurfaceTag, u16, {
///     Slippery,
///     Ladder,
///     Water,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(CollisionGroup, u32, {
    Default,
    Static,
    Kinematic,
    Debris,
    Sensor,
    Character,
});

/// Set of [`CollisionGroup`]s, used both as a body's group membership and as a filter mask.
pub type CollisionGroups = BitmaskFlags<u32>;

/// Two bodies may interact when each one's group passes the other's mask.
#[inline]
pub fn needs_collision(
    group_a: CollisionGroups,
    mask_a: CollisionGroups,
    group_b: CollisionGroups,
    mask_b: CollisionGroups,
) -> bool {
    group_a.intersects(mask_b) && group_b.intersects(mask_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_group_bits_follow_declaration_order() {
        assert_eq!(CollisionGroup::Default.mask(), 1);
        assert_eq!(CollisionGroup::Static.mask(), 2);
        assert_eq!(CollisionGroup::Character.mask(), 32);
    }

    #[test]
    fn add_remove_and_query() {
        let mut flags = CollisionGroups::none();
        flags.add(CollisionGroup::Static);
        flags.add(CollisionGroup::Debris);
        assert!(flags.has(CollisionGroup::Static));
        assert!(!flags.has(CollisionGroup::Character));
        assert!(flags.intersects(CollisionGroups::from_flags(&[
            CollisionGroup::Character,
            CollisionGroup::Debris,
        ])));

        flags.remove(CollisionGroup::Static);
        assert!(!flags.has(CollisionGroup::Static));
        assert_eq!(flags, CollisionGroups::from_flags(&[CollisionGroup::Debris]));
    }

    #[test]
    fn character_mask_excludes_other_characters() {
        let character = CollisionGroups::from_flags(&[CollisionGroup::Character]);
        let character_mask = CollisionGroups::all().without(CollisionGroup::Character);
        let ground = CollisionGroups::from_flags(&[CollisionGroup::Static]);

        assert!(!needs_collision(
            character,
            character_mask,
            character,
            character_mask
        ));
        assert!(needs_collision(
            character,
            character_mask,
            ground,
            CollisionGroups::all()
        ));
    }
}
