/*!
Lower level primitive types that are useful in a variety of circumstances.
*/

use core::num::NonZeroUsize;

/// A `usize` that can never be `usize::MAX`.
///
/// This is similar to `core::num::NonZeroUsize`, but instead of not permitting
/// a zero value, this does not permit a max value.
///
/// This is useful in contexts where one wants to optimize the memory usage of
/// things that contain match offsets. Namely, since Rust slices are guaranteed
/// to never have a length exceeding `isize::MAX`, we can use `usize::MAX` as a
/// sentinel to indicate that no offset was recorded. Indeed, types like
/// `Option<NonMaxUsize>` have exactly the same size in memory as a `usize`.
///
/// This type is defined to be `repr(transparent)` for
/// `core::num::NonZeroUsize`, which is in turn defined to be
/// `repr(transparent)` for `usize`.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NonMaxUsize(NonZeroUsize);

impl NonMaxUsize {
    /// Create a new `NonMaxUsize` from the given value.
    ///
    /// This returns `None` only when the given value is equal to `usize::MAX`.
    #[inline]
    pub fn new(value: usize) -> Option<NonMaxUsize> {
        NonZeroUsize::new(value.wrapping_add(1)).map(NonMaxUsize)
    }

    /// Return the underlying `usize` value. The returned value is guaranteed
    /// to not equal `usize::MAX`.
    #[inline]
    pub fn get(self) -> usize {
        self.0.get().wrapping_sub(1)
    }
}

// We provide our own Debug impl because seeing the internal repr can be quite
// surprising if you aren't expecting it. e.g., 'NonMaxUsize(5)' vs just '5'.
impl core::fmt::Debug for NonMaxUsize {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self.get())
    }
}

/// The identifier of an NFA state, represented by a `u32`.
///
/// An NFA hands out state identifiers densely starting from zero, so a
/// `StateID` doubles as an index into the NFA's state list. The identifier
/// of the start state is always `0` and the identifier of the accept state
/// is always `nfa.len() - 1`.
///
/// A `StateID` is guaranteed to fit into a `usize` on all targets this crate
/// compiles for.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StateID(u32);

impl StateID {
    /// The maximum state identifier value.
    pub const MAX: StateID = StateID(i32::MAX as u32 - 1);

    /// The total number of states that can be identified.
    pub const LIMIT: usize = StateID::MAX.as_usize() + 1;

    /// The state identifier of value zero, i.e., the start state.
    pub const ZERO: StateID = StateID(0);

    /// Create a new state identifier.
    ///
    /// This returns `None` if the given index exceeds [`StateID::MAX`].
    #[inline]
    pub fn new(id: usize) -> Option<StateID> {
        if id > StateID::MAX.as_usize() {
            None
        } else {
            Some(StateID(id as u32))
        }
    }

    /// Create a new state identifier without checking the limit.
    ///
    /// Callers must ensure `id <= StateID::MAX.as_usize()`.
    #[inline]
    pub(crate) const fn new_unchecked(id: usize) -> StateID {
        StateID(id as u32)
    }

    /// Return this identifier as a `usize`, suitable for indexing into the
    /// NFA's state list.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Debug for StateID {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self.as_usize())
    }
}

impl core::fmt::Display for StateID {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_max_usize_roundtrip() {
        assert_eq!(0, NonMaxUsize::new(0).unwrap().get());
        assert_eq!(5, NonMaxUsize::new(5).unwrap().get());
        assert_eq!(
            usize::MAX - 1,
            NonMaxUsize::new(usize::MAX - 1).unwrap().get()
        );
        assert_eq!(None, NonMaxUsize::new(usize::MAX));
    }

    #[test]
    fn non_max_usize_option_is_free() {
        use core::mem::size_of;
        assert_eq!(size_of::<usize>(), size_of::<Option<NonMaxUsize>>());
    }

    #[test]
    fn state_id_limits() {
        assert_eq!(Some(StateID::ZERO), StateID::new(0));
        assert_eq!(None, StateID::new(StateID::LIMIT));
        assert_eq!(
            StateID::MAX,
            StateID::new(StateID::LIMIT - 1).unwrap()
        );
    }
}
