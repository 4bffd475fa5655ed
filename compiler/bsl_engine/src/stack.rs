//! Fixed-capacity typed byte stack.
//!
//! The stack is a single boxed byte region sized once at construction. Each
//! pushed value occupies `T::SIZE` little-endian payload bytes followed by
//! one tag byte naming its type, so a pop with the wrong type is reported
//! instead of reinterpreting foreign bytes. Every offset is bounds-checked;
//! a failed operation leaves the stack exactly as it was.

use std::marker::PhantomData;

use crate::InstrId;

/// A value that can live in a stack slot.
pub trait StackValue: Copy {
    /// Tag byte stored after the payload.
    const TAG: u8;
    /// Payload width in bytes.
    const SIZE: usize;
    /// Type name used in mismatch errors.
    const NAME: &'static str;

    /// Write the payload into `out`, which is exactly `SIZE` bytes long.
    fn write(self, out: &mut [u8]);

    /// Read the payload back from exactly `SIZE` bytes.
    fn read(bytes: &[u8]) -> Self;

    /// Bytes consumed by one slot, tag included.
    #[inline]
    fn slot_width() -> usize {
        Self::SIZE + 1
    }
}

macro_rules! impl_stack_value {
    ($($ty:ty => $tag:literal),* $(,)?) => {$(
        impl StackValue for $ty {
            const TAG: u8 = $tag;
            const SIZE: usize = std::mem::size_of::<$ty>();
            const NAME: &'static str = stringify!($ty);

            #[inline]
            fn write(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }
        }
    )*};
}

impl_stack_value! {
    u8 => 1,
    u16 => 2,
    u32 => 3,
    u64 => 4,
    i64 => 5,
}

impl StackValue for bool {
    const TAG: u8 = 6;
    const SIZE: usize = 1;
    const NAME: &'static str = "bool";

    #[inline]
    fn write(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl StackValue for InstrId {
    const TAG: u8 = 7;
    const SIZE: usize = 4;
    const NAME: &'static str = "InstrId";

    #[inline]
    fn write(self, out: &mut [u8]) {
        self.raw().write(out);
    }

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        InstrId::new(u32::read(bytes))
    }
}

/// Name of the type owning `tag`, for diagnostics.
pub fn tag_name(tag: u8) -> &'static str {
    const NAMES: [(u8, &str); 7] = [
        (u8::TAG, u8::NAME),
        (u16::TAG, u16::NAME),
        (u32::TAG, u32::NAME),
        (u64::TAG, u64::NAME),
        (i64::TAG, i64::NAME),
        (bool::TAG, bool::NAME),
        (InstrId::TAG, InstrId::NAME),
    ];
    NAMES
        .iter()
        .find(|(t, _)| *t == tag)
        .map_or("<unknown>", |(_, name)| name)
}

/// Why a stack operation was refused.
///
/// The engine attaches its instruction pointer to turn this into an
/// [`EngineError`](crate::EngineError).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StackFault {
    Exhausted { requested: usize, available: usize },
    Underflow { requested: usize, depth: usize },
    TypeMismatch { expected: &'static str, found: &'static str },
}

pub type StackResult<T> = Result<T, StackFault>;

/// Handle to a slot reserved by [`Stack::push_default`].
///
/// The handle stays valid until the slot is popped; [`Stack::load`] and
/// [`Stack::store`] re-check bounds and the tag on every access.
#[derive(Debug)]
pub struct Slot<T> {
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> Slot<T> {
    /// Byte offset of the slot's payload from the bottom of the stack.
    #[inline]
    pub fn offset(self) -> usize {
        self.offset
    }
}

/// A fixed-capacity LIFO region of tagged slots.
#[derive(Clone, Debug)]
pub struct Stack {
    region: Box<[u8]>,
    top: usize,
}

impl Stack {
    /// Allocate a region of `capacity` bytes. This is the only allocation
    /// the stack ever makes.
    pub fn with_capacity(capacity: usize) -> Self {
        Stack {
            region: vec![0; capacity].into_boxed_slice(),
            top: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Bytes currently in use.
    #[inline]
    pub fn depth(&self) -> usize {
        self.top
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    /// Free bytes between the top and the end of the region.
    #[inline]
    pub fn space(&self) -> usize {
        self.region.len() - self.top
    }

    /// Reserve one slot, keeping a byte of slack free.
    fn reserve<T: StackValue>(&mut self) -> StackResult<usize> {
        let width = T::slot_width();
        let available = self.space();
        if available <= width {
            return Err(StackFault::Exhausted {
                requested: width,
                available,
            });
        }
        let offset = self.top;
        self.region[offset + T::SIZE] = T::TAG;
        self.top += width;
        Ok(offset)
    }

    pub fn push<T: StackValue>(&mut self, value: T) -> StackResult<()> {
        let offset = self.reserve::<T>()?;
        value.write(&mut self.region[offset..offset + T::SIZE]);
        Ok(())
    }

    /// Reserve a slot holding `T::default()` and return a handle to it.
    pub fn push_default<T: StackValue + Default>(&mut self) -> StackResult<Slot<T>> {
        let offset = self.reserve::<T>()?;
        T::default().write(&mut self.region[offset..offset + T::SIZE]);
        Ok(Slot {
            offset,
            _marker: PhantomData,
        })
    }

    /// Offset of the payload of a `T` slot ending at `end`.
    fn slot_at<T: StackValue>(&self, end: usize) -> StackResult<usize> {
        let width = T::slot_width();
        if end > self.top || end < width {
            return Err(StackFault::Underflow {
                requested: width,
                depth: self.top,
            });
        }
        let tag = self.region[end - 1];
        if tag != T::TAG {
            return Err(StackFault::TypeMismatch {
                expected: T::NAME,
                found: tag_name(tag),
            });
        }
        Ok(end - width)
    }

    /// Copy of the most recently pushed value.
    pub fn peek<T: StackValue>(&self) -> StackResult<T> {
        let offset = self.slot_at::<T>(self.top)?;
        Ok(T::read(&self.region[offset..offset + T::SIZE]))
    }

    /// Mutate the most recently pushed value in place.
    pub fn update_top<T: StackValue>(&mut self, f: impl FnOnce(T) -> T) -> StackResult<()> {
        let offset = self.slot_at::<T>(self.top)?;
        let value = f(T::read(&self.region[offset..offset + T::SIZE]));
        value.write(&mut self.region[offset..offset + T::SIZE]);
        Ok(())
    }

    pub fn load<T: StackValue>(&self, slot: Slot<T>) -> StackResult<T> {
        let offset = self.slot_at::<T>(slot.offset + T::slot_width())?;
        Ok(T::read(&self.region[offset..offset + T::SIZE]))
    }

    pub fn store<T: StackValue>(&mut self, slot: Slot<T>, value: T) -> StackResult<()> {
        let offset = self.slot_at::<T>(slot.offset + T::slot_width())?;
        value.write(&mut self.region[offset..offset + T::SIZE]);
        Ok(())
    }

    /// Remove the most recently pushed `T`.
    pub fn pop<T: StackValue>(&mut self) -> StackResult<()> {
        self.pop_and_get::<T>().map(|_| ())
    }

    /// Remove the most recently pushed `T` and return it.
    pub fn pop_and_get<T: StackValue>(&mut self) -> StackResult<T> {
        let offset = self.slot_at::<T>(self.top)?;
        let value = T::read(&self.region[offset..offset + T::SIZE]);
        self.top = offset;
        Ok(value)
    }

    /// Empty the stack without touching its storage.
    #[inline]
    pub fn clear(&mut self) {
        self.top = 0;
    }
}
