//! Runtime value representation.
//!
//! A `Value` is a NaN-boxed 64-bit word. Any bit pattern outside the boxed range is an
//! IEEE-754 double; boxed patterns carry a 4-bit [`Type`] tag and a 47-bit payload. Heap
//! references store a slot index and the slot generation so a reclaimed slot is never
//! misread as a live cell.

use ahash::RandomState;
use hashbrown::HashMap;
use std::fmt;
use std::hash::Hash;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(RandomState::new())
}

pub const QNAN: u64 = 0x7ff8000000000000;
/// Sign bit, all exponent bits and the quiet bit.
pub const TAG_BASE: u64 = 0xfff8000000000000;
pub const TAG_SHIFT: u32 = 47;
pub const TAG_MASK: u64 = 0xf << TAG_SHIFT;
pub const PAYLOAD_MASK: u64 = (1 << TAG_SHIFT) - 1;

/// Low payload bits hold the slot index, the remaining 23 hold the slot generation.
pub const INDEX_BITS: u32 = 24;
pub const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;
pub const GENERATION_SHIFT: u32 = INDEX_BITS;
pub const GENERATION_MASK: u32 = (1 << (TAG_SHIFT - INDEX_BITS)) - 1;

/// Payload of the inline empty string. Heap strings never use it: the slot table stops
/// below index `INDEX_MASK`.
const EMPTY_STRING_PAYLOAD: u64 = PAYLOAD_MASK;

/// Type enumeration. The numeric values are part of the embedding contract; new tags are
/// appended, never inserted.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Object = 0,
    Prop = 1,
    String = 2,
    Undefined = 3,
    Null = 4,
    Number = 5,
    Boolean = 6,
    Function = 7,
    CodeRef = 8,
    CFunc = 9,
    Error = 10,
    NaN = 11,
}

impl Type {
    fn from_tag(tag: u64) -> Option<Type> {
        Some(match tag {
            0 => Type::Object,
            1 => Type::Prop,
            2 => Type::String,
            3 => Type::Undefined,
            4 => Type::Null,
            6 => Type::Boolean,
            7 => Type::Function,
            8 => Type::CodeRef,
            9 => Type::CFunc,
            10 => Type::Error,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Object => "object",
            Type::Prop => "property",
            Type::String => "string",
            Type::Undefined => "undefined",
            Type::Null => "null",
            Type::Number => "number",
            Type::Boolean => "boolean",
            Type::Function => "function",
            Type::CodeRef => "code",
            Type::CFunc => "native",
            Type::Error => "error",
            Type::NaN => "NaN",
        }
    }

    /// Kinds whose payload is a heap handle.
    pub(crate) fn is_heap(self) -> bool {
        matches!(
            self,
            Type::Object | Type::Prop | Type::String | Type::Function | Type::CodeRef | Type::Error
        )
    }
}

/// Generation-checked heap slot handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeapId {
    pub index: u32,
    pub generation: u32,
}

impl HeapId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self {
            index: index & INDEX_MASK,
            generation: generation & GENERATION_MASK,
        }
    }

    fn to_payload(self) -> u64 {
        (self.index & INDEX_MASK) as u64
            | (((self.generation & GENERATION_MASK) as u64) << GENERATION_SHIFT)
    }

    fn from_payload(payload: u64) -> Self {
        Self {
            index: payload as u32 & INDEX_MASK,
            generation: (payload >> GENERATION_SHIFT) as u32 & GENERATION_MASK,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value(u64);

impl Value {
    pub const UNDEFINED: Value = Value::boxed(Type::Undefined, 0);
    pub const NULL: Value = Value::boxed(Type::Null, 0);
    pub const TRUE: Value = Value::boxed(Type::Boolean, 1);
    pub const FALSE: Value = Value::boxed(Type::Boolean, 0);
    pub const EMPTY_STRING: Value = Value::boxed(Type::String, EMPTY_STRING_PAYLOAD);
    pub const NAN: Value = Value(QNAN);

    const fn boxed(ty: Type, payload: u64) -> Value {
        Value(TAG_BASE | ((ty as u64) << TAG_SHIFT) | (payload & PAYLOAD_MASK))
    }

    #[inline(always)]
    pub fn make_number(f: f64) -> Self {
        // Arithmetic may produce a NaN with the sign bit set, which would land in the
        // boxed range.
        if f.is_nan() {
            return Self(QNAN);
        }
        Self(f.to_bits())
    }

    #[inline(always)]
    pub fn make_boolean(b: bool) -> Self {
        if b { Self::TRUE } else { Self::FALSE }
    }

    #[inline(always)]
    pub fn make_undefined() -> Self {
        Self::UNDEFINED
    }

    #[inline(always)]
    pub fn make_null() -> Self {
        Self::NULL
    }

    pub(crate) fn from_heap(ty: Type, id: HeapId) -> Self {
        debug_assert!(ty.is_heap());
        Self::boxed(ty, id.to_payload())
    }

    pub(crate) fn native(index: u32) -> Self {
        Self::boxed(Type::CFunc, index as u64)
    }

    #[inline(always)]
    pub fn raw(self) -> u64 {
        self.0
    }

    #[inline(always)]
    fn is_boxed(self) -> bool {
        (self.0 & TAG_BASE) == TAG_BASE
    }

    #[inline(always)]
    fn tag(self) -> Option<Type> {
        if self.is_boxed() {
            Type::from_tag((self.0 & TAG_MASK) >> TAG_SHIFT)
        } else {
            None
        }
    }

    #[inline(always)]
    fn payload(self) -> u64 {
        self.0 & PAYLOAD_MASK
    }

    /// The `Type` of this value. NaN is reported separately from other numbers.
    pub fn type_of(self) -> Type {
        match self.tag() {
            Some(t) => t,
            None if self.as_number().is_nan() => Type::NaN,
            None => Type::Number,
        }
    }

    #[inline(always)]
    pub fn is_number(self) -> bool {
        !self.is_boxed()
    }

    #[inline(always)]
    pub fn is_string(self) -> bool {
        self.tag() == Some(Type::String)
    }

    #[inline(always)]
    pub fn is_boolean(self) -> bool {
        self.tag() == Some(Type::Boolean)
    }

    #[inline(always)]
    pub fn is_object(self) -> bool {
        self.tag() == Some(Type::Object)
    }

    #[inline(always)]
    pub fn is_undefined(self) -> bool {
        self.0 == Self::UNDEFINED.0
    }

    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    #[inline(always)]
    pub fn is_nullish(self) -> bool {
        self.is_undefined() || self.is_null()
    }

    #[inline(always)]
    pub fn is_error(self) -> bool {
        self.tag() == Some(Type::Error)
    }

    #[inline(always)]
    pub fn is_code_ref(self) -> bool {
        self.tag() == Some(Type::CodeRef)
    }

    #[inline(always)]
    pub fn is_function(self) -> bool {
        self.tag() == Some(Type::Function)
    }

    pub(crate) fn is_native(self) -> bool {
        self.tag() == Some(Type::CFunc)
    }

    pub fn is_empty_string(self) -> bool {
        self.0 == Self::EMPTY_STRING.0
    }

    /// Objects, functions and errors: values that can carry properties.
    pub fn is_object_like(self) -> bool {
        matches!(
            self.tag(),
            Some(Type::Object | Type::Function | Type::Error)
        )
    }

    #[inline(always)]
    pub fn as_number(self) -> f64 {
        f64::from_bits(self.0)
    }

    pub fn as_boolean(self) -> Option<bool> {
        if self.is_boolean() {
            Some(self.payload() != 0)
        } else {
            None
        }
    }

    /// Heap handle carried by this value, if it references a heap cell.
    pub(crate) fn heap_id(self) -> Option<HeapId> {
        match self.tag() {
            Some(t) if t.is_heap() && !self.is_empty_string() => {
                Some(HeapId::from_payload(self.payload()))
            }
            _ => None,
        }
    }

    pub(crate) fn native_index(self) -> Option<u32> {
        if self.is_native() {
            Some(self.payload() as u32)
        } else {
            None
        }
    }

    /// Numeric conversion without heap access. Non-empty strings and heap objects give NaN;
    /// `Interpreter::to_number` parses string contents.
    pub fn to_number(self) -> f64 {
        match self.tag() {
            None => self.as_number(),
            Some(Type::Boolean) => self.payload() as f64,
            Some(Type::Null) => 0.0,
            Some(Type::String) if self.is_empty_string() => 0.0,
            _ => f64::NAN,
        }
    }

    pub fn to_boolean(self) -> bool {
        match self.tag() {
            None => {
                let n = self.as_number();
                !(n == 0.0 || n.is_nan())
            }
            Some(Type::Boolean) => self.payload() != 0,
            Some(Type::Undefined | Type::Null) => false,
            Some(Type::String) => !self.is_empty_string(),
            _ => true,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::make_number(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::make_boolean(b)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_of() {
            Type::Number | Type::NaN => write!(f, "Number({})", self.as_number()),
            Type::Undefined => write!(f, "Undefined"),
            Type::Null => write!(f, "Null"),
            Type::Boolean => write!(f, "Boolean({})", self.payload() != 0),
            Type::String if self.is_empty_string() => write!(f, "String(\"\")"),
            Type::CFunc => write!(f, "CFunc(#{})", self.payload()),
            ty => {
                let id = HeapId::from_payload(self.payload());
                write!(f, "{:?}(#{}@{})", ty, id.index, id.generation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_boolean_truth_table() {
        let falsy = [
            Value::make_number(0.0),
            Value::make_number(-0.0),
            Value::make_number(f64::NAN),
            Value::EMPTY_STRING,
            Value::UNDEFINED,
            Value::NULL,
            Value::FALSE,
        ];
        for v in falsy {
            assert!(!v.to_boolean(), "{v:?} should be falsy");
        }
        let id = HeapId::new(3, 1);
        let truthy = [
            Value::make_number(1.0),
            Value::make_number(-0.5),
            Value::make_number(f64::INFINITY),
            Value::TRUE,
            Value::from_heap(Type::String, id),
            Value::from_heap(Type::Object, id),
            Value::from_heap(Type::Function, id),
            Value::native(0),
        ];
        for v in truthy {
            assert!(v.to_boolean(), "{v:?} should be truthy");
        }
    }

    #[test]
    fn nan_is_canonical_and_unboxed() {
        let neg_nan = f64::from_bits(0xfff8_0000_0000_0001);
        let v = Value::make_number(neg_nan);
        assert!(v.is_number());
        assert_eq!(v.raw(), QNAN);
        assert_eq!(v.type_of(), Type::NaN);
        assert!(Value::make_number(f64::NEG_INFINITY).is_number());
    }

    #[test]
    fn type_enumeration_values_are_fixed() {
        assert_eq!(Type::Object as u8, 0);
        assert_eq!(Type::Undefined as u8, 3);
        assert_eq!(Type::Number as u8, 5);
        assert_eq!(Type::Error as u8, 10);
        assert_eq!(Type::NaN as u8, 11);
        assert_eq!(Value::UNDEFINED.type_of(), Type::Undefined);
        assert_eq!(Value::make_number(2.5).type_of(), Type::Number);
    }

    #[test]
    fn heap_handles_keep_index_and_generation() {
        let id = HeapId::new(0x00ab_cdef, GENERATION_MASK);
        let v = Value::from_heap(Type::Error, id);
        assert!(v.is_error());
        assert!(!v.is_number());
        assert_eq!(v.heap_id(), Some(id));
        assert_eq!(Value::EMPTY_STRING.heap_id(), None);
        assert_eq!(Value::native(7).native_index(), Some(7));
        assert_eq!(Value::native(7).heap_id(), None);
    }

    #[test]
    fn value_level_number_conversion() {
        assert_eq!(Value::TRUE.to_number(), 1.0);
        assert_eq!(Value::NULL.to_number(), 0.0);
        assert_eq!(Value::EMPTY_STRING.to_number(), 0.0);
        assert!(Value::UNDEFINED.to_number().is_nan());
        assert!(
            Value::from_heap(Type::String, HeapId::new(1, 0))
                .to_number()
                .is_nan()
        );
    }
}
