//! Visitor capability exposing a value's shape to the walker.

use std::{
    collections::VecDeque,
    rc::Rc,
    sync::{
        Arc,
        mpsc::{Receiver, Sender, SyncSender},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use parquet_floor_core::coerce::Scalar;

/// Kind names reported for values with no Parquet representation.
pub mod kind {
    pub const CHAN: &str = "chan";
    pub const FUNC: &str = "func";
}

/// A value that can describe its own shape to the native walker.
///
/// Implemented for the std scalar, string, pointer and sequence types, and
/// for structs through `#[derive(Reflect)]`.
pub trait Reflect {
    fn reflect(&self) -> Reflected<'_>;
}

/// Shape of one value, borrowed from it.
pub enum Reflected<'a> {
    Scalar(Scalar<'a>),
    /// An instant relative to the Unix epoch. Both parts carry the sign of
    /// the instant.
    Timestamp {
        seconds: i64,
        nanos: i64,
    },
    /// An optional indirection; `None` is a nil pointer.
    Pointer(Option<&'a dyn Reflect>),
    Struct(Vec<StructField<'a>>),
    Sequence(Vec<&'a dyn Reflect>),
    Unsupported(&'static str),
}

impl Reflected<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Reflected::Scalar(scalar) => scalar.kind_name(),
            Reflected::Timestamp { .. } => "timestamp",
            Reflected::Pointer(None) => "nil pointer",
            Reflected::Pointer(Some(_)) => "pointer",
            Reflected::Struct(_) => "struct",
            Reflected::Sequence(_) => "sequence",
            Reflected::Unsupported(kind) => kind,
        }
    }
}

/// One named field of a struct, already mapped to its record field name.
pub struct StructField<'a> {
    pub name: &'static str,
    pub value: &'a dyn Reflect,
}

impl<'a> StructField<'a> {
    pub fn new(name: &'static str, value: &'a dyn Reflect) -> Self {
        Self { name, value }
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn reflect(&self) -> Reflected<'_> {
                    Reflected::Scalar(Scalar::$variant(*self as $target))
                }
            }
        )*
    };
}

impl_scalar! {
    i8 => Int32 as i32,
    i16 => Int32 as i32,
    i32 => Int32 as i32,
    isize => Int32 as i32,
    u8 => Uint32 as u32,
    u16 => Uint32 as u32,
    u32 => Uint32 as u32,
    usize => Uint32 as u32,
    i64 => Int64 as i64,
    i128 => Int64 as i64,
    u64 => Uint64 as u64,
    u128 => Uint64 as u64,
    f32 => Float32 as f32,
    f64 => Float64 as f64,
}

impl Reflect for bool {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Bool(*self))
    }
}

impl Reflect for str {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::String(self))
    }
}

impl Reflect for String {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::String(self))
    }
}

impl Reflect for Bytes {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Scalar(Scalar::Bytes(self))
    }
}

impl Reflect for SystemTime {
    fn reflect(&self) -> Reflected<'_> {
        let (seconds, nanos) = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => (after.as_secs() as i64, i64::from(after.subsec_nanos())),
            Err(before) => {
                let before = before.duration();
                (
                    -(before.as_secs() as i64),
                    -i64::from(before.subsec_nanos()),
                )
            }
        };
        Reflected::Timestamp { seconds, nanos }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Pointer(self.as_ref().map(|v| v as &dyn Reflect))
    }
}

// Non-nullable indirections are transparent.
macro_rules! impl_deref {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ty {
                fn reflect(&self) -> Reflected<'_> {
                    (**self).reflect()
                }
            }
        )*
    };
}

impl_deref!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Reflected<'_> {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Reflected<'_> {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Sequence(self.iter().map(|v| v as &dyn Reflect).collect())
    }
}

impl<T> Reflect for Sender<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Unsupported(kind::CHAN)
    }
}

impl<T> Reflect for SyncSender<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Unsupported(kind::CHAN)
    }
}

impl<T> Reflect for Receiver<T> {
    fn reflect(&self) -> Reflected<'_> {
        Reflected::Unsupported(kind::CHAN)
    }
}

macro_rules! impl_fn_pointer {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Reflect for fn($($arg),*) -> R {
            fn reflect(&self) -> Reflected<'_> {
                Reflected::Unsupported(kind::FUNC)
            }
        }
    };
}

impl_fn_pointer!();
impl_fn_pointer!(A);
impl_fn_pointer!(A, B);
impl_fn_pointer!(A, B, C);
