//! Test-only message covering every scalar kind, repeated fields and recursion

#![allow(dead_code)]

use once_cell::sync::Lazy;
use zktx_codec::scalar::{
    Bool, Bytes, Double, Fixed32, Fixed64, Float, Int32, Int64, SFixed32, SFixed64, SInt32,
    SInt64, Str, UInt32, UInt64,
};
use zktx_codec::{Message, Schema};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scalars {
    pub u64_: u64,
    pub u32_: u32,
    pub i64_: i64,
    pub i32_: i32,
    pub s64: i64,
    pub s32: i32,
    pub flag: bool,
    pub f64_: u64,
    pub sf64: i64,
    pub double: f64,
    pub f32_: u32,
    pub sf32: i32,
    pub float: f32,
    pub text: String,
    pub blob: Vec<u8>,
    pub ids: Vec<u32>,
    pub tags: Vec<String>,
    pub child: Option<Box<Scalars>>,
}

impl Message for Scalars {
    const TYPE_NAME: &'static str = "test.Scalars";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Scalars>> = Lazy::new(|| {
            Schema::<Scalars>::builder(Scalars::TYPE_NAME)
                .scalar::<UInt64>(1, "u64", |m| &m.u64_, |m| &mut m.u64_)
                .scalar::<UInt32>(2, "u32", |m| &m.u32_, |m| &mut m.u32_)
                .scalar::<Int64>(3, "i64", |m| &m.i64_, |m| &mut m.i64_)
                .scalar::<Int32>(4, "i32", |m| &m.i32_, |m| &mut m.i32_)
                .scalar::<SInt64>(5, "s64", |m| &m.s64, |m| &mut m.s64)
                .scalar::<SInt32>(6, "s32", |m| &m.s32, |m| &mut m.s32)
                .scalar::<Bool>(7, "flag", |m| &m.flag, |m| &mut m.flag)
                .scalar::<Fixed64>(8, "f64", |m| &m.f64_, |m| &mut m.f64_)
                .scalar::<SFixed64>(9, "sf64", |m| &m.sf64, |m| &mut m.sf64)
                .scalar::<Double>(10, "double", |m| &m.double, |m| &mut m.double)
                .scalar::<Fixed32>(11, "f32", |m| &m.f32_, |m| &mut m.f32_)
                .scalar::<SFixed32>(12, "sf32", |m| &m.sf32, |m| &mut m.sf32)
                .scalar::<Float>(13, "float", |m| &m.float, |m| &mut m.float)
                .scalar::<Str>(14, "text", |m| &m.text, |m| &mut m.text)
                .scalar::<Bytes>(15, "blob", |m| &m.blob, |m| &mut m.blob)
                .repeated::<UInt32>(16, "ids", |m| &m.ids, |m| &mut m.ids)
                .repeated::<Str>(17, "tags", |m| &m.tags, |m| &mut m.tags)
                .message::<Scalars>(
                    18,
                    "child",
                    |m| m.child.as_deref(),
                    |m| &mut **m.child.get_or_insert_with(Box::default),
                )
                .build()
        });
        &SCHEMA
    }
}

/// A chain of `depth` nested children
pub fn nested(depth: usize) -> Scalars {
    let mut msg = Scalars {
        u64_: 1,
        ..Scalars::default()
    };
    for _ in 0..depth {
        msg = Scalars {
            u64_: 1,
            child: Some(Box::new(msg)),
            ..Scalars::default()
        };
    }
    msg
}
